// File I/O: sheet rows to and from delimited text and JSON

pub mod csv;
mod error;
pub mod json;

use std::io::Read;
use std::path::{Path, PathBuf};

use tasksheet_engine::Row;

pub use error::CodecError;

/// Field delimiter for delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Byte(u8),
    /// Sniff from the content (see [`csv::sniff_delimiter`])
    Auto,
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Byte(b',')
    }
}

impl Delimiter {
    /// Parse the `io.delimiter` setting: `"auto"`, `"tab"`/`"\t"`, or a single
    /// ASCII character. Anything else falls back to a comma.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "auto" => Delimiter::Auto,
            "tab" | "\\t" | "\t" => Delimiter::Byte(b'\t'),
            s if s.len() == 1 && s.is_ascii() => Delimiter::Byte(s.as_bytes()[0]),
            other => {
                log::warn!("io.delimiter: unsupported value '{}', using ','", other);
                Delimiter::default()
            }
        }
    }

    pub fn resolve(&self, content: &str) -> u8 {
        match self {
            Delimiter::Byte(b) => *b,
            Delimiter::Auto => csv::sniff_delimiter(content),
        }
    }
}

/// What kind of import a file name implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Delimited(Delimiter),
}

impl FileFormat {
    /// `.json` is structured; `.csv` uses `csv_delimiter`; `.tsv` is tab
    /// separated; `.txt` is sniffed.
    pub fn from_name(name: &str, csv_delimiter: Delimiter) -> Result<Self, CodecError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(FileFormat::Json),
            "csv" => Ok(FileFormat::Delimited(csv_delimiter)),
            "tsv" => Ok(FileFormat::Delimited(Delimiter::Byte(b'\t'))),
            "txt" => Ok(FileFormat::Delimited(Delimiter::Auto)),
            _ => Err(CodecError::UnsupportedFormat(name.to_string())),
        }
    }
}

/// A file handed over by the host: its name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let mut file = std::fs::File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Content as UTF-8 (handles Windows-1252 files as well)
    pub fn text(&self) -> String {
        decode_text(&self.bytes)
    }
}

/// Decode bytes as UTF-8, falling back to Windows-1252 (common for
/// spreadsheet-exported CSVs). A UTF-8 byte order mark is dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Parse an input file into rows. The format comes from the file name.
pub fn import(input: &FileInput, csv_delimiter: Delimiter) -> Result<Vec<Row>, CodecError> {
    let content = input.text();
    match FileFormat::from_name(&input.name, csv_delimiter)? {
        FileFormat::Json => json::import_rows(&content),
        FileFormat::Delimited(delimiter) => csv::import_rows(&content, delimiter.resolve(&content)),
    }
}

/// A finished export, ready for the host to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub payload: String,
}

/// Where exports go (a download, the clipboard, a directory).
pub trait ExportSink {
    fn deliver(&mut self, file: &ExportFile) -> Result<(), CodecError>;
}

/// Collects exports in memory.
impl ExportSink for Vec<ExportFile> {
    fn deliver(&mut self, file: &ExportFile) -> Result<(), CodecError> {
        self.push(file.clone());
        Ok(())
    }
}

/// Writes each export as a file in a directory.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirSink {
    fn deliver(&mut self, file: &ExportFile) -> Result<(), CodecError> {
        std::fs::create_dir_all(&self.dir)?;
        // Only the final component of the name is used
        let name = Path::new(&file.filename)
            .file_name()
            .ok_or_else(|| CodecError::Io(format!("invalid export name '{}'", file.filename)))?;
        let path = self.dir.join(name);
        std::fs::write(&path, file.payload.as_bytes())?;
        log::info!("export: wrote {}", path.display());
        Ok(())
    }
}
