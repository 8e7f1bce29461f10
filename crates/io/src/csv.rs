// Delimited text import/export

use chrono::NaiveDate;

use tasksheet_engine::row::{Field, Priority, Row, RowId, Status};
use tasksheet_engine::value::coerce_amount;

use crate::error::CodecError;

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(10)
        .collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the header line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Map a header cell to a field. Case-insensitive; `None` for headers we ignore.
///
/// The id column is deliberately absent: imported rows always get fresh ids.
pub fn header_field(header: &str) -> Option<Field> {
    match header.trim().trim_matches('"').to_lowercase().as_str() {
        "job request" | "jobrequest" => Some(Field::JobRequest),
        "submitted" => Some(Field::Submitted),
        "status" => Some(Field::Status),
        "submitter" => Some(Field::Submitter),
        "url" => Some(Field::Url),
        "assigned" => Some(Field::Assigned),
        "priority" => Some(Field::Priority),
        "due date" | "duedate" => Some(Field::DueDate),
        "est. value" | "estvalue" => Some(Field::EstValue),
        _ => None,
    }
}

/// Parse delimited text into rows with ids `1..=n`.
///
/// First record is the header. Values are trimmed. A record whose values are
/// all blank after trimming is skipped, so lines like `,,` or `"",""` add no
/// row just as empty lines don't. An unparseable estimated value becomes 0;
/// unknown status or priority text falls back to the default.
pub fn import_rows(content: &str, delimiter: u8) -> Result<Vec<Row>, CodecError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(CodecError::Empty),
    };

    // (column index, field) for every recognised header
    let mapping: Vec<(usize, Field)> = header
        .iter()
        .enumerate()
        .filter_map(|(i, h)| header_field(h).map(|f| (i, f)))
        .collect();
    if mapping.is_empty() {
        return Err(CodecError::NoRecognizedColumns);
    }

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let id = rows.len() as RowId + 1;
        let mut row = Row::empty(id);
        for &(i, field) in &mapping {
            assign(&mut row, field, record.get(i).unwrap_or(""));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn assign(row: &mut Row, field: Field, value: &str) {
    match field {
        Field::Id => {}
        Field::JobRequest => row.job_request = value.to_string(),
        Field::Submitted => row.submitted = value.to_string(),
        Field::Submitter => row.submitter = value.to_string(),
        Field::Url => row.url = value.to_string(),
        Field::Assigned => row.assigned = value.to_string(),
        Field::DueDate => row.due_date = value.to_string(),
        Field::EstValue => row.est_value = coerce_amount(value),
        Field::Status => {
            row.status = match Status::parse(value) {
                Some(status) => status,
                None => {
                    if !value.is_empty() {
                        log::warn!("import: row {}: unknown status '{}', using default", row.id, value);
                    }
                    Status::default()
                }
            }
        }
        Field::Priority => {
            row.priority = match Priority::parse(value) {
                Some(priority) => priority,
                None => {
                    if !value.is_empty() {
                        log::warn!("import: row {}: unknown priority '{}', using default", row.id, value);
                    }
                    Priority::default()
                }
            }
        }
    }
}

/// Serialize rows as delimited text: a header of field keys in schema order,
/// then one record per row with every field. Values containing the delimiter,
/// a quote or a line break are quoted.
pub fn export_rows<'a, I>(rows: I, delimiter: u8) -> Result<String, CodecError>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(Field::ALL.iter().map(|f| f.key()))?;
    for row in rows {
        writer.write_record(Field::ALL.iter().map(|&f| row.text(f)))?;
    }

    let bytes = writer.into_inner().map_err(|e| CodecError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CodecError::Csv(e.to_string()))
}

/// `<prefix>-YYYY-MM-DD.csv`
pub fn export_filename(prefix: &str, today: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, today.format("%Y-%m-%d"))
}
