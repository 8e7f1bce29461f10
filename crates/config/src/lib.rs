// Configuration loading and sheet storage

pub mod settings;
pub mod storage;

pub use settings::Settings;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
