use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaribelError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("At least one file path must be specified")]
    FileListEmpty,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File {0} is empty or contains only headers")]
    EmptyFile(String),

    #[error("Column count mismatch on file {file} line {line}")]
    ColumnCountMismatch { file: String, line: usize },

    #[error("Missing value for '{0}'")]
    MissingField(String),

    #[error("Error on '{field}': {source}")]
    FieldFormat {
        field: String,
        source: Box<MaribelError>,
    },

    #[error("Cannot convert value '{value}' to {target}")]
    InvalidCast { value: String, target: String },

    #[error("Value must be greater than zero, got '{0}'")]
    OutOfRange(String),

    #[error("Unrecognized date/time format: '{0}'")]
    InvalidFormat(String),

    #[error("Unknown type '{0}': expected 'expense' or 'budget'")]
    UnknownType(String),

    #[error("Unknown campaign number '{0}'")]
    UnknownReference(String),

    #[error("'{field}' must be greater than zero, got {value}")]
    InvalidAmount { field: String, value: String },

    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("Duplicate campaign number '{0}' in batch")]
    DuplicateNumber(String),

    #[error("Internal inconsistency: {0}")]
    Internal(String),

    #[error("Error processing in file {file}, line {line}: {source}")]
    Record {
        file: String,
        line: usize,
        source: Box<MaribelError>,
    },

    #[error("Separator must be a single ASCII character, got '{0}'")]
    Separator(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, MaribelError>;
