use thiserror::Error;

/// Failures that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Dataset contains no rating records")]
    EmptyDataset,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Training failed: {0}")]
    TrainingFailure(String),

    #[error("Unseen {column} value: {value}")]
    UnseenCategory { column: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
