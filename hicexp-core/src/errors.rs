use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to open file: {0}")]
    FileOpenError(String),

    #[error("Error parsing chrom sizes line {line}: {reason}")]
    ChromSizesParse { line: usize, reason: String },

    #[error("Duplicate chromosome name: {0}")]
    DuplicateChromosome(String),

    #[error("Unknown normalization type: {0}")]
    UnknownNormalizationType(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
