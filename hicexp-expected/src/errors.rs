use thiserror::Error;

use hicexp_core::CoreError;

#[derive(Error, Debug)]
pub enum ExpectedError {
    #[error("Grid size must be a positive integer")]
    InvalidGridSize,

    #[error(
        "Could not resolve a length for chromosome {name}. This is usually a fragment map that \
         does not match the chromosome names of the chrom.sizes file"
    )]
    UnresolvedChromosomeLength { name: String },

    #[error("Accumulators cannot be merged: {0}")]
    IncompatibleAccumulators(String),

    #[error("Cannot build an expected value lookup from an empty density curve")]
    EmptyDensityCurve,

    #[error("Error parsing contact on line {line}: {reason}")]
    ContactParse { line: usize, reason: String },

    #[error("Position {position} on {chr} lies beyond its length of {length}")]
    PositionOutOfRange {
        chr: String,
        position: u64,
        length: u64,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ExpectedResult<T> = std::result::Result<T, ExpectedError>;
