pub mod catalog;
pub mod chromosome;
pub mod normalization;

// re-export for cleaner imports
pub use self::catalog::ChromosomeCatalog;
pub use self::chromosome::{CHR_ALL, Chromosome};
pub use self::normalization::NormalizationType;
