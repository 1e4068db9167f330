//! Core models shared by the hicexp crates.
//!
//! This crate holds the pieces that describe a genome to the expected-value
//! calculation without doing any of the statistics itself:
//!
//! - [`models::Chromosome`] and [`models::ChromosomeCatalog`], built from a chrom.sizes file
//! - [`models::NormalizationType`], the opaque tag carried through to the result
//! - readers for chrom.sizes and restriction-fragment count files
//!
//! # Example
//!
//! ```no_run
//! use hicexp_core::models::ChromosomeCatalog;
//!
//! let catalog = ChromosomeCatalog::from_chrom_sizes("hg38.chrom.sizes").unwrap();
//! for chr in catalog.iter() {
//!     println!("{}\t{}", chr.name, chr.length);
//! }
//! ```

pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use errors::{CoreError, CoreResult};
