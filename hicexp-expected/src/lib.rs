//! Expected contact density for Hi-C observed/expected normalization.
//!
//! Using this crate takes three steps:
//!
//! 1. Build an [ExpectedValueAccumulator] from a genome's chromosomes and a grid size
//! 2. Call [ExpectedValueAccumulator::add_observation] for every contact
//! 3. Call [ExpectedValueAccumulator::finalize] once to get an [ExpectedDensity],
//!    and turn it into an [ExpectedValueLookup] to answer queries
//!
//! # Example
//!
//! ```
//! use hicexp_core::models::{ChromosomeCatalog, NormalizationType};
//! use hicexp_expected::{ExpectedValueAccumulator, ExpectedValueFunction, LengthMode};
//!
//! let catalog = ChromosomeCatalog::new(vec![("chr1", 1000), ("chr2", 2000)]).unwrap();
//! let mut accumulator = ExpectedValueAccumulator::from_catalog(
//!     &catalog,
//!     100,
//!     NormalizationType::None,
//!     LengthMode::BasePairs,
//! )
//! .unwrap();
//!
//! accumulator.add_observation(1, 4, 4, 250.0);
//! accumulator.add_observation(2, 9, 9, 250.0);
//!
//! let lookup = accumulator.finalize().into_lookup().unwrap();
//! let value = lookup.expected_value(1, 0);
//! assert!(value > 0.0);
//! ```

pub mod accumulator;
pub mod config;
pub mod consts;
pub mod contacts;
pub mod density;
pub mod errors;
pub mod lookup;

// re-exports
pub use accumulator::{ExpectedValueAccumulator, LengthMode};
pub use config::ExpectedConfig;
pub use density::ExpectedDensity;
pub use errors::{ExpectedError, ExpectedResult};
pub use lookup::{ExpectedValueFunction, ExpectedValueLookup};
