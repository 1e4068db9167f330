use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Name of the synthetic whole-genome chromosome.
pub const CHR_ALL: &str = "All";

///
/// Chromosome struct, one entry of a genome's chrom.sizes listing.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Serialize, Deserialize)]
pub struct Chromosome {
    pub index: u32,
    pub name: String,
    pub length: u64,
}

impl Chromosome {
    pub fn new(index: u32, name: impl Into<String>, length: u64) -> Self {
        Chromosome {
            index,
            name: name.into(),
            length,
        }
    }

    ///
    /// Whether this is the synthetic whole-genome entry.
    ///
    pub fn is_whole_genome(&self) -> bool {
        self.name.eq_ignore_ascii_case(CHR_ALL)
    }

    ///
    /// Number of whole bins of `grid_size` that fit in `length`.
    ///
    pub fn bin_count(length: u64, grid_size: u32) -> usize {
        (length / grid_size as u64) as usize
    }
}

impl Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.name, self.length)
    }
}
