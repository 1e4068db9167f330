use indexmap::IndexMap;

use hicexp_core::models::NormalizationType;

use crate::errors::{ExpectedError, ExpectedResult};

/// Trait for anything that can report an expected contact value.
pub trait ExpectedValueFunction {
    /// Expected value at `distance` bins from the diagonal of a chromosome,
    /// corrected by that chromosome's scale factor.
    fn expected_value(&self, chr_index: u32, distance: usize) -> f64;

    /// Unit the distances are binned in.
    fn unit(&self) -> &str;
}

///
/// Read-only expected value lookup over a finalized density curve.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedValueLookup {
    normalization_type: NormalizationType,
    unit: String,
    bin_size: u32,
    expected_values: Vec<f64>,
    norm_factors: IndexMap<u32, f64>,
}

impl ExpectedValueLookup {
    ///
    /// Create a new lookup.
    ///
    /// # Arguments
    /// - normalization_type: tag of the matrix the curve was computed from
    /// - unit: unit label, returned verbatim by [ExpectedValueFunction::unit]
    /// - bin_size: grid size the curve was binned at
    /// - expected_values: the density curve; must not be empty
    /// - norm_factors: per-chromosome scale factors
    pub fn new(
        normalization_type: NormalizationType,
        unit: impl Into<String>,
        bin_size: u32,
        expected_values: Vec<f64>,
        norm_factors: IndexMap<u32, f64>,
    ) -> ExpectedResult<Self> {
        if expected_values.is_empty() {
            return Err(ExpectedError::EmptyDensityCurve);
        }

        Ok(ExpectedValueLookup {
            normalization_type,
            unit: unit.into(),
            bin_size,
            expected_values,
            norm_factors,
        })
    }

    pub fn normalization_type(&self) -> NormalizationType {
        self.normalization_type
    }

    pub fn bin_size(&self) -> u32 {
        self.bin_size
    }

    pub fn expected_values(&self) -> &[f64] {
        &self.expected_values
    }

    pub fn norm_factors(&self) -> &IndexMap<u32, f64> {
        &self.norm_factors
    }
}

impl ExpectedValueFunction for ExpectedValueLookup {
    fn expected_value(&self, chr_index: u32, distance: usize) -> f64 {
        let norm_factor = self.norm_factors.get(&chr_index).copied().unwrap_or(1.0);
        // distances past the curve saturate to its last value
        let last = self.expected_values.len() - 1;
        self.expected_values[distance.min(last)] / norm_factor
    }

    fn unit(&self) -> &str {
        &self.unit
    }
}
