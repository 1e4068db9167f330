//! Accumulation of observed contacts into a genome-wide distance histogram.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

use hicexp_core::models::{Chromosome, ChromosomeCatalog, NormalizationType};

use crate::consts::{UNIT_BP, UNIT_FRAG};
use crate::density::{ExpectedDensity, ObservedChromosome, compute_expected_density};
use crate::errors::{ExpectedError, ExpectedResult};

///
/// Units chromosome lengths are measured in.
///
#[derive(Debug, Clone, Default)]
pub enum LengthMode {
    /// Lengths come from the chromosome records, in base pairs.
    #[default]
    BasePairs,
    /// Lengths are restriction-fragment counts, looked up by chromosome name.
    Fragments(HashMap<String, u64>),
}

/// A chromosome whose length has been resolved in the accumulator's units.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedChromosome {
    pub name: String,
    pub length: u64,
}

///
/// Collects observed contact weights binned by distance from the diagonal,
/// along with the total weight seen on each chromosome.
///
/// Call [ExpectedValueAccumulator::add_observation] for every contact, then
/// [ExpectedValueAccumulator::finalize] once to get the expected density.
/// Finalizing consumes the accumulator so nothing can be added afterwards.
///
#[derive(Debug, Clone)]
pub struct ExpectedValueAccumulator {
    grid_size: u32,
    number_of_bins: usize,
    normalization_type: NormalizationType,
    is_frag: bool,
    chromosomes: IndexMap<u32, ResolvedChromosome>,
    /// Per-chromosome totals, parallel to `chromosomes`. `None` means no data.
    chromosome_totals: Vec<Option<f64>>,
    actual_distances: Vec<f64>,
    dropped_observations: u64,
}

impl ExpectedValueAccumulator {
    ///
    /// Create a new accumulator over a set of chromosomes.
    ///
    /// # Arguments
    /// - chromosomes: the genome's chromosomes; the whole-genome entry is skipped
    /// - grid_size: bin width in the units selected by `mode`
    /// - normalization_type: tag carried through to the result
    /// - mode: whether lengths are base pairs or fragment counts
    ///
    /// # Errors
    /// [ExpectedError::UnresolvedChromosomeLength] when fragment mode is used and
    /// a chromosome is absent from the fragment map.
    pub fn new<'a, I>(
        chromosomes: I,
        grid_size: u32,
        normalization_type: NormalizationType,
        mode: LengthMode,
    ) -> ExpectedResult<Self>
    where
        I: IntoIterator<Item = &'a Chromosome>,
    {
        if grid_size == 0 {
            return Err(ExpectedError::InvalidGridSize);
        }

        let is_frag = matches!(mode, LengthMode::Fragments(_));
        let mut resolved: IndexMap<u32, ResolvedChromosome> = IndexMap::new();
        let mut max_len: u64 = 0;

        for chr in chromosomes {
            if chr.is_whole_genome() {
                continue;
            }
            let length = match &mode {
                LengthMode::BasePairs => chr.length,
                LengthMode::Fragments(fragment_counts) => *fragment_counts
                    .get(&chr.name)
                    .ok_or_else(|| ExpectedError::UnresolvedChromosomeLength {
                        name: chr.name.clone(),
                    })?,
            };
            max_len = max_len.max(length);
            resolved.insert(
                chr.index,
                ResolvedChromosome {
                    name: chr.name.clone(),
                    length,
                },
            );
        }

        let number_of_bins = (max_len / grid_size as u64) as usize + 1;
        debug!(
            "Expected value accumulator: {} chromosomes, grid size {}, {} distance bins",
            resolved.len(),
            grid_size,
            number_of_bins
        );

        Ok(ExpectedValueAccumulator {
            grid_size,
            number_of_bins,
            normalization_type,
            is_frag,
            chromosome_totals: vec![None; resolved.len()],
            chromosomes: resolved,
            actual_distances: vec![0.0; number_of_bins],
            dropped_observations: 0,
        })
    }

    ///
    /// Create a new accumulator over the real chromosomes of a catalog.
    ///
    pub fn from_catalog(
        catalog: &ChromosomeCatalog,
        grid_size: u32,
        normalization_type: NormalizationType,
        mode: LengthMode,
    ) -> ExpectedResult<Self> {
        ExpectedValueAccumulator::new(catalog.iter_chroms(), grid_size, normalization_type, mode)
    }

    ///
    /// Add one observed contact between `bin1` and `bin2` on a chromosome.
    ///
    /// Non-finite weights and unknown chromosomes are dropped without touching
    /// any counter other than [ExpectedValueAccumulator::dropped_observations].
    ///
    /// # Panics
    /// When `|bin1 - bin2|` is not below [ExpectedValueAccumulator::number_of_bins].
    /// Bins must come from positions inside the chromosome's length.
    #[inline]
    pub fn add_observation(&mut self, chr_index: u32, bin1: usize, bin2: usize, weight: f64) {
        if !weight.is_finite() {
            self.dropped_observations += 1;
            return;
        }

        let Some(slot) = self.chromosomes.get_index_of(&chr_index) else {
            self.dropped_observations += 1;
            return;
        };

        let total = &mut self.chromosome_totals[slot];
        *total = Some(total.unwrap_or(0.0) + weight);

        let dist = bin1.abs_diff(bin2);
        self.actual_distances[dist] += weight;
    }

    ///
    /// Fold another accumulator's counts into this one. Both must have been
    /// built over the same chromosomes with the same grid size.
    ///
    pub fn merge(&mut self, other: ExpectedValueAccumulator) -> ExpectedResult<()> {
        if other.grid_size != self.grid_size || other.number_of_bins != self.number_of_bins {
            return Err(ExpectedError::IncompatibleAccumulators(format!(
                "grid size {} with {} bins vs grid size {} with {} bins",
                self.grid_size, self.number_of_bins, other.grid_size, other.number_of_bins
            )));
        }
        if !self.chromosomes.iter().eq(other.chromosomes.iter()) {
            return Err(ExpectedError::IncompatibleAccumulators(
                "chromosome sets differ".to_string(),
            ));
        }

        for (mine, theirs) in self
            .actual_distances
            .iter_mut()
            .zip(other.actual_distances.iter())
        {
            *mine += theirs;
        }

        for (mine, theirs) in self
            .chromosome_totals
            .iter_mut()
            .zip(other.chromosome_totals.into_iter())
        {
            if let Some(theirs) = theirs {
                *mine = Some(mine.unwrap_or(0.0) + theirs);
            }
        }

        self.dropped_observations += other.dropped_observations;

        Ok(())
    }

    ///
    /// Compute the smoothed expected density and per-chromosome scale factors.
    ///
    pub fn finalize(self) -> ExpectedDensity {
        let unit = if self.is_frag { UNIT_FRAG } else { UNIT_BP };
        let observed: Vec<ObservedChromosome> = self
            .chromosomes
            .iter()
            .zip(self.chromosome_totals.iter())
            .filter_map(|((index, chr), total)| {
                total.map(|total| ObservedChromosome {
                    index: *index,
                    name: &chr.name,
                    length: chr.length,
                    total,
                })
            })
            .collect();

        compute_expected_density(
            &self.actual_distances,
            &observed,
            self.grid_size,
            self.normalization_type,
            unit,
        )
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn number_of_bins(&self) -> usize {
        self.number_of_bins
    }

    pub fn normalization_type(&self) -> NormalizationType {
        self.normalization_type
    }

    pub fn is_fragment_mode(&self) -> bool {
        self.is_frag
    }

    ///
    /// Length of a chromosome in the accumulator's units, if it is known.
    ///
    pub fn resolved_length(&self, chr_index: u32) -> Option<u64> {
        self.chromosomes.get(&chr_index).map(|chr| chr.length)
    }

    /// Genome-wide summed weight at each binned distance.
    pub fn distance_histogram(&self) -> &[f64] {
        &self.actual_distances
    }

    ///
    /// Total observed weight per chromosome, in chromosome order. Chromosomes
    /// with no observations are left out.
    ///
    pub fn chromosome_totals(&self) -> IndexMap<u32, f64> {
        self.chromosomes
            .keys()
            .zip(self.chromosome_totals.iter())
            .filter_map(|(index, total)| total.map(|total| (*index, total)))
            .collect()
    }

    pub fn dropped_observations(&self) -> u64 {
        self.dropped_observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn catalog() -> ChromosomeCatalog {
        ChromosomeCatalog::new(vec![("chr1", 1000), ("chr2", 2000)]).unwrap()
    }

    #[fixture]
    fn accumulator(catalog: ChromosomeCatalog) -> ExpectedValueAccumulator {
        ExpectedValueAccumulator::from_catalog(
            &catalog,
            100,
            NormalizationType::None,
            LengthMode::BasePairs,
        )
        .unwrap()
    }

    #[rstest]
    fn test_number_of_bins_from_longest_chromosome(accumulator: ExpectedValueAccumulator) {
        assert_eq!(accumulator.number_of_bins(), 21);
        assert_eq!(accumulator.distance_histogram().len(), 21);
        assert!(accumulator.distance_histogram().iter().all(|v| *v == 0.0));
    }

    #[rstest]
    fn test_whole_genome_entry_is_excluded(accumulator: ExpectedValueAccumulator) {
        assert_eq!(accumulator.resolved_length(0), None);
        assert_eq!(accumulator.resolved_length(2), Some(2000));
    }

    #[rstest]
    fn test_catalog_and_explicit_chromosomes_agree(catalog: ChromosomeCatalog) {
        let from_catalog = ExpectedValueAccumulator::from_catalog(
            &catalog,
            100,
            NormalizationType::None,
            LengthMode::BasePairs,
        )
        .unwrap();
        let from_all = ExpectedValueAccumulator::new(
            catalog.iter(),
            100,
            NormalizationType::None,
            LengthMode::BasePairs,
        )
        .unwrap();

        assert_eq!(from_catalog.number_of_bins(), from_all.number_of_bins());
        assert_eq!(from_catalog.resolved_length(0), None);
        assert_eq!(from_all.resolved_length(0), None);
        assert_eq!(from_catalog.resolved_length(1), from_all.resolved_length(1));
    }

    #[rstest]
    fn test_zero_grid_size_rejected(catalog: ChromosomeCatalog) {
        let result = ExpectedValueAccumulator::from_catalog(
            &catalog,
            0,
            NormalizationType::None,
            LengthMode::BasePairs,
        );
        assert!(matches!(result, Err(ExpectedError::InvalidGridSize)));
    }

    #[rstest]
    fn test_fragment_mode_uses_fragment_counts(catalog: ChromosomeCatalog) {
        let counts = HashMap::from([("chr1".to_string(), 50), ("chr2".to_string(), 30)]);
        let accumulator = ExpectedValueAccumulator::from_catalog(
            &catalog,
            10,
            NormalizationType::Kr,
            LengthMode::Fragments(counts),
        )
        .unwrap();

        assert!(accumulator.is_fragment_mode());
        assert_eq!(accumulator.number_of_bins(), 6);
        assert_eq!(accumulator.resolved_length(1), Some(50));
    }

    #[rstest]
    fn test_fragment_mode_missing_chromosome(catalog: ChromosomeCatalog) {
        let counts = HashMap::from([("chr1".to_string(), 50)]);
        let result = ExpectedValueAccumulator::from_catalog(
            &catalog,
            10,
            NormalizationType::None,
            LengthMode::Fragments(counts),
        );
        assert!(matches!(
            result,
            Err(ExpectedError::UnresolvedChromosomeLength { name }) if name == "chr2"
        ));
    }

    #[rstest]
    fn test_add_observation(mut accumulator: ExpectedValueAccumulator) {
        accumulator.add_observation(1, 3, 5, 2.0);
        accumulator.add_observation(1, 5, 3, 1.5);
        accumulator.add_observation(2, 7, 7, 4.0);

        let hist = accumulator.distance_histogram();
        assert_eq!(hist[2], 3.5);
        assert_eq!(hist[0], 4.0);

        let totals = accumulator.chromosome_totals();
        assert_eq!(totals[&1], 3.5);
        assert_eq!(totals[&2], 4.0);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_non_finite_weight_dropped(mut accumulator: ExpectedValueAccumulator, #[case] weight: f64) {
        accumulator.add_observation(1, 0, 4, weight);

        assert!(accumulator.distance_histogram().iter().all(|v| *v == 0.0));
        assert!(accumulator.chromosome_totals().is_empty());
        assert_eq!(accumulator.dropped_observations(), 1);
    }

    #[rstest]
    fn test_unknown_chromosome_dropped(mut accumulator: ExpectedValueAccumulator) {
        accumulator.add_observation(42, 0, 4, 1.0);
        accumulator.add_observation(0, 0, 4, 1.0);

        assert!(accumulator.distance_histogram().iter().all(|v| *v == 0.0));
        assert!(accumulator.chromosome_totals().is_empty());
        assert_eq!(accumulator.dropped_observations(), 2);
    }

    #[rstest]
    #[should_panic]
    fn test_distance_beyond_histogram_panics(mut accumulator: ExpectedValueAccumulator) {
        accumulator.add_observation(1, 0, 21, 1.0);
    }

    #[rstest]
    fn test_totals_keep_chromosome_order(mut accumulator: ExpectedValueAccumulator) {
        accumulator.add_observation(2, 0, 1, 1.0);
        accumulator.add_observation(1, 0, 1, 1.0);

        let order: Vec<u32> = accumulator.chromosome_totals().keys().copied().collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[rstest]
    fn test_merge_adds_counts(catalog: ChromosomeCatalog) {
        let build = || {
            ExpectedValueAccumulator::from_catalog(
                &catalog,
                100,
                NormalizationType::None,
                LengthMode::BasePairs,
            )
            .unwrap()
        };
        let mut left = build();
        let mut right = build();
        left.add_observation(1, 0, 2, 1.0);
        right.add_observation(1, 2, 0, 2.0);
        right.add_observation(2, 0, 0, 5.0);
        right.add_observation(1, 0, 0, f64::NAN);

        left.merge(right).unwrap();

        assert_eq!(left.distance_histogram()[2], 3.0);
        assert_eq!(left.distance_histogram()[0], 5.0);
        assert_eq!(left.chromosome_totals()[&1], 3.0);
        assert_eq!(left.chromosome_totals()[&2], 5.0);
        assert_eq!(left.dropped_observations(), 1);
    }

    #[rstest]
    fn test_merge_rejects_other_grid(mut accumulator: ExpectedValueAccumulator, catalog: ChromosomeCatalog) {
        let other = ExpectedValueAccumulator::from_catalog(
            &catalog,
            50,
            NormalizationType::None,
            LengthMode::BasePairs,
        )
        .unwrap();

        let result = accumulator.merge(other);
        assert!(matches!(result, Err(ExpectedError::IncompatibleAccumulators(_))));
    }
}
