//! Expected density estimation.
//!
//! The density at distance `d` is the genome-wide observed count at `d` divided
//! by the number of bin pairs that could have been observed at `d` ("possible
//! distances"). Sparse distances are smoothed with an adaptive window that
//! grows until it holds at least [SHOT_NOISE_FLOOR] counts. Per-chromosome
//! scale factors then make the expected total for each chromosome match its
//! observed total.

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use hicexp_core::models::{Chromosome, NormalizationType};

use crate::consts::SHOT_NOISE_FLOOR;
use crate::errors::ExpectedResult;
use crate::lookup::ExpectedValueLookup;

/// A chromosome that received at least one observation.
#[derive(Debug, Clone, Copy)]
pub struct ObservedChromosome<'a> {
    pub index: u32,
    pub name: &'a str,
    pub length: u64,
    pub total: f64,
}

///
/// The finalized result of an expected value calculation.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedDensity {
    pub normalization_type: NormalizationType,
    pub unit: String,
    pub grid_size: u32,
    /// Smoothed expected density, indexed by binned distance.
    pub density: Vec<f64>,
    /// Chromosome index -> expected total / observed total, in chromosome order.
    pub scale_factors: IndexMap<u32, f64>,
}

impl ExpectedDensity {
    pub fn scale_factor(&self, chr_index: u32) -> Option<f64> {
        self.scale_factors.get(&chr_index).copied()
    }

    ///
    /// Replace the unit label carried to lookups.
    ///
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn to_lookup(&self) -> ExpectedResult<ExpectedValueLookup> {
        self.clone().into_lookup()
    }

    pub fn into_lookup(self) -> ExpectedResult<ExpectedValueLookup> {
        ExpectedValueLookup::new(
            self.normalization_type,
            self.unit,
            self.grid_size,
            self.density,
            self.scale_factors,
        )
    }
}

///
/// Count, summed over chromosomes, of bin pairs at each distance.
///
/// Returns the histogram (sized `number_of_bins`) and the largest per-chromosome
/// bin count.
///
/// # Arguments
/// - lengths: lengths of the chromosomes that have data
/// - grid_size: bin width
/// - number_of_bins: histogram length; must exceed every chromosome's bin count
pub fn possible_distances<I>(lengths: I, grid_size: u32, number_of_bins: usize) -> (Vec<f64>, usize)
where
    I: IntoIterator<Item = u64>,
{
    let mut possible = vec![0.0; number_of_bins];
    let mut max_num_bins = 0;

    for length in lengths {
        let n_chr_bins = Chromosome::bin_count(length, grid_size);
        max_num_bins = max_num_bins.max(n_chr_bins);

        for (i, slot) in possible.iter_mut().take(n_chr_bins).enumerate() {
            *slot += (n_chr_bins - i) as f64;
        }
    }

    (possible, max_num_bins)
}

/// The window state at the moment a density value was emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSample {
    pub bound1: usize,
    pub bound2: usize,
    pub num_sum: f64,
    pub den_sum: f64,
    pub density: f64,
}

///
/// Two-pointer window over `[0, limit)` that yields one [WindowSample] per
/// output distance.
///
/// Before each emission the window grows to the right while it holds fewer than
/// [SHOT_NOISE_FLOOR] counts, or otherwise drops both end points for as long as
/// the floor still holds. After each emission it extends two positions to the
/// right (one at the boundary) to stay centered on the next distance.
///
#[derive(Debug, Clone)]
pub struct SmoothingWindow<'a> {
    actual: &'a [f64],
    possible: &'a [f64],
    limit: usize,
    next: usize,
    bound1: usize,
    bound2: usize,
    num_sum: f64,
    den_sum: f64,
}

impl<'a> SmoothingWindow<'a> {
    ///
    /// # Panics
    /// When `limit` exceeds the length of either histogram.
    pub fn new(actual: &'a [f64], possible: &'a [f64], limit: usize) -> Self {
        assert!(limit <= actual.len() && limit <= possible.len());

        let (num_sum, den_sum) = if limit > 0 {
            (actual[0], possible[0])
        } else {
            (0.0, 0.0)
        };

        SmoothingWindow {
            actual,
            possible,
            limit,
            next: 0,
            bound1: 0,
            bound2: 0,
            num_sum,
            den_sum,
        }
    }

    fn push_right(&mut self) {
        self.bound2 += 1;
        self.num_sum += self.actual[self.bound2];
        self.den_sum += self.possible[self.bound2];
    }

    fn grow_if_starved(&mut self) {
        while self.num_sum < SHOT_NOISE_FLOOR && self.bound2 + 1 < self.limit {
            self.push_right();
        }
    }

    fn shrink_if_saturated(&mut self) {
        while self.bound2 > self.bound1
            && self.num_sum - self.actual[self.bound1] - self.actual[self.bound2]
                >= SHOT_NOISE_FLOOR
        {
            self.num_sum -= self.actual[self.bound1] + self.actual[self.bound2];
            self.den_sum -= self.possible[self.bound1] + self.possible[self.bound2];
            self.bound1 += 1;
            self.bound2 -= 1;
        }
    }

    fn recenter(&mut self) {
        if self.bound2 + 2 < self.limit {
            self.push_right();
            self.push_right();
        } else if self.bound2 + 1 < self.limit {
            self.push_right();
        }
    }
}

impl Iterator for SmoothingWindow<'_> {
    type Item = WindowSample;

    fn next(&mut self) -> Option<WindowSample> {
        if self.next >= self.limit {
            return None;
        }

        if self.num_sum < SHOT_NOISE_FLOOR {
            self.grow_if_starved();
        } else {
            self.shrink_if_saturated();
        }

        // a zero denominator yields inf/NaN; callers may filter it
        let sample = WindowSample {
            bound1: self.bound1,
            bound2: self.bound2,
            num_sum: self.num_sum,
            den_sum: self.den_sum,
            density: self.num_sum / self.den_sum,
        };

        self.recenter();
        self.next += 1;

        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.limit - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SmoothingWindow<'_> {}

///
/// Smoothed `actual / possible` for every distance in `[0, max_num_bins)`.
///
pub fn smooth_density(actual: &[f64], possible: &[f64], max_num_bins: usize) -> Vec<f64> {
    SmoothingWindow::new(actual, possible, max_num_bins)
        .map(|sample| sample.density)
        .collect()
}

///
/// Expected total count for a chromosome of `n_chr_bins` bins under `density`.
/// Distances past the end of the curve contribute nothing.
///
pub fn expected_count(density: &[f64], n_chr_bins: usize) -> f64 {
    density
        .iter()
        .take(n_chr_bins)
        .enumerate()
        .map(|(n, v)| (n_chr_bins - n) as f64 * v)
        .sum()
}

///
/// Per-chromosome `expected / observed` ratios, in the order given.
///
pub fn scale_factors(
    density: &[f64],
    observed: &[ObservedChromosome],
    grid_size: u32,
) -> IndexMap<u32, f64> {
    observed
        .iter()
        .map(|chr| {
            let n_chr_bins = Chromosome::bin_count(chr.length, grid_size);
            let factor = expected_count(density, n_chr_bins) / chr.total;
            debug!("Scale factor for {}: {}", chr.name, factor);
            (chr.index, factor)
        })
        .collect()
}

///
/// Run both density passes and derive scale factors.
///
/// # Arguments
/// - actual_distances: observed weight per binned distance
/// - observed: chromosomes with data, in chromosome order
/// - grid_size: bin width
/// - normalization_type: tag carried to the result
/// - unit: unit label carried to the result
pub fn compute_expected_density(
    actual_distances: &[f64],
    observed: &[ObservedChromosome],
    grid_size: u32,
    normalization_type: NormalizationType,
    unit: &str,
) -> ExpectedDensity {
    let (possible, max_num_bins) = possible_distances(
        observed.iter().map(|chr| chr.length),
        grid_size,
        actual_distances.len(),
    );

    let density = smooth_density(actual_distances, &possible, max_num_bins);
    let scale_factors = scale_factors(&density, observed, grid_size);

    info!(
        "Computed expected density over {} distances from {} chromosomes",
        max_num_bins,
        observed.len()
    );

    ExpectedDensity {
        normalization_type,
        unit: unit.to_string(),
        grid_size,
        density,
        scale_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn observed(index: u32, length: u64, total: f64) -> ObservedChromosome<'static> {
        ObservedChromosome {
            index,
            name: "chr",
            length,
            total,
        }
    }

    #[rstest]
    fn test_possible_distances_two_chromosomes() {
        let (possible, max_num_bins) = possible_distances(vec![1000, 2000], 100, 21);

        assert_eq!(max_num_bins, 20);
        assert_eq!(possible.len(), 21);
        assert_eq!(possible[0], 30.0);
        assert_eq!(possible[9], 1.0 + 11.0);
        assert_eq!(possible[10], 10.0);
        assert_eq!(possible[19], 1.0);
        assert_eq!(possible[20], 0.0);
    }

    #[rstest]
    fn test_possible_distances_short_chromosome() {
        let (possible, max_num_bins) = possible_distances(vec![50], 100, 3);
        assert_eq!(max_num_bins, 0);
        assert!(possible.iter().all(|v| *v == 0.0));
    }

    #[rstest]
    fn test_dense_counts_are_not_smoothed() {
        let actual = vec![1000.0, 800.0, 600.0, 500.0, 0.0];
        let possible = vec![4.0, 3.0, 2.0, 1.0, 0.0];

        // the last distance is always averaged with its neighbour
        let density = smooth_density(&actual, &possible, 4);
        assert_eq!(density, vec![250.0, 800.0 / 3.0, 300.0, 1100.0 / 3.0]);
    }

    #[rstest]
    fn test_sparse_counts_grow_window() {
        // 100 counts per distance: the first window must span four distances
        let actual = vec![100.0; 10];
        let possible = vec![10.0; 10];

        let samples: Vec<WindowSample> = SmoothingWindow::new(&actual, &possible, 10).collect();
        assert_eq!((samples[0].bound1, samples[0].bound2), (0, 3));
        assert_eq!(samples[0].num_sum, 400.0);
        assert_eq!(samples[0].density, 10.0);
    }

    #[rstest]
    fn test_window_shrinks_after_recenter() {
        let actual = vec![100.0; 10];
        let possible = vec![10.0; 10];

        let samples: Vec<WindowSample> = SmoothingWindow::new(&actual, &possible, 10).collect();
        // [0,3] + 2 -> [0,5] holds 600; dropping 0 and 5 leaves [1,4] at 400
        assert_eq!((samples[1].bound1, samples[1].bound2), (1, 4));
        assert_eq!(samples[1].num_sum, 400.0);
    }

    #[rstest]
    fn test_window_stops_at_boundary() {
        let actual = vec![10.0, 10.0, 10.0, 0.0];
        let possible = vec![3.0, 2.0, 1.0, 0.0];

        let samples: Vec<WindowSample> = SmoothingWindow::new(&actual, &possible, 3).collect();
        assert_eq!(samples.len(), 3);
        for sample in &samples {
            assert!(sample.bound2 < 3);
            assert_eq!(sample.num_sum, 30.0);
            assert_eq!(sample.density, 5.0);
        }
    }

    #[rstest]
    fn test_floor_holds_away_from_boundary() {
        let actual: Vec<f64> = (0..200).map(|i| 2000.0 / (i as f64 + 1.0)).collect();
        let possible: Vec<f64> = (0..200).map(|i| 200.0 - i as f64).collect();

        for sample in SmoothingWindow::new(&actual, &possible, 200) {
            if sample.bound2 < 199 {
                assert!(sample.num_sum >= SHOT_NOISE_FLOOR, "{:?}", sample);
            }
            assert!(sample.bound1 <= sample.bound2);
        }
    }

    #[rstest]
    fn test_zero_denominator_is_not_guarded() {
        let actual = vec![500.0, 0.0];
        let possible = vec![0.0, 0.0];

        let density = smooth_density(&actual, &possible, 1);
        assert!(density[0].is_infinite());
    }

    #[rstest]
    fn test_empty_limit_yields_nothing() {
        let density = smooth_density(&[0.0], &[0.0], 0);
        assert!(density.is_empty());
    }

    #[rstest]
    #[case(3, 3.0 * 1.0 + 2.0 * 2.0 + 1.0 * 3.0)]
    #[case(5, 5.0 * 1.0 + 4.0 * 2.0 + 3.0 * 3.0)]
    fn test_expected_count_truncates_at_curve(#[case] n_chr_bins: usize, #[case] expected: f64) {
        let density = vec![1.0, 2.0, 3.0];
        assert_eq!(expected_count(&density, n_chr_bins), expected);
    }

    #[rstest]
    fn test_scale_factors_unsmoothed_curve_is_one() {
        let actual = vec![4000.0, 3000.0, 2000.0, 1000.0, 0.0];
        let result = compute_expected_density(
            &actual,
            &[observed(1, 400, 10000.0)],
            100,
            NormalizationType::None,
            "BP",
        );

        assert_eq!(result.density, vec![1000.0; 4]);
        let factor = result.scale_factor(1).unwrap();
        assert!((factor - 1.0).abs() < 1e-12, "factor = {}", factor);
    }

    #[rstest]
    fn test_scale_factors_keep_input_order() {
        let density = vec![1.0; 5];
        let factors = scale_factors(
            &density,
            &[observed(3, 500, 15.0), observed(1, 200, 3.0)],
            100,
        );

        assert_eq!(factors.keys().copied().collect::<Vec<u32>>(), vec![3, 1]);
        assert_eq!(factors[&3], 1.0);
        assert_eq!(factors[&1], 1.0);
    }

    #[rstest]
    fn test_serde_round_trip_keeps_factor_order() {
        let result = ExpectedDensity {
            normalization_type: NormalizationType::Kr,
            unit: "BP".to_string(),
            grid_size: 100,
            density: vec![2.0, 1.0],
            scale_factors: IndexMap::from([(2, 0.5), (1, 2.0)]),
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: ExpectedDensity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
        assert_eq!(parsed.scale_factors.keys().copied().collect::<Vec<u32>>(), vec![2, 1]);
    }
}
