use std::fs::read_to_string;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use hicexp_expected::{ExpectedDensity, ExpectedValueFunction, ExpectedValueLookup};

pub fn load_lookup(path: &Path) -> Result<ExpectedValueLookup> {
    let json = read_to_string(path)
        .with_context(|| format!("Failed to read expected values: {}", path.display()))?;
    let density: ExpectedDensity = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse expected values: {}", path.display()))?;

    density
        .into_lookup()
        .with_context(|| format!("No expected values in {}", path.display()))
}

pub fn run_lookup(matches: &ArgMatches) -> Result<()> {
    let expected = matches
        .get_one::<String>("expected")
        .expect("--expected is required");
    let chrom = *matches.get_one::<u32>("chrom").expect("--chrom is required");

    let lookup = load_lookup(Path::new(expected))?;

    for distance in matches.get_many::<usize>("distance").into_iter().flatten() {
        println!(
            "{}\t{}\t{}",
            distance,
            lookup.unit(),
            lookup.expected_value(chrom, *distance)
        );
    }

    Ok(())
}
