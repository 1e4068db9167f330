use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use hicexp_core::models::{ChromosomeCatalog, NormalizationType};
use hicexp_core::utils::read_fragment_counts;
use hicexp_expected::contacts::{ContactReader, accumulate_contacts};
use hicexp_expected::{ExpectedConfig, ExpectedDensity, ExpectedValueAccumulator, LengthMode};

///
/// Collect the command line flags into a config, layered over `--config` if given.
///
fn config_from_matches(matches: &ArgMatches) -> Result<ExpectedConfig> {
    let normalization = match matches.get_one::<String>("norm") {
        Some(norm) => Some(
            NormalizationType::from_str(norm)
                .with_context(|| format!("Unknown normalization type supplied: {}", norm))?,
        ),
        None => None,
    };

    let flags = ExpectedConfig {
        chrom_sizes: matches.get_one::<String>("chrom-sizes").map(PathBuf::from),
        contacts: matches.get_one::<String>("contacts").map(PathBuf::from),
        grid_size: matches.get_one::<u32>("grid-size").copied(),
        normalization,
        unit: matches.get_one::<String>("unit").cloned(),
        fragment_counts: matches.get_one::<String>("fragment-counts").map(PathBuf::from),
    };

    match matches.get_one::<String>("config") {
        Some(path) => {
            let file_config = ExpectedConfig::try_from(Path::new(path))
                .with_context(|| format!("Failed to read config file: {}", path))?;
            Ok(flags.or(file_config))
        }
        None => Ok(flags),
    }
}

///
/// Run the full calculation described by a config.
///
pub fn compute_expected(config: &ExpectedConfig) -> Result<ExpectedDensity> {
    let chrom_sizes = config
        .chrom_sizes
        .as_ref()
        .context("A chrom.sizes file is required (--chrom-sizes or chrom_sizes in --config)")?;
    let contacts = config
        .contacts
        .as_ref()
        .context("A contacts file is required (--contacts or contacts in --config)")?;
    let grid_size = config.grid_size().context("--grid-size must be a positive integer")?;

    let catalog = ChromosomeCatalog::from_chrom_sizes(chrom_sizes)
        .with_context(|| format!("Failed to load chrom sizes: {}", chrom_sizes.display()))?;

    let mode = match &config.fragment_counts {
        Some(path) => LengthMode::Fragments(
            read_fragment_counts(path)
                .with_context(|| format!("Failed to load fragment counts: {}", path.display()))?,
        ),
        None => LengthMode::BasePairs,
    };

    let mut accumulator = ExpectedValueAccumulator::from_catalog(
        &catalog,
        grid_size,
        config.normalization.unwrap_or_default(),
        mode,
    )
    .context("Chromosome lengths do not match the supplied reference")?;

    let contacts = contacts.to_string_lossy();
    let reader = ContactReader::from_path(&contacts)
        .with_context(|| format!("Failed to open contacts: {}", contacts))?;
    accumulate_contacts(&mut accumulator, &catalog, reader)
        .with_context(|| format!("Failed to accumulate contacts from {}", contacts))?;

    if accumulator.dropped_observations() > 0 {
        info!(
            "Dropped {} observations with non-finite weights",
            accumulator.dropped_observations()
        );
    }

    let result = accumulator.finalize();
    Ok(match &config.unit {
        Some(unit) => result.with_unit(unit.as_str()),
        None => result,
    })
}

pub fn run_expected(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;
    let result = compute_expected(&config)?;

    let json =
        serde_json::to_string_pretty(&result).context("Failed to serialize output to JSON")?;

    match matches.get_one::<String>("output") {
        Some(p) => {
            let mut file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            file.write_all(json.as_bytes())?;
            info!("Output written to {}", p);
        }
        None => {
            io::stdout().write_all(json.as_bytes())?;
            println!(); // trailing newline
        }
    }

    Ok(())
}
