use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hicexp_core::models::NormalizationType;

use crate::errors::{ExpectedError, ExpectedResult};

///
/// Settings for one expected value run, usually read from a `.toml` file.
/// Every field is optional so command line flags can fill the gaps.
///
#[derive(Deserialize, Serialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExpectedConfig {
    pub chrom_sizes: Option<PathBuf>,
    pub contacts: Option<PathBuf>,
    pub grid_size: Option<u32>,
    pub normalization: Option<NormalizationType>,
    pub unit: Option<String>,
    /// Presence switches the calculation to restriction-fragment units.
    pub fragment_counts: Option<PathBuf>,
}

impl TryFrom<&Path> for ExpectedConfig {
    type Error = ExpectedError;

    ///
    /// Read a config file. Relative paths inside it are taken relative to the
    /// directory the file lives in.
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: ExpectedConfig = toml::from_str(&toml_str)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let rebase = |p: Option<PathBuf>| p.map(|p| if p.is_relative() { base.join(p) } else { p });

        Ok(ExpectedConfig {
            chrom_sizes: rebase(config.chrom_sizes),
            contacts: rebase(config.contacts),
            fragment_counts: rebase(config.fragment_counts),
            ..config
        })
    }
}

impl ExpectedConfig {
    ///
    /// Fill every unset field of `self` from `fallback`.
    ///
    pub fn or(self, fallback: ExpectedConfig) -> ExpectedConfig {
        ExpectedConfig {
            chrom_sizes: self.chrom_sizes.or(fallback.chrom_sizes),
            contacts: self.contacts.or(fallback.contacts),
            grid_size: self.grid_size.or(fallback.grid_size),
            normalization: self.normalization.or(fallback.normalization),
            unit: self.unit.or(fallback.unit),
            fragment_counts: self.fragment_counts.or(fallback.fragment_counts),
        }
    }

    pub fn is_fragment_mode(&self) -> bool {
        self.fragment_counts.is_some()
    }

    pub fn grid_size(&self) -> ExpectedResult<u32> {
        match self.grid_size {
            Some(0) | None => Err(ExpectedError::InvalidGridSize),
            Some(size) => Ok(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/expected/expected.toml");
        let config = ExpectedConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.grid_size, Some(100));
        assert_eq!(config.normalization, Some(NormalizationType::None));
        assert!(!config.is_fragment_mode());

        let chrom_sizes = config.chrom_sizes.unwrap();
        assert!(chrom_sizes.ends_with("test.chrom.sizes"));
        assert!(chrom_sizes.is_file());
    }

    #[rstest]
    fn test_unknown_field_rejected() {
        let result: Result<ExpectedConfig, _> = toml::from_str("bin_width = 5");
        assert!(result.is_err());
    }

    #[rstest]
    fn test_flags_override_file() {
        let flags = ExpectedConfig {
            grid_size: Some(500),
            ..Default::default()
        };
        let file = ExpectedConfig {
            grid_size: Some(100),
            unit: Some("BP".to_string()),
            ..Default::default()
        };

        let merged = flags.or(file);
        assert_eq!(merged.grid_size, Some(500));
        assert_eq!(merged.unit, Some("BP".to_string()));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(0))]
    fn test_missing_grid_size(#[case] grid_size: Option<u32>) {
        let config = ExpectedConfig {
            grid_size,
            ..Default::default()
        };
        assert!(matches!(config.grid_size(), Err(ExpectedError::InvalidGridSize)));
    }
}
