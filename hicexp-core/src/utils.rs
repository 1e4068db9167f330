use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::{CoreError, CoreResult};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> CoreResult<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)
        .map_err(|e| CoreError::FileOpenError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> CoreResult<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

///
/// Read `name<whitespace>value` lines, keeping file order. Blank lines and
/// lines starting with `#` are skipped; extra columns are ignored.
///
pub fn read_name_value_pairs<R: BufRead>(reader: R) -> CoreResult<Vec<(String, u64)>> {
    let mut pairs = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let name = fields.next().ok_or_else(|| CoreError::ChromSizesParse {
            line: i + 1,
            reason: "missing name".to_string(),
        })?;
        let value = fields
            .next()
            .ok_or_else(|| CoreError::ChromSizesParse {
                line: i + 1,
                reason: format!("missing length for {}", name),
            })?
            .parse::<u64>()
            .map_err(|e| CoreError::ChromSizesParse {
                line: i + 1,
                reason: format!("invalid length for {}: {}", name, e),
            })?;

        pairs.push((name.to_string(), value));
    }

    Ok(pairs)
}

///
/// Read a restriction-fragment count file (`name<whitespace>count` per line)
/// into a name -> count map.
///
pub fn read_fragment_counts<T: AsRef<Path>>(path: T) -> CoreResult<HashMap<String, u64>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    Ok(read_name_value_pairs(reader)?.into_iter().collect())
}
