//! Plain-text contact records.
//!
//! Each line is `chr1 pos1 chr2 pos2 [weight]`, whitespace separated. Lines
//! starting with `#` are skipped and a missing weight counts as 1.

use std::io::{BufRead, BufReader, Lines, Read};

use log::info;

use hicexp_core::models::ChromosomeCatalog;
use hicexp_core::utils::get_dynamic_reader_w_stdin;

use crate::accumulator::ExpectedValueAccumulator;
use crate::errors::{ExpectedError, ExpectedResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    pub chr1: String,
    pub pos1: u64,
    pub chr2: String,
    pub pos2: u64,
    pub weight: f64,
}

impl ContactRecord {
    ///
    /// Parse one contact line.
    ///
    /// # Arguments
    /// - line: the line, without its newline
    /// - line_number: 1-based line number used in error messages
    pub fn parse(line: &str, line_number: usize) -> ExpectedResult<ContactRecord> {
        let parse_err = |reason: String| ExpectedError::ContactParse {
            line: line_number,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(parse_err(format!(
                "expected at least 4 fields, found {}",
                fields.len()
            )));
        }

        let pos1 = fields[1]
            .parse::<u64>()
            .map_err(|e| parse_err(format!("invalid position '{}': {}", fields[1], e)))?;
        let pos2 = fields[3]
            .parse::<u64>()
            .map_err(|e| parse_err(format!("invalid position '{}': {}", fields[3], e)))?;
        let weight = match fields.get(4) {
            Some(w) => w
                .parse::<f64>()
                .map_err(|e| parse_err(format!("invalid weight '{}': {}", w, e)))?,
            None => 1.0,
        };

        Ok(ContactRecord {
            chr1: fields[0].to_string(),
            pos1,
            chr2: fields[2].to_string(),
            pos2,
            weight,
        })
    }

    pub fn is_intra(&self) -> bool {
        self.chr1 == self.chr2
    }
}

///
/// Iterator over the contact records of a reader.
///
pub struct ContactReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> ContactReader<R> {
    pub fn new(reader: R) -> Self {
        ContactReader {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl ContactReader<BufReader<Box<dyn Read>>> {
    ///
    /// Open a (optionally gzipped) contact file, or stdin when `path` is `-`.
    ///
    pub fn from_path(path: &str) -> ExpectedResult<Self> {
        Ok(ContactReader::new(get_dynamic_reader_w_stdin(path)?))
    }
}

impl<R: BufRead> Iterator for ContactReader<R> {
    type Item = ExpectedResult<ContactRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(ContactRecord::parse(trimmed, self.line_number));
        }
    }
}

/// Counts of how contact records were handled.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContactSummary {
    pub intra: u64,
    pub inter: u64,
    pub unknown: u64,
}

///
/// Feed intra-chromosomal contacts into an accumulator.
///
/// Inter-chromosomal records and records on chromosomes missing from the
/// catalog are counted and skipped. Positions are binned by the accumulator's
/// grid size.
///
/// # Errors
/// The first parse error, or [ExpectedError::PositionOutOfRange] for a position
/// past the end of its chromosome. Each record is checked before it is added,
/// but records ahead of the failing one have already been accumulated, so the
/// accumulator is only partially fed and should be discarded.
pub fn accumulate_contacts<I>(
    accumulator: &mut ExpectedValueAccumulator,
    catalog: &ChromosomeCatalog,
    records: I,
) -> ExpectedResult<ContactSummary>
where
    I: IntoIterator<Item = ExpectedResult<ContactRecord>>,
{
    let grid_size = accumulator.grid_size() as u64;
    let mut summary = ContactSummary::default();

    for record in records {
        let record = record?;

        if !record.is_intra() {
            summary.inter += 1;
            continue;
        }

        let Some(chr) = catalog.get_by_name(&record.chr1) else {
            summary.unknown += 1;
            continue;
        };
        let Some(length) = accumulator.resolved_length(chr.index) else {
            summary.unknown += 1;
            continue;
        };

        for position in [record.pos1, record.pos2] {
            if position > length {
                return Err(ExpectedError::PositionOutOfRange {
                    chr: chr.name.clone(),
                    position,
                    length,
                });
            }
        }

        accumulator.add_observation(
            chr.index,
            (record.pos1 / grid_size) as usize,
            (record.pos2 / grid_size) as usize,
            record.weight,
        );
        summary.intra += 1;
    }

    info!(
        "Accumulated {} intra-chromosomal contacts ({} inter-chromosomal, {} on unknown chromosomes skipped)",
        summary.intra, summary.inter, summary.unknown
    );

    Ok(summary)
}
