use std::collections::HashMap;
use std::path::Path;

use crate::errors::{CoreError, CoreResult};
use crate::models::chromosome::{CHR_ALL, Chromosome};
use crate::utils::{get_dynamic_reader, read_name_value_pairs};

///
/// An ordered set of chromosomes describing one genome assembly.
///
/// Index 0 is always the synthetic whole-genome entry; real chromosomes are
/// numbered from 1 in the order they were supplied.
///
#[derive(Clone, Debug)]
pub struct ChromosomeCatalog {
    chromosomes: Vec<Chromosome>,
    name_to_index: HashMap<String, u32>,
}

impl ChromosomeCatalog {
    ///
    /// Build a catalog from `(name, length)` pairs in genome order.
    ///
    /// A pair named `All` is treated as an explicit whole-genome entry and
    /// skipped; the catalog always synthesizes its own at index 0.
    ///
    pub fn new<I, S>(sizes: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut chromosomes = Vec::new();
        let mut name_to_index = HashMap::new();
        let mut genome_length: u64 = 0;

        for (name, length) in sizes {
            let name: String = name.into();
            if name.eq_ignore_ascii_case(CHR_ALL) {
                continue;
            }
            if name_to_index.contains_key(&name) {
                return Err(CoreError::DuplicateChromosome(name));
            }
            let index = chromosomes.len() as u32 + 1;
            name_to_index.insert(name.clone(), index);
            genome_length += length;
            chromosomes.push(Chromosome::new(index, name, length));
        }

        // whole-genome length is reported in kb, as in .hic headers
        let whole_genome = Chromosome::new(0, CHR_ALL, genome_length / 1000);
        name_to_index.insert(CHR_ALL.to_string(), 0);
        chromosomes.insert(0, whole_genome);

        Ok(ChromosomeCatalog {
            chromosomes,
            name_to_index,
        })
    }

    ///
    /// Create a new [ChromosomeCatalog] from a chrom.sizes file.
    ///
    /// # Arguments:
    /// - path: path to a (optionally gzipped) chrom.sizes file on disk.
    pub fn from_chrom_sizes<T: AsRef<Path>>(path: T) -> CoreResult<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;
        ChromosomeCatalog::new(read_name_value_pairs(reader)?)
    }

    pub fn get(&self, index: u32) -> Option<&Chromosome> {
        self.chromosomes.get(index as usize)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Chromosome> {
        self.name_to_index
            .get(name)
            .and_then(|index| self.get(*index))
    }

    ///
    /// Iterate every chromosome, whole-genome entry first.
    ///
    pub fn iter(&self) -> impl Iterator<Item = &Chromosome> {
        self.chromosomes.iter()
    }

    ///
    /// Iterate the real chromosomes, skipping the whole-genome entry.
    ///
    pub fn iter_chroms(&self) -> impl Iterator<Item = &Chromosome> {
        self.chromosomes.iter().filter(|chr| !chr.is_whole_genome())
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }
}
