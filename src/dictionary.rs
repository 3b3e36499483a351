//! Final dictionary: `term -> (doc_freq, byte_offset, byte_length)` plus the
//! universal doc-ID list, as read back by the query driver.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::postings::{annotate, Posting};

#[derive(Debug, Clone, Copy)]
pub struct DictEntry {
    pub doc_freq: u32,
    pub byte_offset: u64,
    pub byte_length: u64,
}

/// The final dictionary file, loaded into memory once and never mutated by
/// the query driver.
pub struct FinalDictionary {
    entries: BTreeMap<String, DictEntry>,
    universal: Vec<Posting>,
}

impl FinalDictionary {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let mut lines = reader.lines();

        let header = lines.next().transpose()?.unwrap_or_default();
        let doc_ids: Vec<u32> = header
            .split_whitespace()
            .map(|s| s.parse().unwrap_or_default())
            .collect();
        let universal = annotate(doc_ids);

        let mut entries = BTreeMap::new();
        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(4, ' ');
            let term = parts
                .next()
                .ok_or_else(|| IndexError::MalformedDictLine(line.clone()))?
                .to_string();
            let doc_freq: u32 = parts
                .next()
                .ok_or_else(|| IndexError::MalformedDictLine(line.clone()))?
                .parse()
                .map_err(|_| IndexError::MalformedDictLine(line.clone()))?;
            let byte_offset: u64 = parts
                .next()
                .ok_or_else(|| IndexError::MalformedDictLine(line.clone()))?
                .parse()
                .map_err(|_| IndexError::MalformedDictLine(line.clone()))?;
            let byte_length: u64 = parts
                .next()
                .ok_or_else(|| IndexError::MalformedDictLine(line.clone()))?
                .parse()
                .map_err(|_| IndexError::MalformedDictLine(line.clone()))?;

            entries.insert(
                term,
                DictEntry {
                    doc_freq,
                    byte_offset,
                    byte_length,
                },
            );
        }

        Ok(FinalDictionary { entries, universal })
    }

    pub fn lookup(&self, term: &str) -> Option<&DictEntry> {
        self.entries.get(term)
    }

    pub fn universal(&self) -> &[Posting] {
        &self.universal
    }

    pub fn term_count(&self) -> usize {
        self.entries.len()
    }
}
