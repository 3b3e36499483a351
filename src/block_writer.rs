//! Block writer: spills a [`BlockIndex`] to a dictionary/postings file pair,
//! sorted by term.

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::block::BlockIndex;
use crate::error::Result;

/// Writes `index` to `dict_path`/`postings_path`. Dictionary lines are
/// `term doc_freq postings_line_number\n`; postings lines are
/// comma-separated ascending doc IDs, in the same order as the dictionary
/// (so postings line `n` backs the dictionary entry with
/// `postings_line_number = n`, 1-based).
pub fn write_block(
    index: &BlockIndex,
    dict_path: impl AsRef<Path>,
    postings_path: impl AsRef<Path>,
) -> Result<()> {
    let mut dict_out = BufWriter::new(std::fs::File::create(dict_path)?);
    let mut postings_out = BufWriter::new(std::fs::File::create(postings_path)?);

    for (line_number, (term, entry)) in index.iter().enumerate() {
        writeln!(dict_out, "{} {} {}", term, entry.doc_freq, line_number + 1)?;

        let postings_line = entry
            .postings
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(postings_out, "{}", postings_line)?;
    }

    dict_out.flush()?;
    postings_out.flush()?;
    Ok(())
}
