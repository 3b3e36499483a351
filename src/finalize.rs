//! Finalizer: turns the last surviving merged block into the two durable
//! output artifacts — final postings file (with skip pointers) and final
//! dictionary file (with byte-offset pointers and the universal doc-ID
//! header).

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::merge::BlockPaths;

/// (a) Skip-pointer postings writer: rewrites each comma-separated
/// postings line into space-separated `(doc_id,skip_target)` tokens with
/// a trailing space before the newline.
fn write_skip_postings(merged_postings: &Path, out_postings: &Path) -> Result<()> {
    let reader = BufReader::new(std::fs::File::open(merged_postings)?);
    let mut writer = BufWriter::new(std::fs::File::create(out_postings)?);

    for line in reader.lines() {
        let line = line?;
        let ids: Vec<&str> = line.split(',').filter(|s| !s.is_empty()).collect();
        let len = ids.len();
        let skip_interval = if len >= 16 { (len as f64).sqrt() as usize } else { 0 };

        let mut out = String::new();
        for (i, id) in ids.iter().enumerate() {
            let skip_to = std::cmp::min(i + skip_interval, len.saturating_sub(1));
            out.push('(');
            out.push_str(id);
            out.push(',');
            out.push_str(&skip_to.to_string());
            out.push(')');
            out.push(' ');
        }
        writeln!(writer, "{out}")?;
    }

    writer.flush()?;
    Ok(())
}

/// (b) Dictionary byte-offset rewriter: walks the merged dictionary and
/// the already-finalized postings file in lockstep, replacing each
/// postings line number with a byte offset and length into the final
/// postings file.
fn write_offset_dict_entries(
    merged_dict: &Path,
    final_postings: &Path,
    mut sink: impl Write,
) -> Result<()> {
    let dict_reader = BufReader::new(std::fs::File::open(merged_dict)?);
    let postings_reader = BufReader::new(std::fs::File::open(final_postings)?);

    let mut offset: u64 = 0;
    for (dict_line, postings_line) in dict_reader.lines().zip(postings_reader.lines()) {
        let dict_line = dict_line?;
        let postings_line = postings_line?;

        let mut parts = dict_line.splitn(3, ' ');
        let term = parts
            .next()
            .ok_or_else(|| IndexError::MalformedDictLine(dict_line.clone()))?;
        let doc_freq = parts
            .next()
            .ok_or_else(|| IndexError::MalformedDictLine(dict_line.clone()))?;

        let length = postings_line.len() as u64 + 1; // + newline stripped by BufRead::lines
        writeln!(sink, "{term} {doc_freq} {offset} {length}")?;
        offset += length;
    }
    Ok(())
}

/// (c) Universal doc-ID header: the full corpus doc-ID list, ascending,
/// space-separated, as the first line of the final dictionary file.
fn format_universal_header(doc_ids: &[u32]) -> String {
    doc_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs all three finalization sub-steps, producing `out_dict` and
/// `out_postings` as the sole durable artifacts of construction.
pub fn finalize(
    merged: &BlockPaths,
    out_dict: &Path,
    out_postings: &Path,
    doc_ids: &[u32],
) -> Result<()> {
    write_skip_postings(&merged.postings, out_postings)?;

    let mut dict_out = BufWriter::new(std::fs::File::create(out_dict)?);
    writeln!(dict_out, "{}", format_universal_header(doc_ids))?;
    write_offset_dict_entries(&merged.dict, out_postings, &mut dict_out)?;
    dict_out.flush()?;

    Ok(())
}
