//! Construction driver: ties together the in-memory block index, the block
//! writer, the pairwise merger, and the finalizer into the full ingest
//! pipeline. This is the library entry point the `indexer` binary calls
//! into; it owns nothing the binary itself needs to know about (aux
//! directories, block numbering, doc-ID collection are all internal).

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::block::BlockIndex;
use crate::block_writer::write_block;
use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};
use crate::finalize::finalize;
use crate::merge::{merge_all, BlockPaths};
use crate::tokenizer::tokenize;

/// One corpus entry: the numeric doc ID and the file it was read from.
struct CorpusFile {
    doc_id: u32,
    path: PathBuf,
}

/// Lists `input_dir`'s entries, parsing each file name as a decimal document
/// ID (the file name IS the document ID), and returns them sorted in
/// ascending numeric order. A file name that doesn't parse as a decimal
/// integer is a fatal error, not a silent skip. `WalkDir` is pinned to
/// depth 1 — the corpus directory is flat, this just reuses the
/// corpus-directory-walking idiom used elsewhere in this crate's ancestry
/// instead of bare `read_dir`.
fn list_corpus(input_dir: &Path) -> Result<Vec<CorpusFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name();
        let doc_id: u32 = name
            .to_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IndexError::InvalidDocId(name.to_os_string()))?;
        files.push(CorpusFile {
            doc_id,
            path: entry.path().to_path_buf(),
        });
    }
    files.sort_by_key(|f| f.doc_id);
    Ok(files)
}

/// Deletes and recreates `dir`, purging the auxiliary block directories at
/// the start of every build.
fn purge_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Spills `index` to a freshly numbered block under `dict_dir`/`postings_dir`
/// and clears it, returning the paths of the spilled block.
fn spill(index: &mut BlockIndex, dict_dir: &Path, postings_dir: &Path, block_number: usize) -> Result<BlockPaths> {
    let paths = BlockPaths::new(dict_dir, postings_dir, block_number);
    write_block(index, &paths.dict, &paths.postings)?;
    index.clear();
    log::debug!("spilled block {block_number} ({} terms)", paths.dict.display());
    Ok(paths)
}

/// Callback invoked once per corpus file finished, so the binary can drive
/// an `indicatif` progress bar without the library depending on it.
pub trait ProgressSink {
    fn on_file_done(&mut self, doc_id: u32);
}

/// A sink that does nothing; used when `-v`/progress display is off.
pub struct NullProgress;
impl ProgressSink for NullProgress {
    fn on_file_done(&mut self, _doc_id: u32) {}
}

/// Runs the full construction pipeline: ingest `input_dir` into spilled
/// blocks, pairwise-merge them down to one, then finalize into `out_dict`
/// and `out_postings`. `dict_dir`/`postings_dir` are the two auxiliary
/// scratch directories; they are purged before use.
pub fn build_index(
    config: &IndexerConfig,
    input_dir: &Path,
    dict_dir: &Path,
    postings_dir: &Path,
    out_dict: &Path,
    out_postings: &Path,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    purge_dir(dict_dir)?;
    purge_dir(postings_dir)?;

    let mut corpus = list_corpus(input_dir)?;
    if config.test_mode && corpus.len() > config.test_mode_file_cap {
        corpus.truncate(config.test_mode_file_cap);
    }
    log::info!("indexing {} documents from {}", corpus.len(), input_dir.display());

    let mut block_index = BlockIndex::new();
    let mut blocks: VecDeque<BlockPaths> = VecDeque::new();
    let mut doc_ids: Vec<u32> = Vec::with_capacity(corpus.len());
    let mut next_block_number = 0usize;

    for file in &corpus {
        let reader = std::io::BufReader::new(std::fs::File::open(&file.path)?);
        for line in reader.lines() {
            let line = line?;
            for term in tokenize(&line) {
                block_index.insert(&term, file.doc_id);
            }
            if block_index.size() > config.max_block_size {
                let paths = spill(&mut block_index, dict_dir, postings_dir, next_block_number)?;
                blocks.push_back(paths);
                next_block_number += 1;
            }
        }
        doc_ids.push(file.doc_id);
        progress.on_file_done(file.doc_id);
    }

    if !block_index.is_empty() {
        let paths = spill(&mut block_index, dict_dir, postings_dir, next_block_number)?;
        blocks.push_back(paths);
    }

    log::info!("merging {} blocks", blocks.len());
    let final_block = merge_all(blocks, dict_dir, postings_dir, config.chunk_size)?;

    log::info!("finalizing index -> {}", out_dict.display());
    finalize(&final_block, out_dict, out_postings, &doc_ids)?;

    let _ = std::fs::remove_file(&final_block.dict);
    let _ = std::fs::remove_file(&final_block.postings);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_doc(dir: &Path, doc_id: u32, text: &str) {
        std::fs::write(dir.join(doc_id.to_string()), text).unwrap();
    }

    #[test]
    fn scenario_cat_dog() {
        let corpus = TempDir::new().unwrap();
        write_doc(corpus.path(), 1, "cat dog");
        write_doc(corpus.path(), 2, "dog");
        write_doc(corpus.path(), 3, "cat");

        let work = TempDir::new().unwrap();
        let dict_dir = work.path().join("dict_blocks");
        let postings_dir = work.path().join("postings_blocks");
        let out_dict = work.path().join("dictionary.txt");
        let out_postings = work.path().join("postings.txt");

        let config = IndexerConfig::default();
        build_index(
            &config,
            corpus.path(),
            &dict_dir,
            &postings_dir,
            &out_dict,
            &out_postings,
            &mut NullProgress,
        )
        .unwrap();

        let dict = crate::dictionary::FinalDictionary::load(&out_dict).unwrap();
        assert_eq!(dict.universal().iter().map(|p| p.doc_id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let mut postings_file = std::fs::File::open(&out_postings).unwrap();
        let config = crate::config::SearchConfig::default();

        let and_result = crate::query::evaluate("cat AND dog", &dict, &mut postings_file, &config).unwrap();
        assert_eq!(and_result, crate::query::QueryOutcome::Results(vec![1]));

        let or_result = crate::query::evaluate("cat OR dog", &dict, &mut postings_file, &config).unwrap();
        assert_eq!(or_result, crate::query::QueryOutcome::Results(vec![1, 2, 3]));

        let not_result = crate::query::evaluate("NOT cat", &dict, &mut postings_file, &config).unwrap();
        assert_eq!(not_result, crate::query::QueryOutcome::Results(vec![2]));
    }

    #[test]
    fn block_spill_matches_single_block_build() {
        // 6 unique terms across 3 documents, forced to spill repeatedly with
        // MAX_BLOCK_SIZE=2, compared against a build with a block size
        // large enough to never spill.
        let corpus = TempDir::new().unwrap();
        write_doc(corpus.path(), 1, "ant bee");
        write_doc(corpus.path(), 2, "cat dog");
        write_doc(corpus.path(), 3, "fox owl");

        let build = |max_block_size: usize| -> (Vec<u32>, Vec<(String, u32)>) {
            let work = TempDir::new().unwrap();
            let dict_dir = work.path().join("dict_blocks");
            let postings_dir = work.path().join("postings_blocks");
            let out_dict = work.path().join("dictionary.txt");
            let out_postings = work.path().join("postings.txt");

            let config = IndexerConfig::default().with_max_block_size(max_block_size);
            build_index(
                &config,
                corpus.path(),
                &dict_dir,
                &postings_dir,
                &out_dict,
                &out_postings,
                &mut NullProgress,
            )
            .unwrap();

            let dict = crate::dictionary::FinalDictionary::load(&out_dict).unwrap();
            let universal: Vec<u32> = dict.universal().iter().map(|p| p.doc_id).collect();

            let mut terms_and_freqs = Vec::new();
            for term in ["ant", "bee", "cat", "dog", "fox", "owl"] {
                let entry = dict.lookup(term).unwrap();
                terms_and_freqs.push((term.to_string(), entry.doc_freq));
            }
            (universal, terms_and_freqs)
        };

        let spilled = build(2);
        let single = build(1000);
        assert_eq!(spilled, single);
    }
}
