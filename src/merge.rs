//! Pairwise external merger: repeatedly merges the two oldest blocks into a
//! new block until a single block remains.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};

/// On-disk location of one block's dictionary/postings file pair.
#[derive(Debug, Clone)]
pub struct BlockPaths {
    pub dict: PathBuf,
    pub postings: PathBuf,
}

impl BlockPaths {
    /// `dict_dir` and `postings_dir` are the two auxiliary directories used
    /// during construction — intermediate dictionary and postings block
    /// files are kept apart so each can be purged independently at build
    /// start.
    pub fn new(dict_dir: &Path, postings_dir: &Path, block_number: usize) -> Self {
        BlockPaths {
            dict: dict_dir.join(format!("block_{block_number}.txt")),
            postings: postings_dir.join(format!("block_{block_number}.txt")),
        }
    }
}

/// One parsed dictionary-line head: term, doc frequency, and the postings
/// line that goes with it (already read — the postings and dictionary
/// files are consumed in lockstep, so a random-access pointer is
/// unnecessary; see design notes).
struct Head {
    term: String,
    doc_freq: u32,
    postings_line: String,
}

/// Reads a block's dictionary and postings files in parallel chunks, to
/// bound the merger's working set to `O(chunk_size)` lines from this side.
struct ChunkSource {
    dict_lines: Lines<BufReader<std::fs::File>>,
    postings_lines: Lines<BufReader<std::fs::File>>,
    chunk_size: usize,
    chunk: VecDeque<Head>,
}

impl ChunkSource {
    fn open(paths: &BlockPaths, chunk_size: usize) -> Result<Self> {
        let dict_lines = BufReader::new(std::fs::File::open(&paths.dict)?).lines();
        let postings_lines = BufReader::new(std::fs::File::open(&paths.postings)?).lines();
        let mut source = ChunkSource {
            dict_lines,
            postings_lines,
            chunk_size,
            chunk: VecDeque::new(),
        };
        source.refill()?;
        Ok(source)
    }

    fn refill(&mut self) -> Result<()> {
        while self.chunk.len() < self.chunk_size {
            let Some(dict_line) = self.dict_lines.next().transpose()? else {
                break;
            };
            let Some(postings_line) = self.postings_lines.next().transpose()? else {
                break;
            };
            let mut parts = dict_line.splitn(3, ' ');
            let term = parts
                .next()
                .ok_or_else(|| IndexError::MalformedBlockLine(dict_line.clone()))?
                .to_string();
            let doc_freq: u32 = parts
                .next()
                .ok_or_else(|| IndexError::MalformedBlockLine(dict_line.clone()))?
                .parse()
                .map_err(|_| IndexError::MalformedBlockLine(dict_line.clone()))?;
            self.chunk.push_back(Head {
                term,
                doc_freq,
                postings_line,
            });
        }
        Ok(())
    }

    fn peek_term(&mut self) -> Result<Option<&str>> {
        if self.chunk.is_empty() {
            self.refill()?;
        }
        Ok(self.chunk.front().map(|h| h.term.as_str()))
    }

    fn pop(&mut self) -> Result<Option<Head>> {
        if self.chunk.is_empty() {
            self.refill()?;
        }
        let head = self.chunk.pop_front();
        if self.chunk.is_empty() {
            self.refill()?;
        }
        Ok(head)
    }
}

/// Merges ascending, comma-separated doc-ID lines, deduplicating IDs that
/// appear in both (a document can straddle a block boundary when a spill
/// is triggered mid-document, so the same term/doc pair can surface from
/// two blocks).
fn merge_postings_lines(a: &str, b: &str) -> String {
    let parse = |s: &str| -> Vec<u32> {
        s.split(',').filter(|t| !t.is_empty()).map(|t| t.parse().unwrap_or_default()).collect()
    };
    let ids_a = parse(a);
    let ids_b = parse(b);
    let mut merged = Vec::with_capacity(ids_a.len() + ids_b.len());
    let (mut i, mut j) = (0, 0);
    while i < ids_a.len() && j < ids_b.len() {
        match ids_a[i].cmp(&ids_b[j]) {
            std::cmp::Ordering::Less => {
                merged.push(ids_a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(ids_b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(ids_a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&ids_a[i..]);
    merged.extend_from_slice(&ids_b[j..]);
    merged.into_iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

/// Buffered output writer, flushed in chunks to amortize I/O.
struct ChunkSink {
    dict_out: BufWriter<std::fs::File>,
    postings_out: BufWriter<std::fs::File>,
    chunk_size: usize,
    dict_buf: Vec<String>,
    postings_buf: Vec<String>,
}

impl ChunkSink {
    fn create(paths: &BlockPaths, chunk_size: usize) -> Result<Self> {
        Ok(ChunkSink {
            dict_out: BufWriter::new(std::fs::File::create(&paths.dict)?),
            postings_out: BufWriter::new(std::fs::File::create(&paths.postings)?),
            chunk_size,
            dict_buf: Vec::new(),
            postings_buf: Vec::new(),
        })
    }

    fn push(&mut self, term: &str, doc_freq: u32, line_number: usize, postings_line: &str) -> Result<()> {
        self.dict_buf.push(format!("{term} {doc_freq} {line_number}\n"));
        self.postings_buf.push(format!("{postings_line}\n"));
        if self.dict_buf.len() >= self.chunk_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        for line in self.dict_buf.drain(..) {
            self.dict_out.write_all(line.as_bytes())?;
        }
        for line in self.postings_buf.drain(..) {
            self.postings_out.write_all(line.as_bytes())?;
        }
        self.dict_out.flush()?;
        self.postings_out.flush()?;
        Ok(())
    }
}

/// Merges two blocks into `out`, rewriting postings line numbers to match
/// the output's position.
pub fn merge_pair(a: &BlockPaths, b: &BlockPaths, out: &BlockPaths, chunk_size: usize) -> Result<()> {
    let mut src_a = ChunkSource::open(a, chunk_size)?;
    let mut src_b = ChunkSource::open(b, chunk_size)?;
    let mut sink = ChunkSink::create(out, chunk_size)?;

    let mut next_index = 1usize;

    loop {
        let term_a = src_a.peek_term()?.map(|s| s.to_string());
        let term_b = src_b.peek_term()?.map(|s| s.to_string());

        match (term_a, term_b) {
            (Some(ta), Some(tb)) => {
                if ta < tb {
                    let head = src_a.pop()?.unwrap();
                    sink.push(&head.term, head.doc_freq, next_index, &head.postings_line)?;
                } else if ta > tb {
                    let head = src_b.pop()?.unwrap();
                    sink.push(&head.term, head.doc_freq, next_index, &head.postings_line)?;
                } else {
                    let head_a = src_a.pop()?.unwrap();
                    let head_b = src_b.pop()?.unwrap();
                    let merged_postings = merge_postings_lines(&head_a.postings_line, &head_b.postings_line);
                    let doc_freq = merged_postings.split(',').filter(|t| !t.is_empty()).count() as u32;
                    sink.push(&head_a.term, doc_freq, next_index, &merged_postings)?;
                }
                next_index += 1;
            }
            (Some(_), None) => {
                let head = src_a.pop()?.unwrap();
                sink.push(&head.term, head.doc_freq, next_index, &head.postings_line)?;
                next_index += 1;
            }
            (None, Some(_)) => {
                let head = src_b.pop()?.unwrap();
                sink.push(&head.term, head.doc_freq, next_index, &head.postings_line)?;
                next_index += 1;
            }
            (None, None) => break,
        }
    }

    sink.flush()?;
    Ok(())
}

/// Drives the FIFO pairwise merge over `blocks` until a single block
/// remains, deleting consumed source files as it goes. Returns the final
/// block's paths.
pub fn merge_all(
    mut blocks: VecDeque<BlockPaths>,
    dict_dir: &Path,
    postings_dir: &Path,
    chunk_size: usize,
) -> Result<BlockPaths> {
    if blocks.is_empty() {
        let empty = BlockPaths::new(dict_dir, postings_dir, 0);
        std::fs::File::create(&empty.dict)?;
        std::fs::File::create(&empty.postings)?;
        return Ok(empty);
    }

    let mut next_block_number = blocks.len();
    while blocks.len() > 1 {
        let a = blocks.pop_front().unwrap();
        let b = blocks.pop_front().unwrap();
        let merged = BlockPaths::new(dict_dir, postings_dir, next_block_number);
        merge_pair(&a, &b, &merged, chunk_size)?;

        let _ = std::fs::remove_file(&a.dict);
        let _ = std::fs::remove_file(&a.postings);
        let _ = std::fs::remove_file(&b.dict);
        let _ = std::fs::remove_file(&b.postings);

        blocks.push_back(merged);
        next_block_number += 1;
    }

    Ok(blocks.pop_front().unwrap())
}
