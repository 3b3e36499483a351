//! Query driver: evaluates one parsed query against a loaded dictionary and
//! postings file.

use std::io::{Read, Seek, SeekFrom};

use crate::config::SearchConfig;
use crate::dictionary::FinalDictionary;
use crate::error::Result;
use crate::parser::{to_postfix, PostfixToken};
use crate::postings::{and_postings, not_postings, or_postings, parse_postings_line, Posting};

/// Everything a query line can resolve to. Every variant is a valid thing
/// to print — there is no fallible `Result` here, because per-query
/// problems are recovered locally and turned into an output line instead of
/// propagated.
#[derive(Debug, PartialEq, Eq)]
pub enum QueryOutcome {
    Results(Vec<u32>),
    Invalid,
    Blank,
}

impl QueryOutcome {
    /// Renders the result line: space-separated ascending doc IDs, an empty
    /// line, or the literal `INVALID QUERY`.
    pub fn to_line(&self) -> String {
        match self {
            QueryOutcome::Blank => String::new(),
            QueryOutcome::Invalid => "INVALID QUERY".to_string(),
            QueryOutcome::Results(ids) => ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Reads the exact postings bytes for `term` from `postings_file` using
/// the dictionary's recorded byte offset/length, or an empty list if the
/// term is absent — a missing term is a lookup miss, not an error.
fn lookup_postings(
    term: &str,
    dict: &FinalDictionary,
    postings_file: &mut std::fs::File,
) -> Result<Vec<Posting>> {
    let Some(entry) = dict.lookup(term) else {
        return Ok(Vec::new());
    };

    postings_file.seek(SeekFrom::Start(entry.byte_offset))?;
    let mut buf = vec![0u8; entry.byte_length as usize];
    postings_file.read_exact(&mut buf)?;
    let line = String::from_utf8_lossy(&buf);
    Ok(parse_postings_line(&line))
}

/// Evaluates a single query line against `dict`/`postings_file`.
pub fn evaluate(
    line: &str,
    dict: &FinalDictionary,
    postings_file: &mut std::fs::File,
    config: &SearchConfig,
) -> Result<QueryOutcome> {
    if line.is_empty() || line.len() > config.max_query_len {
        return Ok(QueryOutcome::Blank);
    }

    let postfix = to_postfix(line);
    let mut stack: Vec<Vec<Posting>> = Vec::new();

    for token in postfix {
        match token {
            PostfixToken::Term(term) => {
                stack.push(lookup_postings(&term, dict, postings_file)?);
            }
            PostfixToken::And => {
                if stack.len() < 2 {
                    return Ok(QueryOutcome::Invalid);
                }
                let right = stack.pop().unwrap();
                let left = stack.pop().unwrap();
                stack.push(and_postings(&left, &right));
            }
            PostfixToken::Or => {
                if stack.len() < 2 {
                    return Ok(QueryOutcome::Invalid);
                }
                let right = stack.pop().unwrap();
                let left = stack.pop().unwrap();
                stack.push(or_postings(&left, &right));
            }
            PostfixToken::Not => {
                if stack.is_empty() {
                    return Ok(QueryOutcome::Invalid);
                }
                let operand = stack.pop().unwrap();
                stack.push(not_postings(&operand, dict.universal()));
            }
        }
    }

    if stack.len() != 1 {
        return Ok(QueryOutcome::Invalid);
    }

    let result = stack.pop().unwrap();
    Ok(QueryOutcome::Results(result.into_iter().map(|p| p.doc_id).collect()))
}

/// Runs every line of `queries_file` through [`evaluate`], writing one
/// result line per input line to `output_file` (truncated on open,
/// written incrementally so a crash mid-run leaves a line-aligned partial
/// result file).
pub fn run_queries(
    dict: &FinalDictionary,
    postings_path: &std::path::Path,
    queries_path: &std::path::Path,
    output_path: &std::path::Path,
    config: &SearchConfig,
) -> Result<()> {
    use std::io::{BufRead, BufWriter, Write};

    let mut postings_file = std::fs::File::open(postings_path)?;
    let queries = std::io::BufReader::new(std::fs::File::open(queries_path)?);
    let mut output = BufWriter::new(std::fs::File::create(output_path)?);

    for line in queries.lines() {
        let line = line?;
        let outcome = evaluate(&line, dict, &mut postings_file, config)?;
        writeln!(output, "{}", outcome.to_line())?;
        log::debug!("query {:?} -> {:?}", line, outcome);
    }

    output.flush()?;
    Ok(())
}
