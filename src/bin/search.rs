//! `search` binary: evaluates a file of Boolean queries against a built
//! index.

use std::path::PathBuf;

use blockdex::config::SearchConfig;
use blockdex::dictionary::FinalDictionary;
use blockdex::query::run_queries;
use clap::Parser;

/// Evaluates Boolean queries (`AND`/`OR`/`NOT`/parentheses/words) against a
/// previously built dictionary/postings file pair.
#[derive(Parser, Debug)]
#[command(name = "search", version, about)]
struct Cli {
    /// Final dictionary file produced by `indexer`.
    #[arg(short = 'd', long = "dict", value_name = "FILE")]
    dict: PathBuf,

    /// Final postings file produced by `indexer`.
    #[arg(short = 'p', long = "postings", value_name = "FILE")]
    postings: PathBuf,

    /// File of queries, one per line.
    #[arg(short = 'q', long = "queries", value_name = "FILE")]
    queries: PathBuf,

    /// Output file; truncated on open, one result line per query line.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: PathBuf,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = SearchConfig::default();

    let dict = match FinalDictionary::load(&cli.dict) {
        Ok(dict) => dict,
        Err(err) => {
            eprintln!("search: failed to load dictionary {}: {err}", cli.dict.display());
            std::process::exit(1);
        }
    };

    log::info!("loaded dictionary with {} terms", dict.term_count());

    if let Err(err) = run_queries(&dict, &cli.postings, &cli.queries, &cli.output, &config) {
        eprintln!("search: {err}");
        std::process::exit(1);
    }
}
