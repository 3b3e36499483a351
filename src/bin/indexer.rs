//! `indexer` binary: builds a disk-backed inverted index from a corpus
//! directory via SPIMI-style block construction and pairwise external
//! merge.

use std::path::PathBuf;

use blockdex::config::IndexerConfig;
use blockdex::indexing::{build_index, NullProgress, ProgressSink};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

/// Builds a Boolean inverted index from a directory of documents named by
/// decimal document ID.
#[derive(Parser, Debug)]
#[command(name = "indexer", version, about)]
struct Cli {
    /// Corpus directory; each file name is a decimal document ID.
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    input: PathBuf,

    /// Final dictionary output path.
    #[arg(short = 'd', long = "dict", value_name = "FILE")]
    dict: PathBuf,

    /// Final postings output path.
    #[arg(short = 'p', long = "postings", value_name = "FILE")]
    postings: PathBuf,

    /// Test mode: small block size (350) and cap ingestion at the first
    /// 100 files in sorted doc-ID order.
    #[arg(short = 't', long = "test-mode")]
    test_mode: bool,

    /// Raise log verbosity and show a progress bar over the corpus.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Override the spill threshold (`MAX_BLOCK_SIZE`).
    #[arg(long = "max-block-size", value_name = "N")]
    max_block_size: Option<usize>,

    /// Override the merge chunk size; defaults to `max_block_size / 2`.
    #[arg(long = "chunk-size", value_name = "N")]
    chunk_size: Option<usize>,
}

struct BarProgress {
    bar: ProgressBar,
}

impl ProgressSink for BarProgress {
    fn on_file_done(&mut self, doc_id: u32) {
        self.bar.set_message(format!("doc {doc_id}"));
        self.bar.inc(1);
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let mut config = if cli.test_mode {
        IndexerConfig::test()
    } else {
        IndexerConfig::normal()
    };
    if let Some(max_block_size) = cli.max_block_size {
        config = config.with_max_block_size(max_block_size);
    }
    if let Some(chunk_size) = cli.chunk_size {
        config = config.with_chunk_size(chunk_size);
    }

    let blocks_dir = cli
        .dict
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .join(format!(
            "{}.blocks",
            cli.dict.file_name().and_then(|n| n.to_str()).unwrap_or("index")
        ));
    let dict_blocks = blocks_dir.join("dict");
    let postings_blocks = blocks_dir.join("postings");

    let file_count = std::fs::read_dir(&cli.input)
        .map(|it| it.filter_map(|e| e.ok()).count() as u64)
        .unwrap_or(0);

    let result = if cli.verbose {
        build_index(
            &config,
            &cli.input,
            &dict_blocks,
            &postings_blocks,
            &cli.dict,
            &cli.postings,
            &mut NullProgress,
        )
    } else {
        let bar = ProgressBar::new(file_count);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .unwrap(),
        );
        let mut sink = BarProgress { bar: bar.clone() };
        let result = build_index(
            &config,
            &cli.input,
            &dict_blocks,
            &postings_blocks,
            &cli.dict,
            &cli.postings,
            &mut sink,
        );
        bar.finish_with_message("done");
        result
    };

    if let Err(err) = result {
        eprintln!("indexer: {err}");
        std::process::exit(1);
    }

    let _ = std::fs::remove_dir_all(&blocks_dir);
}
