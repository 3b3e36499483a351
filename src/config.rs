//! Resolved configuration knobs. Library code never reads CLI args or
//! environment variables directly — each binary parses its own `clap`
//! arguments in `main` and builds one of these structs once, up front.

/// Knobs for index construction.
#[derive(Debug, Clone, Copy)]
pub struct IndexerConfig {
    /// Spill threshold: a block is written to disk once its distinct term
    /// count exceeds this value.
    pub max_block_size: usize,
    /// Dictionary lines read per side, per refill, during a pairwise merge.
    pub chunk_size: usize,
    /// Test mode: stop after `test_mode_file_cap` files have been fully
    /// processed (the cap is checked by count of files ingested, not bytes
    /// or lines).
    pub test_mode: bool,
    pub test_mode_file_cap: usize,
}

impl IndexerConfig {
    pub const DEFAULT_BLOCK_SIZE: usize = 3500;
    pub const TEST_BLOCK_SIZE: usize = 350;
    pub const TEST_FILE_CAP: usize = 100;

    pub fn normal() -> Self {
        let max_block_size = Self::DEFAULT_BLOCK_SIZE;
        IndexerConfig {
            max_block_size,
            chunk_size: std::cmp::max(1, max_block_size / 2),
            test_mode: false,
            test_mode_file_cap: Self::TEST_FILE_CAP,
        }
    }

    pub fn test() -> Self {
        let max_block_size = Self::TEST_BLOCK_SIZE;
        IndexerConfig {
            max_block_size,
            chunk_size: std::cmp::max(1, max_block_size / 2),
            test_mode: true,
            test_mode_file_cap: Self::TEST_FILE_CAP,
        }
    }

    /// Overrides the block size (and, unless already overridden, the chunk
    /// size derived from it) with an explicit value.
    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self.chunk_size = std::cmp::max(1, max_block_size / 2);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Knobs for query evaluation.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub max_query_len: usize,
}

impl SearchConfig {
    pub const DEFAULT_MAX_QUERY_LEN: usize = 1024;
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_query_len: Self::DEFAULT_MAX_QUERY_LEN,
        }
    }
}
