//! End-to-end scenarios driving the full pipeline: write a tiny corpus to
//! disk, run construction, then run the query driver over a queries file
//! and assert on the result lines it produces.

use blockdex::config::{IndexerConfig, SearchConfig};
use blockdex::dictionary::FinalDictionary;
use blockdex::indexing::{build_index, NullProgress};
use blockdex::query::run_queries;
use tempfile::TempDir;

struct Built {
    #[allow(dead_code)]
    work: TempDir,
    dict_path: std::path::PathBuf,
    postings_path: std::path::PathBuf,
}

fn build_corpus(docs: &[(u32, &str)], config: IndexerConfig) -> Built {
    let corpus = TempDir::new().unwrap();
    for (doc_id, text) in docs {
        std::fs::write(corpus.path().join(doc_id.to_string()), text).unwrap();
    }

    let work = TempDir::new().unwrap();
    let dict_dir = work.path().join("dict_blocks");
    let postings_dir = work.path().join("postings_blocks");
    let dict_path = work.path().join("dictionary.txt");
    let postings_path = work.path().join("postings.txt");

    build_index(
        &config,
        corpus.path(),
        &dict_dir,
        &postings_dir,
        &dict_path,
        &postings_path,
        &mut NullProgress,
    )
    .unwrap();

    Built {
        work,
        dict_path,
        postings_path,
    }
}

fn run(built: &Built, queries: &[&str]) -> Vec<String> {
    let dict = FinalDictionary::load(&built.dict_path).unwrap();
    let queries_path = built.work.path().join("queries.txt");
    let output_path = built.work.path().join("results.txt");
    std::fs::write(&queries_path, queries.join("\n") + "\n").unwrap();

    run_queries(&dict, &built.postings_path, &queries_path, &output_path, &SearchConfig::default()).unwrap();

    std::fs::read_to_string(&output_path)
        .unwrap()
        .lines()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn scenario_1_cat_dog() {
    let built = build_corpus(&[(1, "cat dog"), (2, "dog"), (3, "cat")], IndexerConfig::default());
    let results = run(&built, &["cat AND dog", "cat OR dog", "NOT cat"]);
    assert_eq!(results, vec!["1", "1 2 3", "2"]);
}

#[test]
fn scenario_2_skip_pointer_list_of_length_twenty() {
    let docs: Vec<(u32, &'static str)> = (1..=20).map(|id| (id, "a")).collect();
    let built = build_corpus(&docs, IndexerConfig::default());
    let results = run(&built, &["a"]);
    assert_eq!(results, vec!["1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20"]);

    let postings = std::fs::read_to_string(&built.postings_path).unwrap();
    let first_line = postings.lines().next().unwrap();
    assert!(first_line.starts_with("(1,4) "), "expected skip interval 4 at position 0, got {first_line:?}");
}

#[test]
fn scenario_3_disjoint_terms() {
    let built = build_corpus(&[(1, "x"), (2, "y")], IndexerConfig::default());
    let results = run(&built, &["x AND y", "x OR y"]);
    assert_eq!(results, vec!["", "1 2"]);
}

#[test]
fn scenario_4_dangling_operator_is_invalid() {
    let built = build_corpus(&[(1, "x")], IndexerConfig::default());
    let results = run(&built, &["x AND"]);
    assert_eq!(results, vec!["INVALID QUERY"]);
}

#[test]
fn scenario_5_oversize_query_is_blank() {
    let built = build_corpus(&[(1, "x")], IndexerConfig::default());
    let huge = "x ".repeat(1001);
    let results = run(&built, &[&huge]);
    assert_eq!(results, vec![""]);
}

#[test]
fn scenario_6_block_spill_matches_unspilled_build() {
    let docs = [(1, "a b"), (2, "c d"), (3, "e f")];
    let spilled = build_corpus(&docs, IndexerConfig::default().with_max_block_size(2));
    let single = build_corpus(&docs, IndexerConfig::default().with_max_block_size(1000));

    let spilled_dict = std::fs::read_to_string(&spilled.dict_path).unwrap();
    let single_dict = std::fs::read_to_string(&single.dict_path).unwrap();
    assert_eq!(spilled_dict, single_dict);

    let spilled_postings = std::fs::read_to_string(&spilled.postings_path).unwrap();
    let single_postings = std::fs::read_to_string(&single.postings_path).unwrap();
    assert_eq!(spilled_postings, single_postings);
}

#[test]
fn missing_term_yields_empty_result_not_invalid() {
    let built = build_corpus(&[(1, "cat")], IndexerConfig::default());
    let results = run(&built, &["ghost"]);
    assert_eq!(results, vec![""]);
}

#[test]
fn parenthesized_query_overrides_precedence() {
    let built = build_corpus(&[(1, "cat dog"), (2, "dog"), (3, "fox")], IndexerConfig::default());
    let results = run(&built, &["(cat OR fox) AND dog"]);
    assert_eq!(results, vec!["1"]);
}
