use poisk_core::{Document, Engine};

fn doc(url: &str, text: &str) -> Document {
    Document {
        url: url.to_string(),
        title: url.to_uppercase(),
        text: text.to_string(),
    }
}

/// Three-document corpus used throughout: `роман` appears in d1 and d2
/// (twice in d2), `поэзия` in d1 and d3, `современная` only in d3.
fn build() -> Engine {
    Engine::build(vec![
        doc("d1", "Роман и поэзия"),
        doc("d2", "Роман, роман"),
        doc("d3", "Поэзия современная"),
    ])
}

fn urls(engine: &Engine, query: &str) -> Vec<String> {
    engine
        .search(query, 100)
        .into_iter()
        .map(|hit| hit.url)
        .collect()
}

#[test]
fn single_term_ranked_by_frequency() {
    let engine = build();
    let hits = engine.search("роман", 100);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].url, "d2");
    assert_eq!(hits[1].url, "d1");
    let idf = (3.0f64 / 2.0).log10();
    assert!((hits[0].score - 2.0 * idf).abs() < 1e-12);
    assert!((hits[1].score - idf).abs() < 1e-12);
}

#[test]
fn conjunction_intersects() {
    let engine = build();
    assert_eq!(urls(&engine, "роман && поэзия"), vec!["d1"]);
}

#[test]
fn disjunction_unites() {
    let engine = build();
    assert_eq!(urls(&engine, "роман || поэзия"), vec!["d1", "d2", "d3"]);
}

#[test]
fn negation_subtracts() {
    let engine = build();
    assert_eq!(urls(&engine, "роман && !поэзия"), vec!["d2"]);
}

#[test]
fn parenthesized_combination() {
    let engine = build();
    assert_eq!(
        urls(&engine, "(роман || современная) && !поэзия"),
        vec!["d2"]
    );
}

#[test]
fn russian_keyword_operators() {
    let engine = build();
    // "и" is the AND keyword, not a search term.
    assert_eq!(urls(&engine, "роман и поэзия"), vec!["d1"]);
    assert_eq!(urls(&engine, "роман или поэзия"), vec!["d1", "d2", "d3"]);
    assert_eq!(urls(&engine, "роман не поэзия"), vec!["d2"]);
}

#[test]
fn implicit_and_between_adjacent_words() {
    let engine = build();
    assert_eq!(urls(&engine, "роман поэзия"), vec!["d1"]);
}

#[test]
fn query_surface_forms_are_stemmed() {
    let engine = build();
    // Different inflection, same stem.
    assert_eq!(urls(&engine, "романы"), vec!["d2", "d1"]);
}

#[test]
fn leading_not_is_the_complement() {
    let engine = build();
    assert_eq!(urls(&engine, "!поэзия"), vec!["d2"]);
    assert_eq!(urls(&engine, "не роман"), vec!["d3"]);
}

#[test]
fn empty_and_operator_only_queries() {
    let engine = build();
    assert!(urls(&engine, "").is_empty());
    assert!(urls(&engine, "   \t ").is_empty());
    assert!(urls(&engine, "&& || !").is_empty());
}

#[test]
fn unknown_term_yields_nothing() {
    let engine = build();
    assert!(urls(&engine, "фонетика").is_empty());
    assert!(urls(&engine, "роман && фонетика").is_empty());
}

#[test]
fn truncation_caps_results() {
    let engine = build();
    let hits = engine.search("роман || поэзия", 1);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "d1");
}

#[test]
fn results_are_subset_of_corpus() {
    let engine = build();
    for query in ["роман", "!роман", "(поэзия) || !роман"] {
        for hit in engine.search(query, 100) {
            assert!(engine.document_by_url(&hit.url).is_some());
        }
    }
}

#[test]
fn posting_lists_ascend_with_positive_frequencies() {
    let engine = build();
    engine.index.for_each_term(|_, list| {
        for pair in list.postings.windows(2) {
            assert!(pair[0].doc_id < pair[1].doc_id);
        }
        for posting in &list.postings {
            assert!(posting.frequency >= 1);
        }
    });
}

#[test]
fn histogram_totals_match_index() {
    let engine = build();
    let mut posted = 0u64;
    engine.index.for_each_term(|_, list| {
        for posting in &list.postings {
            posted += posting.frequency as u64;
        }
    });
    assert_eq!(posted, engine.zipf.total_terms());
    assert_eq!(engine.zipf.total_terms(), engine.metadata.total_tokens);
    assert_eq!(engine.zipf.unique_terms(), engine.vocabulary_size());
}

#[test]
fn zipf_ranking_over_the_corpus() {
    let engine = build();
    let sorted = engine.zipf.get_sorted_terms();
    assert_eq!(sorted.len(), 3);
    assert_eq!(sorted[0].term, "рома");
    assert_eq!(sorted[0].frequency, 3);
    assert_eq!(sorted[0].rank, 1);
    assert_eq!(sorted[1].term, "поэз");
    assert_eq!(sorted[1].frequency, 2);
    assert_eq!(sorted[2].frequency, 1);
}
