//! The engine ties the pipeline together: tokenize each document, stem every
//! token, feed the Zipf histogram and the inverted index. Built once, read
//! concurrently afterwards; rebuilding means constructing a fresh `Engine`
//! and publishing it, never mutating in place.

use crate::corpus::Document;
use crate::index::InvertedIndex;
use crate::query::{self, ScoredDoc};
use crate::stemmer::stem;
use crate::strmap::StringMap;
use crate::tokenizer::tokenize;
use crate::zipf::ZipfAnalyzer;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct Metadata {
    pub total_tokens: u64,
    pub index_time_ms: u64,
}

pub struct Engine {
    pub documents: Vec<Document>,
    pub index: InvertedIndex,
    pub zipf: ZipfAnalyzer,
    pub doc_lookup: StringMap<usize>,
    pub metadata: Metadata,
}

fn build_lookup(documents: &[Document]) -> StringMap<usize> {
    let mut lookup = StringMap::new();
    for (i, doc) in documents.iter().enumerate() {
        lookup.insert(&doc.url, i);
    }
    lookup
}

impl Engine {
    pub fn build(documents: Vec<Document>) -> Engine {
        let started = Instant::now();
        let mut index = InvertedIndex::new();
        let mut zipf = ZipfAnalyzer::new();
        let mut total_tokens = 0u64;

        for (i, doc) in documents.iter().enumerate() {
            let tokens = tokenize(&doc.text);
            total_tokens += tokens.len() as u64;

            let mut terms = Vec::with_capacity(tokens.len());
            for token in &tokens {
                let term = stem(&token.text);
                zipf.add_term(&term);
                terms.push(term);
            }
            index.add_document(&doc.url, &terms);

            if (i + 1) % 500 == 0 {
                let elapsed = started.elapsed().as_secs_f64();
                tracing::info!(
                    indexed = i + 1,
                    total = documents.len(),
                    docs_per_sec = ((i + 1) as f64 / elapsed) as u64,
                    tokens = total_tokens,
                    vocabulary = index.vocabulary_size(),
                    "indexing progress"
                );
            }
        }

        let index_time_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            documents = index.document_count(),
            vocabulary = index.vocabulary_size(),
            total_tokens,
            seconds = index_time_ms as f64 / 1000.0,
            "indexing complete"
        );

        let doc_lookup = build_lookup(&documents);
        Engine {
            documents,
            index,
            zipf,
            doc_lookup,
            metadata: Metadata {
                total_tokens,
                index_time_ms,
            },
        }
    }

    /// Restore path used by the snapshot codec.
    pub(crate) fn from_parts(
        documents: Vec<Document>,
        index: InvertedIndex,
        zipf: ZipfAnalyzer,
        metadata: Metadata,
    ) -> Engine {
        let doc_lookup = build_lookup(&documents);
        Engine {
            documents,
            index,
            zipf,
            doc_lookup,
            metadata,
        }
    }

    pub fn search(&self, query: &str, max_results: usize) -> Vec<ScoredDoc> {
        query::search(&self.index, query, max_results)
    }

    pub fn document_by_url(&self, url: &str) -> Option<&Document> {
        self.doc_lookup.find(url).and_then(|&i| self.documents.get(i))
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.index.vocabulary_size()
    }
}
