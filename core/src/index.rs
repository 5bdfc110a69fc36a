//! Term → posting-list inverted index.
//!
//! Doc ids are dense ordinals handed out in first-seen order; the `documents`
//! vector maps them back to URLs. Posting lists stay strictly ascending in
//! doc id with every frequency at least 1.

use crate::strmap::StringMap;

pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub frequency: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    pub postings: Vec<Posting>,
}

impl PostingList {
    /// Record one more occurrence of the owning term in `doc_id`.
    ///
    /// Ingest walks documents in ascending ordinal order, so the common case
    /// is hitting the last posting or appending. A repeated corpus URL can
    /// resolve to an older ordinal; that occurrence merges into its existing
    /// slot instead of breaking the ascending invariant.
    pub fn add(&mut self, doc_id: DocId) {
        if let Some(last) = self.postings.last_mut() {
            if last.doc_id == doc_id {
                last.frequency += 1;
                return;
            }
            if doc_id > last.doc_id {
                self.postings.push(Posting {
                    doc_id,
                    frequency: 1,
                });
                return;
            }
            match self
                .postings
                .binary_search_by_key(&doc_id, |p| p.doc_id)
            {
                Ok(i) => self.postings[i].frequency += 1,
                Err(i) => self.postings.insert(
                    i,
                    Posting {
                        doc_id,
                        frequency: 1,
                    },
                ),
            }
        } else {
            self.postings.push(Posting {
                doc_id,
                frequency: 1,
            });
        }
    }

    /// Frequency of the term in `doc_id`, or 0 when the document is absent.
    pub fn frequency_of(&self, doc_id: DocId) -> u32 {
        match self
            .postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
        {
            Ok(i) => self.postings[i].frequency,
            Err(_) => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn doc_ids(&self) -> Vec<DocId> {
        self.postings.iter().map(|p| p.doc_id).collect()
    }
}

#[derive(Default)]
pub struct InvertedIndex {
    documents: Vec<String>,
    postings: StringMap<PostingList>,
    doc_ordinals: StringMap<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordinal for `url`, appending it to the document table when new.
    fn resolve_doc(&mut self, url: &str) -> DocId {
        if let Some(&ordinal) = self.doc_ordinals.find(url) {
            return ordinal;
        }
        let ordinal = self.documents.len() as DocId;
        self.documents.push(url.to_string());
        self.doc_ordinals.insert(url, ordinal);
        ordinal
    }

    pub fn add_document(&mut self, url: &str, terms: &[String]) {
        let doc_id = self.resolve_doc(url);
        for term in terms {
            self.postings.get_or_create(term).add(doc_id);
        }
    }

    pub fn get_posting_list(&self, term: &str) -> Option<&PostingList> {
        self.postings.find(term)
    }

    /// URL stored at `ordinal`.
    pub fn get_doc_id(&self, ordinal: DocId) -> Option<&str> {
        self.documents.get(ordinal as usize).map(|s| s.as_str())
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    pub fn for_each_term<'a, F>(&'a self, f: F)
    where
        F: FnMut(&'a str, &'a PostingList),
    {
        self.postings.for_each(f);
    }

    /// Snapshot restore path: re-register a document at the next ordinal.
    pub(crate) fn push_document(&mut self, url: &str) -> DocId {
        self.resolve_doc(url)
    }

    /// Snapshot restore path: install a fully-formed posting list.
    pub(crate) fn insert_posting_list(&mut self, term: &str, list: PostingList) {
        self.postings.insert(term, list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_dense_ordinals_in_first_seen_order() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &["a".into(), "b".into()]);
        index.add_document("d2", &["b".into()]);
        assert_eq!(index.get_doc_id(0), Some("d1"));
        assert_eq!(index.get_doc_id(1), Some("d2"));
        assert_eq!(index.document_count(), 2);
        assert_eq!(index.vocabulary_size(), 2);
    }

    #[test]
    fn counts_repeated_terms() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &["x".into(), "x".into(), "y".into()]);
        let pl = index.get_posting_list("x").unwrap();
        assert_eq!(pl.postings, vec![Posting { doc_id: 0, frequency: 2 }]);
    }

    #[test]
    fn repeated_url_merges_into_existing_ordinal() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &["x".into()]);
        index.add_document("d2", &["x".into()]);
        index.add_document("d1", &["x".into()]);
        let pl = index.get_posting_list("x").unwrap();
        let ids: Vec<_> = pl.postings.iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(pl.frequency_of(0), 2);
        assert_eq!(index.document_count(), 2);
    }
}
