use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::corpus::ParsedDocument;
use crate::tokenizer::Tokenizer;

pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Abstract,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Title, Field::Abstract];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Abstract => "abstract",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocId,
    pub title_text: String,
}

/// Inverted raw counts for one field: term -> doc id -> occurrences (>= 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFieldFrequency {
    terms: BTreeMap<String, BTreeMap<DocId, u32>>,
}

impl TermFieldFrequency {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, term: &str, doc_id: DocId) {
        match self.terms.get_mut(term) {
            Some(postings) => *postings.entry(doc_id).or_insert(0) += 1,
            None => {
                self.terms.insert(term.to_string(), BTreeMap::from([(doc_id, 1)]));
            }
        }
    }

    pub fn count(&self, term: &str, doc_id: DocId) -> u32 {
        self.terms.get(term).and_then(|p| p.get(&doc_id)).copied().unwrap_or(0)
    }

    /// Number of distinct documents with the term; 0 for unknown terms.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, BTreeMap::len)
    }

    pub fn contains(&self, term: &str) -> bool { self.terms.contains_key(term) }

    pub fn vocabulary_size(&self) -> usize { self.terms.len() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<DocId, u32>)> {
        self.terms.iter().map(|(t, p)| (t.as_str(), p))
    }
}

/// Title and abstract frequency tables for a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyIndex {
    title: TermFieldFrequency,
    abstract_: TermFieldFrequency,
}

impl FrequencyIndex {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, field: Field, term: &str, doc_id: DocId) {
        self.field_mut(field).record(term, doc_id);
    }

    /// Tokenize both fields of a parsed document and count every stem.
    pub fn ingest(&mut self, tokenizer: &Tokenizer, doc: &ParsedDocument) {
        for term in tokenizer.normalize(&doc.title) {
            self.title.record(&term, doc.id);
        }
        for term in tokenizer.normalize(&doc.abstract_text) {
            self.abstract_.record(&term, doc.id);
        }
    }

    pub fn field(&self, field: Field) -> &TermFieldFrequency {
        match field {
            Field::Title => &self.title,
            Field::Abstract => &self.abstract_,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut TermFieldFrequency {
        match field {
            Field::Title => &mut self.title,
            Field::Abstract => &mut self.abstract_,
        }
    }
}
