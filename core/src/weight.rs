//! TF-IDF weighting shared by documents and queries.
//!
//! `w(t, d) = (1 + ln tf) * idf(t)` with `idf = ln(N / df)` (or `ln(1 + N / df)`
//! when smoothed). Natural logarithms are used everywhere so document and query
//! vectors live in the same space.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::index::{DocId, Field, FrequencyIndex, TermFieldFrequency};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfVariant {
    /// ln(N / df)
    #[default]
    Standard,
    /// ln(1 + N / df)
    Smoothed,
}

impl IdfVariant {
    /// 0 when the term is unknown (`df == 0`) or the collection is empty.
    pub fn idf(self, num_docs: usize, df: usize) -> f64 {
        if df == 0 || num_docs == 0 { return 0.0; }
        let ratio = num_docs as f64 / df as f64;
        match self {
            IdfVariant::Standard => ratio.ln(),
            IdfVariant::Smoothed => (1.0 + ratio).ln(),
        }
    }
}

pub fn tf_weight(raw_tf: u32) -> f64 {
    if raw_tf > 0 { 1.0 + (raw_tf as f64).ln() } else { 0.0 }
}

pub fn tf_idf(raw_tf: u32, num_docs: usize, df: usize, idf: IdfVariant) -> f64 {
    tf_weight(raw_tf) * idf.idf(num_docs, df)
}

/// Per-document TF-IDF weights for one field: doc id -> term -> weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentWeights {
    docs: BTreeMap<DocId, BTreeMap<String, f64>>,
}

impl DocumentWeights {
    /// Recomputes every weight from scratch; identical inputs give identical output.
    pub fn compute(freqs: &TermFieldFrequency, num_docs: usize, idf: IdfVariant) -> Self {
        let mut docs: BTreeMap<DocId, BTreeMap<String, f64>> = BTreeMap::new();
        for (term, postings) in freqs.iter() {
            let df = postings.len();
            for (&doc_id, &raw_tf) in postings {
                docs.entry(doc_id).or_default().insert(term.to_string(), tf_idf(raw_tf, num_docs, df, idf));
            }
        }
        Self { docs }
    }

    pub fn get(&self, doc_id: DocId, term: &str) -> Option<f64> {
        self.docs.get(&doc_id).and_then(|terms| terms.get(term)).copied()
    }

    /// Stored weight, or 0 when the document lacks the term.
    pub fn weight(&self, doc_id: DocId, term: &str) -> f64 { self.get(doc_id, term).unwrap_or(0.0) }

    pub fn terms(&self, doc_id: DocId) -> Option<&BTreeMap<String, f64>> { self.docs.get(&doc_id) }
}

/// Weight tables for both fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTables {
    title: DocumentWeights,
    abstract_: DocumentWeights,
}

impl WeightTables {
    pub fn compute(index: &FrequencyIndex, num_docs: usize, idf: IdfVariant) -> Self {
        Self {
            title: DocumentWeights::compute(index.field(Field::Title), num_docs, idf),
            abstract_: DocumentWeights::compute(index.field(Field::Abstract), num_docs, idf),
        }
    }

    pub fn field(&self, field: Field) -> &DocumentWeights {
        match field {
            Field::Title => &self.title,
            Field::Abstract => &self.abstract_,
        }
    }
}
