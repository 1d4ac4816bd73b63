//! Boosted cosine similarity over the title and abstract fields.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Result, VsmError};
use crate::index::{DocId, DocumentRecord, Field, FrequencyIndex};
use crate::rank::{self, RankedResult};
use crate::tokenizer::Tokenizer;
use crate::weight::{tf_idf, IdfVariant, WeightTables};

/// Field mixing coefficients. Each lies in `[0, 1]` and they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Boosts {
    title: f64,
    abstract_: f64,
}

impl Boosts {
    const TOLERANCE: f64 = 1e-9;

    pub fn new(title: f64, abstract_: f64) -> Result<Self> {
        let in_range = |b: f64| b.is_finite() && (0.0..=1.0).contains(&b);
        if !in_range(title) || !in_range(abstract_) || (title + abstract_ - 1.0).abs() > Self::TOLERANCE {
            return Err(VsmError::InvalidBoost { title, abstract_ });
        }
        Ok(Self { title, abstract_ })
    }

    /// Title boost given; the abstract receives the remainder.
    pub fn from_title(title: f64) -> Result<Self> { Self::new(title, 1.0 - title) }

    pub fn title_only() -> Self { Self { title: 1.0, abstract_: 0.0 } }

    pub fn abstract_only() -> Self { Self { title: 0.0, abstract_: 1.0 } }

    pub fn title(&self) -> f64 { self.title }

    pub fn abstract_(&self) -> f64 { self.abstract_ }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title,
            Field::Abstract => self.abstract_,
        }
    }
}

impl Default for Boosts {
    fn default() -> Self { Self { title: 0.5, abstract_: 0.5 } }
}

/// `dot(a, b) / (|a| |b|)`, or 0 when either vector has zero norm.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { return 0.0; }
    dot / (norm_a * norm_b)
}

/// Unique query stems with their per-field TF-IDF weights, aligned by index.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    pub terms: Vec<String>,
    pub title: Vec<f64>,
    pub abstract_: Vec<f64>,
}

impl QueryVector {
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn field(&self, field: Field) -> &[f64] {
        match field {
            Field::Title => &self.title,
            Field::Abstract => &self.abstract_,
        }
    }
}

/// Read-only view over an indexed collection that scores free-text queries.
pub struct QueryScorer<'a> {
    tokenizer: &'a Tokenizer,
    documents: &'a BTreeMap<DocId, DocumentRecord>,
    frequencies: &'a FrequencyIndex,
    weights: &'a WeightTables,
    idf: IdfVariant,
}

impl<'a> QueryScorer<'a> {
    pub fn new(
        tokenizer: &'a Tokenizer,
        documents: &'a BTreeMap<DocId, DocumentRecord>,
        frequencies: &'a FrequencyIndex,
        weights: &'a WeightTables,
        idf: IdfVariant,
    ) -> Self {
        Self { tokenizer, documents, frequencies, weights, idf }
    }

    /// Terms missing from a field's vocabulary weigh 0 in that field.
    pub fn query_vector(&self, text: &str) -> QueryVector {
        let freqs = self.tokenizer.term_frequencies(text);
        let num_docs = self.documents.len();
        let weigh = |field: Field| -> Vec<f64> {
            let table = self.frequencies.field(field);
            freqs.iter().map(|(term, &tf)| tf_idf(tf, num_docs, table.document_frequency(term), self.idf)).collect()
        };
        QueryVector { title: weigh(Field::Title), abstract_: weigh(Field::Abstract), terms: freqs.into_keys().collect() }
    }

    pub fn similarity(&self, query: &QueryVector, doc_id: DocId, field: Field) -> f64 {
        let table = self.weights.field(field);
        let doc_vec: Vec<f64> = query.terms.iter().map(|t| table.weight(doc_id, t)).collect();
        cosine(query.field(field), &doc_vec)
    }

    /// Every document with a positive boosted score, in rank order.
    pub fn score(&self, text: &str, boosts: Boosts) -> Vec<RankedResult> {
        let query = self.query_vector(text);
        if query.is_empty() { return Vec::new(); }
        let mut results: Vec<RankedResult> = self
            .documents
            .keys()
            .filter_map(|&doc_id| {
                let score = Field::ALL
                    .iter()
                    .map(|&field| {
                        let boost = boosts.get(field);
                        if boost == 0.0 { 0.0 } else { boost * self.similarity(&query, doc_id, field) }
                    })
                    .sum::<f64>();
                (score > 0.0).then_some(RankedResult { score, document_id: doc_id })
            })
            .collect();
        results.sort_by(rank::compare);
        tracing::debug!(terms = query.terms.len(), hits = results.len(), "scored query");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boosts_must_sum_to_one() {
        assert!(Boosts::new(0.6, 0.5).is_err());
        assert!(Boosts::new(1.2, -0.2).is_err());
        assert!(Boosts::new(f64::NAN, 1.0).is_err());
        assert!(Boosts::new(0.3, 0.7).is_ok());
        assert!(Boosts::new(1.0, 0.0).is_ok());
        let b = Boosts::from_title(0.25).unwrap();
        assert_eq!(b.title(), 0.25);
        assert!((b.abstract_() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        assert!((cosine(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_with_zero_norm_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine(&[1.0, 1.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine(&[], &[]), 0.0);
    }
}
