use serde::Serialize;
use std::cmp::Ordering;

use crate::index::DocId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedResult {
    pub score: f64,
    pub document_id: DocId,
}

/// Descending score, ties broken by ascending document id.
pub fn compare(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.document_id.cmp(&b.document_id))
}

/// Results of the most recent search, kept in rank order. Equal scores never collapse.
#[derive(Debug, Clone, Default)]
pub struct RankingStore {
    results: Vec<RankedResult>,
}

impl RankingStore {
    pub fn new() -> Self { Self::default() }

    pub fn clear(&mut self) { self.results.clear(); }

    /// Replace the contents with `results`, ordered.
    pub fn fill(&mut self, mut results: Vec<RankedResult>) {
        results.sort_by(compare);
        self.results = results;
    }

    /// At most `k` leading results.
    pub fn top_k(&self, k: usize) -> &[RankedResult] { &self.results[..k.min(self.results.len())] }

    pub fn as_slice(&self) -> &[RankedResult] { &self.results }

    pub fn len(&self) -> usize { self.results.len() }

    pub fn is_empty(&self) -> bool { self.results.is_empty() }
}
