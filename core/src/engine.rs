use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::corpus::CorpusReader;
use crate::error::{Result, VsmError};
use crate::index::{DocId, DocumentRecord, Field, FrequencyIndex};
use crate::queries::{read_queries, QuerySet};
use crate::rank::{RankedResult, RankingStore};
use crate::scorer::{Boosts, QueryScorer};
use crate::tokenizer::Tokenizer;
use crate::weight::{IdfVariant, WeightTables};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub idf: IdfVariant,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| VsmError::ingestion(path, e))?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub title_terms: usize,
    pub abstract_terms: usize,
    pub queries: usize,
    pub malformed_records: usize,
}

/// In-memory collection, query set and last search results.
///
/// Building replaces the whole index; a failed build leaves the previous one in place.
pub struct SearchEngine {
    config: EngineConfig,
    tokenizer: Tokenizer,
    documents: BTreeMap<DocId, DocumentRecord>,
    frequencies: FrequencyIndex,
    weights: WeightTables,
    queries: QuerySet,
    ranking: RankingStore,
    malformed_records: usize,
}

impl SearchEngine {
    pub fn new() -> Self { Self::with_config(EngineConfig::default()) }

    pub fn with_config(config: EngineConfig) -> Self { Self::with_tokenizer(Tokenizer::new(), config) }

    pub fn with_tokenizer(tokenizer: Tokenizer, config: EngineConfig) -> Self {
        Self {
            config,
            tokenizer,
            documents: BTreeMap::new(),
            frequencies: FrequencyIndex::new(),
            weights: WeightTables::default(),
            queries: QuerySet::new(),
            ranking: RankingStore::new(),
            malformed_records: 0,
        }
    }

    pub fn config(&self) -> EngineConfig { self.config }

    pub fn build_index<P: AsRef<Path>>(&mut self, path: P) -> Result<IndexStats> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| VsmError::ingestion(path, e))?;
        self.load_corpus(BufReader::new(file)).map_err(|e| match e {
            VsmError::Io(source) => VsmError::ingestion(path, source),
            other => other,
        })
    }

    pub fn load_corpus<R: BufRead>(&mut self, input: R) -> Result<IndexStats> {
        let started = Instant::now();
        let mut reader = CorpusReader::new(input);
        let mut documents = BTreeMap::new();
        let mut frequencies = FrequencyIndex::new();
        for parsed in &mut reader {
            let parsed = parsed?;
            frequencies.ingest(&self.tokenizer, &parsed);
            documents.insert(parsed.id, DocumentRecord { id: parsed.id, title_text: parsed.title });
        }
        let malformed_records = reader.diagnostics().len();

        self.documents = documents;
        self.frequencies = frequencies;
        self.malformed_records = malformed_records;
        self.reweight();
        self.ranking.clear();

        let stats = self.stats();
        tracing::info!(
            documents = stats.documents,
            title_terms = stats.title_terms,
            abstract_terms = stats.abstract_terms,
            malformed = malformed_records,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "indexed collection"
        );
        Ok(stats)
    }

    /// Recompute the weight tables from the current frequency tables.
    pub fn reweight(&mut self) {
        let started = Instant::now();
        self.weights = WeightTables::compute(&self.frequencies, self.documents.len(), self.config.idf);
        tracing::info!(
            documents = self.documents.len(),
            title_terms = self.frequencies.field(Field::Title).vocabulary_size(),
            abstract_terms = self.frequencies.field(Field::Abstract).vocabulary_size(),
            idf = ?self.config.idf,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "computed weights"
        );
    }

    pub fn build_queries<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| VsmError::ingestion(path, e))?;
        self.load_queries(BufReader::new(file)).map_err(|e| match e {
            VsmError::Io(source) => VsmError::ingestion(path, source),
            other => other,
        })
    }

    pub fn load_queries<R: BufRead>(&mut self, input: R) -> Result<usize> {
        let (queries, diagnostics) = read_queries(input)?;
        self.queries = queries;
        tracing::info!(queries = self.queries.len(), malformed = diagnostics.len(), "loaded queries");
        Ok(self.queries.len())
    }

    pub fn get_query(&self, id: &str) -> Option<&str> { self.queries.get(id).map(|q| q.text.as_str()) }

    pub fn query_or_err(&self, id: &str) -> Result<&str> {
        self.get_query(id).ok_or_else(|| VsmError::UnknownQueryId(id.to_string()))
    }

    pub fn queries(&self) -> &QuerySet { &self.queries }

    /// Score `text` against the collection, replacing the previous results.
    pub fn search(&mut self, text: &str, boosts: Boosts) -> &[RankedResult] {
        self.ranking.clear();
        let results = self.scorer().score(text, boosts);
        self.ranking.fill(results);
        self.ranking.as_slice()
    }

    pub fn search_query(&mut self, id: &str, boosts: Boosts) -> Result<&[RankedResult]> {
        let text = self.query_or_err(id)?.to_string();
        Ok(self.search(&text, boosts))
    }

    /// Leading results of the last search; `k` is clamped to `[1, documents]`.
    pub fn top_k(&self, k: usize) -> &[RankedResult] {
        let k = k.clamp(1, self.documents.len().max(1));
        self.ranking.top_k(k)
    }

    pub fn results(&self) -> &[RankedResult] { self.ranking.as_slice() }

    pub fn get_title(&self, id: DocId) -> Option<&str> { self.documents.get(&id).map(|d| d.title_text.as_str()) }

    pub fn num_documents(&self) -> usize { self.documents.len() }

    pub fn documents(&self) -> impl Iterator<Item = &DocumentRecord> { self.documents.values() }

    pub fn frequencies(&self) -> &FrequencyIndex { &self.frequencies }

    pub fn weights(&self) -> &WeightTables { &self.weights }

    pub fn scorer(&self) -> QueryScorer<'_> {
        QueryScorer::new(&self.tokenizer, &self.documents, &self.frequencies, &self.weights, self.config.idf)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.documents.len(),
            title_terms: self.frequencies.field(Field::Title).vocabulary_size(),
            abstract_terms: self.frequencies.field(Field::Abstract).vocabulary_size(),
            queries: self.queries.len(),
            malformed_records: self.malformed_records,
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self { Self::new() }
}
