//! Vector-space retrieval over tagged (`.I/.T/.A/.B/.W`) document collections.
//!
//! Documents are indexed per field (title, abstract) into raw term counts,
//! weighted with TF-IDF and ranked against free-text queries by a boosted
//! cosine similarity.

pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod queries;
pub mod rank;
pub mod scorer;
pub mod tagged;
pub mod tokenizer;
pub mod weight;

pub use corpus::{CorpusReader, ParsedDocument};
pub use engine::{EngineConfig, IndexStats, SearchEngine};
pub use error::{Result, VsmError};
pub use index::{DocId, DocumentRecord, Field, FrequencyIndex, TermFieldFrequency};
pub use queries::{QueryRecord, QuerySet};
pub use rank::{RankedResult, RankingStore};
pub use scorer::{Boosts, QueryScorer};
pub use tokenizer::{Stem, Tokenizer};
pub use weight::{DocumentWeights, IdfVariant, WeightTables};
