//! Error taxonomy for ingestion, lookup and scoring.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VsmError {
    /// The collection or query source could not be opened or read. Fatal for a run.
    #[error("cannot read {}: {source}", path.display())]
    Ingestion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Tag order violation in a tagged record file. Recoverable; reported as a diagnostic.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid boosts (title={title}, abstract={abstract_}): each must lie in [0, 1] and they must sum to 1")]
    InvalidBoost { title: f64, abstract_: f64 },

    #[error("unknown query id: {0}")]
    UnknownQueryId(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VsmError>;

impl VsmError {
    pub fn ingestion<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        VsmError::Ingestion { path: path.into(), source }
    }

    pub fn malformed<S: Into<String>>(line: usize, reason: S) -> Self {
        VsmError::MalformedRecord { line, reason: reason.into() }
    }

    /// Only unreadable input is fatal; every other condition leaves the engine usable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VsmError::Ingestion { .. } | VsmError::Io(_))
    }
}
