//! Reader for the tagged query file (`.I` id, `.W` text) and the query lookup table.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde::Serialize;

use crate::error::{Result, VsmError};
use crate::tagged::{parse_numeric_id, parse_tag, Tag};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRecord {
    /// Three-digit, zero-padded id (`"001"`).
    pub id: String,
    pub text: String,
}

/// Canonical form of a query id: digits only, zero-padded to three places.
pub fn normalize_query_id(raw: &str) -> Option<String> {
    parse_numeric_id(raw).ok().map(|n| format!("{n:03}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryState {
    ExpectId,
    ExpectText,
    Text,
}

/// Parse a whole query file. Duplicate ids overwrite earlier ones.
pub fn read_queries<R: BufRead>(input: R) -> Result<(QuerySet, Vec<VsmError>)> {
    let mut set = QuerySet::new();
    let mut diagnostics = Vec::new();
    let mut state = QueryState::ExpectId;
    let mut current: Option<(String, Vec<String>)> = None;
    let mut report = |line: usize, reason: String| {
        tracing::warn!(line, %reason, "malformed query record");
        diagnostics.push(VsmError::malformed(line, reason));
    };

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        match parse_tag(&line) {
            Some((Tag::Id, rest)) => {
                if let Some((id, text)) = current.take() {
                    if state != QueryState::Text {
                        report(line_no, format!("query {id} has no .W text"));
                    }
                    set.insert(QueryRecord { id, text: join_text(&text) });
                }
                match parse_numeric_id(rest) {
                    Ok(id) => {
                        current = Some((format!("{id:03}"), Vec::new()));
                        state = QueryState::ExpectText;
                    }
                    Err(reason) => {
                        report(line_no, format!("query id {rest:?} {reason}; skipping query"));
                        state = QueryState::ExpectId;
                    }
                }
            }
            Some((Tag::Abstract, rest)) => {
                if current.is_none() {
                    report(line_no, ".W outside of any query".to_string());
                    continue;
                }
                state = QueryState::Text;
                if let Some((_, text)) = current.as_mut() {
                    if !rest.is_empty() { text.push(rest.to_string()); }
                }
            }
            Some((tag, _)) => report(line_no, format!("{tag} is not a query file tag")),
            None => match (state, current.as_mut()) {
                (QueryState::Text, Some((_, text))) => text.push(line.clone()),
                (QueryState::ExpectText, Some((id, _))) if !line.trim().is_empty() => {
                    let id = id.clone();
                    report(line_no, format!("text in query {id} before .W"));
                }
                _ => {}
            },
        }
    }

    if let Some((id, text)) = current.take() {
        set.insert(QueryRecord { id, text: join_text(&text) });
    }
    Ok((set, diagnostics))
}

fn join_text(lines: &[String]) -> String {
    lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    queries: BTreeMap<String, QueryRecord>,
}

impl QuerySet {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, record: QueryRecord) { self.queries.insert(record.id.clone(), record); }

    /// Accepts `"1"`, `"01"` or `"001"` for the same query.
    pub fn get(&self, id: &str) -> Option<&QueryRecord> {
        normalize_query_id(id).and_then(|key| self.queries.get(&key))
    }

    pub fn len(&self) -> usize { self.queries.len() }

    pub fn is_empty(&self) -> bool { self.queries.is_empty() }
}
