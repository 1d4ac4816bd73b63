//! Streaming reader for the tagged collection format.
//!
//! ```text
//! .I 1
//! .T
//! experimental investigation of the aerodynamics of a
//! wing in a slipstream .
//! .A
//! brenckmann,m.
//! .B
//! j. ae. scs. 25, 1958, 324.
//! .W
//! an experimental study of a wing in a propeller slipstream ...
//! ```
//!
//! Author and bibliography content is discarded. Any tag moves the machine to
//! the matching state, so a missing field never swallows the ones after it.

use std::io::{BufRead, Lines};

use crate::error::{Result, VsmError};
use crate::index::DocId;
use crate::tagged::{parse_numeric_id, parse_tag, Tag};

/// Fields extracted from one `.I` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub id: DocId,
    /// Title lines joined by single spaces, trimmed.
    pub title: String,
    /// Abstract lines joined by newlines.
    pub abstract_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    ExpectId,
    ExpectTag,
    Title,
    Author,
    Bibliography,
    Abstract,
}

impl ReaderState {
    fn rank(self) -> u8 {
        match self {
            ReaderState::ExpectId | ReaderState::ExpectTag => 0,
            ReaderState::Title => 1,
            ReaderState::Author => 2,
            ReaderState::Bibliography => 3,
            ReaderState::Abstract => 4,
        }
    }

    fn for_tag(tag: Tag) -> Self {
        match tag {
            Tag::Id => ReaderState::ExpectTag,
            Tag::Title => ReaderState::Title,
            Tag::Author => ReaderState::Author,
            Tag::Bibliography => ReaderState::Bibliography,
            Tag::Abstract => ReaderState::Abstract,
        }
    }
}

struct PendingDocument {
    id: DocId,
    title: Vec<String>,
    abstract_lines: Vec<String>,
}

impl PendingDocument {
    fn new(id: DocId) -> Self { Self { id, title: Vec::new(), abstract_lines: Vec::new() } }

    fn finish(self) -> ParsedDocument {
        let title = self.title.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" ");
        ParsedDocument { id: self.id, title, abstract_text: self.abstract_lines.join("\n") }
    }
}

/// Iterates over the documents of a collection, one per `.I` block.
///
/// Malformed input never stops the iteration; each problem is logged and kept in
/// [`CorpusReader::diagnostics`]. Only read failures surface as `Err` items.
pub struct CorpusReader<R> {
    lines: Lines<R>,
    line_no: usize,
    state: ReaderState,
    current: Option<PendingDocument>,
    diagnostics: Vec<VsmError>,
    /// Set while discarding a block that has no usable id.
    skipping: bool,
    finished: bool,
}

impl<R: BufRead> CorpusReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
            line_no: 0,
            state: ReaderState::ExpectId,
            current: None,
            diagnostics: Vec::new(),
            skipping: false,
            finished: false,
        }
    }

    pub fn diagnostics(&self) -> &[VsmError] { &self.diagnostics }

    pub fn into_diagnostics(self) -> Vec<VsmError> { self.diagnostics }

    fn malformed(&mut self, reason: String) {
        tracing::warn!(line = self.line_no, %reason, "malformed collection record");
        self.diagnostics.push(VsmError::malformed(self.line_no, reason));
    }

    /// Handles an `.I` line; returns the document it closes, if any.
    fn open_record(&mut self, raw_id: &str) -> Option<ParsedDocument> {
        let closed = self.close_record();
        match parse_numeric_id(raw_id) {
            Ok(id) => {
                self.current = Some(PendingDocument::new(id));
                self.state = ReaderState::ExpectTag;
                self.skipping = false;
            }
            Err(reason) => {
                self.malformed(format!("record id {raw_id:?} {reason}; skipping record"));
                self.state = ReaderState::ExpectId;
                self.skipping = true;
            }
        }
        closed
    }

    fn close_record(&mut self) -> Option<ParsedDocument> {
        let doc = self.current.take()?;
        if matches!(self.state, ReaderState::ExpectTag | ReaderState::Title | ReaderState::Author | ReaderState::Bibliography) {
            self.malformed(format!("record {} ended before its .W field", doc.id));
        }
        Some(doc.finish())
    }

    fn enter_field(&mut self, tag: Tag, rest: &str) {
        if self.current.is_none() {
            if !self.skipping {
                self.malformed(format!("{tag} outside of any record; skipping until next .I"));
                self.skipping = true;
            }
            return;
        }
        let next = ReaderState::for_tag(tag);
        if next.rank() <= self.state.rank() {
            self.malformed(format!("unexpected {tag} while reading {:?}", self.state));
        }
        self.state = next;
        if !rest.is_empty() {
            self.push_content(rest);
        }
    }

    fn push_content(&mut self, line: &str) {
        let Some(doc) = self.current.as_mut() else { return };
        match self.state {
            ReaderState::Title => doc.title.push(line.to_string()),
            ReaderState::Abstract => doc.abstract_lines.push(line.to_string()),
            ReaderState::Author | ReaderState::Bibliography => {}
            ReaderState::ExpectTag => {
                if !line.trim().is_empty() {
                    let id = doc.id;
                    self.malformed(format!("text in record {id} before any field tag"));
                }
            }
            ReaderState::ExpectId => {}
        }
    }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
    type Item = Result<ParsedDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished { return None; }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(VsmError::Io(e)));
                }
                None => {
                    self.finished = true;
                    return self.close_record().map(Ok);
                }
            };
            self.line_no += 1;
            match parse_tag(&line) {
                Some((Tag::Id, rest)) => {
                    if let Some(doc) = self.open_record(rest) {
                        return Some(Ok(doc));
                    }
                }
                Some((tag, rest)) => self.enter_field(tag, rest),
                None => self.push_content(&line),
            }
        }
    }
}
