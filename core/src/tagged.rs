//! Line tags shared by the collection and query file formats.
//!
//! A tag line is a line whose first whitespace-separated token is one of
//! `.I`, `.T`, `.A`, `.B` or `.W`. The `.I` tag carries the record id on the
//! same line (`.I 42`, `.I 001`); anything after another tag is field content.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Id,
    Title,
    Author,
    Bibliography,
    Abstract,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Id => ".I",
            Tag::Title => ".T",
            Tag::Author => ".A",
            Tag::Bibliography => ".B",
            Tag::Abstract => ".W",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Classify a line. Returns the tag and the remainder of the line after it.
pub fn parse_tag(line: &str) -> Option<(Tag, &str)> {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.find(char::is_whitespace) {
        Some(i) => (&trimmed[..i], trimmed[i..].trim_start()),
        None => (trimmed, ""),
    };
    let tag = match head {
        ".T" => Tag::Title,
        ".A" => Tag::Author,
        ".B" => Tag::Bibliography,
        ".W" => Tag::Abstract,
        // `.I` may be glued to its id (`.I12`)
        _ => match head.strip_prefix(".I") {
            Some(glued) if glued.chars().all(|c| c.is_ascii_digit()) => return Some((Tag::Id, trimmed[2..].trim())),
            _ => return None,
        },
    };
    Some((tag, rest))
}

/// Why an id field could not be turned into a record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    NoDigits,
    TooLarge,
    Zero,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::NoDigits => f.write_str("has no digits"),
            IdError::TooLarge => write!(f, "exceeds the largest id ({})", u32::MAX),
            IdError::Zero => f.write_str("is zero; ids must be positive"),
        }
    }
}

/// Keep only the digits of an id field and parse them as a positive id.
pub fn parse_numeric_id(raw: &str) -> Result<u32, IdError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { return Err(IdError::NoDigits); }
    // only digits remain, so the sole failure left is overflow
    match digits.parse::<u32>() {
        Ok(0) => Err(IdError::Zero),
        Ok(id) => Ok(id),
        Err(_) => Err(IdError::TooLarge),
    }
}
