//! Input canonicalization and degenerate-match filtering.

use std::fmt;

/// A normalized word: trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim surrounding whitespace and case-fold.
#[must_use]
pub fn normalize(raw: &str) -> Token {
    Token(raw.trim().to_lowercase())
}

/// Whether `candidate` is a trivial variation of `target`.
///
/// Identity and substring containment in either direction both count. The
/// empty token is a substring of every token, so an empty input on either
/// side is always degenerate.
#[must_use]
pub fn is_degenerate(target: &Token, candidate: &Token) -> bool {
    candidate == target
        || target.as_str().contains(candidate.as_str())
        || candidate.as_str().contains(target.as_str())
}
