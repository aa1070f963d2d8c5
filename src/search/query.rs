//! Search query parsing.
//!
//! A query splits into an optional exact phrase (the first double-quoted
//! substring) and a word set (whatever remains, tokenized on whitespace).
//! Pure function — no I/O, no state.

/// A parsed search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// The first `"..."` substring, if present and non-empty.
    pub exact_phrase: Option<String>,
    /// Remaining whitespace-separated words.
    pub words: Vec<String>,
}

impl ParsedQuery {
    /// Nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.exact_phrase.is_none() && self.words.is_empty()
    }
}

/// Parse raw search input into phrase + words.
///
/// An unterminated quote is not a phrase; the quote character stays part of
/// its token. An empty phrase (`""`) is dropped.
pub fn parse(raw: &str) -> ParsedQuery {
    let (phrase, remainder) = extract_quoted(raw);

    let words = remainder
        .split_whitespace()
        .map(str::to_owned)
        .collect();

    ParsedQuery {
        exact_phrase: phrase.filter(|p| !p.is_empty()),
        words,
    }
}

/// Split off the first double-quoted substring, returning it and the query
/// text with the quoted segment removed.
fn extract_quoted(raw: &str) -> (Option<String>, String) {
    let Some(open) = raw.find('"') else {
        return (None, raw.to_owned());
    };
    let after_open = open + 1;
    let Some(close_rel) = raw[after_open..].find('"') else {
        return (None, raw.to_owned());
    };
    let close = after_open + close_rel;

    let phrase = raw[after_open..close].to_owned();
    let mut remainder = String::with_capacity(raw.len());
    remainder.push_str(&raw[..open]);
    remainder.push_str(&raw[close + 1..]);
    (Some(phrase), remainder)
}
