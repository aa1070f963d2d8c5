//! In-memory reference search backend.
//!
//! This is the reference implementation of [`SearchBackend`]: a tf-idf
//! index over the combined letter fields, built once from the corpus.
//!
//! ## Limitations
//!
//! - **Surface-form matching only**: no lemmatization, no stop-word list.
//!   Inflected forms of a query word do not match each other.
//! - **Full scan per query**: scoring visits every document. Acceptable at
//!   archive scale (a few thousand letters).
//!
//! Use this backend for testing the query pipeline, or for embedding the
//! whole visualization without a remote search service.

use std::sync::Arc;

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::model::LetterRecord;
use crate::Result;

use super::backend::SearchBackend;
use super::merge::SearchHit;

/// Hits scoring at or below this are never surfaced.
pub const SCORE_THRESHOLD: f64 = 0.001;

/// Target excerpt length, in characters.
pub const EXCERPT_WINDOW: usize = 150;

const CACHE_CAPACITY: usize = 1000;

// ============================================================================
// LocalSearchIndex
// ============================================================================

/// Ranked full-text search over the letter archive, in process.
pub struct LocalSearchIndex {
    docs: Vec<Doc>,
    doc_freq: HashMap<String, u32>,
    cache: RwLock<HashMap<(String, bool, usize), Vec<SearchHit>>>,
}

struct Doc {
    record: Arc<LetterRecord>,
    /// Normalized combined field text.
    text: String,
    term_freq: HashMap<String, u32>,
    /// tf-idf vector norm, fixed at build time.
    norm: f64,
}

impl LocalSearchIndex {
    /// Index a record set. Each letter becomes one document combining its
    /// title, date, annotation, text, source, senders, receivers, location
    /// and year.
    pub fn build(records: &[Arc<LetterRecord>]) -> Self {
        let mut docs: Vec<Doc> = records
            .iter()
            .map(|record| {
                let text = normalize(&combined_text(record));
                let mut term_freq = HashMap::new();
                for term in text.split_whitespace() {
                    *term_freq.entry_ref(term).or_insert(0u32) += 1;
                }
                Doc {
                    record: Arc::clone(record),
                    text,
                    term_freq,
                    norm: 0.0,
                }
            })
            .collect();

        let mut doc_freq: HashMap<String, u32> = HashMap::new();
        for doc in &docs {
            for term in doc.term_freq.keys() {
                *doc_freq.entry_ref(term.as_str()).or_insert(0) += 1;
            }
        }

        for doc in &mut docs {
            doc.norm = doc
                .term_freq
                .iter()
                .map(|(term, tf)| {
                    let w = f64::from(*tf) * idf(&doc_freq, records.len(), term);
                    w * w
                })
                .sum::<f64>()
                .sqrt();
        }

        debug!(documents = docs.len(), terms = doc_freq.len(), "search index built");
        Self {
            docs,
            doc_freq,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Rank the archive against a query. `exact` restricts hits to letters
    /// containing the query as a contiguous normalized phrase.
    pub fn rank(&self, query: &str, exact: bool, top_n: usize) -> Vec<SearchHit> {
        if query.trim().is_empty() || top_n == 0 {
            return Vec::new();
        }

        let key = (query.to_owned(), exact, top_n);
        if let Some(cached) = self.cache.read().get(&key) {
            return cached.clone();
        }

        let normalized = normalize(query);
        let hits = self.rank_uncached(&normalized, exact, top_n);

        let mut cache = self.cache.write();
        if cache.len() >= CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert(key, hits.clone());
        hits
    }

    fn rank_uncached(&self, normalized: &str, exact: bool, top_n: usize) -> Vec<SearchHit> {
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut query_freq: HashMap<&str, u32> = HashMap::new();
        for token in &tokens {
            *query_freq.entry(*token).or_insert(0) += 1;
        }
        let query_norm = query_freq
            .iter()
            .map(|(term, tf)| {
                let w = f64::from(*tf) * self.term_idf(term);
                w * w
            })
            .sum::<f64>()
            .sqrt();
        if query_norm == 0.0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = Vec::new();
        for (idx, doc) in self.docs.iter().enumerate() {
            if doc.norm == 0.0 {
                continue;
            }
            if exact && !doc.text.contains(normalized) {
                continue;
            }
            let dot: f64 = query_freq
                .iter()
                .map(|(term, q_tf)| {
                    let d_tf = doc.term_freq.get(*term).copied().unwrap_or(0);
                    let w = self.term_idf(term);
                    f64::from(*q_tf) * w * f64::from(d_tf) * w
                })
                .sum();
            let score = dot / (query_norm * doc.norm);
            if score > SCORE_THRESHOLD {
                scored.push((idx, score));
            }
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);

        scored
            .into_iter()
            .map(|(idx, score)| self.hit(&self.docs[idx].record, score, &tokens))
            .collect()
    }

    fn hit(&self, record: &LetterRecord, score: f64, tokens: &[&str]) -> SearchHit {
        SearchHit {
            id: record.id,
            title: record.title.clone().unwrap_or_default(),
            sender: record.senders.joined(),
            receiver: record.receivers.joined(),
            score,
            excerpt: excerpt(record.text.as_deref().unwrap_or(""), tokens),
            is_exact_match: false,
        }
    }

    fn term_idf(&self, term: &str) -> f64 {
        idf(&self.doc_freq, self.docs.len(), term)
    }
}

/// Smoothed inverse document frequency.
fn idf(doc_freq: &HashMap<String, u32>, doc_count: usize, term: &str) -> f64 {
    let df = f64::from(doc_freq.get(term).copied().unwrap_or(0));
    ((1.0 + doc_count as f64) / (1.0 + df)).ln() + 1.0
}

#[async_trait]
impl SearchBackend for LocalSearchIndex {
    async fn search(&self, query: &str, exact: bool, top_n: usize) -> Result<Vec<SearchHit>> {
        Ok(self.rank(query, exact, top_n))
    }
}

// ============================================================================
// Text processing
// ============================================================================

/// One searchable string per letter, all fields combined.
fn combined_text(record: &LetterRecord) -> String {
    let mut parts: Vec<String> = Vec::new();
    let optional = [
        &record.title,
        &record.date,
        &record.annotation,
        &record.text,
        &record.source,
    ];
    for field in optional {
        if let Some(value) = field {
            parts.push(value.clone());
        }
    }
    parts.push(record.senders.join(" "));
    parts.push(record.receivers.join(" "));
    if let Some(location) = &record.location {
        parts.push(location.clone());
    }
    if let Some(year) = record.year {
        parts.push(year.to_string());
    }
    parts.join(" ")
}

/// Lowercase, strip markup characters and punctuation, collapse whitespace.
fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' | '<' | '>' => {}
            c if c.is_alphanumeric() || c == '_' => cleaned.extend(c.to_lowercase()),
            c if c.is_whitespace() => cleaned.push(' '),
            _ => {}
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A ~[`EXCERPT_WINDOW`]-char window around the first occurrence of any
/// query token, edges aligned to word boundaries, ellipses on trimmed sides.
/// Falls back to the head of the text when nothing matches.
fn excerpt(text: &str, tokens: &[&str]) -> String {
    if text.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let lower: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    let first_pos = tokens.iter().find_map(|token| {
        let needle: Vec<char> = token.chars().collect();
        find_chars(&lower, &needle)
    });

    let Some(pos) = first_pos else {
        return head_excerpt(&chars);
    };

    let mut start = pos.saturating_sub(EXCERPT_WINDOW / 2);
    let mut end = (start + EXCERPT_WINDOW).min(chars.len());
    if end == chars.len() {
        start = end.saturating_sub(EXCERPT_WINDOW);
    }

    // Align the window edges to word boundaries.
    if start > 0 {
        if let Some(sp) = chars[..start].iter().rposition(|c| *c == ' ') {
            start = sp + 1;
        }
    }
    if end < chars.len() {
        if let Some(ep) = chars[end..].iter().position(|c| *c == ' ') {
            end += ep;
        }
    }

    let mut out = String::new();
    if start > 0 {
        out.push_str("...");
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push_str("...");
    }
    out
}

fn head_excerpt(chars: &[char]) -> String {
    let end = EXCERPT_WINDOW.min(chars.len());
    let mut out: String = chars[..end].iter().collect();
    if end < chars.len() {
        out.push_str("...");
    }
    out
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LetterRecord;

    fn corpus() -> Vec<Arc<LetterRecord>> {
        vec![
            Arc::new(
                LetterRecord::new(1u64, ["Пушкин"])
                    .with_receivers(["Вяземский"])
                    .with_title("О стихах")
                    .with_text("Посылаю тебе новые стихи, мой милый друг."),
            ),
            Arc::new(
                LetterRecord::new(2u64, ["Вяземский"])
                    .with_receivers(["Пушкин"])
                    .with_title("Ответ о долгах")
                    .with_text("Долги твои растут, а стихи всё не выходят из печати."),
            ),
            Arc::new(
                LetterRecord::new(3u64, ["Гончарова"])
                    .with_receivers(["Пушкин"])
                    .with_title("Домашнее")
                    .with_text("Дети здоровы, в доме всё спокойно."),
            ),
        ]
    }

    #[test]
    fn test_finds_matching_letters_ranked() {
        let index = LocalSearchIndex::build(&corpus());
        let hits = index.rank("стихи", false, 5);

        assert_eq!(hits.len(), 2);
        let ids: Vec<u64> = hits.iter().map(|h| h.id.0).collect();
        assert!(ids.contains(&1) && ids.contains(&2));
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let index = LocalSearchIndex::build(&corpus());
        assert!(index.rank("телеграф", false, 5).is_empty());
    }

    #[test]
    fn test_exact_requires_contiguous_phrase() {
        let index = LocalSearchIndex::build(&corpus());

        let phrase = index.rank("новые стихи", true, 5);
        assert_eq!(phrase.len(), 1);
        assert_eq!(phrase[0].id.0, 1);

        // Both words appear in letter 2, but never adjacent.
        let scattered = index.rank("долги печати", true, 5);
        assert!(scattered.is_empty());
    }

    #[test]
    fn test_normalization_ignores_case_and_punctuation() {
        let index = LocalSearchIndex::build(&corpus());
        let hits = index.rank("ДОЛГИ,", false, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.0, 2);
    }

    #[test]
    fn test_top_n_truncates() {
        let index = LocalSearchIndex::build(&corpus());
        // "Пушкин" appears in every document (sender or receiver).
        assert_eq!(index.rank("Пушкин", false, 2).len(), 2);
    }

    #[test]
    fn test_hit_carries_record_fields() {
        let index = LocalSearchIndex::build(&corpus());
        let hits = index.rank("домашнее", false, 5);

        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!(hit.sender, "Гончарова");
        assert_eq!(hit.receiver, "Пушкин");
        assert_eq!(hit.title, "Домашнее");
        assert!(hit.excerpt.contains("спокойно"));
    }

    #[test]
    fn test_empty_query_is_empty() {
        let index = LocalSearchIndex::build(&corpus());
        assert!(index.rank("", false, 5).is_empty());
        assert!(index.rank("   ", false, 5).is_empty());
    }

    #[test]
    fn test_cached_query_returns_same_hits() {
        let index = LocalSearchIndex::build(&corpus());
        let first = index.rank("стихи", false, 5);
        let second = index.rank("стихи", false, 5);
        assert_eq!(first, second);
    }

    // ------------------------------------------------------------------
    // Excerpt extraction
    // ------------------------------------------------------------------

    #[test]
    fn test_excerpt_short_text_untrimmed() {
        let text = "Короткое письмо.";
        assert_eq!(excerpt(text, &["письмо"]), text);
    }

    #[test]
    fn test_excerpt_windows_around_match() {
        let filler = "слово ".repeat(60);
        let text = format!("{filler}редкость {filler}");

        let out = excerpt(&text, &["редкость"]);
        assert!(out.contains("редкость"));
        assert!(out.starts_with("..."));
        assert!(out.ends_with("..."));
        assert!(out.chars().count() < 200);
    }

    #[test]
    fn test_excerpt_falls_back_to_head() {
        let text = "а ".repeat(200);
        let out = excerpt(&text, &["нет_такого"]);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= EXCERPT_WINDOW + 3);
    }

    #[test]
    fn test_excerpt_aligns_to_word_boundaries() {
        let filler = "слово ".repeat(60);
        let text = format!("{filler}находка{filler}");

        let out = excerpt(&text, &["находка"]);
        let core = out.trim_start_matches("...").trim_end_matches("...");
        assert!(!core.starts_with(' '));
        assert!(core.split_whitespace().all(|w| w == "слово" || w.contains("находка")));
    }
}
