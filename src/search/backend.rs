//! The seam between the query pipeline and whatever ranks the letters.
//!
//! A backend may be remote (`/api/search?q=<term>[&exact=true]`) or the
//! in-process [`LocalSearchIndex`](super::LocalSearchIndex). Either way the
//! client issues up to two calls per query — exact phrase and word set —
//! and merges the results itself.

use async_trait::async_trait;

use crate::Result;

use super::merge::{merge, SearchHit};
use super::query::ParsedQuery;

/// Default result count per backend call.
pub const DEFAULT_TOP_N: usize = 5;

/// A ranked full-text search over the letter archive.
///
/// `exact = true` asks for contiguous-phrase matches only. Implementations
/// return at most `top_n` hits, descending by score. Transport or backend
/// failures surface as [`Error::Search`](crate::Error::Search) and must not
/// corrupt any graph state held by the caller.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, exact: bool, top_n: usize) -> Result<Vec<SearchHit>>;
}

/// Run a parsed query against a backend: up to two calls, merged client-side.
pub async fn run<B>(backend: &B, query: &ParsedQuery, top_n: usize) -> Result<Vec<SearchHit>>
where
    B: SearchBackend + ?Sized,
{
    let exact_hits = match &query.exact_phrase {
        Some(phrase) => backend.search(phrase, true, top_n).await?,
        None => Vec::new(),
    };

    let word_hits = if query.words.is_empty() {
        Vec::new()
    } else {
        backend.search(&query.words.join(" "), false, top_n).await?
    };

    Ok(merge(exact_hits, word_hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LetterId;
    use crate::search::query;
    use parking_lot::Mutex;

    /// Scripted backend that records the calls it receives.
    struct Scripted {
        calls: Mutex<Vec<(String, bool)>>,
        hits: Vec<SearchHit>,
    }

    impl Scripted {
        fn new(hits: Vec<SearchHit>) -> Self {
            Self { calls: Mutex::new(Vec::new()), hits }
        }
    }

    #[async_trait]
    impl SearchBackend for Scripted {
        async fn search(
            &self,
            query: &str,
            exact: bool,
            _top_n: usize,
        ) -> Result<Vec<SearchHit>> {
            self.calls.lock().push((query.to_owned(), exact));
            Ok(self.hits.clone())
        }
    }

    fn hit(id: u64, score: f64) -> SearchHit {
        SearchHit {
            id: LetterId(id),
            title: String::new(),
            sender: String::new(),
            receiver: String::new(),
            score,
            excerpt: String::new(),
            is_exact_match: false,
        }
    }

    #[tokio::test]
    async fn test_two_calls_when_phrase_and_words_present() {
        let backend = Scripted::new(vec![hit(1, 1.0)]);
        let parsed = query::parse("письмо \"о долгах\"");

        run(&backend, &parsed, DEFAULT_TOP_N).await.unwrap();

        let calls = backend.calls.lock().clone();
        assert_eq!(
            calls,
            vec![("о долгах".to_owned(), true), ("письмо".to_owned(), false)]
        );
    }

    #[tokio::test]
    async fn test_single_call_for_words_only() {
        let backend = Scripted::new(Vec::new());
        let parsed = query::parse("дуэль зима");

        let hits = run(&backend, &parsed, DEFAULT_TOP_N).await.unwrap();

        assert!(hits.is_empty());
        assert_eq!(backend.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_issues_no_calls() {
        let backend = Scripted::new(vec![hit(1, 1.0)]);
        let parsed = query::parse("   ");

        let hits = run(&backend, &parsed, DEFAULT_TOP_N).await.unwrap();

        assert!(hits.is_empty());
        assert!(backend.calls.lock().is_empty());
    }
}
