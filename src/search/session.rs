//! Request correlation for the async search path.
//!
//! A new keystroke supersedes any in-flight query: each dispatch takes a
//! generation ticket, and a response commits only while its ticket is still
//! the latest. Out-of-order responses are discarded instead of overwriting
//! newer results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use super::merge::SearchHit;

/// Recommended quiet period before dispatching a query. The timer itself
/// belongs to the UI adapter; the session only correlates responses.
pub const DEBOUNCE: Duration = Duration::from_millis(1000);

/// Generation stamp for one dispatched query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryTicket(u64);

/// Correlates search responses with the query that produced them.
#[derive(Debug, Default)]
pub struct SearchSession {
    latest: AtomicU64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new query. Any earlier ticket is now stale.
    pub fn begin(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::Relaxed) == ticket.0
    }

    /// Accept a response only if its query is still the latest one.
    pub fn try_commit(
        &self,
        ticket: QueryTicket,
        hits: Vec<SearchHit>,
    ) -> Option<Vec<SearchHit>> {
        if self.is_current(ticket) {
            Some(hits)
        } else {
            debug!(
                generation = ticket.0,
                latest = self.latest.load(Ordering::Relaxed),
                "stale search response discarded"
            );
            None
        }
    }
}
