//! # Search Pipeline
//!
//! Raw input → [`query::parse`] → up to two [`SearchBackend`] calls (exact
//! phrase + word set) → [`merge`](merge::merge) → ranked [`SearchHit`]s,
//! guarded by a [`SearchSession`] generation ticket so stale responses are
//! discarded.
//!
//! The search path is independent of graph construction: it ranks letters
//! for the result panel and never feeds the aggregation.

pub mod backend;
pub mod local;
pub mod merge;
pub mod query;
pub mod session;

pub use backend::{run, SearchBackend, DEFAULT_TOP_N};
pub use local::LocalSearchIndex;
pub use merge::{merge, SearchHit, EXACT_BOOST};
pub use query::{parse, ParsedQuery};
pub use session::{QueryTicket, SearchSession, DEBOUNCE};
