//! # epistograph — Correspondence Network Graph Builder
//!
//! Turns a flat archive of letters (each with one or more senders and zero
//! or more receivers) into a deduplicated, direction-aware graph ready for a
//! force-layout collaborator, plus year/degree filtering and a two-phase
//! full-text search pipeline.
//!
//! ## Design Principles
//!
//! 1. **Pure rebuilds**: every filter change produces a fresh [`Network`] —
//!    no shared mutable accumulator state survives between builds
//! 2. **Clean DTOs**: [`LetterRecord`], [`GraphNode`], [`Edge`] cross all
//!    boundaries and serialize to the shapes the layout collaborator expects
//! 3. **Backend-agnostic search**: [`SearchBackend`] is the contract between
//!    the query pipeline and whatever ranks the letters
//! 4. **Ingestion owns validation**: a record with no sender never reaches
//!    the aggregation stage
//!
//! ## Quick Start
//!
//! ```rust
//! use epistograph::{Corpus, FilterParams};
//!
//! # fn example() -> epistograph::Result<()> {
//! let json = r#"[
//!     {"Номер_в_издании": 1, "Отправитель": "Пушкин", "Получатель": "Вяземский", "Год": 1825}
//! ]"#;
//! let corpus = Corpus::from_json_str(json)?;
//!
//! let network = corpus.build(&FilterParams::default());
//! for edge in &network.edges {
//!     println!("{} → {} ({} letters)", edge.source, edge.target, edge.count);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod corpus;
pub mod graph;
pub mod model;
pub mod search;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{LetterId, LetterRecord, NameList};

// ============================================================================
// Re-exports: Graph construction
// ============================================================================

pub use graph::{
    Edge, EntityMetrics, FilterParams, GraphNode, MetricsIndex, Network,
};

// ============================================================================
// Re-exports: Search
// ============================================================================

pub use search::{
    LocalSearchIndex, ParsedQuery, QueryTicket, SearchBackend, SearchHit,
    SearchSession,
};

// ============================================================================
// Re-exports: Corpus handle
// ============================================================================

pub use corpus::Corpus;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record failed ingestion validation (e.g. no sender).
    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: model::LetterId, reason: String },

    /// The feed document is not a well-formed letter array.
    #[error("malformed letter feed: {0}")]
    Parse(#[from] serde_json::Error),

    /// The search backend failed. Recoverable; graph state is untouched.
    #[error("search backend error: {0}")]
    Search(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
