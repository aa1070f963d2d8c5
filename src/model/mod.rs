//! # Letter Record Model
//!
//! Clean DTOs for the correspondence archive. These types cross every
//! boundary: ingestion ↔ graph construction ↔ search ↔ layout collaborator.
//!
//! Design rule: this module is pure data — no I/O, no state, no async.

pub mod record;

pub use record::{LetterId, LetterRecord, NameList};
