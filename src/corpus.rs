//! The loaded letter archive: ingestion, validation, and the rebuild driver.

use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::{debug, info};

use crate::graph::{self, FilterParams, Network};
use crate::model::{LetterId, LetterRecord};
use crate::search::LocalSearchIndex;
use crate::{Error, Result};

/// The full archive, loaded once at startup. Records are immutable;
/// every filter change rebuilds a fresh [`Network`] from them.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<Arc<LetterRecord>>,
    by_id: HashMap<LetterId, usize>,
}

impl Corpus {
    /// Parse and validate a JSON array of letter records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<LetterRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Read, parse and validate the feed document.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json_str(&buf)
    }

    /// Validate already-deserialized records.
    ///
    /// Rejection happens here, at the ingestion boundary: a record with no
    /// sender, or a duplicated publication number, never reaches the
    /// aggregation stage.
    pub fn from_records(records: Vec<LetterRecord>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.senders.is_empty() {
                return Err(Error::InvalidRecord {
                    id: record.id,
                    reason: "no sender".into(),
                });
            }
            if by_id.insert(record.id, idx).is_some() {
                return Err(Error::InvalidRecord {
                    id: record.id,
                    reason: "duplicate number in publication".into(),
                });
            }
        }

        let records: Vec<Arc<LetterRecord>> =
            records.into_iter().map(Arc::new).collect();
        info!(letters = records.len(), "corpus loaded");
        Ok(Self { records, by_id })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<LetterRecord>] {
        &self.records
    }

    /// Letter lookup for detail popups.
    pub fn get(&self, id: LetterId) -> Option<&Arc<LetterRecord>> {
        self.by_id.get(&id).map(|idx| &self.records[*idx])
    }

    /// Distinct years present in the archive, ascending — the year
    /// selector's option list.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().filter_map(|r| r.year).collect()
    }

    /// Rebuild the network for the given filter state. Pure per call: equal
    /// parameters over the same corpus produce equal networks.
    pub fn build(&self, params: &FilterParams) -> Network {
        let network = graph::build_filtered(&self.records, params);
        debug!(
            years = params.years.len(),
            min_degree = params.min_degree,
            nodes = network.node_count(),
            edges = network.edge_count(),
            "rebuild complete"
        );
        network
    }

    /// Index the archive for in-process full-text search.
    pub fn search_index(&self) -> LocalSearchIndex {
        LocalSearchIndex::build(&self.records)
    }
}
