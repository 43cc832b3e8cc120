// Node reader: one per configured node. Turns the node's status document into a NodeRecord,
// tracking staleness (time since last write) and jitter across cycles.

mod latency;

pub use latency::{LATENCY_WINDOW, LatencyWindow};

use crate::models::{NodeDocument, NodeRecord, pnl_in_range, round_to};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, thiserror::Error)]
pub enum NodeReadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse status document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("current_pnl {0} outside +/-1e12")]
    PnlOutOfRange(f64),
}

/// Outcome of one attempt to fetch a node's status document from disk.
#[derive(Debug)]
pub enum DocumentRead {
    /// No document at the configured path.
    Absent,
    Present { modified: SystemTime, content: String },
    Failed(NodeReadError),
}

/// Stats and reads the document at `path`. A document removed between the two calls is `Absent`.
pub fn read_document(path: &Path) -> DocumentRead {
    let io_err = |source: std::io::Error| {
        if source.kind() == ErrorKind::NotFound {
            DocumentRead::Absent
        } else {
            DocumentRead::Failed(NodeReadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(e) => return io_err(e),
    };
    match std::fs::read_to_string(path) {
        Ok(content) => DocumentRead::Present { modified, content },
        Err(e) => io_err(e),
    }
}

/// Parses a status document, rejecting P&L values the aggregate could not carry.
pub fn parse_document(content: &str) -> Result<NodeDocument, NodeReadError> {
    let doc: NodeDocument = serde_json::from_str(content)?;
    if !pnl_in_range(doc.current_pnl) {
        return Err(NodeReadError::PnlOutOfRange(doc.current_pnl));
    }
    Ok(doc)
}

pub struct NodeReader {
    node_id: String,
    path: PathBuf,
    latency: LatencyWindow,
    cached: Option<NodeRecord>,
}

impl NodeReader {
    pub fn new(node_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            node_id: node_id.into(),
            path: path.into(),
            latency: LatencyWindow::default(),
            cached: None,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of latency samples currently in the jitter window.
    pub fn latency_samples(&self) -> usize {
        self.latency.len()
    }

    /// Reads the document from disk and folds it into this node's state.
    pub fn read(&mut self, now: SystemTime) -> NodeRecord {
        let read = read_document(&self.path);
        self.ingest(read, now)
    }

    /// Folds one read outcome into the node's state and returns the record for this cycle.
    ///
    /// Absent -> OFFLINE (cache cleared, no latency sample). Unreadable or unparseable ->
    /// last good record, or OFFLINE if there has never been one.
    pub fn ingest(&mut self, read: DocumentRead, now: SystemTime) -> NodeRecord {
        let (modified, content) = match read {
            DocumentRead::Absent => {
                tracing::debug!(node = %self.node_id, path = %self.path.display(), "status document absent");
                self.cached = None;
                return NodeRecord::offline();
            }
            DocumentRead::Failed(e) => {
                tracing::warn!(node = %self.node_id, error = %e, "status document unreadable; keeping last record");
                return self.fallback();
            }
            DocumentRead::Present { modified, content } => (modified, content),
        };

        let doc = match parse_document(&content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!(node = %self.node_id, error = %e, "status document invalid; keeping last record");
                return self.fallback();
            }
        };

        let latency_ms = now
            .duration_since(modified)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.latency.push(latency_ms);

        let record = NodeRecord {
            status: doc.status,
            last_action: Some(doc.last_action),
            current_pnl: Some(doc.current_pnl),
            latency_ms: Some(round_to(latency_ms, 1)),
            latency_jitter: Some(round_to(self.latency.jitter(), 2)),
        };
        self.cached = Some(record.clone());
        record
    }

    fn fallback(&self) -> NodeRecord {
        self.cached.clone().unwrap_or_else(NodeRecord::offline)
    }
}
