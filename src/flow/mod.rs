//! The persisted flow document.
//!
//! A [`Flow`] wraps a [`FlowGraph`] with the metadata the external
//! flow-storage service stores alongside it: identity, lifecycle status, a
//! denormalized trigger list and timestamps. Storage itself is external;
//! this module only owns the serialization shape and pure JSON
//! import/export.

pub mod conversion;

pub use conversion::IntoFlow;

use crate::error::FlowReadError;
use crate::graph::{FlowGraph, NodeKind};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

/// A complete automation flow as persisted and exchanged with the builder
/// surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: FlowStatus,
    /// Denormalized copy of the start-node triggers, kept in sync via
    /// [`sync_triggers`](Self::sync_triggers).
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(flatten)]
    pub graph: FlowGraph,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flow {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            status: FlowStatus::default(),
            triggers: Vec::new(),
            graph: FlowGraph::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Serializes the flow to pretty-printed JSON. Export and import are pure
    /// serialize/deserialize of this shape; there is no schema versioning.
    pub fn to_json(&self) -> Result<String, FlowReadError> {
        serde_json::to_string_pretty(self).map_err(|e| FlowReadError::Json(e.to_string()))
    }

    /// Parses a flow from exported JSON. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, FlowReadError> {
        serde_json::from_str(json).map_err(|e| FlowReadError::Json(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FlowReadError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| FlowReadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowReadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FlowReadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Rebuilds the denormalized trigger list from the graph's start nodes,
    /// preserving order and dropping duplicates and blanks.
    pub fn sync_triggers(&mut self) {
        self.triggers = self
            .graph
            .find_start_nodes()
            .into_iter()
            .flat_map(|n| match &n.kind {
                NodeKind::FlowStart(c) => c.triggers.clone(),
                _ => Vec::new(),
            })
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unique()
            .collect();
    }

    /// Bumps the modification timestamp; call after any mutation that should
    /// be persisted.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
