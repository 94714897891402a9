use serde::{Deserialize, Serialize};

/// A directed connection between two nodes.
///
/// Edges leaving a button or list node carry the selected branch in
/// `source_handle` (the button or list-item id). Non-branching nodes have at
/// most one outgoing edge with no handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    /// Whether this edge leaves the given node on the given branch handle.
    pub fn leaves_handle(&self, source: &str, handle: &str) -> bool {
        self.source == source && self.source_handle.as_deref() == Some(handle)
    }
}
