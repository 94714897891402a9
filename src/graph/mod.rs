//! The canonical flow graph: typed nodes, directed edges, and pure query
//! helpers over both.
//!
//! A [`FlowGraph`] is the structure the builder surface mutates, the validator
//! analyses and the simulator walks. Mutation goes through the methods here so
//! the reference invariants hold: edges always point at existing nodes, and
//! removing a node cascades to every edge touching it.

pub mod edge;
pub mod node;

pub use edge::Edge;
pub use node::{
    AddTagConfig, ApiRequestConfig, AskQuestionConfig, Button, ButtonKind, FlowStartConfig,
    HttpMethod, ListConfig, ListItem, MAX_BUTTONS, MAX_LIST_ITEMS, MediaButtonsConfig, MediaKind,
    MessageConfig, Node, NodeKind, Position, SetAttributeConfig, TemplateConfig, ValidationKind,
};

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Nodes and edges of one automation flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure lookup by node id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Adds a node with a freshly generated unique id and returns a copy of it.
    ///
    /// The id is `{type}-{n}` with a monotonic suffix, skipping over ids
    /// already present (e.g. from an imported flow).
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> Node {
        let id = self.fresh_node_id(kind.type_name());
        let node = Node { id, position, kind };
        debug!(node = %node.id, kind = node.kind.type_name(), "add node");
        self.nodes.push(node.clone());
        node
    }

    /// Connects two existing nodes and returns a copy of the new edge.
    ///
    /// Fails with [`GraphError::InvalidReference`] if either endpoint is
    /// missing; the edge list is left untouched in that case.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> Result<Edge, GraphError> {
        for endpoint in [source, target] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::InvalidReference {
                    node_id: endpoint.to_string(),
                });
            }
        }
        let edge = Edge {
            id: self.fresh_edge_id(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.map(str::to_string),
            target_handle: None,
        };
        debug!(edge = %edge.id, %source, %target, "add edge");
        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Removes a node and every edge referencing it. Idempotent: removing an
    /// absent id is not an error.
    pub fn remove_node(&mut self, id: &str) {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() != before {
            debug!(node = %id, "remove node");
        }
        self.edges.retain(|e| e.source != id && e.target != id);
    }

    /// Removes a single edge by id. Idempotent like [`remove_node`](Self::remove_node).
    pub fn remove_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
    }

    /// Applies an edit to a node's configuration payload.
    ///
    /// Fails with [`GraphError::NotFound`] if the id is absent, and with
    /// [`GraphError::TooManyBranches`] if the edit would exceed the button or
    /// list-item limit; the node is left unchanged on failure.
    pub fn update_node_data<F>(&mut self, id: &str, edit: F) -> Result<(), GraphError>
    where
        F: FnOnce(&mut NodeKind),
    {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::NotFound {
                node_id: id.to_string(),
            })?;

        let mut edited = node.kind.clone();
        edit(&mut edited);
        if let Some((count, limit)) = edited.branch_overflow() {
            return Err(GraphError::TooManyBranches {
                node_id: id.to_string(),
                kind: edited.type_name(),
                count,
                limit,
            });
        }
        node.kind = edited;
        Ok(())
    }

    /// All edges leaving the given node, in insertion order.
    pub fn outgoing_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.source == node_id).collect()
    }

    /// All edges entering the given node, in insertion order.
    pub fn incoming_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.target == node_id).collect()
    }

    /// The first edge leaving a node, i.e. the follow-up of a non-branching step.
    pub fn first_outgoing(&self, node_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.source == node_id)
    }

    /// The edge leaving a node on a specific button/list-item handle.
    pub fn edge_from_handle(&self, node_id: &str, handle: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.leaves_handle(node_id, handle))
    }

    /// `FlowStart` nodes with no incoming edges. These are the only valid
    /// entry points of the flow.
    pub fn find_start_nodes(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.is_start() && self.incoming_edges(&n.id).is_empty())
            .collect()
    }

    fn fresh_node_id(&self, prefix: &str) -> String {
        let mut n = self.nodes.len() + 1;
        loop {
            let candidate = format!("{prefix}-{n}");
            if !self.contains_node(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn fresh_edge_id(&self) -> String {
        let mut n = self.edges.len() + 1;
        loop {
            let candidate = format!("edge-{n}");
            if !self.edges.iter().any(|e| e.id == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
