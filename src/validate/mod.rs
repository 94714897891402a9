//! Static analysis over a [`FlowGraph`].
//!
//! The validator never mutates the graph. It runs a fixed list of checks in
//! priority order and returns every finding, without short-circuiting, so
//! the builder surface can render the full picture at once. Running it twice
//! on an unchanged graph yields an identical ordered list.

use crate::graph::{FlowGraph, Node, NodeKind};
use ahash::AHashSet;
use itertools::Itertools;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Stable machine-readable category of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    NoStartNode,
    MultipleStartNodes,
    UnreachableNode,
    MissingConfig,
    TooManyBranches,
    UnwiredBranch,
    OrphanEdge,
    DuplicateNodeId,
}

/// One validation result, pointing at a node where one is responsible.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub message: String,
}

impl Finding {
    fn error(code: FindingCode, node_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            node_id: node_id.map(str::to_string),
            message: message.into(),
        }
    }

    fn warning(code: FindingCode, node_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            node_id: node_id.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "{} [{}]: {}", self.severity, id, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// The ordered findings of one validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Whether any error-severity finding exists. Errors block simulation
    /// start; warnings do not.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Runs the full check list over a graph.
pub struct Validator;

impl Validator {
    pub fn validate(graph: &FlowGraph) -> ValidationReport {
        let mut findings = Vec::new();
        let starts = graph.find_start_nodes();

        check_start_nodes(&starts, &mut findings);
        check_reachability(graph, &starts, &mut findings);
        check_node_config(graph, &mut findings);
        check_unwired_branches(graph, &mut findings);
        check_orphan_edges(graph, &mut findings);
        check_duplicate_ids(graph, &mut findings);

        ValidationReport { findings }
    }
}

fn check_start_nodes(starts: &[&Node], findings: &mut Vec<Finding>) {
    if starts.is_empty() {
        findings.push(Finding::error(
            FindingCode::NoStartNode,
            None,
            "Flow has no start node; add a FlowStart node without incoming edges",
        ));
    } else if starts.len() > 1 {
        let ids = starts.iter().map(|n| n.id.as_str()).join(", ");
        findings.push(Finding::warning(
            FindingCode::MultipleStartNodes,
            None,
            format!("Flow has {} start nodes ({ids}); execution uses the first one", starts.len()),
        ));
    }
}

/// Forward traversal from every start node; anything not visited is dead flow.
fn check_reachability(graph: &FlowGraph, starts: &[&Node], findings: &mut Vec<Finding>) {
    if starts.is_empty() {
        // Without an entry point every node would be flagged; the missing
        // start error already covers the graph.
        return;
    }

    let mut visited: AHashSet<&str> = AHashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for start in starts {
        visited.insert(start.id.as_str());
        queue.push_back(start.id.as_str());
    }
    while let Some(id) = queue.pop_front() {
        for edge in graph.outgoing_edges(id) {
            if visited.insert(edge.target.as_str()) {
                queue.push_back(edge.target.as_str());
            }
        }
    }

    for node in &graph.nodes {
        if !visited.contains(node.id.as_str()) {
            findings.push(Finding::warning(
                FindingCode::UnreachableNode,
                Some(&node.id),
                format!("Node '{}' is not reachable from any start node", node.id),
            ));
        }
    }
}

fn check_node_config(graph: &FlowGraph, findings: &mut Vec<Finding>) {
    for node in &graph.nodes {
        let id = Some(node.id.as_str());
        match &node.kind {
            NodeKind::FlowStart(c) => {
                if c.triggers.iter().all(|t| t.trim().is_empty()) {
                    findings.push(Finding::warning(
                        FindingCode::MissingConfig,
                        id,
                        "FlowStart has no triggers; the flow can only be started manually",
                    ));
                }
            }
            NodeKind::Message(c) => {
                if c.text.trim().is_empty() && c.buttons.is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "Message has neither text nor buttons",
                    ));
                }
            }
            NodeKind::MediaButtons(c) => {
                if c.media_url.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "MediaButtons has no media URL",
                    ));
                }
            }
            NodeKind::List(c) => {
                if c.text.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "List has no body text",
                    ));
                }
                if c.items.is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "List has no items to select",
                    ));
                }
            }
            NodeKind::AskQuestion(c) => {
                if c.question.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "AskQuestion has no question text",
                    ));
                }
                if c.attribute_name.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "AskQuestion has no attribute name to store the answer in",
                    ));
                }
            }
            NodeKind::Template(c) => {
                if c.template_id.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "Template has no template id",
                    ));
                }
            }
            NodeKind::SetAttribute(c) => {
                if c.attribute_name.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "SetAttribute has no attribute name",
                    ));
                }
            }
            NodeKind::AddTag(c) => {
                if c.tag_id.trim().is_empty() && c.tag_name.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "AddTag references no tag",
                    ));
                }
            }
            NodeKind::ApiRequest(c) => {
                if c.url.trim().is_empty() {
                    findings.push(Finding::error(
                        FindingCode::MissingConfig,
                        id,
                        "ApiRequest has no URL",
                    ));
                }
            }
        }

        // Branch limits are enforced at edit time but re-checked here because
        // imported documents bypass the mutation API.
        if let Some((count, limit)) = node.kind.branch_overflow() {
            findings.push(Finding::error(
                FindingCode::TooManyBranches,
                id,
                format!(
                    "Node carries {count} branches, but {} nodes allow at most {limit}",
                    node.kind.type_name()
                ),
            ));
        }
    }
}

/// A button or list item with no edge wired from its handle silently
/// dead-ends in simulation; worth a warning, not an error.
fn check_unwired_branches(graph: &FlowGraph, findings: &mut Vec<Finding>) {
    for node in &graph.nodes {
        for button in node.kind.buttons() {
            if graph.edge_from_handle(&node.id, &button.id).is_none() {
                findings.push(Finding::warning(
                    FindingCode::UnwiredBranch,
                    Some(&node.id),
                    format!("Button '{}' has no outgoing connection", button.text),
                ));
            }
        }
        for item in node.kind.list_items() {
            if graph.edge_from_handle(&node.id, &item.id).is_none() {
                findings.push(Finding::warning(
                    FindingCode::UnwiredBranch,
                    Some(&node.id),
                    format!("List item '{}' has no outgoing connection", item.title),
                ));
            }
        }
    }
}

/// Should not occur if the graph was only mutated through [`FlowGraph`], but
/// imported documents are re-checked.
fn check_orphan_edges(graph: &FlowGraph, findings: &mut Vec<Finding>) {
    for edge in &graph.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !graph.contains_node(endpoint) {
                findings.push(Finding::error(
                    FindingCode::OrphanEdge,
                    None,
                    format!("Edge '{}' references missing node '{endpoint}'", edge.id),
                ));
            }
        }
    }
}

fn check_duplicate_ids(graph: &FlowGraph, findings: &mut Vec<Finding>) {
    for id in graph.nodes.iter().map(|n| n.id.as_str()).duplicates() {
        findings.push(Finding::error(
            FindingCode::DuplicateNodeId,
            Some(id),
            format!("Node id '{id}' is used more than once"),
        ));
    }
}
