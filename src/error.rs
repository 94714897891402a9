use crate::validate::Finding;
use thiserror::Error;

/// Errors returned by graph mutation operations.
///
/// These surface synchronously to the builder surface, which owns user-facing
/// notification. Queries never fail; only mutations do.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("Edge endpoint '{node_id}' does not exist in the graph")]
    InvalidReference { node_id: String },

    #[error("Node '{node_id}' not found")]
    NotFound { node_id: String },

    #[error(
        "Node '{node_id}' would carry {count} branches, but {kind} nodes allow at most {limit}"
    )]
    TooManyBranches {
        node_id: String,
        kind: &'static str,
        count: usize,
        limit: usize,
    },
}

/// Errors that can occur while reading or writing a persisted flow document.
#[derive(Error, Debug, Clone)]
pub enum FlowReadError {
    #[error("Failed to parse flow JSON: {0}")]
    Json(String),

    #[error("Failed to access flow file '{path}': {message}")]
    Io { path: String, message: String },
}

/// Refusal to start a simulation on a structurally broken flow.
///
/// Error-severity findings block simulation start; warnings do not.
#[derive(Error, Debug, Clone)]
pub enum StartError {
    #[error("Flow failed validation with {} error(s); fix them before simulating", .findings.len())]
    ValidationFailed { findings: Vec<Finding> },
}

/// Errors that can occur when converting an external builder-surface format
/// into the canonical [`Flow`](crate::flow::Flow).
#[derive(Error, Debug, Clone)]
pub enum FlowConversionError {
    #[error("Invalid flow data: {0}")]
    ValidationError(String),
}
