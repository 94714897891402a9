//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the waflow crate. Import this
//! module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use waflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow = Flow::load("path/to/flow.json")?;
//! let report = Validator::validate(&flow.graph);
//! for finding in &report.findings {
//!     println!("{finding}");
//! }
//!
//! if !report.has_errors() {
//!     let mut sim = Simulator::new(&flow.graph, TriggerMode::Match);
//!     let state = sim.start("hi")?;
//!     println!("{} message(s), complete: {}", state.messages.len(), state.is_complete);
//! }
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    AddTagConfig, ApiRequestConfig, AskQuestionConfig, Button, ButtonKind, Edge, FlowGraph,
    FlowStartConfig, HttpMethod, ListConfig, ListItem, MAX_BUTTONS, MAX_LIST_ITEMS,
    MediaButtonsConfig, MediaKind, MessageConfig, Node, NodeKind, Position, SetAttributeConfig,
    TemplateConfig, ValidationKind,
};

// Flow document and conversion
pub use crate::flow::{Flow, FlowStatus, IntoFlow};

// Validation
pub use crate::validate::{Finding, FindingCode, Severity, ValidationReport, Validator};

// Simulation
pub use crate::sim::{
    AwaitKind, InputKind, MessageRole, Session, SimMessage, SimState, SimStatus, Simulator,
    TriggerMode,
};

// Undo/redo history
pub use crate::history::SnapshotHistory;

// Error types
pub use crate::error::{FlowConversionError, FlowReadError, GraphError, StartError};

// Map type used for session attributes
pub use ahash::AHashMap;

// Result type alias for convenience. The error parameter defaults to a boxed
// error so application code can still name a concrete error type.
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
