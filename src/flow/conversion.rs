use super::Flow;
use crate::error::FlowConversionError;

/// A trait for external builder-surface formats that can be converted into
/// the canonical [`Flow`] document.
///
/// The engine only understands the `Flow` shape. Editors and import paths
/// that speak their own JSON wrapper implement this trait to provide the
/// translation layer, keeping the core format-agnostic.
///
/// # Example
///
/// ```rust,no_run
/// use waflow::flow::{Flow, IntoFlow};
/// use waflow::error::FlowConversionError;
/// use waflow::graph::{Edge, Node};
///
/// // 1. Structs matching the editor's own export format.
/// struct EditorExport {
///     title: String,
///     nodes: Vec<Node>,
///     edges: Vec<Edge>,
/// }
///
/// // 2. The translation into a canonical flow document.
/// impl IntoFlow for EditorExport {
///     fn into_flow(self) -> Result<Flow, FlowConversionError> {
///         let mut flow = Flow::new(self.title);
///         flow.graph.nodes = self.nodes;
///         flow.graph.edges = self.edges;
///         flow.sync_triggers();
///         Ok(flow)
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a canonical flow document.
    fn into_flow(self) -> Result<Flow, FlowConversionError>;
}
