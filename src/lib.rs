//! # waflow - Chatbot Flow Modeling and Simulation Engine
//!
//! **waflow** models WhatsApp-style chatbot automations as directed graphs of
//! typed nodes, statically validates them, and simulates the resulting
//! conversation turn by turn. It is the engine behind a visual flow builder:
//! the editor mutates the graph, the validator reports structural problems,
//! and the simulator drives the chat-preview pane.
//!
//! ## Core Workflow
//!
//! 1.  **Build or load a graph**: mutate a [`graph::FlowGraph`] through its
//!     typed operations, or deserialize a whole [`flow::Flow`] document
//!     exported by an editor.
//! 2.  **Validate**: run [`validate::Validator::validate`] to get an ordered
//!     list of findings. Errors block simulation; warnings do not.
//! 3.  **Simulate**: create a [`sim::Simulator`], `start` it with a trigger
//!     text, and feed user replies with `handle_user_input` until the run
//!     reports `is_complete`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use waflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = FlowGraph::new();
//!
//!     // FlowStart("hi") -> AskQuestion(name) -> Message("Hello {{name}}!")
//!     let start = graph.add_node(
//!         NodeKind::FlowStart(FlowStartConfig {
//!             triggers: vec!["hi".into()],
//!         }),
//!         Position::default(),
//!     );
//!     let ask = graph.add_node(
//!         NodeKind::AskQuestion(AskQuestionConfig {
//!             question: "What is your name?".into(),
//!             attribute_name: "name".into(),
//!             required: true,
//!             ..Default::default()
//!         }),
//!         Position::default(),
//!     );
//!     let hello = graph.add_node(
//!         NodeKind::Message(MessageConfig {
//!             text: "Hello {{name}}!".into(),
//!             ..Default::default()
//!         }),
//!         Position::default(),
//!     );
//!     graph.add_edge(&start.id, &ask.id, None)?;
//!     graph.add_edge(&ask.id, &hello.id, None)?;
//!
//!     let report = Validator::validate(&graph);
//!     assert!(!report.has_errors());
//!
//!     let mut sim = Simulator::new(&graph, TriggerMode::Match);
//!     let state = sim.start("hi")?;
//!     assert!(state.is_waiting_for_input);
//!
//!     let state = sim.handle_user_input("Alice", InputKind::Text);
//!     assert!(state.is_complete);
//!     for message in &state.messages {
//!         println!("{:?}: {}", message.role, message.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flow;
pub mod graph;
pub mod history;
pub mod prelude;
pub mod sim;
pub mod validate;
