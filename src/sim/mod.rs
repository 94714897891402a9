//! The flow simulator: a single-threaded step interpreter over a
//! [`FlowGraph`].
//!
//! The simulator advances automatically through side-effect nodes and
//! message nodes without choices, and pauses whenever a node needs a user
//! reply (a question, a button, a list selection). The only suspension point
//! in the whole engine is returning control to the caller while
//! `is_waiting_for_input` is true; execution resumes on the next
//! [`Simulator::handle_user_input`] call.
//!
//! After a successful [`Simulator::start`], no call ever fails: a malformed
//! mid-run state (missing node, dangling edge) degrades to
//! `is_complete = true` so a chat-preview pane always receives a well-formed
//! result, never a crash.

mod input;
pub mod interpolate;
pub mod session;

pub use session::{AwaitKind, MessageRole, Session, SimMessage};

use crate::error::StartError;
use crate::graph::{FlowGraph, Node, NodeKind};
use crate::validate::Validator;
use interpolate::interpolate;
use serde::Serialize;
use tracing::{debug, warn};

/// Simulated response body written by `ApiRequest` nodes. No real network
/// call is ever made.
pub const CANNED_API_RESPONSE: &str = r#"{"status":"ok"}"#;

/// How [`Simulator::start`] resolves the entry node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerMode {
    /// Pick the first start node whose trigger list contains the supplied
    /// text (trimmed, case-insensitive).
    #[default]
    Match,
    /// Manual-test mode: always pick the first start node, ignoring the
    /// supplied text.
    FirstStart,
}

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStatus {
    Idle,
    Running,
    WaitingForInput,
    Complete,
}

/// The kind of reply supplied to [`Simulator::handle_user_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Button,
    List,
}

/// Snapshot returned to the caller after each `start`/`handle_user_input`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimState {
    pub messages: Vec<SimMessage>,
    pub is_waiting_for_input: bool,
    pub is_complete: bool,
}

/// A stateful, single-threaded interpreter for one conversation run.
///
/// Holds its own copy of the graph for the lifetime of the run; the builder
/// surface keeps mutating its working copy independently.
pub struct Simulator {
    graph: FlowGraph,
    mode: TriggerMode,
    session: Session,
    started: bool,
    complete: bool,
}

impl Simulator {
    pub fn new(graph: &FlowGraph, mode: TriggerMode) -> Self {
        Self {
            graph: graph.clone(),
            mode,
            session: Session::default(),
            started: false,
            complete: false,
        }
    }

    pub fn status(&self) -> SimStatus {
        if !self.started {
            SimStatus::Idle
        } else if self.complete {
            SimStatus::Complete
        } else if self.session.is_waiting_for_input() {
            SimStatus::WaitingForInput
        } else {
            SimStatus::Running
        }
    }

    /// Read access for the chat-preview pane (attributes, tags, transcript).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Starts (or restarts) a run from a trigger text.
    ///
    /// Validation runs implicitly first; error-severity findings refuse the
    /// start. A trigger that matches no start node is not an error; the run
    /// completes immediately with an empty transcript.
    pub fn start(&mut self, trigger_text: &str) -> Result<SimState, StartError> {
        let report = Validator::validate(&self.graph);
        if report.has_errors() {
            return Err(StartError::ValidationFailed {
                findings: report.errors().cloned().collect(),
            });
        }

        self.session.reset();
        self.started = true;
        self.complete = false;

        let starts = self.graph.find_start_nodes();
        let entry = match self.mode {
            TriggerMode::FirstStart => starts.first().copied(),
            TriggerMode::Match => starts.into_iter().find(|n| matches_trigger(n, trigger_text)),
        };

        match entry.and_then(|start| self.graph.first_outgoing(&start.id)) {
            Some(edge) => {
                // The start node itself emits nothing; execution begins at
                // its target.
                self.session.current_node_id = Some(edge.target.clone());
                self.run();
            }
            None => self.finish(),
        }
        Ok(self.state())
    }

    /// Feeds one user reply into a paused run.
    ///
    /// Calling this while the simulator is not waiting is a defensive no-op
    /// that returns the current state unchanged.
    pub fn handle_user_input(&mut self, value: &str, kind: InputKind) -> SimState {
        if self.complete || !self.session.is_waiting_for_input() {
            return self.state();
        }
        let awaiting = self.session.awaiting;
        if declared_kind(awaiting) != Some(kind) {
            debug!(?kind, ?awaiting, "input kind differs from awaited kind");
        }

        self.session.push_user(value);
        match awaiting {
            AwaitKind::Text => self.resolve_answer(value),
            AwaitKind::Button => self.resolve_choice(value, ChoiceSource::Buttons),
            AwaitKind::List => self.resolve_choice(value, ChoiceSource::ListItems),
            AwaitKind::None => {}
        }
        self.state()
    }

    /// Discards the run and returns the simulator to `Idle`. No cleanup side
    /// effects are needed; the session holds no external resources.
    pub fn close(&mut self) {
        self.session.reset();
        self.started = false;
        self.complete = false;
    }

    fn state(&self) -> SimState {
        SimState {
            messages: self.session.transcript.clone(),
            is_waiting_for_input: !self.complete && self.session.is_waiting_for_input(),
            is_complete: self.complete,
        }
    }

    /// The auto-advance loop. Runs synchronously until the cursor pauses for
    /// input or the run completes.
    ///
    /// The step budget bounds the loop by the node count, so a cycle of pure
    /// side-effect nodes terminates instead of spinning forever.
    fn run(&mut self) {
        let mut budget = self.graph.nodes.len().saturating_add(1);
        while let Some(node_id) = self.session.current_node_id.clone() {
            if budget == 0 {
                warn!(node = %node_id, "step budget exhausted, stopping run");
                self.finish();
                break;
            }
            budget -= 1;

            // A dangling cursor means the graph was malformed; hard stop
            // rather than propagate an error into the preview pane.
            let Some(node) = self.graph.node(&node_id).cloned() else {
                warn!(node = %node_id, "current node missing from graph, stopping run");
                self.finish();
                break;
            };
            debug!(node = %node.id, kind = node.kind.type_name(), "step");

            self.emit(&node);
            self.apply_side_effects(&node);

            if let Some(awaiting) = pause_kind(&node.kind) {
                // The cursor stays on this node until input arrives.
                self.session.awaiting = awaiting;
                break;
            }

            self.advance_from(&node_id);
        }
    }

    /// Appends the bot message a node renders, if any. `{{attribute}}`
    /// placeholders are interpolated from the session.
    fn emit(&mut self, node: &Node) {
        let attrs = &self.session.attributes;
        let message = match &node.kind {
            NodeKind::Message(c) => Some(
                SimMessage::bot(render_body(&c.header, &c.text, &c.footer, attrs))
                    .with_buttons(c.buttons.clone()),
            ),
            NodeKind::MediaButtons(c) => Some(
                SimMessage::bot(interpolate(&c.text, attrs))
                    .with_media(c.media_type, interpolate(&c.media_url, attrs))
                    .with_buttons(c.buttons.clone()),
            ),
            NodeKind::List(c) => Some(
                SimMessage::bot(render_body(&c.header, &c.text, &c.footer, attrs))
                    .with_list_items(c.items.clone()),
            ),
            NodeKind::AskQuestion(c) => Some(SimMessage::bot(interpolate(&c.question, attrs))),
            NodeKind::Template(c) => Some(SimMessage::bot(interpolate(&c.text, attrs))),
            NodeKind::FlowStart(_)
            | NodeKind::SetAttribute(_)
            | NodeKind::AddTag(_)
            | NodeKind::ApiRequest(_) => None,
        };
        if let Some(message) = message {
            self.session.push_bot(message);
        }
    }

    fn apply_side_effects(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::SetAttribute(c) => {
                if !c.attribute_name.trim().is_empty() {
                    let value = interpolate(&c.attribute_value, &self.session.attributes);
                    self.session.set_attribute(c.attribute_name.clone(), value);
                }
            }
            NodeKind::AddTag(c) => self.session.record_tag(&c.tag_id, &c.tag_name),
            NodeKind::ApiRequest(c) => {
                debug!(url = %c.url, method = ?c.method, "simulated api request");
                if !c.response_attribute.trim().is_empty() {
                    self.session
                        .set_attribute(c.response_attribute.clone(), CANNED_API_RESPONSE);
                }
            }
            NodeKind::FlowStart(_)
            | NodeKind::Message(_)
            | NodeKind::MediaButtons(_)
            | NodeKind::List(_)
            | NodeKind::AskQuestion(_)
            | NodeKind::Template(_) => {}
        }
    }

    /// Free-text resolution for an `AskQuestion` pause.
    fn resolve_answer(&mut self, value: &str) {
        let Some(node) = self.current_node() else {
            self.finish();
            return;
        };
        let NodeKind::AskQuestion(config) = node.kind.clone() else {
            // The cursor no longer points at a question; malformed, stop.
            self.finish();
            return;
        };

        if config.required && !input::answer_is_valid(&config, value) {
            let text = if config.error_message.trim().is_empty() {
                input::default_error_message(config.validation_type).to_string()
            } else {
                interpolate(&config.error_message, &self.session.attributes)
            };
            self.session.push_bot(SimMessage::bot(text));
            // Stay waiting on the same node; the question is asked again
            // implicitly by the error prompt.
            return;
        }

        if !config.attribute_name.trim().is_empty() {
            self.session
                .set_attribute(config.attribute_name.clone(), value.trim());
        }
        self.session.awaiting = AwaitKind::None;
        self.advance_from(&node.id);
        self.run();
    }

    /// Button/list resolution: match the reply against the offered labels and
    /// follow the edge wired to the matched handle.
    fn resolve_choice(&mut self, value: &str, source: ChoiceSource) {
        let Some(node) = self.current_node() else {
            self.finish();
            return;
        };
        let handle = match source {
            ChoiceSource::Buttons => node
                .kind
                .buttons()
                .iter()
                .find(|b| text_matches(&b.text, value))
                .map(|b| b.id.clone()),
            ChoiceSource::ListItems => node
                .kind
                .list_items()
                .iter()
                .find(|i| text_matches(&i.title, value))
                .map(|i| i.id.clone()),
        };

        let Some(handle) = handle else {
            // The builder surface only offers valid labels; an unknown reply
            // keeps the pause in place.
            debug!(%value, "reply matches no offered choice");
            return;
        };

        self.session.awaiting = AwaitKind::None;
        match self.graph.edge_from_handle(&node.id, &handle) {
            Some(edge) => {
                self.session.current_node_id = Some(edge.target.clone());
                self.run();
            }
            // Unwired branch: the selection dead-ends.
            None => self.finish(),
        }
    }

    fn advance_from(&mut self, node_id: &str) {
        match self.graph.first_outgoing(node_id) {
            Some(edge) => self.session.current_node_id = Some(edge.target.clone()),
            None => self.finish(),
        }
    }

    fn finish(&mut self) {
        self.complete = true;
        self.session.current_node_id = None;
        self.session.awaiting = AwaitKind::None;
    }

    fn current_node(&self) -> Option<Node> {
        let id = self.session.current_node_id.as_deref()?;
        self.graph.node(id).cloned()
    }
}

#[derive(Clone, Copy)]
enum ChoiceSource {
    Buttons,
    ListItems,
}

/// Which pause, if any, a node's execution ends in.
fn pause_kind(kind: &NodeKind) -> Option<AwaitKind> {
    if matches!(kind, NodeKind::AskQuestion(_)) {
        Some(AwaitKind::Text)
    } else if !kind.buttons().is_empty() {
        Some(AwaitKind::Button)
    } else if !kind.list_items().is_empty() {
        Some(AwaitKind::List)
    } else {
        None
    }
}

fn declared_kind(awaiting: AwaitKind) -> Option<InputKind> {
    match awaiting {
        AwaitKind::Text => Some(InputKind::Text),
        AwaitKind::Button => Some(InputKind::Button),
        AwaitKind::List => Some(InputKind::List),
        AwaitKind::None => None,
    }
}

/// Trigger and label matching is a trimmed, case-insensitive exact
/// comparison. No fuzzy or partial matches.
fn text_matches(candidate: &str, value: &str) -> bool {
    candidate.trim().to_lowercase() == value.trim().to_lowercase()
}

fn matches_trigger(node: &Node, trigger_text: &str) -> bool {
    match &node.kind {
        NodeKind::FlowStart(c) => c.triggers.iter().any(|t| text_matches(t, trigger_text)),
        _ => false,
    }
}

/// Renders header/body/footer into one bubble, skipping empty sections.
fn render_body(
    header: &str,
    text: &str,
    footer: &str,
    attributes: &ahash::AHashMap<String, String>,
) -> String {
    [header, text, footer]
        .iter()
        .map(|part| interpolate(part, attributes))
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
