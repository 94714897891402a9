//! Common test utilities for building flow graphs.
use waflow::prelude::*;

/// Shorthand for a `Message` node kind with plain text and no buttons.
#[allow(dead_code)]
pub fn message(text: &str) -> NodeKind {
    NodeKind::Message(MessageConfig {
        text: text.to_string(),
        ..Default::default()
    })
}

/// Shorthand for a `FlowStart` node kind with the given triggers.
#[allow(dead_code)]
pub fn flow_start(triggers: &[&str]) -> NodeKind {
    NodeKind::FlowStart(FlowStartConfig {
        triggers: triggers.iter().map(|t| t.to_string()).collect(),
    })
}

/// Shorthand for a required `AskQuestion` node kind storing into `attribute`.
#[allow(dead_code)]
pub fn ask_question(question: &str, attribute: &str, validation: ValidationKind) -> NodeKind {
    NodeKind::AskQuestion(AskQuestionConfig {
        question: question.to_string(),
        attribute_name: attribute.to_string(),
        required: true,
        validation_type: validation,
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn button(id: &str, text: &str) -> Button {
    Button {
        id: id.to_string(),
        text: text.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn list_item(id: &str, title: &str) -> ListItem {
    ListItem {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
    }
}

/// `FlowStart(["hi"]) -> Message("Welcome!")`, no buttons.
#[allow(dead_code)]
pub fn welcome_graph() -> FlowGraph {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let welcome = graph.add_node(message("Welcome!"), Position::default());
    graph
        .add_edge(&start.id, &welcome.id, None)
        .expect("nodes exist");
    graph
}

/// `FlowStart(["hi"]) -> AskQuestion("Your name?", name) -> Message("Hello {{name}}!")`.
#[allow(dead_code)]
pub fn ask_name_graph() -> FlowGraph {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let ask = graph.add_node(
        ask_question("Your name?", "name", ValidationKind::Text),
        Position::default(),
    );
    let hello = graph.add_node(message("Hello {{name}}!"), Position::default());
    graph
        .add_edge(&start.id, &ask.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&ask.id, &hello.id, None)
        .expect("nodes exist");
    graph
}

/// `FlowStart -> Message(Yes/No buttons)`, with the `b1` branch leading to
/// "You said yes" and `b2` to "You said no".
#[allow(dead_code)]
pub fn yes_no_graph() -> FlowGraph {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let question = graph.add_node(
        NodeKind::Message(MessageConfig {
            text: "Continue?".to_string(),
            buttons: vec![button("b1", "Yes"), button("b2", "No")],
            ..Default::default()
        }),
        Position::default(),
    );
    let yes = graph.add_node(message("You said yes"), Position::default());
    let no = graph.add_node(message("You said no"), Position::default());
    graph
        .add_edge(&start.id, &question.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&question.id, &yes.id, Some("b1"))
        .expect("nodes exist");
    graph
        .add_edge(&question.id, &no.id, Some("b2"))
        .expect("nodes exist");
    graph
}

/// Two `SetAttribute` nodes writing the same attribute, then a message
/// rendering it.
#[allow(dead_code)]
pub fn overwrite_graph() -> FlowGraph {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let first = graph.add_node(
        NodeKind::SetAttribute(SetAttributeConfig {
            attribute_name: "plan".to_string(),
            attribute_value: "basic".to_string(),
        }),
        Position::default(),
    );
    let second = graph.add_node(
        NodeKind::SetAttribute(SetAttributeConfig {
            attribute_name: "plan".to_string(),
            attribute_value: "premium".to_string(),
        }),
        Position::default(),
    );
    let show = graph.add_node(message("Plan: {{plan}}"), Position::default());
    graph
        .add_edge(&start.id, &first.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&first.id, &second.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&second.id, &show.id, None)
        .expect("nodes exist");
    graph
}
