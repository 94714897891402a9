//! Tests for the conversation simulator: trigger resolution, the
//! auto-advance loop, pauses, branching and failure degradation.
mod common;
use common::*;
use waflow::prelude::*;
use waflow::sim::CANNED_API_RESPONSE;

fn bot_contents(state: &SimState) -> Vec<&str> {
    state
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Bot)
        .map(|m| m.content.as_str())
        .collect()
}

#[test]
fn test_linear_flow_runs_to_completion() {
    let mut sim = Simulator::new(&welcome_graph(), TriggerMode::Match);
    let state = sim.start("hi").expect("clean graph starts");

    assert_eq!(bot_contents(&state), vec!["Welcome!"]);
    assert!(!state.is_waiting_for_input);
    assert!(state.is_complete);
    assert_eq!(sim.status(), SimStatus::Complete);
}

#[test]
fn test_trigger_matching_is_trimmed_and_case_insensitive() {
    let mut sim = Simulator::new(&welcome_graph(), TriggerMode::Match);
    let state = sim.start("  HI  ").expect("clean graph starts");
    assert_eq!(state.messages.len(), 1);
    assert!(state.is_complete);
}

#[test]
fn test_unmatched_trigger_completes_with_empty_transcript() {
    let mut sim = Simulator::new(&welcome_graph(), TriggerMode::Match);
    let state = sim.start("goodbye").expect("start itself is not refused");
    assert!(state.messages.is_empty());
    assert!(state.is_complete);
}

#[test]
fn test_first_start_mode_ignores_trigger_text() {
    let mut sim = Simulator::new(&welcome_graph(), TriggerMode::FirstStart);
    let state = sim.start("anything at all").expect("clean graph starts");
    assert_eq!(state.messages.len(), 1);
    assert!(state.is_complete);
}

#[test]
fn test_ask_question_pauses_then_interpolates_answer() {
    let mut sim = Simulator::new(&ask_name_graph(), TriggerMode::Match);

    let state = sim.start("hi").expect("clean graph starts");
    assert_eq!(bot_contents(&state), vec!["Your name?"]);
    assert!(state.is_waiting_for_input);
    assert!(!state.is_complete);
    assert_eq!(sim.status(), SimStatus::WaitingForInput);

    let state = sim.handle_user_input("Alice", InputKind::Text);
    assert_eq!(bot_contents(&state), vec!["Your name?", "Hello Alice!"]);
    assert_eq!(sim.session().attribute("name"), Some("Alice"));
    assert!(state.is_complete);
}

#[test]
fn test_required_validation_failure_reprompts_same_node() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let ask = graph.add_node(
        ask_question("How old are you?", "age", ValidationKind::Number),
        Position::default(),
    );
    let done = graph.add_node(message("You are {{age}}."), Position::default());
    graph
        .add_edge(&start.id, &ask.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&ask.id, &done.id, None)
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");

    // Invalid answer: error prompt, still waiting on the same question.
    let state = sim.handle_user_input("not a number", InputKind::Text);
    assert!(state.is_waiting_for_input);
    assert!(!state.is_complete);
    let last_bot = *bot_contents(&state).last().expect("error prompt");
    assert_eq!(last_bot, "Please enter a valid number.");
    assert!(sim.session().attribute("age").is_none());

    // Valid answer advances.
    let state = sim.handle_user_input("42", InputKind::Text);
    assert!(state.is_complete);
    assert_eq!(*bot_contents(&state).last().expect("final message"), "You are 42.");
}

#[test]
fn test_optional_question_accepts_invalid_answer() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let ask = graph.add_node(
        NodeKind::AskQuestion(AskQuestionConfig {
            question: "Email, if you like?".to_string(),
            attribute_name: "email".to_string(),
            required: false,
            validation_type: ValidationKind::Email,
            ..Default::default()
        }),
        Position::default(),
    );
    let done = graph.add_node(message("Thanks!"), Position::default());
    graph
        .add_edge(&start.id, &ask.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&ask.id, &done.id, None)
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");
    let state = sim.handle_user_input("no thanks", InputKind::Text);

    assert!(state.is_complete);
    assert_eq!(sim.session().attribute("email"), Some("no thanks"));
}

#[test]
fn test_custom_error_message_is_used() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let ask = graph.add_node(
        NodeKind::AskQuestion(AskQuestionConfig {
            question: "Ticket id?".to_string(),
            attribute_name: "ticket".to_string(),
            required: true,
            validation_type: ValidationKind::Regex,
            validation_pattern: Some(r"^T-\d+$".to_string()),
            error_message: "Ids look like T-123.".to_string(),
        }),
        Position::default(),
    );
    graph
        .add_edge(&start.id, &ask.id, None)
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");

    let state = sim.handle_user_input("123", InputKind::Text);
    assert_eq!(*bot_contents(&state).last().expect("error prompt"), "Ids look like T-123.");
    assert!(state.is_waiting_for_input);

    let state = sim.handle_user_input("T-123", InputKind::Text);
    assert_eq!(sim.session().attribute("ticket"), Some("T-123"));
    // The question has no follow-up edge, so the flow completes.
    assert!(state.is_complete);
}

#[test]
fn test_button_branching_takes_only_selected_branch() {
    let mut sim = Simulator::new(&yes_no_graph(), TriggerMode::Match);
    let state = sim.start("hi").expect("clean graph starts");
    assert!(state.is_waiting_for_input);

    let state = sim.handle_user_input("Yes", InputKind::Button);
    let bots = bot_contents(&state);
    assert!(bots.contains(&"You said yes"));
    assert!(!bots.contains(&"You said no"));
    assert!(state.is_complete);
}

#[test]
fn test_button_matching_is_case_insensitive() {
    let mut sim = Simulator::new(&yes_no_graph(), TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");
    let state = sim.handle_user_input("  yes ", InputKind::Button);
    assert!(bot_contents(&state).contains(&"You said yes"));
}

#[test]
fn test_unknown_button_reply_stays_waiting() {
    let mut sim = Simulator::new(&yes_no_graph(), TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");

    let state = sim.handle_user_input("Maybe", InputKind::Button);
    assert!(state.is_waiting_for_input);
    assert!(!state.is_complete);
    // The unknown reply still lands in the transcript as a user message.
    assert_eq!(
        state.messages.last().map(|m| m.content.as_str()),
        Some("Maybe")
    );
}

#[test]
fn test_list_selection_follows_item_handle() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["menu"]), Position::default());
    let list = graph.add_node(
        NodeKind::List(ListConfig {
            text: "Pick a topic".to_string(),
            items: vec![list_item("i1", "Shipping"), list_item("i2", "Returns")],
            ..Default::default()
        }),
        Position::default(),
    );
    let shipping = graph.add_node(message("Ships in 2 days"), Position::default());
    let returns = graph.add_node(message("30 day returns"), Position::default());
    graph
        .add_edge(&start.id, &list.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&list.id, &shipping.id, Some("i1"))
        .expect("nodes exist");
    graph
        .add_edge(&list.id, &returns.id, Some("i2"))
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    let state = sim.start("menu").expect("clean graph starts");
    assert!(state.is_waiting_for_input);
    assert_eq!(state.messages[0].list_items.len(), 2);

    let state = sim.handle_user_input("Returns", InputKind::List);
    let bots = bot_contents(&state);
    assert!(bots.contains(&"30 day returns"));
    assert!(!bots.contains(&"Ships in 2 days"));
    assert!(state.is_complete);
}

#[test]
fn test_unwired_button_branch_dead_ends() {
    let mut graph = yes_no_graph();
    let no_edge = graph
        .edges
        .iter()
        .find(|e| e.source_handle.as_deref() == Some("b2"))
        .expect("b2 edge")
        .id
        .clone();
    graph.remove_edge(&no_edge);

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    sim.start("hi").expect("warnings do not block");
    let state = sim.handle_user_input("No", InputKind::Button);
    // The selection matched a button with no wired edge: hard stop.
    assert!(state.is_complete);
    assert!(!state.is_waiting_for_input);
}

#[test]
fn test_attribute_overwrite_is_last_write_wins() {
    let mut sim = Simulator::new(&overwrite_graph(), TriggerMode::Match);
    let state = sim.start("hi").expect("clean graph starts");

    assert_eq!(sim.session().attribute("plan"), Some("premium"));
    assert_eq!(bot_contents(&state), vec!["Plan: premium"]);
    assert!(state.is_complete);
}

#[test]
fn test_unknown_placeholder_renders_verbatim() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let show = graph.add_node(message("Hello {{undefinedVar}}!"), Position::default());
    graph
        .add_edge(&start.id, &show.id, None)
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    let state = sim.start("hi").expect("clean graph starts");
    assert_eq!(bot_contents(&state), vec!["Hello {{undefinedVar}}!"]);
}

#[test]
fn test_api_request_stores_canned_response() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let call = graph.add_node(
        NodeKind::ApiRequest(ApiRequestConfig {
            url: "https://api.example.com/orders".to_string(),
            method: HttpMethod::Get,
            response_attribute: "order_response".to_string(),
        }),
        Position::default(),
    );
    let show = graph.add_node(message("Response: {{order_response}}"), Position::default());
    graph
        .add_edge(&start.id, &call.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&call.id, &show.id, None)
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    let state = sim.start("hi").expect("clean graph starts");
    assert_eq!(
        sim.session().attribute("order_response"),
        Some(CANNED_API_RESPONSE)
    );
    assert_eq!(
        bot_contents(&state),
        vec![format!("Response: {CANNED_API_RESPONSE}").as_str()]
    );
}

#[test]
fn test_add_tag_records_on_session_only() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let tag = graph.add_node(
        NodeKind::AddTag(AddTagConfig {
            tag_id: "t1".to_string(),
            tag_name: "lead".to_string(),
        }),
        Position::default(),
    );
    let bye = graph.add_node(message("Done"), Position::default());
    graph
        .add_edge(&start.id, &tag.id, None)
        .expect("nodes exist");
    graph
        .add_edge(&tag.id, &bye.id, None)
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    let state = sim.start("hi").expect("clean graph starts");
    let tags = sim.session().tags();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0], ("t1".to_string(), "lead".to_string()));
    // Tagging produces no transcript entry of its own.
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn test_validation_errors_refuse_start() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let ask = graph.add_node(
        ask_question("", "name", ValidationKind::Text),
        Position::default(),
    );
    graph
        .add_edge(&start.id, &ask.id, None)
        .expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    match sim.start("hi") {
        Err(StartError::ValidationFailed { findings }) => {
            assert!(!findings.is_empty());
            assert!(findings.iter().all(|f| f.severity == Severity::Error));
        }
        Ok(_) => panic!("start should be refused on validation errors"),
    }
    assert_eq!(sim.status(), SimStatus::Idle);
}

#[test]
fn test_warnings_do_not_block_start() {
    let mut graph = welcome_graph();
    graph.add_node(flow_start(&["hello"]), Position::default());

    let report = Validator::validate(&graph);
    assert!(!report.is_empty());
    assert!(!report.has_errors());

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    assert!(sim.start("hi").is_ok());
}

#[test]
fn test_input_before_start_is_a_noop() {
    let mut sim = Simulator::new(&welcome_graph(), TriggerMode::Match);
    let state = sim.handle_user_input("hello?", InputKind::Text);
    assert!(state.messages.is_empty());
    assert!(!state.is_complete);
    assert_eq!(sim.status(), SimStatus::Idle);
}

#[test]
fn test_input_after_completion_is_a_noop() {
    let mut sim = Simulator::new(&welcome_graph(), TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");

    let before = sim.handle_user_input("extra", InputKind::Text);
    assert!(before.is_complete);
    // The stray input is not appended to a finished transcript.
    assert_eq!(before.messages.len(), 1);
}

#[test]
fn test_side_effect_cycle_terminates() {
    let mut graph = FlowGraph::new();
    let start = graph.add_node(flow_start(&["hi"]), Position::default());
    let a = graph.add_node(
        NodeKind::SetAttribute(SetAttributeConfig {
            attribute_name: "x".to_string(),
            attribute_value: "1".to_string(),
        }),
        Position::default(),
    );
    let b = graph.add_node(
        NodeKind::SetAttribute(SetAttributeConfig {
            attribute_name: "y".to_string(),
            attribute_value: "2".to_string(),
        }),
        Position::default(),
    );
    graph.add_edge(&start.id, &a.id, None).expect("nodes exist");
    graph.add_edge(&a.id, &b.id, None).expect("nodes exist");
    // A cycle of pure side-effect nodes must not spin forever.
    graph.add_edge(&b.id, &a.id, None).expect("nodes exist");

    let mut sim = Simulator::new(&graph, TriggerMode::Match);
    let state = sim.start("hi").expect("cycle is not a validation error");
    assert!(state.is_complete);
}

#[test]
fn test_close_returns_to_idle() {
    let mut sim = Simulator::new(&ask_name_graph(), TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");
    assert_eq!(sim.status(), SimStatus::WaitingForInput);

    sim.close();
    assert_eq!(sim.status(), SimStatus::Idle);
    assert!(sim.session().transcript.is_empty());
    assert!(sim.session().attributes.is_empty());

    // A closed simulator can start a fresh run.
    let state = sim.start("hi").expect("restart succeeds");
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn test_restart_resets_session() {
    let mut sim = Simulator::new(&ask_name_graph(), TriggerMode::Match);
    sim.start("hi").expect("clean graph starts");
    sim.handle_user_input("Alice", InputKind::Text);

    let state = sim.start("hi").expect("restart succeeds");
    assert_eq!(state.messages.len(), 1, "transcript starts over");
    assert!(sim.session().attribute("name").is_none());
}
