use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use waflow::prelude::*;

// --- JSON Deserialization Structs (Input Format Specific) ---
// These structs match the bare editor export (no envelope metadata) and are
// only used here for conversion.

#[derive(Deserialize)]
struct RawEditorExport {
    name: Option<String>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

// --- Converter Implementation ---
// This implements the conversion from the bare editor export to the
// canonical Flow document.

impl IntoFlow for RawEditorExport {
    fn into_flow(self) -> Result<Flow, FlowConversionError> {
        if self.nodes.is_empty() {
            return Err(FlowConversionError::ValidationError(
                "editor export contains no nodes".to_string(),
            ));
        }
        let mut flow = Flow::new(self.name.unwrap_or_else(|| "Imported flow".to_string()));
        flow.graph.nodes = self.nodes;
        flow.graph.edges = self.edges;
        flow.sync_triggers();
        Ok(flow)
    }
}

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeCli {
    /// Match the trigger text against start-node triggers
    Match,
    /// Always use the first start node (manual test mode)
    FirstStart,
}

/// A chatbot flow validation and conversation simulation CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow JSON file
    flow_path: Option<String>,

    /// Trigger text used to activate the flow
    #[arg(short, long)]
    trigger: Option<String>,

    /// How the entry node is resolved
    #[arg(short, long, value_enum)]
    mode: Option<ModeCli>,

    /// Treat the input as a bare editor export instead of a flow document
    #[arg(long)]
    raw: bool,

    /// Validate the flow and exit without simulating
    #[arg(long)]
    validate_only: bool,

    /// Run in interactive mode and type the replies yourself
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let flow_path = cli
        .flow_path
        .clone()
        .unwrap_or_else(|| exit_with_error("Flow path is required."));

    let flow = load_flow(&flow_path, cli.raw);
    println!(
        "Loaded flow '{}' ({} nodes, {} edges)",
        flow.name,
        flow.graph.nodes.len(),
        flow.graph.edges.len()
    );

    // --- Validation ---
    let report = Validator::validate(&flow.graph);
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    println!(
        "\nValidation: {} error(s), {} warning(s)",
        errors, warnings
    );
    for finding in &report.findings {
        println!("  -> {}", finding);
    }
    if cli.validate_only {
        std::process::exit(if errors > 0 { 1 } else { 0 });
    }
    if errors > 0 {
        exit_with_error("Flow has validation errors; simulation refused.");
    }

    // --- Simulation ---
    let (mode, trigger) = resolve_mode(&cli);
    let mut sim = Simulator::new(&flow.graph, mode);
    let state = sim
        .start(&trigger)
        .unwrap_or_else(|e| exit_with_error(&format!("Simulation refused: {}", e)));

    println!("\n--- Conversation ---");
    let mut printed = print_messages(&state.messages, 0);

    if cli.human {
        run_chat_loop(&mut sim, state, &mut printed);
    } else if state.is_waiting_for_input {
        println!("\n(flow is paused for a reply; re-run with -i to chat interactively)");
    }

    print_summary(&sim);
}

fn load_flow(path: &str, raw: bool) -> Flow {
    if raw {
        let json = fs::read_to_string(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
        let export: RawEditorExport = serde_json::from_str(&json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse editor export: {}", e)));
        export
            .into_flow()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert editor export: {}", e)))
    } else {
        Flow::load(path).unwrap_or_else(|e| exit_with_error(&format!("{}", e)))
    }
}

fn resolve_mode(cli: &Cli) -> (TriggerMode, String) {
    let mode = match (cli.mode, &cli.trigger) {
        (Some(ModeCli::Match), _) => TriggerMode::Match,
        (Some(ModeCli::FirstStart), _) => TriggerMode::FirstStart,
        // No explicit mode: match when a trigger was given, first start otherwise.
        (None, Some(_)) => TriggerMode::Match,
        (None, None) => TriggerMode::FirstStart,
    };
    (mode, cli.trigger.clone().unwrap_or_default())
}

/// Prints transcript entries from `from` onward and returns the new length.
fn print_messages(messages: &[SimMessage], from: usize) -> usize {
    for message in &messages[from..] {
        match message.role {
            MessageRole::Bot => {
                println!("bot  | {}", message.content);
                if let Some(url) = &message.media_url {
                    println!("     | [media: {}]", url);
                }
                for button in &message.buttons {
                    println!("     | ({})", button.text);
                }
                for item in &message.list_items {
                    if item.description.is_empty() {
                        println!("     | - {}", item.title);
                    } else {
                        println!("     | - {}: {}", item.title, item.description);
                    }
                }
            }
            MessageRole::User => println!("you  | {}", message.content),
        }
    }
    messages.len()
}

fn run_chat_loop(sim: &mut Simulator, mut state: SimState, printed: &mut usize) {
    while state.is_waiting_for_input {
        let kind = match sim.session().awaiting {
            AwaitKind::Text => InputKind::Text,
            AwaitKind::Button => InputKind::Button,
            AwaitKind::List => InputKind::List,
            AwaitKind::None => break,
        };
        let reply = prompt_for_input("You");
        if reply.is_empty() {
            println!("(empty reply ignored; type 'quit' to stop)");
            continue;
        }
        if reply.eq_ignore_ascii_case("quit") {
            sim.close();
            println!("(conversation closed)");
            return;
        }
        state = sim.handle_user_input(&reply, kind);
        *printed = print_messages(&state.messages, *printed);
    }
    if state.is_complete {
        println!("\n(conversation complete)");
    }
}

fn print_summary(sim: &Simulator) {
    let session = sim.session();
    if !session.attributes.is_empty() {
        println!("\n--- Session attributes ---");
        let mut names: Vec<_> = session.attributes.keys().collect();
        names.sort();
        for name in names {
            println!("  {} = {}", name, session.attributes[name]);
        }
    }
    if !session.tags().is_empty() {
        println!("\n--- Tags applied ---");
        for (_, tag_name) in session.tags() {
            println!("  {}", tag_name);
        }
    }
    println!();
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str) -> String {
    let mut line = String::new();
    print!("> {}: ", prompt_text);
    io::stdout().flush().unwrap();

    io::stdin()
        .read_line(&mut line)
        .expect("Failed to read line");
    line.trim().to_string()
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
