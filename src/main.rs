use std::env;
use waflow::prelude::*;

fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: cargo run -- <path/to/flow.json> [trigger text]");
        std::process::exit(1);
    }

    let flow_path = &args[1];
    let trigger = args.get(2);

    println!("Loading flow from: {}", flow_path);
    let flow = match Flow::load(flow_path) {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("Failed to load flow '{}': {}", flow_path, e);
            std::process::exit(1);
        }
    };
    println!(
        "Loaded flow '{}' ({} nodes, {} edges)",
        flow.name,
        flow.graph.nodes.len(),
        flow.graph.edges.len()
    );

    // Validation phase
    println!("\nValidating flow...");
    let report = Validator::validate(&flow.graph);
    if report.is_empty() {
        println!("  -> No findings. Flow is clean.");
    } else {
        for finding in &report.findings {
            println!("  -> {}", finding);
        }
    }
    if report.has_errors() {
        eprintln!("\nFlow has validation errors; simulation refused.");
        std::process::exit(1);
    }

    // Simulation phase
    let (mode, trigger_text) = match trigger {
        Some(text) => (TriggerMode::Match, text.as_str()),
        None => {
            println!("\nNo trigger text provided. Using the first start node.");
            (TriggerMode::FirstStart, "")
        }
    };

    println!("\nStarting simulation...");
    let mut sim = Simulator::new(&flow.graph, mode);
    let state = match sim.start(trigger_text) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Simulation refused: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n--- Transcript ---");
    for message in &state.messages {
        let who = match message.role {
            MessageRole::Bot => "bot ",
            MessageRole::User => "user",
        };
        println!("[{}] {}", who, message.content);
    }
    if state.messages.is_empty() {
        println!("(no messages; the trigger matched no start node)");
    }

    println!("\nSimulation state:");
    println!("  waiting for input: {}", state.is_waiting_for_input);
    println!("  complete:          {}", state.is_complete);
    if state.is_waiting_for_input {
        println!("\nThe flow is paused for a reply.");
        println!("Run `waflow-cli -i` (requires the 'waflow-cli' feature) for an interactive session.");
    }
    println!();
}
