use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use waflow::prelude::*;

/// A CLI tool to generate demo flow documents for the waflow simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated flow JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Number of quick-action buttons on the welcome message (1 to 3)
    #[arg(long, default_value_t = 3)]
    buttons: usize,

    /// Number of FAQ list items (1 to 10)
    #[arg(long, default_value_t = 4)]
    faq_items: usize,
}

const TOPICS: &[(&str, &str)] = &[
    ("Opening hours", "We are open 9:00-18:00, Monday to Saturday."),
    ("Shipping", "Orders ship within {{region}} in 2-4 business days."),
    ("Returns", "You can return any item within 30 days."),
    ("Payment methods", "We accept cards, bank transfer and cash on delivery."),
    ("Warranty", "All products carry a 12 month warranty."),
    ("Locations", "Find our stores on the map in the link below."),
    ("Contact", "You can reach support at support@example.com."),
    ("Pricing", "Current pricing is listed on our website."),
    ("Order status", "Reply with your order number and we will check it."),
    ("Careers", "We are hiring! See the careers page for open roles."),
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.buttons == 0 || cli.buttons > MAX_BUTTONS {
        eprintln!("Error: --buttons must be between 1 and {}", MAX_BUTTONS);
        std::process::exit(1);
    }
    if cli.faq_items == 0 || cli.faq_items > MAX_LIST_ITEMS {
        eprintln!("Error: --faq-items must be between 1 and {}", MAX_LIST_ITEMS);
        std::process::exit(1);
    }

    println!(
        "Generating demo flow ({} buttons, {} FAQ items)...",
        cli.buttons, cli.faq_items
    );

    let mut flow = Flow::new("Generated demo flow");
    flow.description = Some("Randomized customer-support flow for simulator testing".to_string());
    build_graph(&mut flow.graph, &mut rng, cli.buttons, cli.faq_items)?;
    flow.sync_triggers();

    let report = Validator::validate(&flow.graph);
    if report.has_errors() {
        // Generator output should always validate; a failure here is a bug.
        for finding in report.errors() {
            eprintln!("  -> {}", finding);
        }
        std::process::exit(1);
    }

    flow.save(&cli.output)?;
    println!(
        "Successfully generated and saved demo flow to '{}'",
        cli.output
    );
    Ok(())
}

fn build_graph(
    graph: &mut FlowGraph,
    rng: &mut ThreadRng,
    buttons: usize,
    faq_items: usize,
) -> Result<()> {
    let start = graph.add_node(
        NodeKind::FlowStart(FlowStartConfig {
            triggers: vec!["hi".into(), "hello".into(), "start".into()],
        }),
        Position::default(),
    );

    let region = graph.add_node(
        NodeKind::SetAttribute(SetAttributeConfig {
            attribute_name: "region".into(),
            attribute_value: pick(rng, &["EU", "US", "APAC"]).into(),
        }),
        Position { x: 0.0, y: 120.0 },
    );

    let menu_buttons: Vec<Button> = ["Browse FAQ", "Talk to us", "Tag me"]
        .iter()
        .take(buttons)
        .enumerate()
        .map(|(i, text)| Button {
            id: format!("btn-{}", i + 1),
            text: (*text).to_string(),
            ..Default::default()
        })
        .collect();
    let welcome = graph.add_node(
        NodeKind::Message(MessageConfig {
            header: "Welcome!".into(),
            text: "Hi there, how can we help you today?".into(),
            buttons: menu_buttons.clone(),
            ..Default::default()
        }),
        Position { x: 0.0, y: 240.0 },
    );

    graph.add_edge(&start.id, &region.id, None)?;
    graph.add_edge(&region.id, &welcome.id, None)?;

    for button in &menu_buttons {
        let target = match button.text.as_str() {
            "Browse FAQ" => build_faq_branch(graph, rng, faq_items)?,
            "Talk to us" => build_contact_branch(graph)?,
            _ => build_tag_branch(graph)?,
        };
        graph.add_edge(&welcome.id, &target, Some(&button.id))?;
    }
    Ok(())
}

fn build_faq_branch(
    graph: &mut FlowGraph,
    rng: &mut ThreadRng,
    faq_items: usize,
) -> Result<String> {
    let offset = rng.random_range(0..TOPICS.len());
    let topics: Vec<(&str, &str)> = (0..faq_items)
        .map(|i| TOPICS[(offset + i) % TOPICS.len()])
        .collect();

    let items: Vec<ListItem> = topics
        .iter()
        .enumerate()
        .map(|(i, (title, _))| ListItem {
            id: format!("faq-{}", i + 1),
            title: (*title).to_string(),
            description: String::new(),
        })
        .collect();
    let list = graph.add_node(
        NodeKind::List(ListConfig {
            text: "Pick a topic:".into(),
            items: items.clone(),
            ..Default::default()
        }),
        Position {
            x: -200.0,
            y: 360.0,
        },
    );

    for (item, (_, answer)) in items.iter().zip(topics.iter()) {
        let reply = graph.add_node(
            NodeKind::Message(MessageConfig {
                text: (*answer).to_string(),
                ..Default::default()
            }),
            Position {
                x: -200.0,
                y: 480.0,
            },
        );
        graph.add_edge(&list.id, &reply.id, Some(&item.id))?;
    }
    Ok(list.id)
}

fn build_contact_branch(graph: &mut FlowGraph) -> Result<String> {
    let ask_name = graph.add_node(
        NodeKind::AskQuestion(AskQuestionConfig {
            question: "What is your name?".into(),
            attribute_name: "name".into(),
            required: true,
            ..Default::default()
        }),
        Position { x: 0.0, y: 360.0 },
    );
    let ask_email = graph.add_node(
        NodeKind::AskQuestion(AskQuestionConfig {
            question: "Thanks {{name}}! What is your email address?".into(),
            attribute_name: "email".into(),
            required: true,
            validation_type: ValidationKind::Email,
            error_message: "That does not look like an email address, please try again.".into(),
            ..Default::default()
        }),
        Position { x: 0.0, y: 480.0 },
    );
    let lookup = graph.add_node(
        NodeKind::ApiRequest(ApiRequestConfig {
            url: "https://api.example.com/contacts".into(),
            method: HttpMethod::Post,
            response_attribute: "contact_response".into(),
        }),
        Position { x: 0.0, y: 600.0 },
    );
    let done = graph.add_node(
        NodeKind::Message(MessageConfig {
            text: "Got it {{name}}, we will reach out at {{email}} shortly.".into(),
            ..Default::default()
        }),
        Position { x: 0.0, y: 720.0 },
    );

    graph.add_edge(&ask_name.id, &ask_email.id, None)?;
    graph.add_edge(&ask_email.id, &lookup.id, None)?;
    graph.add_edge(&lookup.id, &done.id, None)?;
    Ok(ask_name.id)
}

fn build_tag_branch(graph: &mut FlowGraph) -> Result<String> {
    let tag = graph.add_node(
        NodeKind::AddTag(AddTagConfig {
            tag_id: "tag-newsletter".into(),
            tag_name: "newsletter".into(),
        }),
        Position { x: 200.0, y: 360.0 },
    );
    let confirm = graph.add_node(
        NodeKind::Template(TemplateConfig {
            template_id: "tpl-subscribed".into(),
            template_name: "subscribed".into(),
            text: "You are subscribed to our updates in {{region}}.".into(),
        }),
        Position { x: 200.0, y: 480.0 },
    );
    graph.add_edge(&tag.id, &confirm.id, None)?;
    Ok(tag.id)
}

fn pick<'a>(rng: &mut ThreadRng, options: &[&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}
