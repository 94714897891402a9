use serde::{Deserialize, Serialize};

/// Maximum quick-action buttons a `Message` or `MediaButtons` node may carry.
pub const MAX_BUTTONS: usize = 3;
/// Maximum selectable rows a `List` node may carry.
pub const MAX_LIST_ITEMS: usize = 10;

/// Editor canvas coordinate. Irrelevant to execution semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A single step in an automation flow.
///
/// The wire shape matches the node-editor export: `id` and `position` at the
/// top level, with the variant tag in `type` and its configuration in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Whether this node is a flow entry point variant (regardless of wiring).
    pub fn is_start(&self) -> bool {
        matches!(self.kind, NodeKind::FlowStart(_))
    }
}

/// The closed set of node variants and their configuration payloads.
///
/// The validator and simulator both match exhaustively on this enum, so a new
/// variant cannot be added without updating every interpretation site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum NodeKind {
    FlowStart(FlowStartConfig),
    Message(MessageConfig),
    MediaButtons(MediaButtonsConfig),
    List(ListConfig),
    AskQuestion(AskQuestionConfig),
    Template(TemplateConfig),
    SetAttribute(SetAttributeConfig),
    AddTag(AddTagConfig),
    ApiRequest(ApiRequestConfig),
}

impl NodeKind {
    /// The camelCase tag used on the wire and as the id prefix for new nodes.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::FlowStart(_) => "flowStart",
            NodeKind::Message(_) => "message",
            NodeKind::MediaButtons(_) => "mediaButtons",
            NodeKind::List(_) => "list",
            NodeKind::AskQuestion(_) => "askQuestion",
            NodeKind::Template(_) => "template",
            NodeKind::SetAttribute(_) => "setAttribute",
            NodeKind::AddTag(_) => "addTag",
            NodeKind::ApiRequest(_) => "apiRequest",
        }
    }

    /// Quick-action buttons carried by this node, empty for non-button variants.
    pub fn buttons(&self) -> &[Button] {
        match self {
            NodeKind::Message(c) => &c.buttons,
            NodeKind::MediaButtons(c) => &c.buttons,
            _ => &[],
        }
    }

    /// Selectable list rows carried by this node, empty for non-list variants.
    pub fn list_items(&self) -> &[ListItem] {
        match self {
            NodeKind::List(c) => &c.items,
            _ => &[],
        }
    }

    /// Whether executing this node appends a bot message to the transcript.
    pub fn emits_message(&self) -> bool {
        matches!(
            self,
            NodeKind::Message(_)
                | NodeKind::MediaButtons(_)
                | NodeKind::List(_)
                | NodeKind::AskQuestion(_)
                | NodeKind::Template(_)
        )
    }

    /// Returns `(count, limit)` when this node carries more branches than its
    /// variant allows.
    pub fn branch_overflow(&self) -> Option<(usize, usize)> {
        let buttons = self.buttons().len();
        if buttons > MAX_BUTTONS {
            return Some((buttons, MAX_BUTTONS));
        }
        let items = self.list_items().len();
        if items > MAX_LIST_ITEMS {
            return Some((items, MAX_LIST_ITEMS));
        }
        None
    }
}

/// Entry point; activated when incoming text matches one of the triggers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowStartConfig {
    pub triggers: Vec<String>,
}

/// Emits a text bubble, optionally with up to [`MAX_BUTTONS`] quick-action buttons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageConfig {
    pub text: String,
    pub header: String,
    pub footer: String,
    pub buttons: Vec<Button>,
}

/// Like `Message` but leads with an attached media item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaButtonsConfig {
    pub media_type: MediaKind,
    pub media_url: String,
    pub text: String,
    pub buttons: Vec<Button>,
}

/// Emits a selectable list of up to [`MAX_LIST_ITEMS`] rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListConfig {
    pub header: String,
    pub text: String,
    pub footer: String,
    pub items: Vec<ListItem>,
}

/// Pauses for free-text input and stores the answer into a session attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AskQuestionConfig {
    pub question: String,
    pub attribute_name: String,
    pub required: bool,
    pub validation_type: ValidationKind,
    /// Pattern for [`ValidationKind::Regex`]. An unset or non-compiling
    /// pattern accepts any input.
    pub validation_pattern: Option<String>,
    pub error_message: String,
}

/// Emits a pre-approved message template's rendered text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateConfig {
    pub template_id: String,
    pub template_name: String,
    pub text: String,
}

/// Writes a session attribute and auto-advances. No user-visible output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetAttributeConfig {
    pub attribute_name: String,
    /// May contain `{{variable}}` placeholders, interpolated at execution time.
    pub attribute_value: String,
}

/// Tags the contact and auto-advances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddTagConfig {
    pub tag_id: String,
    pub tag_name: String,
}

/// Simulated external call; optionally stores a canned response and auto-advances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiRequestConfig {
    pub url: String,
    pub method: HttpMethod,
    /// Session attribute that receives the simulated response body. Empty
    /// means the response is discarded.
    pub response_attribute: String,
}

/// A quick-action button attached to a `Message` or `MediaButtons` node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Button {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    #[default]
    QuickReply,
    Postback,
    Url,
}

/// A selectable row of a `List` node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
    Document,
}

/// Validation applied to an `AskQuestion` answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationKind {
    #[default]
    Text,
    Number,
    Email,
    Regex,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}
