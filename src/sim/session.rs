use crate::graph::{Button, ListItem, MediaKind};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// What kind of reply the simulator is paused for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AwaitKind {
    #[default]
    None,
    Text,
    Button,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Bot,
    User,
}

/// One entry of the simulated conversation transcript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list_items: Vec<ListItem>,
}

impl SimMessage {
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Bot, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            media_url: None,
            media_type: None,
            buttons: Vec::new(),
            list_items: Vec::new(),
        }
    }

    pub fn with_media(mut self, kind: MediaKind, url: impl Into<String>) -> Self {
        self.media_type = Some(kind);
        self.media_url = Some(url.into());
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_list_items(mut self, items: Vec<ListItem>) -> Self {
        self.list_items = items;
        self
    }
}

/// Runtime state of one simulated conversation.
///
/// Created when simulation starts, mutated by each step, discarded on close.
/// Never part of the persisted flow document.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub attributes: AHashMap<String, String>,
    pub current_node_id: Option<String>,
    pub awaiting: AwaitKind,
    pub transcript: Vec<SimMessage>,
    tags: Vec<(String, String)>,
}

impl Session {
    /// Drops all state, returning the session to its pristine shape.
    pub fn reset(&mut self) {
        *self = Session::default();
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.awaiting != AwaitKind::None
    }

    /// Writes an attribute. Later writes to the same name overwrite earlier
    /// ones (last-write-wins).
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        debug!(attribute = %name, %value, "set session attribute");
        self.attributes.insert(name, value);
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn push_bot(&mut self, message: SimMessage) {
        self.transcript.push(message);
    }

    pub fn push_user(&mut self, content: &str) {
        self.transcript.push(SimMessage::user(content));
    }

    /// Records a tag applied to the simulated contact. Pure bookkeeping; the
    /// transcript is unaffected.
    pub fn record_tag(&mut self, tag_id: &str, tag_name: &str) {
        debug!(tag = %tag_name, "tag contact");
        self.tags.push((tag_id.to_string(), tag_name.to_string()));
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }
}
