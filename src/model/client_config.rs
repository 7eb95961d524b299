use crate::model::message::{Message, MessageType};
use crate::protocol;
use crate::utils::Result;

/// An app's identity and declared capabilities.
///
/// Publish and subscribe entries are declarations, not live values. For
/// publish entries the message value holds the channel default.
///
/// Two configs are equal when `name` and `remote_address` match, regardless
/// of description or channel lists. The admin registry relies on this to
/// tell a re-announced client from a new one.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub name: String,
    pub description: String,
    pub remote_address: String,
    publish: Vec<Message>,
    subscribe: Vec<Message>,
}

impl Config {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_address(name, description, String::new())
    }

    pub fn with_address(
        name: impl Into<String>,
        description: impl Into<String>,
        remote_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            remote_address: remote_address.into(),
            publish: Vec::new(),
            subscribe: Vec::new(),
        }
    }

    /// Declare a publisher channel. Duplicate names are kept.
    pub fn add_publish(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<MessageType>,
        default: impl Into<String>,
    ) {
        self.publish.push(Message::new(name, kind, default));
    }

    pub fn add_publish_message(&mut self, message: Message) {
        self.publish.push(message);
    }

    /// Declare a subscriber channel. Duplicate names are kept.
    pub fn add_subscribe(&mut self, name: impl Into<String>, kind: impl Into<MessageType>) {
        self.subscribe.push(Message::new(name, kind, String::new()));
    }

    pub fn add_subscribe_message(&mut self, message: Message) {
        self.subscribe.push(message);
    }

    pub fn publish(&self) -> &[Message] {
        &self.publish
    }

    pub fn subscribe(&self) -> &[Message] {
        &self.subscribe
    }

    /// First publisher channel declared under `name`.
    pub fn publisher(&self, name: &str) -> Option<&Message> {
        self.publish.iter().find(|m| m.name == name)
    }

    /// First subscriber channel declared under `name`.
    pub fn subscriber(&self, name: &str) -> Option<&Message> {
        self.subscribe.iter().find(|m| m.name == name)
    }

    /// Whether both configs announce the same app. Compares what the
    /// announcement carries: name, description, publishers with their
    /// defaults and subscribers by name and type. The remote address is
    /// ignored.
    pub fn same_declaration(&self, other: &Config) -> bool {
        fn subscriber_key(m: &Message) -> (&str, &MessageType) {
            (&m.name, &m.kind)
        }

        self.name == other.name
            && self.description == other.description
            && self.publish == other.publish
            && self
                .subscribe
                .iter()
                .map(subscriber_key)
                .eq(other.subscribe.iter().map(subscriber_key))
    }

    /// Serialize as the capability announcement sent to the router.
    pub fn to_json(&self) -> Result<String> {
        protocol::encode_config(self)
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.remote_address == other.remote_address
    }
}

impl Eq for Config {}
