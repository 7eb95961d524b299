use std::fmt;

use crate::model::message::MessageType;

/// One side of a route: a channel on a specific client.
///
/// Identity is `(client_name, name, remote_address)`. The declared `kind` is
/// carried for the router's benefit and takes no part in equality.
#[derive(Debug, Clone, Default)]
pub struct RouteEndpoint {
    pub client_name: String,
    pub name: String,
    pub remote_address: String,
    pub kind: MessageType,
}

impl RouteEndpoint {
    pub fn new(
        client_name: impl Into<String>,
        name: impl Into<String>,
        remote_address: impl Into<String>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            name: name.into(),
            remote_address: remote_address.into(),
            kind: MessageType::default(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<MessageType>) -> Self {
        self.kind = kind.into();
        self
    }
}

impl PartialEq for RouteEndpoint {
    fn eq(&self, other: &Self) -> bool {
        self.client_name == other.client_name
            && self.name == other.name
            && self.remote_address == other.remote_address
    }
}

impl Eq for RouteEndpoint {}

impl fmt::Display for RouteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.client_name, self.remote_address, self.name)
    }
}

/// An active link from a publisher channel to a subscriber channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub publisher: RouteEndpoint,
    pub subscriber: RouteEndpoint,
}

impl Route {
    pub fn new(publisher: RouteEndpoint, subscriber: RouteEndpoint) -> Self {
        Self {
            publisher,
            subscriber,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.publisher, self.subscriber)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteUpdateType {
    Add,
    Remove,
}

impl RouteUpdateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}
