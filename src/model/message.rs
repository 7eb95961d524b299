use std::fmt;

use tracing::warn;

use crate::protocol;
use crate::utils::Result;

/// Declared kind of a channel value.
///
/// The three built-in Spacebrew types are modelled directly. Any other type
/// name is carried through untouched as `Custom`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MessageType {
    #[default]
    String,
    Boolean,
    Range,
    Custom(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Range => "range",
            Self::Custom(name) => name,
        }
    }

    /// Whether the wire value is written as a JSON string.
    pub fn is_quoted(&self) -> bool {
        matches!(self, Self::String | Self::Boolean)
    }
}

impl From<&str> for MessageType {
    fn from(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "range" => Self::Range,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for MessageType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed value on a named channel.
///
/// `value` is always stored as text. Its meaning depends on `kind`:
/// booleans are `"true"`/`"false"`, ranges are base-10 integers and strings
/// are opaque. For publish declarations in a `Config` the value is the
/// channel default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub kind: MessageType,
    pub value: String,
}

impl Message {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<MessageType>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            value: value.into(),
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, MessageType::String, value)
    }

    pub fn range(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, MessageType::Range, value.to_string())
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, MessageType::Boolean, if value { "true" } else { "false" })
    }

    /// Read the value as a boolean. Only the exact text `"true"` is true.
    pub fn as_boolean(&self) -> bool {
        if self.kind != MessageType::Boolean {
            warn!(
                channel = %self.name,
                kind = %self.kind,
                "message is not a boolean, reading it as one will most likely give false"
            );
        }
        self.value == "true"
    }

    /// Read the value as a range, parsing the leading integer of the text.
    pub fn as_range(&self) -> i64 {
        if self.kind != MessageType::Range {
            warn!(
                channel = %self.name,
                kind = %self.kind,
                "message is not a range, result may be unpredictable"
            );
        }
        leading_integer(&self.value)
    }

    /// Read the raw value text.
    pub fn as_str(&self) -> &str {
        if self.kind != MessageType::String {
            warn!(
                channel = %self.name,
                kind = %self.kind,
                "message is not a string, returning raw value"
            );
        }
        &self.value
    }

    /// Serialize as a data message sent by `client_name`.
    pub fn to_json(&self, client_name: &str) -> Result<String> {
        protocol::encode_message(client_name, self)
    }
}

/// Routed data seen on the admin channel, tagged with its sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataMessage {
    pub client_name: String,
    pub remote_address: String,
    pub name: String,
    pub kind: MessageType,
    pub value: String,
}

/// Parse the leading integer of `text` the way C's `atoi` does: skip leading
/// whitespace, accept one sign, then digits up to the first non-digit.
/// Returns 0 when nothing parses and saturates instead of overflowing.
pub(crate) fn leading_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}
