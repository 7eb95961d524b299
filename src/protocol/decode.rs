use serde::Deserialize;
use serde_json::Value;
use serde_json::value::RawValue;
use tracing::debug;

use crate::model::{
    Config, DataMessage, Message, MessageType, Route, RouteEndpoint, RouteUpdateType,
};
use crate::protocol::wire::{
    InboundChannel, InboundChannels, InboundConfig, InboundDataMessage, InboundEndpoint,
    InboundRemoval, InboundRoute,
};

/// One registry change announced by the router to an admin connection.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryUpdate {
    /// A client announced (or re-announced) its config.
    Config(Config),
    /// Clients left; each entry is `(name, remote_address)`.
    Remove(Vec<(String, String)>),
    Route {
        action: RouteUpdateType,
        route: Route,
    },
    /// Routed data tagged with its sender.
    Data(DataMessage),
}

/// Textual form of a JSON node: strings as-is, numbers and booleans as
/// their JSON text, null as empty. Arrays and objects keep their JSON text.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn field_text(value: &Value, key: &str) -> String {
    value.get(key).map(text_of).unwrap_or_default()
}

/// Present and not null.
fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

/// Decode a data message frame received by a plain client.
///
/// Returns `None` when the text is not JSON or carries no `message` object.
pub fn decode_data_message(text: &str) -> Option<Message> {
    let json = match serde_json::from_str::<Value>(text) {
        Ok(json) => json,
        Err(e) => {
            debug!("discarding malformed payload: {e}");
            return None;
        }
    };

    let mut message = decode_message_value(&json)?;
    if message.value.is_empty()
        && matches!(message.kind, MessageType::Boolean | MessageType::Range)
    {
        if let Some(digits) = raw_integer_value(text) {
            message.value = digits;
        }
    }
    Some(message)
}

#[derive(Deserialize)]
struct RawFrame<'a> {
    #[serde(borrow)]
    message: RawBody<'a>,
}

#[derive(Deserialize)]
struct RawBody<'a> {
    #[serde(borrow)]
    value: Option<&'a RawValue>,
}

/// Integer literal of the `message.value` field exactly as written, for
/// values too wide to survive a round trip through `Value`.
fn raw_integer_value(text: &str) -> Option<String> {
    let frame: RawFrame<'_> = serde_json::from_str(text).ok()?;
    let literal = frame.message.value?.get();
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    let is_integer = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    is_integer.then(|| literal.to_string())
}

/// Decode the `message` object of an already parsed frame.
///
/// A `string` message only takes a JSON string value. `boolean` and `range`
/// messages take a JSON integer or string. Anything else leaves the value
/// empty.
pub fn decode_message_value(json: &Value) -> Option<Message> {
    let Some(body) = json.get("message").filter(|m| m.is_object()) else {
        debug!("discarding payload without a message object");
        return None;
    };

    let kind = MessageType::from(field_text(body, "type"));
    let value = match (&kind, body.get("value")) {
        (
            MessageType::String | MessageType::Boolean | MessageType::Range,
            Some(Value::String(text)),
        ) => text.clone(),
        (MessageType::Boolean | MessageType::Range, Some(Value::Number(n)))
            if n.is_i64() || n.is_u64() =>
        {
            n.to_string()
        }
        _ => String::new(),
    };

    Some(Message {
        name: field_text(body, "name"),
        kind,
        value,
    })
}

/// Decode one registry update. Shapes are checked in priority order:
/// `config`, `remove`, `route`, then a `message` that names its sender.
pub fn decode_registry_update(json: &Value) -> Option<RegistryUpdate> {
    if let Some(config) = present(json, "config") {
        return decode_config(config).map(RegistryUpdate::Config);
    }

    if let Some(remove) = present(json, "remove") {
        return decode_removals(remove).map(RegistryUpdate::Remove);
    }

    if let Some(route) = present(json, "route") {
        return decode_route(route);
    }

    if let Some(message) = present(json, "message") {
        if present(message, "clientName").is_none() {
            return None;
        }
        return decode_data(message).map(RegistryUpdate::Data);
    }

    debug!("ignoring registry update with no known shape");
    None
}

fn decode_config(json: &Value) -> Option<Config> {
    let inbound = InboundConfig::deserialize(json)
        .map_err(|e| debug!("discarding malformed config: {e}"))
        .ok()?;

    let mut config = Config::with_address(inbound.name, inbound.description, inbound.remote_address);
    for channel in channels(inbound.publish) {
        config.add_publish(channel.name, channel.kind, channel.default);
    }
    for channel in channels(inbound.subscribe) {
        config.add_subscribe(channel.name, channel.kind);
    }
    Some(config)
}

fn channels(list: Option<InboundChannels>) -> Vec<InboundChannel> {
    list.and_then(|l| l.messages).unwrap_or_default()
}

fn decode_removals(json: &Value) -> Option<Vec<(String, String)>> {
    let removals = Vec::<InboundRemoval>::deserialize(json)
        .map_err(|e| debug!("discarding malformed removal notice: {e}"))
        .ok()?;
    Some(
        removals
            .into_iter()
            .map(|r| (r.name, r.remote_address))
            .collect(),
    )
}

fn decode_route(json: &Value) -> Option<RegistryUpdate> {
    let inbound = InboundRoute::deserialize(json)
        .map_err(|e| debug!("discarding malformed route update: {e}"))
        .ok()?;

    let Some(action) = RouteUpdateType::parse(&inbound.action) else {
        debug!("ignoring route update of type '{}'", inbound.action);
        return None;
    };

    let route = Route::new(
        endpoint(inbound.publisher.unwrap_or_default()),
        endpoint(inbound.subscriber.unwrap_or_default()),
    );
    Some(RegistryUpdate::Route { action, route })
}

fn endpoint(inbound: InboundEndpoint) -> RouteEndpoint {
    RouteEndpoint::new(inbound.client_name, inbound.name, inbound.remote_address)
        .with_kind(inbound.kind)
}

fn decode_data(json: &Value) -> Option<DataMessage> {
    let inbound = InboundDataMessage::deserialize(json)
        .map_err(|e| debug!("discarding malformed data message: {e}"))
        .ok()?;
    Some(DataMessage {
        client_name: inbound.client_name,
        remote_address: inbound.remote_address,
        name: inbound.name,
        kind: MessageType::from(inbound.kind),
        value: inbound.value,
    })
}
