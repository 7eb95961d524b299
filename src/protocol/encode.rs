use serde_json::value::{RawValue, to_raw_value};

use crate::model::{Config, Message, Route, RouteEndpoint, RouteUpdateType};
use crate::protocol::wire::{
    AdminEnvelope, AdminFlags, ChannelList, ConfigBody, ConfigEnvelope, DataBody, DataEnvelope,
    EndpointBody, PublishEntry, RouteBody, RouteEnvelope, SubscribeEntry,
};
use crate::utils::Result;

/// Encode a data message published by `client_name`.
///
/// String and boolean values are sent quoted. Every other type is written
/// verbatim as a raw JSON value; text that is not valid JSON falls back to a
/// JSON string so the frame stays well formed.
pub fn encode_message(client_name: &str, message: &Message) -> Result<String> {
    let value = if message.kind.is_quoted() {
        to_raw_value(&message.value)?
    } else {
        match RawValue::from_string(message.value.clone()) {
            Ok(raw) => raw,
            Err(_) => to_raw_value(&message.value)?,
        }
    };

    let envelope = DataEnvelope {
        message: DataBody {
            client_name,
            name: &message.name,
            kind: message.kind.as_str(),
            value,
        },
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Encode the capability announcement for `config`.
pub fn encode_config(config: &Config) -> Result<String> {
    let envelope = ConfigEnvelope {
        config: ConfigBody {
            name: &config.name,
            description: &config.description,
            publish: ChannelList {
                messages: config
                    .publish()
                    .iter()
                    .map(|m| PublishEntry {
                        name: &m.name,
                        kind: m.kind.as_str(),
                        default: &m.value,
                    })
                    .collect(),
            },
            subscribe: ChannelList {
                messages: config
                    .subscribe()
                    .iter()
                    .map(|m| SubscribeEntry {
                        name: &m.name,
                        kind: m.kind.as_str(),
                    })
                    .collect(),
            },
        },
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Encode the frame that registers a connection as an admin.
pub fn encode_admin_registration() -> Result<String> {
    let envelope = AdminEnvelope {
        admin: [AdminFlags {
            admin: true,
            no_msgs: true,
        }],
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Encode a request asking the router to add or remove `route`.
pub fn encode_route_update(action: RouteUpdateType, route: &Route) -> Result<String> {
    let envelope = RouteEnvelope {
        route: RouteBody {
            action: action.as_str(),
            publisher: endpoint_body(&route.publisher),
            subscriber: endpoint_body(&route.subscriber),
        },
    };
    Ok(serde_json::to_string(&envelope)?)
}

fn endpoint_body(endpoint: &RouteEndpoint) -> EndpointBody<'_> {
    EndpointBody {
        name: &endpoint.name,
        kind: endpoint.kind.as_str(),
        client_name: &endpoint.client_name,
        remote_address: &endpoint.remote_address,
    }
}
