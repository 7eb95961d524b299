use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

use crate::protocol::decode::text_of;

/// Accept any JSON value where text is expected and keep its textual form.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

#[derive(Debug, Serialize)]
pub struct DataEnvelope<'a> {
    pub message: DataBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBody<'a> {
    pub client_name: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub value: Box<RawValue>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEnvelope<'a> {
    pub config: ConfigBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct ConfigBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub publish: ChannelList<PublishEntry<'a>>,
    pub subscribe: ChannelList<SubscribeEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ChannelList<T> {
    pub messages: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct PublishEntry<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub default: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SubscribeEntry<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AdminEnvelope {
    pub admin: [AdminFlags; 1],
}

#[derive(Debug, Serialize)]
pub struct AdminFlags {
    pub admin: bool,
    pub no_msgs: bool,
}

#[derive(Debug, Serialize)]
pub struct RouteEnvelope<'a> {
    pub route: RouteBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct RouteBody<'a> {
    #[serde(rename = "type")]
    pub action: &'a str,
    pub publisher: EndpointBody<'a>,
    pub subscriber: EndpointBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub client_name: &'a str,
    pub remote_address: &'a str,
}

/// Config announcement as the router relays it to admins.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboundConfig {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub remote_address: String,
    pub publish: Option<InboundChannels>,
    pub subscribe: Option<InboundChannels>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InboundChannels {
    pub messages: Option<Vec<InboundChannel>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InboundChannel {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_text")]
    pub default: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboundRemoval {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub remote_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InboundRoute {
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub action: String,
    pub publisher: Option<InboundEndpoint>,
    pub subscriber: Option<InboundEndpoint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboundEndpoint {
    #[serde(deserialize_with = "lenient_text")]
    pub client_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub remote_address: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: String,
}

/// Data message carrying its sender, as seen on the admin channel.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboundDataMessage {
    #[serde(deserialize_with = "lenient_text")]
    pub client_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub remote_address: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_text")]
    pub value: String,
}
