//! The `protocol` module translates between the model types and the JSON
//! frames exchanged with a Spacebrew router.
//!
//! Every frame is a single JSON object sent as a text message:
//! - data message: `{"message":{"clientName","name","type","value"}}`
//! - config announcement: `{"config":{"name","description","publish","subscribe"}}`
//! - admin registration: `{"admin":[{"admin":true,"no_msgs":true}]}`
//! - route update: `{"route":{"type","publisher","subscriber"}}`
//! - removal notice (inbound only): `{"remove":[{"name","remoteAddress"}]}`
//!
//! Decoding never fails loudly. Malformed or unexpected payloads decode to
//! `None` and are dropped by the caller.

mod decode;
mod encode;
mod wire;

pub use decode::{
    RegistryUpdate, decode_data_message, decode_message_value, decode_registry_update, text_of,
};
pub use encode::{encode_admin_registration, encode_config, encode_message, encode_route_update};
