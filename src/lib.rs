//! # Spacebrew
//!
//! `spacebrew` is a client for the Spacebrew publish/subscribe protocol. Apps
//! declare typed publisher and subscriber channels, and a central router
//! links them on demand.
//!
//! ## Core Modules
//!
//! - `model`: messages, client configs and routes.
//! - `protocol`: the JSON frames exchanged with the router.
//! - `transport`: the socket seam and its WebSocket implementation.
//! - `connection`: the poll-driven client session and reconnect policy.
//! - `admin`: the admin session that mirrors all clients and routes.
//! - `settings`: settings for the bundled binary.
//! - `utils`: error type and logging bootstrap.
//!
//! Everything is driven by `poll`, called once per host tick. No call
//! blocks, and nothing runs behind the caller's back except the transport's
//! socket I/O.

pub mod admin;
pub mod connection;
pub mod model;
pub mod protocol;
pub mod settings;
pub mod transport;
pub mod utils;

pub use admin::{AdminConnection, AdminEvent};
pub use connection::{Connection, ConnectionEvent, ConnectionState};
pub use model::{Config, DataMessage, Message, MessageType, Route, RouteEndpoint};
pub use transport::{Transport, TransportEvent, WebSocketTransport};
pub use utils::{Result, SpacebrewError};
