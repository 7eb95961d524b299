//! The `admin` module implements a privileged Spacebrew connection.
//!
//! An admin connection receives the router's registry and route stream
//! instead of ordinary routed data. It keeps a local mirror of every
//! connected client's config and every active route, and can ask the router
//! to add or remove routes.
//!
//! The mirror is eventually consistent: route requests only send a control
//! frame, and `current_routes` changes when the router confirms.

pub mod connection;
pub mod registry;

pub use connection::AdminConnection;
pub use registry::{AdminEvent, Registry};

#[cfg(test)]
mod tests;
