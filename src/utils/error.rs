//! The `error` module defines the error types used within the `spacebrew` crate.
//!
//! None of these conditions are fatal. Callers get a rejected operation or a
//! dropped message, and the connection keeps running.

use std::fmt;

use thiserror::Error;

/// Which side of a route failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSide {
    Publisher,
    Subscriber,
    Both,
}

impl RouteSide {
    /// Collapse two validation results into the side that failed, if any.
    pub fn from_checks(publisher_ok: bool, subscriber_ok: bool) -> Option<Self> {
        match (publisher_ok, subscriber_ok) {
            (true, true) => None,
            (false, true) => Some(Self::Publisher),
            (true, false) => Some(Self::Subscriber),
            (false, false) => Some(Self::Both),
        }
    }
}

impl fmt::Display for RouteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Publisher => f.write_str("invalid publisher"),
            Self::Subscriber => f.write_str("invalid subscriber"),
            Self::Both => f.write_str("invalid publisher and subscriber"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SpacebrewError {
    #[error("send failed, not connected")]
    NotConnected,

    #[error("route rejected: {0}")]
    InvalidRoute(RouteSide),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, SpacebrewError>;
