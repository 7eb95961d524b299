//! The `connection` module implements a Spacebrew client session.
//!
//! A `Connection` owns a `Transport`, the app's local `Config` and the
//! reconnect policy. It is driven entirely by `poll`, which the host calls
//! once per tick: queued socket events are dispatched in order, state
//! transitions happen, and decoded messages are handed back to the caller.

pub mod session;

pub use session::{
    Connection, ConnectionEvent, ConnectionState, DEFAULT_RECONNECT_INTERVAL_MS, Role,
    SPACEBREW_PORT,
};
