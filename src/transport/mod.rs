//! The `transport` module is responsible for the socket session with the
//! Spacebrew router.
//!
//! The connection core only ever talks to a `Transport`: it asks it to
//! connect, writes text frames to it, and drains the events it buffered since
//! the previous poll. `WebSocketTransport` is the production implementation,
//! running the socket on tokio tasks.

pub mod websocket;

#[cfg(test)]
pub(crate) mod mock;

pub use websocket::WebSocketTransport;

use crate::utils::Result;

/// Something that happened on the socket since the last poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    Error(String),
    Interrupted,
    Ping(String),
    Read(String),
}

pub trait Transport {
    /// Start connecting to `url`. Completion is reported through `poll`.
    fn connect(&mut self, url: &str);

    /// Queue one text frame for the current session.
    fn write(&mut self, text: &str) -> Result<()>;

    /// Drain every event buffered since the previous call, oldest first.
    fn poll(&mut self) -> Vec<TransportEvent>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, url: &str) {
        (**self).connect(url)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        (**self).poll()
    }
}
