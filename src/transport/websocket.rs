//! WebSocket transport
//!
//! Each `connect` starts a fresh session task on the tokio runtime:
//! - dial the router with `connect_async`
//! - forward queued outbound frames through a per-session send loop
//! - translate inbound frames into `TransportEvent`s on an unbounded channel
//!
//! The owner never awaits anything. `poll` drains the event channel with
//! `try_recv`, so events simply accumulate between polls. Starting a new
//! session aborts the previous one and swaps in a new event channel, which
//! drops whatever the old session had not yet delivered.

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::transport::{Transport, TransportEvent};
use crate::utils::{Result, SpacebrewError};

pub struct WebSocketTransport {
    runtime: Handle,
    events: UnboundedReceiver<TransportEvent>,
    outbound: Option<UnboundedSender<WsMessage>>,
    session: Option<JoinHandle<()>>,
}

impl WebSocketTransport {
    /// Create a transport whose sessions run on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        let (_, events) = mpsc::unbounded_channel();
        Self {
            runtime,
            events,
            outbound: None,
            session: None,
        }
    }

    /// Create a transport on the runtime of the calling context.
    pub fn from_current() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| SpacebrewError::Transport(e.to_string()))?;
        Ok(Self::new(runtime))
    }

    fn close_session(&mut self) {
        self.outbound = None;
        if let Some(task) = self.session.take() {
            task.abort();
        }
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) {
        self.close_session();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        self.events = event_rx;
        self.outbound = Some(outbound_tx);
        self.session = Some(
            self.runtime
                .spawn(run_session(url.to_string(), event_tx, outbound_rx)),
        );
    }

    fn write(&mut self, text: &str) -> Result<()> {
        let outbound = self.outbound.as_ref().ok_or(SpacebrewError::NotConnected)?;
        outbound
            .send(WsMessage::Text(text.to_string().into()))
            .map_err(|e| SpacebrewError::Transport(e.to_string()))
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.close_session();
    }
}

async fn run_session(
    url: String,
    events: UnboundedSender<TransportEvent>,
    mut outbound: UnboundedReceiver<WsMessage>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            let _ = events.send(TransportEvent::Error(e.to_string()));
            return;
        }
    };
    let _ = events.send(TransportEvent::Connected);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let send_loop = {
        let url = url.clone();
        tokio::spawn(async move {
            while let Some(msg) = outbound.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    warn!("Failed to send frame to {url}: {e}");
                    break;
                }
            }
            let _ = ws_sender.close().await;
        })
    };

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                let _ = events.send(TransportEvent::Read(text.as_str().to_owned()));
            }
            Ok(WsMessage::Ping(payload)) => {
                let _ = events.send(TransportEvent::Ping(
                    String::from_utf8_lossy(&payload).into_owned(),
                ));
            }
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                let _ = events.send(TransportEvent::Error(e.to_string()));
                break;
            }
        }
    }

    send_loop.abort();
    debug!("Session with {url} closed");
    let _ = events.send(TransportEvent::Disconnected);
}
