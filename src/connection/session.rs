use tracing::{info, trace, warn};

use crate::model::{Config, Message, MessageType};
use crate::protocol;
use crate::transport::{Transport, TransportEvent};
use crate::utils::{Result, SpacebrewError};

/// Port a Spacebrew router listens on.
pub const SPACEBREW_PORT: u16 = 9000;

pub const DEFAULT_RECONNECT_INTERVAL_MS: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What kind of client a connection registers as when it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Plain,
    /// Also registers for the router's registry and route stream.
    Admin,
}

/// Produced by `Connection::poll`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Connected,
    Disconnected,
    Message(Message),
}

/// Raw outcome of draining the transport, before role-specific decoding.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Inbound {
    Opened,
    Closed,
    Payload(String),
}

/// One client session with a Spacebrew router.
///
/// Sends only go out while the session is `Connected`. Otherwise they are
/// dropped and reported as `SpacebrewError::NotConnected`; nothing is
/// buffered across reconnects.
pub struct Connection<T: Transport> {
    transport: T,
    role: Role,
    host: String,
    port: u16,
    url: String,
    config: Config,
    state: ConnectionState,
    auto_reconnect: bool,
    reconnect_interval_ms: i64,
    last_connect_attempt_ms: i64,
}

impl<T: Transport> Connection<T> {
    pub fn new(transport: T, host: &str, name: &str, description: &str) -> Self {
        Self::with_role(transport, host, Config::new(name, description), Role::Plain)
    }

    pub(crate) fn with_role(transport: T, host: &str, config: Config, role: Role) -> Self {
        Self {
            transport,
            role,
            host: host.to_string(),
            port: SPACEBREW_PORT,
            url: router_url(host, SPACEBREW_PORT),
            config,
            state: ConnectionState::Disconnected,
            auto_reconnect: false,
            reconnect_interval_ms: DEFAULT_RECONNECT_INTERVAL_MS,
            last_connect_attempt_ms: 0,
        }
    }

    /// Use a router on a non-standard port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self.url = router_url(&self.host, port);
        self
    }

    /// Connect again using the stored host and config.
    pub fn connect(&mut self) {
        info!("Connecting to {}", self.url);
        self.state = ConnectionState::Connecting;
        self.transport.connect(&self.url);
    }

    /// Replace host and config, then connect.
    pub fn connect_to(&mut self, host: &str, config: Config) {
        self.host = host.to_string();
        self.url = router_url(host, self.port);
        self.config = config;
        self.connect();
    }

    pub fn poll(&mut self) -> Vec<ConnectionEvent> {
        self.poll_at(now_millis())
    }

    /// Poll with an explicit clock, in milliseconds.
    pub fn poll_at(&mut self, now_ms: i64) -> Vec<ConnectionEvent> {
        self.pump(now_ms)
            .into_iter()
            .filter_map(|inbound| match inbound {
                Inbound::Opened => Some(ConnectionEvent::Connected),
                Inbound::Closed => Some(ConnectionEvent::Disconnected),
                Inbound::Payload(text) => {
                    protocol::decode_data_message(&text).map(ConnectionEvent::Message)
                }
            })
            .collect()
    }

    /// Dispatch every queued transport event, then run the reconnect check.
    pub(crate) fn pump(&mut self, now_ms: i64) -> Vec<Inbound> {
        let mut inbound = Vec::new();

        for event in self.transport.poll() {
            match event {
                TransportEvent::Connected => {
                    self.on_open();
                    inbound.push(Inbound::Opened);
                }
                TransportEvent::Disconnected => {
                    info!("Disconnected from {}", self.url);
                    if self.on_close(now_ms) {
                        inbound.push(Inbound::Closed);
                    }
                }
                TransportEvent::Error(err) => {
                    warn!("Transport error on {}: {err}", self.url);
                    if self.on_close(now_ms) {
                        inbound.push(Inbound::Closed);
                    }
                }
                TransportEvent::Interrupted => {
                    warn!("Connection to {} interrupted", self.url);
                    if self.on_close(now_ms) {
                        inbound.push(Inbound::Closed);
                    }
                }
                TransportEvent::Ping(payload) => trace!("ping: {payload}"),
                TransportEvent::Read(text) => inbound.push(Inbound::Payload(text)),
            }
        }

        if self.auto_reconnect
            && self.state == ConnectionState::Disconnected
            && now_ms - self.last_connect_attempt_ms > self.reconnect_interval_ms
        {
            self.last_connect_attempt_ms = now_ms;
            self.connect();
        }

        inbound
    }

    fn on_open(&mut self) {
        info!("Connected to {}", self.url);
        self.state = ConnectionState::Connected;
        self.announce();

        if self.role == Role::Admin {
            let sent = protocol::encode_admin_registration()
                .and_then(|frame| self.transport.write(&frame));
            if let Err(e) = sent {
                warn!("Failed to register as admin: {e}");
            }
        }
    }

    /// Returns whether this was a transition out of a live state.
    fn on_close(&mut self, now_ms: i64) -> bool {
        let was_live = self.state != ConnectionState::Disconnected;
        self.state = ConnectionState::Disconnected;
        self.last_connect_attempt_ms = now_ms;
        was_live
    }

    /// Push the full config to the router.
    fn announce(&mut self) {
        let sent = self
            .config
            .to_json()
            .and_then(|frame| self.transport.write(&frame));
        if let Err(e) = sent {
            warn!("Failed to announce config for '{}': {e}", self.config.name);
        }
    }

    fn push_config(&mut self) {
        if self.is_connected() {
            self.announce();
        }
    }

    pub fn send(&mut self, message: &Message) -> Result<()> {
        if !self.is_connected() {
            warn!("Send failed, not connected! Dropping '{}'", message.name);
            return Err(SpacebrewError::NotConnected);
        }
        let frame = message.to_json(&self.config.name)?;
        self.transport.write(&frame)
    }

    pub fn send_value(
        &mut self,
        name: &str,
        kind: impl Into<MessageType>,
        value: &str,
    ) -> Result<()> {
        self.send(&Message::new(name, kind, value))
    }

    pub fn send_string(&mut self, name: &str, value: &str) -> Result<()> {
        self.send(&Message::string(name, value))
    }

    pub fn send_range(&mut self, name: &str, value: i64) -> Result<()> {
        self.send(&Message::range(name, value))
    }

    pub fn send_boolean(&mut self, name: &str, value: bool) -> Result<()> {
        self.send(&Message::boolean(name, value))
    }

    /// Write an already encoded frame, subject to the same connected check.
    pub(crate) fn send_frame(&mut self, frame: &str) -> Result<()> {
        if !self.is_connected() {
            warn!("Send failed, not connected!");
            return Err(SpacebrewError::NotConnected);
        }
        self.transport.write(frame)
    }

    /// Declare a publisher channel; re-announces the config when connected.
    pub fn add_publish(&mut self, name: &str, kind: impl Into<MessageType>, default: &str) {
        self.config.add_publish(name, kind, default);
        self.push_config();
    }

    pub fn add_publish_message(&mut self, message: Message) {
        self.config.add_publish_message(message);
        self.push_config();
    }

    /// Declare a subscriber channel; re-announces the config when connected.
    pub fn add_subscribe(&mut self, name: &str, kind: impl Into<MessageType>) {
        self.config.add_subscribe(name, kind);
        self.push_config();
    }

    pub fn add_subscribe_message(&mut self, message: Message) {
        self.config.add_subscribe_message(message);
        self.push_config();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Router URL, `ws://<host>:<port>`.
    pub fn host(&self) -> &str {
        &self.url
    }

    pub fn set_auto_reconnect(&mut self, enabled: bool) {
        self.auto_reconnect = enabled;
    }

    pub fn does_auto_reconnect(&self) -> bool {
        self.auto_reconnect
    }

    pub fn set_reconnect_rate(&mut self, interval_ms: i64) {
        self.reconnect_interval_ms = interval_ms;
    }

    pub fn reconnect_rate(&self) -> i64 {
        self.reconnect_interval_ms
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

fn router_url(host: &str, port: u16) -> String {
    format!("ws://{host}:{port}")
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
