use serde_json::Value;
use tracing::{debug, warn};

use crate::admin::registry::{AdminEvent, Registry};
use crate::connection::session::Inbound;
use crate::connection::{Connection, Role};
use crate::model::{Config, Route, RouteEndpoint, RouteUpdateType};
use crate::protocol;
use crate::transport::Transport;
use crate::utils::{Result, SpacebrewError};

/// A connection registered as admin, mirroring the router's registry.
pub struct AdminConnection<T: Transport> {
    connection: Connection<T>,
    registry: Registry,
}

impl<T: Transport> AdminConnection<T> {
    pub fn new(transport: T, host: &str, name: &str, description: &str) -> Self {
        Self {
            connection: Connection::with_role(
                transport,
                host,
                Config::new(name, description),
                Role::Admin,
            ),
            registry: Registry::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.connection = self.connection.with_port(port);
        self
    }

    pub fn connect(&mut self) {
        self.connection.connect();
    }

    pub fn connect_to(&mut self, host: &str, config: Config) {
        self.connection.connect_to(host, config);
    }

    pub fn poll(&mut self) -> Vec<AdminEvent> {
        self.poll_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn poll_at(&mut self, now_ms: i64) -> Vec<AdminEvent> {
        let mut events = Vec::new();
        for inbound in self.connection.pump(now_ms) {
            match inbound {
                Inbound::Opened => events.push(AdminEvent::Connected),
                Inbound::Closed => events.push(AdminEvent::Disconnected),
                Inbound::Payload(text) => events.extend(self.handle_payload(&text)),
            }
        }
        events
    }

    /// Demultiplex one inbound frame.
    ///
    /// Arrays carry several registry updates. A `message` without a
    /// `clientName` is ordinary data for this app. Anything else is a single
    /// registry update.
    pub fn handle_payload(&mut self, text: &str) -> Vec<AdminEvent> {
        let json: Value = match serde_json::from_str(text) {
            Ok(json) => json,
            Err(e) => {
                debug!("discarding malformed payload: {e}");
                return Vec::new();
            }
        };

        if let Value::Array(updates) = &json {
            return updates
                .iter()
                .flat_map(|update| self.process_incoming_json(update))
                .collect();
        }

        let plain_message = json
            .get("message")
            .is_some_and(|m| !m.is_null() && m.get("clientName").is_none_or(Value::is_null));
        if plain_message {
            return protocol::decode_message_value(&json)
                .map(AdminEvent::Message)
                .into_iter()
                .collect();
        }

        self.process_incoming_json(&json)
    }

    /// Apply one registry update and return the notifications it produced.
    pub fn process_incoming_json(&mut self, json: &Value) -> Vec<AdminEvent> {
        match protocol::decode_registry_update(json) {
            Some(update) => self.registry.apply(update, self.connection.config_mut()),
            None => Vec::new(),
        }
    }

    /// Ask the router to link `pub_client`'s `pub_name` publisher to
    /// `sub_client`'s `sub_name` subscriber.
    pub fn add_route(
        &mut self,
        pub_client: &str,
        pub_address: &str,
        pub_name: &str,
        sub_client: &str,
        sub_address: &str,
        sub_name: &str,
    ) -> Result<()> {
        self.add_route_endpoints(
            &RouteEndpoint::new(pub_client, pub_name, pub_address),
            &RouteEndpoint::new(sub_client, sub_name, sub_address),
        )
    }

    pub fn add_route_endpoints(
        &mut self,
        publisher: &RouteEndpoint,
        subscriber: &RouteEndpoint,
    ) -> Result<()> {
        let route = self
            .registry
            .validate_new_route(publisher, subscriber)
            .map_err(|side| {
                warn!("Cannot add route {publisher} -> {subscriber}: {side}");
                SpacebrewError::InvalidRoute(side)
            })?;
        self.update_route(RouteUpdateType::Add, &route)
    }

    pub fn add_route_for(&mut self, route: &Route) -> Result<()> {
        self.add_route_endpoints(&route.publisher, &route.subscriber)
    }

    pub fn remove_route(
        &mut self,
        pub_client: &str,
        pub_address: &str,
        pub_name: &str,
        sub_client: &str,
        sub_address: &str,
        sub_name: &str,
    ) -> Result<()> {
        self.remove_route_endpoints(
            &RouteEndpoint::new(pub_client, pub_name, pub_address),
            &RouteEndpoint::new(sub_client, sub_name, sub_address),
        )
    }

    pub fn remove_route_endpoints(
        &mut self,
        publisher: &RouteEndpoint,
        subscriber: &RouteEndpoint,
    ) -> Result<()> {
        let route = self
            .registry
            .find_route(publisher, subscriber)
            .map_err(|side| {
                warn!("Cannot remove route {publisher} -> {subscriber}: {side}");
                SpacebrewError::InvalidRoute(side)
            })?
            .clone();
        self.update_route(RouteUpdateType::Remove, &route)
    }

    /// Remove a route that is currently active.
    pub fn remove_route_for(&mut self, route: &Route) -> Result<()> {
        self.remove_route_endpoints(&route.publisher, &route.subscriber)
    }

    fn update_route(&mut self, action: RouteUpdateType, route: &Route) -> Result<()> {
        let frame = protocol::encode_route_update(action, route)?;
        self.connection.send_frame(&frame)
    }

    pub fn connected_clients(&self) -> &[Config] {
        self.registry.connected_clients()
    }

    pub fn current_routes(&self) -> &[Route] {
        self.registry.current_routes()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn connection(&self) -> &Connection<T> {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection<T> {
        &mut self.connection
    }
}
