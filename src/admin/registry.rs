use tracing::{debug, info};

use crate::model::{Config, DataMessage, Message, Route, RouteEndpoint, RouteUpdateType};
use crate::protocol::RegistryUpdate;
use crate::utils::RouteSide;

/// Produced by `AdminConnection::poll`.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminEvent {
    Connected,
    Disconnected,
    /// Ordinary data addressed to this app.
    Message(Message),
    ClientConnected(Config),
    ClientUpdated(Config),
    ClientDisconnected(Config),
    RouteAdded(Route),
    RouteRemoved(Route),
    /// Routed data observed on the admin channel.
    DataMessage(DataMessage),
}

/// Local mirror of the router's clients and routes.
#[derive(Debug, Default)]
pub struct Registry {
    connected_clients: Vec<Config>,
    current_routes: Vec<Route>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected_clients(&self) -> &[Config] {
        &self.connected_clients
    }

    pub fn current_routes(&self) -> &[Route] {
        &self.current_routes
    }

    pub fn find_client(&self, name: &str, remote_address: &str) -> Option<&Config> {
        self.connected_clients
            .iter()
            .find(|c| c.name == name && c.remote_address == remote_address)
    }

    /// Apply one update from the router. `local` is this app's own config;
    /// it learns its router-assigned address when its announcement echoes back.
    pub fn apply(&mut self, update: RegistryUpdate, local: &mut Config) -> Vec<AdminEvent> {
        match update {
            RegistryUpdate::Config(config) => {
                if config.same_declaration(local) {
                    local.remote_address = config.remote_address.clone();
                }
                vec![self.upsert_client(config)]
            }
            RegistryUpdate::Remove(removed) => removed
                .iter()
                .filter_map(|(name, address)| self.remove_client(name, address))
                .map(AdminEvent::ClientDisconnected)
                .collect(),
            RegistryUpdate::Route { action, route } => {
                self.apply_route(action, route).into_iter().collect()
            }
            RegistryUpdate::Data(data) => vec![AdminEvent::DataMessage(data)],
        }
    }

    fn upsert_client(&mut self, config: Config) -> AdminEvent {
        match self.connected_clients.iter_mut().find(|c| **c == config) {
            Some(existing) => {
                debug!("Client {} @ {} updated", config.name, config.remote_address);
                *existing = config.clone();
                AdminEvent::ClientUpdated(config)
            }
            None => {
                info!("Client {} @ {} connected", config.name, config.remote_address);
                self.connected_clients.push(config.clone());
                AdminEvent::ClientConnected(config)
            }
        }
    }

    fn remove_client(&mut self, name: &str, remote_address: &str) -> Option<Config> {
        let index = self
            .connected_clients
            .iter()
            .position(|c| c.name == name && c.remote_address == remote_address)?;
        info!("Client {name} @ {remote_address} disconnected");
        Some(self.connected_clients.remove(index))
    }

    fn apply_route(&mut self, action: RouteUpdateType, route: Route) -> Option<AdminEvent> {
        match action {
            RouteUpdateType::Add => {
                info!("Route added: {route}");
                self.current_routes.push(route.clone());
                Some(AdminEvent::RouteAdded(route))
            }
            RouteUpdateType::Remove => {
                let index = self.current_routes.iter().position(|r| *r == route)?;
                info!("Route removed: {route}");
                self.current_routes.remove(index);
                Some(AdminEvent::RouteRemoved(route))
            }
        }
    }

    /// Check that both endpoints name declared channels and return the route
    /// with endpoint types taken from those declarations.
    pub fn validate_new_route(
        &self,
        publisher: &RouteEndpoint,
        subscriber: &RouteEndpoint,
    ) -> Result<Route, RouteSide> {
        let publisher_channel = self
            .find_client(&publisher.client_name, &publisher.remote_address)
            .and_then(|c| c.publisher(&publisher.name));
        let subscriber_channel = self
            .find_client(&subscriber.client_name, &subscriber.remote_address)
            .and_then(|c| c.subscriber(&subscriber.name));

        match (publisher_channel, subscriber_channel) {
            (Some(pub_channel), Some(sub_channel)) => Ok(Route::new(
                publisher.clone().with_kind(pub_channel.kind.clone()),
                subscriber.clone().with_kind(sub_channel.kind.clone()),
            )),
            (p, s) => Err(RouteSide::from_checks(p.is_some(), s.is_some())
                .unwrap_or(RouteSide::Both)),
        }
    }

    /// Find the active route linking exactly these two endpoints.
    pub fn find_route(
        &self,
        publisher: &RouteEndpoint,
        subscriber: &RouteEndpoint,
    ) -> Result<&Route, RouteSide> {
        if let Some(route) = self
            .current_routes
            .iter()
            .find(|r| r.publisher == *publisher && r.subscriber == *subscriber)
        {
            return Ok(route);
        }

        let publisher_known = self.current_routes.iter().any(|r| r.publisher == *publisher);
        let subscriber_known = self
            .current_routes
            .iter()
            .any(|r| r.subscriber == *subscriber);
        Err(RouteSide::from_checks(publisher_known, subscriber_known).unwrap_or(RouteSide::Both))
    }
}
