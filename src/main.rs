//! CLI for Spacebrew
//!
//! Subcommands:
//! - `client`: join the router with the given channels, publish any `--send`
//!   values on connect and log what arrives
//! - `admin`: join as admin and log the router's clients and routes

use std::time::Duration;

use clap::{Parser, Subcommand};
use spacebrew::settings::{Settings, load_settings};
use spacebrew::{
    AdminConnection, AdminEvent, Config, Connection, ConnectionEvent, Message,
    WebSocketTransport,
};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "spacebrew")]
struct Cli {
    /// Router host, overriding settings
    #[arg(long)]
    host: Option<String>,

    /// Router port, overriding settings
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect as a regular app and log incoming messages
    Client {
        /// Publisher channel as `name:type[:default]`
        #[arg(long = "publish", value_name = "CHANNEL")]
        publish: Vec<String>,
        /// Subscriber channel as `name:type`
        #[arg(long = "subscribe", value_name = "CHANNEL")]
        subscribe: Vec<String>,
        /// Value to publish on a declared channel after each connect, as `name=value`
        #[arg(long = "send", value_name = "NAME=VALUE")]
        send: Vec<String>,
    },
    /// Connect as admin and log registry and route changes
    Admin,
}

/// Host tick, roughly one frame at 60 Hz.
const TICK: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() {
    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Falling back to default settings: {e}");
            Settings::default()
        }
    };
    spacebrew::utils::logging::init(&settings.logging.level);

    let cli = Cli::parse();
    let host = cli.host.unwrap_or_else(|| settings.server.host.clone());
    let port = cli.port.unwrap_or(settings.server.port);

    let result = match cli.command {
        Command::Client {
            publish,
            subscribe,
            send,
        } => run_client(&settings, &host, port, &publish, &subscribe, &send).await,
        Command::Admin => run_admin(&settings, &host, port).await,
    };

    if let Err(e) = result {
        error!("Spacebrew exited with error: {}", e);
    }
}

fn parse_channel(entry: &str) -> Option<(String, String, String)> {
    let mut parts = entry.splitn(3, ':');
    let name = parts.next().filter(|n| !n.is_empty())?;
    let kind = parts.next().filter(|k| !k.is_empty())?;
    let default = parts.next().unwrap_or_default();
    Some((name.to_string(), kind.to_string(), default.to_string()))
}

fn parse_assignment(entry: &str) -> Option<(String, String)> {
    let (name, value) = entry.split_once('=')?;
    (!name.is_empty()).then(|| (name.to_string(), value.to_string()))
}

async fn run_client(
    settings: &Settings,
    host: &str,
    port: u16,
    publish: &[String],
    subscribe: &[String],
    send: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::new(&settings.client.name, &settings.client.description);
    for entry in publish {
        let (name, kind, default) =
            parse_channel(entry).ok_or(format!("invalid publisher channel '{entry}'"))?;
        config.add_publish(name, kind, default);
    }
    for entry in subscribe {
        let (name, kind, _) =
            parse_channel(entry).ok_or(format!("invalid subscriber channel '{entry}'"))?;
        config.add_subscribe(name, kind);
    }
    let mut outgoing = Vec::with_capacity(send.len());
    for entry in send {
        let (name, value) =
            parse_assignment(entry).ok_or(format!("invalid send value '{entry}'"))?;
        let kind = config
            .publisher(&name)
            .map(|m| m.kind.clone())
            .ok_or(format!("'{name}' is not a declared publisher"))?;
        outgoing.push(Message::new(name, kind, value));
    }

    let transport = WebSocketTransport::from_current()?;
    let mut conn = Connection::new(transport, host, &config.name, &config.description)
        .with_port(port);
    conn.set_auto_reconnect(settings.client.auto_reconnect);
    conn.set_reconnect_rate(settings.client.reconnect_interval_ms);
    conn.connect_to(host, config);

    let mut ticker = tokio::time::interval(TICK);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for event in conn.poll() {
                    match event {
                        ConnectionEvent::Connected => {
                            info!("Connected to {}", conn.host());
                            for message in &outgoing {
                                if let Err(e) = conn.send(message) {
                                    warn!("Could not publish '{}': {}", message.name, e);
                                }
                            }
                        }
                        ConnectionEvent::Disconnected => info!("Disconnected from {}", conn.host()),
                        ConnectionEvent::Message(m) => {
                            info!("{} ({}) = {}", m.name, m.kind, m.value);
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Exiting gracefully.");
                return Ok(());
            }
        }
    }
}

async fn run_admin(
    settings: &Settings,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let transport = WebSocketTransport::from_current()?;
    let mut admin = AdminConnection::new(
        transport,
        host,
        &settings.client.name,
        &settings.client.description,
    )
    .with_port(port);
    admin
        .connection_mut()
        .set_auto_reconnect(settings.client.auto_reconnect);
    admin
        .connection_mut()
        .set_reconnect_rate(settings.client.reconnect_interval_ms);
    admin.connect();

    let mut ticker = tokio::time::interval(TICK);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for event in admin.poll() {
                    log_admin_event(&event);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!(
                    clients = admin.connected_clients().len(),
                    routes = admin.current_routes().len(),
                    "Shutdown signal received. Exiting gracefully."
                );
                return Ok(());
            }
        }
    }
}

fn log_admin_event(event: &AdminEvent) {
    match event {
        AdminEvent::Connected => info!("Admin connected"),
        AdminEvent::Disconnected => info!("Admin disconnected"),
        AdminEvent::Message(m) => info!("{} ({}) = {}", m.name, m.kind, m.value),
        AdminEvent::ClientConnected(c) => info!("+ client {} @ {}", c.name, c.remote_address),
        AdminEvent::ClientUpdated(c) => info!("~ client {} @ {}", c.name, c.remote_address),
        AdminEvent::ClientDisconnected(c) => info!("- client {} @ {}", c.name, c.remote_address),
        AdminEvent::RouteAdded(r) => info!("+ route {r}"),
        AdminEvent::RouteRemoved(r) => info!("- route {r}"),
        AdminEvent::DataMessage(d) => info!(
            "{} @ {} sent {} ({}) = {}",
            d.client_name, d.remote_address, d.name, d.kind, d.value
        ),
    }
}
