use serde::Deserialize;

use crate::connection::{DEFAULT_RECONNECT_INTERVAL_MS, SPACEBREW_PORT};

/// Top-level settings for the `spacebrew` binary.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

/// Where the Spacebrew router lives.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Identity and reconnect policy of this app.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientSettings {
    pub name: String,
    pub description: String,
    pub auto_reconnect: bool,
    pub reconnect_interval_ms: i64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Settings as found in files or the environment, every value optional.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub client: Option<PartialClientSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialClientSettings {
    pub name: Option<String>,
    pub description: Option<String>,
    pub auto_reconnect: Option<bool>,
    pub reconnect_interval_ms: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl PartialSettings {
    /// Fill every missing value from `default`.
    pub fn merge_over(self, default: Settings) -> Settings {
        let server = self.server.unwrap_or_default();
        let client = self.client.unwrap_or_default();
        let logging = self.logging.unwrap_or_default();

        Settings {
            server: ServerSettings {
                host: server.host.unwrap_or(default.server.host),
                port: server.port.unwrap_or(default.server.port),
            },
            client: ClientSettings {
                name: client.name.unwrap_or(default.client.name),
                description: client.description.unwrap_or(default.client.description),
                auto_reconnect: client
                    .auto_reconnect
                    .unwrap_or(default.client.auto_reconnect),
                reconnect_interval_ms: client
                    .reconnect_interval_ms
                    .unwrap_or(default.client.reconnect_interval_ms),
            },
            logging: LoggingSettings {
                level: logging.level.unwrap_or(default.logging.level),
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: SPACEBREW_PORT,
            },
            client: ClientSettings {
                name: "rust-spacebrew".to_string(),
                description: "Spacebrew client written in Rust".to_string(),
                auto_reconnect: true,
                reconnect_interval_ms: DEFAULT_RECONNECT_INTERVAL_MS,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
