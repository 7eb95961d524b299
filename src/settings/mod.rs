//! The `settings` module loads runtime settings for the `spacebrew` binary.
//!
//! Sources, later ones overriding earlier ones:
//! - built-in defaults
//! - an optional `config/default.{toml,yaml,json,...}` file
//! - a `.env` file, if present, then `SPACEBREW_*` environment variables
//!   using `__` between sections (e.g. `SPACEBREW_SERVER__HOST`)

mod schema;

use std::path::Path;

use ::config::{Config as Layered, Environment, File};

use crate::settings::schema::PartialSettings;
use crate::utils::Result;

pub use schema::{ClientSettings, LoggingSettings, ServerSettings, Settings};

/// Loads settings from `config/default` and the environment.
pub fn load_settings() -> Result<Settings> {
    let _ = dotenvy::dotenv();
    load_settings_from(Path::new("config/default"))
}

/// Loads settings from the file at `base` (extension optional) and the
/// environment, merged over the defaults.
pub fn load_settings_from(base: &Path) -> Result<Settings> {
    let layered = Layered::builder()
        .add_source(File::with_name(&base.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix("SPACEBREW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = layered.try_deserialize()?;

    Ok(partial.merge_over(Settings::default()))
}
