//! The `model` module holds the value types exchanged with a Spacebrew router.
//!
//! - `Message`: one typed value on a named channel
//! - `Config`: an app's identity and its declared publish/subscribe channels
//! - `RouteEndpoint` / `Route`: one link from a publisher to a subscriber
//! - `DataMessage`: routed data observed by an admin connection

pub mod client_config;
pub mod message;
pub mod route;

pub use client_config::Config;
pub use message::{DataMessage, Message, MessageType};
pub use route::{Route, RouteEndpoint, RouteUpdateType};
