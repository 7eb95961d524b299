//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `spacebrew` crate.
//!
//! It centralizes the crate-wide error type and the logging bootstrap.

pub mod error;
pub mod logging;

pub use error::{Result, RouteSide, SpacebrewError};
