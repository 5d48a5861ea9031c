//! Polynet Settings Crate
//!
//! Loads, validates and saves dieline configurations.

pub mod config;
pub mod error;

pub use config::{ConfigFormat, DielineConfig};
pub use error::{SettingsError, SettingsResult};
