//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the provider abstraction
//! - Shared domain models (units, conditions, forecast entries)
//! - The view controller driving the city → forecast query pipeline
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::{ViewState, WeatherController, extended_forecast};
pub use error::WeatherError;
pub use model::{Coordinates, CurrentConditions, ForecastEntry, UnitSystem, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
