//! In-game spray feature: bind a key, aim at a wall, leave your artwork there.

pub mod config;
pub mod controller;
pub mod fetch;
pub mod host;
pub mod layers;
pub mod render;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{PluginConfig, Translation};
pub use controller::{CachedSpray, PlaceOutcome, RefreshOutcome, SprayController};
pub use fetch::{fetch_channel, FetchOutcome, Fetcher, HttpFetcher};
pub use host::Host;
