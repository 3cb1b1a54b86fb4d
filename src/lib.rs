//! Companion library for the League of Legends client.
//!
//! - [`lcu`]: locate the running client and drive rune pages, summoner spells and champ select
//! - [`live_client`]: poll roster and events of the match in progress
//! - [`bravery`]: cache Data Dragon catalogs and roll random "Ultimate Bravery" builds

pub mod bravery;
pub mod config;
pub mod error;
pub mod lcu;
pub mod live_client;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result};
