// Bravery module - Data Dragon catalog and random build generation

pub mod catalog;
pub mod generator;
pub mod store;

#[cfg(test)]
mod tests;

pub use catalog::{stat_mod_slots, Catalog, CatalogEntry, ItemTables, RuneTree};
pub use generator::{generate, Build, RuneStyle, NO_BOOTS_CHAMPION};
pub use store::{CatalogManifest, CatalogSource, CatalogStore, DataDragonSource};
