//! Catalogue adapter: seed loading and the in-memory catalogue.

pub mod demo;
mod in_memory;
mod seed;

pub use demo::demo_catalogue;
pub use in_memory::InMemoryCatalogue;
pub use seed::{
    Account, CatalogueSeed, CatalogueSeedError, CatalogueSummary, SUPPORTED_VERSION,
    password_sha256,
};
