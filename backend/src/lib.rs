//! Read-only relations API library.
//!
//! Hexagonal layout: [`domain`] holds types, ports and services,
//! [`inbound`] adapts HTTP requests onto the domain ports, and
//! [`outbound`] provides the catalogue behind them.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
