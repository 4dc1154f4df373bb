//! Outbound adapters implementing domain ports.
//!
//! Adapters are thin translators between domain types and their backing
//! representation. They contain no business logic.

pub mod catalogue;
