//! Domain primitives, services and ports.
//!
//! Purpose: resolve relation identifiers on behalf of an authenticated
//! viewer and render the result as hypermedia. Nothing in here depends on
//! Actix or on a particular catalogue store.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - RawIdentifier / ScalarId and the typed ids — identifier validation.
//! - Relation, Heading, Query, Schema, Domain — the read model.
//! - AccessPolicy / RoleGrantPolicy — schema visibility.
//! - RelationResolver — implements the `RelationsQuery` driving port.
//! - RelationRenderer / LinkBuilder — hypermedia documents.

pub mod access_policy;
pub mod error;
pub mod hypermedia;
pub mod identifier;
pub mod ports;
pub mod relation;
pub mod relation_renderer;
pub mod relation_resolver;
pub mod trace_id;
pub mod viewer;

#[cfg(test)]
pub use self::access_policy::MockAccessPolicy;
pub use self::access_policy::{AccessPolicy, RoleGrantPolicy};
pub use self::error::{Error, ErrorCode, ErrorValidationError, messages};
pub use self::hypermedia::{Document, LinkBaseError, LinkBuilder, MEDIA_TYPE};
pub use self::identifier::{
    ColumnName, DomainId, IdentifierError, MAX_IDENTIFIER_LEN, QueryId, RawIdentifier, ScalarId,
    SchemaId, TableId,
};
pub use self::relation::{
    Domain, Heading, HeadingColumn, Query, QueryResultRelation, QueryStatus, Relation,
    RelationValidationError, Schema, TableRelation,
};
pub use self::relation_renderer::RelationRenderer;
pub use self::relation_resolver::RelationResolver;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::viewer::{
    LoginCredentials, LoginValidationError, Role, UserId, Viewer, ViewerValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use sqlegalize::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
