//! Driving port for relation resolution use-cases.
//!
//! Inbound adapters hand over raw identifiers exactly as received; the
//! service validates them before any lookup happens.

use async_trait::async_trait;

use crate::domain::{
    Domain, DomainId, Error, HeadingColumn, RawIdentifier, Relation, SchemaId, Viewer,
};

/// A relation plus the domains its heading references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelation {
    pub relation: Relation,
    /// Referenced domains ordered by id, each once.
    pub domains: Vec<Domain>,
}

/// What a listing was reached through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOwner {
    /// Tables owned by a schema.
    Schema(SchemaId),
    /// Relations referencing a domain.
    Domain(DomainId),
}

/// An ordered set of relations plus every domain they reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationListing {
    pub owner: ListingOwner,
    pub relations: Vec<Relation>,
    /// Referenced domains ordered by id, each once.
    pub domains: Vec<Domain>,
}

/// One heading column of a resolved relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub relation: Relation,
    pub column: HeadingColumn,
    pub domain: Option<Domain>,
}

/// Domain use-case port for resolving relations on behalf of a viewer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationsQuery: Send + Sync {
    /// Result relation of a finished query.
    async fn query_result(
        &self,
        viewer: &Viewer,
        query_id: RawIdentifier,
    ) -> Result<ResolvedRelation, Error>;

    /// One heading column of a finished query's result.
    async fn query_result_column(
        &self,
        viewer: &Viewer,
        query_id: RawIdentifier,
        column: RawIdentifier,
    ) -> Result<ResolvedColumn, Error>;

    /// A table the viewer may see.
    async fn table(&self, viewer: &Viewer, id: RawIdentifier) -> Result<ResolvedRelation, Error>;

    /// One heading column of a visible table.
    async fn table_column(
        &self,
        viewer: &Viewer,
        id: RawIdentifier,
        column: RawIdentifier,
    ) -> Result<ResolvedColumn, Error>;

    /// Tables owned by a visible schema.
    async fn relations_by_schema(
        &self,
        viewer: &Viewer,
        schema_id: RawIdentifier,
    ) -> Result<RelationListing, Error>;

    /// Visible tables whose heading references a domain, followed by the
    /// finished query results that reference it.
    async fn relations_by_domain(
        &self,
        viewer: &Viewer,
        domain_id: RawIdentifier,
    ) -> Result<RelationListing, Error>;

    /// A single domain.
    async fn domain(&self, viewer: &Viewer, domain_id: RawIdentifier) -> Result<Domain, Error>;
}
