//! Driven port for reading relation metadata.
//!
//! The catalogue owns queries, schemas, tables and domains. Everything here
//! is a read; adapters never mutate through this port. Absence is `Ok(None)`
//! so the resolver can collapse "missing" and "hidden" into one answer.

use async_trait::async_trait;

use crate::domain::{
    Domain, DomainId, Query, QueryId, QueryResultRelation, Schema, SchemaId, TableId,
    TableRelation,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading the relation catalogue.
    pub enum RelationCatalogueError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "relation catalogue connection failed: {message}",
        /// A lookup failed during execution or row conversion.
        Query { message: String } =>
            "relation catalogue query failed: {message}",
    }
}

/// Port for relation metadata lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationCatalogue: Send + Sync {
    /// Find a stored query in any lifecycle state.
    async fn find_query(&self, id: &QueryId) -> Result<Option<Query>, RelationCatalogueError>;

    /// Find a table by id regardless of visibility.
    async fn find_table(&self, id: &TableId)
    -> Result<Option<TableRelation>, RelationCatalogueError>;

    /// Find a schema by id regardless of visibility.
    async fn find_schema(&self, id: &SchemaId) -> Result<Option<Schema>, RelationCatalogueError>;

    /// Tables owned by `schema`, in catalogue order.
    async fn list_tables(
        &self,
        schema: &SchemaId,
    ) -> Result<Vec<TableRelation>, RelationCatalogueError>;

    /// Find a domain by id.
    async fn find_domain(&self, id: &DomainId) -> Result<Option<Domain>, RelationCatalogueError>;

    /// Domains for the given ids; unknown ids are omitted.
    async fn find_domains(&self, ids: &[DomainId]) -> Result<Vec<Domain>, RelationCatalogueError>;

    /// Tables with at least one heading column bound to `domain`, in
    /// catalogue order and regardless of visibility.
    async fn list_tables_by_domain(
        &self,
        domain: &DomainId,
    ) -> Result<Vec<TableRelation>, RelationCatalogueError>;

    /// Result relations of finished queries with at least one heading
    /// column bound to `domain`, ordered by query id.
    async fn list_results_by_domain(
        &self,
        domain: &DomainId,
    ) -> Result<Vec<QueryResultRelation>, RelationCatalogueError>;
}
