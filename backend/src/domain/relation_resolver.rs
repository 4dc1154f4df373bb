//! Relation resolution service.
//!
//! Implements [`RelationsQuery`] on top of the catalogue and access policy.
//! Identifiers are validated before any lookup. Schema-scoped resources go
//! through a single visibility gate, which answers `None` both
//! for missing and for hidden schemas so the two cases stay
//! indistinguishable to callers.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    ListingOwner, RelationCatalogue, RelationCatalogueError, RelationListing, RelationsQuery,
    ResolvedColumn, ResolvedRelation,
};
use crate::domain::{
    AccessPolicy, ColumnName, Domain, DomainId, Error, QueryId, QueryResultRelation, RawIdentifier,
    Relation, Schema, SchemaId, ScalarId, TableId, TableRelation, Viewer, messages,
};

fn map_catalogue_error(error: RelationCatalogueError) -> Error {
    error!(error = %error, "relation catalogue lookup failed");
    match error {
        RelationCatalogueError::Connection { message } => {
            Error::service_unavailable(format!("relation catalogue unavailable: {message}"))
        }
        RelationCatalogueError::Query { message } => {
            Error::internal(format!("relation catalogue error: {message}"))
        }
    }
}

fn parse_id<T: From<ScalarId>>(field: &str, raw: RawIdentifier) -> Result<T, Error> {
    ScalarId::parse(raw)
        .map(T::from)
        .map_err(|err| err.into_error(field))
}

fn not_found() -> Error {
    Error::not_found(messages::NOT_FOUND)
}

/// Relation resolution service backed by a catalogue and an access policy.
#[derive(Clone)]
pub struct RelationResolver<C, P> {
    catalogue: Arc<C>,
    policy: Arc<P>,
}

impl<C, P> RelationResolver<C, P> {
    /// Create a resolver over the given catalogue and policy.
    pub fn new(catalogue: Arc<C>, policy: Arc<P>) -> Self {
        Self { catalogue, policy }
    }
}

impl<C, P> RelationResolver<C, P>
where
    C: RelationCatalogue,
    P: AccessPolicy,
{
    /// The schema if it exists and `viewer` may see it.
    async fn visible_schema(
        &self,
        viewer: &Viewer,
        schema_id: &SchemaId,
    ) -> Result<Option<Schema>, Error> {
        let schema = self
            .catalogue
            .find_schema(schema_id)
            .await
            .map_err(map_catalogue_error)?;
        Ok(schema.filter(|schema| self.policy.can_view_schema(viewer, schema)))
    }

    async fn resolve_query_result(&self, id: &QueryId) -> Result<QueryResultRelation, Error> {
        let Some(query) = self
            .catalogue
            .find_query(id)
            .await
            .map_err(map_catalogue_error)?
        else {
            debug!(query_id = %id, "query not found");
            return Err(not_found());
        };
        query.result().ok_or_else(|| {
            debug!(query_id = %id, state = query.status.name(), "query not finished");
            Error::conflict(messages::CONFLICT)
        })
    }

    async fn resolve_table(&self, viewer: &Viewer, id: &TableId) -> Result<TableRelation, Error> {
        let table = self
            .catalogue
            .find_table(id)
            .await
            .map_err(map_catalogue_error)?;
        let Some(table) = table else {
            debug!(table_id = %id, "table not resolved");
            return Err(not_found());
        };
        if self.visible_schema(viewer, &table.schema_id).await?.is_none() {
            debug!(table_id = %id, "table not resolved");
            return Err(not_found());
        }
        Ok(table)
    }

    /// Domains referenced by `relations`, ordered by id, each once.
    async fn referenced_domains<'a, I>(&self, relations: I) -> Result<Vec<Domain>, Error>
    where
        I: IntoIterator<Item = &'a Relation>,
    {
        let ids: BTreeSet<DomainId> = relations
            .into_iter()
            .flat_map(|relation| relation.heading().domain_ids().cloned())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DomainId> = ids.into_iter().collect();
        let mut domains = self
            .catalogue
            .find_domains(&ids)
            .await
            .map_err(map_catalogue_error)?;
        domains.sort_by(|left, right| left.id.cmp(&right.id));
        domains.dedup_by(|left, right| left.id == right.id);
        for id in ids
            .iter()
            .filter(|id| !domains.iter().any(|domain| &domain.id == *id))
        {
            warn!(domain_id = %id, "heading references unknown domain");
        }
        Ok(domains)
    }

    async fn resolved(&self, relation: Relation) -> Result<ResolvedRelation, Error> {
        let domains = self.referenced_domains([&relation]).await?;
        Ok(ResolvedRelation { relation, domains })
    }

    async fn listing(
        &self,
        owner: ListingOwner,
        relations: Vec<Relation>,
    ) -> Result<RelationListing, Error> {
        let domains = self.referenced_domains(&relations).await?;
        Ok(RelationListing {
            owner,
            relations,
            domains,
        })
    }

    async fn column_of(
        &self,
        relation: Relation,
        name: &ColumnName,
    ) -> Result<ResolvedColumn, Error> {
        let Some(column) = relation.heading().column(name).cloned() else {
            debug!(relation_id = relation.id(), column = %name, "heading column not found");
            return Err(not_found());
        };
        let domain = match &column.domain {
            Some(domain_id) => {
                let domain = self
                    .catalogue
                    .find_domain(domain_id)
                    .await
                    .map_err(map_catalogue_error)?;
                if domain.is_none() {
                    warn!(domain_id = %domain_id, "heading references unknown domain");
                }
                domain
            }
            None => None,
        };
        Ok(ResolvedColumn {
            relation,
            column,
            domain,
        })
    }

    async fn find_domain(&self, id: &DomainId) -> Result<Domain, Error> {
        self.catalogue
            .find_domain(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| {
                debug!(domain_id = %id, "domain not found");
                not_found()
            })
    }
}

#[async_trait]
impl<C, P> RelationsQuery for RelationResolver<C, P>
where
    C: RelationCatalogue,
    P: AccessPolicy,
{
    async fn query_result(
        &self,
        _viewer: &Viewer,
        query_id: RawIdentifier,
    ) -> Result<ResolvedRelation, Error> {
        let id: QueryId = parse_id("query_id", query_id)?;
        let relation = self.resolve_query_result(&id).await?;
        self.resolved(relation.into()).await
    }

    async fn query_result_column(
        &self,
        _viewer: &Viewer,
        query_id: RawIdentifier,
        column: RawIdentifier,
    ) -> Result<ResolvedColumn, Error> {
        let id: QueryId = parse_id("query_id", query_id)?;
        let column: ColumnName = parse_id("column", column)?;
        let relation = self.resolve_query_result(&id).await?;
        self.column_of(relation.into(), &column).await
    }

    async fn table(&self, viewer: &Viewer, id: RawIdentifier) -> Result<ResolvedRelation, Error> {
        let id: TableId = parse_id("id", id)?;
        let table = self.resolve_table(viewer, &id).await?;
        self.resolved(table.into()).await
    }

    async fn table_column(
        &self,
        viewer: &Viewer,
        id: RawIdentifier,
        column: RawIdentifier,
    ) -> Result<ResolvedColumn, Error> {
        let id: TableId = parse_id("id", id)?;
        let column: ColumnName = parse_id("column", column)?;
        let table = self.resolve_table(viewer, &id).await?;
        self.column_of(table.into(), &column).await
    }

    async fn relations_by_schema(
        &self,
        viewer: &Viewer,
        schema_id: RawIdentifier,
    ) -> Result<RelationListing, Error> {
        let id: SchemaId = parse_id("schema_id", schema_id)?;
        let Some(schema) = self.visible_schema(viewer, &id).await? else {
            debug!(schema_id = %id, "schema not resolved");
            return Err(not_found());
        };
        let tables = self
            .catalogue
            .list_tables(&schema.id)
            .await
            .map_err(map_catalogue_error)?;
        let relations = tables.into_iter().map(Relation::from).collect();
        self.listing(ListingOwner::Schema(schema.id), relations)
            .await
    }

    async fn relations_by_domain(
        &self,
        viewer: &Viewer,
        domain_id: RawIdentifier,
    ) -> Result<RelationListing, Error> {
        let id: DomainId = parse_id("domain_id", domain_id)?;
        let domain = self.find_domain(&id).await?;
        let tables = self
            .catalogue
            .list_tables_by_domain(&domain.id)
            .await
            .map_err(map_catalogue_error)?;

        let mut visibility: BTreeMap<SchemaId, bool> = BTreeMap::new();
        let mut relations = Vec::with_capacity(tables.len());
        for table in tables {
            let visible = match visibility.get(&table.schema_id) {
                Some(visible) => *visible,
                None => {
                    let visible = self.visible_schema(viewer, &table.schema_id).await?.is_some();
                    visibility.insert(table.schema_id.clone(), visible);
                    visible
                }
            };
            if visible {
                relations.push(Relation::from(table));
            }
        }
        let results = self
            .catalogue
            .list_results_by_domain(&domain.id)
            .await
            .map_err(map_catalogue_error)?;
        relations.extend(results.into_iter().map(Relation::from));
        self.listing(ListingOwner::Domain(domain.id), relations)
            .await
    }

    async fn domain(&self, _viewer: &Viewer, domain_id: RawIdentifier) -> Result<Domain, Error> {
        let id: DomainId = parse_id("domain_id", domain_id)?;
        self.find_domain(&id).await
    }
}

#[cfg(test)]
#[path = "relation_resolver_tests.rs"]
mod tests;
