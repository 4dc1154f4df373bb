//! Immutable in-memory catalogue built from a validated seed.
//!
//! One value serves as relation catalogue, login service and user
//! directory. It is never mutated after construction and is shared behind
//! an `Arc`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{LoginService, RelationCatalogue, RelationCatalogueError, UserDirectory};
use crate::domain::{
    Domain, DomainId, Error, LoginCredentials, Query, QueryId, QueryResultRelation,
    RoleGrantPolicy, Schema, SchemaId, TableId, TableRelation, UserId, Viewer,
};

use super::seed::{Account, CatalogueSeed};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Catalogue adapter holding every relation, account and grant in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCatalogue {
    domains: BTreeMap<DomainId, Domain>,
    schemas: BTreeMap<SchemaId, Schema>,
    tables: Vec<TableRelation>,
    table_index: BTreeMap<TableId, usize>,
    queries: BTreeMap<QueryId, Query>,
    accounts: Vec<Account>,
    policy: RoleGrantPolicy,
}

impl InMemoryCatalogue {
    /// Index a validated seed.
    pub fn new(seed: CatalogueSeed) -> Self {
        let CatalogueSeed {
            domains,
            schemas,
            tables,
            queries,
            accounts,
            policy,
        } = seed;
        let table_index = tables
            .iter()
            .enumerate()
            .map(|(index, table)| (table.id.clone(), index))
            .collect();
        Self {
            domains: domains.into_iter().map(|d| (d.id.clone(), d)).collect(),
            schemas: schemas.into_iter().map(|s| (s.id.clone(), s)).collect(),
            tables,
            table_index,
            queries: queries.into_iter().map(|q| (q.id.clone(), q)).collect(),
            accounts,
            policy,
        }
    }

    /// Role grants loaded with the catalogue.
    pub fn policy(&self) -> &RoleGrantPolicy {
        &self.policy
    }

    fn account_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }
}

impl From<CatalogueSeed> for InMemoryCatalogue {
    fn from(value: CatalogueSeed) -> Self {
        Self::new(value)
    }
}

#[async_trait]
impl RelationCatalogue for InMemoryCatalogue {
    async fn find_query(&self, id: &QueryId) -> Result<Option<Query>, RelationCatalogueError> {
        Ok(self.queries.get(id).cloned())
    }

    async fn find_table(
        &self,
        id: &TableId,
    ) -> Result<Option<TableRelation>, RelationCatalogueError> {
        Ok(self
            .table_index
            .get(id)
            .and_then(|index| self.tables.get(*index))
            .cloned())
    }

    async fn find_schema(&self, id: &SchemaId) -> Result<Option<Schema>, RelationCatalogueError> {
        Ok(self.schemas.get(id).cloned())
    }

    async fn list_tables(
        &self,
        schema: &SchemaId,
    ) -> Result<Vec<TableRelation>, RelationCatalogueError> {
        Ok(self
            .tables
            .iter()
            .filter(|table| &table.schema_id == schema)
            .cloned()
            .collect())
    }

    async fn find_domain(&self, id: &DomainId) -> Result<Option<Domain>, RelationCatalogueError> {
        Ok(self.domains.get(id).cloned())
    }

    async fn find_domains(&self, ids: &[DomainId]) -> Result<Vec<Domain>, RelationCatalogueError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.domains.get(id))
            .cloned()
            .collect())
    }

    async fn list_tables_by_domain(
        &self,
        domain: &DomainId,
    ) -> Result<Vec<TableRelation>, RelationCatalogueError> {
        Ok(self
            .tables
            .iter()
            .filter(|table| table.heading.domain_ids().any(|id| id == domain))
            .cloned()
            .collect())
    }

    async fn list_results_by_domain(
        &self,
        domain: &DomainId,
    ) -> Result<Vec<QueryResultRelation>, RelationCatalogueError> {
        Ok(self
            .queries
            .values()
            .filter_map(Query::result)
            .filter(|result| result.heading.domain_ids().any(|id| id == domain))
            .collect())
    }
}

#[async_trait]
impl LoginService for InMemoryCatalogue {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        match self.account_by_username(credentials.username()) {
            Some(account) if account.password_matches(credentials.password()) => {
                Ok(account.user_id.clone())
            }
            Some(_) => {
                debug!(username = credentials.username(), "password mismatch");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            None => {
                debug!(username = credentials.username(), "unknown username");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryCatalogue {
    async fn find_viewer(&self, user_id: &UserId) -> Result<Option<Viewer>, Error> {
        Ok(self
            .accounts
            .iter()
            .find(|account| &account.user_id == user_id)
            .map(|account| Viewer::new(account.user_id.clone(), account.role.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use crate::outbound::catalogue::demo::{
        HR_PASSWORD, HR_USER_ID, MARKET_PASSWORD, MARKET_USER_ID, demo_seed,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalogue() -> InMemoryCatalogue {
        InMemoryCatalogue::new(demo_seed().expect("demo seed"))
    }

    fn id<T: TryFrom<String>>(raw: &str) -> T
    where
        T::Error: std::fmt::Debug,
    {
        T::try_from(raw.to_owned()).expect("identifier")
    }

    #[rstest]
    #[tokio::test]
    async fn finds_tables_by_id_and_schema(catalogue: InMemoryCatalogue) {
        let table = catalogue
            .find_table(&id::<TableId>("BOOKINGS_OND"))
            .await
            .expect("lookup")
            .expect("table present");
        assert_eq!(table.schema_id.as_str(), "MARKET");

        let listed = catalogue
            .list_tables(&id::<SchemaId>("MARKET"))
            .await
            .expect("listing");
        let ids: Vec<_> = listed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["BOOKINGS_OND", "FARES"]);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_ids_are_absent(catalogue: InMemoryCatalogue) {
        assert!(
            catalogue
                .find_table(&id::<TableId>("NOPE"))
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(
            catalogue
                .find_query(&id::<QueryId>("nope"))
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(
            catalogue
                .list_tables(&id::<SchemaId>("NOPE"))
                .await
                .expect("listing")
                .is_empty()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn tables_by_domain_span_schemas(catalogue: InMemoryCatalogue) {
        let tables = catalogue
            .list_tables_by_domain(&id::<DomainId>("IATA_CITY"))
            .await
            .expect("listing");
        let ids: Vec<_> = tables.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["BOOKINGS_OND", "FARES", "EMPLOYEES"]);
    }

    #[rstest]
    #[tokio::test]
    async fn lists_only_finished_results_by_domain(catalogue: InMemoryCatalogue) {
        let results = catalogue
            .list_results_by_domain(&id::<DomainId>("IATA_CITY"))
            .await
            .expect("listing");
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["q1"]);

        let none = catalogue
            .list_results_by_domain(&id::<DomainId>("CURRENCY"))
            .await
            .expect("listing");
        assert!(none.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn find_domains_skips_unknown_ids(catalogue: InMemoryCatalogue) {
        let domains = catalogue
            .find_domains(&[id("IATA_CITY"), id("UNKNOWN")])
            .await
            .expect("lookup");
        assert_eq!(domains.len(), 1);
    }

    #[rstest]
    #[case("market", MARKET_PASSWORD, Some(MARKET_USER_ID))]
    #[case("hr", HR_PASSWORD, Some(HR_USER_ID))]
    #[case("market", HR_PASSWORD, None)]
    #[case("nobody", MARKET_PASSWORD, None)]
    #[tokio::test]
    async fn authenticates_against_accounts(
        catalogue: InMemoryCatalogue,
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Option<&str>,
    ) {
        let credentials = LoginCredentials::try_from_parts(username, password).expect("credentials");
        let result = catalogue.authenticate(&credentials).await;
        match expected {
            Some(user_id) => assert_eq!(result.expect("authenticated").as_ref(), user_id),
            None => assert_eq!(
                result.expect_err("rejected").code(),
                ErrorCode::Unauthorized
            ),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn directory_resolves_roles(catalogue: InMemoryCatalogue) {
        let viewer = catalogue
            .find_viewer(&UserId::new(HR_USER_ID).expect("user id"))
            .await
            .expect("lookup")
            .expect("known user");
        assert_eq!(viewer.role(), &Role::new("hr").expect("role"));

        let stranger = UserId::new("0b9d7a44-3c55-4f0e-8a5d-7b0f0c1d2e3f").expect("user id");
        assert!(catalogue.find_viewer(&stranger).await.expect("lookup").is_none());
    }
}
