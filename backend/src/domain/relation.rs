//! Relation read-model: headings, queries, tables, schemas and domains.
//!
//! These values are produced by the catalogue and are immutable once
//! constructed. Serde shapes double as the on-disk catalogue format.

use serde::{Deserialize, Serialize};

use super::identifier::{ColumnName, DomainId, QueryId, SchemaId, TableId};

/// Validation errors raised while building relation values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelationValidationError {
    /// A heading had no columns.
    #[error("heading must contain at least one column")]
    EmptyHeading,
    /// A heading named the same column twice.
    #[error("heading column {name} appears more than once")]
    DuplicateColumn { name: String },
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

/// One column of a heading and the domain it is bound to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadingColumn {
    pub name: ColumnName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainId>,
}

impl HeadingColumn {
    /// Create a column bound to an optional domain.
    pub fn new(name: ColumnName, domain: Option<DomainId>) -> Self {
        Self { name, domain }
    }
}

/// Ordered column list of a relation.
///
/// ## Invariants
/// - At least one column.
/// - Column names are distinct; order is significant.
///
/// # Examples
/// ```
/// use sqlegalize::domain::{ColumnName, Heading, HeadingColumn};
///
/// let column = |name: &str| HeadingColumn::new(ColumnName::new(name).expect("name"), None);
/// let heading = Heading::new(vec![column("a"), column("b")]).expect("valid heading");
/// let names: Vec<_> = heading.column_names().collect();
/// assert_eq!(names, ["a", "b"]);
/// assert!(Heading::new(vec![column("a"), column("a")]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HeadingColumn>", into = "Vec<HeadingColumn>")]
pub struct Heading(Vec<HeadingColumn>);

impl Heading {
    /// Validate and wrap an ordered column list.
    pub fn new(columns: Vec<HeadingColumn>) -> Result<Self, RelationValidationError> {
        if columns.is_empty() {
            return Err(RelationValidationError::EmptyHeading);
        }
        for (index, column) in columns.iter().enumerate() {
            if columns[..index].iter().any(|seen| seen.name == column.name) {
                return Err(RelationValidationError::DuplicateColumn {
                    name: column.name.to_string(),
                });
            }
        }
        Ok(Self(columns))
    }

    /// Columns in heading order.
    pub fn columns(&self) -> &[HeadingColumn] {
        &self.0
    }

    /// Column names in heading order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|column| column.name.as_str())
    }

    /// Find a column by name.
    pub fn column(&self, name: &ColumnName) -> Option<&HeadingColumn> {
        self.0.iter().find(|column| &column.name == name)
    }

    /// Domains referenced by the heading, in first-reference order.
    pub fn domain_ids(&self) -> impl Iterator<Item = &DomainId> {
        self.0.iter().filter_map(|column| column.domain.as_ref())
    }

    /// Whether any column is bound to `domain`.
    pub fn references(&self, domain: &DomainId) -> bool {
        self.domain_ids().any(|id| id == domain)
    }
}

impl TryFrom<Vec<HeadingColumn>> for Heading {
    type Error = RelationValidationError;

    fn try_from(value: Vec<HeadingColumn>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Heading> for Vec<HeadingColumn> {
    fn from(value: Heading) -> Self {
        value.0
    }
}

/// Lifecycle of a stored query as reported by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QueryStatus {
    /// Accepted but not started.
    Created,
    /// Currently executing.
    Running,
    /// Completed with a result heading.
    Finished { heading: Heading },
    /// Terminated without a result.
    Failed,
}

impl QueryStatus {
    /// Lower-case state name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Finished { .. } => "finished",
            Self::Failed => "failed",
        }
    }
}

/// A stored SQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub id: QueryId,
    pub statement: String,
    #[serde(flatten)]
    pub status: QueryStatus,
}

impl Query {
    /// Build a query, rejecting a blank statement.
    pub fn new(
        id: QueryId,
        statement: impl Into<String>,
        status: QueryStatus,
    ) -> Result<Self, RelationValidationError> {
        let statement = statement.into();
        if statement.trim().is_empty() {
            return Err(RelationValidationError::EmptyField {
                field: "query.statement",
            });
        }
        Ok(Self {
            id,
            statement,
            status,
        })
    }

    /// The result relation, available only once the query has finished.
    pub fn result(&self) -> Option<QueryResultRelation> {
        match &self.status {
            QueryStatus::Finished { heading } => Some(QueryResultRelation {
                id: self.id.clone(),
                statement: self.statement.clone(),
                heading: heading.clone(),
            }),
            _ => None,
        }
    }
}

/// Result relation of a finished query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResultRelation {
    pub id: QueryId,
    pub statement: String,
    pub heading: Heading,
}

/// A persisted table owned by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableRelation {
    pub id: TableId,
    pub schema_id: SchemaId,
    pub name: String,
    pub heading: Heading,
}

/// Either kind of relation, rendered through the same code path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// Result of a finished query.
    QueryResult(QueryResultRelation),
    /// Persisted table.
    Table(TableRelation),
}

impl Relation {
    /// Identifier text of the relation.
    pub fn id(&self) -> &str {
        match self {
            Self::QueryResult(relation) => relation.id.as_str(),
            Self::Table(relation) => relation.id.as_str(),
        }
    }

    /// Heading of the relation.
    pub fn heading(&self) -> &Heading {
        match self {
            Self::QueryResult(relation) => &relation.heading,
            Self::Table(relation) => &relation.heading,
        }
    }
}

impl From<QueryResultRelation> for Relation {
    fn from(value: QueryResultRelation) -> Self {
        Self::QueryResult(value)
    }
}

impl From<TableRelation> for Relation {
    fn from(value: TableRelation) -> Self {
        Self::Table(value)
    }
}

/// Named semantic column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ownership container for tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    pub id: SchemaId,
    pub name: String,
}
