//! Catalogue seed documents.
//!
//! A seed is a JSON file describing everything the service can serve:
//!
//! ```json
//! {
//!   "version": 1,
//!   "domains": [{ "id": "IATA_CITY", "name": "IATA_CITY" }],
//!   "schemas": [{
//!     "id": "MARKET", "name": "Market",
//!     "tables": [{ "id": "BOOKINGS_OND", "name": "BOOKINGS_OND",
//!                  "heading": [{ "name": "BOARD_CITY", "domain": "IATA_CITY" }] }]
//!   }],
//!   "queries": [{ "id": "q1", "statement": "SELECT a", "state": "finished",
//!                 "heading": [{ "name": "a", "domain": "IATA_CITY" }] }],
//!   "accounts": [{ "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "username": "market",
//!                  "passwordSha256": "...", "role": "market" }],
//!   "grants": { "market": ["MARKET"] }
//! }
//! ```
//!
//! Parsing checks shape; [`CatalogueSeed::from_json`] then checks that ids
//! are unique and that every reference resolves.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::{
    Domain, DomainId, Heading, Query, QueryId, Role, RoleGrantPolicy, Schema, SchemaId, TableId,
    TableRelation, UserId,
};

/// Seed format version understood by this build.
pub const SUPPORTED_VERSION: u32 = 1;

/// Errors raised while loading or validating a catalogue seed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueSeedError {
    /// The seed file could not be read.
    #[error("failed to read catalogue at '{path}': {message}")]
    Io { path: PathBuf, message: String },
    /// The JSON is malformed or a value failed type-level validation.
    #[error("invalid catalogue JSON: {message}")]
    Parse { message: String },
    /// The seed declares an unknown format version.
    #[error("unsupported catalogue version: expected {expected}, found {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },
    /// Two entries of the same kind share an identifier.
    #[error("duplicate {kind} '{id}'")]
    Duplicate { kind: &'static str, id: String },
    /// A heading column names a domain that is not declared.
    #[error("relation '{relation}' column '{column}' references unknown domain '{domain}'")]
    UnknownDomain {
        relation: String,
        column: String,
        domain: String,
    },
    /// A grant names a schema that is not declared.
    #[error("role '{role}' is granted unknown schema '{schema}'")]
    UnknownSchema { role: String, schema: String },
    /// An entry failed a value-level check.
    #[error("invalid {kind} '{id}': {message}")]
    Invalid {
        kind: &'static str,
        id: String,
        message: String,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawSeed {
    version: u32,
    #[serde(default)]
    domains: Vec<Domain>,
    #[serde(default)]
    schemas: Vec<RawSchema>,
    #[serde(default)]
    queries: Vec<Query>,
    #[serde(default)]
    accounts: Vec<RawAccount>,
    #[serde(default)]
    grants: BTreeMap<String, Vec<SchemaId>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    id: SchemaId,
    name: String,
    #[serde(default)]
    tables: Vec<RawTable>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    id: TableId,
    name: String,
    heading: Heading,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawAccount {
    id: String,
    username: String,
    password_sha256: String,
    role: String,
}

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    password_digest: Vec<u8>,
}

impl Account {
    /// Whether `password` hashes to the stored digest, compared in constant time.
    pub fn password_matches(&self, password: &str) -> bool {
        Sha256::digest(password.as_bytes())
            .as_slice()
            .ct_eq(self.password_digest.as_slice())
            .into()
    }
}

/// Hex-encoded SHA-256 of `password`, as stored in `passwordSha256`.
///
/// # Examples
/// ```
/// use sqlegalize::outbound::catalogue::password_sha256;
///
/// assert_eq!(password_sha256("secret").len(), 64);
/// ```
pub fn password_sha256(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Entry counts reported by `catalogue-check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueSummary {
    pub domains: usize,
    pub schemas: usize,
    pub tables: usize,
    pub queries: usize,
    pub accounts: usize,
    pub roles: usize,
}

/// A validated catalogue seed.
#[derive(Debug, Clone)]
pub struct CatalogueSeed {
    pub(super) domains: Vec<Domain>,
    pub(super) schemas: Vec<Schema>,
    /// Tables in file order, grouped by owning schema.
    pub(super) tables: Vec<TableRelation>,
    pub(super) queries: Vec<Query>,
    pub(super) accounts: Vec<Account>,
    pub(super) policy: RoleGrantPolicy,
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), CatalogueSeedError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogueSeedError::Duplicate {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn ensure_domains_known(
    known: &BTreeSet<&DomainId>,
    relation: &str,
    heading: &Heading,
) -> Result<(), CatalogueSeedError> {
    for column in heading.columns() {
        if let Some(domain) = column.domain.as_ref().filter(|id| !known.contains(id)) {
            return Err(CatalogueSeedError::UnknownDomain {
                relation: relation.to_owned(),
                column: column.name.to_string(),
                domain: domain.to_string(),
            });
        }
    }
    Ok(())
}

fn invalid(kind: &'static str, id: &str, message: impl ToString) -> CatalogueSeedError {
    CatalogueSeedError::Invalid {
        kind,
        id: id.to_owned(),
        message: message.to_string(),
    }
}

fn account(raw: RawAccount) -> Result<Account, CatalogueSeedError> {
    let user_id = UserId::new(&raw.id).map_err(|err| invalid("account", &raw.username, err))?;
    let role = Role::new(&raw.role).map_err(|err| invalid("account", &raw.username, err))?;
    let username = raw.username.trim().to_owned();
    if username.is_empty() {
        return Err(invalid("account", &raw.id, "username must not be empty"));
    }
    let password_digest = hex::decode(raw.password_sha256.trim())
        .ok()
        .filter(|digest| digest.len() == Sha256::output_size())
        .ok_or_else(|| invalid("account", &username, "passwordSha256 must be 64 hex digits"))?;
    Ok(Account {
        user_id,
        username,
        role,
        password_digest,
    })
}

impl CatalogueSeed {
    /// Parse and validate a seed from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueSeedError`] when the JSON is malformed, the
    /// version is unsupported, an id is duplicated or a reference dangles.
    pub fn from_json(json: &str) -> Result<Self, CatalogueSeedError> {
        let raw: RawSeed = serde_json::from_str(json).map_err(|err| CatalogueSeedError::Parse {
            message: err.to_string(),
        })?;
        Self::from_raw(raw)
    }

    /// Validate an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// As for [`CatalogueSeed::from_json`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, CatalogueSeedError> {
        let raw: RawSeed =
            serde_json::from_value(value).map_err(|err| CatalogueSeedError::Parse {
                message: err.to_string(),
            })?;
        Self::from_raw(raw)
    }

    /// Load a seed file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueSeedError::Io`] when the file cannot be read, and
    /// otherwise as for [`CatalogueSeed::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, CatalogueSeedError> {
        let io_error = |message: String| CatalogueSeedError::Io {
            path: path.to_path_buf(),
            message,
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("path has no file name".to_owned()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| io_error(err.to_string()))?;
        let contents = dir
            .read_to_string(file_name)
            .map_err(|err| io_error(err.to_string()))?;
        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeed) -> Result<Self, CatalogueSeedError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(CatalogueSeedError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        ensure_unique("domain", raw.domains.iter().map(|d| d.id.as_str()))?;
        if let Some(domain) = raw.domains.iter().find(|d| d.name.trim().is_empty()) {
            return Err(invalid("domain", domain.id.as_str(), "name must not be empty"));
        }
        let known_domains: BTreeSet<&DomainId> = raw.domains.iter().map(|d| &d.id).collect();

        ensure_unique("schema", raw.schemas.iter().map(|s| s.id.as_str()))?;
        ensure_unique(
            "table",
            raw.schemas
                .iter()
                .flat_map(|s| s.tables.iter().map(|t| t.id.as_str())),
        )?;
        ensure_unique("query", raw.queries.iter().map(|q| q.id.as_str()))?;
        ensure_unique("account", raw.accounts.iter().map(|a| a.username.trim()))?;
        ensure_unique("account id", raw.accounts.iter().map(|a| a.id.as_str()))?;

        let mut schemas = Vec::with_capacity(raw.schemas.len());
        let mut tables = Vec::new();
        for schema in raw.schemas {
            if schema.name.trim().is_empty() {
                return Err(invalid("schema", schema.id.as_str(), "name must not be empty"));
            }
            for table in schema.tables {
                if table.name.trim().is_empty() {
                    return Err(invalid("table", table.id.as_str(), "name must not be empty"));
                }
                ensure_domains_known(&known_domains, table.id.as_str(), &table.heading)?;
                tables.push(TableRelation {
                    id: table.id,
                    schema_id: schema.id.clone(),
                    name: table.name,
                    heading: table.heading,
                });
            }
            schemas.push(Schema {
                id: schema.id,
                name: schema.name,
            });
        }

        let mut queries = Vec::with_capacity(raw.queries.len());
        for query in raw.queries {
            let query = Query::new(query.id.clone(), query.statement, query.status)
                .map_err(|err| invalid("query", query.id.as_str(), err))?;
            if let Some(result) = query.result() {
                ensure_domains_known(&known_domains, result.id.as_str(), &result.heading)?;
            }
            queries.push(query);
        }

        let accounts = raw
            .accounts
            .into_iter()
            .map(account)
            .collect::<Result<Vec<_>, _>>()?;

        let known_schemas: BTreeSet<&SchemaId> = schemas.iter().map(|s| &s.id).collect();
        let mut policy = RoleGrantPolicy::default();
        for (role, granted) in raw.grants {
            let parsed = Role::new(&role).map_err(|err| invalid("grant", &role, err))?;
            for schema in granted {
                if !known_schemas.contains(&schema) {
                    return Err(CatalogueSeedError::UnknownSchema {
                        role,
                        schema: schema.to_string(),
                    });
                }
                policy = policy.grant(parsed.clone(), schema);
            }
        }

        Ok(Self {
            domains: raw.domains,
            schemas,
            tables,
            queries,
            accounts,
            policy,
        })
    }

    /// Entry counts.
    pub fn summary(&self) -> CatalogueSummary {
        CatalogueSummary {
            domains: self.domains.len(),
            schemas: self.schemas.len(),
            tables: self.tables.len(),
            queries: self.queries.len(),
            accounts: self.accounts.len(),
            roles: self.policy.roles().count(),
        }
    }

    /// Query identifiers with their lifecycle state.
    pub fn query_ids(&self) -> impl Iterator<Item = (&QueryId, &'static str)> {
        self.queries.iter().map(|q| (&q.id, q.status.name()))
    }
}

#[cfg(test)]
#[path = "seed_tests.rs"]
mod tests;
