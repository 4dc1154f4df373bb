//! JSON:API-shaped hypermedia documents and link construction.
//!
//! Documents are plain serialisable values. Member order is fixed by the
//! struct layout and by [`Relationships`], which keeps insertion order, so
//! the same input always serialises to the same bytes.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use url::Url;

/// Media type of every hypermedia response body.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Resource type names.
pub mod resource_types {
    /// A query result or a table.
    pub const RELATION: &str = "relation";
    /// A semantic column type.
    pub const DOMAIN: &str = "domain";
    /// One column of a relation heading.
    pub const HEADING: &str = "heading";
}

/// Errors raised when configuring the link base.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkBaseError {
    /// The base URL could not be parsed.
    #[error("invalid public URL {url}: {message}")]
    Invalid { url: String, message: String },
    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("public URL {url} cannot be used as a link base")]
    CannotBeABase { url: String },
}

/// Builds absolute links below the public API root.
///
/// # Examples
/// ```
/// use sqlegalize::domain::LinkBuilder;
///
/// let links = LinkBuilder::parse("http://localhost:8080/api/v2/").expect("base url");
/// assert_eq!(
///     links.relation("BOOKINGS_OND"),
///     "http://localhost:8080/api/v2/relations/BOOKINGS_OND"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base: Url,
}

impl LinkBuilder {
    /// Use `base` as the API root.
    pub fn new(base: Url) -> Result<Self, LinkBaseError> {
        if base.cannot_be_a_base() {
            return Err(LinkBaseError::CannotBeABase {
                url: base.to_string(),
            });
        }
        Ok(Self { base })
    }

    /// Parse and validate an API root.
    pub fn parse(base: &str) -> Result<Self, LinkBaseError> {
        let url = Url::parse(base).map_err(|err| LinkBaseError::Invalid {
            url: base.to_owned(),
            message: err.to_string(),
        })?;
        Self::new(url)
    }

    fn link(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    /// `/query_results/{id}`
    pub fn query_result(&self, id: &str) -> String {
        self.link(&["query_results", id])
    }

    /// `/query_results/{id}/heading/{column}`
    pub fn query_result_heading(&self, id: &str, column: &str) -> String {
        self.link(&["query_results", id, "heading", column])
    }

    /// `/query_results/{id}/body`
    pub fn query_result_body(&self, id: &str) -> String {
        self.link(&["query_results", id, "body"])
    }

    /// `/relations/{id}`
    pub fn relation(&self, id: &str) -> String {
        self.link(&["relations", id])
    }

    /// `/relations/{id}/heading/{column}`
    pub fn relation_heading(&self, id: &str, column: &str) -> String {
        self.link(&["relations", id, "heading", column])
    }

    /// `/relations/{id}/body`
    pub fn relation_body(&self, id: &str) -> String {
        self.link(&["relations", id, "body"])
    }

    /// `/schemas/{id}/relations`
    pub fn schema_relations(&self, id: &str) -> String {
        self.link(&["schemas", id, "relations"])
    }

    /// `/domains/{id}/relations`
    pub fn domain_relations(&self, id: &str) -> String {
        self.link(&["domains", id, "relations"])
    }

    /// `/domains/{id}`
    pub fn domain(&self, id: &str) -> String {
        self.link(&["domains", id])
    }
}

/// `self` and `related` links of a resource or relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

impl Links {
    /// Links with only `self`.
    pub fn to_self(href: String) -> Self {
        Self {
            self_link: Some(href),
            related: None,
        }
    }

    /// Links with only `related`.
    pub fn to_related(href: String) -> Self {
        Self {
            self_link: None,
            related: Some(href),
        }
    }

    /// Whether neither link is set.
    pub fn is_empty(&self) -> bool {
        self.self_link.is_none() && self.related.is_none()
    }
}

/// `{ "type", "id" }` pair naming a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
}

/// A relationship member.
///
/// `data` is omitted when `None`, and serialised as `null` when
/// `Some(None)` to state that the relationship is known to be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    #[serde(skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Option<ResourceIdentifier>>,
}

/// Named relationships in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships(Vec<(String, Relationship)>);

impl Relationships {
    /// Append a relationship; names are expected to be unique.
    pub fn push(&mut self, name: impl Into<String>, relationship: Relationship) {
        self.0.push((name.into(), relationship));
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Relationship names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Relationships {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, relationship) in &self.0 {
            map.serialize_entry(name, relationship)?;
        }
        map.end()
    }
}

/// Attribute members per resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Attributes {
    /// Query result relation.
    QueryResult { sql: String, heading: Vec<String> },
    /// Table relation.
    Table { name: String, heading: Vec<String> },
    /// Domain.
    Domain {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Heading column.
    HeadingColumn { name: String },
}

/// A full resource object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub links: Links,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Relationships::is_empty")]
    pub relationships: Relationships,
}

impl ResourceObject {
    /// The identifier pair of this resource.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            kind: self.kind,
            id: self.id.clone(),
        }
    }
}

/// Primary data: one resource or an ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// A single resource.
    Single(Box<ResourceObject>),
    /// An ordered collection.
    Many(Vec<ResourceObject>),
}

/// Top-level document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub links: Links,
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
}

/// Accumulates included resources, keeping one copy per `(type, id)`.
#[derive(Debug, Clone, Default)]
pub struct Included(BTreeMap<(&'static str, String), ResourceObject>);

impl Included {
    /// Add a resource unless one with the same identity is present.
    pub fn insert(&mut self, resource: ResourceObject) {
        self.0
            .entry((resource.kind, resource.id.clone()))
            .or_insert(resource);
    }

    /// Flush into a list ordered by type then id.
    pub fn into_vec(self) -> Vec<ResourceObject> {
        self.0.into_values().collect()
    }
}
