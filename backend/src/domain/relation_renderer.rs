//! Renders resolved relations as hypermedia documents.
//!
//! Every entry path (query result, table, listings) goes through
//! one private resource builder, so a relation looks the same
//! however it was reached.

use super::hypermedia::{
    Attributes, Document, Included, LinkBuilder, Links, PrimaryData, Relationship,
    Relationships, ResourceIdentifier, ResourceObject, resource_types,
};
use super::ports::{ListingOwner, RelationListing, ResolvedColumn, ResolvedRelation};
use super::{Domain, DomainId, HeadingColumn, Relation};

/// Relationship name of a heading column.
pub fn heading_relationship_name(column: &str) -> String {
    format!("heading_{column}")
}

/// Turns resolved relations into documents with absolute links.
#[derive(Debug, Clone)]
pub struct RelationRenderer {
    links: LinkBuilder,
}

impl RelationRenderer {
    /// Create a renderer producing links below `links`' base.
    pub fn new(links: LinkBuilder) -> Self {
        Self { links }
    }

    /// Link builder used for every document.
    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }

    /// Document for one relation and its domains.
    pub fn render_relation(&self, resolved: &ResolvedRelation) -> Document {
        let resource = self.relation_resource(&resolved.relation);
        Document {
            links: resource.links.clone(),
            data: PrimaryData::Single(Box::new(resource)),
            included: self.included_domains(&resolved.domains),
        }
    }

    /// Document for a schema or domain listing.
    pub fn render_listing(&self, listing: &RelationListing) -> Document {
        let self_link = match &listing.owner {
            ListingOwner::Schema(id) => self.links.schema_relations(id.as_str()),
            ListingOwner::Domain(id) => self.links.domain_relations(id.as_str()),
        };
        Document {
            links: Links::to_self(self_link),
            data: PrimaryData::Many(
                listing
                    .relations
                    .iter()
                    .map(|relation| self.relation_resource(relation))
                    .collect(),
            ),
            included: self.included_domains(&listing.domains),
        }
    }

    /// Document for one heading column.
    pub fn render_column(&self, resolved: &ResolvedColumn) -> Document {
        let relation_id = resolved.relation.id();
        let column = resolved.column.name.as_str();
        let (self_link, relation_link) = match &resolved.relation {
            Relation::QueryResult(_) => (
                self.links.query_result_heading(relation_id, column),
                self.links.query_result(relation_id),
            ),
            Relation::Table(_) => (
                self.links.relation_heading(relation_id, column),
                self.links.relation(relation_id),
            ),
        };

        let mut relationships = Relationships::default();
        relationships.push(
            resource_types::RELATION,
            Relationship {
                links: Links::to_related(relation_link),
                data: Some(Some(ResourceIdentifier {
                    kind: resource_types::RELATION,
                    id: relation_id.to_owned(),
                })),
            },
        );
        relationships.push(
            resource_types::DOMAIN,
            self.domain_relationship(&resolved.column),
        );

        let resource = ResourceObject {
            kind: resource_types::HEADING,
            id: format!("{relation_id}:{column}"),
            links: Links::to_self(self_link),
            attributes: Attributes::HeadingColumn {
                name: column.to_owned(),
            },
            relationships,
        };
        Document {
            links: resource.links.clone(),
            data: PrimaryData::Single(Box::new(resource)),
            included: self.included_domains(resolved.domain.as_slice()),
        }
    }

    /// Document for a single domain.
    pub fn render_domain(&self, domain: &Domain) -> Document {
        let resource = self.domain_resource(domain);
        Document {
            links: resource.links.clone(),
            data: PrimaryData::Single(Box::new(resource)),
            included: Vec::new(),
        }
    }

    fn relation_resource(&self, relation: &Relation) -> ResourceObject {
        let id = relation.id();
        let heading = relation.heading();
        let (self_link, body_link, attributes) = match relation {
            Relation::QueryResult(query) => (
                self.links.query_result(id),
                self.links.query_result_body(id),
                Attributes::QueryResult {
                    sql: query.statement.clone(),
                    heading: heading.column_names().map(str::to_owned).collect(),
                },
            ),
            Relation::Table(table) => (
                self.links.relation(id),
                self.links.relation_body(id),
                Attributes::Table {
                    name: table.name.clone(),
                    heading: heading.column_names().map(str::to_owned).collect(),
                },
            ),
        };

        let mut relationships = Relationships::default();
        for column in heading.columns() {
            let name = column.name.as_str();
            let related = match relation {
                Relation::QueryResult(_) => self.links.query_result_heading(id, name),
                Relation::Table(_) => self.links.relation_heading(id, name),
            };
            relationships.push(
                heading_relationship_name(name),
                Relationship {
                    links: Links::to_related(related),
                    data: Some(column.domain.as_ref().map(domain_identifier)),
                },
            );
        }
        relationships.push(
            "body",
            Relationship {
                links: Links::to_related(body_link),
                data: None,
            },
        );

        ResourceObject {
            kind: resource_types::RELATION,
            id: id.to_owned(),
            links: Links::to_self(self_link),
            attributes,
            relationships,
        }
    }

    fn domain_relationship(&self, column: &HeadingColumn) -> Relationship {
        match &column.domain {
            Some(id) => Relationship {
                links: Links::to_related(self.links.domain(id.as_str())),
                data: Some(Some(domain_identifier(id))),
            },
            None => Relationship {
                links: Links::default(),
                data: Some(None),
            },
        }
    }

    fn domain_resource(&self, domain: &Domain) -> ResourceObject {
        let id = domain.id.as_str();
        let mut relationships = Relationships::default();
        relationships.push(
            "relations",
            Relationship {
                links: Links::to_related(self.links.domain_relations(id)),
                data: None,
            },
        );
        ResourceObject {
            kind: resource_types::DOMAIN,
            id: id.to_owned(),
            links: Links::to_self(self.links.domain(id)),
            attributes: Attributes::Domain {
                name: domain.name.clone(),
                description: domain.description.clone(),
            },
            relationships,
        }
    }

    fn included_domains(&self, domains: &[Domain]) -> Vec<ResourceObject> {
        let mut included = Included::default();
        for domain in domains {
            included.insert(self.domain_resource(domain));
        }
        included.into_vec()
    }
}

fn domain_identifier(id: &DomainId) -> ResourceIdentifier {
    ResourceIdentifier {
        kind: resource_types::DOMAIN,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    //! Document shape and determinism.
    use super::*;
    use crate::domain::{
        ColumnName, Heading, QueryId, QueryResultRelation, SchemaId, TableId, TableRelation,
    };
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    const ROOT: &str = "http://localhost:8080/api/v2";

    #[fixture]
    fn renderer() -> RelationRenderer {
        RelationRenderer::new(LinkBuilder::parse(ROOT).expect("base url"))
    }

    fn heading(columns: &[(&str, Option<&str>)]) -> Heading {
        Heading::new(
            columns
                .iter()
                .map(|(name, domain)| {
                    HeadingColumn::new(
                        ColumnName::new(*name).expect("column"),
                        domain.map(|id| DomainId::new(id).expect("domain id")),
                    )
                })
                .collect(),
        )
        .expect("heading")
    }

    fn iata_city() -> Domain {
        Domain {
            id: DomainId::new("IATA_CITY").expect("domain id"),
            name: "IATA_CITY".to_owned(),
            description: None,
        }
    }

    fn query_result() -> ResolvedRelation {
        ResolvedRelation {
            relation: Relation::QueryResult(QueryResultRelation {
                id: QueryId::new("q1").expect("query id"),
                statement: "SELECT a".to_owned(),
                heading: heading(&[("a", Some("IATA_CITY"))]),
            }),
            domains: vec![iata_city()],
        }
    }

    fn bookings() -> Relation {
        Relation::Table(TableRelation {
            id: TableId::new("BOOKINGS_OND").expect("table id"),
            schema_id: SchemaId::new("MARKET").expect("schema id"),
            name: "BOOKINGS_OND".to_owned(),
            heading: heading(&[("BOARD_CITY", Some("IATA_CITY"))]),
        })
    }

    fn to_json(document: &Document) -> Value {
        serde_json::to_value(document).expect("document serialises")
    }

    #[rstest]
    fn renders_finished_query_result(renderer: RelationRenderer) {
        let document = to_json(&renderer.render_relation(&query_result()));
        assert_eq!(
            document,
            json!({
                "links": { "self": format!("{ROOT}/query_results/q1") },
                "data": {
                    "type": "relation",
                    "id": "q1",
                    "links": { "self": format!("{ROOT}/query_results/q1") },
                    "attributes": { "sql": "SELECT a", "heading": ["a"] },
                    "relationships": {
                        "heading_a": {
                            "links": { "related": format!("{ROOT}/query_results/q1/heading/a") },
                            "data": { "type": "domain", "id": "IATA_CITY" },
                        },
                        "body": {
                            "links": { "related": format!("{ROOT}/query_results/q1/body") },
                        },
                    },
                },
                "included": [{
                    "type": "domain",
                    "id": "IATA_CITY",
                    "links": { "self": format!("{ROOT}/domains/IATA_CITY") },
                    "attributes": { "name": "IATA_CITY" },
                    "relationships": {
                        "relations": {
                            "links": { "related": format!("{ROOT}/domains/IATA_CITY/relations") },
                        },
                    },
                }],
            })
        );
    }

    #[rstest]
    fn preserves_heading_order(renderer: RelationRenderer) {
        let relation = Relation::QueryResult(QueryResultRelation {
            id: QueryId::new("q2").expect("query id"),
            statement: "SELECT b, a".to_owned(),
            heading: heading(&[("b", None), ("a", Some("IATA_CITY"))]),
        });
        let resource = renderer.relation_resource(&relation);
        let names: Vec<_> = resource.relationships.names().collect();
        assert_eq!(names, ["heading_b", "heading_a", "body"]);

        let text = serde_json::to_string(&resource).expect("serialise");
        let b = text.find("\"heading_b\"").expect("heading_b present");
        let a = text.find("\"heading_a\"").expect("heading_a present");
        assert!(b < a);
        assert_eq!(to_json_value(&resource)["attributes"]["heading"], json!(["b", "a"]));
        assert_eq!(
            to_json_value(&resource)["relationships"]["heading_b"]["data"],
            Value::Null
        );
    }

    fn to_json_value(resource: &ResourceObject) -> Value {
        serde_json::to_value(resource).expect("resource serialises")
    }

    #[rstest]
    fn table_renders_identically_in_listing_and_lookup(renderer: RelationRenderer) {
        let direct = renderer.render_relation(&ResolvedRelation {
            relation: bookings(),
            domains: vec![iata_city()],
        });
        let listing = renderer.render_listing(&RelationListing {
            owner: ListingOwner::Schema(SchemaId::new("MARKET").expect("schema id")),
            relations: vec![bookings()],
            domains: vec![iata_city()],
        });

        let direct = to_json(&direct);
        let listing = to_json(&listing);
        assert_eq!(listing["data"][0], direct["data"]);
        assert_eq!(listing["included"], direct["included"]);
        assert_eq!(listing["links"]["self"], json!(format!("{ROOT}/schemas/MARKET/relations")));
        assert_eq!(
            direct["data"]["attributes"],
            json!({ "name": "BOOKINGS_OND", "heading": ["BOARD_CITY"] })
        );
    }

    #[rstest]
    fn listing_includes_each_domain_once(renderer: RelationRenderer) {
        let listing = renderer.render_listing(&RelationListing {
            owner: ListingOwner::Domain(DomainId::new("IATA_CITY").expect("domain id")),
            relations: vec![bookings(), query_result().relation],
            domains: vec![iata_city(), iata_city()],
        });
        assert_eq!(listing.included.len(), 1);
        assert_eq!(
            to_json(&listing)["links"]["self"],
            json!(format!("{ROOT}/domains/IATA_CITY/relations"))
        );
    }

    #[rstest]
    fn empty_listing_has_empty_data(renderer: RelationRenderer) {
        let listing = renderer.render_listing(&RelationListing {
            owner: ListingOwner::Schema(SchemaId::new("EMPTY").expect("schema id")),
            relations: Vec::new(),
            domains: Vec::new(),
        });
        let json = to_json(&listing);
        assert_eq!(json["data"], json!([]));
        assert!(json.get("included").is_none());
    }

    #[rstest]
    fn renders_heading_column(renderer: RelationRenderer) {
        let resolved = query_result();
        let column = resolved.relation.heading().columns()[0].clone();
        let document = to_json(&renderer.render_column(&ResolvedColumn {
            relation: resolved.relation,
            column,
            domain: Some(iata_city()),
        }));
        assert_eq!(document["data"]["type"], json!("heading"));
        assert_eq!(document["data"]["id"], json!("q1:a"));
        assert_eq!(
            document["links"]["self"],
            json!(format!("{ROOT}/query_results/q1/heading/a"))
        );
        assert_eq!(
            document["data"]["relationships"]["domain"]["data"],
            json!({ "type": "domain", "id": "IATA_CITY" })
        );
        assert_eq!(document["included"][0]["id"], json!("IATA_CITY"));
    }

    #[rstest]
    fn rendering_is_byte_identical(renderer: RelationRenderer) {
        let first = serde_json::to_vec(&renderer.render_relation(&query_result())).expect("json");
        let second = serde_json::to_vec(&renderer.render_relation(&query_result())).expect("json");
        assert_eq!(first, second);
    }
}
