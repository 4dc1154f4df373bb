//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v2` endpoint, the health probes, the
//! schema wrappers from [`crate::inbound::http::schemas`] and the session
//! cookie security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use crate::inbound::http::schemas::{DocumentSchema, ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v2/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "sqlegalize relations API",
        description = "Read-only hypermedia access to query results, tables, headings and domains.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::relations::show_by_query,
        crate::inbound::http::relations::show_query_result_heading,
        crate::inbound::http::relations::index_by_domain,
        crate::inbound::http::relations::show_domain,
        crate::inbound::http::relations::index_by_schema,
        crate::inbound::http::relations::show,
        crate::inbound::http::relations::show_relation_heading,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(DocumentSchema, ErrorSchema, ErrorCodeSchema, LoginRequest)),
    tags(
        (name = "users", description = "Session login"),
        (name = "relations", description = "Relations, headings and domains"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schemas.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[rstest]
    #[case("/api/v2/login")]
    #[case("/api/v2/query_results/{query_id}")]
    #[case("/api/v2/query_results/{query_id}/heading/{column}")]
    #[case("/api/v2/domains/{domain_id}")]
    #[case("/api/v2/domains/{domain_id}/relations")]
    #[case("/api/v2/schemas/{schema_id}/relations")]
    #[case("/api/v2/relations/{id}")]
    #[case("/api/v2/relations/{id}/heading/{column}")]
    #[case("/health/ready")]
    fn openapi_registers_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");
        let RefOr::T(Schema::Object(object)) = error_schema else {
            panic!("expected Object schema");
        };
        for field in ["code", "message", "traceId", "details"] {
            assert!(object.properties.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn openapi_declares_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
