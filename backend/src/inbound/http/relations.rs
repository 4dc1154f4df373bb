//! Relation, heading and domain endpoints.
//!
//! Every route requires a session. Path segments are handed to the
//! [`RelationsQuery`](crate::domain::ports::RelationsQuery) port untouched
//! apart from percent-decoding, so identifier validation happens in one
//! place. Successful responses are JSON:API documents rendered by
//! [`RelationRenderer`](crate::domain::RelationRenderer).
//!
//! ```text
//! GET /api/v2/query_results/q1
//! GET /api/v2/relations/BOOKINGS_OND/heading/BOARD_CITY
//! GET /api/v2/schemas/MARKET/relations
//! ```

use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::{debug, warn};

use crate::domain::{Document, Error, MEDIA_TYPE, RawIdentifier, Viewer, messages};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{DocumentSchema, ErrorSchema};
use crate::inbound::http::session::{LOGIN_REQUIRED, SessionContext};
use crate::inbound::http::state::HttpState;

/// Resolve the session into a viewer, dropping sessions of unknown users.
async fn current_viewer(state: &HttpState, session: &SessionContext) -> Result<Viewer, Error> {
    let user_id = session.require_user_id()?;
    match state.users.find_viewer(&user_id).await? {
        Some(viewer) => Ok(viewer),
        None => {
            warn!(user_id = %user_id, "session refers to unknown user");
            session.clear();
            Err(Error::unauthorized(LOGIN_REQUIRED))
        }
    }
}

fn document_response(document: &Document) -> ApiResult<HttpResponse> {
    let body = serde_json::to_vec(document)
        .map_err(|err| Error::internal(format!("failed to serialise document: {err}")))?;
    Ok(HttpResponse::Ok()
        .content_type(MEDIA_TYPE)
        .insert_header(private_no_cache_header())
        .body(body))
}

fn raw(segment: &str) -> RawIdentifier {
    RawIdentifier::from_path_segment(segment)
}

/// Result relation of a finished query.
#[utoipa::path(
    get,
    path = "/api/v2/query_results/{query_id}",
    params(("query_id" = String, Path, description = "Query identifier")),
    responses(
        (status = 200, description = "Query result relation", body = DocumentSchema, content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown query", body = ErrorSchema),
        (status = 409, description = "Query not finished", body = ErrorSchema),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "showQueryResult",
    security(("SessionCookie" = []))
)]
#[get("/query_results/{query_id}")]
pub async fn show_by_query(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let resolved = state
        .relations
        .query_result(&viewer, raw(&path.into_inner()))
        .await?;
    document_response(&state.renderer.render_relation(&resolved))
}

/// One heading column of a query result.
#[utoipa::path(
    get,
    path = "/api/v2/query_results/{query_id}/heading/{column}",
    params(
        ("query_id" = String, Path, description = "Query identifier"),
        ("column" = String, Path, description = "Column name")
    ),
    responses(
        (status = 200, description = "Heading column", body = DocumentSchema, content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown query or column", body = ErrorSchema),
        (status = 409, description = "Query not finished", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "showQueryResultHeading",
    security(("SessionCookie" = []))
)]
#[get("/query_results/{query_id}/heading/{column}")]
pub async fn show_query_result_heading(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let (query_id, column) = path.into_inner();
    let resolved = state
        .relations
        .query_result_column(&viewer, raw(&query_id), raw(&column))
        .await?;
    document_response(&state.renderer.render_column(&resolved))
}

/// Visible tables whose heading references a domain.
#[utoipa::path(
    get,
    path = "/api/v2/domains/{domain_id}/relations",
    params(("domain_id" = String, Path, description = "Domain identifier")),
    responses(
        (status = 200, description = "Relations referencing the domain", body = DocumentSchema, content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown domain", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "listDomainRelations",
    security(("SessionCookie" = []))
)]
#[get("/domains/{domain_id}/relations")]
pub async fn index_by_domain(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let listing = state
        .relations
        .relations_by_domain(&viewer, raw(&path.into_inner()))
        .await?;
    document_response(&state.renderer.render_listing(&listing))
}

/// A single domain.
#[utoipa::path(
    get,
    path = "/api/v2/domains/{domain_id}",
    params(("domain_id" = String, Path, description = "Domain identifier")),
    responses(
        (status = 200, description = "Domain", body = DocumentSchema, content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown domain", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "showDomain",
    security(("SessionCookie" = []))
)]
#[get("/domains/{domain_id}")]
pub async fn show_domain(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let domain = state
        .relations
        .domain(&viewer, raw(&path.into_inner()))
        .await?;
    document_response(&state.renderer.render_domain(&domain))
}

/// Tables owned by a schema the viewer may see.
#[utoipa::path(
    get,
    path = "/api/v2/schemas/{schema_id}/relations",
    params(("schema_id" = String, Path, description = "Schema identifier")),
    responses(
        (status = 200, description = "Relations owned by the schema", body = DocumentSchema, content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown or hidden schema", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "listSchemaRelations",
    security(("SessionCookie" = []))
)]
#[get("/schemas/{schema_id}/relations")]
pub async fn index_by_schema(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let listing = state
        .relations
        .relations_by_schema(&viewer, raw(&path.into_inner()))
        .await?;
    document_response(&state.renderer.render_listing(&listing))
}

/// A single table relation.
#[utoipa::path(
    get,
    path = "/api/v2/relations/{id}",
    params(("id" = String, Path, description = "Table identifier")),
    responses(
        (status = 200, description = "Table relation", body = DocumentSchema, content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown or hidden table", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "showRelation",
    security(("SessionCookie" = []))
)]
#[get("/relations/{id}")]
pub async fn show(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let resolved = state
        .relations
        .table(&viewer, raw(&path.into_inner()))
        .await?;
    document_response(&state.renderer.render_relation(&resolved))
}

/// One heading column of a table relation.
#[utoipa::path(
    get,
    path = "/api/v2/relations/{id}/heading/{column}",
    params(
        ("id" = String, Path, description = "Table identifier"),
        ("column" = String, Path, description = "Column name")
    ),
    responses(
        (status = 200, description = "Heading column", body = DocumentSchema, content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown table or column", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "showRelationHeading",
    security(("SessionCookie" = []))
)]
#[get("/relations/{id}/heading/{column}")]
pub async fn show_relation_heading(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let (id, column) = path.into_inner();
    let resolved = state
        .relations
        .table_column(&viewer, raw(&id), raw(&column))
        .await?;
    document_response(&state.renderer.render_column(&resolved))
}

/// Fallback for paths below the API root that no handler serves.
///
/// Covers the linked `body` sub-resources, whose rows are not exposed here.
/// Anonymous callers still get 401 so unknown paths reveal nothing.
pub async fn unknown_resource(
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    debug!(path = req.path(), "no resource at path");
    Err(Error::not_found(messages::NOT_FOUND))
}

/// Register the relation routes and the not-found fallback.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show_by_query)
        .service(show_query_result_heading)
        .service(index_by_domain)
        .service(show_domain)
        .service(index_by_schema)
        .service(show)
        .service(show_relation_heading)
        .default_service(web::to(unknown_resource));
}

#[cfg(test)]
#[path = "relations_tests.rs"]
mod tests;
