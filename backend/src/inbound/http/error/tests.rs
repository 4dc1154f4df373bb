//! Tests for HTTP error mapping.

use super::*;
use crate::domain::messages;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request(messages::INVALID_PARAMETERS), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found(messages::NOT_FOUND), StatusCode::NOT_FOUND)]
#[case(Error::conflict(messages::CONFLICT), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn response_payload(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace id is ASCII").to_owned());
    assert_eq!(header.as_deref(), expected_trace_id);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[case(
    Error::internal("catalogue row 3 is corrupt"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "Internal server error"
)]
#[case(
    Error::service_unavailable("connection refused on 10.0.0.4"),
    StatusCode::SERVICE_UNAVAILABLE,
    "Service temporarily unavailable"
)]
#[actix_web::test]
async fn server_errors_are_redacted(
    expected_trace_id: String,
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let error = error
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "secret": "x" }));

    let payload = response_payload(error, status, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload.message(), message);
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request(messages::INVALID_PARAMETERS)
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "query_id", "code": "composite_identifier" }));

    let payload =
        response_payload(error, StatusCode::BAD_REQUEST, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "invalid parameters");
    assert_eq!(
        payload.details(),
        Some(&json!({ "field": "query_id", "code": "composite_identifier" }))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let payload =
        response_payload(Error::conflict(messages::CONFLICT), StatusCode::CONFLICT, None).await;
    assert_eq!(payload.message(), "conflict");
    assert_eq!(payload.trace_id(), None);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
