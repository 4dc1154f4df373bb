//! Request validation helpers shared by HTTP handlers.
//!
//! Failures become `invalid_request` domain errors whose `details` name the
//! offending field and a machine code, matching the identifier errors the
//! resolver produces.

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use serde_json::json;

use crate::domain::{Error, LoginValidationError, messages};

/// Validation error codes for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    EmptyUsername,
    EmptyPassword,
    MalformedBody,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
            Self::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for request field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const USERNAME: Self = Self("username");
    pub(crate) const PASSWORD: Self = Self("password");
    pub(crate) const BODY: Self = Self("body");

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(message: impl Into<String>, field: FieldName, code: ValidationCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// Map login payload validation failures onto client errors.
pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => field_error(
            err.to_string(),
            FieldName::USERNAME,
            ValidationCode::EmptyUsername,
        ),
        LoginValidationError::EmptyPassword => field_error(
            err.to_string(),
            FieldName::PASSWORD,
            ValidationCode::EmptyPassword,
        ),
    }
}

/// `JsonConfig` error handler producing the standard error payload.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(messages::INVALID_PARAMETERS)
        .with_details(json!({
            "field": FieldName::BODY.as_str(),
            "code": ValidationCode::MalformedBody.as_str(),
            "reason": err.to_string(),
        }))
        .into()
}
