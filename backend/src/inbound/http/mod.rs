//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod cache_control;
pub mod error;
pub mod health;
pub mod relations;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v2` endpoint plus the JSON body error handler.
///
/// Callers mount this under the API scope, wrapped in session middleware,
/// with [`state::HttpState`] registered as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .service(users::login)
        .configure(relations::configure);
}
