//! Service entry-point: loads settings and the catalogue, then serves
//! `/api/v2`, health probes and OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use sqlegalize::domain::{LinkBuilder, RelationRenderer, RelationResolver};
use sqlegalize::inbound::http::health::HealthState;
use sqlegalize::inbound::http::session_config::{BuildMode, session_settings_from_env};
use sqlegalize::inbound::http::state::{HttpState, HttpStatePorts};
use sqlegalize::outbound::catalogue::{CatalogueSeed, InMemoryCatalogue, demo_catalogue};
use sqlegalize::settings::ServiceSettings;

use server::{ServerConfig, create_server};

fn load_catalogue(settings: &ServiceSettings) -> std::io::Result<InMemoryCatalogue> {
    let catalogue = match settings.catalogue_path() {
        Some(path) => {
            info!(path = %path.display(), "loading catalogue");
            CatalogueSeed::from_file(path).map(InMemoryCatalogue::new)
        }
        None => {
            warn!("no catalogue configured; serving the demo catalogue");
            demo_catalogue()
        }
    };
    catalogue.map_err(|err| std::io::Error::other(format!("catalogue rejected: {err}")))
}

fn build_http_state(
    catalogue: InMemoryCatalogue,
    settings: &ServiceSettings,
) -> std::io::Result<HttpState> {
    let links = LinkBuilder::parse(settings.public_url()).map_err(std::io::Error::other)?;
    let catalogue = Arc::new(catalogue);
    let policy = Arc::new(catalogue.policy().clone());
    Ok(HttpState::new(
        HttpStatePorts {
            login: catalogue.clone(),
            users: catalogue.clone(),
            relations: Arc::new(RelationResolver::new(catalogue, policy)),
        },
        RelationRenderer::new(links),
    ))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load()
        .map_err(|err| std::io::Error::other(format!("invalid settings: {err}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let http_state = build_http_state(load_catalogue(&settings)?, &settings)?;

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = settings.bind_addr();
    let server = create_server(
        health_state,
        ServerConfig::new(session, bind_addr, http_state),
    )?;
    info!(%bind_addr, public_url = settings.public_url(), "listening");
    server.await
}
