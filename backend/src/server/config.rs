//! HTTP server configuration object.

use std::net::SocketAddr;

use sqlegalize::inbound::http::session_config::SessionSettings;
use sqlegalize::inbound::http::state::HttpState;

/// Everything needed to start the listener.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            session,
            bind_addr,
            http_state,
        }
    }
}
