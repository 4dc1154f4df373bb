//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only depend on domain ports,
//! so they can be exercised against mocks without any catalogue.

use std::sync::Arc;

use crate::domain::RelationRenderer;
use crate::domain::ports::{LoginService, RelationsQuery, UserDirectory};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserDirectory>,
    pub relations: Arc<dyn RelationsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserDirectory>,
    pub relations: Arc<dyn RelationsQuery>,
    pub renderer: RelationRenderer,
}

impl HttpState {
    /// Construct state from ports and the document renderer.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use sqlegalize::domain::{LinkBuilder, RelationRenderer, RelationResolver};
    /// use sqlegalize::inbound::http::state::{HttpState, HttpStatePorts};
    /// use sqlegalize::outbound::catalogue::demo_catalogue;
    ///
    /// let catalogue = Arc::new(demo_catalogue().expect("demo catalogue"));
    /// let policy = Arc::new(catalogue.policy().clone());
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         login: catalogue.clone(),
    ///         users: catalogue.clone(),
    ///         relations: Arc::new(RelationResolver::new(catalogue, policy)),
    ///     },
    ///     RelationRenderer::new(
    ///         LinkBuilder::parse("http://localhost:8080/api/v2").expect("base url"),
    ///     ),
    /// );
    /// let _relations = state.relations.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, renderer: RelationRenderer) -> Self {
        let HttpStatePorts {
            login,
            users,
            relations,
        } = ports;
        Self {
            login,
            users,
            relations,
            renderer,
        }
    }
}
