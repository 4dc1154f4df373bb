//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod relation_catalogue;
mod relations_query;
mod user_directory;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use relation_catalogue::MockRelationCatalogue;
pub use relation_catalogue::{RelationCatalogue, RelationCatalogueError};
#[cfg(test)]
pub use relations_query::MockRelationsQuery;
pub use relations_query::{
    ListingOwner, RelationListing, RelationsQuery, ResolvedColumn, ResolvedRelation,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
