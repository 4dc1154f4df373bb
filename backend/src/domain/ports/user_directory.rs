//! Driving port mapping session user ids to viewers.

use async_trait::async_trait;

use crate::domain::{Error, UserId, Viewer};

/// Looks up the role of an authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The viewer for `user_id`, or `None` when the account no longer exists.
    async fn find_viewer(&self, user_id: &UserId) -> Result<Option<Viewer>, Error>;
}
