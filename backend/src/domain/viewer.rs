//! Authenticated callers and the credentials used to establish them.
//!
//! A [`Viewer`] is what the resolver sees: the user id stored in the
//! session plus the role that decides schema visibility.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors for user-facing identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerValidationError {
    /// User id was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// User id was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Role was blank.
    #[error("role must not be empty")]
    EmptyRole,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ViewerValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, ViewerValidationError> {
        if id.is_empty() {
            return Err(ViewerValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(ViewerValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| ViewerValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = ViewerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role name granting access to schemas, e.g. `market` or `hr`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    /// Validate and construct a role, trimming surrounding whitespace.
    pub fn new(role: impl AsRef<str>) -> Result<Self, ViewerValidationError> {
        let trimmed = role.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ViewerValidationError::EmptyRole);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the role name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = ViewerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.0
    }
}

/// The authenticated caller of a resolution operation.
///
/// # Examples
/// ```
/// use sqlegalize::domain::{Role, UserId, Viewer};
///
/// let viewer = Viewer::new(
///     UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id"),
///     Role::new("market").expect("role"),
/// );
/// assert_eq!(viewer.role().as_str(), "market");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    user_id: UserId,
    role: Role,
}

impl Viewer {
    /// Pair a user with its role.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Authenticated user id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Role deciding schema visibility.
    pub fn role(&self) -> &Role {
        &self.role
    }
}

/// Errors returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim; it is zeroised on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for account lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
