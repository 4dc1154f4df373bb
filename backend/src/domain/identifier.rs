//! Validation of externally supplied resource identifiers.
//!
//! Every lookup starts here: a [`RawIdentifier`] is whatever the caller
//! sent (a path segment or a JSON value) and [`ScalarId::parse`] is the only
//! way to turn it into a key the catalogue understands. Composite values are
//! rejected outright, whatever they contain.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use super::Error;
use super::error::messages;

/// Maximum accepted identifier length in characters.
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Identifier exactly as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub enum RawIdentifier {
    /// A textual value.
    Text(String),
    /// An integral value.
    Integer(i64),
    /// Several values supplied where one was expected.
    Sequence(Vec<RawIdentifier>),
    /// Anything else: null, booleans, floats, objects.
    Other,
}

impl RawIdentifier {
    /// Interpret a decoded URL path segment.
    ///
    /// JSON arrays (`[1,2,"x"]`) and comma-separated lists (`1,2,x`) become
    /// [`RawIdentifier::Sequence`]; everything else is text.
    ///
    /// # Examples
    /// ```
    /// use sqlegalize::domain::RawIdentifier;
    ///
    /// assert!(matches!(
    ///     RawIdentifier::from_path_segment("1,2,not_an_id"),
    ///     RawIdentifier::Sequence(_)
    /// ));
    /// assert_eq!(
    ///     RawIdentifier::from_path_segment("BOOKINGS_OND"),
    ///     RawIdentifier::Text("BOOKINGS_OND".to_owned())
    /// );
    /// ```
    pub fn from_path_segment(segment: &str) -> Self {
        if segment.trim_start().starts_with('[')
            && let Ok(value) = serde_json::from_str::<Value>(segment)
        {
            return Self::from(value);
        }
        if segment.contains(',') {
            return Self::Sequence(
                segment
                    .split(',')
                    .map(|part| Self::Text(part.to_owned()))
                    .collect(),
            );
        }
        Self::Text(segment.to_owned())
    }
}

impl From<Value> for RawIdentifier {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Number(number) => number.as_i64().map_or(Self::Other, Self::Integer),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Null | Value::Bool(_) | Value::Object(_) => Self::Other,
        }
    }
}

impl From<&str> for RawIdentifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawIdentifier {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawIdentifier {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<'de> Deserialize<'de> for RawIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Reasons an identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// Several values were supplied.
    #[error("identifier must be a single value")]
    Composite,
    /// The value is neither text nor an integer.
    #[error("identifier must be a string or an integer")]
    NotScalar,
    /// The value is empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The value exceeds [`MAX_IDENTIFIER_LEN`].
    #[error("identifier must be at most {max} characters")]
    TooLong { max: usize },
    /// The value contains a character outside `[A-Za-z0-9_.-]`.
    #[error("identifier contains invalid character {character:?}")]
    InvalidCharacter { character: char },
}

impl IdentifierError {
    /// Machine-readable code reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Composite => "composite_identifier",
            Self::NotScalar => "non_scalar_identifier",
            Self::Empty => "empty_identifier",
            Self::TooLong { .. } => "identifier_too_long",
            Self::InvalidCharacter { .. } => "invalid_identifier_character",
        }
    }

    /// Convert into the client-facing `invalid parameters` error for `field`.
    pub fn into_error(self, field: &str) -> Error {
        Error::invalid_request(messages::INVALID_PARAMETERS).with_details(json!({
            "field": field,
            "code": self.code(),
            "reason": self.to_string(),
        }))
    }
}

fn is_identifier_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '_' | '-' | '.')
}

/// A validated single-valued identifier.
///
/// ## Invariants
/// - 1 to [`MAX_IDENTIFIER_LEN`] characters from `[A-Za-z0-9_.-]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScalarId(String);

impl ScalarId {
    /// Validate a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use sqlegalize::domain::{IdentifierError, RawIdentifier, ScalarId};
    ///
    /// assert_eq!(ScalarId::parse(42.into()).expect("integer").as_str(), "42");
    /// let composite = RawIdentifier::from_path_segment("[1,2,\"not_an_id\"]");
    /// assert_eq!(ScalarId::parse(composite), Err(IdentifierError::Composite));
    /// ```
    pub fn parse(raw: RawIdentifier) -> Result<Self, IdentifierError> {
        let text = match raw {
            RawIdentifier::Text(text) => text,
            RawIdentifier::Integer(value) => value.to_string(),
            RawIdentifier::Sequence(_) => return Err(IdentifierError::Composite),
            RawIdentifier::Other => return Err(IdentifierError::NotScalar),
        };
        if text.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if text.chars().count() > MAX_IDENTIFIER_LEN {
            return Err(IdentifierError::TooLong {
                max: MAX_IDENTIFIER_LEN,
            });
        }
        if let Some(character) = text.chars().find(|c| !is_identifier_char(*c)) {
            return Err(IdentifierError::InvalidCharacter { character });
        }
        Ok(Self(text))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ScalarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declare a typed identifier backed by [`ScalarId`].
macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(ScalarId);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(raw: impl Into<RawIdentifier>) -> Result<Self, IdentifierError> {
                ScalarId::parse(raw.into()).map(Self)
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<ScalarId> for $name {
            fn from(value: ScalarId) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.0
            }
        }
    };
}

resource_id! {
    /// Identifier of a stored query.
    QueryId
}

resource_id! {
    /// Identifier of a persisted table.
    TableId
}

resource_id! {
    /// Identifier of a schema.
    SchemaId
}

resource_id! {
    /// Identifier of a column domain.
    DomainId
}

resource_id! {
    /// Name of a heading column.
    ColumnName
}
