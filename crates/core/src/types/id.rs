//! Store-assigned user identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    /// The input string is empty.
    #[error("user id cannot be empty")]
    Empty,
    /// The input is not a base-10 integer.
    #[error("user id must be an integer (got {0:?})")]
    NotAnInteger(String),
}

/// Identifier of a user record, assigned by the remote store.
///
/// The store may transmit ids as JSON numbers or numeric strings; this type
/// is always the parsed integer.
///
/// ```
/// use roster_core::UserId;
///
/// let id: UserId = "42".parse().unwrap();
/// assert_eq!(id.as_i64(), 42);
/// assert!("abc".parse::<UserId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(UserIdError::Empty);
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| UserIdError::NotAnInteger(s.to_string()))
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}
