//! ConsistencyToken and read consistency requirements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// An opaque token naming a revision of the relationship data.
///
/// Tokens are issued with every revision-carrying response and replayed by
/// clients to ask for reads "at least as fresh as" that revision. The text is
/// base64 of a versioned envelope; use [`token::decode_revision`] to get the
/// revision back and never inspect the text directly.
///
/// Tokens have no backend affinity: any datastore instance extracts the same
/// revision from the same token.
///
/// ## Serialization
///
/// ```rust
/// use inferadb_tuple::token;
/// use inferadb_tuple::types::{ConsistencyToken, Revision};
///
/// let token = token::new_from_revision(&Revision::from(42_i64));
///
/// let serialized = token.to_string();
/// let parsed: ConsistencyToken = serialized.parse().unwrap();
/// assert_eq!(token, parsed);
/// ```
///
/// [`token::decode_revision`]: crate::token::decode_revision
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsistencyToken {
    /// The opaque token value.
    #[serde(rename = "token")]
    value: String,
}

impl ConsistencyToken {
    /// Creates a token from its opaque text, e.g. as received from a client.
    ///
    /// The text is not checked here; decoding reports malformed tokens.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the raw token value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the token and returns the inner value.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }

    /// Returns `true` if the token value is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for ConsistencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for ConsistencyToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::invalid_argument("consistency token cannot be empty"));
        }
        Ok(ConsistencyToken::new(s))
    }
}

impl From<String> for ConsistencyToken {
    fn from(value: String) -> Self {
        ConsistencyToken::new(value)
    }
}

impl From<&str> for ConsistencyToken {
    fn from(value: &str) -> Self {
        ConsistencyToken::new(value)
    }
}

impl AsRef<str> for ConsistencyToken {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// How fresh the data backing a read must be.
///
/// Resolved to a concrete revision by
/// [`datastore::resolve_revision`](crate::datastore::resolve_revision).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConsistencyRequirement {
    /// Any recent revision within the datastore's fuzzing window (fastest).
    #[default]
    MinimizeLatency,

    /// At least as fresh as the revision in the token.
    AtLeastAsFresh(ConsistencyToken),

    /// Exactly the revision in the token.
    AtExactSnapshot(ConsistencyToken),

    /// The datastore's head revision.
    FullyConsistent,
}

impl ConsistencyRequirement {
    /// Returns the token carried by this requirement, if any.
    pub fn token(&self) -> Option<&ConsistencyToken> {
        match self {
            ConsistencyRequirement::AtLeastAsFresh(token)
            | ConsistencyRequirement::AtExactSnapshot(token) => Some(token),
            ConsistencyRequirement::MinimizeLatency | ConsistencyRequirement::FullyConsistent => {
                None
            },
        }
    }

    /// Returns `true` if this is `MinimizeLatency`.
    pub fn is_minimize_latency(&self) -> bool {
        matches!(self, ConsistencyRequirement::MinimizeLatency)
    }

    /// Returns `true` if this requires the head revision.
    pub fn is_fully_consistent(&self) -> bool {
        matches!(self, ConsistencyRequirement::FullyConsistent)
    }
}

impl From<ConsistencyToken> for ConsistencyRequirement {
    fn from(token: ConsistencyToken) -> Self {
        ConsistencyRequirement::AtLeastAsFresh(token)
    }
}
