//! Consistency token codec.
//!
//! Converts between [`Revision`]s and opaque [`ConsistencyToken`]s:
//!
//! ```text
//! Revision ──► DecodedToken::V1 ──► protobuf ──► base64 ──► ConsistencyToken
//! ```
//!
//! The envelope is a tagged union, so tokens minted by older releases (the
//! fixed-width [`DecodedToken::DeprecatedV1Zookie`]) still decode. Consumers
//! should only ever call [`new_from_revision`] and [`decode_revision`]:
//!
//! ```rust
//! use inferadb_tuple::token;
//! use inferadb_tuple::types::Revision;
//!
//! let revision: Revision = "1700000000123456789.0000000001".parse().unwrap();
//! let token = token::new_from_revision(&revision);
//! assert_eq!(token::decode_revision(Some(&token)).unwrap(), revision);
//! ```

mod envelope;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use prost::Message;

use envelope::DecodedZedToken;
use envelope::decoded_zed_token::{V1ZedToken, V1Zookie, VersionOneof};

use crate::error::TokenError;
use crate::types::{ConsistencyToken, Revision};

/// The decoded contents of a consistency token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedToken {
    /// Current format: the revision as decimal text.
    V1 {
        /// Decimal revision, e.g. `"1700000000123456789"`.
        revision: String,
    },

    /// Legacy fixed-width format. Never produced, only decoded.
    DeprecatedV1Zookie {
        /// Integer revision.
        revision: u64,
    },

    /// The envelope holds no variant this version recognises.
    ///
    /// Produced for tokens minted by a newer release, or by an empty envelope.
    Unknown,
}

impl From<DecodedZedToken> for DecodedToken {
    fn from(envelope: DecodedZedToken) -> Self {
        match envelope.version_oneof {
            Some(VersionOneof::V1(v1)) => DecodedToken::V1 {
                revision: v1.revision,
            },
            Some(VersionOneof::DeprecatedV1Zookie(zookie)) => DecodedToken::DeprecatedV1Zookie {
                revision: zookie.revision,
            },
            None => DecodedToken::Unknown,
        }
    }
}

impl From<&DecodedToken> for DecodedZedToken {
    fn from(decoded: &DecodedToken) -> Self {
        let version_oneof = match decoded {
            DecodedToken::V1 { revision } => Some(VersionOneof::V1(V1ZedToken {
                revision: revision.clone(),
            })),
            DecodedToken::DeprecatedV1Zookie { revision } => {
                Some(VersionOneof::DeprecatedV1Zookie(V1Zookie {
                    revision: *revision,
                }))
            },
            DecodedToken::Unknown => None,
        };
        DecodedZedToken { version_oneof }
    }
}

/// Encodes a decoded token into its opaque form.
///
/// Output is deterministic for a given input. Encoding into a `Vec` cannot
/// fail, so there is no error path.
pub fn encode(decoded: &DecodedToken) -> ConsistencyToken {
    let bytes = DecodedZedToken::from(decoded).encode_to_vec();
    ConsistencyToken::new(STANDARD.encode(bytes))
}

/// Decodes an opaque token into its envelope.
///
/// Fails with [`TokenError::Missing`] for `None`, [`TokenError::InvalidBase64`]
/// for non-base64 text and [`TokenError::InvalidEnvelope`] for bytes that
/// don't parse. Unknown fields are skipped; an unrecognised variant decodes
/// to [`DecodedToken::Unknown`].
pub fn decode(encoded: Option<&ConsistencyToken>) -> Result<DecodedToken, TokenError> {
    let encoded = encoded.ok_or(TokenError::Missing)?;
    let bytes = STANDARD.decode(encoded.value())?;
    let envelope = DecodedZedToken::decode(bytes.as_slice())?;
    Ok(envelope.into())
}

/// Mints a current-format token for `revision`.
pub fn new_from_revision(revision: &Revision) -> ConsistencyToken {
    encode(&DecodedToken::V1 {
        revision: revision.to_string(),
    })
}

/// Extracts the revision from a token of any supported version.
///
/// This is the single entry point for turning client tokens into revisions.
pub fn decode_revision(encoded: Option<&ConsistencyToken>) -> Result<Revision, TokenError> {
    match decode(encoded)? {
        DecodedToken::V1 { revision } => Ok(revision.parse::<Revision>()?),
        DecodedToken::DeprecatedV1Zookie { revision } => Ok(Revision::from(revision)),
        DecodedToken::Unknown => Err(TokenError::UnknownVersion),
    }
}
