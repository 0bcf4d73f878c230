//! Consistency token decode failures.

/// A consistency token could not be turned back into a revision.
///
/// Every variant renders with the same `error decoding consistency token`
/// prefix and keeps the underlying codec error as its source.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No token was supplied where one was required.
    #[error("error decoding consistency token: token was missing")]
    Missing,

    /// Token text is not standard base64.
    #[error("error decoding consistency token: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Token bytes do not parse as the token envelope.
    #[error("error decoding consistency token: {0}")]
    InvalidEnvelope(#[from] prost::DecodeError),

    /// A current-format token carries a revision that is not a decimal.
    #[error("error decoding consistency token: {0}")]
    InvalidRevision(#[from] bigdecimal::ParseBigDecimalError),

    /// The envelope holds no revision variant this decoder recognises.
    ///
    /// Unrecognised variants are skipped while decoding, so an empty envelope
    /// and one from a newer release look the same here.
    #[error("error decoding consistency token: empty or unrecognised version_oneof")]
    UnknownVersion,
}

impl TokenError {
    /// Returns `true` if the token was absent rather than malformed.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, TokenError::Missing)
    }
}
