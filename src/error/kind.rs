//! Error kind enumeration for categorizing datastore errors.

/// Categorization of crate errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// different handling strategies for different failure modes.
///
/// ## Retriable vs Non-Retriable
///
/// | ErrorKind            | Retriable | Action                              |
/// |----------------------|-----------|-------------------------------------|
/// | `Unavailable`        | Yes       | Retry with backoff                  |
/// | `InvalidArgument`    | No        | Fix input                           |
/// | `InvalidToken`       | No        | Request a fresh consistency token   |
/// | `InvalidRevision`    | No        | Read at a newer revision            |
/// | `Conflict`           | No*       | Use `TOUCH` or delete first         |
/// | `FailedPrecondition` | No*       | Re-read and resubmit                |
/// | `Configuration`      | No        | Fix the configuration               |
/// | `Internal`           | No        | Report a bug                        |
///
/// *May succeed after the conflicting state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Input does not satisfy the tuple grammar or a request is malformed.
    ///
    /// gRPC: INVALID_ARGUMENT
    #[error("invalid argument")]
    InvalidArgument,

    /// A consistency token could not be decoded.
    ///
    /// Covers a missing token, non-base64 text, an undecodable envelope and an
    /// envelope carrying no recognised revision variant.
    ///
    /// gRPC: INVALID_ARGUMENT
    #[error("invalid consistency token")]
    InvalidToken,

    /// The revision cannot be served by the datastore.
    ///
    /// Either newer than the head revision or older than the garbage
    /// collection window.
    ///
    /// gRPC: OUT_OF_RANGE
    #[error("invalid revision")]
    InvalidRevision,

    /// A `CREATE` targeted a tuple that already exists.
    ///
    /// gRPC: ALREADY_EXISTS
    #[error("conflict")]
    Conflict,

    /// A write precondition did not hold at the head revision.
    ///
    /// gRPC: FAILED_PRECONDITION
    #[error("failed precondition")]
    FailedPrecondition,

    /// The datastore cannot currently serve the request.
    ///
    /// Also raised when a watcher falls too far behind the change buffer.
    ///
    /// gRPC: UNAVAILABLE
    ///
    /// **Retriable.**
    #[error("unavailable")]
    Unavailable,

    /// Invalid datastore configuration.
    #[error("configuration error")]
    Configuration,

    /// Internal invariant broken.
    ///
    /// Indicates a bug in this crate or in a backend, never bad input.
    #[error("internal error")]
    Internal,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inferadb_tuple::ErrorKind;
    ///
    /// assert!(ErrorKind::Unavailable.is_retriable());
    /// assert!(!ErrorKind::InvalidToken.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(self, ErrorKind::Unavailable)
    }

    /// Returns `true` if the error was caused by client input.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidArgument
                | ErrorKind::InvalidToken
                | ErrorKind::InvalidRevision
                | ErrorKind::Conflict
                | ErrorKind::FailedPrecondition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable() {
        assert!(ErrorKind::Unavailable.is_retriable());
        assert!(!ErrorKind::InvalidArgument.is_retriable());
        assert!(!ErrorKind::Conflict.is_retriable());
        assert!(!ErrorKind::Internal.is_retriable());
    }

    #[test]
    fn test_client_error() {
        assert!(ErrorKind::InvalidToken.is_client_error());
        assert!(ErrorKind::FailedPrecondition.is_client_error());
        assert!(!ErrorKind::Internal.is_client_error());
        assert!(!ErrorKind::Configuration.is_client_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::InvalidRevision.to_string(), "invalid revision");
        assert_eq!(ErrorKind::Conflict.to_string(), "conflict");
    }
}
