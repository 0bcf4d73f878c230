//! Error types for tuple and token handling.
//!
//! The crate provides one general error and two leaf errors:
//! - [`Error`]: datastore-level failures, categorized by [`ErrorKind`]
//! - [`ValidationError`]: a tuple or relationship field fails the grammar
//! - [`TokenError`]: a consistency token cannot be decoded
//!
//! ## Key Invariant
//!
//! Input that arrives from outside the process is always rejected with a
//! returned error. Parsing tuple text is the one exception: a string that does
//! not match the grammar is "not a tuple" and yields `None`.
//!
//! ```rust
//! use inferadb_tuple::{tuple, token, TokenError};
//!
//! assert!(tuple::parse("not-a-valid-tuple-string").is_none());
//! assert!(matches!(token::decode(None), Err(TokenError::Missing)));
//! ```

#[allow(clippy::module_inception)]
mod error;
mod kind;
mod token;
mod validation;

pub use error::Error;
pub use kind::ErrorKind;
pub use token::TokenError;
pub use validation::ValidationError;

/// A specialized `Result` type for datastore operations.
pub type Result<T> = std::result::Result<T, Error>;
