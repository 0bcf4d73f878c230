//! # InferaDB Tuple
//!
//! Relation tuples, their canonical text grammar, and the consistency tokens
//! that carry datastore revisions to clients.
//!
//! ## Quick Start
//!
//! ```rust
//! use inferadb_tuple::prelude::*;
//!
//! // Parse the canonical text form
//! let t = tuple::parse("document:readme#viewer@user:alice").unwrap();
//! assert_eq!(tuple::format(&t), "document:readme#viewer@user:alice");
//!
//! // Convert to the external relationship form and back
//! let relationship = tuple::to_relationship(&t).unwrap();
//! assert_eq!(tuple::from_relationship(&relationship).unwrap(), t);
//!
//! // Round-trip a revision through a consistency token
//! let revision: Revision = "1700000000000000000".parse().unwrap();
//! let consistency_token = token::new_from_revision(&revision);
//! assert_eq!(token::decode_revision(Some(&consistency_token)).unwrap(), revision);
//! ```
//!
//! ## Key Concepts
//!
//! - **Tuple Order**: `resource#relation@subject` - "subject has relation on resource"
//! - **Wildcard**: a subject without a relation carries the `...` relation
//! - **Parse ≠ Validate**: [`tuple::parse`] returns `None` for bad text, while
//!   conversions return a [`ValidationError`] naming the bad field
//! - **Opaque Tokens**: clients only ever see a [`ConsistencyToken`], never a revision
//!
//! ## Features
//!
//! - `tracing`: Emit tracing events from datastore backends

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod error;
pub mod token;
pub mod tuple;
pub mod types;

// Storage backends
pub mod datastore;

// Backend conformance suite
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::DatastoreConfig;
pub use datastore::{Datastore, InMemoryDatastore, RevisionChanges, resolve_revision};
pub use error::{Error, ErrorKind, Result, TokenError, ValidationError};
pub use token::DecodedToken;
pub use tuple::{ObjectAndRelation, Operation, RelationTuple, RelationTupleUpdate};
pub use types::{
    ConsistencyRequirement, ConsistencyToken, Relationship, RelationshipFilter,
    RelationshipUpdate, Revision,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports_cover_the_round_trip() {
        let t: RelationTuple = tuple::parse("document:readme#viewer@user:alice").unwrap();
        let relationship: Relationship = tuple::to_relationship(&t).unwrap();
        assert_eq!(tuple::from_relationship(&relationship).unwrap(), t);

        let revision = Revision::from(7_i64);
        let minted: ConsistencyToken = token::new_from_revision(&revision);
        assert_eq!(token::decode_revision(Some(&minted)).unwrap(), revision);

        let err: Error = token::decode_revision(None).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::InvalidToken);
    }
}
