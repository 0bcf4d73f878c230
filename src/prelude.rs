//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy importing:
//!
//! ```rust
//! use inferadb_tuple::prelude::*;
//! ```
//!
//! This provides access to:
//! - The `tuple` and `token` modules
//! - Tuple and relationship types
//! - Datastore types
//! - Error types

pub use crate::{
    config::DatastoreConfig,
    datastore::{Datastore, InMemoryDatastore, RevisionChanges, resolve_revision},
    error::{Error, ErrorKind, Result, TokenError, ValidationError},
    token::{self, DecodedToken},
    tuple::{self, ObjectAndRelation, Operation, RelationTuple, RelationTupleUpdate},
    types::{
        ConsistencyRequirement, ConsistencyToken, ObjectReference, RelationFilter, Relationship,
        RelationshipFilter, RelationshipOperation, RelationshipUpdate, Revision, SubjectFilter,
        SubjectReference,
    },
};
