//! External-facing value types.
//!
//! - [`Relationship`]: the v1 API form of a relation tuple
//! - [`RelationshipFilter`]: subset-match filter for reads and deletes
//! - [`Revision`]: arbitrary-precision logical timestamp
//! - [`ConsistencyToken`]: opaque revision carrier replayed by clients

mod consistency;
mod filter;
mod relationship;
mod revision;

pub use consistency::{ConsistencyRequirement, ConsistencyToken};
pub use filter::{RelationFilter, RelationshipFilter, SubjectFilter};
pub use relationship::{
    ObjectReference, Relationship, RelationshipOperation, RelationshipUpdate, SubjectReference,
};
pub use revision::Revision;
