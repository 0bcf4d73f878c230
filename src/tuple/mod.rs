//! Relation tuples and their canonical text form.
//!
//! A relation tuple states that a subject holds a relation on a resource:
//!
//! ```text
//! document:readme#viewer@user:alice
//! └─namespace─┘└id┘└rel┘ └subject─┘
//! ```
//!
//! - [`parse`] and [`format`]: the canonical `resource#relation@subject` text
//! - [`ObjectAndRelation`], [`RelationTuple`], [`RelationTupleUpdate`]: the model
//! - [`to_relationship`] and friends: conversion to the external
//!   [`Relationship`](crate::types::Relationship) form
//!
//! ## Wildcard Subjects
//!
//! A subject without a relation refers to the object itself. It is stored
//! with the [`ELLIPSIS`] relation and formatted without a relation segment:
//!
//! ```rust
//! use inferadb_tuple::tuple::{self, ELLIPSIS};
//!
//! let t = tuple::parse("document:123#viewer@user:456#...").unwrap();
//! assert_eq!(t.subject.relation, ELLIPSIS);
//! assert_eq!(tuple::format(&t), "document:123#viewer@user:456");
//! ```

mod convert;
mod grammar;
mod model;
mod update;

pub use convert::{
    from_relationship, to_filter, to_relationship, update_from_relationship_update,
    update_to_relationship_update,
};
pub use grammar::{
    ELLIPSIS, is_valid_namespace, is_valid_object_id, is_valid_relation,
    is_valid_subject_relation,
};
pub use model::{ObjectAndRelation, RelationTuple};
pub use update::{Operation, RelationTupleUpdate, create, delete, touch};

use grammar::{ONR_REGEX, SUBJECT_REGEX, TUPLE_REGEX};

/// Parses the canonical `resource#relation@subject[#relation]` form.
///
/// Returns `None` for anything that is not a complete, grammar-valid tuple.
/// There is no partial result.
///
/// ```rust
/// use inferadb_tuple::tuple;
///
/// assert!(tuple::parse("document:readme#viewer@user:alice").is_some());
/// assert!(tuple::parse(" document:readme#viewer@user:alice").is_none());
/// ```
pub fn parse(value: &str) -> Option<RelationTuple> {
    let caps = TUPLE_REGEX.captures(value)?;

    let subject_relation = caps
        .name("subject_rel")
        .map_or(ELLIPSIS, |m| m.as_str());

    Some(RelationTuple::new(
        ObjectAndRelation::new(
            &caps["resource_type"],
            &caps["resource_id"],
            &caps["resource_rel"],
        ),
        ObjectAndRelation::new(&caps["subject_type"], &caps["subject_id"], subject_relation),
    ))
}

/// Formats a tuple in the canonical text form.
///
/// Equivalent to `tuple.to_string()`.
pub fn format(tuple: &RelationTuple) -> String {
    tuple.to_string()
}

/// Parses a resource-side `namespace:object_id#relation`.
pub fn parse_onr(value: &str) -> Option<ObjectAndRelation> {
    let caps = ONR_REGEX.captures(value)?;
    Some(ObjectAndRelation::new(
        &caps["resource_type"],
        &caps["resource_id"],
        &caps["resource_rel"],
    ))
}

/// Parses a subject-side `namespace:object_id[#relation]`.
///
/// A missing relation parses as [`ELLIPSIS`].
pub fn parse_subject_onr(value: &str) -> Option<ObjectAndRelation> {
    let caps = SUBJECT_REGEX.captures(value)?;
    let relation = caps.name("subject_rel").map_or(ELLIPSIS, |m| m.as_str());
    Some(ObjectAndRelation::new(
        &caps["subject_type"],
        &caps["subject_id"],
        relation,
    ))
}
