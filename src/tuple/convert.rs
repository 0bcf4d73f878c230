//! Conversion between tuples and v1 relationships.
//!
//! Every conversion validates its input and returns a [`ValidationError`]
//! instead of emitting a malformed value. None of them panic.

use super::{ObjectAndRelation, RelationTuple, RelationTupleUpdate};
use crate::error::ValidationError;
use crate::types::{
    ObjectReference, RelationFilter, Relationship, RelationshipFilter, RelationshipUpdate,
    SubjectFilter, SubjectReference,
};

fn optional_relation(subject: &ObjectAndRelation) -> Option<String> {
    (!subject.is_ellipsis()).then(|| subject.relation.clone())
}

/// Converts a tuple into a v1 relationship.
///
/// A wildcard subject relation becomes an absent `optional_relation`.
///
/// ```rust
/// use inferadb_tuple::tuple;
///
/// let t = tuple::parse("document:readme#viewer@user:alice").unwrap();
/// let rel = tuple::to_relationship(&t).unwrap();
/// assert_eq!(rel.subject.optional_relation, None);
/// assert_eq!(tuple::from_relationship(&rel).unwrap(), t);
/// ```
pub fn to_relationship(tuple: &RelationTuple) -> Result<Relationship, ValidationError> {
    tuple.validate()?;

    let resource = &tuple.resource_and_relation;
    let subject = &tuple.subject;
    Ok(Relationship {
        resource: ObjectReference::new(&resource.namespace, &resource.object_id),
        relation: resource.relation.clone(),
        subject: SubjectReference {
            object: ObjectReference::new(&subject.namespace, &subject.object_id),
            optional_relation: optional_relation(subject),
        },
    })
}

/// Converts a v1 relationship into a tuple.
///
/// An absent `optional_relation` becomes the wildcard subject relation.
pub fn from_relationship(relationship: &Relationship) -> Result<RelationTuple, ValidationError> {
    relationship.validate()?;

    let resource = &relationship.resource;
    let subject = &relationship.subject;
    Ok(RelationTuple::new(
        ObjectAndRelation::new(
            &resource.object_type,
            &resource.object_id,
            &relationship.relation,
        ),
        ObjectAndRelation::new(
            &subject.object.object_type,
            &subject.object.object_id,
            subject.relation_or_ellipsis(),
        ),
    ))
}

/// Converts a tuple update into a v1 relationship update.
pub fn update_to_relationship_update(
    update: &RelationTupleUpdate,
) -> Result<RelationshipUpdate, ValidationError> {
    Ok(RelationshipUpdate::new(
        update.operation.into(),
        to_relationship(&update.tuple)?,
    ))
}

/// Converts a v1 relationship update into a tuple update.
pub fn update_from_relationship_update(
    update: &RelationshipUpdate,
) -> Result<RelationTupleUpdate, ValidationError> {
    Ok(RelationTupleUpdate::new(
        update.operation.into(),
        from_relationship(&update.relationship)?,
    ))
}

/// Projects a tuple into a filter that matches exactly that tuple.
///
/// ```rust
/// use inferadb_tuple::tuple;
///
/// let t = tuple::parse("document:readme#viewer@user:alice").unwrap();
/// let filter = tuple::to_filter(&t).unwrap();
/// assert!(filter.matches(&t));
/// assert!(!filter.matches(&tuple::parse("document:readme#viewer@user:bob").unwrap()));
/// ```
pub fn to_filter(tuple: &RelationTuple) -> Result<RelationshipFilter, ValidationError> {
    tuple.validate()?;

    let resource = &tuple.resource_and_relation;
    let subject = &tuple.subject;
    Ok(RelationshipFilter {
        resource_type: resource.namespace.clone(),
        optional_resource_id: Some(resource.object_id.clone()),
        optional_relation: Some(resource.relation.clone()),
        optional_subject_filter: Some(SubjectFilter {
            subject_type: subject.namespace.clone(),
            optional_subject_id: Some(subject.object_id.clone()),
            optional_relation: Some(RelationFilter {
                relation: optional_relation(subject),
            }),
        }),
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::tuple::{ELLIPSIS, Operation, create, delete, parse, touch};
    use crate::types::RelationshipOperation;

    #[test]
    fn test_to_relationship_maps_fields() {
        let t = parse("acme/document:a/1#viewer@team:eng#member").unwrap();
        let rel = to_relationship(&t).unwrap();
        assert_eq!(rel.resource, ObjectReference::new("acme/document", "a/1"));
        assert_eq!(rel.relation, "viewer");
        assert_eq!(rel.subject.object, ObjectReference::new("team", "eng"));
        assert_eq!(rel.subject.optional_relation.as_deref(), Some("member"));
    }

    #[test]
    fn test_to_relationship_wildcard_is_absent() {
        let t = parse("document:1#viewer@user:alice#...").unwrap();
        let rel = to_relationship(&t).unwrap();
        assert_eq!(rel.subject.optional_relation, None);
    }

    #[test]
    fn test_from_relationship_absent_is_wildcard() {
        let rel = Relationship::new(
            ObjectReference::new("document", "1"),
            "viewer",
            SubjectReference::new(ObjectReference::new("user", "alice")),
        );
        let t = from_relationship(&rel).unwrap();
        assert_eq!(t.subject.relation, ELLIPSIS);
    }

    #[test]
    fn test_to_relationship_rejects_invalid_tuple() {
        let t = RelationTuple::new(
            ObjectAndRelation::new("document", "1", "viewer"),
            ObjectAndRelation::new("User", "alice", ELLIPSIS),
        );
        assert_eq!(
            to_relationship(&t),
            Err(ValidationError::InvalidNamespace("User".into()))
        );
    }

    #[test]
    fn test_from_relationship_rejects_explicit_wildcard() {
        let rel = Relationship::new(
            ObjectReference::new("document", "1"),
            "viewer",
            SubjectReference::with_relation(ObjectReference::new("user", "alice"), ELLIPSIS),
        );
        assert_eq!(
            from_relationship(&rel),
            Err(ValidationError::InvalidSubjectRelation(ELLIPSIS.into()))
        );
    }

    #[test_case("document:1#viewer@user:alice" ; "direct subject")]
    #[test_case("folder:reports#viewer@team:eng#member" ; "subject set")]
    #[test_case("acme/doc:x-y/z#owner@acme/user:_1" ; "tenant prefixed")]
    fn test_round_trip(text: &str) {
        let t = parse(text).unwrap();
        let rel = to_relationship(&t).unwrap();
        assert_eq!(from_relationship(&rel).unwrap(), t);
        assert_eq!(to_relationship(&from_relationship(&rel).unwrap()).unwrap(), rel);
    }

    #[test_case(Operation::Create, RelationshipOperation::Create ; "create")]
    #[test_case(Operation::Touch, RelationshipOperation::Touch ; "touch")]
    #[test_case(Operation::Delete, RelationshipOperation::Delete ; "delete")]
    fn test_operation_bijection(op: Operation, expected: RelationshipOperation) {
        let t = parse("document:1#viewer@user:alice").unwrap();
        let update = RelationTupleUpdate::new(op, t);

        let rel_update = update_to_relationship_update(&update).unwrap();
        assert_eq!(rel_update.operation, expected);

        let back = update_from_relationship_update(&rel_update).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn test_update_helpers_convert() {
        let t = parse("document:1#viewer@user:alice").unwrap();
        for update in [create(t.clone()), touch(t.clone()), delete(t)] {
            let converted = update_to_relationship_update(&update).unwrap();
            assert_eq!(Operation::from(converted.operation), update.operation);
        }
    }

    #[test]
    fn test_update_from_relationship_update_rejects_invalid_relationship() {
        let update = RelationshipUpdate::new(
            RelationshipOperation::Touch,
            Relationship::new(
                ObjectReference::new("document", "1"),
                "viewer",
                SubjectReference::new(ObjectReference::new("user", "")),
            ),
        );
        assert_eq!(
            update_from_relationship_update(&update),
            Err(ValidationError::InvalidObjectId(String::new()))
        );
    }

    #[test]
    fn test_to_filter_direct_subject() {
        let t = parse("document:1#viewer@user:alice").unwrap();
        let filter = to_filter(&t).unwrap();
        assert_eq!(filter.resource_type, "document");
        assert_eq!(filter.optional_resource_id.as_deref(), Some("1"));
        assert_eq!(filter.optional_relation.as_deref(), Some("viewer"));

        let subject = filter.optional_subject_filter.as_ref().unwrap();
        assert_eq!(subject.subject_type, "user");
        assert_eq!(subject.optional_subject_id.as_deref(), Some("alice"));
        assert_eq!(subject.optional_relation, Some(RelationFilter::ellipsis()));

        assert!(filter.matches(&t));
        assert!(!filter.matches(&parse("document:1#viewer@user:alice#member").unwrap()));
    }

    #[test]
    fn test_to_filter_subject_set() {
        let t = parse("document:1#viewer@team:eng#member").unwrap();
        let filter = to_filter(&t).unwrap();
        assert!(filter.matches(&t));
        assert!(!filter.matches(&parse("document:1#viewer@team:eng").unwrap()));
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_to_filter_rejects_invalid_tuple() {
        let t = RelationTuple::new(
            ObjectAndRelation::new("document", "1", ELLIPSIS),
            ObjectAndRelation::subject("user", "alice"),
        );
        assert!(to_filter(&t).is_err());
    }
}
