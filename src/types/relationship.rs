//! Relationship types used by the v1 API surface.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tuple::{
    ELLIPSIS, Operation, is_valid_namespace, is_valid_object_id, is_valid_relation,
};

/// A typed reference to an object: `object_type:object_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectReference {
    /// The object type (a namespace, optionally tenant-prefixed).
    pub object_type: String,

    /// The object identifier.
    pub object_id: String,
}

impl ObjectReference {
    /// Creates a new object reference.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }

    /// Checks the type and id against the tuple grammar.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_namespace(&self.object_type) {
            return Err(ValidationError::InvalidNamespace(self.object_type.clone()));
        }
        if !is_valid_object_id(&self.object_id) {
            return Err(ValidationError::InvalidObjectId(self.object_id.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// The subject of a relationship: an object plus an optional relation on it.
///
/// - `optional_relation: None` refers to the object itself (`user:alice`)
/// - `optional_relation: Some("member")` is a subject set (`team:eng#member`)
///
/// The wildcard is expressed only by absence. `Some("...")` is rejected by
/// [`validate`](Self::validate), as is `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectReference {
    /// The subject object.
    pub object: ObjectReference,

    /// Relation on the subject object, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_relation: Option<String>,
}

impl SubjectReference {
    /// Creates a subject that refers to the object itself.
    pub fn new(object: ObjectReference) -> Self {
        Self {
            object,
            optional_relation: None,
        }
    }

    /// Creates a subject set: everything holding `relation` on `object`.
    pub fn with_relation(object: ObjectReference, relation: impl Into<String>) -> Self {
        Self {
            object,
            optional_relation: Some(relation.into()),
        }
    }

    /// Returns the relation in tuple terms, mapping absence to [`ELLIPSIS`].
    pub fn relation_or_ellipsis(&self) -> &str {
        self.optional_relation.as_deref().unwrap_or(ELLIPSIS)
    }

    /// Checks the object and, when present, the relation against the grammar.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.object.validate()?;
        match &self.optional_relation {
            Some(relation) if !is_valid_relation(relation) => {
                Err(ValidationError::InvalidSubjectRelation(relation.clone()))
            },
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SubjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.optional_relation {
            Some(relation) => write!(f, "{}#{}", self.object, relation),
            None => write!(f, "{}", self.object),
        }
    }
}

/// A relationship as exposed by the v1 API.
///
/// Semantically the same fact as a [`RelationTuple`](crate::tuple::RelationTuple),
/// but with a structured resource reference and an optional subject relation.
/// Convert with [`tuple::to_relationship`](crate::tuple::to_relationship) and
/// [`tuple::from_relationship`](crate::tuple::from_relationship).
///
/// ```rust
/// use inferadb_tuple::types::{ObjectReference, Relationship, SubjectReference};
///
/// // "document:readme has viewer user:alice"
/// let rel = Relationship::new(
///     ObjectReference::new("document", "readme"),
///     "viewer",
///     SubjectReference::new(ObjectReference::new("user", "alice")),
/// );
/// assert_eq!(rel.to_string(), "document:readme#viewer@user:alice");
/// assert!(rel.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// The resource the relation is granted on.
    pub resource: ObjectReference,

    /// The relation (edge label) connecting resource to subject.
    pub relation: String,

    /// The subject holding the relation.
    pub subject: SubjectReference,
}

impl Relationship {
    /// Creates a new relationship without validating it.
    pub fn new(
        resource: ObjectReference,
        relation: impl Into<String>,
        subject: SubjectReference,
    ) -> Self {
        Self {
            resource,
            relation: relation.into(),
            subject,
        }
    }

    /// Returns `true` if the subject is a subject set (has a relation).
    #[inline]
    pub fn is_subject_set(&self) -> bool {
        self.subject.optional_relation.is_some()
    }

    /// Checks every field against the tuple grammar.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.resource.validate()?;
        if !is_valid_relation(&self.relation) {
            return Err(ValidationError::InvalidRelation(self.relation.clone()));
        }
        self.subject.validate()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.relation, self.subject)
    }
}

/// The v1 mutation kinds.
///
/// Mirrors [`Operation`] one-to-one; see
/// [`tuple::update_to_relationship_update`](crate::tuple::update_to_relationship_update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipOperation {
    /// `OPERATION_CREATE`
    Create,
    /// `OPERATION_TOUCH`
    Touch,
    /// `OPERATION_DELETE`
    Delete,
}

impl RelationshipOperation {
    /// Returns the wire tag of this operation.
    #[inline]
    pub fn as_i32(self) -> i32 {
        match self {
            RelationshipOperation::Create => 1,
            RelationshipOperation::Touch => 2,
            RelationshipOperation::Delete => 3,
        }
    }
}

impl TryFrom<i32> for RelationshipOperation {
    type Error = ValidationError;

    /// Rejects `OPERATION_UNSPECIFIED` (0) and any tag this version doesn't know.
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RelationshipOperation::Create),
            2 => Ok(RelationshipOperation::Touch),
            3 => Ok(RelationshipOperation::Delete),
            other => Err(ValidationError::UnknownOperation(other)),
        }
    }
}

impl From<Operation> for RelationshipOperation {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Create => RelationshipOperation::Create,
            Operation::Touch => RelationshipOperation::Touch,
            Operation::Delete => RelationshipOperation::Delete,
        }
    }
}

impl From<RelationshipOperation> for Operation {
    fn from(op: RelationshipOperation) -> Self {
        match op {
            RelationshipOperation::Create => Operation::Create,
            RelationshipOperation::Touch => Operation::Touch,
            RelationshipOperation::Delete => Operation::Delete,
        }
    }
}

/// A relationship paired with the operation to apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipUpdate {
    /// What to do with the relationship.
    pub operation: RelationshipOperation,

    /// The relationship being mutated.
    pub relationship: Relationship,
}

impl RelationshipUpdate {
    /// Creates a new update.
    pub fn new(operation: RelationshipOperation, relationship: Relationship) -> Self {
        Self {
            operation,
            relationship,
        }
    }
}
