//! Canonical in-memory tuple structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::grammar::{
    ELLIPSIS, is_valid_namespace, is_valid_object_id, is_valid_relation,
    is_valid_subject_relation,
};
use crate::error::ValidationError;

/// A `(namespace, object id, relation)` triple.
///
/// Used both for the resource side of a tuple (`document:readme#viewer`) and
/// for the subject side (`group:eng#member`, or `user:alice#...` for the
/// subject itself).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectAndRelation {
    /// Object type, optionally prefixed with a tenant (`acme/document`).
    pub namespace: String,

    /// Object identifier within the namespace.
    pub object_id: String,

    /// Relation name, or [`ELLIPSIS`] in subject position.
    pub relation: String,
}

impl ObjectAndRelation {
    /// Creates a new object-and-relation triple without validating it.
    pub fn new(
        namespace: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            object_id: object_id.into(),
            relation: relation.into(),
        }
    }

    /// Creates a subject that refers to the object itself (wildcard relation).
    ///
    /// ```rust
    /// use inferadb_tuple::tuple::{ELLIPSIS, ObjectAndRelation};
    ///
    /// let user = ObjectAndRelation::subject("user", "alice");
    /// assert_eq!(user.relation, ELLIPSIS);
    /// assert_eq!(user.to_string(), "user:alice");
    /// ```
    pub fn subject(namespace: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self::new(namespace, object_id, ELLIPSIS)
    }

    /// Returns `true` if the relation is the wildcard.
    #[inline]
    pub fn is_ellipsis(&self) -> bool {
        self.relation == ELLIPSIS
    }

    /// Validates this triple in resource position.
    pub fn validate_resource(&self) -> Result<(), ValidationError> {
        self.validate_object()?;
        if !is_valid_relation(&self.relation) {
            return Err(ValidationError::InvalidRelation(self.relation.clone()));
        }
        Ok(())
    }

    /// Validates this triple in subject position, where the wildcard is allowed.
    pub fn validate_subject(&self) -> Result<(), ValidationError> {
        self.validate_object()?;
        if !is_valid_subject_relation(&self.relation) {
            return Err(ValidationError::InvalidSubjectRelation(self.relation.clone()));
        }
        Ok(())
    }

    fn validate_object(&self) -> Result<(), ValidationError> {
        if !is_valid_namespace(&self.namespace) {
            return Err(ValidationError::InvalidNamespace(self.namespace.clone()));
        }
        if !is_valid_object_id(&self.object_id) {
            return Err(ValidationError::InvalidObjectId(self.object_id.clone()));
        }
        Ok(())
    }
}

/// Formats as `namespace:object_id#relation`, dropping `#...` for the wildcard.
impl fmt::Display for ObjectAndRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ellipsis() {
            write!(f, "{}:{}", self.namespace, self.object_id)
        } else {
            write!(f, "{}:{}#{}", self.namespace, self.object_id, self.relation)
        }
    }
}

/// One fact: `subject` has `resource_and_relation.relation` on the resource.
///
/// ```rust
/// use inferadb_tuple::tuple::{ObjectAndRelation, RelationTuple};
///
/// let tuple = RelationTuple::new(
///     ObjectAndRelation::new("document", "readme", "viewer"),
///     ObjectAndRelation::subject("user", "alice"),
/// );
/// assert_eq!(tuple.to_string(), "document:readme#viewer@user:alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationTuple {
    /// The resource and the relation granted on it.
    pub resource_and_relation: ObjectAndRelation,

    /// The subject holding the relation.
    pub subject: ObjectAndRelation,
}

impl RelationTuple {
    /// Creates a new tuple without validating it.
    pub fn new(resource_and_relation: ObjectAndRelation, subject: ObjectAndRelation) -> Self {
        Self {
            resource_and_relation,
            subject,
        }
    }

    /// Checks both sides of the tuple against the grammar.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.resource_and_relation.validate_resource()?;
        self.subject.validate_subject()
    }
}

impl fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.resource_and_relation, self.subject)
    }
}
