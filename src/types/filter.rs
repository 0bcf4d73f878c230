//! Subset-match filters over relationships.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tuple::{
    ELLIPSIS, RelationTuple, is_valid_namespace, is_valid_object_id, is_valid_relation,
};

/// Matches relationships by resource and, optionally, by subject.
///
/// Every `optional_*` field left as `None` matches anything. Used for
/// read-by-pattern queries and delete-by-pattern writes.
///
/// ```rust
/// use inferadb_tuple::tuple;
/// use inferadb_tuple::types::RelationshipFilter;
///
/// let filter = RelationshipFilter::new("document").with_relation("viewer");
///
/// assert!(filter.matches(&tuple::parse("document:1#viewer@user:alice").unwrap()));
/// assert!(!filter.matches(&tuple::parse("document:1#editor@user:alice").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipFilter {
    /// Resource type to match. Required.
    pub resource_type: String,

    /// Resource id to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_resource_id: Option<String>,

    /// Resource relation to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_relation: Option<String>,

    /// Subject constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_subject_filter: Option<SubjectFilter>,
}

impl RelationshipFilter {
    /// Creates a filter matching every relationship on `resource_type`.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            optional_resource_id: None,
            optional_relation: None,
            optional_subject_filter: None,
        }
    }

    /// Restricts the filter to one resource id.
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.optional_resource_id = Some(resource_id.into());
        self
    }

    /// Restricts the filter to one resource relation.
    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.optional_relation = Some(relation.into());
        self
    }

    /// Adds subject constraints.
    #[must_use]
    pub fn with_subject_filter(mut self, subject_filter: SubjectFilter) -> Self {
        self.optional_subject_filter = Some(subject_filter);
        self
    }

    /// Returns `true` if `tuple` satisfies every populated field.
    pub fn matches(&self, tuple: &RelationTuple) -> bool {
        let resource = &tuple.resource_and_relation;
        if resource.namespace != self.resource_type {
            return false;
        }
        if self
            .optional_resource_id
            .as_ref()
            .is_some_and(|id| *id != resource.object_id)
        {
            return false;
        }
        if self
            .optional_relation
            .as_ref()
            .is_some_and(|relation| *relation != resource.relation)
        {
            return false;
        }
        self.optional_subject_filter
            .as_ref()
            .is_none_or(|subject_filter| subject_filter.matches(tuple))
    }

    /// Checks every populated field against the tuple grammar.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_namespace(&self.resource_type) {
            return Err(ValidationError::InvalidNamespace(self.resource_type.clone()));
        }
        if let Some(id) = &self.optional_resource_id
            && !is_valid_object_id(id)
        {
            return Err(ValidationError::InvalidObjectId(id.clone()));
        }
        if let Some(relation) = &self.optional_relation
            && !is_valid_relation(relation)
        {
            return Err(ValidationError::InvalidRelation(relation.clone()));
        }
        match &self.optional_subject_filter {
            Some(subject_filter) => subject_filter.validate(),
            None => Ok(()),
        }
    }
}

/// Subject constraints of a [`RelationshipFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectFilter {
    /// Subject type to match. Required.
    pub subject_type: String,

    /// Subject id to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_subject_id: Option<String>,

    /// Subject relation to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_relation: Option<RelationFilter>,
}

impl SubjectFilter {
    /// Creates a filter matching every subject of `subject_type`.
    pub fn new(subject_type: impl Into<String>) -> Self {
        Self {
            subject_type: subject_type.into(),
            optional_subject_id: None,
            optional_relation: None,
        }
    }

    /// Restricts the filter to one subject id.
    #[must_use]
    pub fn with_subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.optional_subject_id = Some(subject_id.into());
        self
    }

    /// Restricts the subject relation.
    #[must_use]
    pub fn with_relation(mut self, relation: RelationFilter) -> Self {
        self.optional_relation = Some(relation);
        self
    }

    fn matches(&self, tuple: &RelationTuple) -> bool {
        let subject = &tuple.subject;
        if subject.namespace != self.subject_type {
            return false;
        }
        if self
            .optional_subject_id
            .as_ref()
            .is_some_and(|id| *id != subject.object_id)
        {
            return false;
        }
        self.optional_relation
            .as_ref()
            .is_none_or(|relation| relation.relation_or_ellipsis() == subject.relation)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_namespace(&self.subject_type) {
            return Err(ValidationError::InvalidNamespace(self.subject_type.clone()));
        }
        if let Some(id) = &self.optional_subject_id
            && !is_valid_object_id(id)
        {
            return Err(ValidationError::InvalidObjectId(id.clone()));
        }
        match self.optional_relation.as_ref().and_then(|r| r.relation.as_ref()) {
            Some(relation) if !is_valid_relation(relation) => {
                Err(ValidationError::InvalidSubjectRelation(relation.clone()))
            },
            _ => Ok(()),
        }
    }
}

/// Constrains the subject relation.
///
/// `relation: None` matches only subjects without a relation (the wildcard),
/// which differs from leaving [`SubjectFilter::optional_relation`] unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationFilter {
    /// The required subject relation, `None` for the object itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl RelationFilter {
    /// Matches subjects without a relation.
    pub fn ellipsis() -> Self {
        Self { relation: None }
    }

    /// Matches subjects holding exactly `relation`.
    pub fn relation(relation: impl Into<String>) -> Self {
        Self {
            relation: Some(relation.into()),
        }
    }

    fn relation_or_ellipsis(&self) -> &str {
        self.relation.as_deref().unwrap_or(ELLIPSIS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::parse;

    fn t(value: &str) -> RelationTuple {
        parse(value).unwrap()
    }

    #[test]
    fn test_resource_type_only() {
        let filter = RelationshipFilter::new("document");
        assert!(filter.matches(&t("document:1#viewer@user:alice")));
        assert!(filter.matches(&t("document:2#editor@team:eng#member")));
        assert!(!filter.matches(&t("folder:1#viewer@user:alice")));
    }

    #[test]
    fn test_resource_id_and_relation() {
        let filter = RelationshipFilter::new("document")
            .with_resource_id("1")
            .with_relation("viewer");
        assert!(filter.matches(&t("document:1#viewer@user:alice")));
        assert!(!filter.matches(&t("document:2#viewer@user:alice")));
        assert!(!filter.matches(&t("document:1#editor@user:alice")));
    }

    #[test]
    fn test_subject_filter() {
        let filter = RelationshipFilter::new("document")
            .with_subject_filter(SubjectFilter::new("user").with_subject_id("alice"));
        assert!(filter.matches(&t("document:1#viewer@user:alice")));
        assert!(!filter.matches(&t("document:1#viewer@user:bob")));
        assert!(!filter.matches(&t("document:1#viewer@team:alice#member")));
    }

    #[test]
    fn test_subject_relation_filter_ellipsis_vs_unset() {
        let direct = RelationshipFilter::new("document").with_subject_filter(
            SubjectFilter::new("team").with_relation(RelationFilter::ellipsis()),
        );
        let any =
            RelationshipFilter::new("document").with_subject_filter(SubjectFilter::new("team"));

        let set = t("document:1#viewer@team:eng#member");
        let itself = t("document:1#viewer@team:eng");

        assert!(!direct.matches(&set));
        assert!(direct.matches(&itself));
        assert!(any.matches(&set));
        assert!(any.matches(&itself));
    }

    #[test]
    fn test_subject_relation_filter_named() {
        let filter = RelationshipFilter::new("document").with_subject_filter(
            SubjectFilter::new("team").with_relation(RelationFilter::relation("member")),
        );
        assert!(filter.matches(&t("document:1#viewer@team:eng#member")));
        assert!(!filter.matches(&t("document:1#viewer@team:eng#admin")));
        assert!(!filter.matches(&t("document:1#viewer@team:eng")));
    }

    #[test]
    fn test_validate() {
        assert!(RelationshipFilter::new("document").validate().is_ok());
        assert_eq!(
            RelationshipFilter::new("Document").validate(),
            Err(ValidationError::InvalidNamespace("Document".into()))
        );
        assert_eq!(
            RelationshipFilter::new("document").with_relation("...").validate(),
            Err(ValidationError::InvalidRelation("...".into()))
        );
        assert_eq!(
            RelationshipFilter::new("document")
                .with_subject_filter(SubjectFilter::new("user").with_subject_id(" "))
                .validate(),
            Err(ValidationError::InvalidObjectId(" ".into()))
        );
        assert_eq!(
            RelationshipFilter::new("document")
                .with_subject_filter(
                    SubjectFilter::new("team").with_relation(RelationFilter::relation("..."))
                )
                .validate(),
            Err(ValidationError::InvalidSubjectRelation("...".into()))
        );
    }
}
