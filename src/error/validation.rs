//! Grammar validation failures.

/// A tuple, relationship or filter field failed the tuple grammar.
///
/// Returned by the relationship adapter and by filter validation. Text parsing
/// never produces this type; an unparseable tuple string is simply `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Namespace (object type) does not match the namespace grammar.
    #[error("invalid namespace `{0}`")]
    InvalidNamespace(String),

    /// Object id does not match the object id grammar.
    #[error("invalid object id `{0}`")]
    InvalidObjectId(String),

    /// Resource relation does not match the relation grammar.
    ///
    /// The wildcard is never a valid resource relation.
    #[error("invalid relation `{0}`")]
    InvalidRelation(String),

    /// Subject relation is neither a relation name nor the wildcard.
    #[error("invalid subject relation `{0}`")]
    InvalidSubjectRelation(String),

    /// A raw wire operation tag outside `CREATE`, `TOUCH` and `DELETE`.
    #[error("unknown tuple mutation {0}")]
    UnknownOperation(i32),
}
