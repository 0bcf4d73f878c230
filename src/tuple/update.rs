//! Tuple mutations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::RelationTuple;
use crate::error::ValidationError;

/// The kind of change a [`RelationTupleUpdate`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Insert; fails if the tuple already exists.
    Create,
    /// Idempotent upsert.
    Touch,
    /// Remove if present.
    Delete,
}

impl Operation {
    /// Returns the wire tag of this operation.
    #[inline]
    pub fn as_i32(self) -> i32 {
        match self {
            Operation::Create => 1,
            Operation::Touch => 2,
            Operation::Delete => 3,
        }
    }
}

impl TryFrom<i32> for Operation {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Operation::Create),
            2 => Ok(Operation::Touch),
            3 => Ok(Operation::Delete),
            other => Err(ValidationError::UnknownOperation(other)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "CREATE",
            Operation::Touch => "TOUCH",
            Operation::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A tuple paired with the operation to apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationTupleUpdate {
    /// What to do with the tuple.
    pub operation: Operation,

    /// The tuple being mutated.
    pub tuple: RelationTuple,
}

impl RelationTupleUpdate {
    /// Creates a new update.
    pub fn new(operation: Operation, tuple: RelationTuple) -> Self {
        Self { operation, tuple }
    }
}

impl fmt::Display for RelationTupleUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.tuple)
    }
}

/// Wraps `tuple` in a `CREATE` update.
pub fn create(tuple: RelationTuple) -> RelationTupleUpdate {
    RelationTupleUpdate::new(Operation::Create, tuple)
}

/// Wraps `tuple` in a `TOUCH` update.
pub fn touch(tuple: RelationTuple) -> RelationTupleUpdate {
    RelationTupleUpdate::new(Operation::Touch, tuple)
}

/// Wraps `tuple` in a `DELETE` update.
pub fn delete(tuple: RelationTuple) -> RelationTupleUpdate {
    RelationTupleUpdate::new(Operation::Delete, tuple)
}
