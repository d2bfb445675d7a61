//! Structured errors raised by the container model and the type algebra.
//!
//! Every error is also a [`Value`]: two errors are equal when their rendered
//! messages are equal, and they hash by that message.

use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::types::Type;
use crate::value::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A value does not satisfy the element, key or value type it was assigned to.
    #[error("the value {actual} cannot be assigned to a variable of type {expected}")]
    IllegalAssignment { expected: Type, actual: Value },

    /// A mutation would move a container's size outside its declared bounds.
    #[error("size constraint violation on type {expected} when attempting resize to {size}")]
    IllegalSize { expected: Type, size: usize },

    #[error("{operation} called on a frozen {kind}")]
    Frozen {
        operation: &'static str,
        kind: &'static str,
    },

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("values {left} and {right} are not comparable")]
    NotComparable { left: Value, right: Value },

    #[error("alias {name} is already defined")]
    AliasAlreadyDefined { name: String },

    #[error("type {ty} is not an alias")]
    NotAnAlias { ty: Type },

    /// The alias would reach itself through unions and intersections alone,
    /// without passing through an array, tuple, map or meta type.
    #[error("alias {name} refers to itself without a structural constructor")]
    NonContractiveAlias { name: String },
}

impl Error {
    pub fn illegal_assignment(expected: &Type, actual: &Value) -> Self {
        Error::IllegalAssignment {
            expected: expected.clone(),
            actual: actual.clone(),
        }
    }

    pub fn illegal_size(expected: &Type, size: usize) -> Self {
        Error::IllegalSize {
            expected: expected.clone(),
            size,
        }
    }

    pub(crate) fn frozen(operation: &'static str, kind: &'static str) -> Self {
        Error::Frozen { operation, kind }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Error {}

impl Hash for Error {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
