//! Dynamic values with a structural type system.
//!
//! Values are scalars, insertion-ordered arrays and maps, map entries, types and
//! errors. Containers start out mutable (optionally constrained by a declared
//! type) and can be frozen, after which they are immutable and freely shareable.
//! Equality, hashing, ordering, `assignable` and `instance` all terminate on
//! self-referencing structures.

pub mod array;
pub mod error;
pub mod guard;
pub mod json;
pub mod map;
pub mod types;
pub mod value;

pub(crate) mod compare;

mod backing;
mod render;

pub use array::Array;
pub use error::{Error, Result};
pub use guard::RecursionGuard;
pub use map::{Map, MapEntry};
pub use types::{Bounds, IntRange, Type, TypeAlias, UNBOUNDED};
pub use value::{Kind, Value};
