//! The `Value` sum type and the capability set every value exposes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::array::Array;
use crate::compare;
use crate::error::{Error, Result};
use crate::map::{Map, MapEntry};
use crate::render;
use crate::types::Type;

/// Anything the type system can describe.
///
/// Scalars are held inline, containers and types are cheap shared handles. `Nil`
/// is a first-class value: it equals only itself and orders below everything else.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(Arc<str>),
    Array(Array),
    Map(Map),
    Entry(MapEntry),
    Type(Type),
    Error(Arc<Error>),
}

/// Kind grouping used by the total order, in ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Number,
    String,
    Array,
    Map,
    Entry,
    Type,
    Error,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Integer(_) | Value::Float(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
            Value::Entry(_) => Kind::Entry,
            Value::Type(_) => Kind::Type,
            Value::Error(_) => Kind::Error,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.0),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_entry(&self) -> Option<&MapEntry> {
        match self {
            Value::Entry(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }

    /// The dynamic type of this value. Scalars and frozen containers report their
    /// exact type; a mutable container reports its declared constraint.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Array(a) => a.type_of(),
            Value::Map(m) => m.type_of(),
            Value::Type(t) => t.type_of(),
            Value::Error(_) => Type::Error,
            Value::Bool(_) | Value::Integer(_) | Value::Float(_) | Value::String(_) | Value::Entry(_) => {
                Type::exact(self.clone())
            }
        }
    }

    /// Values that may (indirectly) contain themselves and therefore opt into the
    /// cycle-safe comparison protocol.
    pub(crate) fn is_deep(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_) | Value::Entry(_))
    }

    /// Identity: pointer identity for shared payloads, value identity for inline
    /// scalars.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => a.same(b),
            (Value::Map(a), Value::Map(b)) => a.same(b),
            (Value::Entry(a), Value::Entry(b)) => a.same(b),
            (Value::Type(a), Value::Type(b)) => a.same(b),
            (Value::Error(a), Value::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn equals(&self, other: &Value) -> bool {
        compare::equals(&mut Vec::new(), self, other)
    }

    pub fn hash_code(&self) -> u64 {
        compare::hash_code(&mut Vec::new(), self)
    }

    /// Three-way comparison; `None` when the two values have no defined order.
    pub fn compare_to(&self, other: &Value) -> Option<Ordering> {
        compare::compare(&mut Vec::new(), self, other)
    }

    /// Like [`Value::compare_to`] for callers that require an order.
    pub fn try_compare(&self, other: &Value) -> Result<Ordering> {
        self.compare_to(other).ok_or_else(|| Error::NotComparable {
            left: self.clone(),
            right: other.clone(),
        })
    }

    /// Total order over all values: kind first, then a per-kind order.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        compare::total_cmp(&mut Vec::new(), self, other)
    }

    /// False only for mutable containers and entries holding one.
    pub fn frozen(&self) -> bool {
        match self {
            Value::Array(a) => a.frozen(),
            Value::Map(m) => m.frozen(),
            Value::Entry(e) => e.frozen(),
            _ => true,
        }
    }

    /// Freezes a mutable container in place. No-op for everything else.
    pub fn freeze(&self) {
        match self {
            Value::Array(a) => a.freeze(),
            Value::Map(m) => m.freeze(),
            Value::Entry(e) => e.value().freeze(),
            _ => {}
        }
    }

    /// Returns `self` when already frozen, otherwise a frozen copy.
    pub fn frozen_copy(&self) -> Value {
        self.frozen_copy_with(&mut CopyMemo::default())
    }

    pub(crate) fn frozen_copy_with(&self, memo: &mut CopyMemo) -> Value {
        match self {
            Value::Array(a) => Value::Array(a.frozen_copy_with(memo)),
            Value::Map(m) => Value::Map(m.frozen_copy_with(memo)),
            Value::Entry(e) => Value::Entry(e.frozen_copy_with(memo)),
            _ => self.clone(),
        }
    }
}

/// Source container address -> frozen copy, so that copying a cyclic structure
/// yields a cyclic copy instead of recursing forever.
#[derive(Default)]
pub(crate) struct CopyMemo {
    copies: Vec<(usize, Value)>,
}

impl CopyMemo {
    pub(crate) fn get(&self, addr: usize) -> Option<Value> {
        self.copies
            .iter()
            .find(|(a, _)| *a == addr)
            .map(|(_, v)| v.clone())
    }

    pub(crate) fn insert(&mut self, addr: usize, copy: Value) {
        self.copies.push((addr, copy));
    }
}

// ------------------------------ Conversions ------------------------------- //

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        match i64::try_from(i) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Float(OrderedFloat(i as f64)),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<MapEntry> for Value {
    fn from(e: MapEntry) -> Self {
        Value::Entry(e)
    }
}

impl From<Type> for Value {
    fn from(t: Type) -> Self {
        Value::Type(t)
    }
}

impl From<Error> for Value {
    fn from(e: Error) -> Self {
        Value::Error(Arc::new(e))
    }
}

/// A vector becomes a frozen array.
impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(Array::new(values))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

// ------------------------------- Std traits ------------------------------- //

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::value(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::value(f, self, &mut Vec::new())
    }
}
