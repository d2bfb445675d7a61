//! The type algebra: a closed set of type variants, their constructors and the
//! queries shared by the assignability and instance checks.
//!
//! Types are immutable and cheap to clone. Composite variants hold their payload
//! behind an `Arc`, which doubles as the type's identity for cycle detection.

mod assignable;
mod instance;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use crate::array::Array;
use crate::compare::hash_of;
use crate::error::{Error, Result};
use crate::guard::RecursionGuard;
use crate::map::Map;
use crate::render;
use crate::value::Value;

/// Upper size bound meaning "no limit".
pub const UNBOUNDED: usize = usize::MAX;

static DEFAULT_ARRAY: Lazy<Type> = Lazy::new(|| {
    Type::Array(Arc::new(ArrayType {
        element: Type::Any,
        bounds: Bounds::UNBOUNDED,
    }))
});

static DEFAULT_MAP: Lazy<Type> = Lazy::new(|| {
    Type::Map(Arc::new(MapType {
        key: Type::Any,
        value: Type::Any,
        bounds: Bounds::UNBOUNDED,
    }))
});

// -------------------------------- Payloads -------------------------------- //

/// Inclusive size bounds of a sized container type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds { min: 0, max: UNBOUNDED };

    /// Negative sizes clamp to zero, reversed bounds are swapped and `i64::MAX`
    /// stands for no upper bound.
    pub fn new(min: i64, max: i64) -> Self {
        let clamp = |n: i64| match n {
            i64::MAX => UNBOUNDED,
            n if n <= 0 => 0,
            n => usize::try_from(n).unwrap_or(UNBOUNDED),
        };
        let (min, max) = (clamp(min), clamp(max));
        if max < min {
            Bounds { min: max, max: min }
        } else {
            Bounds { min, max }
        }
    }

    pub fn exact(len: usize) -> Self {
        Bounds { min: len, max: len }
    }

    pub fn contains(&self, len: usize) -> bool {
        self.min <= len && len <= self.max
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Bounds::UNBOUNDED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn contains(&self, i: i64) -> bool {
        self.min <= i && i <= self.max
    }
}

pub struct ArrayType {
    pub element: Type,
    pub bounds: Bounds,
}

pub struct MapType {
    pub key: Type,
    pub value: Type,
    pub bounds: Bounds,
}

/// A named type whose definition is supplied after creation, which is how
/// recursive types are built.
pub struct TypeAlias {
    name: String,
    target: OnceCell<Type>,
}

impl TypeAlias {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> Option<&Type> {
        self.target.get()
    }
}

// ---------------------------------- Type ---------------------------------- //

#[derive(Clone)]
pub enum Type {
    Any,
    Nil,
    Boolean,
    Integer,
    Float,
    String,
    Error,
    IntegerRange(IntRange),
    /// One of a fixed set of string literals.
    Enum(Arc<[Arc<str>]>),
    Array(Arc<ArrayType>),
    /// Fixed-length sequence with a type per position.
    Tuple(Arc<[Type]>),
    Map(Arc<MapType>),
    /// The type whose only instance is the (frozen) literal.
    Exact(Arc<Value>),
    ExactArray(Array),
    ExactMap(Map),
    AnyOf(Arc<[Type]>),
    AllOf(Arc<[Type]>),
    /// The type of types: its instances are the types assignable to the inner one.
    Meta(Arc<Type>),
    Alias(Arc<TypeAlias>),
}

impl Type {
    // ---- Constructors ---- //

    /// `[]any`. Always the same instance.
    pub fn default_array() -> Type {
        DEFAULT_ARRAY.clone()
    }

    pub fn array(element: Type, min: i64, max: i64) -> Type {
        Type::array_bounded(element, Bounds::new(min, max))
    }

    pub fn array_of(element: Type) -> Type {
        Type::array_bounded(element, Bounds::UNBOUNDED)
    }

    pub fn sized_array(min: i64, max: i64) -> Type {
        Type::array(Type::Any, min, max)
    }

    pub(crate) fn array_bounded(element: Type, bounds: Bounds) -> Type {
        if matches!(element, Type::Any) && bounds.is_unbounded() {
            return Type::default_array();
        }
        Type::Array(Arc::new(ArrayType { element, bounds }))
    }

    /// The empty tuple is the default array type.
    pub fn tuple(types: Vec<Type>) -> Type {
        if types.is_empty() {
            return Type::default_array();
        }
        Type::Tuple(types.into())
    }

    /// `map[any]any`. Always the same instance.
    pub fn default_map() -> Type {
        DEFAULT_MAP.clone()
    }

    pub fn map(key: Type, value: Type, min: i64, max: i64) -> Type {
        Type::map_bounded(key, value, Bounds::new(min, max))
    }

    pub fn map_of(key: Type, value: Type) -> Type {
        Type::map_bounded(key, value, Bounds::UNBOUNDED)
    }

    pub fn sized_map(min: i64, max: i64) -> Type {
        Type::map(Type::Any, Type::Any, min, max)
    }

    pub(crate) fn map_bounded(key: Type, value: Type, bounds: Bounds) -> Type {
        if matches!((&key, &value), (Type::Any, Type::Any)) && bounds.is_unbounded() {
            return Type::default_map();
        }
        Type::Map(Arc::new(MapType { key, value, bounds }))
    }

    /// A union. A single member is returned as is; no members is `never`.
    pub fn any_of(types: Vec<Type>) -> Type {
        if types.len() == 1 {
            return types.into_iter().next().unwrap_or(Type::Any);
        }
        Type::AnyOf(types.into())
    }

    /// An intersection. A single member is returned as is; no members is `any`.
    pub fn all_of(types: Vec<Type>) -> Type {
        match types.len() {
            0 => Type::Any,
            1 => types.into_iter().next().unwrap_or(Type::Any),
            _ => Type::AllOf(types.into()),
        }
    }

    /// Inclusive range; the full `i64` range is plain `int`.
    pub fn integer_range(min: i64, max: i64) -> Type {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        if min == i64::MIN && max == i64::MAX {
            return Type::Integer;
        }
        Type::IntegerRange(IntRange { min, max })
    }

    pub fn enumeration<I, S>(strings: I) -> Type
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut literals: Vec<Arc<str>> = Vec::new();
        for s in strings {
            if !literals.iter().any(|l| **l == *s.as_ref()) {
                literals.push(Arc::from(s.as_ref()));
            }
        }
        if literals.is_empty() {
            return Type::any_of(Vec::new());
        }
        Type::Enum(literals.into())
    }

    /// The exact type of a value. Containers are captured as frozen copies.
    pub fn exact(value: Value) -> Type {
        match value {
            Value::Nil => Type::Nil,
            Value::Array(a) => Type::ExactArray(a.copy(true)),
            Value::Map(m) => Type::ExactMap(m.copy(true)),
            v => Type::Exact(Arc::new(v.frozen_copy())),
        }
    }

    /// A named placeholder, to be given a definition with [`Type::define`].
    pub fn alias(name: impl Into<String>) -> Type {
        Type::Alias(Arc::new(TypeAlias {
            name: name.into(),
            target: OnceCell::new(),
        }))
    }

    /// Supplies the definition of an alias. Each alias is defined at most once,
    /// and may only refer to itself from inside an array, tuple, map or meta type.
    pub fn define(&self, target: Type) -> Result<()> {
        let Type::Alias(alias) = self else {
            return Err(Error::NotAnAlias { ty: self.clone() });
        };
        if alias.target().is_some() {
            return Err(Error::AliasAlreadyDefined {
                name: alias.name.clone(),
            });
        }
        if reaches_unguarded(&target, alias, &mut Vec::new()) {
            return Err(Error::NonContractiveAlias {
                name: alias.name.clone(),
            });
        }
        alias.target.set(target).map_err(|_| Error::AliasAlreadyDefined {
            name: alias.name.clone(),
        })?;
        tracing::trace!(alias = %alias.name, "alias defined");
        Ok(())
    }

    // ---- Queries ---- //

    /// Follows alias definitions. An undefined alias resolves to itself.
    pub fn resolved(&self) -> &Type {
        let mut t = self;
        while let Type::Alias(alias) = t {
            match alias.target() {
                Some(next) => t = next,
                None => break,
            }
        }
        t
    }

    /// The size bounds of sequence and map types.
    pub fn bounds(&self) -> Option<Bounds> {
        match self.resolved() {
            Type::Array(at) => Some(at.bounds),
            Type::Tuple(ts) => Some(Bounds::exact(ts.len())),
            Type::ExactArray(a) => Some(Bounds::exact(a.len())),
            Type::Map(mt) => Some(mt.bounds),
            Type::ExactMap(m) => Some(Bounds::exact(m.len())),
            _ => None,
        }
    }

    pub fn min(&self) -> usize {
        self.bounds().map_or(0, |b| b.min)
    }

    pub fn max(&self) -> usize {
        self.bounds().map_or(UNBOUNDED, |b| b.max)
    }

    pub fn unbounded(&self) -> bool {
        self.bounds().is_none_or(|b| b.is_unbounded())
    }

    /// The type every element of a sequence type satisfies.
    pub fn element_type(&self) -> Option<Type> {
        match self.resolved() {
            Type::Array(at) => Some(at.element.clone()),
            Type::Tuple(ts) => Some(Type::any_of(ts.to_vec())),
            Type::ExactArray(_) => self.element_types().map(Type::any_of),
            _ => None,
        }
    }

    /// Per-position types of tuples and exact sequences.
    pub fn element_types(&self) -> Option<Vec<Type>> {
        match self.resolved() {
            Type::Tuple(ts) => Some(ts.to_vec()),
            Type::ExactArray(a) => Some(a.to_vec().into_iter().map(Type::exact).collect()),
            _ => None,
        }
    }

    pub fn key_type(&self) -> Option<Type> {
        match self.resolved() {
            Type::Map(mt) => Some(mt.key.clone()),
            Type::ExactMap(m) => Some(Type::any_of(m.keys().to_vec().into_iter().map(Type::exact).collect())),
            _ => None,
        }
    }

    pub fn value_type(&self) -> Option<Type> {
        match self.resolved() {
            Type::Map(mt) => Some(mt.value.clone()),
            Type::ExactMap(m) => Some(Type::any_of(m.values().to_vec().into_iter().map(Type::exact).collect())),
            _ => None,
        }
    }

    /// The literal an exact type stands for.
    pub fn exact_value(&self) -> Option<Value> {
        match self {
            Type::Exact(v) => Some((**v).clone()),
            Type::ExactArray(a) => Some(Value::Array(a.clone())),
            Type::ExactMap(m) => Some(Value::Map(m.clone())),
            _ => None,
        }
    }

    /// The type of a type value: `type[self]`.
    pub fn type_of(&self) -> Type {
        Type::Meta(Arc::new(self.clone()))
    }

    /// Whether every instance of `other` is an instance of `self`.
    pub fn assignable(&self, other: &Type) -> bool {
        assignable::assignable(None, self, other)
    }

    pub fn instance(&self, value: &Value) -> bool {
        instance::instance(None, self, value)
    }

    /// Mutual assignability. Both directions share one guard, swapped for the
    /// reverse walk.
    pub fn equivalent(&self, other: &Type) -> bool {
        let (a, b) = (self.resolved(), other.resolved());
        if !(a.is_structural() && b.is_structural()) {
            return assignable::check(None, a, b) && assignable::check(None, b, a);
        }
        let guard = RecursionGuard::new(Value::Type(a.clone()), Value::Type(b.clone()));
        assignable::check(Some(&guard), a, b) && assignable::check(Some(&guard.swap()), b, a)
    }

    /// Identity. Payload-carrying variants compare by pointer.
    pub fn same(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::IntegerRange(a), Type::IntegerRange(b)) => a == b,
            (Type::Enum(a), Type::Enum(b)) => Arc::ptr_eq(a, b),
            (Type::Array(a), Type::Array(b)) => Arc::ptr_eq(a, b),
            (Type::Tuple(a), Type::Tuple(b)) => Arc::ptr_eq(a, b),
            (Type::Map(a), Type::Map(b)) => Arc::ptr_eq(a, b),
            (Type::Exact(a), Type::Exact(b)) => Arc::ptr_eq(a, b),
            (Type::ExactArray(a), Type::ExactArray(b)) => a.same(b),
            (Type::ExactMap(a), Type::ExactMap(b)) => a.same(b),
            (Type::AnyOf(a), Type::AnyOf(b)) => Arc::ptr_eq(a, b),
            (Type::AllOf(a), Type::AllOf(b)) => Arc::ptr_eq(a, b),
            (Type::Meta(a), Type::Meta(b)) => Arc::ptr_eq(a, b),
            (Type::Alias(a), Type::Alias(b)) => Arc::ptr_eq(a, b),
            _ => self.is_primitive() && self.ordinal() == other.ordinal(),
        }
    }

    /// Types whose checks may recurse, and therefore take part in cycle detection.
    pub(crate) fn is_deep(&self) -> bool {
        !self.is_primitive() && !matches!(self, Type::IntegerRange(_) | Type::Enum(_))
    }

    /// Types that descend into container content. Only these advance a
    /// recursion guard.
    pub(crate) fn is_structural(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Tuple(_) | Type::Map(_) | Type::Meta(_))
    }

    fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Any
                | Type::Nil
                | Type::Boolean
                | Type::Integer
                | Type::Float
                | Type::String
                | Type::Error
        )
    }

    fn ordinal(&self) -> u64 {
        match self {
            Type::Any => 0,
            Type::Nil => 1,
            Type::Boolean => 2,
            Type::Integer => 3,
            Type::Float => 4,
            Type::String => 5,
            Type::Error => 6,
            Type::IntegerRange(_) => 7,
            Type::Enum(_) => 8,
            Type::Array(_) => 9,
            Type::Tuple(_) => 10,
            Type::Map(_) => 11,
            Type::Exact(_) => 12,
            Type::ExactArray(_) => 13,
            Type::ExactMap(_) => 14,
            Type::AnyOf(_) => 15,
            Type::AllOf(_) => 16,
            Type::Meta(_) => 17,
            Type::Alias(_) => 18,
        }
    }

    /// Consistent with `==`: structurally equal types hash alike.
    pub fn hash_code(&self) -> u64 {
        let seed = self.ordinal();
        let mix = |h: u64, x: u64| h.wrapping_mul(31).wrapping_add(x);
        let fold = |ts: &[Type]| ts.iter().fold(seed, |h, t| mix(h, t.hash_code()));
        match self {
            Type::IntegerRange(r) => hash_of(&(seed, r)),
            Type::Enum(xs) => hash_of(&(seed, &**xs)),
            Type::Array(at) => mix(mix(seed, hash_of(&at.bounds)), at.element.hash_code()),
            Type::Tuple(ts) | Type::AnyOf(ts) | Type::AllOf(ts) => fold(ts),
            Type::Map(mt) => mix(
                mix(mix(seed, hash_of(&mt.bounds)), mt.key.hash_code()),
                mt.value.hash_code(),
            ),
            Type::Exact(v) => mix(seed, v.hash_code()),
            Type::ExactArray(a) => mix(seed, Value::Array(a.clone()).hash_code()),
            Type::ExactMap(m) => mix(seed, Value::Map(m.clone()).hash_code()),
            Type::Meta(inner) => mix(seed, inner.hash_code()),
            Type::Alias(a) => hash_of(&(seed, &a.name)),
            _ => hash_of(&seed),
        }
    }
}

/// Whether `t` reaches `alias` passing only through unions, intersections and
/// other aliases.
fn reaches_unguarded(t: &Type, alias: &Arc<TypeAlias>, visiting: &mut Vec<*const TypeAlias>) -> bool {
    match t {
        Type::Alias(a) if Arc::ptr_eq(a, alias) => true,
        Type::Alias(a) => {
            let ptr = Arc::as_ptr(a);
            if visiting.contains(&ptr) {
                return false;
            }
            visiting.push(ptr);
            a.target().is_some_and(|t| reaches_unguarded(t, alias, visiting))
        }
        Type::AnyOf(ts) | Type::AllOf(ts) => ts.iter().any(|t| reaches_unguarded(t, alias, visiting)),
        _ => false,
    }
}

// ------------------------------- Std traits ------------------------------- //

/// Structural equality. Aliases are equal only to themselves.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if self.same(other) {
            return true;
        }
        match (self, other) {
            (Type::Enum(a), Type::Enum(b)) => a == b,
            (Type::Array(a), Type::Array(b)) => a.bounds == b.bounds && a.element == b.element,
            (Type::Tuple(a), Type::Tuple(b)) => a == b,
            (Type::Map(a), Type::Map(b)) => {
                a.bounds == b.bounds && a.key == b.key && a.value == b.value
            }
            (Type::Exact(a), Type::Exact(b)) => a.equals(b),
            (Type::ExactArray(a), Type::ExactArray(b)) => {
                Value::Array(a.clone()).equals(&Value::Array(b.clone()))
            }
            (Type::ExactMap(a), Type::ExactMap(b)) => {
                Value::Map(a.clone()).equals(&Value::Map(b.clone()))
            }
            (Type::AnyOf(a), Type::AnyOf(b)) | (Type::AllOf(a), Type::AllOf(b)) => a == b,
            (Type::Meta(a), Type::Meta(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::ty(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::ty(f, self, &mut Vec::new())
    }
}
