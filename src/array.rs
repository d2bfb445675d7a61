//! Ordered sequences with a mutable -> frozen lifecycle.
//!
//! A mutable array may carry a declared type; every mutation computes the
//! prospective content, validates it against that type and only then commits.
//! Frozen arrays hold frozen children exclusively and report their exact type.

use std::fmt;
use std::sync::Arc;

use crate::backing::Backing;
use crate::compare;
use crate::error::{Error, Result};
use crate::map::Map;
use crate::render;
use crate::types::Type;
use crate::value::{CopyMemo, Value};

#[derive(Clone)]
pub struct Array(Arc<Backing<ArrayState>>);

#[derive(Clone, Default)]
pub(crate) struct ArrayState {
    pub(crate) items: Vec<Value>,
    pub(crate) declared: Option<Type>,
}

impl Array {
    // ---- Construction ---- //

    /// A frozen array. Mutable children are replaced by frozen copies.
    pub fn new(values: Vec<Value>) -> Array {
        let mut memo = CopyMemo::default();
        let items = values
            .into_iter()
            .map(|v| v.frozen_copy_with(&mut memo))
            .collect();
        Array::with_state(ArrayState { items, declared: None }, true)
    }

    pub fn from_values<I, V>(values: I) -> Array
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Array::new(values.into_iter().map(Into::into).collect())
    }

    pub fn strings(values: &[&str]) -> Array {
        Array::from_values(values.iter().copied())
    }

    pub fn integers(values: &[i64]) -> Array {
        Array::from_values(values.iter().copied())
    }

    /// A mutable array constrained by `declared` (unconstrained when `None`).
    /// Children are kept as given, mutable ones included.
    pub fn mutable(declared: Option<Type>, values: Vec<Value>) -> Result<Array> {
        admit(declared.as_ref(), &values, &values)?;
        Ok(Array::with_state(ArrayState { items: values, declared }, false))
    }

    /// Unconstrained mutable array; nothing to validate.
    pub(crate) fn untyped(items: Vec<Value>) -> Array {
        Array::with_state(ArrayState { items, declared: None }, false)
    }

    fn with_state(state: ArrayState, frozen: bool) -> Array {
        Array(Arc::new(Backing::new(state, frozen)))
    }

    /// Frozen view over content that is only inspected, never published.
    pub(crate) fn wrap(items: Vec<Value>) -> Array {
        Array::with_state(ArrayState { items, declared: None }, true)
    }

    // ---- Inspection ---- //

    pub fn len(&self) -> usize {
        self.snapshot().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.snapshot().items.get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.snapshot().items.clone()
    }

    pub fn frozen(&self) -> bool {
        self.0.is_frozen()
    }

    pub fn declared_type(&self) -> Option<Type> {
        self.snapshot().declared.clone()
    }

    /// The exact type when frozen, otherwise the declared type (`[]any` if none).
    pub fn type_of(&self) -> Type {
        if self.frozen() {
            return Type::ExactArray(self.clone());
        }
        self.declared_type().unwrap_or_else(Type::default_array)
    }

    pub fn same(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn snapshot(&self) -> Arc<ArrayState> {
        self.0.snapshot()
    }

    // ---- Mutation ---- //

    pub fn add(&self, value: impl Into<Value>) -> Result<()> {
        self.add_all([value.into()]).map_err(|e| rename(e, "Add"))
    }

    pub fn add_all(&self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        let added: Vec<Value> = values.into_iter().collect();
        self.mutate("AddAll", |items| {
            items.extend(added.iter().cloned());
            Ok(added)
        })
    }

    pub fn insert(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate("Insert", |items| {
            if index > items.len() {
                return Err(Error::IndexOutOfBounds { index, len: items.len() });
            }
            items.insert(index, value.clone());
            Ok(vec![value])
        })
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&self, index: usize) -> Result<Value> {
        let mut removed = Value::Nil;
        self.mutate("Remove", |items| {
            if index >= items.len() {
                return Err(Error::IndexOutOfBounds { index, len: items.len() });
            }
            removed = items.remove(index);
            Ok(Vec::new())
        })?;
        Ok(removed)
    }

    /// Removes the first element equal to `value`. Returns whether one was found.
    pub fn remove_value(&self, value: &Value) -> Result<bool> {
        let mut found = false;
        self.mutate("RemoveValue", |items| {
            if let Some(index) = items.iter().position(|e| e.equals(value)) {
                items.remove(index);
                found = true;
            }
            Ok(Vec::new())
        })?;
        Ok(found)
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<Value> {
        let value = value.into();
        let mut previous = Value::Nil;
        self.mutate("Set", |items| {
            let len = items.len();
            let slot = items.get_mut(index).ok_or(Error::IndexOutOfBounds { index, len })?;
            previous = std::mem::replace(slot, value.clone());
            Ok(vec![value])
        })?;
        Ok(previous)
    }

    /// Removes and returns the last element, `None` when empty.
    pub fn pop(&self) -> Result<Option<Value>> {
        let mut last = None;
        self.mutate("Pop", |items| {
            last = items.pop();
            Ok(Vec::new())
        })?;
        Ok(last)
    }

    /// Replaces the declared type after checking the current content against it.
    pub fn set_type(&self, declared: Type) -> Result<()> {
        if self.frozen() {
            return Err(Error::frozen("SetType", "Array"));
        }
        let items = self.snapshot().items.clone();
        admit(Some(&declared), &items, &items)?;
        tracing::trace!(declared = %declared, "array type replaced");
        self.0.update(|state| state.declared = Some(declared));
        Ok(())
    }

    /// Freezes in place, then freezes mutable children in place.
    pub fn freeze(&self) {
        if !self.0.mark_frozen() {
            return;
        }
        let state = self.snapshot();
        for v in &state.items {
            v.freeze();
        }
        tracing::trace!(len = state.items.len(), "array frozen");
    }

    /// Runs an edit on a private copy of the content, validates the outcome and
    /// commits it. The edit returns the values it introduced.
    fn mutate(
        &self,
        operation: &'static str,
        edit: impl FnOnce(&mut Vec<Value>) -> Result<Vec<Value>>,
    ) -> Result<()> {
        if self.frozen() {
            return Err(Error::frozen(operation, "Array"));
        }
        let state = self.snapshot();
        let mut items = state.items.clone();
        let added = edit(&mut items)?;
        admit(state.declared.as_ref(), &items, &added)?;
        self.0.update(|s| s.items = items);
        Ok(())
    }

    // ---- Derived containers ---- //

    /// A new array with `value` appended, in the receiver's lifecycle state and
    /// under its declared type.
    pub fn with(&self, value: impl Into<Value>) -> Result<Array> {
        self.with_all([value.into()])
    }

    pub fn with_all(&self, values: impl IntoIterator<Item = Value>) -> Result<Array> {
        let added: Vec<Value> = values.into_iter().collect();
        if added.is_empty() {
            return Ok(self.clone());
        }
        let state = self.snapshot();
        let mut items = state.items.clone();
        items.extend(added.iter().cloned());
        admit(state.declared.as_ref(), &items, &added)?;
        Ok(self.derive(items, state.declared.clone()))
    }

    /// A new array without the first element equal to `value`; the receiver
    /// itself when there is no such element.
    pub fn without(&self, value: &Value) -> Result<Array> {
        let state = self.snapshot();
        let Some(index) = state.items.iter().position(|e| e.equals(value)) else {
            return Ok(self.clone());
        };
        let mut items = state.items.clone();
        items.remove(index);
        admit(state.declared.as_ref(), &items, &[])?;
        Ok(self.derive(items, state.declared.clone()))
    }

    pub fn map(&self, f: impl FnMut(&Value) -> Value) -> Array {
        let items = self.snapshot().items.iter().map(f).collect();
        self.derive(items, None)
    }

    pub fn select(&self, mut pred: impl FnMut(&Value) -> bool) -> Array {
        let state = self.snapshot();
        let items: Vec<Value> = state.items.iter().filter(|v| pred(v)).cloned().collect();
        if items.len() == state.items.len() {
            return self.clone();
        }
        self.derive(items, None)
    }

    pub fn reject(&self, mut pred: impl FnMut(&Value) -> bool) -> Array {
        self.select(|v| !pred(v))
    }

    pub fn reduce(&self, init: Value, f: impl FnMut(Value, &Value) -> Value) -> Value {
        self.snapshot().items.iter().fold(init, f)
    }

    pub fn all(&self, pred: impl FnMut(&Value) -> bool) -> bool {
        self.snapshot().items.iter().all(pred)
    }

    pub fn any(&self, pred: impl FnMut(&Value) -> bool) -> bool {
        self.snapshot().items.iter().any(pred)
    }

    /// True when exactly one element satisfies `pred`.
    pub fn one(&self, mut pred: impl FnMut(&Value) -> bool) -> bool {
        let mut found = false;
        for v in self.snapshot().items.iter() {
            if pred(v) {
                if found {
                    return false;
                }
                found = true;
            }
        }
        found
    }

    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.snapshot().items.iter().position(|e| e.equals(value))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.index_of(value).is_some()
    }

    /// Same length and the same elements, in any order.
    pub fn same_values(&self, other: &Array) -> bool {
        let (a, b) = (self.snapshot(), other.snapshot());
        a.items.len() == b.items.len()
            && a.items.iter().all(|v| b.items.iter().any(|e| e.equals(v)))
            && b.items.iter().all(|v| a.items.iter().any(|e| e.equals(v)))
    }

    /// Stable sort by the total value order. Already ordered content returns the
    /// receiver.
    pub fn sort(&self) -> Array {
        let state = self.snapshot();
        let mut items = state.items.clone();
        items.sort_by(|a, b| compare::total_cmp(&mut Vec::new(), a, b));
        if items.iter().zip(&state.items).all(|(a, b)| a.same_instance(b)) {
            return self.clone();
        }
        self.derive(items, None)
    }

    /// Drops later duplicates (by deep equality), keeping first-seen order.
    pub fn unique(&self) -> Array {
        let state = self.snapshot();
        let mut items: Vec<Value> = Vec::with_capacity(state.items.len());
        for v in &state.items {
            if !items.iter().any(|e| e.equals(v)) {
                items.push(v.clone());
            }
        }
        if items.len() == state.items.len() {
            return self.clone();
        }
        self.derive(items, None)
    }

    /// Pairs consecutive elements into a frozen map; an odd trailing key maps to nil.
    pub fn to_map(&self) -> Map {
        let items = self.to_vec();
        Map::new(
            items
                .chunks(2)
                .map(|pair| (pair[0].clone(), pair.get(1).cloned().unwrap_or(Value::Nil))),
        )
    }

    /// Builds a frozen map from map entries or two-element arrays. `None` when
    /// any element is neither.
    pub fn to_map_from_entries(&self) -> Option<Map> {
        let mut pairs = Vec::with_capacity(self.len());
        for v in self.to_vec() {
            match v {
                Value::Entry(e) => pairs.push((e.key().clone(), e.value().clone())),
                Value::Array(a) => match a.to_vec().as_slice() {
                    [k, v] => pairs.push((k.clone(), v.clone())),
                    _ => return None,
                },
                _ => return None,
            }
        }
        Some(Map::new(pairs))
    }

    /// A container in the receiver's lifecycle state holding `items`.
    fn derive(&self, items: Vec<Value>, declared: Option<Type>) -> Array {
        if self.frozen() {
            return Array::new(items);
        }
        Array::with_state(ArrayState { items, declared }, false)
    }

    // ---- Lifecycle ---- //

    /// `copy(true)` of a frozen array is the array itself; otherwise a new array
    /// with its own backing store. A frozen copy holds frozen copies of mutable
    /// children, which stay mutable in the source.
    pub fn copy(&self, freeze: bool) -> Array {
        if freeze {
            return self.frozen_copy_with(&mut CopyMemo::default());
        }
        let state = self.snapshot();
        Array::with_state((*state).clone(), false)
    }

    pub(crate) fn frozen_copy_with(&self, memo: &mut CopyMemo) -> Array {
        if self.frozen() {
            return self.clone();
        }
        if let Some(Value::Array(copy)) = memo.get(self.addr()) {
            return copy;
        }
        let copy = Array::with_state(ArrayState::default(), true);
        memo.insert(self.addr(), Value::Array(copy.clone()));
        let items: Vec<Value> = self
            .snapshot()
            .items
            .iter()
            .map(|v| v.frozen_copy_with(memo))
            .collect();
        tracing::trace!(len = items.len(), "array frozen copy");
        copy.0.replace(ArrayState { items, declared: None });
        copy
    }
}

/// Error operation names follow the public entry point.
fn rename(e: Error, operation: &'static str) -> Error {
    match e {
        Error::Frozen { kind, .. } => Error::Frozen { operation, kind },
        e => e,
    }
}

/// Checks prospective content against a declared type. `added` are the values
/// the edit introduced; with an element-typed declaration only they need a check.
fn admit(declared: Option<&Type>, items: &[Value], added: &[Value]) -> Result<()> {
    let Some(declared) = declared else {
        return Ok(());
    };
    match declared.resolved() {
        Type::Array(at) => {
            if let Some(bad) = added.iter().find(|v| !at.element.instance(v)) {
                return Err(Error::illegal_assignment(&at.element, bad));
            }
            if !at.bounds.contains(items.len()) {
                return Err(Error::illegal_size(declared, items.len()));
            }
        }
        Type::Tuple(ts) => {
            if let Some((t, bad)) = ts.iter().zip(items).find(|(t, v)| !t.instance(v)) {
                return Err(Error::illegal_assignment(t, bad));
            }
            if items.len() != ts.len() {
                return Err(Error::illegal_size(declared, items.len()));
            }
        }
        t => {
            let content = Value::Array(Array::wrap(items.to_vec()));
            if !t.instance(&content) {
                return Err(Error::illegal_assignment(declared, &content));
            }
        }
    }
    Ok(())
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::value(f, &Value::Array(self.clone()), &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Array {
        Array::strings(xs)
    }

    #[test]
    fn mutable_without_type() {
        let a = Array::mutable(None, vec![Value::Nil]).unwrap();
        assert!(a.get(0).unwrap().is_nil());
        assert!(!a.frozen());
        assert!(a.type_of().same(&Type::default_array()));
    }

    #[test]
    fn max_size_mismatch() {
        let a = Array::mutable(Some(Type::sized_array(0, 1)), vec![Value::from(true)]).unwrap();
        let err = a.add(false).unwrap_err();
        assert!(err.to_string().contains("size constraint"));
        assert!(matches!(a.with(false), Err(Error::IllegalSize { size: 2, .. })));
        assert!(a.with_all(vec![Value::from(false)]).is_err());
        assert!(Array::mutable(Some(Type::sized_array(0, 1)), vec![true.into(), false.into()]).is_err());
        assert!(a.with_all(vec![]).unwrap().same(&a));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn min_size_mismatch() {
        assert!(matches!(
            Array::mutable(Some(Type::sized_array(1, 1)), vec![]),
            Err(Error::IllegalSize { size: 0, .. })
        ));
        let a = Array::mutable(Some(Type::array(Type::Boolean, 1, 1)), vec![true.into()]).unwrap();
        assert!(matches!(a.remove(0), Err(Error::IllegalSize { .. })));
        assert!(matches!(a.remove_value(&Value::from(true)), Err(Error::IllegalSize { .. })));
        assert!(matches!(a.add(true), Err(Error::IllegalSize { .. })));
        assert!(matches!(a.add_all(vec![true.into()]), Err(Error::IllegalSize { .. })));
        assert!(matches!(a.pop(), Err(Error::IllegalSize { .. })));
        assert_eq!(a.to_vec(), vec![Value::from(true)]);
    }

    #[test]
    fn element_type_mismatch() {
        let err = Array::mutable(Some(Type::array_of(Type::String)), vec![true.into()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the value true cannot be assigned to a variable of type string"
        );

        let a = Array::mutable(Some(Type::array_of(Type::String)), vec![]).unwrap();
        a.add("hello").unwrap();
        a.add_all(vec!["hello".into()]).unwrap();
        a.add_all(vec![]).unwrap();
        assert!(matches!(a.add(true), Err(Error::IllegalAssignment { .. })));
        assert!(matches!(a.add_all(vec![true.into()]), Err(Error::IllegalAssignment { .. })));
        assert_eq!(a.len(), 2);

        let t = Type::tuple(vec![Type::String, Type::Integer]);
        let a = Array::mutable(Some(t), vec!["a".into(), 2.into()]).unwrap();
        a.set(0, "hello").unwrap();
        a.set(1, 3).unwrap();
        let err = a.set(0, 3).unwrap_err();
        assert_eq!(err, Error::illegal_assignment(&Type::String, &Value::from(3)));
        assert!(Array::mutable(Some(Type::tuple(vec![Type::String])), vec![true.into()]).is_err());
    }

    #[test]
    fn tuple_typed_mutation() {
        let tt = Type::tuple(vec![Type::String, Type::Integer, Type::Float]);
        let a = Array::mutable(Some(tt.clone()), vec!["world".into(), 2.into(), 3.0.into()]).unwrap();
        assert_eq!(a.add(3).unwrap_err(), Error::illegal_size(&tt, 4));
        assert_eq!(
            a.set(2, 3).unwrap_err(),
            Error::illegal_assignment(&Type::Float, &Value::from(3))
        );
        assert_eq!(a.set(0, "earth").unwrap(), Value::from("world"));
        assert_eq!(a.get(0), Some(Value::from("earth")));
    }

    #[test]
    fn union_declared_type_checks_whole_content() {
        let t = Type::any_of(vec![Type::array_of(Type::String), Type::array_of(Type::Integer)]);
        let a = Array::mutable(Some(t.clone()), vec!["a".into()]).unwrap();
        a.add("b").unwrap();
        let err = a.add(1).unwrap_err();
        assert!(matches!(err, Error::IllegalAssignment { ref expected, .. } if *expected == t));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn set_and_set_type() {
        let a = Array::mutable(Some(Type::array_of(Type::Integer)), vec![]).unwrap();
        a.add(1).unwrap();
        a.set(0, 2).unwrap();
        assert_eq!(a.get(0), Some(Value::from(2)));
        assert!(a.set(0, 1.0).is_err());
        assert!(matches!(a.set(4, 1), Err(Error::IndexOutOfBounds { index: 4, len: 1 })));

        let f = a.copy(true);
        assert_eq!(f.set(0, 1).unwrap_err().to_string(), "Set called on a frozen Array");

        let a = Array::mutable(None, vec![1.into(), 2.0.into(), "three".into()]).unwrap();
        let at = Type::array_of(Type::any_of(vec![Type::Integer, Type::Float, Type::String]));
        a.set_type(at.clone()).unwrap();
        assert!(a.type_of().same(&at));
        assert!(matches!(
            a.set_type(Type::array_of(Type::any_of(vec![Type::Float, Type::String]))),
            Err(Error::IllegalAssignment { .. })
        ));
        a.freeze();
        assert_eq!(
            a.set_type(at).unwrap_err().to_string(),
            "SetType called on a frozen Array"
        );
    }

    #[test]
    fn frozen_constructor_freezes_children() {
        let child = Array::mutable(None, vec!["b".into()]).unwrap();
        let a = Array::new(vec![Value::from(child.clone())]);
        assert!(a.get(0).unwrap().frozen());
        assert!(!child.frozen());
    }

    #[test]
    fn frozen_rejects_every_mutation() {
        let a = strings(&["a"]);
        assert_eq!(a.add("b").unwrap_err().to_string(), "Add called on a frozen Array");
        assert_eq!(
            a.add_all(vec!["b".into()]).unwrap_err().to_string(),
            "AddAll called on a frozen Array"
        );
        assert_eq!(
            a.insert(0, "b").unwrap_err().to_string(),
            "Insert called on a frozen Array"
        );
        assert_eq!(a.remove(0).unwrap_err().to_string(), "Remove called on a frozen Array");
        assert_eq!(
            a.remove_value(&"a".into()).unwrap_err().to_string(),
            "RemoveValue called on a frozen Array"
        );
        assert_eq!(a.pop().unwrap_err().to_string(), "Pop called on a frozen Array");
        assert_eq!(a.to_vec(), vec![Value::from("a")]);
    }

    #[test]
    fn add_insert_on_mutable_copy() {
        let a = strings(&["a"]);
        let m = a.copy(false);
        m.add("b").unwrap();
        assert_eq!(Value::from(a.clone()), Value::from(strings(&["a"])));
        assert_eq!(Value::from(m), Value::from(strings(&["a", "b"])));

        let m = a.copy(false);
        m.insert(0, "b").unwrap();
        assert_eq!(Value::from(m.clone()), Value::from(strings(&["b", "a"])));
        assert!(matches!(m.insert(5, "c"), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn predicates_short_circuit() {
        let a = strings(&["a", "b", "c"]);
        let mut calls = 0;
        assert!(a.all(|e| {
            calls += 1;
            e.as_str().is_some()
        }));
        assert_eq!(calls, 3);

        calls = 0;
        assert!(!a.all(|e| {
            calls += 1;
            e.as_str() == Some("a")
        }));
        assert_eq!(calls, 2);

        calls = 0;
        assert!(a.any(|e| {
            calls += 1;
            e.as_str() == Some("b")
        }));
        assert_eq!(calls, 2);

        calls = 0;
        assert!(a.one(|e| {
            calls += 1;
            e.as_str() == Some("b")
        }));
        assert_eq!(calls, 3);

        let a = strings(&["a", "b", "c", "b"]);
        assert!(!a.one(|e| e.as_str() == Some("b")));
        assert!(!a.one(|e| e.as_str() == Some("d")));
    }

    #[test]
    fn copy_semantics() {
        let child = Array::mutable(None, vec!["c".into()]).unwrap();
        let a = Array::new(vec!["a".into(), "b".into(), child.into()]);
        assert!(a.copy(true).same(&a));
        assert!(a.get(2).unwrap().frozen());

        let c = a.copy(false);
        assert!(!c.frozen());
        assert!(!c.copy(false).same(&c));

        let c = c.copy(true);
        assert!(c.frozen());
        assert!(c.copy(true).same(&c));
        assert!(c.copy(true).copy(true).same(&c.copy(true)));
    }

    #[test]
    fn freeze_is_recursive_and_in_place() {
        let sub = Array::mutable(None, vec!["c".into()]).unwrap();
        let a = Array::mutable(None, vec!["a".into(), "b".into(), sub.clone().into()]).unwrap();
        assert!(!sub.frozen());
        a.freeze();
        assert!(a.frozen());
        assert!(sub.frozen());
        assert!(a.get(2).unwrap().same_instance(&Value::from(sub)));
        a.freeze();
        assert!(a.frozen());
    }

    #[test]
    fn frozen_copy_of_cyclic_array_is_cyclic() {
        let a = Array::mutable(None, vec!["x".into()]).unwrap();
        a.add(a.clone()).unwrap();
        let f = a.copy(true);
        assert!(f.frozen());
        assert!(!a.frozen());
        let inner = f.get(1).unwrap();
        assert!(inner.same_instance(&Value::from(f.clone())));
        assert_eq!(Value::from(f), Value::from(a.clone()));
        assert_eq!(Value::from(a).to_string(), r#"["x",...]"#);
    }

    #[test]
    fn frozen_equality_across_lifecycle() {
        let f = Array::integers(&[1, 2, 3]);
        let a = f.copy(false);
        assert_eq!(Value::from(f.clone()), Value::from(a.clone()));
        a.freeze();
        assert!(a.copy(true).same(&a));
        let b = a.copy(false);
        assert!(!b.same(&a));
        assert!(!b.copy(true).same(&b));
    }

    #[test]
    fn lookup() {
        let a = Array::from_values([Value::from(1), Value::Nil, Value::from(3)]);
        assert_eq!(a.index_of(&Value::from(3)), Some(2));
        assert_eq!(a.index_of(&Value::Nil), Some(1));
        assert_eq!(a.index_of(&Value::from(4)), None);
        assert!(a.contains(&Value::Nil));
    }

    #[test]
    fn map_and_reduce() {
        let a = strings(&["a", "b", "c"]);
        let shifted = a.map(|e| {
            let c = e.as_str().and_then(|s| s.chars().next()).unwrap_or('a');
            Value::from(char::from(c as u8 + 3).to_string())
        });
        assert_eq!(Value::from(shifted.clone()), Value::from(strings(&["d", "e", "f"])));
        assert!(shifted.frozen());
        assert_eq!(
            Value::from(a.map(|_| Value::Nil)),
            Value::from(Array::from_values([Value::Nil, Value::Nil, Value::Nil]))
        );

        let sum = Array::integers(&[1, 2, 3]).reduce(Value::Nil, |memo, v| match memo {
            Value::Nil => v.clone(),
            m => Value::from(m.as_i64().unwrap_or(0) + v.as_i64().unwrap_or(0)),
        });
        assert_eq!(sum, Value::from(6));
        assert!(Array::integers(&[1, 2, 3]).reduce(Value::Nil, |_, _| Value::Nil).is_nil());
    }

    #[test]
    fn pop_remove_remove_value() {
        let a = strings(&["a", "b"]).copy(false);
        assert_eq!(a.pop().unwrap(), Some(Value::from("b")));
        assert_eq!(a.pop().unwrap(), Some(Value::from("a")));
        assert_eq!(a.pop().unwrap(), None);

        let s = Array::integers(&[1, 2, 3, 4, 5]);
        let a = s.copy(false);
        assert_eq!(a.remove(2).unwrap(), Value::from(3));
        assert_eq!(Value::from(a), Value::from(Array::integers(&[1, 2, 4, 5])));

        let a = s.copy(false);
        assert!(a.remove_value(&Value::from(5)).unwrap());
        assert!(!a.remove_value(&Value::from(0)).unwrap());
        assert_eq!(Value::from(a), Value::from(Array::integers(&[1, 2, 3, 4])));
    }

    #[test]
    fn select_reject_same_values() {
        let a = Array::from_values([Value::from(1), Value::from(2), Value::Nil, Value::from(4)]);
        let expected = Value::from(Array::integers(&[1, 2, 4]));
        assert_eq!(Value::from(a.select(|e| !e.is_nil())), expected);
        assert_eq!(Value::from(a.reject(|e| e.is_nil())), expected);
        assert!(a.select(|_| true).same(&a));

        assert!(Array::integers(&[]).same_values(&Array::integers(&[])));
        assert!(Array::integers(&[1, 2, 3]).same_values(&Array::integers(&[3, 2, 1])));
        assert!(!Array::integers(&[1, 2, 4]).same_values(&Array::integers(&[3, 2, 1])));
        assert!(!Array::integers(&[1, 2]).same_values(&Array::integers(&[3, 2, 1])));
    }

    #[test]
    fn sort() {
        let a = strings(&["some", "arbitrary", "unsorted", "words"]);
        let b = a.sort();
        let c = strings(&["arbitrary", "some", "unsorted", "words"]);
        assert_ne!(Value::from(a), Value::from(b.clone()));
        assert_eq!(Value::from(b.clone()), Value::from(c.clone()));
        assert!(c.sort().same(&c));

        let a = Array::from_values([Value::from(3.5), Value::from(-4.2), Value::from(2)]);
        assert_eq!(
            Value::from(a.sort()),
            Value::from(Array::from_values([Value::from(-4.2), Value::from(2), Value::from(3.5)]))
        );

        let single = strings(&["the one and only"]);
        assert!(single.sort().same(&single));

        let mixed = Array::from_values([Value::from(4.2), Value::from("hello"), Value::from(-3.5)]);
        assert_eq!(
            Value::from(mixed.sort()),
            Value::from(Array::from_values([
                Value::from(-3.5),
                Value::from(4.2),
                Value::from("hello")
            ]))
        );
    }

    #[test]
    fn unique() {
        let a = strings(&[
            "and", "some", "more", "arbitrary", "unsorted", "yes", "unsorted", "and", "yes",
            "arbitrary", "words",
        ]);
        let b = a.unique();
        let c = strings(&["and", "some", "more", "arbitrary", "unsorted", "yes", "words"]);
        assert_eq!(Value::from(b.clone()), Value::from(c.clone()));
        assert!(!b.same(&c));
        assert!(c.unique().same(&c));
    }

    #[test]
    fn to_map() {
        let m = strings(&["a", "b", "c", "d"]).to_map();
        assert_eq!(m.get("a"), Some(Value::from("b")));
        assert_eq!(m.get("c"), Some(Value::from("d")));

        let m = strings(&["a", "b", "c"]).to_map();
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("c"), Some(Value::Nil));
        assert!(m.frozen());
    }

    #[test]
    fn to_map_from_entries() {
        let a = Array::from_values([strings(&["a", "b"]), strings(&["c", "d"])]);
        let m = a.to_map_from_entries().unwrap();
        let expected = Map::new([("a", "b"), ("c", "d")]);
        assert_eq!(Value::from(m.clone()), Value::from(expected.clone()));

        let again = m.entries().to_map_from_entries().unwrap();
        assert_eq!(Value::from(again), Value::from(expected));

        let bad = Array::from_values([Value::from(strings(&["a", "b"])), Value::from("c")]);
        assert!(bad.to_map_from_entries().is_none());
        let triple = Array::from_values([strings(&["a", "b", "c"])]);
        assert!(triple.to_map_from_entries().is_none());

        let pair = Array::mutable(None, vec!["k".into(), "v".into()]).unwrap();
        let m = Array::mutable(None, vec![pair.clone().into()])
            .unwrap()
            .to_map_from_entries()
            .unwrap();
        pair.add("extra").unwrap();
        assert_eq!(m.get("k"), Some(Value::from("v")));
    }

    #[test]
    fn with_and_without() {
        let a = strings(&["a"]);
        let b = a.with("b").unwrap();
        assert!(b.frozen());
        assert_eq!(Value::from(b.clone()), Value::from(strings(&["a", "b"])));
        assert_eq!(a.len(), 1);
        assert!(b.without(&Value::from("c")).unwrap().same(&b));
        assert_eq!(Value::from(b.without(&Value::from("a")).unwrap()), Value::from(strings(&["b"])));
    }
}
