//! Insertion-ordered associative containers and their entries.
//!
//! Keys are always stored as frozen copies so that a key's hash cannot change
//! while it sits in the table. Values follow the same lifecycle rules as array
//! elements: a frozen map only holds frozen values.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::array::Array;
use crate::backing::Backing;
use crate::error::{Error, Result};
use crate::render;
use crate::types::Type;
use crate::value::{CopyMemo, Value};

#[derive(Clone)]
pub struct Map(Arc<Backing<MapState>>);

#[derive(Clone, Default)]
pub(crate) struct MapState {
    pub(crate) entries: IndexMap<Value, Value>,
    pub(crate) declared: Option<Type>,
}

impl Map {
    // ---- Construction ---- //

    /// A frozen map. Later duplicates of a key replace earlier ones.
    pub fn new<I, K, V>(entries: I) -> Map
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut memo = CopyMemo::default();
        let entries = entries
            .into_iter()
            .map(|(k, v)| {
                (
                    k.into().frozen_copy_with(&mut memo),
                    v.into().frozen_copy_with(&mut memo),
                )
            })
            .collect();
        Map::with_state(MapState { entries, declared: None }, true)
    }

    /// An empty, unconstrained mutable map.
    pub fn mutable() -> Map {
        Map::with_state(MapState::default(), false)
    }

    /// A mutable map constrained by `declared` holding `entries`.
    pub fn mutable_from<I, K, V>(declared: Option<Type>, entries: I) -> Result<Map>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let added: Vec<(Value, Value)> = entries
            .into_iter()
            .map(|(k, v)| (k.into().frozen_copy(), v.into()))
            .collect();
        let entries: IndexMap<Value, Value> = added.iter().cloned().collect();
        admit(declared.as_ref(), &entries, &added)?;
        Ok(Map::with_state(MapState { entries, declared }, false))
    }

    pub(crate) fn untyped(entries: IndexMap<Value, Value>) -> Map {
        Map::with_state(MapState { entries, declared: None }, false)
    }

    fn with_state(state: MapState, frozen: bool) -> Map {
        Map(Arc::new(Backing::new(state, frozen)))
    }

    pub(crate) fn wrap(entries: IndexMap<Value, Value>) -> Map {
        Map::with_state(MapState { entries, declared: None }, true)
    }

    // ---- Inspection ---- //

    pub fn len(&self) -> usize {
        self.snapshot().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: impl Into<Value>) -> Option<Value> {
        self.snapshot().entries.get(&key.into()).cloned()
    }

    pub fn contains_key(&self, key: impl Into<Value>) -> bool {
        self.snapshot().entries.contains_key(&key.into())
    }

    pub fn frozen(&self) -> bool {
        self.0.is_frozen()
    }

    pub fn declared_type(&self) -> Option<Type> {
        self.snapshot().declared.clone()
    }

    /// The exact type when frozen, otherwise the declared type (`map[any]any` if
    /// none).
    pub fn type_of(&self) -> Type {
        if self.frozen() {
            return Type::ExactMap(self.clone());
        }
        self.declared_type().unwrap_or_else(Type::default_map)
    }

    pub fn same(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn snapshot(&self) -> Arc<MapState> {
        self.0.snapshot()
    }

    /// Frozen array of the keys, in insertion order.
    pub fn keys(&self) -> Array {
        Array::wrap(self.snapshot().entries.keys().cloned().collect())
    }

    /// Frozen array of (frozen copies of) the values, in insertion order.
    pub fn values(&self) -> Array {
        Array::new(self.snapshot().entries.values().cloned().collect())
    }

    /// Frozen array of frozen entries: a snapshot unaffected by later mutation.
    pub fn entries(&self) -> Array {
        let mut memo = CopyMemo::default();
        let items = self
            .snapshot()
            .entries
            .iter()
            .map(|(k, v)| Value::Entry(MapEntry::from_parts(k.clone(), v.frozen_copy_with(&mut memo))))
            .collect();
        Array::wrap(items)
    }

    /// Visits live entries; an entry is frozen when its value is.
    pub fn each(&self, mut f: impl FnMut(&MapEntry)) {
        for (k, v) in self.snapshot().entries.iter() {
            f(&MapEntry::from_parts(k.clone(), v.clone()));
        }
    }

    pub fn all(&self, mut pred: impl FnMut(&MapEntry) -> bool) -> bool {
        self.snapshot()
            .entries
            .iter()
            .all(|(k, v)| pred(&MapEntry::from_parts(k.clone(), v.clone())))
    }

    pub fn any(&self, mut pred: impl FnMut(&MapEntry) -> bool) -> bool {
        self.snapshot()
            .entries
            .iter()
            .any(|(k, v)| pred(&MapEntry::from_parts(k.clone(), v.clone())))
    }

    pub fn any_key(&self, pred: impl FnMut(&Value) -> bool) -> bool {
        self.snapshot().entries.keys().any(pred)
    }

    pub fn any_value(&self, pred: impl FnMut(&Value) -> bool) -> bool {
        self.snapshot().entries.values().any(pred)
    }

    // ---- Mutation ---- //

    /// Associates `value` with `key`, returning the value it replaced.
    pub fn put(&self, key: impl Into<Value>, value: impl Into<Value>) -> Result<Option<Value>> {
        let (key, value) = (key.into().frozen_copy(), value.into());
        let mut previous = None;
        self.mutate("Put", |entries| {
            previous = entries.insert(key.clone(), value.clone());
            Ok(vec![(key, value)])
        })?;
        Ok(previous)
    }

    pub fn put_all(&self, other: &Map) -> Result<()> {
        let added: Vec<(Value, Value)> = other
            .snapshot()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.mutate("PutAll", |entries| {
            entries.extend(added.iter().cloned());
            Ok(added)
        })
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&self, key: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        let mut removed = None;
        self.mutate("Remove", |entries| {
            removed = entries.shift_remove(&key);
            Ok(Vec::new())
        })?;
        Ok(removed)
    }

    pub fn remove_all(&self, keys: &Array) -> Result<()> {
        let keys = keys.to_vec();
        self.mutate("RemoveAll", |entries| {
            for k in &keys {
                entries.shift_remove(k);
            }
            Ok(Vec::new())
        })
    }

    /// Replaces the declared type after checking the current content against it.
    pub fn set_type(&self, declared: Type) -> Result<()> {
        if self.frozen() {
            return Err(Error::frozen("SetType", "Map"));
        }
        let entries = self.snapshot().entries.clone();
        let all: Vec<(Value, Value)> = entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        admit(Some(&declared), &entries, &all)?;
        tracing::trace!(declared = %declared, "map type replaced");
        self.0.update(|state| state.declared = Some(declared));
        Ok(())
    }

    /// Freezes in place, then freezes mutable values in place. Keys are frozen
    /// already.
    pub fn freeze(&self) {
        if !self.0.mark_frozen() {
            return;
        }
        let state = self.snapshot();
        for v in state.entries.values() {
            v.freeze();
        }
        tracing::trace!(len = state.entries.len(), "map frozen");
    }

    fn mutate(
        &self,
        operation: &'static str,
        edit: impl FnOnce(&mut IndexMap<Value, Value>) -> Result<Vec<(Value, Value)>>,
    ) -> Result<()> {
        if self.frozen() {
            return Err(Error::frozen(operation, "Map"));
        }
        let state = self.snapshot();
        let mut entries = state.entries.clone();
        let added = edit(&mut entries)?;
        admit(state.declared.as_ref(), &entries, &added)?;
        self.0.update(|s| s.entries = entries);
        Ok(())
    }

    // ---- Derived containers ---- //

    /// A new map with `key` associated to `value`; the receiver itself when it
    /// already holds that association.
    pub fn with(&self, key: impl Into<Value>, value: impl Into<Value>) -> Result<Map> {
        let (key, value) = (key.into(), value.into());
        let state = self.snapshot();
        if state.entries.get(&key).is_some_and(|v| v.equals(&value)) {
            return Ok(self.clone());
        }
        let mut entries = state.entries.clone();
        let added = vec![(key.frozen_copy(), value)];
        entries.extend(added.iter().cloned());
        admit(state.declared.as_ref(), &entries, &added)?;
        Ok(self.derive(entries, state.declared.clone()))
    }

    /// A new map without `key`; the receiver itself when the key is absent.
    pub fn without(&self, key: impl Into<Value>) -> Result<Map> {
        let key = key.into();
        let state = self.snapshot();
        if !state.entries.contains_key(&key) {
            return Ok(self.clone());
        }
        let mut entries = state.entries.clone();
        entries.shift_remove(&key);
        admit(state.declared.as_ref(), &entries, &[])?;
        Ok(self.derive(entries, state.declared.clone()))
    }

    pub fn without_all(&self, keys: &Array) -> Result<Map> {
        let state = self.snapshot();
        let keys = keys.to_vec();
        if !keys.iter().any(|k| state.entries.contains_key(k)) {
            return Ok(self.clone());
        }
        let mut entries = state.entries.clone();
        for k in &keys {
            entries.shift_remove(k);
        }
        admit(state.declared.as_ref(), &entries, &[])?;
        Ok(self.derive(entries, state.declared.clone()))
    }

    /// Entries of `other` added to (or replacing those of) the receiver. When the
    /// result would equal the receiver, the receiver is returned; a frozen `other`
    /// is returned for a frozen, empty receiver.
    pub fn merge(&self, other: &Map) -> Result<Map> {
        if self.same(other) || other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() && self.frozen() && other.frozen() {
            return Ok(other.clone());
        }
        let state = self.snapshot();
        let theirs = other.snapshot();
        let unchanged = theirs
            .entries
            .iter()
            .all(|(k, v)| state.entries.get(k).is_some_and(|mine| mine.equals(v)));
        if unchanged {
            return Ok(self.clone());
        }
        let added: Vec<(Value, Value)> = theirs
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut entries = state.entries.clone();
        entries.extend(added.iter().cloned());
        admit(state.declared.as_ref(), &entries, &added)?;
        Ok(self.derive(entries, state.declared.clone()))
    }

    fn derive(&self, entries: IndexMap<Value, Value>, declared: Option<Type>) -> Map {
        if self.frozen() {
            return Map::new(entries);
        }
        Map::with_state(MapState { entries, declared }, false)
    }

    // ---- Lifecycle ---- //

    /// `copy(true)` of a frozen map is the map itself; otherwise a new map with
    /// its own backing store. A frozen copy holds frozen copies of mutable
    /// values, which stay mutable in the source.
    pub fn copy(&self, freeze: bool) -> Map {
        if freeze {
            return self.frozen_copy_with(&mut CopyMemo::default());
        }
        Map::with_state((*self.snapshot()).clone(), false)
    }

    pub(crate) fn frozen_copy_with(&self, memo: &mut CopyMemo) -> Map {
        if self.frozen() {
            return self.clone();
        }
        if let Some(Value::Map(copy)) = memo.get(self.addr()) {
            return copy;
        }
        let copy = Map::with_state(MapState::default(), true);
        memo.insert(self.addr(), Value::Map(copy.clone()));
        let entries: IndexMap<Value, Value> = self
            .snapshot()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.frozen_copy_with(memo)))
            .collect();
        tracing::trace!(len = entries.len(), "map frozen copy");
        copy.0.replace(MapState { entries, declared: None });
        copy
    }
}

/// Checks prospective entries against a declared type. `added` are the pairs
/// the edit introduced; with a key/value-typed declaration only they need a
/// check.
fn admit(
    declared: Option<&Type>,
    entries: &IndexMap<Value, Value>,
    added: &[(Value, Value)],
) -> Result<()> {
    let Some(declared) = declared else {
        return Ok(());
    };
    match declared.resolved() {
        Type::Map(mt) => {
            for (k, v) in added {
                if !mt.key.instance(k) {
                    return Err(Error::illegal_assignment(&mt.key, k));
                }
                if !mt.value.instance(v) {
                    return Err(Error::illegal_assignment(&mt.value, v));
                }
            }
            if !mt.bounds.contains(entries.len()) {
                return Err(Error::illegal_size(declared, entries.len()));
            }
        }
        t => {
            let content = Value::Map(Map::wrap(entries.clone()));
            if !t.instance(&content) {
                return Err(Error::illegal_assignment(declared, &content));
            }
        }
    }
    Ok(())
}

// --------------------------------- Entries --------------------------------- //

/// A key/value pair. The key is frozen; the entry counts as frozen when its
/// value is.
#[derive(Clone)]
pub struct MapEntry(Arc<EntryParts>);

struct EntryParts {
    key: Value,
    value: Value,
}

impl MapEntry {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> MapEntry {
        MapEntry::from_parts(key.into().frozen_copy(), value.into())
    }

    fn from_parts(key: Value, value: Value) -> MapEntry {
        MapEntry(Arc::new(EntryParts { key, value }))
    }

    pub fn key(&self) -> &Value {
        &self.0.key
    }

    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub fn frozen(&self) -> bool {
        self.0.value.frozen()
    }

    /// The entry itself when frozen, otherwise an entry over a frozen copy of
    /// the value.
    pub fn frozen_copy(&self) -> MapEntry {
        self.frozen_copy_with(&mut CopyMemo::default())
    }

    pub(crate) fn frozen_copy_with(&self, memo: &mut CopyMemo) -> MapEntry {
        if self.frozen() {
            return self.clone();
        }
        MapEntry::from_parts(self.0.key.clone(), self.0.value.frozen_copy_with(memo))
    }

    pub fn type_of(&self) -> Type {
        Type::exact(Value::Entry(self.clone()))
    }

    pub fn same(&self, other: &MapEntry) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::value(f, &Value::Map(self.clone()), &mut Vec::new())
    }
}

impl fmt::Debug for MapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::value(f, &Value::Entry(self.clone()), &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Map {
        Map::new([
            (Value::from("first"), Value::from(1)),
            (Value::from("second"), Value::from(2.0)),
            (Value::from("third"), Value::from("three")),
        ])
    }

    fn assert_map(m: &Map, expected: Map) {
        assert_eq!(Value::from(m.clone()), Value::from(expected));
    }

    #[test]
    fn frozen_map_is_detached_from_source() {
        let m = Map::new([("first", 1), ("second", 2)]);
        assert_eq!(m.get("first"), Some(Value::from(1)));
        assert!(m.copy(true).same(&m));
        assert!(m.frozen());
        assert_eq!(m.put("third", 3).unwrap_err().to_string(), "Put called on a frozen Map");
    }

    #[test]
    fn mutable_typed_map() {
        let t = Type::map_of(Type::String, Type::String);
        let m = Map::mutable_from(Some(t.clone()), Vec::<(Value, Value)>::new()).unwrap();
        assert_eq!(m.len(), 0);
        assert_eq!(m.type_of(), t);
        m.put("hi", "there").unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(
            m.put("hi", 1).unwrap_err(),
            Error::illegal_assignment(&Type::String, &Value::from(1))
        );
        assert_eq!(
            m.put(1, "x").unwrap_err(),
            Error::illegal_assignment(&Type::String, &Value::from(1))
        );
    }

    #[test]
    fn nil_keys() {
        let m = Map::new([(Value::Nil, Value::from(5))]);
        assert!(Type::default_map().instance(&Value::from(m.clone())));
        assert_eq!(m.get(0), None);
        assert_eq!(m.get(Value::Nil), Some(Value::from(5)));
    }

    #[test]
    fn predicates() {
        let m = sample();
        assert!(!m.any(|e| e.key().as_str() == Some("fourth")));
        assert!(m.any(|e| e.key().as_str() == Some("second")));
        assert!(m.any_key(|k| k.as_str() == Some("third")));
        assert!(!m.any_key(|k| k.as_str() == Some("fourth")));
        assert!(m.any_value(|v| v.as_str() == Some("three")));
        assert!(!m.any_value(|v| v.as_str() == Some("four")));
        assert!(m.all(|e| e.key().as_str().is_some()));
    }

    #[test]
    fn put_and_put_all() {
        let m = Map::mutable();
        assert_eq!(m.put(1, "hello").unwrap(), None);
        assert_eq!(m.put(1, "hello").unwrap(), Some(Value::from("hello")));
        assert_map(&m, Map::new([(1, "hello")]));

        let m = Map::mutable();
        m.put_all(&Map::new([("first", 1), ("second", 2)])).unwrap();
        m.put_all(&Map::new(Vec::<(Value, Value)>::new())).unwrap();
        m.put_all(&Map::new([("first", 1), ("second", 2)])).unwrap();
        assert_map(&m, Map::new([("first", 1), ("second", 2)]));

        let frozen = Map::new([("first", 1)]);
        assert!(matches!(frozen.put_all(&Map::new([("first", 1)])), Err(Error::Frozen { .. })));
    }

    #[test]
    fn freeze_is_recursive() {
        let m = Map::mutable();
        let inner = Map::mutable();
        inner.put("hello", "world").unwrap();
        m.put(1, inner.clone()).unwrap();
        m.freeze();
        assert!(inner.frozen());
        assert!(m.get(1).unwrap().same_instance(&Value::from(inner)));
    }

    #[test]
    fn frozen_copy_leaves_source_mutable() {
        let m = Map::mutable();
        let inner = Map::mutable();
        let key = Array::mutable(None, vec!["the".into(), "key".into()]).unwrap();
        inner.put(1.0, "world").unwrap();
        m.put(key.clone(), inner.clone()).unwrap();
        m.put(1, "one").unwrap();
        m.put(2, Array::strings(&["x", "y"])).unwrap();
        m.put(
            Array::strings(&["a", "b"]),
            Array::mutable(None, vec!["x".into(), "y".into()]).unwrap(),
        )
        .unwrap();

        assert!(m.entries().all(|e| e.frozen()));
        m.each(|e| {
            if e.frozen() {
                assert!(Type::Integer.instance(e.key()));
            }
        });

        let copy = m.copy(true);
        assert!(!m.all(|e| e.frozen()));
        assert!(copy.all(|e| e.frozen()));
        assert!(copy.get(key.clone()).unwrap().frozen());
        assert!(!key.frozen());
        assert!(!inner.frozen());

        m.freeze();
        assert!(m.all(|e| e.frozen()));
    }

    #[test]
    fn remove_and_remove_all() {
        let m = sample().copy(false);
        m.remove("first").unwrap();
        assert_map(&m, Map::new([("second", Value::from(2.0)), ("third", Value::from("three"))]));
        assert_eq!(m.remove("third").unwrap(), Some(Value::from("three")));
        assert_eq!(m.remove("fourth").unwrap(), None);
        assert_eq!(m.len(), 1);
        assert!(matches!(sample().remove("first"), Err(Error::Frozen { .. })));

        let m = sample().copy(false);
        m.remove_all(&Array::strings(&["second", "third"])).unwrap();
        assert_map(&m, Map::new([("first", 1)]));
        m.remove_all(&Array::strings(&[])).unwrap();
        m.remove_all(&Array::strings(&["first", "third"])).unwrap();
        assert!(m.is_empty());
        assert!(sample().remove_all(&Array::strings(&["first"])).is_err());
    }

    #[test]
    fn set_type() {
        let m = sample().copy(false);
        let mt = Type::map_of(
            Type::String,
            Type::any_of(vec![Type::Integer, Type::Float, Type::String]),
        );
        m.set_type(mt.clone()).unwrap();
        assert!(m.type_of().same(&mt));
        assert!(matches!(
            m.set_type(Type::map_of(Type::String, Type::any_of(vec![Type::Float, Type::String]))),
            Err(Error::IllegalAssignment { .. })
        ));
        m.freeze();
        assert_eq!(m.set_type(mt).unwrap_err().to_string(), "SetType called on a frozen Map");
    }

    #[test]
    fn sized_map_scenario() {
        let t = Type::map(Type::String, Type::Integer, 3, 3);
        assert!(matches!(
            Map::mutable_from(Some(t.clone()), [("a", 1), ("b", 2)]),
            Err(Error::IllegalSize { size: 2, .. })
        ));
        let m = Map::mutable_from(Some(t.clone()), [("a", 1), ("b", 2), ("c", 3)]).unwrap();
        assert_eq!(m.put("d", 4).unwrap_err(), Error::illegal_size(&t, 4));
        assert_eq!(m.len(), 3);
        assert!(!m.contains_key("d"));
        m.put("a", 10).unwrap();
        assert_eq!(m.get("a"), Some(Value::from(10)));
    }

    #[test]
    fn with_without_merge() {
        let m = Map::new(Vec::<(Value, Value)>::new()).with(1, "a").unwrap();
        assert_map(&m, Map::new([(1, "a")]));
        let mb = m.with(2, "b").unwrap();
        assert_map(&m, Map::new([(1, "a")]));
        assert_map(&mb, Map::new([(1, "a"), (2, "b")]));
        assert!(m.with(1, "a").unwrap().same(&m));

        let om = sample();
        let m = om.without("second").unwrap();
        assert_map(&m, Map::new([("first", Value::from(1)), ("third", Value::from("three"))]));
        assert_eq!(om.len(), 3);
        let m = m.without("first").unwrap();
        assert!(m.without("first").unwrap().same(&m));

        let m = om.without_all(&Array::strings(&["first", "second"])).unwrap();
        assert_map(&m, Map::new([("third", "three")]));
        assert!(m.without_all(&Array::strings(&[])).unwrap().same(&m));
        assert!(m.without_all(&Array::strings(&["first"])).unwrap().same(&m));

        let m1 = sample();
        let m2 = Map::new([("third", "tres"), ("fourth", "cuatro")]);
        assert_map(
            &m1.merge(&m2).unwrap(),
            Map::new([
                ("first", Value::from(1)),
                ("second", Value::from(2.0)),
                ("third", Value::from("tres")),
                ("fourth", Value::from("cuatro")),
            ]),
        );
        let empty = Map::new(Vec::<(Value, Value)>::new());
        assert!(m1.merge(&m1).unwrap().same(&m1));
        assert!(m1.merge(&empty).unwrap().same(&m1));
        assert!(empty.merge(&m1).unwrap().same(&m1));
    }

    #[test]
    fn merge_into_empty_mutable_map_is_detached() {
        let other = Map::mutable();
        other.put("a", 1).unwrap();
        let merged = Map::mutable().merge(&other).unwrap();
        assert!(!merged.same(&other));
        assert!(!merged.frozen());
        merged.put("b", 2).unwrap();
        assert_eq!(other.len(), 1);
        assert!(!other.contains_key("b"));
        assert_map(&merged, Map::new([("a", 1), ("b", 2)]));
    }

    #[test]
    fn typed_with_is_validated() {
        let t = Type::map(Type::String, Type::Integer, 0, 1);
        let m = Map::mutable_from(Some(t), [("a", 1)]).unwrap();
        assert!(matches!(m.with("b", 2), Err(Error::IllegalSize { .. })));
        assert!(matches!(m.with("a", "x"), Err(Error::IllegalAssignment { .. })));
        assert!(!m.with("a", 2).unwrap().frozen());
    }

    #[test]
    fn hash_and_equality_with_self_reference() {
        let m1 = Map::mutable();
        m1.put("first", 1).unwrap();
        m1.put("self", m1.clone()).unwrap();
        let v1 = Value::from(m1.clone());
        assert_eq!(v1.hash_code(), v1.hash_code());
        assert_ne!(v1, Value::from(Array::strings(&["first", "self"])));

        let m2 = Map::mutable();
        m2.put("first", 1).unwrap();
        m2.put("self", m2.clone()).unwrap();
        assert_eq!(v1, Value::from(m2));

        let m3 = Map::mutable();
        m3.put("second", 1).unwrap();
        m3.put("self", m3.clone()).unwrap();
        assert_ne!(v1, Value::from(m3));
    }

    #[test]
    fn keys_and_values() {
        let m = sample();
        assert!(m.keys().same_values(&Array::strings(&["first", "second", "third"])));
        assert!(m.values().same_values(&Array::from_values([
            Value::from(1),
            Value::from(2.0),
            Value::from("three")
        ])));
        let mixed = Map::new([(Value::from("hello"), Value::from("world")), (Value::from(2), Value::from(2.0))]);
        let kt = mixed.type_of().key_type().unwrap();
        assert!(Type::any_of(vec![Type::String, Type::Integer]).assignable(&kt));
        assert!(Type::array_of(Type::any_of(vec![Type::String, Type::Integer])).instance(&mixed.keys().into()));
        assert!(Type::array_of(Type::any_of(vec![Type::String, Type::Float])).instance(&mixed.values().into()));
    }

    #[test]
    fn exact_type() {
        let m1 = Map::new([("a", 3), ("b", 4)]);
        let t1 = m1.type_of();
        let t2 = Map::new([("a", 1), ("b", 2)]).type_of();
        let t3 = Map::new([("b", 2)]).type_of();
        assert!(t1.assignable(&t1));
        assert!(!t1.assignable(&t2));
        assert!(t1.instance(&Value::from(m1)));
        assert!(!t1.instance(&Value::from("a")));
        assert!(Type::default_map().assignable(&t1));
        assert!(!t1.assignable(&Type::default_map()));
        assert!(!t1.assignable(&t3));
        assert!(Type::map_of(Type::String, Type::Integer).assignable(&t1));
        assert!(!Type::map_of(Type::String, Type::String).assignable(&t1));
        assert!(!Type::map(Type::String, Type::Integer, 3, 3).assignable(&t1));
        assert!(!Type::String.assignable(&t1));
        assert_ne!(t1, t2);
        assert_eq!(t1.to_string(), r#"{"a":3,"b":4}"#);
        assert!(t1.type_of().instance(&Value::from(t1.clone())));

        let empty = Map::new(Vec::<(Value, Value)>::new()).type_of();
        assert!(empty.assignable(&Type::sized_map(0, 0)));
    }

    #[test]
    fn sized_type() {
        let mt = Type::map_of(Type::String, Type::Integer);
        let m1 = Value::from(Map::new([("a", 1), ("b", 2)]));
        let m2 = Value::from(Map::new([("a", Value::from(1)), ("b", Value::from(2.0))]));
        let m3 = Value::from(Map::new([("a", 1), ("b", 2), ("c", 3)]));
        assert!(!mt.assignable(&Type::Any));
        assert!(mt.instance(&m1));
        assert!(!mt.instance(&m2));

        let mtz = Type::map(Type::String, Type::Integer, 3, 3);
        assert!(mtz.instance(&m3));
        assert!(!mtz.instance(&m1));
        assert!(mt.assignable(&mtz));
        assert!(!mtz.assignable(&mt));
        assert_ne!(mt.hash_code(), mtz.hash_code());
        assert_eq!(mt.to_string(), "map[string]int");

        assert!(Type::map_of(Type::String, Type::Any).instance(&m2));
        assert!(!Type::map_of(Type::Any, Type::Integer).instance(&m2));
    }

    #[test]
    fn entries() {
        Map::new([("a", 3)]).each(|e| {
            assert!(e.frozen());
            assert!(e.frozen_copy().same(e));
            assert_eq!(Value::from(e.clone()).to_string(), r#""a":3"#);
            let vt = e.type_of();
            assert!(vt.assignable(&vt));
            assert!(!vt.assignable(&Type::String));
            assert!(vt.instance(&Value::from(e.clone())));
            assert!(!vt.instance(&Value::from(vt.clone())));
            assert_eq!(vt.to_string(), r#""a":3"#);
        });

        let m = Map::mutable();
        m.put("a", Array::mutable(None, vec![1.into(), 2.into()]).unwrap()).unwrap();
        m.each(|e| {
            assert!(!e.frozen());
            assert!(!e.frozen_copy().same(e));
            assert_eq!(e.type_of().to_string(), r#""a":{1,2}"#);
        });
    }
}
