//! Deep comparison engine: equality, three-way ordering, hashing and the total
//! sort order.
//!
//! Every entry point threads a `seen` path of the deep values (arrays, maps,
//! entries) currently being walked on the left side. Reaching one of them again
//! means the walk has looped; equality and ordering then assume "equal" and
//! hashing contributes 0, which is what makes the walk terminate on cyclic
//! graphs. The path is pushed before descending and popped on the way out.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::array::Array;
use crate::guard::recursion_hit;
use crate::map::{Map, MapEntry};
use crate::value::Value;

const NIL_HASH: u64 = 131;

// -------------------------------- Equality -------------------------------- //

pub(crate) fn equals(seen: &mut Vec<Value>, a: &Value, b: &Value) -> bool {
    if a.same_instance(b) {
        return true;
    }
    if !a.is_deep() {
        return shallow_equals(a, b);
    }
    if recursion_hit(seen, a) {
        return true;
    }
    if !b.is_deep() {
        return false;
    }
    seen.push(a.clone());
    let result = deep_equals(seen, a, b);
    seen.pop();
    result
}

fn shallow_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Type(x), Value::Type(y)) => x == y,
        (Value::Error(x), Value::Error(y)) => x == y,
        _ => false,
    }
}

fn deep_equals(seen: &mut Vec<Value>, a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => slice_equals(seen, &x.to_vec(), &y.to_vec()),
        (Value::Map(x), Value::Map(y)) => map_equals(seen, x, y),
        (Value::Entry(x), Value::Entry(y)) => {
            equals(seen, x.key(), y.key()) && equals(seen, x.value(), y.value())
        }
        _ => false,
    }
}

pub(crate) fn slice_equals(seen: &mut Vec<Value>, a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(seen, x, y))
}

/// Same size and the same key/value associations, regardless of order.
fn map_equals(seen: &mut Vec<Value>, a: &Map, b: &Map) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let other = b.snapshot();
    a.snapshot().entries.iter().all(|(k, v)| match other.entries.get(k) {
        Some(ov) => equals(seen, v, ov),
        None => false,
    })
}

// ------------------------------- Ordering --------------------------------- //

pub(crate) fn compare(seen: &mut Vec<Value>, a: &Value, b: &Value) -> Option<Ordering> {
    if a.same_instance(b) {
        return Some(Ordering::Equal);
    }
    match (a, b) {
        (Value::Nil, Value::Nil) => return Some(Ordering::Equal),
        (Value::Nil, _) => return Some(Ordering::Less),
        (_, Value::Nil) => return Some(Ordering::Greater),
        _ => {}
    }
    if !a.is_deep() {
        return shallow_compare(a, b);
    }
    if !b.is_deep() {
        // a deep value never orders against a scalar
        return None;
    }
    if recursion_hit(seen, a) {
        return Some(Ordering::Equal);
    }
    seen.push(a.clone());
    let result = deep_compare(seen, a, b);
    seen.pop();
    result
}

fn shallow_compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => Some(x.cmp(y)),
        (Value::Integer(x), Value::Float(y)) => Some(int_float_cmp(*x, y.0)),
        (Value::Float(x), Value::Integer(y)) => Some(int_float_cmp(*y, x.0).reverse()),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn deep_compare(seen: &mut Vec<Value>, a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => array_compare(seen, x, y),
        (Value::Map(x), Value::Map(y)) => {
            if map_equals(seen, x, y) {
                Some(Ordering::Equal)
            } else {
                match x.len().cmp(&y.len()) {
                    Ordering::Equal => None,
                    ord => Some(ord),
                }
            }
        }
        (Value::Entry(x), Value::Entry(y)) => match compare(seen, x.key(), y.key())? {
            Ordering::Equal => compare(seen, x.value(), y.value()),
            ord => Some(ord),
        },
        _ => None,
    }
}

/// Length first, then element by element.
fn array_compare(seen: &mut Vec<Value>, a: &Array, b: &Array) -> Option<Ordering> {
    let (xs, ys) = (a.to_vec(), b.to_vec());
    if xs.len() != ys.len() {
        return Some(xs.len().cmp(&ys.len()));
    }
    for (x, y) in xs.iter().zip(&ys) {
        match compare(seen, x, y)? {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
    }
    Some(Ordering::Equal)
}

/// Total order used for sorting heterogeneous content: group by kind, then
/// order within the kind. Never fails.
pub(crate) fn total_cmp(seen: &mut Vec<Value>, a: &Value, b: &Value) -> Ordering {
    if a.same_instance(b) {
        return Ordering::Equal;
    }
    let by_kind = a.kind().cmp(&b.kind());
    if by_kind != Ordering::Equal {
        return by_kind;
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            if recursion_hit(seen, a) {
                return Ordering::Equal;
            }
            let (xs, ys) = (x.to_vec(), y.to_vec());
            seen.push(a.clone());
            let result = xs.len().cmp(&ys.len()).then_with(|| {
                xs.iter()
                    .zip(&ys)
                    .map(|(x, y)| total_cmp(seen, x, y))
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
            seen.pop();
            result
        }
        (Value::Map(x), Value::Map(y)) => x.len().cmp(&y.len()),
        (Value::Entry(x), Value::Entry(y)) => {
            total_cmp(seen, x.key(), y.key()).then_with(|| total_cmp(seen, x.value(), y.value()))
        }
        (Value::Type(x), Value::Type(y)) => x.to_string().cmp(&y.to_string()),
        (Value::Error(x), Value::Error(y)) => x.to_string().cmp(&y.to_string()),
        (Value::Float(x), Value::Float(y)) => x.cmp(y),
        (Value::Integer(x), Value::Float(y)) => int_float_cmp(*x, y.0),
        (Value::Float(x), Value::Integer(y)) => int_float_cmp(*y, x.0).reverse(),
        _ => Ordering::Equal,
    }
}

/// Exact order of an integer against a float. The float is split into its
/// integral part, compared as an integer, and its fraction. NaN sorts above
/// every integer, as it does among `OrderedFloat`s.
fn int_float_cmp(i: i64, f: f64) -> Ordering {
    // 2^63, the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() || f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => {
            let fraction = f - whole;
            if fraction > 0.0 {
                Ordering::Less
            } else if fraction < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        ord => ord,
    }
}

// -------------------------------- Hashing --------------------------------- //

pub(crate) fn hash_code(seen: &mut Vec<Value>, v: &Value) -> u64 {
    if !v.is_deep() {
        return shallow_hash(v);
    }
    if recursion_hit(seen, v) {
        return 0;
    }
    seen.push(v.clone());
    let result = match v {
        Value::Array(a) => slice_hash(seen, &a.to_vec()),
        Value::Map(m) => map_hash(seen, m),
        Value::Entry(e) => entry_hash(seen, e),
        _ => shallow_hash(v),
    };
    seen.pop();
    result
}

pub(crate) fn slice_hash(seen: &mut Vec<Value>, values: &[Value]) -> u64 {
    values
        .iter()
        .fold(1u64, |h, e| h.wrapping_mul(31).wrapping_add(hash_code(seen, e)))
}

/// Order-insensitive: the sum of the entry hashes.
fn map_hash(seen: &mut Vec<Value>, m: &Map) -> u64 {
    let state = m.snapshot();
    state
        .entries
        .iter()
        .fold(state.entries.len() as u64, |h, (k, v)| {
            h.wrapping_add(hash_code(seen, k) ^ hash_code(seen, v))
        })
}

fn entry_hash(seen: &mut Vec<Value>, e: &MapEntry) -> u64 {
    hash_code(seen, e.key())
        .wrapping_mul(31)
        .wrapping_add(hash_code(seen, e.value()))
}

fn shallow_hash(v: &Value) -> u64 {
    match v {
        Value::Nil => NIL_HASH,
        Value::Bool(true) => 1231,
        Value::Bool(false) => 1237,
        Value::Integer(i) => hash_of(i),
        Value::Float(f) => hash_of(f),
        Value::String(s) => hash_of(&**s),
        Value::Type(t) => t.hash_code(),
        Value::Error(e) => hash_of(&e.to_string()),
        Value::Array(_) | Value::Map(_) | Value::Entry(_) => hash_code(&mut Vec::new(), v),
    }
}

pub(crate) fn hash_of<T: Hash + ?Sized>(t: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    t.hash(&mut hasher);
    hasher.finish()
}
