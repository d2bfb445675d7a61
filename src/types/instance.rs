//! `instance(t, v)`: whether `v` satisfies `t`.
//!
//! The guard pairs types (left) with values (right) and only advances when a
//! structural type meets a container value. Unions, intersections and aliases
//! pass the current guard through; scalars cannot loop.

use crate::guard::RecursionGuard;
use crate::types::{Type, assignable};
use crate::value::Value;

pub(crate) fn instance(guard: Option<&RecursionGuard>, t: &Type, v: &Value) -> bool {
    let t = t.resolved();
    if !(t.is_structural() && v.is_deep()) {
        return check(guard, t, v);
    }
    let tv = Value::Type(t.clone());
    let next = match guard {
        None => RecursionGuard::new(tv, v.clone()),
        Some(g) => {
            let next = g.append(&tv, v);
            if next.hit() {
                return true;
            }
            next
        }
    };
    check(Some(&next), t, v)
}

pub(crate) fn check(g: Option<&RecursionGuard>, t: &Type, v: &Value) -> bool {
    match t {
        Type::Alias(_) => false,
        Type::AnyOf(ts) => ts.iter().any(|t| instance(g, t, v)),
        Type::AllOf(ts) => ts.iter().all(|t| instance(g, t, v)),
        Type::Exact(literal) => literal.equals(v),
        Type::ExactArray(a) => Value::Array(a.clone()).equals(v),
        Type::ExactMap(m) => Value::Map(m.clone()).equals(v),
        Type::Array(at) => match v {
            Value::Array(arr) => {
                let items = arr.to_vec();
                at.bounds.contains(items.len()) && items.iter().all(|e| instance(g, &at.element, e))
            }
            _ => false,
        },
        Type::Tuple(ts) => match v {
            Value::Array(arr) => {
                let items = arr.to_vec();
                items.len() == ts.len()
                    && ts.iter().zip(&items).all(|(t, e)| instance(g, t, e))
            }
            _ => false,
        },
        Type::Map(mt) => match v {
            Value::Map(m) => {
                let state = m.snapshot();
                mt.bounds.contains(state.entries.len())
                    && state
                        .entries
                        .iter()
                        .all(|(k, v)| instance(g, &mt.key, k) && instance(g, &mt.value, v))
            }
            _ => false,
        },
        Type::Meta(inner) => match v {
            Value::Type(vt) => assignable::assignable(g, inner, vt),
            _ => false,
        },
        _ => shallow_instance(t, v),
    }
}

pub(crate) fn shallow_instance(t: &Type, v: &Value) -> bool {
    match (t, v) {
        (Type::Any, _) => true,
        (Type::Nil, Value::Nil)
        | (Type::Boolean, Value::Bool(_))
        | (Type::Integer, Value::Integer(_))
        | (Type::Float, Value::Float(_))
        | (Type::String, Value::String(_))
        | (Type::Error, Value::Error(_)) => true,
        (Type::IntegerRange(r), Value::Integer(i)) => r.contains(*i),
        (Type::Enum(xs), Value::String(s)) => xs.iter().any(|x| **x == **s),
        _ => false,
    }
}
