//! `assignable(a, b)`: every instance of `b` is an instance of `a`.
//!
//! Aliases are resolved before anything else so that an alias and its definition
//! occupy a single step of the walk. Only a pair of structural types (arrays,
//! tuples, maps, meta types) advances the recursion guard; unions and
//! intersections pass it through unchanged. Once both sides have looped the pair
//! is assumed assignable.

use crate::guard::RecursionGuard;
use crate::types::{Bounds, Type, instance};
use crate::value::Value;

pub(crate) fn assignable(guard: Option<&RecursionGuard>, a: &Type, b: &Type) -> bool {
    let (a, b) = (a.resolved(), b.resolved());
    if !(a.is_structural() && b.is_structural()) {
        return check(guard, a, b);
    }
    let next = match guard {
        None => RecursionGuard::new(Value::Type(a.clone()), Value::Type(b.clone())),
        Some(g) => {
            let next = g.append(&Value::Type(a.clone()), &Value::Type(b.clone()));
            if next.hit() {
                return true;
            }
            next
        }
    };
    check(Some(&next), a, b)
}

/// The check proper, for an already resolved pair the guard has accounted for.
pub(crate) fn check(g: Option<&RecursionGuard>, a: &Type, b: &Type) -> bool {
    if a.same(b) || matches!(a, Type::Any) {
        return true;
    }
    if !a.is_deep() && !b.is_deep() {
        return shallow_assignable(a, b);
    }

    // an alias left unresolved has no definition
    if matches!(a, Type::Alias(_)) || matches!(b, Type::Alias(_)) {
        return false;
    }

    match (a, b) {
        (Type::AllOf(ts), _) => return ts.iter().all(|t| assignable(g, t, b)),
        (_, Type::AnyOf(ts)) => return ts.iter().all(|t| assignable(g, a, t)),
        _ => {}
    }
    if let Some(literal) = b.exact_value() {
        return instance::check(g, a, &literal);
    }
    match (a, b) {
        (Type::AnyOf(ts), _) => return ts.iter().any(|t| assignable(g, t, b)),
        (_, Type::AllOf(ts)) => return ts.iter().any(|t| assignable(g, a, t)),
        _ => {}
    }

    match (a, b) {
        (Type::Array(at), Type::Array(bt)) => {
            at.bounds.contains_bounds(&bt.bounds) && assignable(g, &at.element, &bt.element)
        }
        (Type::Array(at), Type::Tuple(ts)) => {
            at.bounds.contains(ts.len()) && ts.iter().all(|t| assignable(g, &at.element, t))
        }
        (Type::Tuple(ts), Type::Tuple(us)) => {
            ts.len() == us.len() && ts.iter().zip(us.iter()).all(|(t, u)| assignable(g, t, u))
        }
        (Type::Tuple(ts), Type::Array(bt)) => {
            bt.bounds.min == ts.len()
                && bt.bounds.max == ts.len()
                && ts.iter().all(|t| assignable(g, t, &bt.element))
        }
        (Type::Map(at), Type::Map(bt)) => {
            at.bounds.contains_bounds(&bt.bounds)
                && assignable(g, &at.key, &bt.key)
                && assignable(g, &at.value, &bt.value)
        }
        (Type::Meta(x), Type::Meta(y)) => assignable(g, x, y),
        (Type::Exact(_) | Type::ExactArray(_) | Type::ExactMap(_), _) => exact_assignable(g, a, b),
        _ => shallow_assignable(a, b),
    }
}

/// An exact type accepts a non-exact one only when that type can produce nothing
/// but the literal.
fn exact_assignable(g: Option<&RecursionGuard>, a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::ExactArray(arr), Type::Tuple(ts)) => {
            let items = arr.to_vec();
            items.len() == ts.len()
                && items
                    .iter()
                    .zip(ts.iter())
                    .all(|(v, t)| assignable(g, &Type::exact(v.clone()), t))
        }
        (Type::ExactArray(arr), Type::Array(bt)) => {
            let items = arr.to_vec();
            bt.bounds == Bounds::exact(items.len())
                && items
                    .iter()
                    .all(|v| assignable(g, &Type::exact(v.clone()), &bt.element))
        }
        (Type::ExactMap(m), Type::Map(bt)) => m.is_empty() && bt.bounds.max == 0,
        (Type::Exact(v), Type::IntegerRange(r)) => {
            v.as_i64().is_some_and(|i| r.min == i && r.max == i)
        }
        (Type::Exact(v), Type::Enum(xs)) => xs.len() == 1 && v.as_str() == Some(&*xs[0]),
        _ => false,
    }
}

pub(crate) fn shallow_assignable(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Any, _) => true,
        (Type::Nil, Type::Nil)
        | (Type::Boolean, Type::Boolean)
        | (Type::Integer, Type::Integer)
        | (Type::Float, Type::Float)
        | (Type::String, Type::String)
        | (Type::Error, Type::Error) => true,
        (Type::Integer, Type::IntegerRange(_)) => true,
        (Type::IntegerRange(r), Type::IntegerRange(s)) => r.min <= s.min && s.max <= r.max,
        (Type::String, Type::Enum(_)) => true,
        (Type::Enum(xs), Type::Enum(ys)) => ys.iter().all(|y| xs.contains(y)),
        _ => false,
    }
}
