//! Canonical string rendering for values and types.
//!
//! `seen` holds the addresses of the containers on the current path; a container
//! reached again renders as `...` so self-referential values print finitely.

use std::fmt::{self, Write};

use crate::types::{Bounds, Type, UNBOUNDED};
use crate::value::Value;

const CYCLE: &str = "...";

pub(crate) fn value(f: &mut fmt::Formatter<'_>, v: &Value, seen: &mut Vec<usize>) -> fmt::Result {
    match v {
        Value::Nil => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Integer(i) => write!(f, "{i}"),
        Value::Float(x) => write!(f, "{:?}", x.0),
        Value::String(s) => quoted(f, s),
        Value::Array(a) => {
            if enter(seen, a.addr()) {
                return f.write_str(CYCLE);
            }
            f.write_char('[')?;
            for (i, e) in a.to_vec().iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                value(f, e, seen)?;
            }
            seen.pop();
            f.write_char(']')
        }
        Value::Map(m) => {
            if enter(seen, m.addr()) {
                return f.write_str(CYCLE);
            }
            f.write_char('{')?;
            for (i, (k, v)) in m.snapshot().entries.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                value(f, k, seen)?;
                f.write_char(':')?;
                value(f, v, seen)?;
            }
            seen.pop();
            f.write_char('}')
        }
        Value::Entry(e) => {
            value(f, e.key(), seen)?;
            f.write_char(':')?;
            value(f, e.value(), seen)
        }
        Value::Type(t) => ty(f, t, seen),
        Value::Error(e) => write!(f, "{e}"),
    }
}

/// The literal form used by exact types: sequences render as `{a,b}`.
fn exact(f: &mut fmt::Formatter<'_>, v: &Value, seen: &mut Vec<usize>) -> fmt::Result {
    match v {
        Value::Array(a) => {
            if enter(seen, a.addr()) {
                return f.write_str(CYCLE);
            }
            f.write_char('{')?;
            for (i, e) in a.to_vec().iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                exact(f, e, seen)?;
            }
            seen.pop();
            f.write_char('}')
        }
        Value::Map(m) => {
            if enter(seen, m.addr()) {
                return f.write_str(CYCLE);
            }
            f.write_char('{')?;
            for (i, (k, v)) in m.snapshot().entries.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                exact(f, k, seen)?;
                f.write_char(':')?;
                exact(f, v, seen)?;
            }
            seen.pop();
            f.write_char('}')
        }
        Value::Entry(e) => {
            exact(f, e.key(), seen)?;
            f.write_char(':')?;
            exact(f, e.value(), seen)
        }
        _ => value(f, v, seen),
    }
}

pub(crate) fn ty(f: &mut fmt::Formatter<'_>, t: &Type, seen: &mut Vec<usize>) -> fmt::Result {
    match t {
        Type::Any => f.write_str("any"),
        Type::Nil => f.write_str("nil"),
        Type::Boolean => f.write_str("bool"),
        Type::Integer => f.write_str("int"),
        Type::Float => f.write_str("float"),
        Type::String => f.write_str("string"),
        Type::Error => f.write_str("error"),
        Type::IntegerRange(r) => write!(f, "{}..{}", r.min, r.max),
        Type::Enum(xs) => {
            for (i, x) in xs.iter().enumerate() {
                if i > 0 {
                    f.write_char('|')?;
                }
                quoted(f, x)?;
            }
            Ok(())
        }
        Type::Array(at) => {
            bounds_prefix(f, &at.bounds, '[', ']')?;
            nested(f, &at.element, seen)
        }
        Type::Tuple(ts) => {
            f.write_char('{')?;
            for (i, t) in ts.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                ty(f, t, seen)?;
            }
            f.write_char('}')
        }
        Type::Map(mt) => {
            f.write_str("map[")?;
            nested(f, &mt.key, seen)?;
            if !mt.bounds.is_unbounded() {
                bounds_prefix(f, &mt.bounds, ',', ']')?;
            } else {
                f.write_char(']')?;
            }
            nested(f, &mt.value, seen)
        }
        Type::Exact(v) => exact(f, v, seen),
        Type::ExactArray(a) => exact(f, &Value::Array(a.clone()), seen),
        Type::ExactMap(m) => exact(f, &Value::Map(m.clone()), seen),
        Type::AnyOf(ts) if ts.is_empty() => f.write_str("never"),
        Type::AnyOf(ts) => joined(f, ts, '|', seen),
        Type::AllOf(ts) => joined(f, ts, '&', seen),
        Type::Meta(inner) => match **inner {
            Type::Any => f.write_str("type"),
            ref inner => {
                f.write_str("type[")?;
                ty(f, inner, seen)?;
                f.write_char(']')
            }
        },
        Type::Alias(a) => f.write_str(a.name()),
    }
}

/// `[]`, `[min,]` or `[min,max]` (or the `,min,max]` tail of a map type).
fn bounds_prefix(f: &mut fmt::Formatter<'_>, b: &Bounds, open: char, close: char) -> fmt::Result {
    f.write_char(open)?;
    if !b.is_unbounded() {
        write!(f, "{},", b.min)?;
        if b.max != UNBOUNDED {
            write!(f, "{}", b.max)?;
        }
    }
    f.write_char(close)
}

fn joined(f: &mut fmt::Formatter<'_>, ts: &[Type], sep: char, seen: &mut Vec<usize>) -> fmt::Result {
    for (i, t) in ts.iter().enumerate() {
        if i > 0 {
            f.write_char(sep)?;
        }
        nested(f, t, seen)?;
    }
    Ok(())
}

/// Unions and intersections in an operand position are parenthesized.
fn nested(f: &mut fmt::Formatter<'_>, t: &Type, seen: &mut Vec<usize>) -> fmt::Result {
    match t {
        Type::AnyOf(ts) | Type::AllOf(ts) if ts.len() > 1 => {
            f.write_char('(')?;
            ty(f, t, seen)?;
            f.write_char(')')
        }
        _ => ty(f, t, seen),
    }
}

fn enter(seen: &mut Vec<usize>, addr: usize) -> bool {
    if seen.contains(&addr) {
        return true;
    }
    seen.push(addr);
    false
}

fn quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
