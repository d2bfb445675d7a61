//! Cycle detection for algorithms that walk two possibly self-referential
//! operands in lockstep (assignability, instance checks).
//!
//! The guard keeps one "seen" path per operand side. Depth is normally shallow,
//! so plain vectors with identity lookups beat a hashed visited set.

use crate::value::Value;

#[derive(Clone, Debug)]
pub struct RecursionGuard {
    a_seen: Vec<Value>,
    b_seen: Vec<Value>,
    seen_in_a: bool,
    seen_in_b: bool,
}

impl RecursionGuard {
    /// A guard for a walk that starts at the pair `(a, b)`.
    pub fn new(a: Value, b: Value) -> Self {
        RecursionGuard {
            a_seen: vec![a],
            b_seen: vec![b],
            seen_in_a: false,
            seen_in_b: false,
        }
    }

    /// The guard for descending into `(a, b)`. Each side is only extended until it
    /// has revisited something; once both have, the walk has looped.
    pub fn append(&self, a: &Value, b: &Value) -> Self {
        let seen_in_a = self.seen_in_a || recursion_hit(&self.a_seen, a);
        let seen_in_b = self.seen_in_b || recursion_hit(&self.b_seen, b);
        let mut next = RecursionGuard {
            a_seen: self.a_seen.clone(),
            b_seen: self.b_seen.clone(),
            seen_in_a,
            seen_in_b,
        };
        if seen_in_a && seen_in_b {
            return next;
        }
        if !seen_in_a {
            next.a_seen.push(a.clone());
        }
        if !seen_in_b {
            next.b_seen.push(b.clone());
        }
        next
    }

    /// True once both sides have looped back to something already visited.
    pub fn hit(&self) -> bool {
        self.seen_in_a && self.seen_in_b
    }

    /// The same guard with its sides exchanged, for walks with reversed operands.
    pub fn swap(&self) -> Self {
        RecursionGuard {
            a_seen: self.b_seen.clone(),
            b_seen: self.a_seen.clone(),
            seen_in_a: self.seen_in_b,
            seen_in_b: self.seen_in_a,
        }
    }
}

pub(crate) fn recursion_hit(seen: &[Value], v: &Value) -> bool {
    seen.iter().any(|s| s.same_instance(v))
}
