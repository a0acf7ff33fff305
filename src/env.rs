//! Variable scoping.
//!
//! A lexical stack of block scopes, rooted fresh at each function call
//! (never at the caller's scope — this language is lexically, not
//! dynamically, scoped). `let` introduces a new binding in the innermost
//! scope; `set` mutates the nearest enclosing one.

use ahash::AHashMap;

use crate::intern::StringId;
use crate::value::Value;

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    #[allow(dead_code)]
    mutable: bool,
}

/// A stack of nested block scopes, rooted at a function call or the
/// top-level `main` invocation.
#[derive(Debug, Default)]
pub struct Scopes {
    frames: Vec<AHashMap<StringId, Binding>>,
}

impl Scopes {
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![AHashMap::default()] }
    }

    pub fn push(&mut self) {
        self.frames.push(AHashMap::default());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
        debug_assert!(!self.frames.is_empty(), "popped the root scope");
    }

    /// Introduces `name` in the innermost scope. Returns `false` if `name`
    /// is already bound in that same scope (the caller should raise a
    /// duplicate-binding diagnostic).
    pub fn declare(&mut self, name: StringId, value: Value) -> bool {
        let frame = self.frames.last_mut().expect("root scope always present");
        if frame.contains_key(&name) {
            return false;
        }
        frame.insert(name, Binding { value, mutable: true });
        true
    }

    #[must_use]
    pub fn get(&self, name: StringId) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name)).map(|b| &b.value)
    }

    /// Mutates the nearest enclosing binding for `name`. Returns `false`
    /// if no such binding exists (an unknown-identifier error).
    pub fn set(&mut self, name: StringId, value: Value) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if let Some(binding) = frame.get_mut(&name) {
                binding.value = value;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    #[test]
    fn declare_shadows_only_in_nested_scope() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes = Scopes::new();
        scopes.declare(x, Value::Integer(1));
        scopes.push();
        scopes.declare(x, Value::Integer(2));
        assert!(matches!(scopes.get(x), Some(Value::Integer(2))));
        scopes.pop();
        assert!(matches!(scopes.get(x), Some(Value::Integer(1))));
    }

    #[test]
    fn redeclaring_in_the_same_scope_fails() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes = Scopes::new();
        assert!(scopes.declare(x, Value::Integer(1)));
        assert!(!scopes.declare(x, Value::Integer(2)));
    }

    #[test]
    fn set_mutates_the_nearest_enclosing_binding() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes = Scopes::new();
        scopes.declare(x, Value::Integer(1));
        scopes.push();
        assert!(scopes.set(x, Value::Integer(9)));
        assert!(matches!(scopes.get(x), Some(Value::Integer(9))));
    }

    #[test]
    fn set_on_unbound_name_fails() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes = Scopes::new();
        assert!(!scopes.set(x, Value::Integer(1)));
    }
}
