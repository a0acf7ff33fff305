//! String interning for identifiers and string literals.
//!
//! Tokens, AST identifiers, and `Value::String` all carry a [`StringId`]
//! rather than a cloned `String`. This keeps comparison and copying cheap
//! and gives every occurrence of the same lexeme a stable, comparable
//! handle.

use ahash::AHashMap;

/// Index into an [`Interner`]'s string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StringId(u32);

impl StringId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns the de-duplicated table of strings for one compilation.
///
/// One `Interner` is shared by the lexer, parser, and every module loaded
/// during a single run, so identical identifiers across files collapse to
/// the same `StringId`.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: AHashMap<Box<str>, StringId>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning its existing id if already present.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = StringId(u32::try_from(self.strings.len()).expect("interner overflowed u32 ids"));
        self.strings.push(s.into());
        self.lookup.insert(s.into(), id);
        id
    }

    /// Resolves an id back to its string contents.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this interner.
    #[must_use]
    pub fn resolve(&self, id: StringId) -> &str {
        &self.strings[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_same_id() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        let c = interner.intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "foo");
        assert_eq!(interner.resolve(c), "bar");
    }
}
