//! String interning.
//!
//! A [`Symbol`] is a 4-byte handle into a global string table. Identifiers
//! recur constantly across a program (the same variable name appears at
//! every use site), so the AST and the symbol table store `Symbol` rather
//! than `String` — comparison is an integer compare instead of a byte
//! compare, and equal names always carry equal handles.

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

struct StringTable {
    by_hash: DashMap<u64, (&'static str, u32)>,
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            by_hash: DashMap::with_capacity(256),
            next_index: AtomicU32::new(0),
        }
    }

    fn intern(&self, s: &str) -> Symbol {
        let hash = Self::hash_of(s);
        if let Some(entry) = self.by_hash.get(&hash) {
            if entry.0 == s {
                return Symbol(entry.1);
            }
        }
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.by_hash.insert(hash, (leaked, index));
        Symbol(index)
    }

    fn resolve(&self, symbol: Symbol) -> &'static str {
        self.by_hash
            .iter()
            .find(|entry| entry.value().1 == symbol.0)
            .map(|entry| entry.value().0)
            .expect("Symbol must have been produced by Symbol::intern")
    }

    fn hash_of(s: &str) -> u64 {
        let mut hasher = AHasher::default();
        s.hash(&mut hasher);
        hasher.finish()
    }
}

/// An interned identifier or string literal text.
///
/// Two symbols compare equal iff the strings they were interned from were
/// equal, which is exactly the equality the compiler's symbol table and
/// the lexer's keyword classification need.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(s: &str) -> Self {
        STRING_TABLE.intern(s)
    }

    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.resolve(*self)
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_same_symbol() {
        let a = Symbol::intern("alpha");
        let b = Symbol::intern("alpha");
        assert_eq!(a, b);
    }

    #[test]
    fn different_text_interns_to_different_symbols() {
        let a = Symbol::intern("alpha_unique_1");
        let b = Symbol::intern("beta_unique_1");
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_as_str() {
        let sym = Symbol::intern("round_trip_case");
        assert_eq!(sym.as_str(), "round_trip_case");
    }
}
