//! Scope resolution for identifiers (spec §4.4): every `let` binding and
//! function parameter is assigned a scope and slot index at compile time,
//! so the VM never has to look names up by text at runtime.

use rustc_hash::FxHashMap;

use emberc_util::Symbol as Ident;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub scope: Scope,
    pub index: usize,
}

/// A chain of scopes, one per enclosing function (spec §4.4: "outer" link).
/// The outermost table has no `outer` and its definitions are `Global`;
/// every enclosed table's definitions are `Local`.
pub struct SymbolTable {
    outer: Option<Box<SymbolTable>>,
    store: FxHashMap<Ident, Symbol>,
    pub num_definitions: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            outer: None,
            store: FxHashMap::default(),
            num_definitions: 0,
        }
    }

    pub fn new_enclosed(outer: SymbolTable) -> Self {
        Self {
            outer: Some(Box::new(outer)),
            store: FxHashMap::default(),
            num_definitions: 0,
        }
    }

    pub fn define(&mut self, name: Ident) -> Symbol {
        let scope = if self.outer.is_some() {
            Scope::Local
        } else {
            Scope::Global
        };
        let symbol = Symbol {
            scope,
            index: self.num_definitions,
        };
        self.store.insert(name, symbol);
        self.num_definitions += 1;
        symbol
    }

    pub fn resolve(&self, name: Ident) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(&name) {
            return Some(*symbol);
        }
        self.outer.as_ref().and_then(|outer| outer.resolve(name))
    }

    /// Hands back the enclosing table, consuming this one — used when a
    /// function body finishes compiling and the compiler pops back out to
    /// the scope it was nested in.
    pub fn into_outer(self) -> Option<SymbolTable> {
        self.outer.map(|boxed| *boxed)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
