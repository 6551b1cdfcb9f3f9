//! In-memory declaration table.
//!
//! A small `ScopeResolver` over explicitly declared symbols. Scopes form a
//! tree; a scope may be owned by a declaration (a namespace or class), which is
//! how fully qualified names are spelled out.
//!
//! Lookup walks from the given scope outward and stops at the first scope that
//! declares the name. Every declaration of the name in that scope is returned
//! in declaration order, so overloaded or otherwise ambiguous names yield more
//! than one result.

use smallvec::SmallVec;
use tracing::trace;

use crate::lookup::{LookupItem, ScopeId, ScopeResolver, SymbolId};
use crate::types::{FullType, NameId};
use cpprw_common::limits::QUALIFIED_CHAIN_INLINE;

#[derive(Clone, Debug)]
struct ScopeEntry {
    parent: Option<ScopeId>,
    owner: Option<SymbolId>,
    declarations: Vec<SymbolId>,
}

#[derive(Clone, Debug)]
struct SymbolEntry {
    name: NameId,
    ty: FullType,
    scope: ScopeId,
}

#[derive(Clone, Debug)]
pub struct DeclarationTable {
    scopes: Vec<ScopeEntry>,
    symbols: Vec<SymbolEntry>,
}

impl DeclarationTable {
    /// Create a table containing only the global scope.
    pub fn new() -> Self {
        DeclarationTable {
            scopes: vec![ScopeEntry {
                parent: None,
                owner: None,
                declarations: Vec::new(),
            }],
            symbols: Vec::new(),
        }
    }

    pub const fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Declare `name` with type `ty` in `scope`.
    ///
    /// # Panics
    ///
    /// Panics if `scope` was not created by this table.
    pub fn declare(&mut self, scope: ScopeId, name: NameId, ty: FullType) -> SymbolId {
        let symbol = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolEntry { name, ty, scope });
        self.scopes[scope.0 as usize].declarations.push(symbol);
        symbol
    }

    /// Open a scope nested in `parent`, optionally owned by a declaration.
    ///
    /// The owner must already be declared; an unknown owner is dropped and the
    /// scope is left unowned. Owners therefore always predate the symbols in
    /// their scope, which keeps owner chains finite.
    pub fn new_scope(&mut self, parent: ScopeId, owner: Option<SymbolId>) -> ScopeId {
        let owner = owner.filter(|sym| {
            let known = (sym.0 as usize) < self.symbols.len();
            if !known {
                trace!(?sym, "ignoring undeclared scope owner");
            }
            known
        });
        let scope = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeEntry {
            parent: Some(parent),
            owner,
            declarations: Vec::new(),
        });
        scope
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> Option<NameId> {
        self.symbols.get(symbol.0 as usize).map(|s| s.name)
    }

    pub fn symbol_type(&self, symbol: SymbolId) -> Option<FullType> {
        self.symbols.get(symbol.0 as usize).map(|s| s.ty)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl Default for DeclarationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeResolver for DeclarationTable {
    fn lookup(&self, name: NameId, scope: ScopeId) -> Vec<LookupItem> {
        let mut current = Some(scope);
        while let Some(scope_id) = current {
            let Some(entry) = self.scopes.get(scope_id.0 as usize) else {
                break;
            };

            let found: Vec<LookupItem> = entry
                .declarations
                .iter()
                .filter_map(|&sym| {
                    let symbol = &self.symbols[sym.0 as usize];
                    (symbol.name == name).then(|| LookupItem::declared(sym, symbol.ty))
                })
                .collect();

            if !found.is_empty() {
                trace!(?name, ?scope_id, count = found.len(), "lookup hit");
                return found;
            }
            current = entry.parent;
        }
        Vec::new()
    }

    fn fully_qualified_name(&self, symbol: SymbolId) -> Vec<NameId> {
        let mut chain: SmallVec<[NameId; QUALIFIED_CHAIN_INLINE]> = SmallVec::new();
        let mut current = Some(symbol);
        while let Some(sym) = current {
            let Some(entry) = self.symbols.get(sym.0 as usize) else {
                break;
            };
            chain.push(entry.name);
            current = self
                .scopes
                .get(entry.scope.0 as usize)
                .and_then(|scope| scope.owner);
        }
        chain.into_iter().rev().collect()
    }
}

#[cfg(test)]
#[path = "../tests/declarations_tests.rs"]
mod tests;
