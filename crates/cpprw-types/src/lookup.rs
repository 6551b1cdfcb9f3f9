//! Scope lookup interface.
//!
//! The symbol table, scope chains and name resolution live outside this
//! workspace. This module defines the narrow surface the rewriting engine
//! calls into: resolve a name in a scope, and spell out the enclosing
//! declarations of a symbol.

use std::fmt;
use std::sync::Arc;

use crate::types::{FullType, NameId};

/// Handle to a declaration owned by the symbol table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Handle to a scope owned by the symbol table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

/// One result of a scope lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LookupItem {
    /// The declaring symbol, when the result came from a declaration.
    pub declaration: Option<SymbolId>,
    pub ty: FullType,
}

impl LookupItem {
    pub const fn declared(declaration: SymbolId, ty: FullType) -> Self {
        LookupItem {
            declaration: Some(declaration),
            ty,
        }
    }

    pub const fn type_only(ty: FullType) -> Self {
        LookupItem {
            declaration: None,
            ty,
        }
    }
}

/// Name resolution provided by the symbol table.
pub trait ScopeResolver: Send + Sync {
    /// Resolve `name` as seen from `scope`. Results are ordered best first.
    fn lookup(&self, name: NameId, scope: ScopeId) -> Vec<LookupItem>;

    /// Names of the declarations enclosing `symbol`, outermost first and
    /// ending with the symbol's own name. Empty when the symbol is unknown.
    fn fully_qualified_name(&self, symbol: SymbolId) -> Vec<NameId>;
}

/// Cheaply clonable handle to the resolver used for scope-sensitive rewriting.
///
/// The default context is empty: every lookup yields no results.
#[derive(Clone, Default)]
pub struct LookupContext {
    resolver: Option<Arc<dyn ScopeResolver>>,
}

impl LookupContext {
    pub fn new(resolver: Arc<dyn ScopeResolver>) -> Self {
        LookupContext {
            resolver: Some(resolver),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resolver.is_none()
    }

    pub fn resolver(&self) -> Option<&dyn ScopeResolver> {
        self.resolver.as_deref()
    }

    pub fn lookup(&self, name: NameId, scope: ScopeId) -> Vec<LookupItem> {
        match &self.resolver {
            Some(resolver) => resolver.lookup(name, scope),
            None => Vec::new(),
        }
    }

    pub fn fully_qualified_name(&self, symbol: SymbolId) -> Vec<NameId> {
        match &self.resolver {
            Some(resolver) => resolver.fully_qualified_name(symbol),
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for LookupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupContext")
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}
