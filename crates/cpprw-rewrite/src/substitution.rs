//! Substitution providers.
//!
//! A [`Substitution`] maps a name to a replacement type, or answers
//! `FullType::UNDEFINED` when it has nothing to say. Providers are stacked in a
//! [`SubstitutionEnvironment`] and queried most recent first.
//!
//! Two providers ship with the engine:
//!
//! - [`BindingMap`]: explicit name to type bindings, typically template
//!   parameters bound to template arguments
//! - [`ScopeQualifyingSubstitution`]: resolves the name in the environment's
//!   current scope and answers with its fully qualified spelling

use cpprw_types::{FullType, LookupContext, NameId, ScopeId, TypeDatabase};
use tracing::trace;

use crate::environment::SubstitutionEnvironment;

/// What a provider can see while answering a query.
pub struct RewriteContext<'r, 'a> {
    db: &'r dyn TypeDatabase,
    env: &'r SubstitutionEnvironment<'a>,
}

impl<'r, 'a> RewriteContext<'r, 'a> {
    pub(crate) fn new(db: &'r dyn TypeDatabase, env: &'r SubstitutionEnvironment<'a>) -> Self {
        RewriteContext { db, env }
    }

    pub fn db(&self) -> &'r dyn TypeDatabase {
        self.db
    }

    pub fn environment(&self) -> &'r SubstitutionEnvironment<'a> {
        self.env
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.env.scope()
    }

    pub fn lookup_context(&self) -> &'r LookupContext {
        self.env.context()
    }
}

/// A source of replacement types for names.
pub trait Substitution {
    /// Replacement for `name`, or `FullType::UNDEFINED` for "no match".
    fn apply(&self, name: NameId, cx: &RewriteContext<'_, '_>) -> FullType;
}

// =============================================================================
// BindingMap
// =============================================================================

/// Ordered name to type bindings.
///
/// A name may be bound more than once; the most recent binding wins.
#[derive(Clone, Debug, Default)]
pub struct BindingMap {
    bindings: Vec<(NameId, FullType)>,
}

impl BindingMap {
    pub fn new() -> Self {
        BindingMap {
            bindings: Vec::new(),
        }
    }

    /// Bind template parameters to arguments pairwise. Surplus parameters or
    /// arguments are ignored.
    pub fn from_arguments(params: &[NameId], args: &[FullType]) -> Self {
        BindingMap {
            bindings: params.iter().copied().zip(args.iter().copied()).collect(),
        }
    }

    pub fn bind(&mut self, name: NameId, ty: FullType) {
        self.bindings.push((name, ty));
    }

    /// The type most recently bound to `name`.
    ///
    /// Names are hash-consed, so handle equality is structural equality.
    pub fn get(&self, name: NameId) -> Option<FullType> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|&(_, ty)| ty)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = &(NameId, FullType)> {
        self.bindings.iter()
    }
}

impl Substitution for BindingMap {
    fn apply(&self, name: NameId, _cx: &RewriteContext<'_, '_>) -> FullType {
        self.get(name).unwrap_or(FullType::UNDEFINED)
    }
}

// =============================================================================
// ScopeQualifyingSubstitution
// =============================================================================

/// Replaces a name with its fully qualified spelling as resolved from the
/// environment's current scope.
///
/// Only the first lookup result is considered, even when the lookup is
/// ambiguous.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScopeQualifyingSubstitution;

impl ScopeQualifyingSubstitution {
    pub fn new() -> Self {
        ScopeQualifyingSubstitution
    }
}

impl Substitution for ScopeQualifyingSubstitution {
    fn apply(&self, name: NameId, cx: &RewriteContext<'_, '_>) -> FullType {
        let Some(scope) = cx.scope() else {
            return FullType::UNDEFINED;
        };

        let context = cx.lookup_context();
        let results = context.lookup(name, scope);
        let Some(first) = results.first() else {
            return FullType::UNDEFINED;
        };

        if let Some(declaration) = first.declaration {
            let db = cx.db();
            let qualified = context
                .fully_qualified_name(declaration)
                .into_iter()
                .reduce(|base, member| db.qualified_name(base, member));
            if let Some(qualified) = qualified {
                trace!(?name, ?declaration, ?qualified, "qualified from scope");
                return FullType::new(db.named_type(qualified));
            }
        }

        first.ty
    }
}

#[cfg(test)]
#[path = "../tests/substitution_tests.rs"]
mod tests;
