//! Stack of substitution providers plus the scope they resolve against.
//!
//! Providers are entered with [`SubstitutionEnvironment::enter`], which returns
//! a [`SubstitutionScope`] guard. Dropping the guard leaves the provider again,
//! so enter/leave pairs stay balanced on every exit path. Nested providers are
//! entered through the guard, which keeps the stack discipline statically
//! enforced by the borrow checker.

use std::ops::{Deref, DerefMut};

use cpprw_common::limits::SUBSTITUTION_STACK_INLINE;
use cpprw_types::{FullType, LookupContext, NameId, ScopeId, TypeDatabase};
use smallvec::SmallVec;
use tracing::trace;

use crate::substitution::{RewriteContext, Substitution};

/// Ordered set of substitution providers consulted during a rewrite.
///
/// The environment borrows its providers; it never owns the types or names
/// they hand out.
#[derive(Default)]
pub struct SubstitutionEnvironment<'a> {
    substs: SmallVec<[&'a dyn Substitution; SUBSTITUTION_STACK_INLINE]>,
    scope: Option<ScopeId>,
    context: LookupContext,
}

impl<'a> SubstitutionEnvironment<'a> {
    pub fn new() -> Self {
        SubstitutionEnvironment {
            substs: SmallVec::new(),
            scope: None,
            context: LookupContext::default(),
        }
    }

    /// An empty environment that resolves names from `scope` via `context`.
    pub fn with_scope(scope: ScopeId, context: LookupContext) -> Self {
        SubstitutionEnvironment {
            substs: SmallVec::new(),
            scope: Some(scope),
            context,
        }
    }

    /// Push `subst` on top of the provider stack for the lifetime of the
    /// returned guard.
    pub fn enter(&mut self, subst: &'a dyn Substitution) -> SubstitutionScope<'_, 'a> {
        self.substs.push(subst);
        trace!(depth = self.substs.len(), "entered substitution");
        SubstitutionScope { env: self }
    }

    fn leave(&mut self) {
        let left = self.substs.pop();
        debug_assert!(left.is_some(), "leave() on an empty substitution environment");
        trace!(depth = self.substs.len(), "left substitution");
    }

    /// Query providers from the most recently entered to the least, returning
    /// the first answer that is not `FullType::UNDEFINED`.
    pub fn apply(&self, name: NameId, db: &dyn TypeDatabase) -> FullType {
        let cx = RewriteContext::new(db, self);
        for (index, subst) in self.substs.iter().enumerate().rev() {
            let ty = subst.apply(name, &cx);
            if !ty.is_undefined() {
                trace!(?name, provider = index, type_id = ty.id.0, "substitution matched");
                return ty;
            }
        }
        FullType::UNDEFINED
    }

    /// Number of providers currently entered.
    pub fn depth(&self) -> usize {
        self.substs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substs.is_empty()
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    /// Replace the current scope, returning the previous one.
    pub fn switch_scope(&mut self, scope: Option<ScopeId>) -> Option<ScopeId> {
        std::mem::replace(&mut self.scope, scope)
    }

    pub fn context(&self) -> &LookupContext {
        &self.context
    }

    pub fn set_context(&mut self, context: LookupContext) {
        self.context = context;
    }
}

/// Guard for one entered provider. Leaves the provider when dropped.
#[must_use = "the substitution is left as soon as the guard is dropped"]
pub struct SubstitutionScope<'e, 'a> {
    env: &'e mut SubstitutionEnvironment<'a>,
}

impl SubstitutionScope<'_, '_> {
    /// Leave the provider now rather than at the end of the enclosing block.
    pub fn leave(self) {}
}

impl<'a> Deref for SubstitutionScope<'_, 'a> {
    type Target = SubstitutionEnvironment<'a>;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl<'a> DerefMut for SubstitutionScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

impl Drop for SubstitutionScope<'_, '_> {
    fn drop(&mut self) {
        self.env.leave();
    }
}

#[cfg(test)]
#[path = "../tests/environment_tests.rs"]
mod tests;
