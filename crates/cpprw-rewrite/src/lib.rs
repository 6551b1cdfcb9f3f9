//! Substitution-driven rewriting of C++ types and names.
//!
//! Given a type or name and a [`SubstitutionEnvironment`], the engine produces
//! a structurally rewritten copy built through the interner. It is used to
//! materialize template specializations (bind `T` to `int` and rewrite
//! `std::vector<T> *`) and to re-qualify names for display or cross-scope
//! resolution (rewrite `string` into `std::string` as seen from some scope).
//!
//! ```ignore
//! let mut bindings = BindingMap::new();
//! bindings.bind(t, FullType::new(interner.integer_type(IntegerKind::Int)));
//!
//! let mut env = SubstitutionEnvironment::new();
//! let env = env.enter(&bindings);
//! let specialized = rewrite_type(&interner, vector_of_t, &env);
//! ```
//!
//! The engine never mutates its inputs or the symbol table, and absence of a
//! substitution is not an error: it is the `FullType::UNDEFINED` answer.
mod diagnostics;
mod environment;
mod rewrite;
mod substitution;

pub use diagnostics::{DiagnosticCollector, DiagnosticSink, RewriteDiagnostic, TracingSink};
pub use environment::{SubstitutionEnvironment, SubstitutionScope};
pub use rewrite::{Rewriter, rewrite_name, rewrite_name_with, rewrite_type, rewrite_type_with};
pub use substitution::{
    BindingMap, RewriteContext, ScopeQualifyingSubstitution, Substitution,
};
