//! Centralized limits and inline capacities.
//!
//! Values here size the small-vector buffers used on hot paths of the
//! rewriting engine. They are not semantic limits: exceeding an inline
//! capacity only spills to the heap.

/// Inline capacity of a `SubstitutionEnvironment` provider stack.
///
/// Typical callers push one binding map per template being specialized plus an
/// optional scope-qualifying provider, so four covers nested specializations
/// without allocating.
pub const SUBSTITUTION_STACK_INLINE: usize = 4;

/// Inline capacity for template argument lists built during name rewriting.
///
/// Matches the common arity of library templates (`std::map<K, V, Cmp, Alloc>`
/// and friends) with room to spare.
pub const TEMPLATE_ARGS_INLINE: usize = 8;

/// Inline capacity for Objective-C selector component lists.
pub const SELECTOR_PARTS_INLINE: usize = 8;

/// Inline capacity for fully qualified name chains (`a::b::c::d`).
pub const QUALIFIED_CHAIN_INLINE: usize = 8;
