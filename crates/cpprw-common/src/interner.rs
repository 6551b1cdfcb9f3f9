//! Identifier interner for canonical atoms.
//!
//! Every identifier that appears in a name (`foo`, `std`, `vector`, the
//! components of an Objective-C selector) is interned into a shared pool and
//! passed around as a `u32` handle. Two atoms compare equal exactly when their
//! character content is equal, which is what makes name equality cheap.
//!
//! The pool is sharded so that independent rewrite sessions running on
//! different threads can intern concurrently with low lock contention.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// An interned identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `ShardedInterner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;
const COMMON_STRINGS: &[&str] = &[
    // Namespaces and library names
    "std",
    "detail",
    "QtCore",
    // Templates that show up in nearly every translation unit
    "vector",
    "list",
    "map",
    "set",
    "pair",
    "string",
    "basic_string",
    "allocator",
    "char_traits",
    "shared_ptr",
    "unique_ptr",
    "QList",
    "QString",
    "QVector",
    "QMap",
    "QHash",
    // Conventional template parameter names
    "T",
    "U",
    "K",
    "V",
    "Key",
    "Value",
    "Alloc",
    "Traits",
    // Member names
    "value_type",
    "size_type",
    "iterator",
    "const_iterator",
    "reference",
    "const_reference",
    "pointer",
    "first",
    "second",
    "size",
    "begin",
    "end",
    "data",
    // Objective-C selector components
    "init",
    "alloc",
    "release",
    "retain",
    "description",
];

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

struct InternerShard {
    state: RwLock<ShardState>,
}

impl InternerShard {
    fn new() -> Self {
        InternerShard {
            state: RwLock::new(ShardState::default()),
        }
    }
}

/// Sharded identifier interner for concurrent use.
///
/// Uses fixed buckets to reduce lock contention while keeping Atom lookups O(1).
pub struct ShardedInterner {
    shards: [InternerShard; SHARD_COUNT],
}

impl ShardedInterner {
    /// Create a new sharded interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|_| InternerShard::new());

        if let Ok(mut state) = shards[0].state.write() {
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }

        ShardedInterner { shards }
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }

        let shard_idx = Self::shard_for(s);
        let shard = &self.shards[shard_idx];

        // Fast path: most identifiers are already interned by the time a
        // rewrite runs, so try a shared read first.
        if let Ok(state) = shard.state.read() {
            if let Some(&atom) = state.map.get(s) {
                return atom;
            }
        }

        let Ok(mut state) = shard.state.write() else {
            return Atom::NONE;
        };

        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }

        let atom = Self::make_atom(local_index, shard_idx as u32);
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let (shard_idx, local_index) = Self::split_atom(atom);
        let shard = self.shards.get(shard_idx)?;
        let state = shard.state.read().ok()?;
        state.strings.get(local_index).cloned()
    }

    /// Get the number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .state
                    .read()
                    .map(|state| state.strings.len())
                    .unwrap_or(0)
            })
            .sum()
    }

    /// Check if the interner is empty (only has the empty string).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-intern identifiers that nearly every C++ translation unit mentions.
    pub fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }

    #[inline]
    fn make_atom(local_index: u32, shard_idx: u32) -> Atom {
        Atom((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK))
    }

    #[inline]
    fn split_atom(atom: Atom) -> (usize, usize) {
        let raw = atom.0;
        ((raw & SHARD_MASK) as usize, (raw >> SHARD_BITS) as usize)
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
