//! Type and name interning for structural deduplication.
//!
//! This module implements the interning engine that converts `TypeData` and
//! `NameData` structures into lightweight `TypeId`/`NameId` handles.
//!
//! Benefits:
//! - O(1) type and name equality (just compare handles)
//! - Memory efficient (each unique structure stored once)
//! - Thread-safe: independent rewrite sessions can share one interner

use crate::db::TypeDatabase;
use crate::types::{
    FullType, FunctionShape, FunctionShapeId, NameData, NameId, NameListId, TypeData, TypeId,
    TypeListId,
};
use cpprw_common::interner::{Atom, ShardedInterner};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 64 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

struct InternShard<K> {
    key_to_index: RwLock<FxHashMap<K, u32>>,
    index_to_key: RwLock<Vec<K>>,
}

impl<K> InternShard<K> {
    fn new() -> Self {
        InternShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

/// Hash-consing table split into shards by key hash.
///
/// Raw ids encode `(local_index << SHARD_BITS) | shard_idx`.
struct ShardedTable<K> {
    shards: [InternShard<K>; SHARD_COUNT],
}

impl<K> ShardedTable<K>
where
    K: Eq + Hash + Clone,
{
    fn new() -> Self {
        ShardedTable {
            shards: std::array::from_fn(|_| InternShard::new()),
        }
    }

    fn intern(&self, key: K) -> u32 {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard
                .key_to_index
                .read()
                .expect("shard key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&key) {
                return Self::make_raw(local_index, shard_idx as u32);
            }
        }

        let mut map = shard
            .key_to_index
            .write()
            .expect("shard key_to_index lock poisoned");
        let mut storage = shard
            .index_to_key
            .write()
            .expect("shard index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&key) {
            return Self::make_raw(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        assert!(
            local_index <= (u32::MAX >> SHARD_BITS),
            "interner shard capacity exhausted"
        );

        storage.push(key.clone());
        map.insert(key, local_index);

        Self::make_raw(local_index, shard_idx as u32)
    }

    fn get(&self, raw: u32) -> Option<K> {
        let shard_idx = (raw & SHARD_MASK) as usize;
        let local_index = raw >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard
            .index_to_key
            .read()
            .expect("shard index_to_key lock poisoned");
        storage.get(local_index as usize).cloned()
    }

    fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .index_to_key
                    .read()
                    .expect("shard index_to_key lock poisoned")
                    .len()
            })
            .sum()
    }

    #[inline]
    fn make_raw(local_index: u32, shard_idx: u32) -> u32 {
        (local_index << SHARD_BITS) | (shard_idx & SHARD_MASK)
    }
}

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash + Clone,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn find(&self, items: &[T]) -> Option<u32> {
        if items.is_empty() {
            return Some(0);
        }
        self.map.get(items).copied()
    }

    /// Copies `items` only when they are not interned yet.
    fn intern(&mut self, items: &[T]) -> u32 {
        if let Some(id) = self.find(items) {
            return id;
        }

        let arc: Arc<[T]> = Arc::from(items);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }

    fn empty(&self) -> Arc<[T]> {
        self.items[0].clone()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

/// Type and name interning table.
/// Thread-safe via RwLock for concurrent access.
pub struct TypeInterner {
    types: ShardedTable<TypeData>,
    names: ShardedTable<NameData>,
    /// Identifier interner shared by every name built through this table.
    pub string_interner: ShardedInterner,
    type_lists: RwLock<SliceInterner<FullType>>,
    name_lists: RwLock<SliceInterner<NameId>>,
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
}

impl TypeInterner {
    /// Create a new interner with pre-registered intrinsics.
    pub fn new() -> Self {
        TypeInterner {
            types: ShardedTable::new(),
            names: ShardedTable::new(),
            string_interner: {
                let interner = ShardedInterner::new();
                interner.intern_common();
                interner
            },
            type_lists: RwLock::new(SliceInterner::new()),
            name_lists: RwLock::new(SliceInterner::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
        }
    }

    /// Intern a type payload and return its TypeId.
    /// If the payload already exists, returns the existing TypeId.
    pub fn intern(&self, data: TypeData) -> TypeId {
        match data {
            TypeData::Undefined => TypeId::UNDEFINED,
            TypeData::Void => TypeId::VOID,
            data => TypeId(TypeId::FIRST_USER + self.types.intern(data)),
        }
    }

    /// Look up the TypeData for a given TypeId.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        match id {
            TypeId::UNDEFINED => Some(TypeData::Undefined),
            TypeId::VOID => Some(TypeData::Void),
            id if id.is_intrinsic() => None,
            id => self.types.get(id.0 - TypeId::FIRST_USER),
        }
    }

    /// Get the number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        TypeId::FIRST_USER as usize + self.types.len()
    }

    /// Check if the interner holds only intrinsics.
    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_USER as usize
    }

    /// Get the number of interned names.
    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDatabase for TypeInterner {
    fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    fn intern_type(&self, data: TypeData) -> TypeId {
        self.intern(data)
    }

    fn type_data(&self, id: TypeId) -> Option<TypeData> {
        self.lookup(id)
    }

    fn intern_name(&self, data: NameData) -> NameId {
        NameId(self.names.intern(data))
    }

    fn name_data(&self, id: NameId) -> Option<NameData> {
        self.names.get(id.0)
    }

    fn intern_type_list(&self, items: &[FullType]) -> TypeListId {
        {
            let lists = self.type_lists.read().expect("type_lists lock poisoned");
            if let Some(id) = lists.find(items) {
                return TypeListId(id);
            }
        }
        let mut lists = self.type_lists.write().expect("type_lists lock poisoned");
        TypeListId(lists.intern(items))
    }

    fn type_list(&self, id: TypeListId) -> Arc<[FullType]> {
        let lists = self.type_lists.read().expect("type_lists lock poisoned");
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    fn intern_name_list(&self, items: &[NameId]) -> NameListId {
        {
            let lists = self.name_lists.read().expect("name_lists lock poisoned");
            if let Some(id) = lists.find(items) {
                return NameListId(id);
            }
        }
        let mut lists = self.name_lists.write().expect("name_lists lock poisoned");
        NameListId(lists.intern(items))
    }

    fn name_list(&self, id: NameListId) -> Arc<[NameId]> {
        let lists = self.name_lists.read().expect("name_lists lock poisoned");
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    fn intern_function_shape(&self, shape: FunctionShape) -> FunctionShapeId {
        let mut shapes = self
            .function_shapes
            .write()
            .expect("function_shapes lock poisoned");
        FunctionShapeId(shapes.intern(shape))
    }

    fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>> {
        self.function_shapes
            .read()
            .expect("function_shapes lock poisoned")
            .get(id.0)
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
