//! Interned C++ type and name model.
//!
//! This crate holds the value model the rewriting engine operates on:
//!
//! - **`TypeData` / `NameData`**: tagged unions for every type and name shape
//! - **`TypeInterner`**: sharded hash-consing store behind the `TypeDatabase` trait
//! - **Lookup interface**: `ScopeResolver` and `LookupContext`, the seam to the
//!   symbol table
//! - **`TypeFormatter`**: renders types and names in C++ syntax
//!
//! Key properties:
//! - O(1) type and name equality via interning (handle comparison)
//! - Values are immutable once interned; "modifying" a type means building a
//!   new one through the interner
mod db;
pub mod declarations;
mod format;
mod intern;
pub mod lookup;
pub mod types;

pub use db::TypeDatabase;
pub use declarations::DeclarationTable;
pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use lookup::{LookupContext, LookupItem, ScopeId, ScopeResolver, SymbolId};
pub use types::{
    ArgumentAttributes, ArgumentInfo, FloatKind, FullType, FunctionAttributes, FunctionShape,
    FunctionShapeId, IntegerKind, MethodKey, NameData, NameId, NameListId, OperatorKind,
    QualifierFlags, StorageClass, TypeData, TypeId, TypeListId,
};

pub use cpprw_common::interner::Atom;
