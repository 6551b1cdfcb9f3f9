//! Database trait for interned types and names.
//!
//! Consumers (the rewriter, the formatter, substitution providers) only see
//! `&dyn TypeDatabase`, so tests and embedders can supply their own store.
//! The required methods are the raw intern/lookup pairs; the provided methods
//! are the typed constructors everything else builds on.

use std::sync::Arc;

use cpprw_common::interner::Atom;

use crate::lookup::SymbolId;
use crate::types::{
    FloatKind, FullType, FunctionShape, FunctionShapeId, IntegerKind, NameData, NameId,
    NameListId, OperatorKind, TypeData, TypeId, TypeListId,
};

/// Canonicalizing storage for types and names.
///
/// Calling a constructor twice with structurally equal arguments must yield
/// the same handle.
pub trait TypeDatabase: Send + Sync {
    fn intern_string(&self, s: &str) -> Atom;
    fn resolve_atom(&self, atom: Atom) -> Arc<str>;

    fn intern_type(&self, data: TypeData) -> TypeId;
    fn type_data(&self, id: TypeId) -> Option<TypeData>;

    fn intern_name(&self, data: NameData) -> NameId;
    fn name_data(&self, id: NameId) -> Option<NameData>;

    fn intern_type_list(&self, items: &[FullType]) -> TypeListId;
    fn type_list(&self, id: TypeListId) -> Arc<[FullType]>;

    fn intern_name_list(&self, items: &[NameId]) -> NameListId;
    fn name_list(&self, id: NameListId) -> Arc<[NameId]>;

    fn intern_function_shape(&self, shape: FunctionShape) -> FunctionShapeId;
    fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>>;

    // =========================================================================
    // Type constructors
    // =========================================================================

    fn void_type(&self) -> TypeId {
        TypeId::VOID
    }

    fn integer_type(&self, kind: IntegerKind) -> TypeId {
        self.intern_type(TypeData::Integer(kind))
    }

    fn float_type(&self, kind: FloatKind) -> TypeId {
        self.intern_type(TypeData::Float(kind))
    }

    fn pointer_type(&self, element: FullType) -> TypeId {
        self.intern_type(TypeData::Pointer(element))
    }

    fn reference_type(&self, element: FullType) -> TypeId {
        self.intern_type(TypeData::Reference(element))
    }

    fn array_type(&self, element: FullType, size: u32) -> TypeId {
        self.intern_type(TypeData::Array { element, size })
    }

    fn pointer_to_member_type(&self, member_name: NameId, element: FullType) -> TypeId {
        self.intern_type(TypeData::PointerToMember {
            member_name,
            element,
        })
    }

    fn named_type(&self, name: NameId) -> TypeId {
        self.intern_type(TypeData::Named(name))
    }

    fn function_type(&self, shape: FunctionShape) -> TypeId {
        let shape_id = self.intern_function_shape(shape);
        self.intern_type(TypeData::Function(shape_id))
    }

    fn class_type(&self, symbol: SymbolId) -> TypeId {
        self.intern_type(TypeData::Class(symbol))
    }

    // =========================================================================
    // Name constructors
    // =========================================================================

    fn identifier(&self, atom: Atom) -> NameId {
        self.intern_name(NameData::Identifier(atom))
    }

    /// Intern `text` and wrap it in an identifier name.
    fn identifier_str(&self, text: &str) -> NameId {
        let atom = self.intern_string(text);
        self.identifier(atom)
    }

    fn qualified_name(&self, base: NameId, member: NameId) -> NameId {
        self.intern_name(NameData::Qualified { base, member })
    }

    fn template_name(&self, identifier: Atom, args: &[FullType]) -> NameId {
        let args = self.intern_type_list(args);
        self.intern_name(NameData::Template { identifier, args })
    }

    fn destructor_name(&self, identifier: Atom) -> NameId {
        self.intern_name(NameData::Destructor(identifier))
    }

    fn operator_name(&self, kind: OperatorKind) -> NameId {
        self.intern_name(NameData::Operator(kind))
    }

    fn conversion_name(&self, target: FullType) -> NameId {
        self.intern_name(NameData::Conversion(target))
    }

    fn selector_name(&self, names: &[NameId], has_arguments: bool) -> NameId {
        let names = self.intern_name_list(names);
        self.intern_name(NameData::Selector {
            names,
            has_arguments,
        })
    }
}
