use super::*;
use crate::types::{ArgumentInfo, FloatKind, IntegerKind, OperatorKind, QualifierFlags};
use crate::lookup::SymbolId;

#[test]
fn test_interner_intrinsics() {
    let interner = TypeInterner::new();

    assert_eq!(interner.lookup(TypeId::UNDEFINED), Some(TypeData::Undefined));
    assert_eq!(interner.lookup(TypeId::VOID), Some(TypeData::Void));
    assert_eq!(interner.intern(TypeData::Void), TypeId::VOID);
    assert_eq!(interner.intern(TypeData::Undefined), TypeId::UNDEFINED);
    assert!(interner.is_empty());
}

#[test]
fn test_reserved_intrinsic_range_has_no_data() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId(5)), None);
}

#[test]
fn test_interner_deduplication() {
    let interner = TypeInterner::new();

    let int1 = interner.integer_type(IntegerKind::Int);
    let int2 = interner.integer_type(IntegerKind::Int);
    let long = interner.integer_type(IntegerKind::Long);

    assert_eq!(int1, int2);
    assert_ne!(int1, long);
    assert_eq!(interner.type_data(int1), Some(TypeData::Integer(IntegerKind::Int)));
}

#[test]
fn test_flags_distinguish_element_types() {
    let interner = TypeInterner::new();
    let char_ty = interner.integer_type(IntegerKind::Char);

    let ptr = interner.pointer_type(FullType::new(char_ty));
    let ptr_to_const =
        interner.pointer_type(FullType::with_flags(char_ty, QualifierFlags::CONST));

    assert_ne!(ptr, ptr_to_const);
    assert_eq!(ptr, interner.pointer_type(FullType::new(char_ty)));
}

#[test]
fn test_name_deduplication() {
    let interner = TypeInterner::new();

    let std1 = interner.identifier_str("std");
    let std2 = interner.identifier_str("std");
    let vector = interner.identifier_str("vector");

    assert_eq!(std1, std2);
    assert_eq!(interner.name_count(), 2);
    let q1 = interner.qualified_name(std1, vector);
    let q2 = interner.qualified_name(std2, vector);
    assert_eq!(q1, q2);
    assert_eq!(interner.name_count(), 3);
    assert_ne!(q1, interner.qualified_name(vector, std1));
    assert_eq!(interner.name_count(), 4);
}

#[test]
fn test_template_name_args_are_ordered() {
    let interner = TypeInterner::new();
    let pair = interner.intern_string("pair");
    let int_ty = FullType::new(interner.integer_type(IntegerKind::Int));
    let float_ty = FullType::new(interner.float_type(FloatKind::Float));

    let a = interner.template_name(pair, &[int_ty, float_ty]);
    let b = interner.template_name(pair, &[float_ty, int_ty]);
    assert_ne!(a, b);

    match interner.name_data(a) {
        Some(NameData::Template { identifier, args }) => {
            assert_eq!(identifier, pair);
            assert_eq!(&*interner.type_list(args), &[int_ty, float_ty]);
        }
        other => panic!("Expected template name, got {:?}", other),
    }
}

#[test]
fn test_empty_lists_share_id() {
    let interner = TypeInterner::new();

    let a = interner.intern_type_list(&[]);
    let b = interner.intern_type_list(&[]);
    assert_eq!(a, b);
    assert!(interner.type_list(a).is_empty());
    assert!(interner.name_list(interner.intern_name_list(&[])).is_empty());
}

#[test]
fn test_selector_keeps_argument_flag() {
    let interner = TypeInterner::new();
    let init = interner.identifier_str("initWithFrame");

    let with_args = interner.selector_name(&[init], true);
    let without_args = interner.selector_name(&[init], false);
    assert_ne!(with_args, without_args);
}

#[test]
fn test_function_shapes_are_canonical() {
    let interner = TypeInterner::new();
    let int_ty = FullType::new(interner.integer_type(IntegerKind::Int));
    let x = interner.identifier_str("x");

    let shape = FunctionShape::new(None, int_ty, vec![ArgumentInfo::new(Some(x), int_ty)]);
    let f1 = interner.function_type(shape.clone());
    let f2 = interner.function_type(shape);
    assert_eq!(f1, f2);

    let Some(TypeData::Function(shape_id)) = interner.type_data(f1) else {
        panic!("Expected function type");
    };
    let stored = interner.function_shape(shape_id).expect("shape interned");
    assert_eq!(stored.arguments.len(), 1);
    assert_eq!(stored.arguments[0].name, Some(x));
}

#[test]
fn test_declaration_shapes_keep_symbol() {
    let interner = TypeInterner::new();

    let class_a = interner.class_type(SymbolId(1));
    let class_b = interner.class_type(SymbolId(2));
    let ns_a = interner.intern(TypeData::Namespace(SymbolId(1)));

    assert_ne!(class_a, class_b);
    assert_ne!(class_a, ns_a);
    assert_eq!(
        interner.type_data(class_a).and_then(|d| d.declaration()),
        Some(SymbolId(1))
    );
}

#[test]
fn test_operator_names() {
    let interner = TypeInterner::new();
    let plus = interner.operator_name(OperatorKind::Plus);
    assert_eq!(plus, interner.operator_name(OperatorKind::Plus));
    assert_ne!(plus, interner.operator_name(OperatorKind::Minus));
}

#[test]
fn test_concurrent_interning() {
    use rayon::prelude::*;

    let interner = TypeInterner::new();
    let ids: Vec<TypeId> = (0..64)
        .into_par_iter()
        .map(|_| {
            let int_ty = interner.integer_type(IntegerKind::Int);
            interner.pointer_type(FullType::new(int_ty))
        })
        .collect();

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}
