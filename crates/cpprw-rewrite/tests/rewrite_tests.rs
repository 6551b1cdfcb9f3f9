use super::*;
use std::sync::Arc;

use cpprw_types::{
    ArgumentAttributes, DeclarationTable, FloatKind, FunctionAttributes, IntegerKind, LookupContext,
    MethodKey, OperatorKind, QualifierFlags, StorageClass, SymbolId, TypeFormatter, TypeId,
    TypeInterner,
};

use crate::diagnostics::DiagnosticCollector;
use crate::substitution::{BindingMap, ScopeQualifyingSubstitution};

fn int(interner: &TypeInterner) -> FullType {
    FullType::new(interner.integer_type(IntegerKind::Int))
}

fn float(interner: &TypeInterner) -> FullType {
    FullType::new(interner.float_type(FloatKind::Float))
}

fn named(interner: &TypeInterner, text: &str) -> FullType {
    FullType::new(interner.named_type(interner.identifier_str(text)))
}

/// `std::vector<arg>`
fn std_vector(interner: &TypeInterner, arg: FullType) -> NameId {
    let vector = interner.template_name(interner.intern_string("vector"), &[arg]);
    interner.qualified_name(interner.identifier_str("std"), vector)
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn test_empty_environment_is_identity() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();

    let const_int = FullType::with_flags(
        interner.integer_type(IntegerKind::Int),
        QualifierFlags::CONST,
    );
    let samples = [
        FullType::new(TypeId::VOID),
        const_int,
        FullType::new(interner.pointer_type(const_int)),
        FullType::new(interner.reference_type(float(&interner))),
        FullType::new(interner.array_type(int(&interner), 16)),
        FullType::new(interner.named_type(std_vector(&interner, int(&interner)))),
    ];

    for ty in samples {
        assert_eq!(rewrite_type(&interner, ty, &env), ty);
    }
}

#[test]
fn test_irrelevant_bindings_leave_template_unchanged() {
    let interner = TypeInterner::new();
    let pair = interner.template_name(
        interner.intern_string("pair"),
        &[int(&interner), float(&interner)],
    );
    let ty = FullType::new(interner.named_type(pair));

    let bindings = BindingMap::from_arguments(&[interner.identifier_str("T")], &[float(&interner)]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    assert_eq!(rewrite_type(&interner, ty, &env), ty);
}

#[test]
fn test_qualified_name_round_trips() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();
    let name = std_vector(&interner, int(&interner));

    let rewritten = rewrite_name(&interner, name, &env);
    assert_eq!(rewritten, name);
    assert_eq!(
        TypeFormatter::new(&interner).format_name(rewritten),
        "std::vector<int>"
    );
}

#[test]
fn test_special_names_are_rebuilt_unchanged() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();

    let dtor = interner.destructor_name(interner.intern_string("Widget"));
    let op = interner.operator_name(OperatorKind::LessLess);
    let selector = interner.selector_name(
        &[
            interner.identifier_str("initWithFrame"),
            interner.identifier_str("style"),
        ],
        true,
    );

    assert_eq!(rewrite_name(&interner, dtor, &env), dtor);
    assert_eq!(rewrite_name(&interner, op, &env), op);
    assert_eq!(rewrite_name(&interner, selector, &env), selector);
}

#[test]
fn test_unknown_handles_pass_through() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();

    let bogus_type = FullType::with_flags(TypeId(9_999), QualifierFlags::CONST);
    assert_eq!(rewrite_type(&interner, bogus_type, &env), bogus_type);

    let bogus_name = NameId(9_999);
    assert_eq!(rewrite_name(&interner, bogus_name, &env), bogus_name);
}

#[test]
fn test_undefined_stays_undefined_without_flags() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();

    let undefined = FullType::with_flags(TypeId::UNDEFINED, QualifierFlags::CONST);
    assert_eq!(rewrite_type(&interner, undefined, &env), FullType::UNDEFINED);
}

// =============================================================================
// Substitution
// =============================================================================

#[test]
fn test_template_parameter_substitution() {
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let vector_of_t = std_vector(&interner, FullType::new(interner.named_type(t)));
    let ptr = FullType::new(interner.pointer_type(FullType::new(interner.named_type(vector_of_t))));

    let bindings = BindingMap::from_arguments(&[t], &[int(&interner)]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    let rewritten = rewrite_type(&interner, ptr, &env);
    let expected_name = std_vector(&interner, int(&interner));
    let expected = interner.pointer_type(FullType::new(interner.named_type(expected_name)));
    assert_eq!(rewritten, FullType::new(expected));
    assert_eq!(
        TypeFormatter::new(&interner).format(rewritten),
        "std::vector<int> *"
    );
}

#[test]
fn test_outer_flags_union_with_substituted_flags() {
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let const_t = FullType::with_flags(interner.named_type(t), QualifierFlags::CONST);
    let volatile_int = FullType::with_flags(
        interner.integer_type(IntegerKind::Int),
        QualifierFlags::VOLATILE,
    );

    let bindings = BindingMap::from_arguments(&[t], &[volatile_int]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    let rewritten = rewrite_type(&interner, const_t, &env);
    assert_eq!(rewritten.id, volatile_int.id);
    assert_eq!(
        rewritten.flags,
        QualifierFlags::CONST | QualifierFlags::VOLATILE
    );
    assert!(rewritten.is_const() && rewritten.is_volatile());
}

#[test]
fn test_const_pointer_keeps_outer_const() {
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let const_ptr_to_t = FullType::with_flags(
        interner.pointer_type(FullType::new(interner.named_type(t))),
        QualifierFlags::CONST,
    );

    let bindings = BindingMap::from_arguments(&[t], &[int(&interner)]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    let rewritten = rewrite_type(&interner, const_ptr_to_t, &env);
    assert_eq!(
        rewritten,
        FullType::with_flags(interner.pointer_type(int(&interner)), QualifierFlags::CONST)
    );
    assert_eq!(TypeFormatter::new(&interner).format(rewritten), "int *const");
}

#[test]
fn test_substituted_type_is_not_rewritten_again() {
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let u = interner.identifier_str("U");
    let named_u = FullType::new(interner.named_type(u));

    let mut bindings = BindingMap::new();
    bindings.bind(t, named_u);
    bindings.bind(u, int(&interner));
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    let rewritten = rewrite_type(&interner, FullType::new(interner.named_type(t)), &env);
    assert_eq!(rewritten, named_u);
}

#[test]
fn test_function_arguments_keep_order_and_attributes() {
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let named_t = FullType::new(interner.named_type(t));
    let default_value = interner.intern_string("0");

    let mut first = ArgumentInfo::new(Some(interner.identifier_str("a")), named_t);
    first.attributes = ArgumentAttributes {
        default_value: Some(default_value),
        storage: StorageClass::Register,
    };
    let second = ArgumentInfo::new(Some(interner.identifier_str("b")), float(&interner));
    let third = ArgumentInfo::new(None, FullType::new(interner.pointer_type(named_t)));

    let attributes = FunctionAttributes {
        is_const: true,
        is_virtual: true,
        method_key: MethodKey::Slot,
        ..FunctionAttributes::default()
    };
    let function = FullType::new(interner.function_type(FunctionShape {
        name: Some(interner.identifier_str("apply")),
        return_type: named_t,
        arguments: vec![first, second, third],
        attributes,
    }));

    let bindings = BindingMap::from_arguments(&[t], &[int(&interner)]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    let rewritten = rewrite_type(&interner, function, &env);
    let Some(TypeData::Function(shape_id)) = interner.type_data(rewritten.id) else {
        panic!("expected a function type, got {rewritten:?}");
    };
    let shape = interner.function_shape(shape_id).expect("shape must be interned");

    assert_eq!(shape.name, Some(interner.identifier_str("apply")));
    assert_eq!(shape.return_type, int(&interner));
    assert_eq!(shape.attributes, attributes);

    let types: Vec<FullType> = shape.arguments.iter().map(|arg| arg.ty).collect();
    assert_eq!(
        types,
        vec![
            int(&interner),
            float(&interner),
            FullType::new(interner.pointer_type(int(&interner))),
        ]
    );
    let names: Vec<Option<NameId>> = shape.arguments.iter().map(|arg| arg.name).collect();
    assert_eq!(
        names,
        vec![
            Some(interner.identifier_str("a")),
            Some(interner.identifier_str("b")),
            None,
        ]
    );
    assert_eq!(shape.arguments[0].attributes.default_value, Some(default_value));
    assert_eq!(shape.arguments[0].attributes.storage, StorageClass::Register);
}

#[test]
fn test_conversion_name_rewrites_target() {
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let conversion = interner.conversion_name(FullType::new(interner.named_type(t)));

    let bindings = BindingMap::from_arguments(&[t], &[int(&interner)]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    let rewritten = rewrite_name(&interner, conversion, &env);
    assert_eq!(rewritten, interner.conversion_name(int(&interner)));
    assert_eq!(
        TypeFormatter::new(&interner).format_name(rewritten),
        "operator int"
    );
}

#[test]
fn test_pointer_to_member_rewrites_class_name() {
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let holder = |arg: FullType| {
        interner.template_name(interner.intern_string("Holder"), &[arg])
    };
    let member_ptr = FullType::new(interner.pointer_to_member_type(
        holder(FullType::new(interner.named_type(t))),
        FullType::new(interner.named_type(t)),
    ));

    let bindings = BindingMap::from_arguments(&[t], &[int(&interner)]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    let rewritten = rewrite_type(&interner, member_ptr, &env);
    let expected = interner.pointer_to_member_type(holder(int(&interner)), int(&interner));
    assert_eq!(rewritten, FullType::new(expected));
    assert_eq!(
        TypeFormatter::new(&interner).format(rewritten),
        "int Holder<int>::*"
    );
}

#[test]
fn test_names_themselves_are_not_substituted() {
    // Substitution applies to named types, not to bare names.
    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");

    let bindings = BindingMap::from_arguments(&[t], &[int(&interner)]);
    let mut env = SubstitutionEnvironment::new();
    let env = env.enter(&bindings);

    assert_eq!(rewrite_name(&interner, t, &env), t);
}

// =============================================================================
// Declaration-like shapes
// =============================================================================

#[test]
fn test_declaration_shapes_pass_through_with_one_diagnostic() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();
    let symbol = SymbolId(7);

    let shapes = [
        TypeData::Namespace(symbol),
        TypeData::Class(symbol),
        TypeData::Enum(symbol),
        TypeData::ForwardClassDeclaration(symbol),
        TypeData::ObjCClass(symbol),
        TypeData::ObjCProtocol(symbol),
        TypeData::ObjCMethod(symbol),
        TypeData::ObjCForwardClassDeclaration(symbol),
        TypeData::ObjCForwardProtocolDeclaration(symbol),
    ];

    for data in shapes {
        let shape = data.shape_name();
        let id = interner.intern_type(data.clone());
        assert_eq!(interner.type_data(id), Some(data));
        let ty = FullType::with_flags(id, QualifierFlags::CONST);
        let mut sink = DiagnosticCollector::new();

        let rewritten = rewrite_type_with(&interner, ty, &env, &mut sink);
        assert_eq!(rewritten, ty);
        assert_eq!(sink.len(), 1, "exactly one diagnostic for {shape}");

        let diagnostic = &sink.diagnostics()[0];
        assert_eq!(diagnostic.type_id, id);
        assert_eq!(diagnostic.shape, shape);
        assert!(diagnostic.message_text.contains(shape));
    }
}

#[test]
fn test_declaration_shape_nested_in_pointer() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();
    let class_ty = FullType::new(interner.class_type(SymbolId(1)));
    let ptr = FullType::new(interner.pointer_type(class_ty));

    let mut sink = DiagnosticCollector::new();
    assert_eq!(rewrite_type_with(&interner, ptr, &env, &mut sink), ptr);
    assert_eq!(sink.take().len(), 1);
    assert!(sink.is_empty());
}

#[test]
fn test_plain_rewrite_reports_nothing_for_ordinary_types() {
    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();
    let mut sink = DiagnosticCollector::new();

    let ty = FullType::new(interner.named_type(std_vector(&interner, int(&interner))));
    rewrite_type_with(&interner, ty, &env, &mut sink);
    assert!(sink.is_empty());
}

#[test]
fn test_plain_entry_point_logs_instead_of_collecting() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();

    let interner = TypeInterner::new();
    let env = SubstitutionEnvironment::new();
    let enum_ty = FullType::new(interner.intern_type(TypeData::Enum(SymbolId(2))));

    assert_eq!(rewrite_type(&interner, enum_ty, &env), enum_ty);
}

// =============================================================================
// Scope qualification
// =============================================================================

#[test]
fn test_scope_qualifying_rewrite_spells_full_name() {
    let interner = TypeInterner::new();
    let mut table = DeclarationTable::new();
    let global = table.global_scope();
    let std_symbol = table.declare(global, interner.identifier_str("std"), FullType::UNDEFINED);
    let std_scope = table.new_scope(global, Some(std_symbol));
    let string_name = interner.identifier_str("string");
    table.declare(std_scope, string_name, named(&interner, "string"));

    let qualifier = ScopeQualifyingSubstitution::new();
    let mut env = SubstitutionEnvironment::with_scope(std_scope, LookupContext::new(Arc::new(table)));
    let env = env.enter(&qualifier);

    let ptr = FullType::new(interner.pointer_type(named(&interner, "string")));
    let rewritten = rewrite_type(&interner, ptr, &env);
    assert_eq!(
        TypeFormatter::new(&interner).format(rewritten),
        "std::string *"
    );

    // From the global scope the name does not resolve and stays as written.
    let mut env = env;
    let previous = env.switch_scope(Some(global));
    assert_eq!(previous, Some(std_scope));
    assert_eq!(rewrite_type(&interner, ptr, &env), ptr);
}

#[test]
fn test_bindings_shadow_scope_qualification() {
    let interner = TypeInterner::new();
    let mut table = DeclarationTable::new();
    let global = table.global_scope();
    let t = interner.identifier_str("T");
    table.declare(global, t, float(&interner));

    let qualifier = ScopeQualifyingSubstitution::new();
    let bindings = BindingMap::from_arguments(&[t], &[int(&interner)]);
    let mut env = SubstitutionEnvironment::with_scope(global, LookupContext::new(Arc::new(table)));
    let mut outer = env.enter(&qualifier);
    let inner = outer.enter(&bindings);

    let named_t = FullType::new(interner.named_type(t));
    assert_eq!(rewrite_type(&interner, named_t, &inner), int(&interner));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_independent_sessions_share_one_interner() {
    use rayon::prelude::*;

    let interner = TypeInterner::new();
    let t = interner.identifier_str("T");
    let vector_of_t = FullType::new(
        interner.named_type(std_vector(&interner, FullType::new(interner.named_type(t)))),
    );
    let kinds = [
        IntegerKind::Char,
        IntegerKind::Short,
        IntegerKind::Int,
        IntegerKind::Long,
        IntegerKind::LongLong,
    ];

    let results: Vec<(IntegerKind, FullType)> = (0..200)
        .into_par_iter()
        .map(|i| {
            let kind = kinds[i % kinds.len()];
            let arg = FullType::new(interner.integer_type(kind));
            let bindings = BindingMap::from_arguments(&[t], &[arg]);
            let mut env = SubstitutionEnvironment::new();
            let env = env.enter(&bindings);
            (kind, rewrite_type(&interner, vector_of_t, &env))
        })
        .collect();

    for (kind, rewritten) in results {
        let arg = FullType::new(interner.integer_type(kind));
        let expected = interner.named_type(std_vector(&interner, arg));
        assert_eq!(rewritten, FullType::new(expected));
    }
}
