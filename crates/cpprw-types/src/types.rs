//! Type and name representation.
//!
//! Types and names are hash-consed: every structurally distinct `TypeData` or
//! `NameData` value is stored once in the [`TypeInterner`](crate::TypeInterner)
//! and referred to by a `Copy` handle. Handle equality is therefore structural
//! equality.
//!
//! A [`FullType`] pairs a type handle with the qualifier flags attached at a
//! particular syntactic position (`const int` vs `int`), mirroring the way a
//! C++ declaration specifies a type.

use bitflags::bitflags;
use cpprw_common::interner::Atom;
use serde::{Deserialize, Serialize};

use crate::lookup::SymbolId;

// =============================================================================
// Handles
// =============================================================================

/// Handle to an interned `TypeData`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The "no type" sentinel. Substitution providers return it to signal
    /// that they have no answer for a name.
    pub const UNDEFINED: TypeId = TypeId(0);
    pub const VOID: TypeId = TypeId(1);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 16;

    #[inline]
    pub const fn is_undefined(self) -> bool {
        self.0 == Self::UNDEFINED.0
    }

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

/// Handle to an interned `NameData`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameId(pub u32);

/// Handle to an interned list of template arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

/// Handle to an interned list of selector components.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NameListId(pub u32);

/// Handle to an interned function signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

// =============================================================================
// Qualifier flags and fully specified types
// =============================================================================

bitflags! {
    /// Type-wide specifier bits carried alongside a type handle.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct QualifierFlags: u32 {
        const CONST       = 1 << 0;
        const VOLATILE    = 1 << 1;
        const SIGNED      = 1 << 2;
        const UNSIGNED    = 1 << 3;
        const FRIEND      = 1 << 4;
        const AUTO        = 1 << 5;
        const REGISTER    = 1 << 6;
        const STATIC      = 1 << 7;
        const EXTERN      = 1 << 8;
        const MUTABLE     = 1 << 9;
        const TYPEDEF     = 1 << 10;
        const INLINE      = 1 << 11;
        const VIRTUAL     = 1 << 12;
        const EXPLICIT    = 1 << 13;
        const DEPRECATED  = 1 << 14;
        const UNAVAILABLE = 1 << 15;
    }
}

/// A type together with the qualifiers written at its position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FullType {
    pub id: TypeId,
    pub flags: QualifierFlags,
}

impl FullType {
    pub const UNDEFINED: FullType = FullType {
        id: TypeId::UNDEFINED,
        flags: QualifierFlags::empty(),
    };

    pub const fn new(id: TypeId) -> Self {
        FullType {
            id,
            flags: QualifierFlags::empty(),
        }
    }

    pub const fn with_flags(id: TypeId, flags: QualifierFlags) -> Self {
        FullType { id, flags }
    }

    #[inline]
    pub const fn is_undefined(self) -> bool {
        self.id.is_undefined()
    }

    /// Returns this type with `flags` added to its own.
    #[must_use]
    pub fn merge_flags(self, flags: QualifierFlags) -> Self {
        FullType {
            id: self.id,
            flags: self.flags | flags,
        }
    }

    pub fn is_const(self) -> bool {
        self.flags.contains(QualifierFlags::CONST)
    }

    pub fn is_volatile(self) -> bool {
        self.flags.contains(QualifierFlags::VOLATILE)
    }
}

impl From<TypeId> for FullType {
    fn from(id: TypeId) -> Self {
        FullType::new(id)
    }
}

// =============================================================================
// Builtin kinds
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegerKind {
    Char,
    WideChar,
    Char16,
    Char32,
    Bool,
    Short,
    Int,
    Long,
    LongLong,
}

impl IntegerKind {
    pub const fn spelling(self) -> &'static str {
        match self {
            IntegerKind::Char => "char",
            IntegerKind::WideChar => "wchar_t",
            IntegerKind::Char16 => "char16_t",
            IntegerKind::Char32 => "char32_t",
            IntegerKind::Bool => "bool",
            IntegerKind::Short => "short",
            IntegerKind::Int => "int",
            IntegerKind::Long => "long",
            IntegerKind::LongLong => "long long",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatKind {
    Float,
    Double,
    LongDouble,
}

impl FloatKind {
    pub const fn spelling(self) -> &'static str {
        match self {
            FloatKind::Float => "float",
            FloatKind::Double => "double",
            FloatKind::LongDouble => "long double",
        }
    }
}

/// Overloadable operator kinds. Operator names carry no nested names or types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    New,
    Delete,
    NewArray,
    DeleteArray,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amper,
    Pipe,
    Tilde,
    Exclaim,
    Equal,
    Less,
    Greater,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    CaretEqual,
    AmperEqual,
    PipeEqual,
    LessLess,
    GreaterGreater,
    LessLessEqual,
    GreaterGreaterEqual,
    EqualEqual,
    ExclaimEqual,
    LessEqual,
    GreaterEqual,
    AmperAmper,
    PipePipe,
    PlusPlus,
    MinusMinus,
    Comma,
    ArrowStar,
    Arrow,
    Function,
    Array,
}

impl OperatorKind {
    pub const fn spelling(self) -> &'static str {
        match self {
            OperatorKind::New => " new",
            OperatorKind::Delete => " delete",
            OperatorKind::NewArray => " new[]",
            OperatorKind::DeleteArray => " delete[]",
            OperatorKind::Plus => "+",
            OperatorKind::Minus => "-",
            OperatorKind::Star => "*",
            OperatorKind::Slash => "/",
            OperatorKind::Percent => "%",
            OperatorKind::Caret => "^",
            OperatorKind::Amper => "&",
            OperatorKind::Pipe => "|",
            OperatorKind::Tilde => "~",
            OperatorKind::Exclaim => "!",
            OperatorKind::Equal => "=",
            OperatorKind::Less => "<",
            OperatorKind::Greater => ">",
            OperatorKind::PlusEqual => "+=",
            OperatorKind::MinusEqual => "-=",
            OperatorKind::StarEqual => "*=",
            OperatorKind::SlashEqual => "/=",
            OperatorKind::PercentEqual => "%=",
            OperatorKind::CaretEqual => "^=",
            OperatorKind::AmperEqual => "&=",
            OperatorKind::PipeEqual => "|=",
            OperatorKind::LessLess => "<<",
            OperatorKind::GreaterGreater => ">>",
            OperatorKind::LessLessEqual => "<<=",
            OperatorKind::GreaterGreaterEqual => ">>=",
            OperatorKind::EqualEqual => "==",
            OperatorKind::ExclaimEqual => "!=",
            OperatorKind::LessEqual => "<=",
            OperatorKind::GreaterEqual => ">=",
            OperatorKind::AmperAmper => "&&",
            OperatorKind::PipePipe => "||",
            OperatorKind::PlusPlus => "++",
            OperatorKind::MinusMinus => "--",
            OperatorKind::Comma => ",",
            OperatorKind::ArrowStar => "->*",
            OperatorKind::Arrow => "->",
            OperatorKind::Function => "()",
            OperatorKind::Array => "[]",
        }
    }
}

// =============================================================================
// Functions and their arguments
// =============================================================================

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKey {
    #[default]
    Normal,
    Signal,
    Slot,
    Invokable,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    #[default]
    None,
    Auto,
    Register,
}

/// Attributes of a function type that the rewriter copies verbatim.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FunctionAttributes {
    pub is_variadic: bool,
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_virtual: bool,
    pub is_pure_virtual: bool,
    pub method_key: MethodKey,
}

/// Attributes of a function argument that the rewriter copies verbatim.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArgumentAttributes {
    /// Spelling of the default argument, if any.
    pub default_value: Option<Atom>,
    pub storage: StorageClass,
}

/// One formal argument of a function type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArgumentInfo {
    pub name: Option<NameId>,
    pub ty: FullType,
    pub attributes: ArgumentAttributes,
}

impl ArgumentInfo {
    pub fn new(name: Option<NameId>, ty: FullType) -> Self {
        ArgumentInfo {
            name,
            ty,
            attributes: ArgumentAttributes::default(),
        }
    }
}

/// Function signature. Argument order is significant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub name: Option<NameId>,
    pub return_type: FullType,
    pub arguments: Vec<ArgumentInfo>,
    pub attributes: FunctionAttributes,
}

impl FunctionShape {
    pub fn new(name: Option<NameId>, return_type: FullType, arguments: Vec<ArgumentInfo>) -> Self {
        FunctionShape {
            name,
            return_type,
            arguments,
            attributes: FunctionAttributes::default(),
        }
    }
}

// =============================================================================
// TypeData
// =============================================================================

/// Structural payload of an interned type.
///
/// The declaration-like shapes at the end of the enum (`Namespace` through
/// `ObjCForwardProtocolDeclaration`) refer to a full declaration owned by the
/// symbol table. They are atomic as far as this crate is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Undefined,
    Void,
    Integer(IntegerKind),
    Float(FloatKind),
    PointerToMember { member_name: NameId, element: FullType },
    Pointer(FullType),
    Reference(FullType),
    Array { element: FullType, size: u32 },
    Named(NameId),
    Function(FunctionShapeId),
    Namespace(SymbolId),
    Class(SymbolId),
    Enum(SymbolId),
    ForwardClassDeclaration(SymbolId),
    ObjCClass(SymbolId),
    ObjCProtocol(SymbolId),
    ObjCMethod(SymbolId),
    ObjCForwardClassDeclaration(SymbolId),
    ObjCForwardProtocolDeclaration(SymbolId),
}

impl TypeData {
    /// Human-readable shape label used in diagnostics.
    pub const fn shape_name(&self) -> &'static str {
        match self {
            TypeData::Undefined => "undefined",
            TypeData::Void => "void",
            TypeData::Integer(_) => "integer",
            TypeData::Float(_) => "floating-point",
            TypeData::PointerToMember { .. } => "pointer-to-member",
            TypeData::Pointer(_) => "pointer",
            TypeData::Reference(_) => "reference",
            TypeData::Array { .. } => "array",
            TypeData::Named(_) => "named",
            TypeData::Function(_) => "function",
            TypeData::Namespace(_) => "namespace",
            TypeData::Class(_) => "class",
            TypeData::Enum(_) => "enum",
            TypeData::ForwardClassDeclaration(_) => "forward class declaration",
            TypeData::ObjCClass(_) => "Objective-C class",
            TypeData::ObjCProtocol(_) => "Objective-C protocol",
            TypeData::ObjCMethod(_) => "Objective-C method",
            TypeData::ObjCForwardClassDeclaration(_) => "Objective-C forward class declaration",
            TypeData::ObjCForwardProtocolDeclaration(_) => {
                "Objective-C forward protocol declaration"
            }
        }
    }

    /// The declaration behind a declaration-like shape.
    pub const fn declaration(&self) -> Option<SymbolId> {
        match self {
            TypeData::Namespace(sym)
            | TypeData::Class(sym)
            | TypeData::Enum(sym)
            | TypeData::ForwardClassDeclaration(sym)
            | TypeData::ObjCClass(sym)
            | TypeData::ObjCProtocol(sym)
            | TypeData::ObjCMethod(sym)
            | TypeData::ObjCForwardClassDeclaration(sym)
            | TypeData::ObjCForwardProtocolDeclaration(sym) => Some(*sym),
            _ => None,
        }
    }
}

// =============================================================================
// NameData
// =============================================================================

/// Structural payload of an interned name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NameData {
    Identifier(Atom),
    Qualified { base: NameId, member: NameId },
    Template { identifier: Atom, args: TypeListId },
    Destructor(Atom),
    Operator(OperatorKind),
    Conversion(FullType),
    /// Objective-C selector such as `initWithFrame:style:`.
    Selector { names: NameListId, has_arguments: bool },
}
