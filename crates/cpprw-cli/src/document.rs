//! JSON input documents and their lowering into the interner.
//!
//! A document names exactly one subject (`type` or `name`), the bindings to
//! apply, and optionally a declaration tree plus the scope to resolve from:
//!
//! ```json
//! {
//!   "type": { "kind": "pointer", "element": { "kind": "named", "name": "string" } },
//!   "bindings": [{ "name": "T", "type": { "kind": "integer", "integer": "int" } }],
//!   "declarations": [{ "name": "std", "members": [{ "name": "string" }] }],
//!   "scope": ["std"]
//! }
//! ```
//!
//! Names may be spelled as plain strings (`"std::vector"`, `"~Widget"`), which
//! are split on `::`, or given as tagged trees for templates, operators,
//! conversions and selectors.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cpprw_rewrite::BindingMap;
use cpprw_types::{
    ArgumentAttributes, ArgumentInfo, Atom, DeclarationTable, FloatKind, FullType, FunctionAttributes,
    FunctionShape, IntegerKind, NameId, OperatorKind, QualifierFlags, ScopeId, TypeDatabase,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(rename = "type", default)]
    pub ty: Option<TypeNode>,
    #[serde(default)]
    pub name: Option<NameNode>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    /// Path of enclosing declarations, outermost first. Empty means global.
    #[serde(default)]
    pub scope: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    pub name: NameNode,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

/// One declaration. Declarations with members open a scope owned by them;
/// sibling scopes must have distinct names.
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    pub name: String,
    /// Declared type. Defaults to a named type spelling the declaration.
    #[serde(rename = "type", default)]
    pub ty: Option<TypeNode>,
    #[serde(default)]
    pub members: Vec<Declaration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeNode {
    #[serde(flatten)]
    pub shape: TypeShape,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    Void,
    Integer {
        integer: IntegerKind,
    },
    Float {
        float: FloatKind,
    },
    Pointer {
        element: Box<TypeNode>,
    },
    Reference {
        element: Box<TypeNode>,
    },
    Array {
        element: Box<TypeNode>,
        size: u32,
    },
    PointerToMember {
        class: NameNode,
        element: Box<TypeNode>,
    },
    Named {
        name: NameNode,
    },
    Function {
        #[serde(default)]
        name: Option<NameNode>,
        return_type: Box<TypeNode>,
        #[serde(default)]
        arguments: Vec<ArgumentNode>,
        #[serde(default)]
        variadic: bool,
        #[serde(default, rename = "const")]
        is_const: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentNode {
    #[serde(default)]
    pub name: Option<NameNode>,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    /// Spelling of the default argument.
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NameNode {
    Spelled(String),
    Tree(Box<NameShape>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NameShape {
    Identifier {
        text: String,
    },
    Qualified {
        base: NameNode,
        member: NameNode,
    },
    Template {
        identifier: String,
        #[serde(default)]
        args: Vec<TypeNode>,
    },
    Destructor {
        identifier: String,
    },
    Operator {
        operator: OperatorKind,
    },
    Conversion {
        target: TypeNode,
    },
    Selector {
        parts: Vec<NameNode>,
        #[serde(default)]
        has_arguments: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    Const,
    Volatile,
    Signed,
    Unsigned,
    Friend,
    Auto,
    Register,
    Static,
    Extern,
    Mutable,
    Typedef,
    Inline,
    Virtual,
    Explicit,
    Deprecated,
    Unavailable,
}

impl Qualifier {
    pub const fn flag(self) -> QualifierFlags {
        match self {
            Qualifier::Const => QualifierFlags::CONST,
            Qualifier::Volatile => QualifierFlags::VOLATILE,
            Qualifier::Signed => QualifierFlags::SIGNED,
            Qualifier::Unsigned => QualifierFlags::UNSIGNED,
            Qualifier::Friend => QualifierFlags::FRIEND,
            Qualifier::Auto => QualifierFlags::AUTO,
            Qualifier::Register => QualifierFlags::REGISTER,
            Qualifier::Static => QualifierFlags::STATIC,
            Qualifier::Extern => QualifierFlags::EXTERN,
            Qualifier::Mutable => QualifierFlags::MUTABLE,
            Qualifier::Typedef => QualifierFlags::TYPEDEF,
            Qualifier::Inline => QualifierFlags::INLINE,
            Qualifier::Virtual => QualifierFlags::VIRTUAL,
            Qualifier::Explicit => QualifierFlags::EXPLICIT,
            Qualifier::Deprecated => QualifierFlags::DEPRECATED,
            Qualifier::Unavailable => QualifierFlags::UNAVAILABLE,
        }
    }
}

pub fn parse_document(text: &str) -> Result<Document> {
    serde_json::from_str(text).context("failed to parse rewrite document")
}

// =============================================================================
// Lowering
// =============================================================================

/// Builds interned types and names from document nodes.
pub struct Lowering<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> Lowering<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Lowering { db }
    }

    pub fn lower_type(&self, node: &TypeNode) -> Result<FullType> {
        let id = match &node.shape {
            TypeShape::Void => self.db.void_type(),
            TypeShape::Integer { integer } => self.db.integer_type(*integer),
            TypeShape::Float { float } => self.db.float_type(*float),
            TypeShape::Pointer { element } => self.db.pointer_type(self.lower_type(element)?),
            TypeShape::Reference { element } => self.db.reference_type(self.lower_type(element)?),
            TypeShape::Array { element, size } => {
                self.db.array_type(self.lower_type(element)?, *size)
            }
            TypeShape::PointerToMember { class, element } => {
                let class = self.lower_name(class)?;
                self.db.pointer_to_member_type(class, self.lower_type(element)?)
            }
            TypeShape::Named { name } => self.db.named_type(self.lower_name(name)?),
            TypeShape::Function {
                name,
                return_type,
                arguments,
                variadic,
                is_const,
            } => {
                let name = name.as_ref().map(|n| self.lower_name(n)).transpose()?;
                let return_type = self.lower_type(return_type)?;
                let arguments = arguments
                    .iter()
                    .map(|arg| self.lower_argument(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.db.function_type(FunctionShape {
                    name,
                    return_type,
                    arguments,
                    attributes: FunctionAttributes {
                        is_variadic: *variadic,
                        is_const: *is_const,
                        ..FunctionAttributes::default()
                    },
                })
            }
        };

        let flags = node
            .qualifiers
            .iter()
            .fold(QualifierFlags::empty(), |flags, q| flags | q.flag());
        Ok(FullType::with_flags(id, flags))
    }

    fn lower_argument(&self, arg: &ArgumentNode) -> Result<ArgumentInfo> {
        Ok(ArgumentInfo {
            name: arg.name.as_ref().map(|n| self.lower_name(n)).transpose()?,
            ty: self.lower_type(&arg.ty)?,
            attributes: ArgumentAttributes {
                default_value: arg.default.as_deref().map(|d| self.db.intern_string(d)),
                ..ArgumentAttributes::default()
            },
        })
    }

    pub fn lower_name(&self, node: &NameNode) -> Result<NameId> {
        match node {
            NameNode::Spelled(text) => self.lower_spelled(text),
            NameNode::Tree(shape) => self.lower_name_shape(shape),
        }
    }

    fn lower_name_shape(&self, shape: &NameShape) -> Result<NameId> {
        Ok(match shape {
            NameShape::Identifier { text } => self.db.identifier(self.component(text)?),
            NameShape::Qualified { base, member } => {
                let base = self.lower_name(base)?;
                self.db.qualified_name(base, self.lower_name(member)?)
            }
            NameShape::Template { identifier, args } => {
                let identifier = self.component(identifier)?;
                let args = args
                    .iter()
                    .map(|arg| self.lower_type(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.db.template_name(identifier, &args)
            }
            NameShape::Destructor { identifier } => {
                self.db.destructor_name(self.component(identifier)?)
            }
            NameShape::Operator { operator } => self.db.operator_name(*operator),
            NameShape::Conversion { target } => self.db.conversion_name(self.lower_type(target)?),
            NameShape::Selector {
                parts,
                has_arguments,
            } => {
                let parts = parts
                    .iter()
                    .map(|part| self.lower_name(part))
                    .collect::<Result<Vec<_>>>()?;
                self.db.selector_name(&parts, *has_arguments)
            }
        })
    }

    /// `a::b::~c` becomes `Qualified(Qualified(a, b), Destructor(c))`.
    fn lower_spelled(&self, text: &str) -> Result<NameId> {
        let mut parts = text.split("::").map(|part| -> Result<NameId> {
            let part = part.trim();
            match part.strip_prefix('~') {
                Some(class) => Ok(self.db.destructor_name(self.component(class)?)),
                None => Ok(self.db.identifier(self.component(part)?)),
            }
        });

        let Some(first) = parts.next() else {
            bail!("empty name");
        };
        let mut name = first.with_context(|| format!("invalid name `{text}`"))?;
        for part in parts {
            let member = part.with_context(|| format!("invalid name `{text}`"))?;
            name = self.db.qualified_name(name, member);
        }
        Ok(name)
    }

    fn component(&self, text: &str) -> Result<Atom> {
        let text = text.trim();
        if text.is_empty() {
            bail!("empty name component");
        }
        if text.contains("::") {
            bail!("`{text}` must be a single name component");
        }
        Ok(self.db.intern_string(text))
    }

    pub fn lower_bindings(&self, bindings: &[Binding]) -> Result<BindingMap> {
        let mut map = BindingMap::new();
        for binding in bindings {
            map.bind(self.lower_name(&binding.name)?, self.lower_type(&binding.ty)?);
        }
        Ok(map)
    }

    /// Build a declaration table and resolve `scope` in it.
    pub fn lower_declarations(
        &self,
        declarations: &[Declaration],
        scope: &[String],
    ) -> Result<(Arc<DeclarationTable>, ScopeId)> {
        let mut table = DeclarationTable::new();
        let mut scopes: FxHashMap<Vec<String>, ScopeId> = FxHashMap::default();
        let global = table.global_scope();
        self.declare_all(&mut table, global, declarations, &mut Vec::new(), &mut scopes)?;

        let resolved = if scope.is_empty() {
            global
        } else {
            match scopes.get(scope) {
                Some(&id) => id,
                None => bail!("scope `{}` is not declared", scope.join("::")),
            }
        };
        Ok((Arc::new(table), resolved))
    }

    fn declare_all(
        &self,
        table: &mut DeclarationTable,
        scope: ScopeId,
        declarations: &[Declaration],
        path: &mut Vec<String>,
        scopes: &mut FxHashMap<Vec<String>, ScopeId>,
    ) -> Result<()> {
        for declaration in declarations {
            let atom = self
                .component(&declaration.name)
                .with_context(|| format!("invalid declaration name `{}`", declaration.name))?;
            let name = self.db.identifier(atom);
            let ty = match &declaration.ty {
                Some(ty) => self.lower_type(ty)?,
                None => FullType::new(self.db.named_type(name)),
            };
            let symbol = table.declare(scope, name, ty);

            if declaration.members.is_empty() {
                continue;
            }
            let inner = table.new_scope(scope, Some(symbol));
            path.push(declaration.name.trim().to_string());
            if scopes.insert(path.clone(), inner).is_some() {
                bail!("scope `{}` is declared more than once", path.join("::"));
            }
            self.declare_all(table, inner, &declaration.members, path, scopes)?;
            path.pop();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod tests;
