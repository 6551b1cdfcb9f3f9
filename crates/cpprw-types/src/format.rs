//! C++ surface syntax for types and names.
//!
//! Types are printed declarator-style: the specifiers of the innermost type
//! come first and pointer, reference, array and function declarators wrap an
//! optional declarator id, e.g. `const char *const name` or
//! `int (*)(char, double)`.

use crate::db::TypeDatabase;
use crate::lookup::ScopeResolver;
use crate::types::{FullType, NameData, NameId, QualifierFlags, TypeData};

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
    resolver: Option<&'a dyn ScopeResolver>,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        TypeFormatter { db, resolver: None }
    }

    /// Use `resolver` to spell the names of declaration-like types.
    pub fn with_resolver(mut self, resolver: &'a dyn ScopeResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn format(&self, ty: FullType) -> String {
        self.declarator(ty, String::new())
    }

    /// Format `ty` as the type of a declaration named `declarator_id`.
    pub fn format_declaration(&self, ty: FullType, declarator_id: &str) -> String {
        self.declarator(ty, declarator_id.to_string())
    }

    pub fn format_name(&self, name: NameId) -> String {
        let Some(data) = self.db.name_data(name) else {
            return "<unknown name>".to_string();
        };
        match data {
            NameData::Identifier(atom) => self.db.resolve_atom(atom).to_string(),
            NameData::Qualified { base, member } => {
                format!("{}::{}", self.format_name(base), self.format_name(member))
            }
            NameData::Template { identifier, args } => {
                let args = self.db.type_list(args);
                let rendered: Vec<String> = args.iter().map(|&arg| self.format(arg)).collect();
                format!("{}<{}>", self.db.resolve_atom(identifier), rendered.join(", "))
            }
            NameData::Destructor(atom) => format!("~{}", self.db.resolve_atom(atom)),
            NameData::Operator(kind) => format!("operator{}", kind.spelling()),
            NameData::Conversion(target) => format!("operator {}", self.format(target)),
            NameData::Selector {
                names,
                has_arguments,
            } => {
                let names = self.db.name_list(names);
                let parts: Vec<String> = names.iter().map(|&n| self.format_name(n)).collect();
                if has_arguments {
                    parts.iter().map(|p| format!("{p}:")).collect()
                } else {
                    parts.join("")
                }
            }
        }
    }

    fn declarator(&self, ty: FullType, inner: String) -> String {
        let Some(data) = self.db.type_data(ty.id) else {
            return join_words(&["<unknown type>".to_string(), inner]);
        };

        match data {
            TypeData::Pointer(element) => {
                let decl = self.pointer_declarator("*", ty.flags, inner);
                self.declarator(element, self.parenthesize(element, decl))
            }
            TypeData::Reference(element) => {
                let decl = format!("&{inner}");
                self.declarator(element, self.parenthesize(element, decl))
            }
            TypeData::PointerToMember {
                member_name,
                element,
            } => {
                let prefix = format!("{}::*", self.format_name(member_name));
                let decl = self.pointer_declarator(&prefix, ty.flags, inner);
                self.declarator(element, self.parenthesize(element, decl))
            }
            TypeData::Array { element, size } => {
                self.declarator(element, format!("{inner}[{size}]"))
            }
            TypeData::Function(shape_id) => {
                let Some(shape) = self.db.function_shape(shape_id) else {
                    return join_words(&["<unknown function>".to_string(), inner]);
                };
                let mut args: Vec<String> = shape
                    .arguments
                    .iter()
                    .map(|arg| {
                        let id = arg.name.map(|n| self.format_name(n)).unwrap_or_default();
                        let mut rendered = self.declarator(arg.ty, id);
                        if let Some(default) = arg.attributes.default_value {
                            rendered.push_str(" = ");
                            rendered.push_str(&self.db.resolve_atom(default));
                        }
                        rendered
                    })
                    .collect();
                if shape.attributes.is_variadic {
                    args.push("...".to_string());
                }

                let id = if inner.is_empty() {
                    shape.name.map(|n| self.format_name(n)).unwrap_or_default()
                } else {
                    inner
                };
                let mut decl = format!("{id}({})", args.join(", "));
                if shape.attributes.is_const {
                    decl.push_str(" const");
                }
                if shape.attributes.is_volatile {
                    decl.push_str(" volatile");
                }
                self.declarator(shape.return_type, decl)
            }
            base => {
                let mut words: Vec<String> = cv_words(ty.flags)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                if ty.flags.contains(QualifierFlags::UNSIGNED) {
                    words.push("unsigned".to_string());
                } else if ty.flags.contains(QualifierFlags::SIGNED) {
                    words.push("signed".to_string());
                }
                words.push(self.base_spelling(&base));
                words.push(inner);
                join_words(&words)
            }
        }
    }

    fn base_spelling(&self, data: &TypeData) -> String {
        match data {
            TypeData::Undefined => "<undefined>".to_string(),
            TypeData::Void => "void".to_string(),
            TypeData::Integer(kind) => kind.spelling().to_string(),
            TypeData::Float(kind) => kind.spelling().to_string(),
            TypeData::Named(name) => self.format_name(*name),
            other => {
                let spelled = other.declaration().and_then(|sym| {
                    let chain = self.resolver?.fully_qualified_name(sym);
                    (!chain.is_empty()).then(|| {
                        chain
                            .iter()
                            .map(|&n| self.format_name(n))
                            .collect::<Vec<_>>()
                            .join("::")
                    })
                });
                spelled.unwrap_or_else(|| format!("<{}>", other.shape_name()))
            }
        }
    }

    fn pointer_declarator(&self, prefix: &str, flags: QualifierFlags, inner: String) -> String {
        let cv = cv_words(flags).join(" ");
        match (cv.is_empty(), inner.is_empty()) {
            (true, _) => format!("{prefix}{inner}"),
            (false, true) => format!("{prefix}{cv}"),
            (false, false) => format!("{prefix}{cv} {inner}"),
        }
    }

    /// Function and array element types bind tighter than `*` and `&`.
    fn parenthesize(&self, element: FullType, decl: String) -> String {
        match self.db.type_data(element.id) {
            Some(TypeData::Function(_) | TypeData::Array { .. }) => format!("({decl})"),
            _ => decl,
        }
    }
}

fn cv_words(flags: QualifierFlags) -> Vec<&'static str> {
    let mut words = Vec::new();
    if flags.contains(QualifierFlags::CONST) {
        words.push("const");
    }
    if flags.contains(QualifierFlags::VOLATILE) {
        words.push("volatile");
    }
    words
}

fn join_words(words: &[String]) -> String {
    words
        .iter()
        .filter(|w| !w.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
