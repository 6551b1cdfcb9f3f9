//! Type and name rewriting.
//!
//! A [`Rewriter`] walks a type or name tree and rebuilds it through the
//! interner, consulting the [`SubstitutionEnvironment`] for every named type.
//! Type rewriting and name rewriting are mutually recursive: named, function
//! and pointer-to-member types contain names, while template and conversion
//! names contain types.
//!
//! Qualifier flags written at an outer position survive the rewrite: after an
//! inner type has been rebuilt, the flags of the original position are unioned
//! into the result. A substituted type keeps its own flags and gains the
//! original ones, never the other way around.
//!
//! Declaration-like types (classes, namespaces, enums and the Objective-C
//! shapes) are returned unchanged and reported to the diagnostic sink.

use cpprw_common::limits::{SELECTOR_PARTS_INLINE, TEMPLATE_ARGS_INLINE};
use cpprw_types::{
    ArgumentInfo, Atom, FullType, FunctionShape, NameData, NameId, TypeData, TypeDatabase,
};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::diagnostics::{DiagnosticSink, RewriteDiagnostic, TracingSink};
use crate::environment::SubstitutionEnvironment;

/// One rewrite session over an interner and an environment.
pub struct Rewriter<'r, 'a> {
    db: &'r dyn TypeDatabase,
    env: &'r SubstitutionEnvironment<'a>,
    sink: &'r mut dyn DiagnosticSink,
}

impl<'r, 'a> Rewriter<'r, 'a> {
    pub fn new(
        db: &'r dyn TypeDatabase,
        env: &'r SubstitutionEnvironment<'a>,
        sink: &'r mut dyn DiagnosticSink,
    ) -> Self {
        Rewriter { db, env, sink }
    }

    /// Rewrite `ty`, keeping the qualifiers written at its position.
    pub fn rewrite_type(&mut self, ty: FullType) -> FullType {
        let rewritten = self.rewrite_type_data(ty);
        if rewritten.is_undefined() {
            return FullType::UNDEFINED;
        }
        rewritten.merge_flags(ty.flags)
    }

    /// Rewrite a name tree.
    pub fn rewrite_name(&mut self, name: NameId) -> NameId {
        let Some(data) = self.db.name_data(name) else {
            trace!(?name, "unknown name handle passed through");
            return name;
        };

        match data {
            NameData::Identifier(atom) => self.db.identifier(self.reintern(atom)),
            NameData::Qualified { base, member } => {
                let base = self.rewrite_name(base);
                let member = self.rewrite_name(member);
                self.db.qualified_name(base, member)
            }
            NameData::Template { identifier, args } => {
                let identifier = self.reintern(identifier);
                let args = self.db.type_list(args);
                let rewritten: SmallVec<[FullType; TEMPLATE_ARGS_INLINE]> =
                    args.iter().map(|&arg| self.rewrite_type(arg)).collect();
                self.db.template_name(identifier, &rewritten)
            }
            NameData::Destructor(atom) => self.db.destructor_name(self.reintern(atom)),
            NameData::Operator(kind) => self.db.operator_name(kind),
            NameData::Conversion(target) => {
                let target = self.rewrite_type(target);
                self.db.conversion_name(target)
            }
            NameData::Selector {
                names,
                has_arguments,
            } => {
                let names = self.db.name_list(names);
                let rewritten: SmallVec<[NameId; SELECTOR_PARTS_INLINE]> =
                    names.iter().map(|&n| self.rewrite_name(n)).collect();
                self.db.selector_name(&rewritten, has_arguments)
            }
        }
    }

    /// Rewrite a name that may be absent. `None` stays `None`.
    pub fn rewrite_optional_name(&mut self, name: Option<NameId>) -> Option<NameId> {
        name.map(|name| self.rewrite_name(name))
    }

    /// Rebuild the shape of `ty`. The result carries only the flags the
    /// rebuilt shape itself contributes.
    fn rewrite_type_data(&mut self, ty: FullType) -> FullType {
        let Some(data) = self.db.type_data(ty.id) else {
            trace!(type_id = ty.id.0, "unknown type handle passed through");
            return FullType::new(ty.id);
        };

        match data {
            TypeData::Undefined => FullType::UNDEFINED,
            TypeData::Void => FullType::new(self.db.void_type()),
            TypeData::Integer(kind) => FullType::new(self.db.integer_type(kind)),
            TypeData::Float(kind) => FullType::new(self.db.float_type(kind)),
            TypeData::PointerToMember {
                member_name,
                element,
            } => {
                let member_name = self.rewrite_name(member_name);
                let element = self.rewrite_type(element);
                FullType::new(self.db.pointer_to_member_type(member_name, element))
            }
            TypeData::Pointer(element) => {
                let element = self.rewrite_type(element);
                FullType::new(self.db.pointer_type(element))
            }
            TypeData::Reference(element) => {
                let element = self.rewrite_type(element);
                FullType::new(self.db.reference_type(element))
            }
            TypeData::Array { element, size } => {
                let element = self.rewrite_type(element);
                FullType::new(self.db.array_type(element, size))
            }
            TypeData::Named(name) => {
                let substituted = self.env.apply(name, self.db);
                if !substituted.is_undefined() {
                    // Used as-is: a substituted type is not rewritten again.
                    return substituted;
                }
                let name = self.rewrite_name(name);
                FullType::new(self.db.named_type(name))
            }
            TypeData::Function(shape_id) => {
                let Some(shape) = self.db.function_shape(shape_id) else {
                    trace!(type_id = ty.id.0, "function without shape passed through");
                    return FullType::new(ty.id);
                };

                let name = self.rewrite_optional_name(shape.name);
                let return_type = self.rewrite_type(shape.return_type);
                let arguments = shape
                    .arguments
                    .iter()
                    .map(|arg| ArgumentInfo {
                        name: self.rewrite_optional_name(arg.name),
                        ty: self.rewrite_type(arg.ty),
                        attributes: arg.attributes,
                    })
                    .collect();

                FullType::new(self.db.function_type(FunctionShape {
                    name,
                    return_type,
                    arguments,
                    attributes: shape.attributes,
                }))
            }
            TypeData::Namespace(_)
            | TypeData::Class(_)
            | TypeData::Enum(_)
            | TypeData::ForwardClassDeclaration(_)
            | TypeData::ObjCClass(_)
            | TypeData::ObjCProtocol(_)
            | TypeData::ObjCMethod(_)
            | TypeData::ObjCForwardClassDeclaration(_)
            | TypeData::ObjCForwardProtocolDeclaration(_) => {
                self.sink
                    .report(RewriteDiagnostic::unsupported_shape(ty.id, data.shape_name()));
                FullType::new(ty.id)
            }
        }
    }

    /// Identifiers are re-interned from their text so the result is canonical
    /// even if the atom came from elsewhere.
    fn reintern(&self, atom: Atom) -> Atom {
        self.db.intern_string(&self.db.resolve_atom(atom))
    }
}

/// Rewrite `ty` under `env`, logging diagnostics through `tracing`.
pub fn rewrite_type(
    db: &dyn TypeDatabase,
    ty: FullType,
    env: &SubstitutionEnvironment<'_>,
) -> FullType {
    rewrite_type_with(db, ty, env, &mut TracingSink)
}

/// Rewrite `ty` under `env`, reporting diagnostics to `sink`.
pub fn rewrite_type_with(
    db: &dyn TypeDatabase,
    ty: FullType,
    env: &SubstitutionEnvironment<'_>,
    sink: &mut dyn DiagnosticSink,
) -> FullType {
    debug!(type_id = ty.id.0, providers = env.depth(), "rewrite_type");
    Rewriter::new(db, env, sink).rewrite_type(ty)
}

/// Rewrite `name` under `env`, logging diagnostics through `tracing`.
pub fn rewrite_name(
    db: &dyn TypeDatabase,
    name: NameId,
    env: &SubstitutionEnvironment<'_>,
) -> NameId {
    rewrite_name_with(db, name, env, &mut TracingSink)
}

/// Rewrite `name` under `env`, reporting diagnostics to `sink`.
pub fn rewrite_name_with(
    db: &dyn TypeDatabase,
    name: NameId,
    env: &SubstitutionEnvironment<'_>,
    sink: &mut dyn DiagnosticSink,
) -> NameId {
    debug!(?name, providers = env.depth(), "rewrite_name");
    Rewriter::new(db, env, sink).rewrite_name(name)
}

#[cfg(test)]
#[path = "../tests/rewrite_tests.rs"]
mod tests;
