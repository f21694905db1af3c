//! Runtime type model: type names, struct templates and instantiation.

use std::fmt;

use rustc_hash::FxHashMap;
use structlang_ir::ast;

use crate::errors::{EvalError, EvalErrorKind};

/// A type reference such as `int` or `Pair[int, Box[string]]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub name: String,
    pub args: Vec<TypeName>,
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeName {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn from_ast(ty: &ast::Type) -> Self {
        TypeName {
            name: ty.name.name.clone(),
            args: ty.args.iter().map(TypeName::from_ast).collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("[")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// A struct type. Registered templates are never mutated; `instantiate`
/// always works on a copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    pub name: String,
    /// Declared type parameters, names only.
    pub type_params: Vec<TypeName>,
    pub fields: FxHashMap<String, TypeName>,
}

impl StructType {
    /// Build a template from a `type Name = struct[...]{...}` declaration.
    ///
    /// The parameter list after `struct` is the one that counts; arguments
    /// written after the declared name are not consulted.
    pub fn from_def(name: &str, def: &ast::StructDef) -> Self {
        let type_params = def
            .params
            .iter()
            .map(|param| TypeName::simple(param.name.clone()))
            .collect();
        let mut fields = FxHashMap::default();
        for field in &def.fields {
            let ty = TypeName::from_ast(&field.ty);
            for name in &field.names {
                fields.insert(name.name.clone(), ty.clone());
            }
        }
        StructType {
            name: name.to_string(),
            type_params,
            fields,
        }
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Result of substituting concrete arguments into a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instantiation {
    pub instance: StructType,
    /// Type parameter name to the concrete type that replaced it.
    pub bindings: FxHashMap<String, TypeName>,
}

/// Substitute `args` for the template's type parameters.
///
/// A field is replaced when its declared type name equals a parameter
/// name; it takes the argument at that parameter's position. Substitution does not descend into the
/// arguments of generic field types.
pub fn instantiate(template: &StructType, args: &[TypeName]) -> Result<Instantiation, EvalError> {
    if args.len() != template.type_params.len() {
        return Err(EvalError::from_kind(EvalErrorKind::TypeArgumentArity {
            type_name: template.name.clone(),
            expected: template.type_params.len(),
            found: args.len(),
        }));
    }

    let bindings: FxHashMap<String, TypeName> = template
        .type_params
        .iter()
        .zip(args)
        .map(|(param, concrete)| (param.name.clone(), concrete.clone()))
        .collect();

    // Fields match on their declared types, never on substituted ones.
    let fields = template
        .fields
        .iter()
        .map(|(field, declared)| {
            let ty = match bindings.get(&declared.name) {
                Some(concrete) if declared.args.is_empty() => concrete.clone(),
                _ => declared.clone(),
            };
            (field.clone(), ty)
        })
        .collect();
    let instance = StructType {
        name: template.name.clone(),
        type_params: template.type_params.clone(),
        fields,
    };
    tracing::trace!(type_name = %template.name, ?bindings, "instantiated");
    Ok(Instantiation { instance, bindings })
}
