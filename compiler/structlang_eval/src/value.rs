//! Runtime values.
//!
//! A closed set of kinds. Operators match on the kind pair directly
//! (see `operators`), and field access goes through [`Value::get`].

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use structlang_ir::ast;

use crate::environment::Environment;
use crate::types::TypeName;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Nil,
    Struct(StructValue),
    Func(FuncValue),
}

impl Value {
    /// Runtime type name used by every type comparison: the primitive's
    /// name, `func`, or the struct's base name.
    pub fn type_name(&self) -> String {
        match self {
            Value::Struct(sv) => sv.type_name.name.clone(),
            other => other.kind_name().to_string(),
        }
    }

    /// Name of the value's kind, without struct names.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
            Value::Struct(_) => "struct",
            Value::Func(_) => "func",
        }
    }

    /// Read a field.
    ///
    /// Structs expose their stored fields. Primitives expose `v` (the value
    /// itself), `name` (its type name) and `len` (character count for
    /// strings, zero otherwise). Anything else reads as nil.
    pub fn get(&self, field: &str) -> Value {
        match self {
            Value::Struct(sv) => sv.fields.get(field).cloned().unwrap_or(Value::Nil),
            Value::Func(_) => Value::Nil,
            primitive => match field {
                "v" => primitive.clone(),
                "name" => Value::from(primitive.type_name().as_str()),
                "len" => match primitive {
                    Value::Str(s) => {
                        Value::Int(i64::try_from(s.chars().count()).unwrap_or(i64::MAX))
                    }
                    _ => Value::Int(0),
                },
                _ => Value::Nil,
            },
        }
    }

    /// Text written by `print` and `println`.
    pub fn print_string(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Source-like rendering. Strings are quoted; use [`Value::print_string`]
/// for program output.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Nil => f.write_str("nil"),
            Value::Struct(sv) => write!(f, "{sv}"),
            Value::Func(func) => write!(f, "{}", func.def),
        }
    }
}

/// An instance of a struct type.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
    /// The type as written in the literal, e.g. `Box[int]`.
    pub type_name: TypeName,
    /// Type parameter name to the concrete type it was instantiated with.
    pub type_params: FxHashMap<String, TypeName>,
    /// Declared field types after substitution.
    pub field_types: FxHashMap<String, TypeName>,
    /// Fields supplied so far. Unset fields are absent.
    pub fields: FxHashMap<String, Value>,
}

impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.fields.keys().collect();
        names.sort_unstable();
        write!(f, "{}{{", self.type_name)?;
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {}", self.fields[name])?;
        }
        f.write_str("}")
    }
}

/// A closure: a function literal plus the scope it was created in.
#[derive(Clone)]
pub struct FuncValue {
    pub def: Rc<ast::FuncDef>,
    pub env: Environment,
}

impl FuncValue {
    pub fn arity(&self) -> usize {
        self.def.params.len()
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FuncValue({})", self.def)
    }
}

/// Closures are equal when they share a definition and a scope.
impl PartialEq for FuncValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.def, &other.def) && self.env.same_scope(&other.env)
    }
}
