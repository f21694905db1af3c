//! Lexical environments.
//!
//! Each scope owns its own type and variable maps and holds a shared link to
//! its parent, never to its children. Closures keep their defining scope
//! alive by holding an `Environment` handle to it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::types::StructType;
use crate::value::Value;

/// Single-threaded, reference-counted scope cell.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

/// Error returned by [`Environment::assign`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// No scope in the chain binds the name.
    Undefined,
    /// The new value's type differs from the existing one.
    TypeMismatch { expected: String, found: String },
}

#[derive(Default)]
struct Scope {
    types: FxHashMap<String, StructType>,
    variables: FxHashMap<String, Value>,
    parent: Option<LocalScope<Scope>>,
}

/// Handle to a scope. Cloning the handle shares the scope.
#[derive(Clone)]
pub struct Environment {
    scope: LocalScope<Scope>,
}

impl Environment {
    /// A root environment with no bindings.
    pub fn new() -> Self {
        Environment {
            scope: LocalScope::new(Scope::default()),
        }
    }

    /// A fresh scope whose lookups fall back to `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment {
            scope: LocalScope::new(Scope {
                parent: Some(self.scope.clone()),
                ..Scope::default()
            }),
        }
    }

    /// Register `ty` in this scope, replacing any type of the same name here.
    pub fn define_type(&self, name: impl Into<String>, ty: StructType) {
        self.scope.borrow_mut().types.insert(name.into(), ty);
    }

    /// Bind `value` in this scope, replacing any existing binding here.
    pub fn define_variable(&self, name: impl Into<String>, value: Value) {
        self.scope.borrow_mut().variables.insert(name.into(), value);
    }

    /// Find a type, innermost scope first.
    pub fn lookup_type(&self, name: &str) -> Option<StructType> {
        self.find(|scope| scope.types.get(name).cloned())
    }

    /// Find a variable, innermost scope first.
    pub fn lookup_variable(&self, name: &str) -> Option<Value> {
        self.find(|scope| scope.variables.get(name).cloned())
    }

    /// Overwrite an existing variable in the scope that binds it.
    ///
    /// The new value must have the same type name as the old one.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        let mut current = Some(self.scope.clone());
        while let Some(scope) = current {
            let mut guard = scope.borrow_mut();
            if let Some(slot) = guard.variables.get_mut(name) {
                let expected = slot.type_name();
                let found = value.type_name();
                if expected != found {
                    return Err(AssignError::TypeMismatch { expected, found });
                }
                *slot = value;
                return Ok(());
            }
            current = guard.parent.clone();
        }
        Err(AssignError::Undefined)
    }

    /// Variables bound directly in this scope, sorted by name.
    pub fn variables(&self) -> Vec<(String, Value)> {
        let mut vars: Vec<(String, Value)> = self
            .scope
            .borrow()
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }

    /// Types registered directly in this scope, sorted by name.
    pub fn types(&self) -> Vec<(String, StructType)> {
        let mut types: Vec<(String, StructType)> = self
            .scope
            .borrow()
            .types
            .iter()
            .map(|(name, ty)| (name.clone(), ty.clone()))
            .collect();
        types.sort_by(|a, b| a.0.cmp(&b.0));
        types
    }

    /// Whether `self` and `other` are the same scope.
    pub fn same_scope(&self, other: &Environment) -> bool {
        self.scope.ptr_eq(&other.scope)
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.scope.borrow().parent.clone();
        while let Some(scope) = current {
            depth += 1;
            current = scope.borrow().parent.clone();
        }
        depth
    }

    fn find<T>(&self, mut probe: impl FnMut(&Scope) -> Option<T>) -> Option<T> {
        let mut current = Some(self.scope.clone());
        while let Some(scope) = current {
            let guard = scope.borrow();
            if let Some(found) = probe(&guard) {
                return Some(found);
            }
            current = guard.parent.clone();
        }
        None
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    // Scopes can be reachable from their own closures, so only the local
    // names are printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut vars: Vec<&str> = scope.variables.keys().map(String::as_str).collect();
        vars.sort_unstable();
        let mut types: Vec<&str> = scope.types.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("Environment")
            .field("variables", &vars)
            .field("types", &types)
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}
