//! The tree-walking interpreter.
//!
//! Statements run in order against one environment. A `return` stops the
//! current statement list and its value becomes the result of
//! [`Interpreter::evaluate`]. The first error aborts everything above it.
//!
//! # Call protocol
//!
//! A call binds its arguments in a fresh child of the closure's captured
//! scope and runs the body there, so locals never leak into the caller and
//! repeated or recursive calls never share bindings. Assignments to
//! captured variables go through to the captured scope and are visible to
//! later calls.

mod builder;

use std::rc::Rc;

use rustc_hash::FxHashMap;
use structlang_ir::ast::{
    self, Expr, ExprKind, Ident, Literal, LiteralKind, Lvalue, Stmt, StructLiteral,
};
use structlang_ir::Span;
use structlang_lexer::unescape_string;
use structlang_stack::ensure_sufficient_stack;

pub use builder::InterpreterBuilder;

use crate::call_stack::{CallFrame, CallStack};
use crate::errors::{undefined_type, undefined_variable, EvalError, EvalErrorKind};
use crate::types::{instantiate, Instantiation, StructType, TypeName};
use crate::{
    evaluate_infix, evaluate_prefix, AssignError, Builtin, Environment, EvalConfig, EvalResult,
    FuncValue, SharedPrintHandler, StructValue, Value,
};

/// How a statement list finished.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecOutcome {
    /// Ran off the end.
    Completed,
    /// Stopped at a `return`.
    Returned(Value),
}

pub struct Interpreter {
    env: Environment,
    config: EvalConfig,
    call_stack: CallStack,
    print_handler: SharedPrintHandler,
}

impl Interpreter {
    /// An interpreter with default settings writing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// The root environment programs run in.
    pub fn global_env(&self) -> &Environment {
        &self.env
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run a program in the root environment.
    ///
    /// Returns the value of a top-level `return`, if one ran.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = program.stmts.len()))]
    pub fn run(&mut self, program: &ast::Program) -> Result<Option<Value>, EvalError> {
        let env = self.env.clone();
        match self.evaluate(&env, &program.stmts)? {
            ExecOutcome::Completed => Ok(None),
            ExecOutcome::Returned(value) => Ok(Some(value)),
        }
    }

    /// Run `stmts` in order against `env`.
    pub fn evaluate(&mut self, env: &Environment, stmts: &[Stmt]) -> Result<ExecOutcome, EvalError> {
        for stmt in stmts {
            if let ExecOutcome::Returned(value) = self.exec_stmt(env, stmt)? {
                return Ok(ExecOutcome::Returned(value));
            }
        }
        Ok(ExecOutcome::Completed)
    }

    fn exec_stmt(&mut self, env: &Environment, stmt: &Stmt) -> Result<ExecOutcome, EvalError> {
        match stmt {
            Stmt::TypeDef(td) => {
                let name = &td.name.name.name;
                let ty = StructType::from_def(name, &td.def);
                tracing::debug!(name = %name, fields = ty.fields.len(), "type registered");
                env.define_type(name.clone(), ty);
            }
            Stmt::VarDef(vd) => {
                let value = self.eval_expr(env, &vd.value)?;
                let name = &vd.target.base().name;
                tracing::debug!(name = %name, ty = %value.type_name(), "variable bound");
                env.define_variable(name.clone(), value);
            }
            Stmt::VarSet(vs) => {
                let value = self.eval_expr(env, &vs.value)?;
                assign(env, &vs.target, value).map_err(|e| e.with_span(&vs.span))?;
            }
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(env, expr)?,
                    None => Value::Nil,
                };
                return Ok(ExecOutcome::Returned(value));
            }
            Stmt::Expr(expr) => {
                self.eval_expr(env, expr)?;
            }
        }
        Ok(ExecOutcome::Completed)
    }

    fn eval_expr(&mut self, env: &Environment, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(env, expr))
            .map_err(|e| e.with_span(&expr.span))
    }

    fn eval_expr_inner(&mut self, env: &Environment, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Literal(lit) => eval_literal(lit),
            ExprKind::Ident(ident) => lookup(env, ident),
            ExprKind::StructLiteral(sl) => self.eval_struct_literal(env, sl),
            ExprKind::FieldAccess(fa) => {
                let base = eval_lvalue(env, &fa.base)?;
                Ok(base.get(&fa.field.name))
            }
            ExprKind::Prefix { op, operand } => {
                let operand = self.eval_expr(env, operand)?;
                evaluate_prefix(*op, &operand)
            }
            ExprKind::Infix { op, left, right } => {
                let left = self.eval_expr(env, left)?;
                let right = self.eval_expr(env, right)?;
                evaluate_infix(*op, &left, &right)
            }
            ExprKind::Call { callee, args } => self.eval_call(env, callee, args, &expr.span),
            ExprKind::FuncDef(def) => Ok(Value::Func(FuncValue {
                def: Rc::clone(def),
                env: env.clone(),
            })),
        }
    }

    fn eval_struct_literal(&mut self, env: &Environment, sl: &StructLiteral) -> EvalResult {
        let type_name = &sl.ty.name.name;
        let template = env
            .lookup_type(type_name)
            .ok_or_else(|| undefined_type(type_name).with_span(&sl.ty.span))?;
        let args: Vec<TypeName> = sl.ty.args.iter().map(TypeName::from_ast).collect();
        let Instantiation { instance, bindings } =
            instantiate(&template, &args).map_err(|e| e.with_span(&sl.ty.span))?;

        let mut fields = FxHashMap::default();
        for init in &sl.fields {
            let field = &init.name.name;
            let Some(expected) = instance.fields.get(field) else {
                return Err(EvalError::from_kind(EvalErrorKind::UnknownField {
                    type_name: type_name.clone(),
                    field: field.clone(),
                })
                .with_span(&init.name.span));
            };
            let value = self.eval_expr(env, &init.value)?;
            let found = value.type_name();
            if found != expected.name {
                return Err(EvalError::from_kind(EvalErrorKind::FieldTypeMismatch {
                    field: field.clone(),
                    expected: expected.to_string(),
                    found,
                })
                .with_span(&init.span));
            }
            fields.insert(field.clone(), value);
        }

        if self.config.strict_struct_literals {
            if let Some(missing) = instance
                .field_names()
                .into_iter()
                .find(|name| !fields.contains_key(*name))
            {
                return Err(EvalError::from_kind(EvalErrorKind::MissingField {
                    type_name: type_name.clone(),
                    field: missing.to_string(),
                }));
            }
        }

        Ok(Value::Struct(StructValue {
            type_name: TypeName::from_ast(&sl.ty),
            type_params: bindings,
            field_types: instance.fields,
            fields,
        }))
    }

    fn eval_call(
        &mut self,
        env: &Environment,
        callee: &Lvalue,
        args: &[Expr],
        call_span: &Span,
    ) -> EvalResult {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(env, arg)?);
        }

        if let Lvalue::Ident(ident) = callee {
            if let Some(builtin) = Builtin::from_name(&ident.name) {
                tracing::trace!(builtin = builtin.name(), args = values.len(), "builtin call");
                return Ok(builtin.call(&values, &self.print_handler));
            }
        }

        let name = lvalue_path(callee);
        match eval_lvalue(env, callee)? {
            Value::Func(func) => self.call_function(&name, &func, values, call_span),
            other => Err(EvalError::from_kind(EvalErrorKind::NotCallable {
                name,
                type_name: other.type_name(),
            })
            .with_span(callee.span())),
        }
    }

    /// Apply a closure to already evaluated arguments.
    #[tracing::instrument(level = "debug", skip(self, func, args, call_span))]
    pub fn call_function(
        &mut self,
        name: &str,
        func: &FuncValue,
        args: Vec<Value>,
        call_span: &Span,
    ) -> EvalResult {
        if args.len() != func.arity() {
            return Err(EvalError::from_kind(EvalErrorKind::ArgumentCount {
                callee: name.to_string(),
                expected: func.arity(),
                found: args.len(),
            }));
        }

        let frame_env = func.env.child();
        for (param, arg) in func.def.params.iter().zip(args) {
            let found = arg.type_name();
            if found != param.ty.name.name {
                return Err(EvalError::from_kind(EvalErrorKind::ArgumentType {
                    callee: name.to_string(),
                    param: param.name.name.clone(),
                    expected: param.ty.to_string(),
                    found,
                }));
            }
            frame_env.define_variable(param.name.name.clone(), arg);
        }

        self.call_stack.push(CallFrame {
            name: name.to_string(),
            call_span: Some(call_span.clone()),
        })?;
        let result = ensure_sufficient_stack(|| self.evaluate(&frame_env, &func.def.body));
        let result = result.map_err(|e| e.with_backtrace(self.call_stack.capture()));
        self.call_stack.pop();

        match result? {
            ExecOutcome::Returned(value) => Ok(value),
            ExecOutcome::Completed => Ok(Value::Nil),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup(env: &Environment, ident: &Ident) -> EvalResult {
    env.lookup_variable(&ident.name)
        .ok_or_else(|| undefined_variable(&ident.name).with_span(&ident.span))
}

/// `set target = value;`
fn assign(env: &Environment, target: &Lvalue, value: Value) -> Result<(), EvalError> {
    let root = target.base();
    let new_root = match target {
        Lvalue::Ident(_) => value,
        Lvalue::FieldAccess(_) => {
            let current = env
                .lookup_variable(&root.name)
                .ok_or_else(|| undefined_variable(&root.name).with_span(&root.span))?;
            set_field_path(current, &field_path(target), value)?
        }
    };
    env.assign(&root.name, new_root).map_err(|err| match err {
        AssignError::Undefined => undefined_variable(&root.name).with_span(&root.span),
        AssignError::TypeMismatch { expected, found } => {
            EvalError::from_kind(EvalErrorKind::SetTypeMismatch {
                name: root.name.clone(),
                expected,
                found,
            })
        }
    })
}

/// Read an lvalue: a variable, then one `get` per `->` step.
fn eval_lvalue(env: &Environment, lvalue: &Lvalue) -> EvalResult {
    match lvalue {
        Lvalue::Ident(ident) => lookup(env, ident),
        Lvalue::FieldAccess(fa) => Ok(eval_lvalue(env, &fa.base)?.get(&fa.field.name)),
    }
}

fn eval_literal(lit: &Literal) -> EvalResult {
    let invalid = || {
        EvalError::from_kind(EvalErrorKind::InvalidLiteral {
            lexeme: lit.lexeme.clone(),
        })
    };
    match lit.kind {
        LiteralKind::Int => lit.lexeme.parse().map(Value::Int).map_err(|_| invalid()),
        LiteralKind::Float => lit.lexeme.parse().map(Value::Float).map_err(|_| invalid()),
        LiteralKind::String => Ok(Value::from(unescape_string(&lit.lexeme))),
        LiteralKind::True => Ok(Value::Bool(true)),
        LiteralKind::False => Ok(Value::Bool(false)),
        LiteralKind::Nil => Ok(Value::Nil),
    }
}

/// Field names after the root variable, outermost last: `a->b->c` gives
/// `[b, c]`.
fn field_path(lvalue: &Lvalue) -> Vec<&Ident> {
    let mut path = Vec::new();
    let mut current = lvalue;
    while let Lvalue::FieldAccess(fa) = current {
        path.push(&fa.field);
        current = &fa.base;
    }
    path.reverse();
    path
}

/// `a->b->c` as written.
fn lvalue_path(lvalue: &Lvalue) -> String {
    match lvalue {
        Lvalue::Ident(ident) => ident.name.clone(),
        Lvalue::FieldAccess(fa) => format!("{}->{}", lvalue_path(&fa.base), fa.field.name),
    }
}

/// Return `target` with the field at `path` replaced by `value`.
///
/// The last field's declared type is checked against `value`. Every step
/// must land on a struct.
fn set_field_path(target: Value, path: &[&Ident], value: Value) -> EvalResult {
    let Some((field, rest)) = path.split_first() else {
        return Ok(value);
    };
    let Value::Struct(mut sv) = target else {
        return Err(EvalError::from_kind(EvalErrorKind::InvalidAssignmentTarget {
            field: field.name.clone(),
            type_name: target.type_name(),
        })
        .with_span(&field.span));
    };

    let new_value = if rest.is_empty() {
        let Some(expected) = sv.field_types.get(&field.name) else {
            return Err(EvalError::from_kind(EvalErrorKind::UnknownField {
                type_name: sv.type_name.name.clone(),
                field: field.name.clone(),
            })
            .with_span(&field.span));
        };
        let found = value.type_name();
        if found != expected.name {
            return Err(EvalError::from_kind(EvalErrorKind::FieldTypeMismatch {
                field: field.name.clone(),
                expected: expected.to_string(),
                found,
            })
            .with_span(&field.span));
        }
        value
    } else {
        let inner = sv.fields.get(&field.name).cloned().unwrap_or(Value::Nil);
        set_field_path(inner, rest, value)?
    };
    sv.fields.insert(field.name.clone(), new_value);
    Ok(Value::Struct(sv))
}

#[cfg(test)]
mod tests;
