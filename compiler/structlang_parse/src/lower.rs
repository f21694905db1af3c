//! Parse tree to AST.
//!
//! A pure, infallible reshaping: separators and delimiters are dropped,
//! groupings collapse into their inner expression, and each node keeps the
//! span of its first and last token.

use std::rc::Rc;

use structlang_ir::ast;
use structlang_ir::parse_tree as pt;
use structlang_ir::Span;
use structlang_stack::ensure_sufficient_stack;

/// Build the semantic AST for a parsed program.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_ast(program: &pt::Program) -> ast::Program {
    ast::Program {
        stmts: program.stmts.iter().map(lower_stmt).collect(),
    }
}

fn lower_stmt(stmt: &pt::Stmt) -> ast::Stmt {
    let span = Span::between(stmt.first_token(), stmt.last_token());
    match stmt {
        pt::Stmt::TypeDef(td) => ast::Stmt::TypeDef(ast::TypeDef {
            name: lower_type(&td.name),
            def: lower_struct_def(&td.def),
            span,
        }),
        pt::Stmt::VarDef(vd) => ast::Stmt::VarDef(ast::VarDef {
            target: lower_lvalue(&vd.target),
            value: lower_expr(&vd.value),
            span,
        }),
        pt::Stmt::VarSet(vs) => ast::Stmt::VarSet(ast::VarSet {
            target: lower_lvalue(&vs.target),
            value: lower_expr(&vs.value),
            span,
        }),
        pt::Stmt::Return(rs) => ast::Stmt::Return(ast::Return {
            value: rs.value.as_ref().map(lower_expr),
            span,
        }),
        pt::Stmt::Expr(es) => ast::Stmt::Expr(lower_expr(&es.expr)),
    }
}

fn lower_ident(ident: &pt::Ident) -> ast::Ident {
    ast::Ident {
        name: ident.name.lexeme.clone(),
        span: Span::of(&ident.name),
    }
}

fn lower_type(ty: &pt::Type) -> ast::Type {
    ast::Type {
        name: lower_ident(&ty.name),
        args: ty
            .args
            .as_ref()
            .map(|args| args.types.items().map(lower_type).collect())
            .unwrap_or_default(),
        span: Span::between(ty.first_token(), ty.last_token()),
    }
}

fn lower_struct_def(def: &pt::StructDef) -> ast::StructDef {
    ast::StructDef {
        params: def
            .params
            .as_ref()
            .map(|params| params.names.items().map(lower_ident).collect())
            .unwrap_or_default(),
        fields: def.fields.iter().map(lower_struct_field).collect(),
        span: Span::between(&def.struct_kw, &def.rbrace),
    }
}

fn lower_struct_field(field: &pt::StructField) -> ast::StructField {
    let names: Vec<ast::Ident> = field.names.items().map(lower_ident).collect();
    let ty = lower_type(&field.ty);
    let end = match &field.semicolon {
        Some(semicolon) => Span::of(semicolon),
        None => ty.span.clone(),
    };
    let span = match names.first() {
        Some(first) => first.span.to(&end),
        None => ty.span.clone(),
    };
    ast::StructField { names, ty, span }
}

fn lower_lvalue(lvalue: &pt::Lvalue) -> ast::Lvalue {
    match lvalue {
        pt::Lvalue::Ident(ident) => ast::Lvalue::Ident(lower_ident(ident)),
        pt::Lvalue::FieldAccess(fa) => ast::Lvalue::FieldAccess(lower_field_access(fa)),
    }
}

fn lower_field_access(fa: &pt::FieldAccess) -> ast::FieldAccess {
    ast::FieldAccess {
        base: Box::new(lower_lvalue(&fa.base)),
        field: lower_ident(&fa.field),
        span: Span::between(fa.first_token(), &fa.field.name),
    }
}

fn lower_expr(expr: &pt::Expr) -> ast::Expr {
    ensure_sufficient_stack(|| lower_expr_inner(expr))
}

fn lower_expr_inner(expr: &pt::Expr) -> ast::Expr {
    let span = Span::between(expr.first_token(), expr.last_token());
    let kind = match expr {
        pt::Expr::Literal(lit) => ast::ExprKind::Literal(ast::Literal {
            kind: lit.kind,
            lexeme: lit.token.lexeme.clone(),
        }),
        pt::Expr::Ident(ident) => ast::ExprKind::Ident(lower_ident(ident)),
        pt::Expr::StructLiteral(sl) => ast::ExprKind::StructLiteral(ast::StructLiteral {
            ty: lower_type(&sl.ty),
            fields: sl
                .fields
                .items()
                .map(|field| {
                    let value = lower_expr(&field.value);
                    ast::FieldInit {
                        name: lower_ident(&field.name),
                        span: Span::of(&field.name.name).to(&value.span),
                        value,
                    }
                })
                .collect(),
        }),
        pt::Expr::FieldAccess(fa) => ast::ExprKind::FieldAccess(lower_field_access(fa)),
        pt::Expr::Prefix(pe) => ast::ExprKind::Prefix {
            op: pe.op,
            operand: Box::new(lower_expr(&pe.operand)),
        },
        pt::Expr::Infix(ie) => ast::ExprKind::Infix {
            op: ie.op,
            left: Box::new(lower_expr(&ie.left)),
            right: Box::new(lower_expr(&ie.right)),
        },
        // Parentheses only steer parsing; the inner node keeps its own span.
        pt::Expr::Grouping(g) => return lower_expr(&g.inner),
        pt::Expr::Call(call) => ast::ExprKind::Call {
            callee: lower_lvalue(&call.callee),
            args: call.args.items().map(lower_expr).collect(),
        },
        pt::Expr::FuncDef(fd) => ast::ExprKind::FuncDef(Rc::new(ast::FuncDef {
            params: fd
                .params
                .items()
                .map(|param| ast::Param {
                    name: lower_ident(&param.name),
                    ty: lower_type(&param.ty),
                })
                .collect(),
            return_type: fd.return_type.as_ref().map(lower_type),
            body: fd.body.iter().map(lower_stmt).collect(),
            span: span.clone(),
        })),
    };
    ast::Expr::new(kind, span)
}
