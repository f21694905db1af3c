#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use structlang_ir::ast;
use structlang_ir::parse_tree::{Expr, Stmt};
use structlang_lexer::{filter_comments, lex};

use super::*;

fn tokens(source: &str) -> Vec<Token> {
    filter_comments(lex(source, "").unwrap())
}

fn parse_src(source: &str) -> Result<parse_tree::Program, ParseError> {
    parse(&tokens(source))
}

/// Parse a single expression statement and render it.
fn sexpr(source: &str) -> String {
    let program = parse_src(source).unwrap();
    assert_eq!(program.stmts.len(), 1);
    match &program.stmts[0] {
        Stmt::Expr(es) => es.expr.to_string(),
        other => panic!("expected expression statement, got {other}"),
    }
}

mod precedence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn product_binds_tighter_than_sum() {
        assert_eq!(sexpr("1 + 2 * 3;"), "(+ 1 (* 2 3))");
        assert_eq!(sexpr("1 * 2 + 3;"), "(+ (* 1 2) 3)");
    }

    #[test]
    fn grouping_overrides() {
        assert_eq!(sexpr("(1 + 2) * 3;"), "(* ((+ 1 2)) 3)");
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(sexpr("1 - 2 - 3;"), "(- (- 1 2) 3)");
        assert_eq!(sexpr("8 / 4 / 2;"), "(/ (/ 8 4) 2)");
    }

    #[test]
    fn comparison_below_sum_and_logical_below_comparison() {
        assert_eq!(sexpr("a + 1 > b and c;"), "(and (> (+ a 1) b) c)");
        assert_eq!(sexpr("a or b == c;"), "(or a (== b c))");
    }

    #[test]
    fn prefix_binds_tighter_than_infix() {
        assert_eq!(sexpr("-1 + 2;"), "(+ (- 1) 2)");
        assert_eq!(sexpr("not a and b;"), "(and (not a) b)");
        assert_eq!(sexpr("- -x;"), "(- (- x))");
    }

    #[test]
    fn call_binds_tightest() {
        assert_eq!(sexpr("-f(1, 2) * 3;"), "(* (- (f (1 2))) 3)");
    }

    #[test]
    fn right_associative_registration() {
        let mut table = OperatorTable::standard();
        table.infix_right(structlang_ir::TokenKind::Minus, structlang_ir::Precedence::Sum);
        let toks = tokens("1 - 2 - 3;");
        let program = Parser::with_table(&toks, table).parse_program().unwrap();
        assert_eq!(program.stmts[0].to_string(), "((- 1 (- 2 3)) ;)");
    }
}

mod expressions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_access_chain_leans_left() {
        assert_eq!(sexpr("a->b->c;"), "(-> (-> a b) c)");
    }

    #[test]
    fn struct_literal_with_type_args() {
        assert_eq!(sexpr("Box[int]{v: 5};"), "(Box[int] {(v:5)})");
        assert_eq!(
            sexpr("Pair[int, string]{a: 1, b: \"x\",};"),
            "(Pair[int,string] {(a:1) (b:\"x\")})"
        );
    }

    #[test]
    fn struct_literal_without_type_args() {
        assert_eq!(sexpr("Point{};"), "(Point {})");
    }

    #[test]
    fn call_on_field_access() {
        assert_eq!(sexpr("obj->method(x);"), "((-> obj method) (x))");
    }

    #[test]
    fn function_literal() {
        assert_eq!(
            sexpr("func(n int, m int) int { return n; };"),
            "(func ((n int) (m int)) int {(return n ;)})"
        );
        assert_eq!(sexpr("func() { };"), "(func () {})");
    }

    #[test]
    fn literals() {
        assert_eq!(sexpr("nil;"), "nil");
        assert_eq!(sexpr("true;"), "true");
        assert_eq!(sexpr("1.5;"), "1.5");
        assert_eq!(sexpr("\"s\";"), "\"s\"");
    }
}

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_def_with_grouped_fields() {
        let program = parse_src("type Pair[T, U] = struct[T, U]{a, b T; c U};").unwrap();
        assert_eq!(
            program.stmts[0].to_string(),
            "(type Pair[T,U] = (struct [T,U] {(a b T) (c U)}) ;)"
        );
    }

    #[test]
    fn struct_fields_accept_trailing_semicolon() {
        assert!(parse_src("type P = struct{x int; y int;};").is_ok());
        assert!(parse_src("type P = struct{x int; y int};").is_ok());
        assert!(parse_src("type E = struct{};").is_ok());
    }

    #[test]
    fn let_set_return() {
        let program = parse_src("let x = 1; set x->y = 2; return; return x;").unwrap();
        let rendered: Vec<String> = program.stmts.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "(let x = 1 ;)",
                "(set (-> x y) = 2 ;)",
                "(return ;)",
                "(return x ;)",
            ]
        );
    }

    #[test]
    fn every_token_is_kept() {
        let program = parse_src("let x = (1);").unwrap();
        let Stmt::VarDef(vd) = &program.stmts[0] else {
            panic!("expected vardef");
        };
        assert_eq!(vd.let_kw.lexeme, "let");
        assert_eq!(vd.eq.lexeme, "=");
        assert_eq!(vd.semicolon.lexeme, ";");
        let Expr::Grouping(g) = &vd.value else {
            panic!("expected grouping");
        };
        assert_eq!((g.lparen.lexeme.as_str(), g.rparen.lexeme.as_str()), ("(", ")"));
        assert!(program.eof.is_some());
    }

    #[test]
    fn call_args_keep_separators() {
        let program = parse_src("f(1, 2, 3);").unwrap();
        let Stmt::Expr(es) = &program.stmts[0] else {
            panic!("expected expression statement");
        };
        let Expr::Call(call) = &es.expr else {
            panic!("expected call");
        };
        assert_eq!(call.args.len(), 3);
        assert_eq!(call.args.separators().count(), 2);
    }

    #[test]
    fn comments_are_ignored_once_filtered() {
        let program = parse_src("// header\nlet x = 1; // trailing\n").unwrap();
        assert_eq!(program.stmts.len(), 1);
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_semicolon_is_an_error() {
        let err = parse_src("let x = 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "in stmt: in vardef: expected `;`, found `end of file` at 1:10"
        );
    }

    #[test]
    fn context_chain_is_outermost_first() {
        let err = parse_src("type P = struct{x int y int};").unwrap_err();
        let chain: Vec<ErrorContext> = err.context_chain().collect();
        assert_eq!(
            chain,
            vec![
                ErrorContext::Stmt,
                ErrorContext::TypeDef,
                ErrorContext::StructDef,
                ErrorContext::StructFields,
            ]
        );
        assert_eq!(err.position.unwrap().col, 23);
    }

    #[test]
    fn no_prefix_rule() {
        let err = parse_src("let x = ;").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::NoPrefixRule {
                found: ";".to_string()
            }
        );
    }

    #[test]
    fn callee_must_be_lvalue() {
        let err = parse_src("(f)(1);").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::CalleeNotLvalue);
        assert_eq!(err.context.first(), Some(&ErrorContext::Call));
    }

    #[test]
    fn trailing_comma_rejected_in_parameter_and_argument_lists() {
        assert!(parse_src("func(a int,) { };").is_err());
        assert!(parse_src("f(1,);").is_err());
    }

    #[test]
    fn trailing_comma_rejected_in_name_lists() {
        let err = parse_src("type P = struct[T,]{x T};").unwrap_err();
        assert_eq!(err.context.first(), Some(&ErrorContext::NameList));
        assert!(parse_src("type P = struct{a, int};").is_err());
    }

    #[test]
    fn empty_name_list() {
        let err = parse_src("type P = struct[]{};").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyNameList);
    }

    #[test]
    fn stray_closing_brace_at_top_level() {
        let err = parse_src("1; }").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn unclosed_function_body() {
        assert!(parse_src("let f = func() { return 1;").is_err());
    }

    #[test]
    fn out_of_tokens_without_eof() {
        let mut toks = tokens("let x = 1");
        toks.pop();
        let err = parse(&toks).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::OutOfTokens);
    }
}

mod lowering {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lower(source: &str) -> ast::Program {
        build_ast(&parse_src(source).unwrap())
    }

    #[test]
    fn grouping_collapses() {
        let program = lower("(1 + 2) * 3;");
        let ast::Stmt::Expr(expr) = &program.stmts[0] else {
            panic!("expected expression");
        };
        assert_eq!(expr.to_string(), "(* (+ 1 2) 3)");
    }

    #[test]
    fn field_access_tree_is_left_leaning() {
        let program = lower("a->b->c;");
        let ast::Stmt::Expr(expr) = &program.stmts[0] else {
            panic!("expected expression");
        };
        let ast::ExprKind::FieldAccess(outer) = &expr.kind else {
            panic!("expected field access");
        };
        assert_eq!(outer.field.name, "c");
        let ast::Lvalue::FieldAccess(inner) = outer.base.as_ref() else {
            panic!("expected nested field access");
        };
        assert_eq!(inner.field.name, "b");
        assert_eq!(inner.base.base().name, "a");
    }

    #[test]
    fn spans_cover_first_and_last_token() {
        let program = lower("let total = 1 + 22;");
        let span = program.stmts[0].span();
        assert_eq!((span.start.col, span.end.col), (1, 19));

        let ast::Stmt::VarDef(vd) = &program.stmts[0] else {
            panic!("expected vardef");
        };
        assert_eq!((vd.value.span.start.col, vd.value.span.end.col), (13, 17));
    }

    #[test]
    fn struct_def_params_and_fields() {
        let program = lower("type Pair[T, U] = struct[T, U]{a, b T; c U};");
        let ast::Stmt::TypeDef(td) = &program.stmts[0] else {
            panic!("expected typedef");
        };
        assert_eq!(td.name.to_string(), "Pair[T,U]");
        let params: Vec<&str> = td.def.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["T", "U"]);
        assert_eq!(td.def.fields.len(), 2);
        assert_eq!(td.def.fields[0].names.len(), 2);
    }

    #[test]
    fn function_bodies_are_lowered() {
        let program = lower("let f = func(n int) int { let y = (n); return y; };");
        let ast::Stmt::VarDef(vd) = &program.stmts[0] else {
            panic!("expected vardef");
        };
        let ast::ExprKind::FuncDef(def) = &vd.value.kind else {
            panic!("expected function literal");
        };
        assert_eq!(def.to_string(), "func(n int) int");
        assert_eq!(def.body.len(), 2);
        let ast::Stmt::VarDef(inner) = &def.body[0] else {
            panic!("expected vardef in body");
        };
        assert!(matches!(inner.value.kind, ast::ExprKind::Ident(_)));
    }
}
