#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use structlang_lexer::{filter_comments, lex};
use structlang_parse::{build_ast, parse};

use super::*;
use crate::buffer_handler;

fn program(source: &str) -> ast::Program {
    let tokens = filter_comments(lex(source, "").unwrap());
    build_ast(&parse(&tokens).unwrap())
}

fn interpreter() -> Interpreter {
    Interpreter::builder().print_handler(buffer_handler()).build()
}

fn run_in(interp: &mut Interpreter, source: &str) -> Result<Option<Value>, EvalError> {
    interp.run(&program(source))
}

fn eval(source: &str) -> Result<Option<Value>, EvalError> {
    run_in(&mut interpreter(), source)
}

fn eval_ok(source: &str) -> Value {
    eval(source).unwrap().unwrap_or(Value::Nil)
}

fn eval_err(source: &str) -> EvalErrorKind {
    eval(source).unwrap_err().kind
}

mod expressions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval_ok("return 1 + 2 * 3;"), Value::Int(7));
        assert_eq!(eval_ok("return (1 + 2) * 3;"), Value::Int(9));
        assert_eq!(eval_ok("return 2 * -3 + 10 / 2;"), Value::Int(-1));
    }

    #[test]
    fn integer_division_by_zero_is_zero() {
        assert_eq!(eval_ok("return 10 / 0;"), Value::Int(0));
    }

    #[test]
    fn literals() {
        assert_eq!(eval_ok("return 1.5 * 2.0;"), Value::Float(3.0));
        assert_eq!(eval_ok("return \"a\\tb\";"), Value::from("a\tb"));
        assert_eq!(eval_ok("return nil;"), Value::Nil);
        assert_eq!(eval_ok("return not false and true;"), Value::Bool(true));
    }

    #[test]
    fn integer_literal_out_of_range() {
        assert_eq!(
            eval_err("return 99999999999999999999;"),
            EvalErrorKind::InvalidLiteral {
                lexeme: "99999999999999999999".to_string()
            }
        );
    }

    #[test]
    fn unsupported_operator() {
        assert_eq!(
            eval_err("1 + \"a\";"),
            EvalErrorKind::UnsupportedInfix {
                op: "+".to_string(),
                left: "int".to_string(),
                right: "string".to_string(),
            }
        );
        assert!(matches!(
            eval_err("not 1;"),
            EvalErrorKind::UnsupportedPrefix { .. }
        ));
    }

    #[test]
    fn primitive_pseudo_fields() {
        assert_eq!(eval_ok("let s = \"héllo\"; return s->len;"), Value::Int(5));
        assert_eq!(eval_ok("let s = 3; return s->name;"), Value::from("int"));
        assert_eq!(eval_ok("let s = 3; return s->v;"), Value::Int(3));
        assert_eq!(eval_ok("let s = 3; return s->other;"), Value::Nil);
    }

    #[test]
    fn error_span_points_at_innermost_node() {
        let err = eval("let x = 1 + y;").unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UndefinedVariable { name: "y".to_string() });
        let span = err.span.unwrap();
        assert_eq!((span.start.line, span.start.col), (1, 13));
    }
}

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn undefined_variable() {
        assert_eq!(
            eval_err("x;"),
            EvalErrorKind::UndefinedVariable { name: "x".to_string() }
        );
    }

    #[test]
    fn set_requires_existing_variable() {
        assert_eq!(
            eval_err("set x = 1;"),
            EvalErrorKind::UndefinedVariable { name: "x".to_string() }
        );
    }

    #[test]
    fn set_requires_same_type() {
        assert_eq!(
            eval_err("let x = 1; set x = \"s\";"),
            EvalErrorKind::SetTypeMismatch {
                name: "x".to_string(),
                expected: "int".to_string(),
                found: "string".to_string(),
            }
        );
    }

    #[test]
    fn set_overwrites() {
        assert_eq!(eval_ok("let x = 1; set x = 2; return x;"), Value::Int(2));
    }

    #[test]
    fn let_rebinds_freely() {
        assert_eq!(eval_ok("let x = 1; let x = \"s\"; return x;"), Value::from("s"));
    }

    #[test]
    fn return_stops_execution() {
        assert_eq!(eval("return 1; missing;").unwrap(), Some(Value::Int(1)));
        assert_eq!(eval("return;").unwrap(), Some(Value::Nil));
        assert_eq!(eval("1;").unwrap(), None);
    }

    #[test]
    fn first_error_aborts_the_rest() {
        let mut interp = interpreter();
        assert!(run_in(&mut interp, "let a = 1; b; let c = 3;").is_err());
        let env = interp.global_env();
        assert!(env.lookup_variable("a").is_some());
        assert!(env.lookup_variable("c").is_none());
    }

    #[test]
    fn final_environment_is_inspectable() {
        let mut interp = interpreter();
        run_in(&mut interp, "type P = struct{x int}; let b = 2; let a = 1;").unwrap();
        let names: Vec<String> = interp
            .global_env()
            .variables()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(interp.global_env().types()[0].0, "P");
    }
}

mod structs {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOX: &str = "type Box[T] = struct[T]{v T};";

    #[test]
    fn generic_round_trip() {
        let src = format!("{BOX} let b = Box[int]{{v: 5}}; return b->v;");
        assert_eq!(eval_ok(&src), Value::Int(5));
    }

    #[test]
    fn field_type_mismatch() {
        let src = format!("{BOX} let b = Box[int]{{v: \"s\"}};");
        assert_eq!(
            eval_err(&src),
            EvalErrorKind::FieldTypeMismatch {
                field: "v".to_string(),
                expected: "int".to_string(),
                found: "string".to_string(),
            }
        );
    }

    #[test]
    fn type_argument_arity() {
        let src = format!("{BOX} let b = Box{{v: 1}};");
        assert_eq!(
            eval_err(&src),
            EvalErrorKind::TypeArgumentArity {
                type_name: "Box".to_string(),
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn unknown_type_and_field() {
        assert_eq!(
            eval_err("let p = P{};"),
            EvalErrorKind::UndefinedType { name: "P".to_string() }
        );
        let src = format!("{BOX} let b = Box[int]{{w: 1}};");
        assert_eq!(
            eval_err(&src),
            EvalErrorKind::UnknownField {
                type_name: "Box".to_string(),
                field: "w".to_string(),
            }
        );
    }

    #[test]
    fn template_survives_instantiation() {
        let src = format!(
            "{BOX} let a = Box[int]{{v: 1}}; let b = Box[string]{{v: \"s\"}}; return b->v;"
        );
        assert_eq!(eval_ok(&src), Value::from("s"));
    }

    #[test]
    fn type_argument_sharing_a_parameter_name() {
        let src = "type B = struct{x int};
                   type P = struct[A, B]{a A; b B};
                   let p = P[B, int]{a: B{x: 1}, b: 2};
                   return p->a->x + p->b;";
        assert_eq!(eval_ok(src), Value::Int(3));
    }

    #[test]
    fn struct_def_parameters_are_authoritative() {
        let src = "type Pair[A, B] = struct[K, V]{k K; v V};
                   let p = Pair[int, string]{k: 1, v: \"x\"};
                   return p->v;";
        assert_eq!(eval_ok(src), Value::from("x"));
    }

    #[test]
    fn nested_struct_fields_compare_base_names() {
        let src = format!(
            "{BOX} type Outer = struct[T]{{inner Box[T]}};
             let o = Outer[int]{{inner: Box[int]{{v: 3}}}};
             return o->inner->v;"
        );
        assert_eq!(eval_ok(&src), Value::Int(3));
    }

    #[test]
    fn partial_literals_read_nil() {
        assert_eq!(
            eval_ok("type P = struct{x, y int}; let p = P{x: 1}; return p->y;"),
            Value::Nil
        );
    }

    #[test]
    fn strict_mode_requires_every_field() {
        let mut interp = Interpreter::builder()
            .strict_struct_literals(true)
            .print_handler(buffer_handler())
            .build();
        let err = run_in(&mut interp, "type P = struct{x, y int}; let p = P{x: 1};").unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::MissingField {
                type_name: "P".to_string(),
                field: "y".to_string(),
            }
        );
    }

    #[test]
    fn chained_field_access() {
        let src = "type P = struct{x int}; type L = struct{a P};
                   let l = L{a: P{x: 4}}; return l->a->x;";
        assert_eq!(eval_ok(src), Value::Int(4));
    }

    #[test]
    fn set_field() {
        let src = "type P = struct{x, y int}; let p = P{x: 1, y: 2};
                   set p->x = 10; return p->x + p->y;";
        assert_eq!(eval_ok(src), Value::Int(12));
    }

    #[test]
    fn set_nested_field() {
        let src = "type P = struct{x, y int}; type L = struct{a P};
                   let l = L{a: P{x: 1, y: 2}}; set l->a->y = 7; return l->a->y;";
        assert_eq!(eval_ok(src), Value::Int(7));
    }

    #[test]
    fn set_field_checks_type() {
        let src = "type P = struct{x int}; let p = P{x: 1}; set p->x = \"s\";";
        assert!(matches!(
            eval_err(src),
            EvalErrorKind::FieldTypeMismatch { .. }
        ));
    }

    #[test]
    fn set_field_on_primitive() {
        assert_eq!(
            eval_err("let n = 1; set n->x = 2;"),
            EvalErrorKind::InvalidAssignmentTarget {
                field: "x".to_string(),
                type_name: "int".to_string(),
            }
        );
    }

    #[test]
    fn structs_are_values() {
        let src = "type P = struct{x int}; let a = P{x: 1}; let b = a;
                   set b->x = 2; return a->x;";
        assert_eq!(eval_ok(src), Value::Int(1));
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn call_isolation() {
        let mut interp = interpreter();
        let src = "let f = func(n int) int { let y = n; return y; };
                   let a = f(3); let b = f(5);";
        run_in(&mut interp, src).unwrap();
        let env = interp.global_env();
        assert_eq!(env.lookup_variable("a"), Some(Value::Int(3)));
        assert_eq!(env.lookup_variable("b"), Some(Value::Int(5)));
        assert_eq!(env.lookup_variable("y"), None);
        assert_eq!(env.lookup_variable("n"), None);
    }

    #[test]
    fn fall_through_returns_nil() {
        assert_eq!(eval_ok("let f = func() { 1; }; return f();"), Value::Nil);
    }

    #[test]
    fn closures_see_later_assignments() {
        let src = "let count = 1; let get = func() int { return count; };
                   set count = 5; return get();";
        assert_eq!(eval_ok(src), Value::Int(5));
    }

    #[test]
    fn closures_write_through_to_captured_scope() {
        let src = "let c = 0; let inc = func() { set c = c + 1; };
                   inc(); inc(); return c;";
        assert_eq!(eval_ok(src), Value::Int(2));
    }

    #[test]
    fn nested_closures_capture_by_reference() {
        let src = "let make = func(base int) int {
                       let add = func(n int) int { return base + n; };
                       return add(10);
                   };
                   return make(5);";
        assert_eq!(eval_ok(src), Value::Int(15));
    }

    #[test]
    fn argument_count_and_type() {
        assert_eq!(
            eval_err("let f = func(a int) { }; f();"),
            EvalErrorKind::ArgumentCount {
                callee: "f".to_string(),
                expected: 1,
                found: 0,
            }
        );
        assert_eq!(
            eval_err("let f = func(a int) { }; f(\"s\");"),
            EvalErrorKind::ArgumentType {
                callee: "f".to_string(),
                param: "a".to_string(),
                expected: "int".to_string(),
                found: "string".to_string(),
            }
        );
    }

    #[test]
    fn not_callable() {
        assert_eq!(
            eval_err("let x = 1; x();"),
            EvalErrorKind::NotCallable {
                name: "x".to_string(),
                type_name: "int".to_string(),
            }
        );
    }

    #[test]
    fn recursion_limit() {
        let mut interp = Interpreter::builder()
            .max_call_depth(Some(8))
            .print_handler(buffer_handler())
            .build();
        let err = run_in(&mut interp, "let f = func(n int) int { return f(n + 1); }; f(0);")
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::RecursionLimitExceeded { limit: 8 });
        assert_eq!(err.backtrace.unwrap().len(), 8);
    }

    #[test]
    fn errors_in_calls_carry_a_backtrace() {
        let src = "let g = func() int { return missing; };
                   let f = func() int { return g(); };
                   f();";
        let err = eval(src).unwrap_err();
        let names: Vec<String> = err
            .backtrace
            .unwrap()
            .frames()
            .iter()
            .map(|frame| frame.name.clone())
            .collect();
        assert_eq!(names, vec!["g".to_string(), "f".to_string()]);
    }

    #[test]
    fn types_declared_in_bodies_stay_local() {
        let src = "let f = func() { type Inner = struct{x int}; };
                   f(); let i = Inner{x: 1};";
        assert_eq!(
            eval_err(src),
            EvalErrorKind::UndefinedType { name: "Inner".to_string() }
        );
    }
}

mod builtins {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn println_and_print() {
        let mut interp = interpreter();
        run_in(
            &mut interp,
            "println(\"hello\", 3); print(1.5, true); print(nil); println();",
        )
        .unwrap();
        assert_eq!(interp.print_handler().output(), "hello\n3\n1.5truenil\n");
    }

    #[test]
    fn println_prints_structs() {
        let mut interp = interpreter();
        run_in(
            &mut interp,
            "type P = struct{y, x int}; println(P{x: 1, y: 2});",
        )
        .unwrap();
        assert_eq!(interp.print_handler().output(), "P{x: 1, y: 2}\n");
    }

    #[test]
    fn builtins_return_nil() {
        assert_eq!(eval_ok("return print();"), Value::Nil);
    }
}
