//! Built-in functions.
//!
//! Built-ins are resolved by name before variables, so a variable called
//! `print` cannot shadow the built-in at a call site.

use crate::print_handler::PrintHandlerImpl;
use crate::value::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Writes its arguments back to back.
    Print,
    /// Writes each argument on its own line.
    Println,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "print" => Some(Builtin::Print),
            "println" => Some(Builtin::Println),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Println => "println",
        }
    }

    /// Run the built-in. Both return nil.
    pub fn call(self, args: &[Value], out: &PrintHandlerImpl) -> Value {
        match self {
            Builtin::Print => {
                for arg in args {
                    out.write(&arg.print_string());
                }
            }
            Builtin::Println => {
                if args.is_empty() {
                    out.write_line("");
                }
                for arg in args {
                    out.write_line(&arg.print_string());
                }
            }
        }
        Value::Nil
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::print_handler::buffer_handler;

    #[test]
    fn lookup() {
        assert_eq!(Builtin::from_name("println"), Some(Builtin::Println));
        assert_eq!(Builtin::from_name("printf"), None);
        assert_eq!(Builtin::Print.name(), "print");
    }

    #[test]
    fn print_and_println() {
        let out = buffer_handler();
        let args = [Value::Int(1), Value::from("two"), Value::Nil];
        assert_eq!(Builtin::Print.call(&args, &out), Value::Nil);
        assert_eq!(out.output(), "1twonil");
        out.clear();
        Builtin::Println.call(&args, &out);
        assert_eq!(out.output(), "1\ntwo\nnil\n");
        out.clear();
        Builtin::Println.call(&[], &out);
        assert_eq!(out.output(), "\n");
    }
}
