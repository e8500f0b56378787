//! API to control the interpreter.

use std::io::{self, Write};
use std::rc::Rc;

use crate::env::Environment;
use crate::eval;
use crate::lexer::Lexer;
use crate::object::Value;
use crate::parser::Parser;

/// Tree-walk interpreter session.
///
/// The environment persists across `eval` calls, so definitions from one
/// call are visible to the next.
///
/// # Example
///
/// Invoke the interpreter a first time to define a function then additional
/// times to call this function:
///
/// ```
/// use rmonkey::interpreter::Interpreter;
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.eval("let max = fn(x, y) { if (x > y) { x } else { y } };")?;
/// interp.eval("max(10, 20)")?;
/// interp.eval("max(5, 4)")?;
///
/// assert_eq!(output, b"20\n5\n");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'a, W: Write> {
    env: Rc<Environment>,
    output: &'a mut W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(output: &'a mut W) -> Interpreter<'a, W> {
        Interpreter {
            env: Environment::new(),
            output,
        }
    }

    /// Run one chunk of source against the session environment.
    ///
    /// Parse errors are written to the output, one per line, each prefixed
    /// with a tab, and nothing is evaluated. Otherwise the result's
    /// canonical string plus a newline is written, unless the result is
    /// null or a binding (runtime errors print like any other value, as
    /// `⛔️ ERROR: <message>`).
    pub fn eval(&mut self, source: &str) -> io::Result<()> {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();

        if !parser.errors().is_empty() {
            for message in parser.errors() {
                writeln!(self.output, "\t{}", message)?;
            }
            return Ok(());
        }

        match eval::eval(&program, &self.env) {
            Value::Null | Value::Noop => Ok(()),
            value => writeln!(self.output, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(inputs: &[&str]) -> String {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        for input in inputs {
            interp.eval(input).expect("write error");
        }
        String::from_utf8(raw_output).expect("cannot convert output to string")
    }

    #[test]
    fn expression_results_are_printed() {
        assert_eq!(interpret(&["3 * 2"]), "6\n");
        assert_eq!(interpret(&["\"hello\" + \" world\""]), "hello world\n");
    }

    #[test]
    fn bindings_and_null_are_suppressed() {
        assert_eq!(interpret(&["let a = 5;"]), "");
        assert_eq!(interpret(&["if (false) { 10 }"]), "");
        assert_eq!(interpret(&[""]), "");
    }

    #[test]
    fn environment_persists_across_lines() {
        assert_eq!(interpret(&["let a = 5;", "let b = a * 2;", "a + b"]), "15\n");
    }

    #[test]
    fn functions_survive_between_lines() {
        assert_eq!(
            interpret(&[
                "let newAdder = fn(x) { fn(y) { x + y } };",
                "let addTwo = newAdder(2);",
                "addTwo(2)",
            ]),
            "4\n"
        );
    }

    #[test]
    fn runtime_errors_print_as_values() {
        assert_eq!(
            interpret(&["true + false"]),
            "⛔️ ERROR: unknown operator: BOOLEAN + BOOLEAN\n"
        );
        assert_eq!(
            interpret(&["len(1)"]),
            "⛔️ ERROR: argument to `len` not supported. got=`INTEGER`\n"
        );
    }

    #[test]
    fn parse_errors_are_tab_prefixed_and_skip_evaluation() {
        assert_eq!(
            interpret(&["let x 5;"]),
            "\texpected next token to be \"=\", got \"INT\" instead\n"
        );
        // The bad line leaves no binding behind.
        assert_eq!(
            interpret(&["let x 5;", "7"]),
            "\texpected next token to be \"=\", got \"INT\" instead\n7\n"
        );
    }
}
