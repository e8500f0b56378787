//! A tree-walking interpreter for the Monkey programming language.
//!
//! Source text flows through three stages: the lexer turns bytes into a
//! lazy token stream, the Pratt parser builds a typed syntax tree, and the
//! evaluator walks the tree against lexically scoped environments, with
//! first-class functions closing over their defining scope.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - Integers are 64-bit signed; there is no floating point.
//! - Only ASCII source is supported, and string literals have no escape
//!   sequences.
//! - Bindings cannot be reassigned, only shadowed by another `let`.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod interpreter;

pub mod ast;
pub mod builtins;
pub mod env;
pub mod eval;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

mod trace;
