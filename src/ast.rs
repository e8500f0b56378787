//! Syntax tree produced by the parser.
//!
//! Statements and expressions are closed sum types dispatched by pattern
//! match in the evaluator. Every node keeps the token that introduced it
//! for diagnostics, and every node has a canonical text form via `Display`.

use std::fmt;

use crate::token::Token;

/// A parsed source unit: the ordered statements of a program.
///
/// Statements that failed to parse are recorded as errors on the parser and
/// never appear here.
#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Let {
        token: Token,
        name: Ident,
        value: Expr,
    },
    Return {
        token: Token,
        value: Expr,
    },
    Expr {
        token: Token,
        expr: Expr,
    },
}

/// `{ ... }` statement sequence, the body form of `if` and `fn`.
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Ident(Ident),
    Int {
        token: Token,
        value: i64,
    },
    Bool {
        token: Token,
        value: bool,
    },
    Str {
        token: Token,
        value: String,
    },
    Array {
        token: Token,
        elements: Vec<Expr>,
    },
    /// Hash literal; pairs keep source order so diagnostics and
    /// stringification are stable.
    Hash {
        token: Token,
        pairs: Vec<(Expr, Expr)>,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expr>,
    },
    Infix {
        token: Token,
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        token: Token,
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        token: Token,
        parameters: Vec<Ident>,
        body: Block,
    },
    Call {
        token: Token,
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Index {
        token: Token,
        left: Box<Expr>,
        index: Box<Expr>,
    },
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
            Stmt::Return { value, .. } => write!(f, "return {};", value),
            Stmt::Expr { expr, .. } => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(ident) => write!(f, "{}", ident),
            Expr::Int { token, .. } => write!(f, "{}", token.literal),
            Expr::Bool { token, .. } => write!(f, "{}", token.literal),
            Expr::Str { token, .. } => write!(f, "{}", token.literal),
            Expr::Array { elements, .. } => write!(f, "[{}]", join(elements, ", ")),
            Expr::Hash { pairs, .. } => {
                let pairs = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", pairs)
            }
            Expr::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expr::Infix {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, "else {}", alt)?;
                }
                Ok(())
            }
            Expr::Function {
                parameters, body, ..
            } => write!(f, "fn({}) {}", join(parameters, ", "), body),
            Expr::Call {
                function,
                arguments,
                ..
            } => write!(f, "{}({})", function, join(arguments, ", ")),
            Expr::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn ident(name: &str) -> Ident {
        Ident {
            token: Token::new(TokenKind::Ident, name),
            name: name.to_string(),
        }
    }

    #[test]
    fn let_statement_string() {
        let program = Program {
            statements: vec![Stmt::Let {
                token: Token::new(TokenKind::Let, "let"),
                name: ident("myVar"),
                value: Expr::Ident(ident("anotherVar")),
            }],
        };
        assert_eq!(program.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn return_statement_string() {
        let stmt = Stmt::Return {
            token: Token::new(TokenKind::Return, "return"),
            value: Expr::Int {
                token: Token::new(TokenKind::Int, "5"),
                value: 5,
            },
        };
        assert_eq!(stmt.to_string(), "return 5;");
    }

    #[test]
    fn nested_expression_string() {
        let five = Expr::Int {
            token: Token::new(TokenKind::Int, "5"),
            value: 5,
        };
        let neg = Expr::Prefix {
            token: Token::new(TokenKind::Minus, "-"),
            operator: "-".to_string(),
            right: Box::new(five.clone()),
        };
        let sum = Expr::Infix {
            token: Token::new(TokenKind::Plus, "+"),
            operator: "+".to_string(),
            left: Box::new(neg),
            right: Box::new(five),
        };
        assert_eq!(sum.to_string(), "((-5) + 5)");
    }

    #[test]
    fn collection_literal_strings() {
        let one = Expr::Int {
            token: Token::new(TokenKind::Int, "1"),
            value: 1,
        };
        let two = Expr::Int {
            token: Token::new(TokenKind::Int, "2"),
            value: 2,
        };

        let array = Expr::Array {
            token: Token::new(TokenKind::Lbracket, "["),
            elements: vec![one.clone(), two.clone()],
        };
        assert_eq!(array.to_string(), "[1, 2]");

        let hash = Expr::Hash {
            token: Token::new(TokenKind::Lbrace, "{"),
            pairs: vec![(one.clone(), two.clone())],
        };
        assert_eq!(hash.to_string(), "{1: 2}");

        let index = Expr::Index {
            token: Token::new(TokenKind::Lbracket, "["),
            left: Box::new(array),
            index: Box::new(one),
        };
        assert_eq!(index.to_string(), "([1, 2][1])");
    }
}
