use std::fmt;

/// "Words" produced by `Lexer`.
///
/// A token pairs its category with the exact source text that produced it;
/// the literal feeds identifier names, integer parsing and diagnostics.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Token {
        Token {
            kind,
            literal: literal.into(),
        }
    }
}

/// Token categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    Ident,
    Int,
    Str,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    Lparen,
    Rparen,
    Lbrace,
    Rbrace,
    Lbracket,
    Rbracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Lparen => "(",
            TokenKind::Rparen => ")",
            TokenKind::Lbrace => "{",
            TokenKind::Rbrace => "}",
            TokenKind::Lbracket => "[",
            TokenKind::Rbracket => "]",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
        };
        write!(f, "{}", name)
    }
}

const KEYWORDS: [(&str, TokenKind); 7] = [
    ("fn", TokenKind::Function),
    ("let", TokenKind::Let),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("return", TokenKind::Return),
];

/// Classify an identifier run: keyword kind if reserved, IDENT otherwise.
pub fn lookup_ident(literal: &str) -> TokenKind {
    for (name, kind) in KEYWORDS {
        if name == literal {
            return kind;
        }
    }
    TokenKind::Ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_classified() {
        assert_eq!(lookup_ident("fn"), TokenKind::Function);
        assert_eq!(lookup_ident("let"), TokenKind::Let);
        assert_eq!(lookup_ident("true"), TokenKind::True);
        assert_eq!(lookup_ident("false"), TokenKind::False);
        assert_eq!(lookup_ident("if"), TokenKind::If);
        assert_eq!(lookup_ident("else"), TokenKind::Else);
        assert_eq!(lookup_ident("return"), TokenKind::Return);
    }

    #[test]
    fn non_keywords_are_identifiers() {
        assert_eq!(lookup_ident("foo"), TokenKind::Ident);
        assert_eq!(lookup_ident("lets"), TokenKind::Ident);
        assert_eq!(lookup_ident("_"), TokenKind::Ident);
    }

    #[test]
    fn display_uses_operator_spelling() {
        assert_eq!(TokenKind::Assign.to_string(), "=");
        assert_eq!(TokenKind::NotEq.to_string(), "!=");
        assert_eq!(TokenKind::Lbracket.to_string(), "[");
        assert_eq!(TokenKind::Function.to_string(), "FUNCTION");
    }
}
