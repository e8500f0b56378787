//! Runtime values.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::ast::{Block, Ident};
use crate::env::Environment;

/// Canonical singletons, shared by every evaluation in a session.
pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;
pub const NOOP: Value = Value::Noop;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Null,
    Array(Vec<Value>),
    /// Keyed by hash identity; the original key value rides along for
    /// stringification.
    Hash(HashMap<HashKey, (Value, Value)>),
    Function(Function),
    Builtin(Builtin),
    /// Marks an executed `return`; unwinds until a function boundary and is
    /// never observed by user code.
    Return(Box<Value>),
    Error(String),
    /// Result of a `let` binding; suppressed by the REPL but distinct from
    /// Null.
    Noop,
}

impl Value {
    /// Type name used in diagnostics.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Noop => "NOOP",
        }
    }

    /// Only NULL and FALSE are false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Stable hash identity; only integers, booleans and strings are
    /// hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        let key = match self {
            Value::Integer(value) => HashKey {
                tag: self.type_tag(),
                value: *value as u64,
            },
            Value::Boolean(value) => HashKey {
                tag: self.type_tag(),
                value: u64::from(*value),
            },
            Value::Str(value) => {
                let mut hasher = DefaultHasher::new();
                value.hash(&mut hasher);
                HashKey {
                    tag: self.type_tag(),
                    value: hasher.finish(),
                }
            }
            _ => return None,
        };
        Some(key)
    }
}

/// A user function together with the environment captured at its creation.
#[derive(Debug, Clone)]
pub struct Function {
    pub parameters: Vec<Ident>,
    pub body: Block,
    pub env: Rc<Environment>,
}

// Captured environments can reach back to the function itself, so equality
// compares the environment by address, not content.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.env, &other.env)
            && self.parameters == other.parameters
            && self.body == other.body
    }
}

pub type BuiltinFn = fn(Vec<Value>) -> Value;

/// A native function exposed to the language by name.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    tag: &'static str,
    value: u64,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
            Value::Noop => write!(f, "noop"),
            Value::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{}]", elements)
            }
            Value::Hash(pairs) => {
                let pairs = pairs
                    .values()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", pairs)
            }
            Value::Function(func) => {
                let parameters = func
                    .parameters
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "fn({}) {{\n{}\n}}", parameters, func.body)
            }
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::Return(inner) => write!(f, "{}", inner),
            Value::Error(message) => write!(f, "⛔️ ERROR: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_hash_keys() {
        let hello1 = Value::Str("Hello World".to_string());
        let hello2 = Value::Str("Hello World".to_string());
        let diff1 = Value::Str("My name is law".to_string());
        let diff2 = Value::Str("My name is law".to_string());

        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_eq!(diff1.hash_key(), diff2.hash_key());
        assert_ne!(hello1.hash_key(), diff1.hash_key());
    }

    #[test]
    fn scalar_hash_keys() {
        assert_eq!(Value::Integer(1).hash_key(), Value::Integer(1).hash_key());
        assert_ne!(Value::Integer(1).hash_key(), Value::Integer(2).hash_key());
        assert_eq!(TRUE.hash_key(), Value::Boolean(true).hash_key());
        assert_ne!(TRUE.hash_key(), FALSE.hash_key());
        // Same 64-bit payload, different tag.
        assert_ne!(Value::Integer(1).hash_key(), TRUE.hash_key());
    }

    #[test]
    fn only_scalars_are_hashable() {
        assert!(NULL.hash_key().is_none());
        assert!(Value::Array(vec![]).hash_key().is_none());
        assert!(Value::Hash(HashMap::new()).hash_key().is_none());
    }

    #[test]
    fn type_tags() {
        assert_eq!(Value::Integer(1).type_tag(), "INTEGER");
        assert_eq!(TRUE.type_tag(), "BOOLEAN");
        assert_eq!(NULL.type_tag(), "NULL");
        assert_eq!(Value::Str(String::new()).type_tag(), "STRING");
        assert_eq!(Value::Array(vec![]).type_tag(), "ARRAY");
        assert_eq!(Value::Hash(HashMap::new()).type_tag(), "HASH");
        assert_eq!(NOOP.type_tag(), "NOOP");
        assert_eq!(Value::Error(String::new()).type_tag(), "ERROR");
        assert_eq!(
            Value::Return(Box::new(NULL)).type_tag(),
            "RETURN_VALUE"
        );
    }

    #[test]
    fn truthiness() {
        assert!(!NULL.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(TRUE.is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::Str(String::new()).is_truthy());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(TRUE.to_string(), "true");
        assert_eq!(NULL.to_string(), "null");
        assert_eq!(NOOP.to_string(), "noop");
        assert_eq!(Value::Str("abc".to_string()).to_string(), "abc");
        assert_eq!(
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(
            Value::Error("boom".to_string()).to_string(),
            "⛔️ ERROR: boom"
        );
        assert_eq!(
            Value::Return(Box::new(Value::Integer(7))).to_string(),
            "7"
        );
    }

    #[test]
    fn singletons_compare_by_value_identity() {
        assert_eq!(TRUE, Value::Boolean(true));
        assert_ne!(TRUE, FALSE);
        assert_eq!(NULL, Value::Null);
        assert_ne!(NULL, NOOP);
    }
}
