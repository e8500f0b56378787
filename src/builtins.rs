//! Native functions reachable by bare name.
//!
//! The registry is consulted when identifier lookup in the environment
//! chain fails. Every builtin validates its own argument count and types
//! and reports misuse as an `Error` value.

use crate::object::{Builtin, Value, NULL};

pub fn lookup(name: &str) -> Option<Value> {
    let builtin = match name {
        "len" => Builtin {
            name: "len",
            func: builtin_len,
        },
        "first" => Builtin {
            name: "first",
            func: builtin_first,
        },
        "last" => Builtin {
            name: "last",
            func: builtin_last,
        },
        "rest" => Builtin {
            name: "rest",
            func: builtin_rest,
        },
        "push" => Builtin {
            name: "push",
            func: builtin_push,
        },
        _ => return None,
    };
    Some(Value::Builtin(builtin))
}

fn wrong_arity(got: usize, want: usize) -> Value {
    Value::Error(format!(
        "wrong number of arguments. got={}, want={}",
        got, want
    ))
}

fn builtin_len(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }

    match &args[0] {
        Value::Str(value) => Value::Integer(value.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        arg => Value::Error(format!(
            "argument to `len` not supported. got=`{}`",
            arg.type_tag()
        )),
    }
}

fn builtin_first(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }

    match &args[0] {
        Value::Array(elements) => elements.first().cloned().unwrap_or(NULL),
        arg => Value::Error(format!(
            "argument to `first` must be `ARRAY`, got=`{}`",
            arg.type_tag()
        )),
    }
}

fn builtin_last(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }

    match &args[0] {
        Value::Array(elements) => elements.last().cloned().unwrap_or(NULL),
        arg => Value::Error(format!(
            "argument to `last` must be `ARRAY`, got=`{}`",
            arg.type_tag()
        )),
    }
}

fn builtin_rest(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }

    match &args[0] {
        Value::Array(elements) if elements.is_empty() => NULL,
        Value::Array(elements) => Value::Array(elements[1..].to_vec()),
        arg => Value::Error(format!(
            "argument to `rest` must be `ARRAY`, got=`{}`",
            arg.type_tag()
        )),
    }
}

fn builtin_push(args: Vec<Value>) -> Value {
    match args.as_slice() {
        [Value::Array(elements), value] => {
            let mut elements = elements.clone();
            elements.push(value.clone());
            Value::Array(elements)
        }
        [arg, _] => Value::Error(format!(
            "argument to `push` must be `ARRAY`, got=`{}`",
            arg.type_tag()
        )),
        _ => wrong_arity(args.len(), 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Value>) -> Value {
        match lookup(name) {
            Some(Value::Builtin(builtin)) => (builtin.func)(args),
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    fn int_array(values: &[i64]) -> Value {
        Value::Array(values.iter().copied().map(Value::Integer).collect())
    }

    #[test]
    fn unknown_names_are_absent() {
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn len_of_string_and_array() {
        assert_eq!(
            call("len", vec![Value::Str("hello world".to_string())]),
            Value::Integer(11)
        );
        assert_eq!(
            call("len", vec![Value::Str(String::new())]),
            Value::Integer(0)
        );
        assert_eq!(call("len", vec![int_array(&[1, 2, 3])]), Value::Integer(3));
    }

    #[test]
    fn len_errors() {
        assert_eq!(
            call("len", vec![Value::Integer(1)]),
            Value::Error("argument to `len` not supported. got=`INTEGER`".to_string())
        );
        assert_eq!(
            call("len", vec![]),
            Value::Error("wrong number of arguments. got=0, want=1".to_string())
        );
        assert_eq!(
            call("len", vec![NULL, NULL]),
            Value::Error("wrong number of arguments. got=2, want=1".to_string())
        );
    }

    #[test]
    fn first_and_last() {
        assert_eq!(call("first", vec![int_array(&[1, 2, 3])]), Value::Integer(1));
        assert_eq!(call("last", vec![int_array(&[1, 2, 3])]), Value::Integer(3));
        assert_eq!(call("first", vec![int_array(&[])]), NULL);
        assert_eq!(call("last", vec![int_array(&[])]), NULL);
        assert_eq!(
            call("first", vec![Value::Integer(1)]),
            Value::Error("argument to `first` must be `ARRAY`, got=`INTEGER`".to_string())
        );
        assert_eq!(
            call("last", vec![Value::Str("x".to_string())]),
            Value::Error("argument to `last` must be `ARRAY`, got=`STRING`".to_string())
        );
    }

    #[test]
    fn rest_returns_a_new_array() {
        assert_eq!(call("rest", vec![int_array(&[1, 2, 3])]), int_array(&[2, 3]));
        assert_eq!(call("rest", vec![int_array(&[1])]), int_array(&[]));
        assert_eq!(call("rest", vec![int_array(&[])]), NULL);
        assert_eq!(
            call("rest", vec![NULL]),
            Value::Error("argument to `rest` must be `ARRAY`, got=`NULL`".to_string())
        );
    }

    #[test]
    fn push_is_non_destructive() {
        let original = int_array(&[1, 2]);
        let pushed = call("push", vec![original.clone(), Value::Integer(3)]);
        assert_eq!(pushed, int_array(&[1, 2, 3]));
        assert_eq!(original, int_array(&[1, 2]));

        assert_eq!(
            call("push", vec![Value::Integer(1), Value::Integer(2)]),
            Value::Error("argument to `push` must be `ARRAY`, got=`INTEGER`".to_string())
        );
        assert_eq!(
            call("push", vec![int_array(&[])]),
            Value::Error("wrong number of arguments. got=1, want=2".to_string())
        );
    }
}
