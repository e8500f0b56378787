//! Recursive tree-walking evaluator.
//!
//! `eval` dispatches on syntax variants and always returns a `Value`:
//! runtime failures travel as `Value::Error` and `return` statements as
//! `Value::Return`, both cut evaluation short as soon as they appear.
//! `Return` is unwrapped only at program level and at function application,
//! so a nested `return` unwinds through every enclosing block first.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Block, Expr, Ident, Program, Stmt};
use crate::builtins;
use crate::env::Environment;
use crate::object::{Function, Value, FALSE, NOOP, NULL, TRUE};

/// Evaluate a parsed program against `env`.
pub fn eval(program: &Program, env: &Rc<Environment>) -> Value {
    let mut result = NULL;

    for stmt in &program.statements {
        match eval_statement(stmt, env) {
            Value::Return(inner) => return *inner,
            err @ Value::Error(_) => return err,
            value => result = value,
        }
    }

    result
}

fn eval_statement(stmt: &Stmt, env: &Rc<Environment>) -> Value {
    match stmt {
        Stmt::Let { name, value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            env.set(&name.name, value);
            NOOP
        }
        Stmt::Return { value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            Value::Return(Box::new(value))
        }
        Stmt::Expr { expr, .. } => eval_expression(expr, env),
    }
}

// Return and Error pass through unchanged so only the program or the
// enclosing function call unwraps them.
fn eval_block(block: &Block, env: &Rc<Environment>) -> Value {
    let mut result = NULL;

    for stmt in &block.statements {
        result = eval_statement(stmt, env);
        if matches!(result, Value::Return(_) | Value::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_expression(expr: &Expr, env: &Rc<Environment>) -> Value {
    match expr {
        Expr::Int { value, .. } => Value::Integer(*value),
        Expr::Bool { value, .. } => native_bool(*value),
        Expr::Str { value, .. } => Value::Str(value.clone()),
        Expr::Ident(ident) => eval_identifier(ident, env),
        Expr::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(operator, right)
        }
        Expr::Infix {
            operator,
            left,
            right,
            ..
        } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(operator, left, right)
        }
        Expr::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = eval_expression(condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                NULL
            }
        }
        Expr::Function {
            parameters, body, ..
        } => Value::Function(Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: Rc::clone(env),
        }),
        Expr::Call {
            function,
            arguments,
            ..
        } => {
            let function = eval_expression(function, env);
            if function.is_error() {
                return function;
            }
            let mut args = eval_expressions(arguments, env);
            if args.len() == 1 && args[0].is_error() {
                return args.remove(0);
            }
            apply_function(function, args)
        }
        Expr::Array { elements, .. } => {
            let mut elements = eval_expressions(elements, env);
            if elements.len() == 1 && elements[0].is_error() {
                return elements.remove(0);
            }
            Value::Array(elements)
        }
        Expr::Hash { pairs, .. } => eval_hash_literal(pairs, env),
        Expr::Index { left, index, .. } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
    }
}

fn native_bool(value: bool) -> Value {
    if value {
        TRUE
    } else {
        FALSE
    }
}

fn new_error(message: String) -> Value {
    Value::Error(message)
}

fn eval_identifier(ident: &Ident, env: &Rc<Environment>) -> Value {
    if let Some(value) = env.get(&ident.name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(&ident.name) {
        return builtin;
    }
    new_error(format!("identifier not found: {}", ident.name))
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => eval_bang_expression(right),
        "-" => eval_minus_expression(right),
        _ => new_error(format!("unknown operator: {}{}", operator, right.type_tag())),
    }
}

fn eval_bang_expression(right: Value) -> Value {
    match right {
        Value::Boolean(true) => FALSE,
        Value::Boolean(false) => TRUE,
        Value::Null => TRUE,
        _ => FALSE,
    }
}

fn eval_minus_expression(right: Value) -> Value {
    match right {
        Value::Integer(value) => Value::Integer(value.wrapping_neg()),
        _ => new_error(format!("unknown operator: -{}", right.type_tag())),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::Str(l), Value::Str(r)) => eval_string_infix(operator, l, r),
        (Value::Boolean(_), Value::Boolean(_)) | (Value::Null, Value::Null)
            if operator == "==" =>
        {
            native_bool(left == right)
        }
        (Value::Boolean(_), Value::Boolean(_)) | (Value::Null, Value::Null)
            if operator == "!=" =>
        {
            native_bool(left != right)
        }
        _ if left.type_tag() != right.type_tag() => new_error(format!(
            "type mismatch: {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
        _ => new_error(format!(
            "unknown operator: {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
    }
}

// Arithmetic wraps on overflow; division truncates toward zero and reports
// a zero divisor as an error value.
fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left.wrapping_add(right)),
        "-" => Value::Integer(left.wrapping_sub(right)),
        "*" => Value::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                new_error("division by zero".to_string())
            } else {
                Value::Integer(left.wrapping_div(right))
            }
        }
        "<" => native_bool(left < right),
        ">" => native_bool(left > right),
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        _ => new_error(format!("unknown operator: INTEGER {} INTEGER", operator)),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    if operator == "+" {
        Value::Str(format!("{}{}", left, right))
    } else {
        new_error(format!("unknown operator: STRING {} STRING", operator))
    }
}

/// Evaluate left to right; the first error becomes the only element.
fn eval_expressions(exprs: &[Expr], env: &Rc<Environment>) -> Vec<Value> {
    let mut results = vec![];

    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.is_error() {
            return vec![value];
        }
        results.push(value);
    }

    results
}

fn apply_function(function: Value, args: Vec<Value>) -> Value {
    match function {
        Value::Function(func) => {
            if args.len() != func.parameters.len() {
                return new_error(format!(
                    "wrong number of arguments. got={}, want={}",
                    args.len(),
                    func.parameters.len()
                ));
            }

            // Arguments live in a fresh frame enclosed by the function's
            // defining environment, not the call site.
            let env = Environment::new_enclosed(Rc::clone(&func.env));
            for (param, arg) in func.parameters.iter().zip(args) {
                env.set(&param.name, arg);
            }

            match eval_block(&func.body, &env) {
                Value::Return(inner) => *inner,
                value => value,
            }
        }
        Value::Builtin(builtin) => (builtin.func)(args),
        other => new_error(format!("not a function: {}", other.type_tag())),
    }
}

fn eval_hash_literal(pairs: &[(Expr, Expr)], env: &Rc<Environment>) -> Value {
    let mut map = HashMap::new();

    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env);
        if key.is_error() {
            return key;
        }

        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => return new_error(format!("unusable as hash key: {}", key.type_tag())),
        };

        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }

        map.insert(hash_key, (key, value));
    }

    Value::Hash(map)
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(elements), Value::Integer(i)) => {
            let i = *i;
            if i < 0 || i >= elements.len() as i64 {
                NULL
            } else {
                elements[i as usize].clone()
            }
        }
        (Value::Hash(pairs), _) => match index.hash_key() {
            Some(key) => pairs
                .get(&key)
                .map(|(_, value)| value.clone())
                .unwrap_or(NULL),
            None => new_error(format!("unusable as hash key: {}", index.type_tag())),
        },
        _ => new_error(format!(
            "index operator not supported: {}",
            left.type_tag()
        )),
    }
}
