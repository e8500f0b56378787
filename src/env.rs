//! Lexically scoped name bindings.
//!
//! An environment is one scope frame chained to its enclosing frame. Lookup
//! walks outward; binding always writes the innermost frame, so a repeated
//! `let` shadows rather than mutates. Closures hold an `Rc` to their
//! defining frame, which keeps it alive for as long as the closure exists.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Value;

#[derive(Debug)]
pub struct Environment {
    store: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// A fresh innermost frame enclosed by `outer`; used for every function
    /// application.
    pub fn new_enclosed(outer: Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Look `name` up in this frame, then outward until the root.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.borrow().get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Bind `name` in this frame only.
    pub fn set(&self, name: &str, value: Value) {
        self.store.borrow_mut().insert(name.to_string(), value);
    }
}
