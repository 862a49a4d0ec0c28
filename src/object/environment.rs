use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::object::Object;

/// Name-to-value scope with an optional parent. Lookup walks toward the
/// root; definition always writes the innermost scope. Environments are
/// shared by reference, so a closure keeps its captured scope alive.
#[derive(Clone, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(outer: Rc<RefCell<Self>>) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => None,
            },
        }
    }

    /// Binds `name` in this scope, returning the binding it replaced here
    /// (shadowed outer bindings are left untouched).
    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Option<Object> {
        self.store.insert(name.into(), value)
    }
}

// The parent link is compared by identity: two scopes are interchangeable
// only when their bindings match and they hang off the very same outer
// allocation. Self-bound functions in the store make a structural walk
// through the parent chain non-terminating.
impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        let same_outer = match (&self.outer, &other.outer) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_outer && self.store == other.store
    }
}

impl Eq for Environment {}

// Bound values can point back at this environment, so only the names are
// shown.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.store.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}
