use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Environments are shared: the active execution chain and any number of
/// closures may hold the same frame at once, and a frame can outlive the
/// lexical scope that created it. The whole object graph is kept for the
/// life of the process, so the cycles closures and classes form through
/// their environments are harmless.
pub type MutableEnvironment = Rc<RefCell<Environment>>;

/// A single scope frame: a map of names to values plus a link to the
/// enclosing frame. The root frame, the globals, has no enclosing link.
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Object>,
    enclosing: Option<MutableEnvironment>,
}

impl Environment {
    pub fn global() -> MutableEnvironment {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    /// A new local scope nested inside the given outer one.
    pub fn enclosed(enclosing: &MutableEnvironment) -> MutableEnvironment {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: Some(Rc::clone(enclosing)),
        }))
    }

    /// A new variable always goes into the current innermost scope, and
    /// re-declaring a name simply shadows the old binding.
    pub fn define(&mut self, name: String, value: Object) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        // Walk the chain outward.
        match &self.enclosing {
            Some(outer) => outer.borrow().get(name),
            None => Err(RuntimeError::new(
                name.clone(),
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    /// The key difference from define is that assign is not allowed to
    /// create a new variable: the name must already exist somewhere on the
    /// chain, and the write lands in the first frame that has it.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        match &self.enclosing {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => Err(RuntimeError::new(
                name.clone(),
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    /// Reads a name from the frame exactly `distance` parents up. The
    /// resolver guarantees the frame and the binding exist; `None` can only
    /// mean that guarantee was broken, and callers surface it as an
    /// undefined-variable error rather than panicking.
    pub fn get_at(&self, distance: usize, name: &str) -> Option<Object> {
        if distance == 0 {
            return self.values.get(name).cloned();
        }
        self.enclosing
            .as_ref()
            .and_then(|outer| outer.borrow().get_at(distance - 1, name))
    }

    /// Writes a name into the frame exactly `distance` parents up,
    /// unconditionally. Same resolver-established invariant as `get_at`.
    pub fn assign_at(&mut self, distance: usize, name: &str, value: Object) {
        if distance == 0 {
            self.values.insert(name.to_string(), value);
            return;
        }
        if let Some(outer) = &self.enclosing {
            outer.borrow_mut().assign_at(distance - 1, name, value);
        }
    }
}
