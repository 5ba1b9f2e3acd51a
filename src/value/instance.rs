use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::class::Class;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

/// The runtime representation of an instance: a bag of mutable fields plus
/// the class that supplies its behavior.
#[derive(Debug)]
pub struct Instance {
    klass: Rc<Class>,
    fields: HashMap<String, Object>,
}

impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <instance>", self.klass.name)
    }
}

impl Instance {
    pub fn new(klass: Rc<Class>) -> Self {
        Self {
            klass,
            fields: HashMap::new(),
        }
    }

    /// Property lookup: fields shadow methods, and a method is handed out
    /// bound to this instance so `this` works inside it. An unknown name
    /// is a runtime error rather than a silent nil; that would mask bugs
    /// more often than it helped.
    pub fn get(instance: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = instance.borrow().klass.find_method(&name.lexeme) {
            return Ok(Object::Function(
                method.bind(&Object::Instance(Rc::clone(instance))),
            ));
        }

        Err(RuntimeError::new(
            name.clone(),
            format!("Undefined property {}.", name.lexeme),
        ))
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}
