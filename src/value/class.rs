use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::value::callable::Callable;
use crate::value::function::Function;
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The runtime representation of a class declaration. Methods are owned by
/// the class but accessed through its instances; instances and subclasses
/// share the class itself by reference.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<Class>>,
        methods: HashMap<String, Function>,
    ) -> Self {
        Self {
            name,
            superclass,
            methods,
        }
    }

    /// Method lookup: the class's own methods shadow inherited ones, and
    /// the search recurses up the superclass chain from there.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }
}

impl Callable for Rc<Class> {
    /// Calling a class constructs an instance, so the class's arity is its
    /// initializer's, or zero when it has none.
    fn arity(&self) -> usize {
        match self.find_method("init") {
            Some(initializer) => initializer.arity(),
            None => 0,
        }
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, RuntimeError> {
        let instance = Object::Instance(Rc::new(RefCell::new(Instance::new(Rc::clone(self)))));

        // If the class chain defines an initializer, run it bound to the
        // fresh instance. Whatever it evaluates to is discarded; the call
        // expression's value is the instance itself.
        if let Some(initializer) = self.find_method("init") {
            initializer.bind(&instance).call(interpreter, args)?;
        }

        Ok(instance)
    }
}
