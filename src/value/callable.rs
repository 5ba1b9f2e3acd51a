use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::value::object::Object;

/// The uniform protocol every callable value (native function, user
/// function, bound method, class) answers to. Arity is checked at the
/// call site before `call` runs, so implementations may index arguments
/// by position.
pub trait Callable {
    fn arity(&self) -> usize;
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, RuntimeError>;
}
