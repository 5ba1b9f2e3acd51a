use crate::environment::{Environment, MutableEnvironment};
use crate::error::{RuntimeError, Unwind};
use crate::interpreter::Interpreter;
use crate::stmt::FunctionDeclaration;
use crate::value::callable::Callable;
use crate::value::object::Object;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The runtime representation of a function: either one of the three
/// natives pre-defined in the globals, or a user function built from a
/// declaration statement.
#[derive(Debug, Clone)]
pub enum Function {
    /// Wall-clock seconds since the Unix epoch.
    Clock,
    /// Prompts on stdout, then reads one line from stdin.
    Read,
    /// Converts its argument to a number, or nil when it can't.
    Float,
    UserDefined {
        /// Whether this is a class initializer. We can't just check the
        /// declaration name: a free function may also be called "init".
        is_initializer: bool,

        declaration: Rc<FunctionDeclaration>,

        /// The environment that was active when the function was declared
        /// (its lexical surroundings, not its call site). This is what
        /// makes closures work.
        closure: MutableEnvironment,
    },
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Function::UserDefined { declaration, .. } => {
                write!(f, "<fn {}>", declaration.name.lexeme)
            }
            _ => f.write_str("<native fn>"),
        }
    }
}

impl Function {
    /// Produces a copy of this method whose closure is wrapped in one extra
    /// frame binding `this` to the given instance. The returned function
    /// carries its own little persistent world where `this` means that
    /// object, which is exactly the frame the resolver assumed when it
    /// computed `this` distances.
    pub fn bind(&self, instance: &Object) -> Function {
        match self {
            Function::UserDefined {
                is_initializer,
                declaration,
                closure,
            } => {
                let scope = Environment::enclosed(closure);
                scope.borrow_mut().define("this".to_string(), instance.clone());
                Function::UserDefined {
                    is_initializer: *is_initializer,
                    declaration: Rc::clone(declaration),
                    closure: scope,
                }
            }
            _ => self.clone(),
        }
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        match self {
            Function::Clock => 0,
            Function::Read | Function::Float => 1,
            Function::UserDefined { declaration, .. } => declaration.params.len(),
        }
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, RuntimeError> {
        match self {
            Function::Clock => {
                let seconds = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_secs_f64())
                    .unwrap_or_default();
                Ok(Object::Number(seconds))
            }
            Function::Read => {
                print!("{}", args[0]);
                let _ = io::stdout().flush();
                let mut line = String::new();
                match io::stdin().lock().read_line(&mut line) {
                    // Zero bytes means stdin is closed.
                    Ok(0) | Err(_) => Ok(Object::Nil),
                    Ok(_) => {
                        let line = line.trim_end_matches(['\n', '\r']).to_string();
                        Ok(Object::String(line))
                    }
                }
            }
            Function::Float => Ok(to_number(&args[0])),
            Function::UserDefined {
                is_initializer,
                declaration,
                closure,
            } => {
                // Each call gets a fresh environment chained onto the
                // closure, with the parameters bound to the arguments by
                // position. The body runs in that environment no matter
                // where the call site is.
                let scope = Environment::enclosed(closure);
                for (param, arg) in declaration.params.iter().zip(args) {
                    scope.borrow_mut().define(param.lexeme.clone(), arg);
                }

                let returned = match interpreter.execute_block(&declaration.body, scope) {
                    Ok(()) => Object::Nil,
                    Err(Unwind::Return(value)) => value,
                    Err(Unwind::Error(error)) => return Err(error),
                };

                // An initializer always hands back the instance under
                // construction, even past an early bare `return;`. The
                // resolver has already rejected returning a value here.
                if *is_initializer {
                    return closure.borrow().get_at(0, "this").ok_or_else(|| {
                        RuntimeError::new(
                            declaration.name.clone(),
                            "Undefined variable 'this'.",
                        )
                    });
                }

                Ok(returned)
            }
        }
    }
}

/// The conversion behind the `float` native: numbers pass through, strings
/// parse (surrounding whitespace tolerated), booleans become one and zero,
/// and everything else, or a failed parse, is nil.
fn to_number(value: &Object) -> Object {
    match value {
        Object::Number(n) => Object::Number(*n),
        Object::Boolean(b) => Object::Number(if *b { 1.0 } else { 0.0 }),
        Object::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => Object::Number(n),
            Err(_) => Object::Nil,
        },
        _ => Object::Nil,
    }
}
