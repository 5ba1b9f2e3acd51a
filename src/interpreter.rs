use crate::environment::{Environment, MutableEnvironment};
use crate::error;
use crate::error::{RuntimeError, Unwind};
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDeclaration, Stmt};
use crate::token::Token;
use crate::token::TokenType::*;
use crate::value::class::Class;
use crate::value::function::Function;
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::collections::HashMap;
use std::rc::Rc;

/// The interpreter is the last step. It recursively traverses the AST the
/// parser produced, in post-order: each node evaluates its children before
/// doing its own work.
///
/// The two node types are handled by separate methods: statements are
/// executed by `execute` and produce no value; expressions are evaluated by
/// `evaluate` and produce an Object. A statement can stop early, with a
/// `return` unwinding to the enclosing call or with a runtime error, so
/// `execute` answers with an `Unwind` where `evaluate` answers with a
/// `RuntimeError`.
pub struct Interpreter {
    /// A fixed handle on the outermost global environment, where the
    /// natives live and where unresolved names are looked up.
    globals: MutableEnvironment,

    /// The environment changes as execution enters and exits scopes; this
    /// tracks the current one.
    environment: MutableEnvironment,

    /// The resolver's side-table: reference-expression identity to the
    /// number of parent hops to the declaring frame. A reference absent
    /// from the table is a global, looked up by name instead.
    locals: HashMap<ExprId, usize>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        let globals = Environment::global();
        {
            let mut env = globals.borrow_mut();
            env.define("clock".to_string(), Object::Function(Function::Clock));
            env.define("read".to_string(), Object::Function(Function::Read));
            env.define("float".to_string(), Object::Function(Function::Float));
        }
        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
        }
    }

    /// Absorbs a resolver side-table. The REPL resolves each line
    /// separately, so the table grows by extension; ids never collide
    /// because the driver threads the parser's id watermark across lines.
    pub fn resolve(&mut self, locals: HashMap<ExprId, usize>) {
        self.locals.extend(locals);
    }

    /// Takes in a list of statements, in other words a program.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => continue,
                Err(Unwind::Error(error)) => {
                    error::runtime_error(&error);
                    break;
                }
                // The resolver rejects top-level returns, so this unwind
                // can never escape a program that reached evaluation.
                Err(Unwind::Return(_)) => break,
            }
        }
    }

    /// Runs a list of statements with `environment` as the current scope,
    /// restoring the previous scope on every exit path: normal
    /// completion, a propagating return, or a runtime error.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: MutableEnvironment,
    ) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        match stmt {
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
                Ok(())
            }
            Stmt::Print { expression } => {
                let evaluated = self.evaluate(expression)?;
                println!("{evaluated}");
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let mut value = Object::Nil;
                if let Some(expr) = initializer {
                    value = self.evaluate(expr)?;
                }
                self.environment.borrow_mut().define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block { statements } => {
                let block_scope = Environment::enclosed(&self.environment);
                self.execute_block(statements, block_scope)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function { decl } => {
                // A function statement converts the compile-time syntax
                // node into its runtime representation, closing over the
                // environment in force where the declaration appears.
                let function = Function::UserDefined {
                    is_initializer: false,
                    declaration: Rc::clone(decl),
                    closure: Rc::clone(&self.environment),
                };
                self.environment
                    .borrow_mut()
                    .define(decl.name.lexeme.clone(), Object::Function(function));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                // A return can fire deep inside nested statements; the
                // unwind carries the value all the way out to the code
                // that began executing the function body.
                let mut return_value = Object::Nil;
                if let Some(value) = value {
                    return_value = self.evaluate(value)?;
                }
                Err(Unwind::Return(return_value))
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    /// Class declarations run in a fixed sequence: check the superclass,
    /// pre-define the name (so methods can refer to the class itself),
    /// wrap a `super` frame around the methods of a subclass, build the
    /// method table, then assign the finished class over the placeholder.
    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDeclaration>],
    ) -> Result<(), Unwind> {
        let superclass_value = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Object::Class(class) => Some(class),
                _ => {
                    let token = match expr {
                        Expr::Variable { name, .. } => name.clone(),
                        _ => name.clone(),
                    };
                    return Err(RuntimeError::new(token, "Superclass must be a class.").into());
                }
            },
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(name.lexeme.clone(), Object::Nil);

        // Methods of a subclass close over one extra frame holding
        // `super`, mirroring the scope the resolver pushed.
        let previous = Rc::clone(&self.environment);
        if let Some(class) = &superclass_value {
            let super_scope = Environment::enclosed(&self.environment);
            super_scope
                .borrow_mut()
                .define("super".to_string(), Object::Class(Rc::clone(class)));
            self.environment = super_scope;
        }

        let mut method_table = HashMap::new();
        for method in methods {
            let function = Function::UserDefined {
                is_initializer: method.name.lexeme == "init",
                declaration: Rc::clone(method),
                closure: Rc::clone(&self.environment),
            };
            method_table.insert(method.name.lexeme.clone(), function);
        }

        let class = Class::new(name.lexeme.clone(), superclass_value, method_table);

        self.environment = previous;
        self.environment
            .borrow_mut()
            .assign(name, Object::Class(Rc::new(class)))?;
        Ok(())
    }

    /// Evaluates an Expr tree node and produces a value. For each kind of
    /// expression there is a corresponding chunk of code that knows how to
    /// reduce that subtree to an Object.
    pub fn evaluate(&mut self, expression: &Expr) -> Result<Object, RuntimeError> {
        match expression {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Unary { operator, right } => {
                let value = self.evaluate(right)?;
                match (&operator.token_type, value) {
                    (MINUS, Object::Number(n)) => Ok(Object::Number(-n)),
                    (BANG, value) => Ok(Object::Boolean(!value.is_truthy())),
                    _ => Err(RuntimeError::new(
                        operator.clone(),
                        "Operand must be a number.",
                    )),
                }
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary(operator, left, right)
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                // Look at the left value to see if the answer is already
                // decided; only then does the right operand run. The
                // result keeps its original type; a logic operator
                // returns a value with the appropriate truthiness, not a
                // boolean: `nil or "yes"` is "yes".
                if operator.token_type == OR {
                    if left.is_truthy() {
                        return Ok(left);
                    }
                } else if !left.is_truthy() {
                    return Ok(left);
                }

                self.evaluate(right)
            }
            Expr::Variable { id, name } => self.look_up_variable(name, *id),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&distance) => {
                        self.environment
                            .borrow_mut()
                            .assign_at(distance, &name.lexeme, value.clone());
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }
                // Assignment is an expression and can nest inside others,
                // so it produces the assigned value.
                Ok(value)
            }
            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.evaluate(argument)?);
                }

                callee.call(self, args, paren)
            }
            Expr::Get { object, name } => match self.evaluate(object)? {
                Object::Instance(instance) => Instance::get(&instance, name),
                _ => Err(RuntimeError::new(
                    name.clone(),
                    "Only instances have properties.",
                )),
            },
            Expr::Set {
                object,
                name,
                value,
            } => match self.evaluate(object)? {
                Object::Instance(instance) => {
                    let value = self.evaluate(value)?;
                    instance.borrow_mut().set(name, value.clone());
                    Ok(value)
                }
                _ => Err(RuntimeError::new(
                    name.clone(),
                    "Only instances have fields.",
                )),
            },
            Expr::This { id, keyword } => self.look_up_variable(keyword, *id),
            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn binary(
        &mut self,
        operator: &Token,
        left: Object,
        right: Object,
    ) -> Result<Object, RuntimeError> {
        use Object::{Boolean, Number, String};

        match (&operator.token_type, left, right) {
            (STAR, Number(left), Number(right)) => Ok(Number(left * right)),
            (SLASH, Number(left), Number(right)) => Ok(Number(left / right)),
            (MODULO, Number(left), Number(right)) => Ok(Number(left % right)),
            (MINUS, Number(left), Number(right)) => Ok(Number(left - right)),

            (PLUS, Number(left), Number(right)) => Ok(Number(left + right)),
            (PLUS, String(left), String(right)) => Ok(String(left + &right)),
            // A string on either side concatenates with a number on the
            // other, using the number's printed form.
            (PLUS, String(left), Number(right)) => Ok(String(format!("{left}{right}"))),
            (PLUS, Number(left), String(right)) => Ok(String(format!("{left}{right}"))),
            (PLUS, _, _) => Err(RuntimeError::new(
                operator.clone(),
                "Operators must be two numbers or strings.",
            )),

            (GREATER, Number(left), Number(right)) => Ok(Boolean(left > right)),
            (GREATER_EQUAL, Number(left), Number(right)) => Ok(Boolean(left >= right)),
            (LESS, Number(left), Number(right)) => Ok(Boolean(left < right)),
            (LESS_EQUAL, Number(left), Number(right)) => Ok(Boolean(left <= right)),

            (BANG_EQUAL, left, right) => Ok(Boolean(!left.is_equal(&right))),
            (EQUAL_EQUAL, left, right) => Ok(Boolean(left.is_equal(&right))),

            _ => Err(RuntimeError::new(
                operator.clone(),
                "Operands must be a number.",
            )),
        }
    }

    /// `super` lives in the frame the class statement wrapped around its
    /// methods, and `this` one frame nearer, in the bind frame; hence
    /// distance and distance minus one.
    fn evaluate_super(
        &mut self,
        id: ExprId,
        keyword: &Token,
        method: &Token,
    ) -> Result<Object, RuntimeError> {
        let undefined =
            |name: &str| RuntimeError::new(keyword.clone(), format!("Undefined variable '{name}'."));

        let distance = *self.locals.get(&id).ok_or_else(|| undefined("super"))?;

        let superclass = match self.environment.borrow().get_at(distance, "super") {
            Some(Object::Class(class)) => class,
            _ => return Err(undefined("super")),
        };
        let object = self
            .environment
            .borrow()
            .get_at(distance - 1, "this")
            .ok_or_else(|| undefined("this"))?;

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Object::Function(found.bind(&object))),
            None => Err(RuntimeError::new(
                method.clone(),
                format!("Undefined property {}.", method.lexeme),
            )),
        }
    }

    /// Resolved references read the frame at their recorded distance;
    /// everything else falls back to the globals by name. The fallback is
    /// what allows a function body to mention a global defined after the
    /// function was declared.
    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => self
                .environment
                .borrow()
                .get_at(distance, &name.lexeme)
                .ok_or_else(|| {
                    RuntimeError::new(
                        name.clone(),
                        format!("Undefined variable '{}'.", name.lexeme),
                    )
                }),
            None => self.globals.borrow().get(name),
        }
    }
}
