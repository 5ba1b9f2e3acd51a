use crate::error;
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDeclaration, Stmt};
use crate::token::Token;
use std::collections::HashMap;
use std::rc::Rc;

/// What kind of function body we are currently inside, so `return` can be
/// rejected at top level and value-returning `return` inside an
/// initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Initializer,
    Method,
}

/// Likewise for classes, so `this` and `super` can be rejected where they
/// have nothing to refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Step 2.5: after the parser produces the syntax tree but before the
/// interpreter executes it, a single walk over the tree "resolves" every
/// variable reference to the scope that declared it. It works like a
/// mini-interpreter with no control flow (both branches of an `if` get
/// resolved, a loop body exactly once) and it is where the static
/// semantic errors are reported.
pub struct Resolver {
    /// The stack of scopes currently, well, in scope. Each element is a
    /// map for a single block scope; keys are variable names and the
    /// boolean records whether the name's initializer has finished
    /// resolving. Only local scopes are tracked: globals are dynamic, so
    /// a name found in no scope here is assumed global.
    scopes: Vec<HashMap<String, bool>>,

    /// The side-table under construction: reference-expression identity to
    /// the number of environment hops between the use and the declaration.
    resolved: HashMap<ExprId, usize>,

    current_function: FunctionKind,
    current_class: ClassKind,
}

impl Resolver {
    pub fn new() -> Resolver {
        Self {
            scopes: Vec::new(),
            resolved: HashMap::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<ExprId, usize> {
        self.resolve_block(statements);
        self.resolved
    }

    fn resolve_block(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block { statements } => {
                // A block introduces a new scope for the statements it
                // contains.
                self.begin_scope();
                self.resolve_block(statements);
                self.end_scope();
            }
            Stmt::Var { name, initializer } => {
                // Binding is split into declaring and defining so that an
                // initializer mentioning the variable's own name can be
                // caught while it resolves.
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expression(expr);
                }
                self.define(name);
            }
            Stmt::Function { decl } => {
                // Declared and defined eagerly, before the body is
                // visited, so a function may recursively refer to itself.
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),
            Stmt::Expression { expression } => {
                self.resolve_expression(expression);
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                // Resolution is conservative where execution is dynamic:
                // either branch could run, so both are resolved.
                self.resolve_expression(condition);
                self.resolve_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Stmt::Print { expression } => {
                self.resolve_expression(expression);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    error::error_token(keyword, "Cannot return from top-level code.");
                }
                if let Some(expr) = value {
                    if self.current_function == FunctionKind::Initializer {
                        error::error_token(keyword, "Cannot return a value from an initializer.");
                    }
                    self.resolve_expression(expr);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expression(condition);
                self.resolve_statement(body);
            }
        }
    }

    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDeclaration>],
    ) {
        let enclosing_class = self.current_class;
        self.current_class = ClassKind::Class;

        self.declare(name);
        self.define(name);

        let mut has_superclass_scope = false;
        if let Some(superclass) = superclass {
            if let Expr::Variable {
                name: superclass_name,
                ..
            } = superclass
            {
                if superclass_name.lexeme == name.lexeme {
                    error::error_token(superclass_name, "A class cannot inherit from itself.");
                } else {
                    self.current_class = ClassKind::Subclass;
                    self.resolve_expression(superclass);

                    // Subclass methods get a scope holding `super`,
                    // surrounding the method scope that holds `this`,
                    // the same nesting the interpreter builds at runtime.
                    self.begin_scope();
                    self.scope_insert("super");
                    has_superclass_scope = true;
                }
            }
        }

        self.begin_scope();
        self.scope_insert("this");

        for method in methods {
            let kind = if method.name.lexeme == "init" {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if has_superclass_scope {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_expression(&mut self, expression: &Expr) {
        match expression {
            Expr::Variable { id, name } => {
                // It's a static error if an initializer mentions the
                // variable being initialized, e.g. var a = a;
                if self.scopes.last().and_then(|scope| scope.get(&name.lexeme)) == Some(&false) {
                    error::error_token(
                        name,
                        "Cannot read local variable in its own initializer.",
                    );
                }
                self.resolve_local(*id, name);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expression(value);
                self.resolve_local(*id, name);
            }
            Expr::Binary { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expression(callee);
                for argument in arguments {
                    self.resolve_expression(argument);
                }
            }
            Expr::Get { object, .. } => {
                // Property names are looked up dynamically on the object;
                // only the object expression resolves statically.
                self.resolve_expression(object);
            }
            Expr::Set { object, value, .. } => {
                self.resolve_expression(value);
                self.resolve_expression(object);
            }
            Expr::Grouping { expression } => {
                self.resolve_expression(expression);
            }
            Expr::Literal { .. } => {
                // No variables, no subexpressions, no work.
            }
            Expr::Logical { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }
            Expr::Unary { right, .. } => {
                self.resolve_expression(right);
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassKind::None {
                    error::error_token(keyword, "Cannot use 'this' outside of a class.");
                    return;
                }
                self.resolve_local(*id, keyword);
            }
            Expr::Super { id, keyword, .. } => {
                if self.current_class == ClassKind::None {
                    error::error_token(keyword, "Cannot use 'super' outside of a class.");
                } else if self.current_class != ClassKind::Subclass {
                    error::error_token(
                        keyword,
                        "Cannot use 'super' in a class with no superclass.",
                    );
                }
                self.resolve_local(*id, keyword);
            }
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Declaration adds the variable to the innermost scope so it shadows
    /// any outer one, marked "not ready yet" by binding the name to false.
    /// Re-declaring a name in the same local scope is an error; the global
    /// scope is exempt (and not tracked here at all).
    fn declare(&mut self, name: &Token) {
        if let Some(innermost_scope) = self.scopes.last_mut() {
            if innermost_scope.contains_key(&name.lexeme) {
                error::error_token(
                    name,
                    "Variable with this name already declared in this scope.",
                );
            }
            innermost_scope.insert(name.lexeme.clone(), false);
        }
    }

    /// Marks the variable fully initialized and available for use.
    fn define(&mut self, name: &Token) {
        if let Some(innermost_scope) = self.scopes.last_mut() {
            innermost_scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Directly seeds a ready binding (`this`/`super`) into the top scope.
    fn scope_insert(&mut self, name: &str) {
        if let Some(innermost_scope) = self.scopes.last_mut() {
            innermost_scope.insert(name.to_string(), true);
        }
    }

    /// Starts at the innermost scope and works outward looking for the
    /// name. On the first hit, the number of scopes between the use and
    /// the declaration goes into the side-table. No hit means the name is
    /// (hopefully) global, and nothing is recorded.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.resolved.insert(id, distance);
                return;
            }
        }
    }

    /// Resolving a function body happens right here at its declaration,
    /// unlike execution, which waits for a call: a new scope for the
    /// parameters, then the body inside it.
    fn resolve_function(&mut self, function: &FunctionDeclaration, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_block(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }
}
