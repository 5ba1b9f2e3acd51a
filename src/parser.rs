use crate::error;
use crate::error::ParseError;
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDeclaration, Stmt};
use crate::token::TokenType::*;
use crate::token::{Literal, Token, TokenType};
use crate::value::object::Object;
use std::rc::Rc;

/// The parser is the second step. It consumes the flat token sequence with
/// a single token of lookahead and produces the syntax tree, one grammar
/// rule per method, precedence encoded in which rule calls which.
///
/// On a syntax error it reports a diagnostic, unwinds to the nearest
/// statement boundary via `ParseError`, and synchronizes so one mistake
/// doesn't drown the user in cascaded errors.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,

    /// Next identity to hand to a variable-reference expression. Seeded by
    /// the driver so ids stay unique across REPL lines, where closures keep
    /// earlier trees alive.
    next_id: ExprId,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, first_id: ExprId) -> Self {
        Self {
            tokens,
            current: 0,
            next_id: first_id,
        }
    }

    /// The id watermark after parsing; the driver feeds it to the next
    /// parser it creates.
    pub fn next_expr_id(&self) -> ExprId {
        self.next_id
    }

    /// Parses a program: a list of declarations up to EOF. Statements that
    /// fail to parse are dropped; the error flag is already set by then, so
    /// the program will not be executed. An empty program is a valid no-op.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        statements
    }

    /// One declaration, with panic-mode recovery: a syntax error anywhere
    /// inside it reports a diagnostic, skips to the next statement
    /// boundary, and yields nothing, so the parser keeps collecting
    /// further errors instead of giving up.
    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_types(&[CLASS]) {
            self.class_declaration()
        } else if self.match_types(&[FUN]) {
            self.function("function").map(|decl| Stmt::Function { decl })
        } else if self.match_types(&[VAR]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume(IDENTIFIER, "Expect class name.")?;

        // The superclass clause parses into an ordinary variable reference
        // so the resolver and evaluator can treat it like any other.
        let mut superclass = None;
        if self.match_types(&[LESS]) {
            self.consume(IDENTIFIER, "Expect superclass name.")?;
            superclass = Some(Expr::Variable {
                id: self.new_id(),
                name: self.previous(),
            });
        }

        self.consume(LEFT_BRACE, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(RIGHT_BRACE) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(RIGHT_BRACE, "Expect '}' after class body.")?;
        Ok(Stmt::Class {
            name,
            superclass,
            methods,
        })
    }

    /// Parses a named function. `kind` is "function" or "method" and only
    /// changes the wording of diagnostics.
    fn function(&mut self, kind: &str) -> Result<Rc<FunctionDeclaration>, ParseError> {
        let name = self.consume(IDENTIFIER, &format!("Expect {kind} name."))?;
        self.consume(LEFT_PAREN, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.check(RIGHT_PAREN) {
            loop {
                if params.len() >= 255 {
                    // Report without unwinding; the parser is still in a
                    // perfectly good state to keep going.
                    error::error_token(&self.peek(), "Cannot have more than 255 parameters.");
                }
                params.push(self.consume(IDENTIFIER, "Expect parameter name.")?);
                if !self.match_types(&[COMMA]) {
                    break;
                }
            }
        }
        self.consume(RIGHT_PAREN, "Expect ')' after parameters.")?;

        self.consume(LEFT_BRACE, &format!("Expect '{{' before {kind} body."))?;
        let body = self.block()?;

        Ok(Rc::new(FunctionDeclaration { name, params, body }))
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume(IDENTIFIER, "Expect variable name.")?;

        let mut initializer = None;
        if self.match_types(&[EQUAL]) {
            initializer = Some(self.expression()?);
        }

        self.consume(SEMICOLON, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.match_types(&[FOR]) {
            return self.for_statement();
        }
        if self.match_types(&[IF]) {
            return self.if_statement();
        }
        if self.match_types(&[PRINT]) {
            return self.print_statement();
        }
        if self.match_types(&[RETURN]) {
            return self.return_statement();
        }
        if self.match_types(&[WHILE]) {
            return self.while_statement();
        }
        if self.match_types(&[LEFT_BRACE]) {
            return Ok(Stmt::Block {
                statements: self.block()?,
            });
        }
        self.expression_statement()
    }

    /// `for` is pure syntactic sugar: it desugars right here into the
    /// block/while shape, so the rest of the pipeline never sees a for
    /// loop. The body and increment share the scope introduced for the
    /// initializer.
    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(LEFT_PAREN, "Expect '(' after 'for'.")?;

        let initializer = if self.match_types(&[SEMICOLON]) {
            None
        } else if self.match_types(&[VAR]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let mut condition = None;
        if !self.check(SEMICOLON) {
            condition = Some(self.expression()?);
        }
        self.consume(SEMICOLON, "Expect ';' after loop condition.")?;

        let mut increment = None;
        if !self.check(RIGHT_PAREN) {
            increment = Some(self.expression()?);
        }
        self.consume(RIGHT_PAREN, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block {
                statements: vec![
                    body,
                    Stmt::Expression {
                        expression: increment,
                    },
                ],
            };
        }

        // An omitted condition means loop forever.
        let condition = condition.unwrap_or(Expr::Literal {
            value: Object::Boolean(true),
        });
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block {
                statements: vec![initializer, body],
            };
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(LEFT_PAREN, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(RIGHT_PAREN, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let mut else_branch = None;
        if self.match_types(&[ELSE]) {
            else_branch = Some(Box::new(self.statement()?));
        }

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseError> {
        let expression = self.expression()?;
        self.consume(SEMICOLON, "Expect ';' after value.")?;
        Ok(Stmt::Print { expression })
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.previous();

        let mut value = None;
        if !self.check(SEMICOLON) {
            value = Some(self.expression()?);
        }

        self.consume(SEMICOLON, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(LEFT_PAREN, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(RIGHT_PAREN, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(RIGHT_BRACE, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expression = self.expression()?;
        self.consume(SEMICOLON, "Expect ';' after expression.")?;
        Ok(Stmt::Expression { expression })
    }

    pub fn expression(&mut self) -> Result<Expr, ParseError> {
        self.assignment()
    }

    /// Assignment is right-associative and the target is validated after
    /// the fact: the left side parses as an ordinary expression, and only
    /// a plain variable or a property access may appear before `=`.
    fn assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.or()?;

        if self.match_types(&[EQUAL]) {
            let equals = self.previous();
            let value = Box::new(self.assignment()?);

            return match expr {
                Expr::Variable { name, .. } => Ok(Expr::Assign {
                    id: self.new_id(),
                    name,
                    value,
                }),
                Expr::Get { object, name } => Ok(Expr::Set {
                    object,
                    name,
                    value,
                }),
                _ => Err(self.error(&equals, "Invalid assignment target.")),
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.and()?;

        while self.match_types(&[OR]) {
            let operator = self.previous();
            let right = self.and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;

        while self.match_types(&[AND]) {
            let operator = self.previous();
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison()?;

        while self.match_types(&[BANG_EQUAL, EQUAL_EQUAL]) {
            let operator = self.previous();
            let right = self.comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term()?;

        while self.match_types(&[GREATER, GREATER_EQUAL, LESS, LESS_EQUAL]) {
            let operator = self.previous();
            let right = self.term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor()?;

        while self.match_types(&[MINUS, PLUS]) {
            let operator = self.previous();
            let right = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.modulo()?;

        while self.match_types(&[SLASH, STAR]) {
            let operator = self.previous();
            let right = self.modulo()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `%` binds tighter than `*` and `/`.
    fn modulo(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;

        while self.match_types(&[MODULO]) {
            let operator = self.previous();
            let right = self.unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.match_types(&[BANG, MINUS]) {
            let operator = self.previous();
            let right = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;

        loop {
            if self.match_types(&[LEFT_PAREN]) {
                expr = self.finish_call(expr)?;
            } else if self.match_types(&[DOT]) {
                let name = self.consume(IDENTIFIER, "Expect property name after '.'.")?;
                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut arguments = Vec::new();

        if !self.check(RIGHT_PAREN) {
            loop {
                if arguments.len() >= 255 {
                    error::error_token(&self.peek(), "Cannot have more than 255 arguments.");
                }
                arguments.push(self.expression()?);
                if !self.match_types(&[COMMA]) {
                    break;
                }
            }
        }

        let paren = self.consume(RIGHT_PAREN, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        if self.match_types(&[FALSE]) {
            return Ok(Expr::Literal {
                value: Object::Boolean(false),
            });
        }
        if self.match_types(&[TRUE]) {
            return Ok(Expr::Literal {
                value: Object::Boolean(true),
            });
        }
        if self.match_types(&[NIL]) {
            return Ok(Expr::Literal { value: Object::Nil });
        }

        if self.match_types(&[NUMBER, STRING]) {
            // The scanner always attaches a literal to these token types.
            let value = match self.previous().literal {
                Some(Literal::Number(n)) => Object::Number(n),
                Some(Literal::String(s)) => Object::String(s),
                None => Object::Nil,
            };
            return Ok(Expr::Literal { value });
        }

        if self.match_types(&[SUPER]) {
            let keyword = self.previous();
            self.consume(DOT, "Expect '.' after 'super'.")?;
            let method = self.consume(IDENTIFIER, "Expect superclass method name.")?;
            return Ok(Expr::Super {
                id: self.new_id(),
                keyword,
                method,
            });
        }

        if self.match_types(&[THIS]) {
            return Ok(Expr::This {
                id: self.new_id(),
                keyword: self.previous(),
            });
        }

        if self.match_types(&[IDENTIFIER]) {
            return Ok(Expr::Variable {
                id: self.new_id(),
                name: self.previous(),
            });
        }

        if self.match_types(&[LEFT_PAREN]) {
            let expr = self.expression()?;
            self.consume(RIGHT_PAREN, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping {
                expression: Box::new(expr),
            });
        }

        Err(self.error(&self.peek(), "Expect expression."))
    }

    fn new_id(&mut self) -> ExprId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<Token, ParseError> {
        if self.check(token_type) {
            return Ok(self.advance());
        }

        Err(self.error(&self.peek(), message))
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for &token_type in types {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek().token_type == token_type
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::EOF
    }

    fn peek(&self) -> Token {
        self.tokens[self.current].clone()
    }

    fn previous(&self) -> Token {
        self.tokens[self.current - 1].clone()
    }

    fn error(&self, token: &Token, message: &str) -> ParseError {
        error::error_token(token, message);
        ParseError
    }

    /// Panic-mode recovery: discard tokens until we are at something that
    /// looks like a statement boundary: just past a semicolon, or about
    /// to begin a fresh declaration or statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type == SEMICOLON {
                return;
            }

            match self.peek().token_type {
                CLASS | FUN | VAR | FOR | IF | WHILE | PRINT | RETURN => return,
                _ => {}
            }

            self.advance();
        }
    }
}
