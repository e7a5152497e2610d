use super::{Chunk, Interner, Opcode, Value};
use crate::lang::{Error, Scanner, Token, TokenType};

/// Locals live in fixed stack slots named by a one-byte operand.
pub const MAX_LOCALS: usize = 256;

/// Compiles one source buffer into `chunk` in a single pass.
///
/// The parser pulls tokens on demand and emits bytecode the moment each
/// form is recognized; there is no syntax tree. Diagnostics are collected
/// rather than aborting so one bad statement does not hide errors in the
/// statements after it.
pub fn compile(source: &str, chunk: &mut Chunk, strings: &mut Interner) -> Result<(), Vec<Error>> {
    let mut parser = Parser::new(source, chunk, strings);
    parser.advance();
    while !parser.matches(TokenType::Eof) {
        parser.declaration();
    }
    parser.end();
    if parser.errors.is_empty() {
        Ok(())
    } else {
        Err(parser.errors)
    }
}

/// Expression precedence, weakest first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    /// The next-tighter level; parsing the right operand one level up is
    /// what makes binary operators left-associative.
    fn stronger(self) -> Precedence {
        use Precedence::*;
        match self {
            None => Assignment,
            Assignment => Or,
            Or => And,
            And => Equality,
            Equality => Comparison,
            Comparison => Term,
            Term => Factor,
            Factor => Unary,
            Unary => Call,
            Call | Primary => Primary,
        }
    }
}

type ParseFn<'a, 'c> = fn(&mut Parser<'a, 'c>, bool);

struct ParseRule<'a, 'c> {
    prefix: Option<ParseFn<'a, 'c>>,
    infix: Option<ParseFn<'a, 'c>>,
    precedence: Precedence,
}

/// A declared local. `depth` stays `None` from declaration until the
/// initializer finishes, which is how `var x = x;` gets rejected.
struct Local<'a> {
    name: Token<'a>,
    depth: Option<usize>,
}

struct Parser<'a, 'c> {
    scanner: Scanner<'a>,
    current: Token<'a>,
    previous: Token<'a>,
    panic_mode: bool,
    errors: Vec<Error>,
    locals: Vec<Local<'a>>,
    scope_depth: usize,
    chunk: &'c mut Chunk,
    strings: &'c mut Interner,
}

impl<'a, 'c> Parser<'a, 'c> {
    fn new(source: &'a str, chunk: &'c mut Chunk, strings: &'c mut Interner) -> Parser<'a, 'c> {
        let before_start = Token {
            kind: TokenType::Eof,
            lexeme: "",
            line: 0,
        };
        Parser {
            scanner: Scanner::new(source),
            current: before_start,
            previous: before_start,
            panic_mode: false,
            errors: vec![],
            locals: vec![],
            scope_depth: 0,
            chunk,
            strings,
        }
    }

    /// The Pratt dispatch table. Tokens not listed can start nothing and
    /// join nothing.
    fn rule(kind: TokenType) -> ParseRule<'a, 'c> {
        use TokenType::*;
        let (prefix, infix, precedence): (
            Option<ParseFn<'a, 'c>>,
            Option<ParseFn<'a, 'c>>,
            Precedence,
        ) = match kind {
            LeftParen => (Some(Parser::grouping), None, Precedence::None),
            Minus => (Some(Parser::unary), Some(Parser::binary), Precedence::Term),
            Plus => (None, Some(Parser::binary), Precedence::Term),
            Slash | Star => (None, Some(Parser::binary), Precedence::Factor),
            Bang => (Some(Parser::unary), None, Precedence::None),
            BangEqual | EqualEqual => (None, Some(Parser::binary), Precedence::Equality),
            Greater | GreaterEqual | Less | LessEqual => {
                (None, Some(Parser::binary), Precedence::Comparison)
            }
            Identifier => (Some(Parser::variable), None, Precedence::None),
            String => (Some(Parser::string), None, Precedence::None),
            Number => (Some(Parser::number), None, Precedence::None),
            False | Nil | True => (Some(Parser::literal), None, Precedence::None),
            _ => (None, None, Precedence::None),
        };
        ParseRule {
            prefix,
            infix,
            precedence,
        }
    }

    // *** Token stream

    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenType::Error {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    fn consume(&mut self, kind: TokenType, message: &str) {
        if self.current.kind == kind {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    fn check(&self, kind: TokenType) -> bool {
        self.current.kind == kind
    }

    fn matches(&mut self, kind: TokenType) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    // *** Diagnostics

    fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(&token, message);
    }

    fn error(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(&token, message);
    }

    fn error_at(&mut self, token: &Token, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.errors.push(Error::compile(token, message));
    }

    /// Skips ahead to a statement boundary so parsing can continue after
    /// a bad statement.
    fn synchronize(&mut self) {
        self.panic_mode = false;
        while self.current.kind != TokenType::Eof {
            if self.previous.kind == TokenType::Semicolon {
                return;
            }
            match self.current.kind {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {}
            }
            self.advance();
        }
    }

    // *** Emission

    fn emit(&mut self, opcode: Opcode) {
        self.chunk.write_opcode(opcode, self.previous.line);
    }

    fn emit_with_operand(&mut self, opcode: Opcode, operand: u8) {
        self.emit(opcode);
        self.chunk.write(operand, self.previous.line);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_with_operand(Opcode::Constant, index);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.chunk.add_constant(value);
        if index > u8::MAX as usize {
            self.error("Too many constants in one chunk.");
            return 0;
        }
        index as u8
    }

    fn end(&mut self) {
        self.emit(Opcode::Return);
    }

    // *** Declarations and statements

    fn declaration(&mut self) {
        if self.matches(TokenType::Var) {
            self.var_declaration();
        } else {
            self.statement();
        }
        if self.panic_mode {
            self.synchronize();
        }
    }

    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name.");
        if self.matches(TokenType::Equal) {
            self.expression();
        } else {
            self.emit(Opcode::Nil);
        }
        self.consume(
            TokenType::Semicolon,
            "Expect ';' after variable declaration.",
        );
        self.define_variable(global);
    }

    fn statement(&mut self) {
        if self.matches(TokenType::Print) {
            self.print_statement();
        } else if self.matches(TokenType::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenType::Semicolon, "Expect ';' after value.");
        self.emit(Opcode::Print);
    }

    fn block(&mut self) {
        while !self.check(TokenType::RightBrace) && !self.check(TokenType::Eof) {
            self.declaration();
        }
        self.consume(TokenType::RightBrace, "Expect '}' after block.");
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenType::Semicolon, "Expect ';' after expression.");
        self.emit(Opcode::Pop);
    }

    // *** Expressions

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();
        let prefix = match Parser::rule(self.previous.kind).prefix {
            Some(prefix) => prefix,
            None => {
                self.error("Expect expression.");
                return;
            }
        };
        // Only a whole expression at assignment level may be a target;
        // passing the flag down keeps `a * b = c` from parsing.
        let can_assign = precedence <= Precedence::Assignment;
        prefix(self, can_assign);
        while precedence <= Parser::rule(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = Parser::rule(self.previous.kind).infix {
                infix(self, can_assign);
            }
        }
        if can_assign && self.matches(TokenType::Equal) {
            self.error("Invalid assignment target.");
        }
    }

    fn grouping(&mut self, _can_assign: bool) {
        self.expression();
        self.consume(TokenType::RightParen, "Expect ')' after expression.");
    }

    fn number(&mut self, _can_assign: bool) {
        if let Ok(value) = self.previous.lexeme.parse::<f64>() {
            self.emit_constant(Value::Number(value));
        }
    }

    fn string(&mut self, _can_assign: bool) {
        let lexeme = self.previous.lexeme;
        let handle = self.strings.intern(&lexeme[1..lexeme.len() - 1]);
        self.emit_constant(Value::Str(handle));
    }

    fn literal(&mut self, _can_assign: bool) {
        match self.previous.kind {
            TokenType::False => self.emit(Opcode::False),
            TokenType::Nil => self.emit(Opcode::Nil),
            TokenType::True => self.emit(Opcode::True),
            _ => {}
        }
    }

    fn unary(&mut self, _can_assign: bool) {
        let operator = self.previous.kind;
        self.parse_precedence(Precedence::Unary);
        match operator {
            TokenType::Bang => self.emit(Opcode::Not),
            TokenType::Minus => self.emit(Opcode::Negate),
            _ => {}
        }
    }

    fn binary(&mut self, _can_assign: bool) {
        let operator = self.previous.kind;
        self.parse_precedence(Parser::rule(operator).precedence.stronger());
        match operator {
            TokenType::BangEqual => {
                self.emit(Opcode::Equal);
                self.emit(Opcode::Not);
            }
            TokenType::EqualEqual => self.emit(Opcode::Equal),
            TokenType::Greater => self.emit(Opcode::Greater),
            TokenType::GreaterEqual => {
                self.emit(Opcode::Less);
                self.emit(Opcode::Not);
            }
            TokenType::Less => self.emit(Opcode::Less),
            TokenType::LessEqual => {
                self.emit(Opcode::Greater);
                self.emit(Opcode::Not);
            }
            TokenType::Plus => self.emit(Opcode::Add),
            TokenType::Minus => self.emit(Opcode::Subtract),
            TokenType::Star => self.emit(Opcode::Multiply),
            TokenType::Slash => self.emit(Opcode::Divide),
            _ => {}
        }
    }

    fn variable(&mut self, can_assign: bool) {
        let name = self.previous;
        self.named_variable(name, can_assign);
    }

    fn named_variable(&mut self, name: Token<'a>, can_assign: bool) {
        let (get, set, operand) = match self.resolve_local(&name) {
            Some(slot) => (Opcode::GetLocal, Opcode::SetLocal, slot),
            None => {
                let index = self.identifier_constant(&name);
                (Opcode::GetGlobal, Opcode::SetGlobal, index)
            }
        };
        if can_assign && self.matches(TokenType::Equal) {
            self.expression();
            self.emit_with_operand(set, operand);
        } else {
            self.emit_with_operand(get, operand);
        }
    }

    // *** Variables and scope

    fn identifier_constant(&mut self, name: &Token) -> u8 {
        let handle = self.strings.intern(name.lexeme);
        self.make_constant(Value::Str(handle))
    }

    fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenType::Identifier, message);
        self.declare_variable();
        // Locals are addressed by slot, not by name constant.
        if self.scope_depth > 0 {
            return 0;
        }
        let name = self.previous;
        self.identifier_constant(&name)
    }

    fn declare_variable(&mut self) {
        if self.scope_depth == 0 {
            return;
        }
        let name = self.previous;
        let mut duplicate = false;
        for local in self.locals.iter().rev() {
            if let Some(depth) = local.depth {
                if depth < self.scope_depth {
                    break;
                }
            }
            if local.name.lexeme == name.lexeme {
                duplicate = true;
                break;
            }
        }
        if duplicate {
            self.error("Already a variable with this name in this scope.");
        }
        self.add_local(name);
    }

    fn add_local(&mut self, name: Token<'a>) {
        if self.locals.len() >= MAX_LOCALS {
            self.error("Too many local variables in function.");
            return;
        }
        self.locals.push(Local { name, depth: None });
    }

    fn define_variable(&mut self, global: u8) {
        if self.scope_depth > 0 {
            self.mark_initialized();
            return;
        }
        self.emit_with_operand(Opcode::DefineGlobal, global);
    }

    fn mark_initialized(&mut self) {
        if let Some(local) = self.locals.last_mut() {
            local.depth = Some(self.scope_depth);
        }
    }

    fn resolve_local(&mut self, name: &Token) -> Option<u8> {
        let mut uninitialized = false;
        let mut found = None;
        for (slot, local) in self.locals.iter().enumerate().rev() {
            if local.name.lexeme == name.lexeme {
                uninitialized = local.depth.is_none();
                found = Some(slot as u8);
                break;
            }
        }
        if uninitialized {
            self.error("Can't read local variable in its own initializer.");
        }
        found
    }

    fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Discards the scope's locals and the stack slots they occupied.
    fn end_scope(&mut self) {
        self.scope_depth -= 1;
        while self.locals.last().map_or(false, |local| {
            local.depth.map_or(false, |depth| depth > self.scope_depth)
        }) {
            self.emit(Opcode::Pop);
            self.locals.pop();
        }
    }
}
