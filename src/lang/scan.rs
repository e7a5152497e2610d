use super::token::{Token, TokenType};

fn is_lox_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_lox_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn check_keyword(word: &str, offset: usize, rest: &str, kind: TokenType) -> TokenType {
    if &word[offset..] == rest {
        kind
    } else {
        TokenType::Identifier
    }
}

/// ## Source scanner
///
/// Produces one token per `scan_token` call. Lexemes are slices of the
/// original source; the scanner keeps only its position and the current
/// line. Scanning past the end keeps returning `Eof`.
pub struct Scanner<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn scan_token(&mut self) -> Token<'a> {
        self.skip_whitespace();
        self.start = self.current;
        if self.is_at_end() {
            return self.make_token(TokenType::Eof);
        }
        let c = self.advance();
        if is_lox_alpha(c) {
            return self.identifier();
        }
        if is_lox_digit(c) {
            return self.number();
        }
        match c {
            '(' => self.make_token(TokenType::LeftParen),
            ')' => self.make_token(TokenType::RightParen),
            '{' => self.make_token(TokenType::LeftBrace),
            '}' => self.make_token(TokenType::RightBrace),
            ';' => self.make_token(TokenType::Semicolon),
            ',' => self.make_token(TokenType::Comma),
            '.' => self.make_token(TokenType::Dot),
            '-' => self.make_token(TokenType::Minus),
            '+' => self.make_token(TokenType::Plus),
            '/' => self.make_token(TokenType::Slash),
            '*' => self.make_token(TokenType::Star),
            '!' => {
                let kind = if self.matches('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.make_token(kind)
            }
            '=' => {
                let kind = if self.matches('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.make_token(kind)
            }
            '<' => {
                let kind = if self.matches('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.make_token(kind)
            }
            '>' => {
                let kind = if self.matches('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.make_token(kind)
            }
            '"' => self.string(),
            _ => self.error_token("Unexpected character."),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += c.len_utf8();
        c
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() != expected {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn make_token(&self, kind: TokenType) -> Token<'a> {
        Token {
            kind,
            lexeme: &self.source[self.start..self.current],
            line: self.line,
        }
    }

    fn error_token(&self, message: &'static str) -> Token<'a> {
        Token {
            kind: TokenType::Error,
            lexeme: message,
            line: self.line,
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.line += 1;
                    self.advance();
                }
                '/' => {
                    if self.peek_next() != '/' {
                        return;
                    }
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn identifier(&mut self) -> Token<'a> {
        while is_lox_alpha(self.peek()) || is_lox_digit(self.peek()) {
            self.advance();
        }
        self.make_token(self.identifier_type())
    }

    // First/second character dispatch over the lexeme; cheaper than a
    // keyword table for this small a language.
    fn identifier_type(&self) -> TokenType {
        let word = &self.source[self.start..self.current];
        match word.as_bytes()[0] {
            b'a' => check_keyword(word, 1, "nd", TokenType::And),
            b'c' => check_keyword(word, 1, "lass", TokenType::Class),
            b'e' => check_keyword(word, 1, "lse", TokenType::Else),
            b'f' => match word.as_bytes().get(1) {
                Some(b'a') => check_keyword(word, 2, "lse", TokenType::False),
                Some(b'o') => check_keyword(word, 2, "r", TokenType::For),
                Some(b'u') => check_keyword(word, 2, "n", TokenType::Fun),
                _ => TokenType::Identifier,
            },
            b'i' => check_keyword(word, 1, "f", TokenType::If),
            b'n' => check_keyword(word, 1, "il", TokenType::Nil),
            b'o' => check_keyword(word, 1, "r", TokenType::Or),
            b'p' => check_keyword(word, 1, "rint", TokenType::Print),
            b'r' => check_keyword(word, 1, "eturn", TokenType::Return),
            b's' => check_keyword(word, 1, "uper", TokenType::Super),
            b't' => match word.as_bytes().get(1) {
                Some(b'h') => check_keyword(word, 2, "is", TokenType::This),
                Some(b'r') => check_keyword(word, 2, "ue", TokenType::True),
                _ => TokenType::Identifier,
            },
            b'v' => check_keyword(word, 1, "ar", TokenType::Var),
            b'w' => check_keyword(word, 1, "hile", TokenType::While),
            _ => TokenType::Identifier,
        }
    }

    fn number(&mut self) -> Token<'a> {
        while is_lox_digit(self.peek()) {
            self.advance();
        }
        // A trailing '.' with no digit after it belongs to the next token.
        if self.peek() == '.' && is_lox_digit(self.peek_next()) {
            self.advance();
            while is_lox_digit(self.peek()) {
                self.advance();
            }
        }
        self.make_token(TokenType::Number)
    }

    fn string(&mut self) -> Token<'a> {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
        if self.is_at_end() {
            return self.error_token("Unterminated string.");
        }
        self.advance();
        self.make_token(TokenType::String)
    }
}
