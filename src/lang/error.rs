use super::token::{Token, TokenType};

/// A compile-time or runtime diagnostic.
///
/// Errors are plain values carried back through the return channel; the
/// terminal layer decides where they are printed. `Display` renders the
/// full report line.
#[derive(Debug, PartialEq, Clone)]
pub struct Error {
    message: String,
    line: usize,
    context: Context,
}

#[derive(Debug, PartialEq, Clone)]
enum Context {
    /// Parse error anchored to a source token.
    At(String),
    /// Parse error at end of input.
    AtEnd,
    /// Scanner message; there is no lexeme to point at.
    Bare,
    /// Runtime error inside the running script.
    Script,
}

impl Error {
    pub fn compile(token: &Token, message: &str) -> Error {
        let context = match token.kind {
            TokenType::Eof => Context::AtEnd,
            TokenType::Error => Context::Bare,
            _ => Context::At(token.lexeme.to_string()),
        };
        Error {
            message: message.to_string(),
            line: token.line,
            context,
        }
    }

    pub fn runtime<S: Into<String>>(message: S) -> Error {
        Error {
            message: message.into(),
            line: 0,
            context: Context::Script,
        }
    }

    pub fn in_line(mut self, line: usize) -> Error {
        self.line = line;
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.context {
            Context::At(lexeme) => write!(
                f,
                "[line {}] Error at '{}': {}",
                self.line, lexeme, self.message
            ),
            Context::AtEnd => write!(f, "[line {}] Error at end: {}", self.line, self.message),
            Context::Bare => write!(f, "[line {}] Error: {}", self.line, self.message),
            Context::Script => write!(f, "{}\n[line {}] in script", self.message, self.line),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::runtime(error.to_string())
    }
}
