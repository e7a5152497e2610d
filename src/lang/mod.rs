/*!
## Rust Language Module

This Rust module provides lexical analysis of Lox source text and the
diagnostic type shared by the compiler and the virtual machine.

*/

mod error;
mod scan;
mod token;

pub use error::Error;
pub use scan::Scanner;
pub use token::Token;
pub use token::TokenType;
