/*!
## Rust Machine Module

This Rust module is a single-pass compiler and stack virtual machine for
Lox.

*/

mod chunk;
mod compile;
mod intern;
mod opcode;
mod operation;
mod runtime;
mod stack;
mod value;

#[cfg(test)]
mod tests;

pub use chunk::Chunk;
pub use compile::compile;
pub use compile::MAX_LOCALS;
pub use intern::Interner;
pub use opcode::Opcode;
pub use operation::Operation;
pub use runtime::Interpret;
pub use runtime::Runtime;
pub use stack::Stack;
pub use value::Value;
