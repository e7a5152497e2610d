//! # Lox
//!
//! The Lox scripting language on a bytecode stack machine.

fn main() {
    lox_lang::term::main()
}
