//! # Lox
//!
//! The Lox scripting language on a bytecode stack machine.
//!
//! A single-pass compiler scans and parses the source while it emits a flat
//! chunk of instructions; the virtual machine executes the chunk over a
//! value stack, with interned strings and a session-long global environment.
//! ```text
//! > print "hello" + " " + "world";
//! hello world
//! ```

pub mod lang;
pub mod mach;
pub mod term;
