/*!
## Rust Terminal Module

This Rust module is the command line front end: argument dispatch, the
interactive prompt, and the file runner with its exit codes.

*/

extern crate ansi_term;
extern crate linefeed;

use crate::lang::Error;
use crate::mach::{Interpret, Runtime};
use ansi_term::Style;
use linefeed::{Interface, ReadResult, Signal};
use std::fs;
use std::io::ErrorKind;
use std::process;

/// No argument opens the interactive prompt; one argument runs a file.
pub fn main() {
    if std::env::args().count() > 2 {
        eprintln!("Usage: lox [path]");
        process::exit(64);
    }
    let mut args = std::env::args();
    let _executable = args.next();
    match args.next() {
        Some(path) => run_file(&path),
        None => repl(),
    }
}

/// Exit codes follow the sysexits convention: 65 for a compile error,
/// 70 for a runtime error, 74 when the source cannot be read.
fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            if error.kind() == ErrorKind::NotFound {
                eprintln!("Could not open file \"{}\".", path);
            } else {
                eprintln!("Could not read file \"{}\".", path);
            }
            process::exit(74);
        }
    };
    let mut runtime = Runtime::new();
    match runtime.interpret(&source) {
        Interpret::Ok => {}
        Interpret::CompileError(errors) => {
            report(&errors, false);
            process::exit(65);
        }
        Interpret::RuntimeError(error) => {
            report(&[error], false);
            process::exit(70);
        }
    }
}

/// One machine lives for the whole session, so definitions from earlier
/// lines stay visible. End of input prints a newline and exits cleanly.
fn repl() {
    let interface = match open_interface() {
        Ok(interface) => interface,
        Err(error) => {
            eprintln!("Could not open terminal: {}", error);
            process::exit(74);
        }
    };
    let mut runtime = Runtime::new();
    loop {
        match interface.read_line() {
            Ok(ReadResult::Input(line)) => {
                match runtime.interpret(&line) {
                    Interpret::Ok => {}
                    Interpret::CompileError(errors) => report(&errors, true),
                    Interpret::RuntimeError(error) => report(&[error], true),
                }
                interface.add_history_unique(line);
            }
            // Ctrl-C abandons the current line and redraws the prompt.
            Ok(ReadResult::Signal(Signal::Interrupt)) => continue,
            Ok(ReadResult::Signal(_)) | Ok(ReadResult::Eof) => {
                println!();
                break;
            }
            Err(error) => {
                eprintln!("Failed to read line: {}", error);
                break;
            }
        }
    }
}

fn open_interface() -> std::io::Result<Interface<linefeed::DefaultTerminal>> {
    let interface = Interface::new("lox")?;
    interface.set_prompt("> ")?;
    interface.set_report_signal(Signal::Interrupt, true);
    Ok(interface)
}

fn report(errors: &[Error], styled: bool) {
    for error in errors {
        if styled {
            eprintln!("{}", Style::new().bold().paint(error.to_string()));
        } else {
            eprintln!("{}", error);
        }
    }
}
