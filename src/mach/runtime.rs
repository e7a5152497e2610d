use super::{compile, Chunk, Interner, Opcode, Operation, Stack, Value};
use crate::lang::Error;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::io;
use std::io::Write;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Outcome of one `interpret` call. Errors ride along as values so the
/// terminal layer can decide how to present them and which exit code to
/// use.
#[derive(Debug, PartialEq)]
pub enum Interpret {
    Ok,
    CompileError(Vec<Error>),
    RuntimeError(Error),
}

/// ## Virtual machine
///
/// Owns the current chunk, the value stack, the string intern table, and
/// the global environment. The intern table and globals survive across
/// `interpret` calls so a session accumulates definitions; the chunk is
/// replaced wholesale on every call. Printing goes through the owned
/// writer, which is standard output in the terminal front end.
pub struct Runtime<W> {
    chunk: Chunk,
    ip: usize,
    stack: Stack<Value>,
    strings: Interner,
    globals: HashMap<Rc<str>, Value>,
    out: W,
}

impl Runtime<io::Stdout> {
    pub fn new() -> Runtime<io::Stdout> {
        Runtime::with_writer(io::stdout())
    }
}

impl Default for Runtime<io::Stdout> {
    fn default() -> Runtime<io::Stdout> {
        Runtime::new()
    }
}

impl<W: Write> Runtime<W> {
    /// Builds a machine that prints through `out`.
    pub fn with_writer(out: W) -> Runtime<W> {
        Runtime {
            chunk: Chunk::new(),
            ip: 0,
            stack: Stack::new(),
            strings: Interner::new(),
            globals: HashMap::new(),
            out,
        }
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Current binding of a global, if any.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Compiles and runs one source buffer. A runtime failure clears the
    /// value stack; globals and interned strings are kept either way.
    pub fn interpret(&mut self, source: &str) -> Interpret {
        let mut chunk = Chunk::new();
        if let Err(errors) = compile(source, &mut chunk, &mut self.strings) {
            return Interpret::CompileError(errors);
        }
        self.chunk = chunk;
        self.ip = 0;
        match self.run() {
            Ok(()) => Interpret::Ok,
            Err(error) => {
                let line = self.chunk.line(self.ip.saturating_sub(1));
                self.stack.clear();
                Interpret::RuntimeError(error.in_line(line))
            }
        }
    }

    fn read_byte(&mut self) -> Result<u8> {
        match self.chunk.code(self.ip) {
            Some(byte) => {
                self.ip += 1;
                Ok(byte)
            }
            None => Err(Error::runtime("Ran off the end of the chunk.")),
        }
    }

    fn read_constant(&mut self) -> Result<Value> {
        let index = self.read_byte()? as usize;
        match self.chunk.constant(index) {
            Some(value) => Ok(value.clone()),
            None => Err(Error::runtime("Constant index out of range.")),
        }
    }

    fn read_global_name(&mut self) -> Result<Rc<str>> {
        match self.read_constant()? {
            Value::Str(name) => Ok(name),
            _ => Err(Error::runtime("Global name is not a string.")),
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            #[cfg(feature = "trace")]
            self.trace();
            let byte = self.read_byte()?;
            let opcode = Opcode::try_from(byte)
                .map_err(|unknown| Error::runtime(format!("Unknown opcode {}.", unknown)))?;
            match opcode {
                Opcode::Constant => {
                    let value = self.read_constant()?;
                    self.stack.push(value);
                }
                Opcode::Nil => self.stack.push(Value::Nil),
                Opcode::True => self.stack.push(Value::Bool(true)),
                Opcode::False => self.stack.push(Value::Bool(false)),
                Opcode::Pop => {
                    self.stack.pop()?;
                }
                Opcode::GetLocal => {
                    let slot = self.read_byte()? as usize;
                    let value = self.stack.get(slot)?.clone();
                    self.stack.push(value);
                }
                Opcode::SetLocal => {
                    // Assignment is an expression, so the value stays put.
                    let slot = self.read_byte()? as usize;
                    let value = self.stack.peek(0)?.clone();
                    self.stack.set(slot, value)?;
                }
                Opcode::GetGlobal => {
                    let name = self.read_global_name()?;
                    match self.globals.get(&name) {
                        Some(value) => {
                            let value = value.clone();
                            self.stack.push(value);
                        }
                        None => {
                            return Err(Error::runtime(format!(
                                "Undefined variable '{}'.",
                                name
                            )));
                        }
                    }
                }
                Opcode::DefineGlobal => {
                    let name = self.read_global_name()?;
                    let value = self.stack.peek(0)?.clone();
                    self.globals.insert(name, value);
                    self.stack.pop()?;
                }
                Opcode::SetGlobal => {
                    let name = self.read_global_name()?;
                    if !self.globals.contains_key(&name) {
                        return Err(Error::runtime(format!("Undefined variable '{}'.", name)));
                    }
                    let value = self.stack.peek(0)?.clone();
                    self.globals.insert(name, value);
                }
                Opcode::Equal => {
                    let (lhs, rhs) = self.stack.pop_2()?;
                    self.stack.push(Value::Bool(lhs == rhs));
                }
                Opcode::Greater => self.binary(Operation::greater)?,
                Opcode::Less => self.binary(Operation::less)?,
                Opcode::Add => self.add()?,
                Opcode::Subtract => self.binary(Operation::subtract)?,
                Opcode::Multiply => self.binary(Operation::multiply)?,
                Opcode::Divide => self.binary(Operation::divide)?,
                Opcode::Not => {
                    let value = self.stack.pop()?;
                    self.stack.push(Value::Bool(value.is_falsey()));
                }
                Opcode::Negate => {
                    let value = self.stack.pop()?;
                    self.stack.push(Operation::negate(value)?);
                }
                Opcode::Print => {
                    let value = self.stack.pop()?;
                    writeln!(self.out, "{}", value)?;
                }
                Opcode::Return => return Ok(()),
            }
        }
    }

    fn binary(&mut self, operation: fn(Value, Value) -> Result<Value>) -> Result<()> {
        let (lhs, rhs) = self.stack.pop_2()?;
        self.stack.push(operation(lhs, rhs)?);
        Ok(())
    }

    /// `+` adds numbers and concatenates strings. The concatenated bytes
    /// go through the intern table so an existing handle with the same
    /// content is reused.
    fn add(&mut self) -> Result<()> {
        let (lhs, rhs) = self.stack.pop_2()?;
        let value = match (lhs, rhs) {
            (Value::Number(l), Value::Number(r)) => Value::Number(l + r),
            (Value::Str(l), Value::Str(r)) => {
                let mut text = String::with_capacity(l.len() + r.len());
                text.push_str(&l);
                text.push_str(&r);
                Value::Str(self.strings.intern(&text))
            }
            _ => {
                return Err(Error::runtime(
                    "Operands must be two numbers or two strings.",
                ));
            }
        };
        self.stack.push(value);
        Ok(())
    }

    #[cfg(feature = "trace")]
    fn trace(&self) {
        eprint!("          ");
        for value in self.stack.vec() {
            eprint!("[ {} ]", value);
        }
        eprintln!();
        let (text, _) = self.chunk.disassemble_instruction(self.ip);
        eprintln!("{}", text);
    }
}
