use super::{Opcode, Value};
use std::convert::TryFrom;
use std::fmt::Write;

/// ## Bytecode chunk
///
/// The flat opcode/operand byte stream, a parallel table of source lines
/// used only for diagnostics, and the constant pool addressed by one-byte
/// operands. Append-only; a chunk is built once per compile and then
/// handed to the machine wholesale.
#[derive(Debug, Default)]
pub struct Chunk {
    code: Vec<u8>,
    lines: Vec<usize>,
    constants: Vec<Value>,
}

impl Chunk {
    pub fn new() -> Chunk {
        Chunk::default()
    }

    pub fn write(&mut self, byte: u8, line: usize) {
        self.code.push(byte);
        self.lines.push(line);
    }

    pub fn write_opcode(&mut self, opcode: Opcode, line: usize) {
        self.write(opcode.into(), line);
    }

    /// Appends to the constant pool and returns the new index. The
    /// compiler rejects indexes that do not fit in an operand byte.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn code(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    pub fn line(&self, offset: usize) -> usize {
        self.lines.get(offset).copied().unwrap_or(0)
    }

    pub fn constant(&self, index: usize) -> Option<&Value> {
        self.constants.get(index)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn constants_len(&self) -> usize {
        self.constants.len()
    }

    /// Renders the whole chunk, one instruction per line.
    pub fn disassemble(&self, name: &str) -> String {
        let mut text = format!("== {} ==\n", name);
        let mut offset = 0;
        while offset < self.code.len() {
            let (line, next) = self.disassemble_instruction(offset);
            text.push_str(&line);
            text.push('\n');
            offset = next;
        }
        text
    }

    /// Renders one instruction and returns the offset of the next one.
    /// The line column shows `|` when the line repeats the previous
    /// instruction's.
    pub fn disassemble_instruction(&self, offset: usize) -> (String, usize) {
        let mut text = String::new();
        let _ = write!(text, "{:04} ", offset);
        if offset > 0 && self.line(offset) == self.line(offset - 1) {
            text.push_str("   | ");
        } else {
            let _ = write!(text, "{:4} ", self.line(offset));
        }
        let byte = match self.code(offset) {
            Some(byte) => byte,
            None => {
                text.push_str("<end of chunk>");
                return (text, offset + 1);
            }
        };
        let opcode = match Opcode::try_from(byte) {
            Ok(opcode) => opcode,
            Err(unknown) => {
                let _ = write!(text, "Unknown opcode {}", unknown);
                return (text, offset + 1);
            }
        };
        if opcode.operands() == 0 {
            let _ = write!(text, "{}", opcode);
            return (text, offset + 1);
        }
        let operand = match self.code(offset + 1) {
            Some(operand) => operand,
            None => {
                let _ = write!(text, "{:<16} <truncated>", opcode);
                return (text, offset + 1);
            }
        };
        match opcode {
            Opcode::GetLocal | Opcode::SetLocal => {
                let _ = write!(text, "{:<16} {:4}", opcode, operand);
            }
            _ => match self.constant(operand as usize) {
                Some(value) => {
                    let _ = write!(text, "{:<16} {:4} '{}'", opcode, operand, value);
                }
                None => {
                    let _ = write!(text, "{:<16} {:4}", opcode, operand);
                }
            },
        }
        (text, offset + 2)
    }
}
