use super::Value;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Numeric operations shared by the run loop. Addition is not here: it is
/// overloaded on strings and needs the intern table, so the machine
/// handles it inline.
pub struct Operation;

impl Operation {
    pub fn negate(val: Value) -> Result<Value> {
        match val {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(Error::runtime("Operand must be a number.")),
        }
    }

    pub fn subtract(lhs: Value, rhs: Value) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l - r)),
            _ => Err(Error::runtime("Operands must be numbers.")),
        }
    }

    pub fn multiply(lhs: Value, rhs: Value) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l * r)),
            _ => Err(Error::runtime("Operands must be numbers.")),
        }
    }

    pub fn divide(lhs: Value, rhs: Value) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l / r)),
            _ => Err(Error::runtime("Operands must be numbers.")),
        }
    }

    pub fn greater(lhs: Value, rhs: Value) -> Result<Value> {
        Operation::less(rhs, lhs)
    }

    pub fn less(lhs: Value, rhs: Value) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Bool(l < r)),
            _ => Err(Error::runtime("Operands must be numbers.")),
        }
    }
}
