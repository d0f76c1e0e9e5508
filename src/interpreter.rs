use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::ast::{BinaryOperator, Expression, Program, Statement, UnaryOperator};

mod error;
mod value;

pub use error::RuntimeError;
pub use value::Value;

/// Tree-walking evaluator.
///
/// Owns the flat variable environment and the output sink, so running
/// successive programs against the same instance carries bindings over —
/// that is how a REPL session persists state. Statements that produce no
/// value (print, a branch that never ran) evaluate to `None`.
pub struct Interpreter {
    variables: FxHashMap<String, Value>,
    output: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            variables: FxHashMap::default(),
            output: Vec::new(),
        }
    }

    /// Executes every statement in order; the program's result is the
    /// result of its last statement. Environment mutations and output
    /// lines stick even when a later statement fails.
    pub fn run(&mut self, program: &Program) -> Result<Option<Value>, RuntimeError> {
        self.exec_block(&program.statements)
    }

    /// Lines printed so far; draining resets the sink for the next run.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn variables(&self) -> &FxHashMap<String, Value> {
        &self.variables
    }

    fn exec_block(&mut self, body: &[Statement]) -> Result<Option<Value>, RuntimeError> {
        let mut result = None;
        for statement in body {
            result = self.exec_statement(statement)?;
        }
        Ok(result)
    }

    fn exec_statement(&mut self, statement: &Statement) -> Result<Option<Value>, RuntimeError> {
        match statement {
            Statement::Assign { name, value } => {
                let value = self.eval_expression(value)?;
                self.variables.insert(name.clone(), value.clone());
                // Assignment yields the assigned value.
                Ok(Some(value))
            }
            Statement::Print { arguments } => {
                let mut rendered = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    rendered.push(self.eval_expression(argument)?.to_output());
                }
                self.output.push(rendered.join(" "));
                Ok(None)
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                if self.eval_expression(condition)?.is_truthy() {
                    self.exec_block(then_body)
                } else if let Some(else_body) = else_body {
                    self.exec_block(else_body)
                } else {
                    Ok(None)
                }
            }
            Statement::While { condition, body } => {
                let mut result = None;
                while self.eval_expression(condition)?.is_truthy() {
                    result = self.exec_block(body)?;
                }
                Ok(result)
            }
            Statement::Expr(expr) => Ok(Some(self.eval_expression(expr)?)),
        }
    }

    fn eval_expression(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Number(value) => Ok(Value::Number(*value)),
            Expression::Str(value) => Ok(Value::Str(value.clone())),
            Expression::Identifier(name) => {
                self.variables
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
            }
            Expression::Unary { op, operand } => {
                let operand = self.eval_expression(operand)?;
                apply_unary(*op, &operand)
            }
            Expression::Binary { left, op, right } => {
                // Left operand is fully evaluated before the right one.
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                apply_binary(*op, left, right)
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_binary(op: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOperator::Add => add(left, right),
        BinaryOperator::Sub => numeric(op, left, right, |a, b| a - b),
        BinaryOperator::Mul => numeric(op, left, right, |a, b| a * b),
        BinaryOperator::Div => divide(left, right),
        BinaryOperator::GreaterThan => compare(op, left, right, Ordering::Greater),
        BinaryOperator::LessThan => compare(op, left, right, Ordering::Less),
    }
}

/// `+` concatenates when either side is a string, otherwise adds.
fn add(left: Value, right: Value) -> Result<Value, RuntimeError> {
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        return Ok(Value::Str(format!(
            "{}{}",
            left.to_output(),
            right.to_output()
        )));
    }
    numeric(BinaryOperator::Add, left, right, |a, b| a + b)
}

fn divide(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left.as_number(), right.as_number()) {
        (Some(_), Some(divisor)) if divisor == 0.0 => Err(RuntimeError::DivisionByZero),
        (Some(a), Some(b)) => Ok(Value::Number(a / b)),
        _ => Err(unsupported(BinaryOperator::Div, &left, &right)),
    }
}

fn numeric(
    op: BinaryOperator,
    left: Value,
    right: Value,
    apply: impl Fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok(Value::Number(apply(a, b))),
        _ => Err(unsupported(op, &left, &right)),
    }
}

/// Strings compare lexicographically against each other; everything else
/// compares through the numeric view.
fn compare(
    op: BinaryOperator,
    left: Value,
    right: Value,
    expected: Ordering,
) -> Result<Value, RuntimeError> {
    let ordering = match (&left, &right) {
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(unsupported(op, &left, &right)),
        },
    };
    Ok(Value::Bool(ordering == Some(expected)))
}

fn unsupported(op: BinaryOperator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperands {
        operator: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn apply_unary(op: UnaryOperator, operand: &Value) -> Result<Value, RuntimeError> {
    let Some(number) = operand.as_number() else {
        return Err(RuntimeError::UnsupportedUnaryOperand {
            operator: op.symbol(),
            operand: operand.type_name(),
        });
    };
    Ok(Value::Number(match op {
        UnaryOperator::Negate => -number,
        UnaryOperator::Plus => number,
    }))
}
