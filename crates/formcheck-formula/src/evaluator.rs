//! Expression evaluator
//!
//! Evaluates arithmetic ASTs to a finite `f64`.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_expression;

/// Parse and evaluate an arithmetic expression in one step
///
/// # Example
/// ```rust
/// use formcheck_formula::{evaluate_expression, FormulaError};
///
/// assert_eq!(evaluate_expression("(4.5 - 1.5) * 2").unwrap(), 6.0);
/// assert!(matches!(evaluate_expression("5/0"), Err(FormulaError::ArithmeticError(_))));
/// ```
pub fn evaluate_expression(expression: &str) -> FormulaResult<f64> {
    let expr = parse_expression(expression)?;
    evaluate(&expr)
}

/// Evaluate an expression tree
///
/// Fails with [`FormulaError::ArithmeticError`] on division by zero or when
/// any intermediate result is not finite.
pub fn evaluate(expr: &Expr) -> FormulaResult<f64> {
    let value = match expr {
        Expr::Number(n) => *n,
        Expr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right)?,
        Expr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand)?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::ArithmeticError(format!(
            "result is not finite: {}",
            value
        )))
    }
}

fn evaluate_binary_op(op: BinaryOperator, left: &Expr, right: &Expr) -> FormulaResult<f64> {
    let l = evaluate(left)?;
    let r = evaluate(right)?;

    match op {
        BinaryOperator::Add => Ok(l + r),
        BinaryOperator::Subtract => Ok(l - r),
        BinaryOperator::Multiply => Ok(l * r),
        BinaryOperator::Divide => {
            if r == 0.0 {
                Err(FormulaError::ArithmeticError("division by zero".into()))
            } else {
                Ok(l / r)
            }
        }
    }
}

fn evaluate_unary_op(op: UnaryOperator, operand: &Expr) -> FormulaResult<f64> {
    let n = evaluate(operand)?;
    match op {
        UnaryOperator::Negate => Ok(-n),
    }
}
