//! Expression parser
//!
//! A recursive descent parser for the restricted arithmetic language used by
//! formulas once every reference code has been replaced by a number:
//! decimal literals, `+ - * /`, unary sign and parentheses.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};

/// Deepest nesting of parentheses and unary signs accepted
pub const MAX_DEPTH: usize = 256;

/// Most binary operators accepted in one expression
///
/// Together with [`MAX_DEPTH`] this bounds the height of the tree, so
/// evaluating and dropping it never runs out of stack.
pub const MAX_OPERATORS: usize = 256;

/// Parse an arithmetic expression into an AST
///
/// Every character must be an ASCII digit, `.`, one of `+ - * / ( )` or
/// whitespace. Anything else is rejected before parsing starts. Expressions
/// nested deeper than [`MAX_DEPTH`] or holding more than [`MAX_OPERATORS`]
/// binary operators are malformed.
///
/// # Example
/// ```rust
/// use formcheck_formula::parse_expression;
///
/// let ast = parse_expression("(5 - 1) / 2").unwrap();
/// assert!(parse_expression("2 ** 3").is_err());
/// ```
pub fn parse_expression(expression: &str) -> FormulaResult<Expr> {
    if let Some(c) = expression.chars().find(|c| !is_allowed(*c)) {
        return Err(FormulaError::InvalidExpression(c));
    }

    let mut parser = ExpressionParser::new(expression)?;
    if parser.current_token == Token::Eof {
        return Err(FormulaError::MalformedExpression("empty expression".into()));
    }

    let expr = parser.parse_additive()?;

    // Make sure we consumed all input
    if parser.current_token != Token::Eof {
        return Err(FormulaError::MalformedExpression(format!(
            "unexpected {} at offset {}",
            parser.current_token, parser.token_start
        )));
    }

    Ok(expr)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')')
        || c.is_whitespace()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Eof => f.write_str("end of expression"),
        }
    }
}

struct ExpressionParser<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    current_token: Token,
    depth: usize,
    operators: usize,
}

impl<'a> ExpressionParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: Token::Eof,
            depth: 0,
            operators: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '0'..='9' | '.' => return self.scan_number(),
            other => return Err(FormulaError::InvalidExpression(other)),
        };
        self.advance();
        Ok(token)
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // Fractional part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::MalformedExpression(format!("invalid number '{}'", text)))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = self.current_token;
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> FormulaResult<()> {
        if self.current_token == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::MalformedExpression(format!(
                "expected {}, found {}",
                expected, self.current_token
            )))
        }
    }

    fn descend(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::MalformedExpression(
                "expression nested too deeply".into(),
            ));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn count_operator(&mut self) -> FormulaResult<()> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(FormulaError::MalformedExpression(
                "expression has too many operators".into(),
            ));
        }
        Ok(())
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, parentheses

    fn parse_additive(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            self.count_operator()?;
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            self.count_operator()?;
            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        match self.current_token {
            Token::Minus => {
                self.consume()?;
                self.descend()?;
                let operand = self.parse_unary()?;
                self.ascend();
                Ok(Expr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(operand),
                })
            }
            // Prefix plus is a no-op
            Token::Plus => {
                self.consume()?;
                self.descend()?;
                let operand = self.parse_unary()?;
                self.ascend();
                Ok(operand)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        match self.current_token {
            Token::Number(n) => {
                self.consume()?;
                Ok(Expr::Number(n))
            }

            Token::LeftParen => {
                self.consume()?;
                self.descend()?;
                let expr = self.parse_additive()?;
                self.expect(Token::RightParen)?;
                self.ascend();
                Ok(expr)
            }

            other => Err(FormulaError::MalformedExpression(format!(
                "unexpected {} at offset {}",
                other, self.token_start
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expression("42").unwrap(), Expr::Number(42.0));
        assert_eq!(parse_expression(" 3.25 ").unwrap(), Expr::Number(3.25));
        assert_eq!(parse_expression(".5").unwrap(), Expr::Number(0.5));
        assert_eq!(parse_expression("5.").unwrap(), Expr::Number(5.0));
    }

    #[test]
    fn test_parse_precedence() {
        // 1+(2*3)
        let ast = parse_expression("1+2*3").unwrap();
        assert_eq!(
            ast,
            Expr::BinaryOp {
                op: BinaryOperator::Add,
                left: num(1.0),
                right: Box::new(Expr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    left: num(2.0),
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_parse_left_associative() {
        // (8-3)-1
        let ast = parse_expression("8-3-1").unwrap();
        if let Expr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Subtract);
            assert_eq!(*right, Expr::Number(1.0));
            assert!(matches!(
                *left,
                Expr::BinaryOp {
                    op: BinaryOperator::Subtract,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(
            parse_expression("-5").unwrap(),
            Expr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: num(5.0),
            }
        );
        assert_eq!(parse_expression("+5").unwrap(), Expr::Number(5.0));
        assert!(parse_expression("3--2").is_ok());
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse_expression("((1+2))*3").unwrap();
        assert!(matches!(
            ast,
            Expr::BinaryOp {
                op: BinaryOperator::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_disallowed_characters() {
        assert_eq!(
            parse_expression("C0010+1"),
            Err(FormulaError::InvalidExpression('C'))
        );
        assert_eq!(parse_expression("2^3"), Err(FormulaError::InvalidExpression('^')));
        assert_eq!(parse_expression("1e5"), Err(FormulaError::InvalidExpression('e')));
        assert_eq!(parse_expression("1,5"), Err(FormulaError::InvalidExpression(',')));
    }

    #[test]
    fn test_malformed_expressions() {
        let cases = [
            "", "   ", "1+", "(1+2", "1+2)", "()", "2**3", "7//2", "2(3)", "1 2", "1.2.3", ".",
        ];
        for text in cases {
            assert!(
                matches!(parse_expression(text), Err(FormulaError::MalformedExpression(_))),
                "expected malformed: {:?}",
                text
            );
        }
    }

    fn nested(depth: usize) -> String {
        format!("{}1{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_the_limit() {
        assert_eq!(parse_expression(&nested(MAX_DEPTH)).unwrap(), Expr::Number(1.0));
        let signs = format!("{}1", "-".repeat(MAX_DEPTH));
        assert!(parse_expression(&signs).is_ok());
    }

    #[test]
    fn test_deep_nesting_is_malformed() {
        let too_deep = [
            nested(MAX_DEPTH + 1),
            nested(16_000),
            format!("{}1", "-".repeat(16_000)),
            format!("{}1", "+-".repeat(8_000)),
            format!("{}1{}", "-(".repeat(8_000), ")".repeat(8_000)),
        ];
        for text in &too_deep {
            assert_eq!(
                parse_expression(text),
                Err(FormulaError::MalformedExpression(
                    "expression nested too deeply".into()
                ))
            );
        }
    }

    #[test]
    fn test_long_operator_chains_are_malformed() {
        let at_limit = vec!["1"; MAX_OPERATORS + 1].join("+");
        assert!(parse_expression(&at_limit).is_ok());

        for op in ["+", "-", "*", "/"] {
            let chain = vec!["1"; 20_000].join(op);
            assert_eq!(
                parse_expression(&chain),
                Err(FormulaError::MalformedExpression(
                    "expression has too many operators".into()
                ))
            );
        }
    }
}
