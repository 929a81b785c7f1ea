//! Recursive-descent parser for equations and conditions
//!
//! Operators are merged with an operand stack and an operator stack: the
//! top of the operator stack is merged while its precedence is at least the
//! incoming operator's, which makes equal-precedence chains left
//! associative. `^` is handled inline by recursing into the operand parser,
//! so it binds tighter than everything else and `2^3^2` is `2^(3^2)`.
//!
//! Both entry points expect input without whitespace (see
//! [`strip_whitespace`]).

use super::ast::{BinaryOp, Condition, Expr, RelationalOp, Variable};
use super::builtins::Builtin;
use super::error::SyntaxError;

/// Deepest operand nesting (parentheses, calls, exponents) accepted
const MAX_DEPTH: usize = 256;

/// Remove every whitespace character
pub fn strip_whitespace(src: &str) -> String {
    src.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a numeric expression. Empty input yields `Ok(None)`.
pub fn parse_expression(src: &str) -> Result<Option<Expr>, SyntaxError> {
    let chars: Vec<char> = src.chars().collect();
    if chars.is_empty() {
        return Ok(None);
    }

    let mut parser = Parser::new(&chars);
    let expr = parser.parse_expr()?;
    parser.expect_end()?;
    Ok(Some(expr))
}

/// Parse a condition such as `x > 0` or `-2 <= x < 3`. Empty input yields
/// `Ok(None)`.
pub fn parse_condition(src: &str) -> Result<Option<Condition>, SyntaxError> {
    let chars: Vec<char> = src.chars().collect();
    if chars.is_empty() {
        return Ok(None);
    }

    let mut parser = Parser::new(&chars);
    let condition = parser.parse_condition()?;
    parser.expect_end()?;
    Ok(Some(condition))
}

struct Parser<'a> {
    src: &'a [char],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a [char]) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src.get(self.pos + offset).copied()
    }

    fn consume(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, message: &str) -> Result<(), SyntaxError> {
        if self.consume(c) {
            Ok(())
        } else {
            Err(SyntaxError::new(message))
        }
    }

    fn rest(&self) -> String {
        self.src[self.pos.min(self.src.len())..].iter().collect()
    }

    fn expect_end(&self) -> Result<(), SyntaxError> {
        if self.pos < self.src.len() {
            return Err(SyntaxError::new(format!("Trailing content: '{}'", self.rest())));
        }
        Ok(())
    }

    fn next_is_alphabetic(&self) -> bool {
        self.peek().is_some_and(char::is_alphabetic)
    }

    // === Expressions ===

    fn parse_number(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.pos;
        let mut digits = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            digits += 1;
        }
        if self.consume('.') {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
                digits += 1;
            }
        }

        if digits == 0 {
            self.pos = start;
            if self.pos >= self.src.len() {
                return Err(SyntaxError::new(
                    "Expression cannot end with an operator or '('",
                ));
            }
            return Err(SyntaxError::new(format!(
                "Expected a number or '(' instead of '{}'",
                self.rest()
            )));
        }

        let text: String = self.src[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(Expr::Constant)
            .map_err(|_| SyntaxError::new(format!("Invalid number '{text}'")))
    }

    fn parse_identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        self.src[start..self.pos].iter().collect()
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr, SyntaxError> {
        let Some(func) = Builtin::from_name(name) else {
            return Err(SyntaxError::new(format!("Unknown function: '{name}'")));
        };

        let mut args = Vec::with_capacity(func.arity());
        args.push(self.parse_expr()?);
        for _ in 1..func.arity() {
            self.expect(',', "Missing comma between function parameters")?;
            args.push(self.parse_expr()?);
        }
        self.expect(')', "Missing closing ')'")?;

        Ok(Expr::call(func, args))
    }

    fn parse_variable_or_call(&mut self) -> Result<Expr, SyntaxError> {
        let name = self.parse_identifier();
        if self.consume('(') {
            return self.parse_call(&name);
        }

        match name.as_str() {
            "x" => Ok(Expr::Variable(Variable::X)),
            "t" => Ok(Expr::Variable(Variable::T)),
            "pi" | "PI" => Ok(Expr::Constant(std::f64::consts::PI)),
            "e" | "E" => Ok(Expr::Constant(std::f64::consts::E)),
            _ => Err(SyntaxError::new(format!(
                "Unknown variable '{name}', only 'x', 't', 'pi' and 'e' are allowed"
            ))),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        if self.consume('(') {
            let inner = self.parse_expr()?;
            self.expect(')', "Missing closing ')'")?;
            return Ok(inner);
        }
        if self.next_is_alphabetic() {
            return self.parse_variable_or_call();
        }
        self.parse_number()
    }

    fn parse_power(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.parse_primary()?;
        if self.consume('^') {
            let exponent = self.parse_operand()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_operand(&mut self) -> Result<Expr, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::new("Expression nested too deeply"));
        }
        self.depth += 1;
        let operand = self.parse_signed_operand();
        self.depth -= 1;
        operand
    }

    fn parse_signed_operand(&mut self) -> Result<Expr, SyntaxError> {
        let negate = self.consume('-');
        let operand = self.parse_power()?;
        if negate {
            return Ok(Expr::negate(operand));
        }
        Ok(operand)
    }

    fn try_parse_operator(&mut self) -> Option<BinaryOp> {
        // Implicit multiplication before identifiers: `5x`, `3sin(x)`, `(1+2)x`
        if self.next_is_alphabetic() {
            return Some(BinaryOp::Mul);
        }

        let op = match self.peek()? {
            '+' => BinaryOp::Add,
            '-' => BinaryOp::Sub,
            '*' => BinaryOp::Mul,
            '/' => BinaryOp::Div,
            _ => return None,
        };
        self.pos += 1;
        Some(op)
    }

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        let first = self.parse_operand()?;
        let Some(first_op) = self.try_parse_operator() else {
            return Ok(first);
        };

        let mut operators = vec![first_op];
        let mut operands = vec![first, self.parse_operand()?];

        while let Some(op) = self.try_parse_operator() {
            let operand = self.parse_operand()?;
            while operators
                .last()
                .is_some_and(|top| op.precedence() <= top.precedence())
            {
                merge_top(&mut operands, &mut operators);
            }
            operators.push(op);
            operands.push(operand);
        }

        while !operators.is_empty() {
            merge_top(&mut operands, &mut operators);
        }

        operands
            .pop()
            .ok_or_else(|| SyntaxError::new("Empty expression"))
    }

    // === Conditions ===

    fn try_parse_relational(&mut self) -> Option<RelationalOp> {
        let (op, len) = match (self.peek()?, self.peek_at(1)) {
            ('<', Some('=')) => (RelationalOp::Le, 2),
            ('<', _) => (RelationalOp::Lt, 1),
            ('>', Some('=')) => (RelationalOp::Ge, 2),
            ('>', _) => (RelationalOp::Gt, 1),
            ('=', Some('=')) => (RelationalOp::Eq, 2),
            ('!', Some('=')) => (RelationalOp::Ne, 2),
            _ => return None,
        };
        self.pos += len;
        Some(op)
    }

    fn parse_condition(&mut self) -> Result<Condition, SyntaxError> {
        let lhs = self.parse_expr()?;
        let Some(op) = self.try_parse_relational() else {
            let found = match self.peek() {
                Some(c) => c.to_string(),
                None => "(end of expression)".to_string(),
            };
            return Err(SyntaxError::new(format!(
                "Expected a relational operator, found '{found}'"
            )));
        };

        let mut rhs = self.parse_expr()?;
        let mut condition = Condition::Relational(op, lhs, rhs.clone());

        while let Some(op) = self.try_parse_relational() {
            let next = self.parse_expr()?;
            let clause = Condition::Relational(op, rhs, next.clone());
            condition = Condition::And(Box::new(condition), Box::new(clause));
            rhs = next;
        }

        Ok(condition)
    }
}

fn merge_top(operands: &mut Vec<Expr>, operators: &mut Vec<BinaryOp>) {
    let Some(op) = operators.pop() else {
        return;
    };
    if let (Some(rhs), Some(lhs)) = (operands.pop(), operands.pop()) {
        operands.push(Expr::binary(op, lhs, rhs));
    }
}
