//! Expression and condition language
//!
//! User equations are parsed once into an explicit tree and then evaluated
//! every simulation tick:
//! - `ast`: expression/condition nodes and their evaluation
//! - `builtins`: named functions callable from equations
//! - `parser`: recursive-descent parser with constant folding
//! - `error`: parse errors

pub mod ast;
pub mod builtins;
pub mod error;
pub mod parser;

pub use ast::{BinaryOp, Condition, EvalContext, Expr, Function, RelationalOp, Variable};
pub use builtins::{Builtin, BinaryFn, UnaryFn};
pub use error::SyntaxError;
pub use parser::{parse_condition, parse_expression, strip_whitespace};

/// Parse a user equation and its optional domain condition.
///
/// Whitespace is removed from both strings first. An empty expression yields
/// `Ok(None)`; an empty condition means the function applies everywhere.
pub fn parse(expression: &str, condition: &str) -> Result<Option<Function>, SyntaxError> {
    parse_function(expression, condition).inspect_err(|e| {
        log::debug!("Rejected equation '{expression}' ; '{condition}': {e}");
    })
}

fn parse_function(expression: &str, condition: &str) -> Result<Option<Function>, SyntaxError> {
    let expression = strip_whitespace(expression);
    let Some(formula) = parse_expression(&expression)? else {
        return Ok(None);
    };

    let condition = strip_whitespace(condition);
    let condition = parse_condition(&condition)?.unwrap_or(Condition::Constant(true));

    Ok(Some(Function::new(formula, condition)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_expression_is_none() {
        assert!(parse("", "").unwrap().is_none());
        assert!(parse("   \t ", "x > 0").unwrap().is_none());
    }

    #[test]
    fn test_parse_strips_whitespace() {
        let f = parse(" 1 + 2 * x ", "").unwrap().unwrap();
        let mut ctx = EvalContext::new(0.0);
        assert!((f.eval_at(2.0, &mut ctx) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_default_condition_allows_everything() {
        let f = parse("x", "").unwrap().unwrap();
        let mut ctx = EvalContext::new(0.0);
        for x in [-1e6, -1.0, 0.0, 1.0, 1e6] {
            ctx.x = x;
            assert!(f.can_eval(&ctx));
        }
    }

    #[test]
    fn test_parse_with_condition() {
        let f = parse("x^2", "-1 <= x < 2").unwrap().unwrap();
        let mut ctx = EvalContext::new(0.0);
        ctx.x = -1.0;
        assert!(f.can_eval(&ctx));
        ctx.x = 2.0;
        assert!(!f.can_eval(&ctx));
        ctx.x = 1.5;
        assert!(f.can_eval(&ctx));
    }

    #[test]
    fn test_parse_reports_condition_errors() {
        let err = parse("x", "x + 1").unwrap_err();
        assert!(err.message().contains("relational operator"));
    }
}
