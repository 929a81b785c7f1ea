//! Expression and condition trees
//!
//! Trees are built by the parser and walked every tick. Constant subtrees are
//! folded while the tree is built, never during evaluation.

use super::builtins::Builtin;

/// Runtime variables visible to equations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalContext {
    /// Seconds since the simulation started. Fixed for one tick.
    pub t: f64,
    /// Horizontal coordinate being evaluated. Not the ball position!
    pub x: f64,
}

impl EvalContext {
    pub fn new(t: f64) -> Self {
        Self { t, x: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    X,
    T,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 3,
        }
    }

    #[inline]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Comparison operators. All share one precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl RelationalOp {
    #[inline]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            RelationalOp::Lt => lhs < rhs,
            RelationalOp::Le => lhs <= rhs,
            RelationalOp::Gt => lhs > rhs,
            RelationalOp::Ge => lhs >= rhs,
            RelationalOp::Eq => lhs == rhs,
            RelationalOp::Ne => lhs != rhs,
        }
    }
}

/// A numeric expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(f64),
    Variable(Variable),
    Negate(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Builtin, Vec<Expr>),
}

impl Expr {
    /// Build a binary node, folding it to a constant when both sides are.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        match (lhs.try_const_evaluate(), rhs.try_const_evaluate()) {
            (Some(l), Some(r)) => Expr::Constant(op.apply(l, r)),
            _ => Expr::Binary(op, Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn negate(operand: Expr) -> Expr {
        match operand.try_const_evaluate() {
            Some(v) => Expr::Constant(-v),
            None => Expr::Negate(Box::new(operand)),
        }
    }

    pub fn call(func: Builtin, args: Vec<Expr>) -> Expr {
        let folded: Option<Vec<f64>> = args.iter().map(Expr::try_const_evaluate).collect();
        match folded {
            Some(values) => Expr::Constant(func.apply(&values)),
            None => Expr::Call(func, args),
        }
    }

    pub fn evaluate(&self, ctx: &EvalContext) -> f64 {
        match self {
            Expr::Constant(v) => *v,
            Expr::Variable(Variable::X) => ctx.x,
            Expr::Variable(Variable::T) => ctx.t,
            Expr::Negate(inner) => -inner.evaluate(ctx),
            Expr::Binary(op, lhs, rhs) => op.apply(lhs.evaluate(ctx), rhs.evaluate(ctx)),
            Expr::Call(func, args) => match args.as_slice() {
                [v] => func.apply(&[v.evaluate(ctx)]),
                [a, b] => func.apply(&[a.evaluate(ctx), b.evaluate(ctx)]),
                _ => {
                    let values: Vec<f64> = args.iter().map(|a| a.evaluate(ctx)).collect();
                    func.apply(&values)
                }
            },
        }
    }

    /// Evaluate without a context. `None` if the subtree reads `x` or `t`.
    pub fn try_const_evaluate(&self) -> Option<f64> {
        match self {
            Expr::Constant(v) => Some(*v),
            Expr::Variable(_) => None,
            Expr::Negate(inner) => inner.try_const_evaluate().map(|v| -v),
            Expr::Binary(op, lhs, rhs) => {
                Some(op.apply(lhs.try_const_evaluate()?, rhs.try_const_evaluate()?))
            }
            Expr::Call(func, args) => {
                let values: Option<Vec<f64>> = args.iter().map(Expr::try_const_evaluate).collect();
                values.map(|v| func.apply(&v))
            }
        }
    }
}

/// A boolean domain filter
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Constant(bool),
    Relational(RelationalOp, Expr, Expr),
    /// Produced by chaining, `a < b < c` => `(a < b) && (b < c)`
    And(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn evaluate(&self, ctx: &EvalContext) -> bool {
        match self {
            Condition::Constant(b) => *b,
            Condition::Relational(op, lhs, rhs) => op.apply(lhs.evaluate(ctx), rhs.evaluate(ctx)),
            Condition::And(a, b) => a.evaluate(ctx) && b.evaluate(ctx),
        }
    }

    pub fn try_const_evaluate(&self) -> Option<bool> {
        match self {
            Condition::Constant(b) => Some(*b),
            Condition::Relational(op, lhs, rhs) => {
                Some(op.apply(lhs.try_const_evaluate()?, rhs.try_const_evaluate()?))
            }
            Condition::And(a, b) => Some(a.try_const_evaluate()? && b.try_const_evaluate()?),
        }
    }
}

/// An equation: a formula filtered by a condition
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    formula: Expr,
    condition: Condition,
}

impl Function {
    pub fn new(formula: Expr, condition: Condition) -> Self {
        Self { formula, condition }
    }

    /// A formula that applies everywhere
    pub fn unconditional(formula: Expr) -> Self {
        Self::new(formula, Condition::Constant(true))
    }

    pub fn formula(&self) -> &Expr {
        &self.formula
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Whether the condition permits evaluating at `ctx.x`
    pub fn can_eval(&self, ctx: &EvalContext) -> bool {
        self.condition.evaluate(ctx)
    }

    pub fn eval(&self, ctx: &EvalContext) -> f64 {
        self.formula.evaluate(ctx)
    }

    /// Bind `x` into the context, then evaluate
    pub fn eval_at(&self, x: f64, ctx: &mut EvalContext) -> f64 {
        ctx.x = x;
        self.eval(ctx)
    }
}
