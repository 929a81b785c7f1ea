//! Named functions callable from equations
//!
//! Single-argument names are matched case-insensitively, the two-argument
//! ones (`min`, `max`, `pow`, `atan2`/`arctan2`, `hypot`) exactly.

/// Functions of one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Cbrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,
}

impl UnaryFn {
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name.to_lowercase().as_str() {
            "sin" => UnaryFn::Sin,
            "cos" => UnaryFn::Cos,
            "tan" => UnaryFn::Tan,
            "asin" | "arcsin" => UnaryFn::Asin,
            "acos" | "arccos" => UnaryFn::Acos,
            "atan" | "arctan" => UnaryFn::Atan,
            "sinh" => UnaryFn::Sinh,
            "cosh" => UnaryFn::Cosh,
            "tanh" => UnaryFn::Tanh,
            "exp" => UnaryFn::Exp,
            "log" | "ln" => UnaryFn::Ln,
            "log10" | "lg" => UnaryFn::Log10,
            "sqrt" => UnaryFn::Sqrt,
            "cbrt" => UnaryFn::Cbrt,
            "abs" => UnaryFn::Abs,
            "floor" => UnaryFn::Floor,
            "ceil" => UnaryFn::Ceil,
            "round" => UnaryFn::Round,
            "sign" | "signum" => UnaryFn::Sign,
            _ => return None,
        };
        Some(f)
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            UnaryFn::Sin => v.sin(),
            UnaryFn::Cos => v.cos(),
            UnaryFn::Tan => v.tan(),
            UnaryFn::Asin => v.asin(),
            UnaryFn::Acos => v.acos(),
            UnaryFn::Atan => v.atan(),
            UnaryFn::Sinh => v.sinh(),
            UnaryFn::Cosh => v.cosh(),
            UnaryFn::Tanh => v.tanh(),
            UnaryFn::Exp => v.exp(),
            UnaryFn::Ln => v.ln(),
            UnaryFn::Log10 => v.log10(),
            UnaryFn::Sqrt => v.sqrt(),
            UnaryFn::Cbrt => v.cbrt(),
            UnaryFn::Abs => v.abs(),
            UnaryFn::Floor => v.floor(),
            UnaryFn::Ceil => v.ceil(),
            // Halves round toward +inf
            UnaryFn::Round => (v + 0.5).floor(),
            // f64::signum maps 0.0 to 1.0
            UnaryFn::Sign => {
                if v == 0.0 || v.is_nan() {
                    v
                } else {
                    v.signum()
                }
            }
        }
    }
}

/// Functions of two arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFn {
    Min,
    Max,
    Pow,
    Atan2,
    Hypot,
}

impl BinaryFn {
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "min" => BinaryFn::Min,
            "max" => BinaryFn::Max,
            "pow" => BinaryFn::Pow,
            "atan2" | "arctan2" => BinaryFn::Atan2,
            "hypot" => BinaryFn::Hypot,
            _ => return None,
        };
        Some(f)
    }

    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            // f64::min/max drop a NaN operand; undefined must stay undefined
            BinaryFn::Min | BinaryFn::Max if a.is_nan() || b.is_nan() => f64::NAN,
            BinaryFn::Min => a.min(b),
            BinaryFn::Max => a.max(b),
            BinaryFn::Pow => a.powf(b),
            BinaryFn::Atan2 => a.atan2(b),
            BinaryFn::Hypot => a.hypot(b),
        }
    }
}

/// A resolved function name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Unary(UnaryFn),
    Binary(BinaryFn),
}

impl Builtin {
    /// Resolve a function name, single-argument functions first
    pub fn from_name(name: &str) -> Option<Self> {
        UnaryFn::from_name(name)
            .map(Builtin::Unary)
            .or_else(|| BinaryFn::from_name(name).map(Builtin::Binary))
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Unary(_) => 1,
            Builtin::Binary(_) => 2,
        }
    }

    /// Apply to already-evaluated arguments. An argument count that doesn't
    /// match the arity yields NaN.
    pub fn apply(self, args: &[f64]) -> f64 {
        match (self, args) {
            (Builtin::Unary(f), [v]) => f.apply(*v),
            (Builtin::Binary(f), [a, b]) => f.apply(*a, *b),
            _ => f64::NAN,
        }
    }
}
