//! Ball-on-curve contact via golden-section search
//!
//! Placing the ball at `f(x) + r` clips any sloped curve. Instead, take the
//! clearance between the curve and the ball's lower boundary,
//!
//! `h(u) = f(ball_x + u) - (r - sqrt(r² - u²))` for `u` in `[-r, r]`,
//!
//! whose maximum is the lowest the ball's bottom can sit without
//! intersecting the curve. There is no closed form, so the maximum is found
//! with golden-section search using a fixed number of iterations: each tick
//! costs the same number of curve evaluations whatever the user typed.
//!
//! The search assumes `h` is unimodal on the bracket. For curves like
//! `sin(x)` it converges to *a* local maximum, which is accepted.

use crate::expr::{EvalContext, Function};

/// Golden ratio
pub const PHI: f64 = 1.618_033_988_749_895;

/// Absolute tolerance of the located maximum, in level units
pub const TOLERANCE: f64 = 1e-6;

/// Iterations needed to shrink `width` below `tolerance`
pub fn iteration_count(width: f64, tolerance: f64) -> u32 {
    let n = ((width / tolerance).ln() / PHI.ln()).ceil() - 1.0;
    if n.is_finite() && n > 0.0 { n as u32 } else { 0 }
}

/// Contact solver for a disc of fixed radius
#[derive(Debug, Clone, Copy)]
pub struct CurveContact {
    radius: f64,
    iterations: u32,
}

impl CurveContact {
    pub fn new(radius: f64) -> Self {
        Self::with_tolerance(radius, TOLERANCE)
    }

    pub fn with_tolerance(radius: f64, tolerance: f64) -> Self {
        Self {
            radius,
            iterations: iteration_count(radius * 2.0, tolerance),
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Height of the ball's lower boundary above its bottom point, `u`
    /// units from the center horizontally
    #[inline]
    fn ball_curve(&self, u: f64) -> f64 {
        self.radius - (self.radius * self.radius - u * u).sqrt()
    }

    #[inline]
    fn clearance(&self, f: &Function, ctx: &mut EvalContext, ball_x: f64, x: f64) -> f64 {
        f.eval_at(x, ctx) - self.ball_curve(x - ball_x)
    }

    /// The y the ball's center must take at `ball_x` to rest on `f` without
    /// clipping it.
    ///
    /// `ctx.x` is overwritten while probing; `ctx.t` is left untouched.
    pub fn contact_height(&self, f: &Function, ctx: &mut EvalContext, ball_x: f64) -> f64 {
        let mut h = self.radius * 2.0;
        let mut a = ball_x - self.radius;
        let mut b = ball_x + self.radius;

        let mut c = a + h / (PHI * PHI);
        let mut d = a + h / PHI;
        let mut yc = self.clearance(f, ctx, ball_x, c);
        let mut yd = self.clearance(f, ctx, ball_x, d);

        for _ in 0..self.iterations {
            h /= PHI;
            if yc > yd {
                // Maximum lies in [a, d]
                b = d;
                d = c;
                yd = yc;
                c = a + h / (PHI * PHI);
                yc = self.clearance(f, ctx, ball_x, c);
            } else {
                // Maximum lies in [c, b]
                a = c;
                c = d;
                yc = yd;
                d = a + h / PHI;
                yd = self.clearance(f, ctx, ball_x, d);
            }
        }

        let x = if yc > yd { (a + d) / 2.0 } else { (c + b) / 2.0 };
        self.clearance(f, ctx, ball_x, x) + self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;
    use crate::expr::parse;
    use proptest::prelude::*;

    fn function(src: &str) -> Function {
        parse(src, "").unwrap().unwrap()
    }

    #[test]
    fn test_iteration_count() {
        // ceil(ln(0.8 / 1e-6) / ln(phi)) - 1
        assert_eq!(iteration_count(0.8, 1e-6), 28);
        assert_eq!(iteration_count(1e-7, 1e-6), 0);
    }

    #[test]
    fn test_flat_curve() {
        let solver = CurveContact::new(BALL_RADIUS);
        let f = function("2");
        let mut ctx = EvalContext::new(0.0);
        let y = solver.contact_height(&f, &mut ctx, 1.0);
        assert!((y - (2.0 + BALL_RADIUS)).abs() < 1e-4);
    }

    #[test]
    fn test_slope_lifts_ball_above_naive_height() {
        // On y = x the tangent point is off-center, so the ball must sit
        // higher than f(ball_x) + r; exactly r * sqrt(2) above the line.
        let solver = CurveContact::new(BALL_RADIUS);
        let f = function("x");
        let mut ctx = EvalContext::new(0.0);
        let y = solver.contact_height(&f, &mut ctx, 0.0);
        let expected = BALL_RADIUS * 2f64.sqrt();
        assert!((y - expected).abs() < 1e-4, "got {y}, expected {expected}");
    }

    #[test]
    fn test_peak_under_ball() {
        // A narrow spike under the center holds the ball at its tip
        let solver = CurveContact::new(BALL_RADIUS);
        let f = function("1-10abs(x)");
        let mut ctx = EvalContext::new(0.0);
        let y = solver.contact_height(&f, &mut ctx, 0.0);
        assert!(y > 1.0 + BALL_RADIUS - 1e-3);
        assert!(y < 1.0 + BALL_RADIUS + 1e-3);
    }

    #[test]
    fn test_time_is_preserved() {
        let solver = CurveContact::new(BALL_RADIUS);
        let f = function("t");
        let mut ctx = EvalContext::new(3.0);
        let y = solver.contact_height(&f, &mut ctx, -4.0);
        assert_eq!(ctx.t, 3.0);
        assert!((y - (3.0 + BALL_RADIUS)).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_constant_curve_rests_at_c_plus_r(c in -8.0f64..8.0, ball_x in -8.0f64..8.0) {
            let solver = CurveContact::new(BALL_RADIUS);
            let f = Function::unconditional(crate::expr::Expr::Constant(c));
            let mut ctx = EvalContext::new(0.0);
            let y = solver.contact_height(&f, &mut ctx, ball_x);
            prop_assert!((y - (c + BALL_RADIUS)).abs() < 1e-4);
        }
    }
}
