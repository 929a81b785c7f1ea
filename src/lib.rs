//! Rolling Ball - a puzzle game played with equations
//!
//! The player types functions of `x` and `t`; their graphs form the terrain
//! a ball rolls over on its way to the flag.
//!
//! Core modules:
//! - `expr`: Expression and condition parsing, constant folding, evaluation
//! - `sim`: Deterministic simulation (graphs, ball physics, obstacles)
//! - `levels`: Level blueprints, the built-in catalog and scoring

pub mod expr;
pub mod levels;
pub mod sim;

pub use expr::{Function, SyntaxError, parse};
pub use levels::LevelBlueprint;
pub use sim::{RoundEnd, Simulator};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Visible level extent is [-8, 8] on both axes
    pub const LEVEL_WIDTH: f64 = 8.0;
    pub const LEVEL_HEIGHT: f64 = 8.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 0.4;
    /// Horizontal speed on flat ground (units/s)
    pub const BALL_SPEED: f64 = 1.5;

    /// Fall distance per tick per second since the last contact
    pub const GRAVITY: f64 = 0.67;
    /// Clamp on the time since last contact used for falling
    pub const MIN_FALL_TIME: f64 = 0.1;
    pub const MAX_FALL_TIME: f64 = 0.5;

    /// Graphs whose value at the ball's x is at most this far above the
    /// ball's center still count as below it
    pub const CONTACT_EPSILON: f64 = 0.005;
    /// Finite difference width for slope estimates
    pub const SLOPE_DX: f64 = 0.01;

    /// Side length of the goal flag's bounding box
    pub const FLAG_SIZE: f64 = 1.0;
    pub const SPIKE_RADIUS: f64 = 0.35;
}
