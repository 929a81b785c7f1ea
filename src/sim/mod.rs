//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Obstacle motion is a function of elapsed time only
//! - Stable iteration order (graph registration order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod graphs;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use collision::CurveContact;
pub use graphs::{Graph, GraphId, GraphStorage, Rgb, color_for};
pub use obstacle::{Obstacle, Spike, SpikeWheel};
pub use state::{Ball, Level, LevelMotion};
pub use tick::{EndCallback, Phase, RoundEnd, Simulator};
