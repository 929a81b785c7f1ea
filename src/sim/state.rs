//! Simulation state: the ball and the running level

use glam::DVec2;

use super::graphs::GraphId;
use super::obstacle::Obstacle;
use crate::consts::BALL_RADIUS;

/// The ball. Mostly an (x, y) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Center position in level units
    pub pos: DVec2,
    /// Graph the ball rolled on during the last tick
    pub supporting: Option<GraphId>,
    /// Simulation time of the last curve contact
    pub last_contact: f64,
}

impl Ball {
    /// A ball resting on `start`
    pub fn new(start: DVec2) -> Self {
        let mut ball = Self {
            pos: DVec2::ZERO,
            supporting: None,
            last_contact: 0.0,
        };
        ball.reset(start);
        ball
    }

    /// Put the ball back on the start point
    pub fn reset(&mut self, start: DVec2) {
        self.pos = DVec2::new(start.x, start.y + BALL_RADIUS);
        self.supporting = None;
        self.last_contact = 0.0;
    }
}

/// Per-tick level logic, run before the ball moves
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LevelMotion {
    /// Obstacles update themselves
    #[default]
    Static,
    /// All obstacles bob vertically around their initial anchors by
    /// `sin(t * frequency) * amplitude`
    Bobbing {
        amplitude: f64,
        frequency: f64,
        base: Vec<DVec2>,
    },
}

/// Runtime state of a level. Created fresh for each play session from a
/// [`crate::levels::LevelBlueprint`].
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    start: DVec2,
    goal: DVec2,
    obstacles: Vec<Obstacle>,
    motion: LevelMotion,
}

impl Level {
    pub fn new(start: DVec2, goal: DVec2, obstacles: Vec<Obstacle>) -> Self {
        Self {
            start,
            goal,
            obstacles,
            motion: LevelMotion::Static,
        }
    }

    /// A level whose obstacles bob up and down together
    pub fn bobbing(
        start: DVec2,
        goal: DVec2,
        obstacles: Vec<Obstacle>,
        amplitude: f64,
        frequency: f64,
    ) -> Self {
        let base = obstacles.iter().map(Obstacle::anchor).collect();
        Self {
            start,
            goal,
            obstacles,
            motion: LevelMotion::Bobbing {
                amplitude,
                frequency,
                base,
            },
        }
    }

    /// Where the ball spawns (its bottom point)
    pub fn start(&self) -> DVec2 {
        self.start
    }

    /// Lower-left corner of the flag
    pub fn goal(&self) -> DVec2 {
        self.goal
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn motion(&self) -> &LevelMotion {
        &self.motion
    }

    /// Advance time-dependent geometry
    pub fn on_update(&mut self, time_secs: f64, _dt: f64) {
        match &self.motion {
            LevelMotion::Static => {
                for obstacle in &mut self.obstacles {
                    obstacle.update(time_secs);
                }
            }
            LevelMotion::Bobbing {
                amplitude,
                frequency,
                base,
            } => {
                let offset = DVec2::new(0.0, (time_secs * frequency).sin() * amplitude);
                for (obstacle, anchor) in self.obstacles.iter_mut().zip(base) {
                    obstacle.set_anchor(*anchor + offset);
                }
            }
        }
    }

    /// True if any obstacle overlaps the ball
    pub fn would_kill(&self, ball: &Ball) -> bool {
        self.obstacles.iter().any(|o| o.would_kill(ball))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Spike, SpikeWheel};

    #[test]
    fn test_ball_reset() {
        let mut ball = Ball::new(DVec2::new(-6.0, 0.0));
        assert_eq!(ball.pos, DVec2::new(-6.0, BALL_RADIUS));

        ball.pos = DVec2::new(3.0, 3.0);
        ball.last_contact = 2.0;
        ball.supporting = Some(GraphId(1));
        ball.reset(DVec2::new(1.0, 1.0));
        assert_eq!(ball.pos, DVec2::new(1.0, 1.0 + BALL_RADIUS));
        assert_eq!(ball.last_contact, 0.0);
        assert_eq!(ball.supporting, None);
    }

    #[test]
    fn test_bobbing_moves_obstacles() {
        let spikes = vec![Spike::new(0.0, 2.0).into(), Spike::new(1.0, -2.0).into()];
        let mut level = Level::bobbing(DVec2::ZERO, DVec2::X, spikes, 1.5, 0.5);

        let t = std::f64::consts::PI; // sin(pi * 0.5) = 1
        level.on_update(t, 1.0 / 60.0);
        assert!((level.obstacles()[0].anchor() - DVec2::new(0.0, 3.5)).length() < 1e-9);
        assert!((level.obstacles()[1].anchor() - DVec2::new(1.0, -0.5)).length() < 1e-9);

        level.on_update(0.0, 1.0 / 60.0);
        assert_eq!(level.obstacles()[0].anchor(), DVec2::new(0.0, 2.0));
    }

    #[test]
    fn test_static_level_updates_wheels() {
        let wheel = SpikeWheel::new(DVec2::ZERO, 1, 2, 1.0);
        let mut level = Level::new(DVec2::ZERO, DVec2::X, vec![wheel.into()]);
        level.on_update(std::f64::consts::PI, 1.0 / 60.0);
        let arm = level.obstacles()[0].spikes()[1].position;
        assert!((arm - DVec2::new(-1.0, 0.0)).length() < 1e-9);
    }
}
