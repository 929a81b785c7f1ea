//! Level hazards
//!
//! Every hazard is built from spikes: touching one ends the round. Some
//! obstacles move, always as a pure function of elapsed time.

use glam::DVec2;

use super::state::Ball;
use crate::consts::{BALL_RADIUS, SPIKE_RADIUS};

/// A single static hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike {
    pub position: DVec2,
}

impl Spike {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
        }
    }

    /// True if the ball overlaps the spike
    pub fn would_kill(&self, ball: &Ball) -> bool {
        let reach = SPIKE_RADIUS + BALL_RADIUS;
        self.position.distance_squared(ball.pos) < reach * reach
    }
}

/// Spikes laid out on rotating spokes around a center spike
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeWheel {
    center: DVec2,
    arms: u32,
    arm_length: u32,
    /// Radians per second
    speed: f64,
    /// Center spike first, then `arm_length - 1` spikes per arm
    spikes: Vec<Spike>,
}

impl SpikeWheel {
    pub fn new(center: DVec2, arms: u32, arm_length: u32, speed: f64) -> Self {
        let per_arm = arm_length.saturating_sub(1) as usize;
        let count = arms as usize * per_arm + 1;
        let mut wheel = Self {
            center,
            arms,
            arm_length,
            speed,
            spikes: vec![Spike { position: center }; count],
        };
        wheel.update(0.0);
        wheel
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn spikes(&self) -> &[Spike] {
        &self.spikes
    }

    /// Move the whole wheel, keeping its current rotation
    pub fn set_center(&mut self, center: DVec2) {
        let delta = center - self.center;
        self.center = center;
        for spike in &mut self.spikes {
            spike.position += delta;
        }
    }

    /// Place the spokes for the given time
    pub fn update(&mut self, time_secs: f64) {
        let per_arm = self.arm_length.saturating_sub(1);
        let step = std::f64::consts::TAU / self.arms.max(1) as f64;
        let mut angle = time_secs * self.speed;

        let (hub, spokes) = match self.spikes.split_first_mut() {
            Some(split) => split,
            None => return,
        };
        hub.position = self.center;

        let mut spokes = spokes.iter_mut();
        for _ in 0..self.arms {
            let dir = DVec2::from_angle(angle);
            for r in 1..=per_arm {
                if let Some(spike) = spokes.next() {
                    spike.position = self.center + dir * r as f64;
                }
            }
            angle += step;
        }
    }

    pub fn would_kill(&self, ball: &Ball) -> bool {
        self.spikes.iter().any(|s| s.would_kill(ball))
    }
}

/// Any hazard placed in a level
#[derive(Debug, Clone, PartialEq)]
pub enum Obstacle {
    Spike(Spike),
    SpikeWheel(SpikeWheel),
}

impl Obstacle {
    pub fn would_kill(&self, ball: &Ball) -> bool {
        match self {
            Obstacle::Spike(spike) => spike.would_kill(ball),
            Obstacle::SpikeWheel(wheel) => wheel.would_kill(ball),
        }
    }

    /// Per-tick time-based update
    pub fn update(&mut self, time_secs: f64) {
        match self {
            Obstacle::Spike(_) => {}
            Obstacle::SpikeWheel(wheel) => wheel.update(time_secs),
        }
    }

    /// Reference point used when a level moves obstacles around
    pub fn anchor(&self) -> DVec2 {
        match self {
            Obstacle::Spike(spike) => spike.position,
            Obstacle::SpikeWheel(wheel) => wheel.center(),
        }
    }

    pub fn set_anchor(&mut self, pos: DVec2) {
        match self {
            Obstacle::Spike(spike) => spike.position = pos,
            Obstacle::SpikeWheel(wheel) => wheel.set_center(pos),
        }
    }

    /// All spikes making up this obstacle (for drawing)
    pub fn spikes(&self) -> &[Spike] {
        match self {
            Obstacle::Spike(spike) => std::slice::from_ref(spike),
            Obstacle::SpikeWheel(wheel) => wheel.spikes(),
        }
    }
}

impl From<Spike> for Obstacle {
    fn from(spike: Spike) -> Self {
        Obstacle::Spike(spike)
    }
}

impl From<SpikeWheel> for Obstacle {
    fn from(wheel: SpikeWheel) -> Self {
        Obstacle::SpikeWheel(wheel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn ball_at(x: f64, y: f64) -> Ball {
        Ball::new(DVec2::new(x, y - BALL_RADIUS))
    }

    #[test]
    fn test_spike_kill_radius() {
        let spike = Spike::new(0.0, 0.0);
        let reach = SPIKE_RADIUS + BALL_RADIUS;
        assert!(spike.would_kill(&ball_at(0.0, 0.0)));
        assert!(spike.would_kill(&ball_at(reach - 0.01, 0.0)));
        assert!(!spike.would_kill(&ball_at(reach + 0.01, 0.0)));
        assert!(!spike.would_kill(&ball_at(0.0, -reach - 0.01)));
    }

    #[test]
    fn test_wheel_layout() {
        let wheel = SpikeWheel::new(DVec2::new(1.0, 2.0), 5, 5, -0.8);
        // Hub plus 4 spikes on each of 5 arms
        assert_eq!(wheel.spikes().len(), 21);
        assert_eq!(wheel.spikes()[0].position, DVec2::new(1.0, 2.0));
        // First arm points along +x at t = 0
        let tip = wheel.spikes()[4].position;
        assert!((tip - DVec2::new(5.0, 2.0)).length() < 1e-9);
    }

    #[test]
    fn test_wheel_rotates_with_time() {
        let mut wheel = SpikeWheel::new(DVec2::ZERO, 4, 3, 1.0);
        wheel.update(FRAC_PI_2);
        // After a quarter turn the first arm points along +y
        let p = wheel.spikes()[2].position;
        assert!((p - DVec2::new(0.0, 2.0)).length() < 1e-9);

        assert!(wheel.would_kill(&ball_at(0.0, 2.0)));
        assert!(!wheel.would_kill(&ball_at(1.5, 1.5)));
    }

    #[test]
    fn test_wheel_set_center_moves_spikes() {
        let mut wheel = SpikeWheel::new(DVec2::ZERO, 2, 2, 0.0);
        wheel.set_center(DVec2::new(0.0, 3.0));
        assert_eq!(wheel.spikes()[0].position, DVec2::new(0.0, 3.0));
        assert!((wheel.spikes()[1].position - DVec2::new(1.0, 3.0)).length() < 1e-9);
    }

    #[test]
    fn test_obstacle_anchor() {
        let mut obstacle = Obstacle::from(Spike::new(1.0, 1.0));
        obstacle.set_anchor(DVec2::new(2.0, -1.0));
        assert_eq!(obstacle.anchor(), DVec2::new(2.0, -1.0));
        assert_eq!(obstacle.spikes().len(), 1);
    }
}
