//! Level catalog and scoring
//!
//! Blueprints are immutable data; every play session gets a fresh
//! [`Level`] from [`LevelBlueprint::instantiate`]. The built-in levels are
//! tuned against the simulator's physics (target times come from the model
//! solutions noted on each level), so their numbers shouldn't drift.
//!
//! Blueprints also (de)serialize with serde, so custom catalogs can be
//! loaded from JSON.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Level, Obstacle, Spike, SpikeWheel};

/// Obstacle placement in a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleLayout {
    Spike {
        x: f64,
        y: f64,
    },
    SpikeWheel {
        x: f64,
        y: f64,
        arms: u32,
        arm_length: u32,
        /// Radians per second
        speed: f64,
    },
}

impl ObstacleLayout {
    pub fn build(&self) -> Obstacle {
        match *self {
            ObstacleLayout::Spike { x, y } => Spike::new(x, y).into(),
            ObstacleLayout::SpikeWheel {
                x,
                y,
                arms,
                arm_length,
                speed,
            } => SpikeWheel::new(DVec2::new(x, y), arms, arm_length, speed).into(),
        }
    }
}

/// Per-tick level behaviour in a blueprint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionLayout {
    #[default]
    Static,
    Bobbing { amplitude: f64, frequency: f64 },
}

/// Immutable description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBlueprint {
    pub id: u32,
    pub name: String,
    pub start: DVec2,
    pub goal: DVec2,
    #[serde(default)]
    pub obstacles: Vec<ObstacleLayout>,
    #[serde(default)]
    pub motion: MotionLayout,
    /// Equations the model solution uses
    pub target_equations: u32,
    /// Completion time of the model solution, in seconds
    pub target_time: f64,
}

impl LevelBlueprint {
    /// Create a fresh runtime level
    pub fn instantiate(&self) -> Level {
        let obstacles = self.obstacles.iter().map(ObstacleLayout::build).collect();
        match self.motion {
            MotionLayout::Static => Level::new(self.start, self.goal, obstacles),
            MotionLayout::Bobbing {
                amplitude,
                frequency,
            } => Level::bobbing(self.start, self.goal, obstacles, amplitude, frequency),
        }
    }

    /// Score in [0, 1] for a win. Every extra equation and every second
    /// over the target time costs a third.
    pub fn score(&self, num_equations: usize, elapsed_secs: f64) -> f64 {
        let extra_equations = num_equations as f64 - self.target_equations as f64;
        let overtime = (elapsed_secs - self.target_time).max(0.0);
        (1.0 - extra_equations / 3.0 - overtime / 3.0).clamp(0.0, 1.0)
    }

    /// The built-in level following this one, if any
    pub fn next(&self) -> Option<LevelBlueprint> {
        Self::by_id(self.id + 1)
    }

    pub fn by_id(id: u32) -> Option<LevelBlueprint> {
        Self::builtin().into_iter().find(|l| l.id == id)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a JSON array of blueprints
    pub fn catalog_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The built-in levels, in play order
    pub fn builtin() -> Vec<LevelBlueprint> {
        vec![level_1(), level_2(), level_3(), level_4(), level_5()]
    }
}

fn spike(x: f64, y: f64) -> ObstacleLayout {
    ObstacleLayout::Spike { x, y }
}

// Model solution: 1/3x+1.5
fn level_1() -> LevelBlueprint {
    LevelBlueprint {
        id: 0,
        name: "Level 1".to_string(),
        start: DVec2::new(-6.0, 0.0),
        goal: DVec2::new(6.0, 4.0),
        obstacles: Vec::new(),
        motion: MotionLayout::Static,
        target_equations: 1,
        target_time: 9.0,
    }
}

// Model solution: -cos(x/1.2)*2-1.4
fn level_2() -> LevelBlueprint {
    let obstacles = (0..8)
        .flat_map(|i| {
            let i = i as f64;
            [spike(-4.0, -i), spike(0.0, i), spike(4.0, -i)]
        })
        .collect();

    LevelBlueprint {
        id: 1,
        name: "Level 2".to_string(),
        start: DVec2::new(-7.0, -3.0),
        goal: DVec2::new(7.0, -3.0),
        obstacles,
        motion: MotionLayout::Static,
        target_equations: 1,
        target_time: 12.6,
    }
}

// Model solution: -2.5*e^(-x^2/(2*1.5^2))+1+max(0,x/4)
fn level_3() -> LevelBlueprint {
    let column = (0..8).map(|i| spike(0.0, i as f64));
    let rows = (0..5).flat_map(|i| {
        let i = i as f64;
        [spike(-3.0 - i, 0.0), spike(3.0 + i, 0.0)]
    });

    LevelBlueprint {
        id: 2,
        name: "Level 3".to_string(),
        start: DVec2::new(-6.0, 3.0),
        goal: DVec2::new(6.0, 3.0),
        obstacles: column.chain(rows).collect(),
        motion: MotionLayout::Static,
        target_equations: 1,
        target_time: 9.4,
    }
}

// Model solution: sin(t/2)+max(0,1.7*sin(x/2.15))
fn level_4() -> LevelBlueprint {
    let obstacles = (0..8)
        .flat_map(|i| {
            let i = i as f64;
            let wave = 3.0 * ((i - 3.0) / 7.0 * std::f64::consts::PI).cos();
            [
                spike(-i, 2.0),
                spike(-i, -2.0),
                spike(i + 1.0, 2.0 + wave),
                spike(i + 1.0, -2.0 + wave),
            ]
        })
        .collect();

    LevelBlueprint {
        id: 3,
        name: "Level 4".to_string(),
        start: DVec2::new(-6.0, 0.0),
        goal: DVec2::new(6.0, 0.0),
        obstacles,
        motion: MotionLayout::Bobbing {
            amplitude: 1.5,
            frequency: 0.5,
        },
        target_equations: 2,
        target_time: 8.3,
    }
}

// Model solution: 4sin(t/2)+sin(t/4)+sin(t/6)
fn level_5() -> LevelBlueprint {
    LevelBlueprint {
        id: 4,
        name: "Level 5".to_string(),
        start: DVec2::new(-6.0, 0.0),
        goal: DVec2::new(6.0, 0.0),
        obstacles: vec![ObstacleLayout::SpikeWheel {
            x: 0.0,
            y: 0.0,
            arms: 5,
            arm_length: 5,
            speed: -0.8,
        }],
        motion: MotionLayout::Static,
        target_equations: 1,
        target_time: 7.9,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LevelMotion;

    #[test]
    fn test_builtin_catalog() {
        let levels = LevelBlueprint::builtin();
        assert_eq!(levels.len(), 5);
        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.id, i as u32);
        }
        assert_eq!(levels[1].obstacles.len(), 24);
        assert_eq!(levels[2].obstacles.len(), 18);
        assert_eq!(levels[3].obstacles.len(), 32);
    }

    #[test]
    fn test_next_walks_the_catalog() {
        let mut level = LevelBlueprint::by_id(0);
        let mut names = Vec::new();
        while let Some(l) = level {
            names.push(l.name.clone());
            level = l.next();
        }
        assert_eq!(names, ["Level 1", "Level 2", "Level 3", "Level 4", "Level 5"]);
        assert!(LevelBlueprint::by_id(5).is_none());
    }

    #[test]
    fn test_instantiate() {
        let level = LevelBlueprint::by_id(3).unwrap().instantiate();
        assert_eq!(level.start(), DVec2::new(-6.0, 0.0));
        assert_eq!(level.obstacles().len(), 32);
        assert!(matches!(level.motion(), LevelMotion::Bobbing { .. }));

        let level = LevelBlueprint::by_id(4).unwrap().instantiate();
        assert_eq!(level.obstacles()[0].spikes().len(), 21);
    }

    #[test]
    fn test_score() {
        let level = LevelBlueprint::by_id(0).unwrap();
        assert_eq!(level.score(1, 8.0), 1.0);
        assert!((level.score(2, 8.0) - 2.0 / 3.0).abs() < 1e-12);
        assert!((level.score(1, 10.5) - 0.5).abs() < 1e-12);
        assert_eq!(level.score(5, 30.0), 0.0);
        // Fewer equations than the target can't exceed a perfect score
        assert_eq!(LevelBlueprint::by_id(3).unwrap().score(1, 5.0), 1.0);
    }

    #[test]
    fn test_json_round_trip() {
        let level = LevelBlueprint::by_id(4).unwrap();
        let json = level.to_json().unwrap();
        assert_eq!(LevelBlueprint::from_json(&json).unwrap(), level);
    }

    #[test]
    fn test_custom_level_from_json() {
        let json = r#"[{
            "id": 10,
            "name": "Custom",
            "start": [-5.0, 1.0],
            "goal": [5.0, 1.0],
            "obstacles": [
                { "kind": "spike", "x": 0.0, "y": 2.0 },
                { "kind": "spike_wheel", "x": 2.0, "y": 0.0, "arms": 3, "arm_length": 2, "speed": 1.0 }
            ],
            "motion": { "kind": "bobbing", "amplitude": 1.0, "frequency": 2.0 },
            "target_equations": 1,
            "target_time": 10.0
        }]"#;
        let catalog = LevelBlueprint::catalog_from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);

        let level = catalog[0].instantiate();
        assert_eq!(level.goal(), DVec2::new(5.0, 1.0));
        assert_eq!(level.obstacles().len(), 2);
        assert_eq!(level.obstacles()[1].spikes().len(), 4);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(LevelBlueprint::from_json(r#"{ "id": 1, "name": "x" }"#).is_err());
    }
}
