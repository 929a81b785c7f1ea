//! Fixed timestep simulation tick
//!
//! Advances the ball across the player's graphs and decides when a round
//! ends.

use super::collision::CurveContact;
use super::graphs::{GraphId, GraphStorage};
use super::state::{Ball, Level};
use crate::consts::*;
use crate::expr::{EvalContext, Function};

/// Whether the ball is currently rolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Stopped,
    Running,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundEnd {
    /// True if the ball reached the flag
    pub won: bool,
    /// Simulated seconds from start to the end of the round
    pub elapsed_secs: f64,
}

/// Called with `(won, elapsed_secs)` whenever a round ends
pub type EndCallback = Box<dyn FnMut(bool, f64)>;

/// Ball simulation for one level instance
pub struct Simulator {
    level: Level,
    graphs: GraphStorage,
    ball: Ball,
    phase: Phase,
    time_secs: f64,
    contact: CurveContact,
    on_end: EndCallback,
}

impl Simulator {
    pub fn new(level: Level, on_end: impl FnMut(bool, f64) + 'static) -> Self {
        let ball = Ball::new(level.start());
        Self {
            level,
            graphs: GraphStorage::new(),
            ball,
            phase: Phase::Stopped,
            time_secs: 0.0,
            contact: CurveContact::new(BALL_RADIUS),
            on_end: Box::new(on_end),
        }
    }

    pub fn add_graph(&mut self, function: Function) -> GraphId {
        self.graphs.add(function)
    }

    pub fn remove_graph(&mut self, id: GraphId) -> bool {
        self.graphs.remove(id)
    }

    /// Replace an edited graph's function, keeping its id and color
    pub fn replace_graph(&mut self, id: GraphId, function: Function) -> bool {
        self.graphs.replace(id, function)
    }

    pub fn graphs(&self) -> &GraphStorage {
        &self.graphs
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// The ball. Valid even while stopped (resting on the start point).
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ball_position(&self) -> (f64, f64) {
        self.ball.pos.into()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Seconds since the round started, or 0 while stopped
    pub fn elapsed_seconds(&self) -> f64 {
        match self.phase {
            Phase::Running => self.time_secs,
            Phase::Stopped => 0.0,
        }
    }

    /// Start or stop the round. The ball is reset either way.
    pub fn toggle_playing(&mut self) {
        self.phase = match self.phase {
            Phase::Stopped => {
                self.time_secs = 0.0;
                log::info!("Round started with {} graph(s)", self.graphs.len());
                Phase::Running
            }
            Phase::Running => {
                log::info!("Round stopped at {:.2}s", self.time_secs);
                Phase::Stopped
            }
        };
        self.ball.reset(self.level.start());
    }

    /// Advance one tick. Returns the outcome if the round ended this tick.
    pub fn update(&mut self) -> Option<RoundEnd> {
        if self.phase != Phase::Running {
            return None;
        }

        let time = self.time_secs;
        let dt = SIM_DT;

        self.level.on_update(time, dt);
        self.move_ball(time, dt);

        let won = if self.should_die() {
            Some(false)
        } else if self.touches_flag() {
            Some(true)
        } else {
            None
        };

        let end = won.map(|won| {
            if won {
                log::info!("Flag reached after {:.2}s", time);
            } else {
                log::info!(
                    "Ball lost at ({:.2}, {:.2}) after {:.2}s",
                    self.ball.pos.x,
                    self.ball.pos.y,
                    time
                );
            }
            self.toggle_playing();
            (self.on_end)(won, time);
            RoundEnd {
                won,
                elapsed_secs: time,
            }
        });

        self.time_secs += dt;
        end
    }

    fn move_ball(&mut self, time: f64, dt: f64) {
        let mut ctx = EvalContext::new(time);
        let ball_x = self.ball.pos.x;
        let ball_y = self.ball.pos.y;

        // Work with the ball's bottom point
        let mut next_y = ball_y - self.gravity_drop(time) - BALL_RADIUS;
        let next_x = ball_x + self.horizontal_step(dt, &mut ctx);

        let mut supporting = None;
        for graph in self.graphs.iter() {
            let f = graph.function();
            let y = f.eval_at(ball_x, &mut ctx);
            if y.is_nan() || y - CONTACT_EPSILON > ball_y || !f.can_eval(&ctx) {
                continue;
            }

            let contact = self.contact.contact_height(f, &mut ctx, ball_x) - BALL_RADIUS;
            if next_y < contact {
                next_y = contact;
                supporting = Some(graph.id());
                self.ball.last_contact = time;
            }
        }

        self.ball.pos.x = next_x;
        self.ball.pos.y = next_y + BALL_RADIUS;
        self.ball.supporting = supporting;
    }

    /// Vertical fall this tick. Contact resets the fall time; it is
    /// clamped so falls neither start instantly nor run away.
    fn gravity_drop(&self, time: f64) -> f64 {
        (time - self.ball.last_contact).clamp(MIN_FALL_TIME, MAX_FALL_TIME) * GRAVITY
    }

    /// Horizontal travel this tick. Climbing slows the ball down, descending
    /// doesn't speed it up.
    fn horizontal_step(&self, dt: f64, ctx: &mut EvalContext) -> f64 {
        let Some(graph) = self.ball.supporting.and_then(|id| self.graphs.get(id)) else {
            return BALL_SPEED * dt;
        };

        // Counting downhill too would make any curve that starts and ends
        // at the same height exactly as fast as a flat line.
        let slope = approx_slope(graph.function(), self.ball.pos.x, ctx);
        (BALL_SPEED - 0.5 * slope.max(0.0)) * dt
    }

    fn should_die(&self) -> bool {
        let y = self.ball.pos.y;
        if !(-LEVEL_HEIGHT - 1.0..=LEVEL_HEIGHT + 1.0).contains(&y) {
            return true;
        }
        self.level.would_kill(&self.ball)
    }

    fn touches_flag(&self) -> bool {
        let goal = self.level.goal();
        let pos = self.ball.pos;
        let r = BALL_RADIUS;
        goal.x <= pos.x + r
            && pos.x - r <= goal.x + FLAG_SIZE
            && goal.y <= pos.y + r
            && pos.y - r <= goal.y + FLAG_SIZE
    }
}

/// Symmetric finite-difference slope of `f` at `x`
fn approx_slope(f: &Function, x: f64, ctx: &mut EvalContext) -> f64 {
    let y1 = f.eval_at(x - SLOPE_DX / 2.0, ctx);
    let y2 = f.eval_at(x + SLOPE_DX / 2.0, ctx);
    (y2 - y1) / SLOPE_DX
}
