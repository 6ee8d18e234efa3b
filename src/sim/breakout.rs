//! Breakout simulation
//!
//! One paddle along the bottom, a fixed grid of bricks near the top. Losing
//! the ball just re-serves it; clearing the board does not end the game.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::Simulation;
use super::collision::{WallSet, bounce_off_walls, first_hit, within_paddle};
use super::geometry::Rect;
use super::serve::breakout_serve;
use crate::clamp_to_unit_square;
use crate::consts::*;
use crate::settings::{ConfigError, ensure_in_range, ensure_ordered};

/// Breakout tuning and brick layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    /// Half the paddle width; a hit needs |ball.x - paddle| below this
    pub paddle_half_width: f32,
    /// Ball y from which the paddle can return it
    pub paddle_threshold: f32,
    /// Clamp the ball into the unit square after integrating
    pub clamp_ball_position: bool,
    /// Serve speed on both axes
    pub serve_speed: f32,
    pub rows: u32,
    pub cols: u32,
    /// Brick half-width and half-height
    pub brick_half_extents: Vec2,
    /// Center y of the first row
    pub brick_top: f32,
    /// Vertical distance between row centers
    pub brick_row_spacing: f32,
    /// Allowed range for the paddle
    pub paddle_min: f32,
    pub paddle_max: f32,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            paddle_half_width: 0.1,
            paddle_threshold: 0.93,
            clamp_ball_position: true,
            serve_speed: SERVE_SPEED,
            rows: 4,
            cols: 6,
            brick_half_extents: Vec2::new(0.08, 0.025),
            brick_top: 0.1,
            brick_row_spacing: 0.04,
            paddle_min: PADDLE_MIN,
            paddle_max: PADDLE_MAX,
        }
    }
}

impl BreakoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_in_range("breakout.paddle_half_width", self.paddle_half_width, 0.01, 0.5)?;
        ensure_in_range("breakout.paddle_threshold", self.paddle_threshold, 0.5, 1.0)?;
        ensure_in_range("breakout.serve_speed", self.serve_speed, 0.0005, 0.05)?;
        ensure_in_range("breakout.brick_half_extents.x", self.brick_half_extents.x, 0.001, 0.5)?;
        ensure_in_range("breakout.brick_half_extents.y", self.brick_half_extents.y, 0.001, 0.5)?;
        ensure_in_range("breakout.brick_top", self.brick_top, 0.0, 1.0)?;
        ensure_in_range("breakout.brick_row_spacing", self.brick_row_spacing, 0.0, 1.0)?;
        ensure_ordered("breakout.paddle_range", self.paddle_min, self.paddle_max)?;
        ensure_in_range("breakout.paddle_min", self.paddle_min, 0.0, 1.0)?;
        ensure_in_range("breakout.paddle_max", self.paddle_max, 0.0, 1.0)?;
        if self.rows == 0 || self.cols == 0 || self.rows > 16 || self.cols > 16 {
            return Err(ConfigError::BrickGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Center of the brick at (row, col)
    pub fn brick_center(&self, row: u32, col: u32) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) / self.cols as f32,
            self.brick_top + row as f32 * self.brick_row_spacing,
        )
    }

    /// Hit box of the brick at (row, col)
    pub fn brick_bounds(&self, row: u32, col: u32) -> Rect {
        Rect::new(self.brick_center(row, col), self.brick_half_extents)
    }

    /// Full grid in row-major order, all active
    pub fn build_bricks(&self) -> Vec<Brick> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| Brick::new(row, col)))
            .collect()
    }
}

/// A destructible brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    pub row: u32,
    pub col: u32,
    /// Cleared on the first hit, never restored
    pub active: bool,
}

impl Brick {
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            active: true,
        }
    }
}

/// Complete Breakout state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutState {
    pub ball: Vec2,
    /// Step per tick
    pub velocity: Vec2,
    pub paddle_x: f32,
    /// Row-major, fixed length
    pub bricks: Vec<Brick>,
    /// One point per brick
    pub score: u32,
    /// Balls lost past the paddle (no penalty)
    pub misses: u32,
    pub time_ticks: u64,
}

impl BreakoutState {
    pub fn new(config: &BreakoutConfig) -> Self {
        Self {
            ball: Vec2::new(SERVE_POINT.0, SERVE_POINT.1),
            velocity: Vec2::new(config.serve_speed, -config.serve_speed),
            paddle_x: 0.5,
            bricks: config.build_bricks(),
            score: 0,
            misses: 0,
            time_ticks: 0,
        }
    }

    pub fn active_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn brick(&self, row: u32, col: u32) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.row == row && b.col == col)
    }
}

/// Things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakoutEvent {
    WallBounce,
    PaddleHit,
    Missed,
    BrickDestroyed { row: u32, col: u32 },
    /// The last active brick just fell. The game keeps going.
    BoardCleared,
}

/// Breakout game session
pub struct BreakoutSimulation<R: Rng = Pcg32> {
    config: BreakoutConfig,
    state: BreakoutState,
    rng: R,
}

impl BreakoutSimulation<Pcg32> {
    /// Start a fresh game with a seeded generator
    pub fn new(config: BreakoutConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> BreakoutSimulation<R> {
    /// Start a fresh game with the given generator
    pub fn with_rng(config: BreakoutConfig, rng: R) -> Result<Self, ConfigError> {
        let state = BreakoutState::new(&config);
        Self::from_state(config, state, rng)
    }

    /// Resume from an existing state. Fails if `config` does not validate.
    pub fn from_state(
        config: BreakoutConfig,
        state: BreakoutState,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, state, rng })
    }

    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }

    pub fn state(&self) -> &BreakoutState {
        &self.state
    }

    pub fn snapshot(&self) -> BreakoutState {
        self.state.clone()
    }

    pub fn ball(&self) -> Vec2 {
        self.state.ball
    }

    pub fn paddle_x(&self) -> f32 {
        self.state.paddle_x
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.state.bricks
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Move the paddle, clamped to the configured range
    pub fn set_paddle_target(&mut self, x: f32) {
        if x.is_nan() {
            log::warn!("Ignoring NaN paddle target");
            return;
        }
        self.state.paddle_x = x.clamp(self.config.paddle_min, self.config.paddle_max);
    }

    /// Advance one fixed step
    pub fn tick(&mut self) -> Vec<BreakoutEvent> {
        let mut events = Vec::new();
        let cfg = self.config;
        let state = &mut self.state;

        state.time_ticks += 1;
        state.ball += state.velocity;

        let bounce = bounce_off_walls(state.ball, state.velocity, WallSet::ALL_BUT_BOTTOM);
        if bounce.hit {
            state.velocity = bounce.velocity;
            events.push(BreakoutEvent::WallBounce);
        }

        if state.ball.y >= cfg.paddle_threshold
            && state.velocity.y > 0.0
            && within_paddle(state.ball.x, state.paddle_x, cfg.paddle_half_width)
        {
            state.velocity.y = -state.velocity.y;
            events.push(BreakoutEvent::PaddleHit);
        } else if state.ball.y > 1.0 {
            state.misses += 1;
            state.ball = Vec2::new(SERVE_POINT.0, SERVE_POINT.1);
            state.velocity = breakout_serve(&mut self.rng, cfg.serve_speed);
            events.push(BreakoutEvent::Missed);
            log::debug!("Ball lost ({} misses, score {})", state.misses, state.score);
        }

        if cfg.clamp_ball_position {
            state.ball = clamp_to_unit_square(state.ball);
        }

        // Row-major scan, first active brick wins, one per tick
        let hit = first_hit(
            state.ball,
            &state.bricks,
            |b| b.active,
            |b| cfg.brick_bounds(b.row, b.col),
        );
        if let Some(index) = hit {
            let brick = &mut state.bricks[index];
            brick.active = false;
            state.velocity.y = -state.velocity.y;
            state.score += 1;
            events.push(BreakoutEvent::BrickDestroyed {
                row: brick.row,
                col: brick.col,
            });

            if state.bricks.iter().all(|b| !b.active) {
                events.push(BreakoutEvent::BoardCleared);
                log::info!(
                    "Board cleared: score {} after {} ticks",
                    state.score,
                    state.time_ticks
                );
            }
        }

        events
    }
}

impl<R: Rng> Simulation for BreakoutSimulation<R> {
    type Event = BreakoutEvent;
    type Snapshot = BreakoutState;

    fn tick(&mut self) -> Vec<BreakoutEvent> {
        BreakoutSimulation::tick(self)
    }

    fn set_target(&mut self, target: f32) {
        self.set_paddle_target(target);
    }

    fn snapshot(&self) -> BreakoutState {
        BreakoutSimulation::snapshot(self)
    }

    fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }

    fn autopilot_target(&self) -> f32 {
        self.state.ball.x
    }
}
