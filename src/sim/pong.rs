//! Pong simulation
//!
//! The player's paddle sits on the right edge, the bot's on the left. A ball
//! leaving through the right goal line scores for the bot, through the left
//! for the player. First to `win_score` wins and the simulation goes terminal.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::Simulation;
use super::collision::{WallSet, bounce_off_walls, within_paddle};
use super::serve::pong_serve;
use crate::consts::*;
use crate::settings::{ConfigError, ensure_in_range, ensure_ordered};
use crate::{clamp_to_unit_square, clamp_unit};

/// One of the two paddles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Human-controlled, right edge
    Player,
    /// AI-controlled, left edge
    Bot,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Bot,
            Side::Bot => Side::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Bot => "Bot",
        }
    }

    /// Horizontal direction pointing at this side's goal line
    fn direction(self) -> f32 {
        match self {
            Side::Player => 1.0,
            Side::Bot => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the bot paddle chases the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BotFollowMode {
    /// Close a fixed fraction of the gap every tick
    Proportional { gain: f32 },
    /// Move at most `step` toward the ball every tick
    FixedStep { step: f32 },
}

impl BotFollowMode {
    /// Next bot position given the current one and the ball height
    pub fn next(&self, bot_y: f32, target_y: f32) -> f32 {
        let gap = target_y - bot_y;
        match *self {
            BotFollowMode::Proportional { gain } => bot_y + gap * gain,
            BotFollowMode::FixedStep { step } => bot_y + gap.clamp(-step, step),
        }
    }
}

impl Default for BotFollowMode {
    fn default() -> Self {
        BotFollowMode::Proportional { gain: 0.04 }
    }
}

/// Pong tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    /// Half the paddle height; a hit needs |ball.y - paddle| below this
    pub paddle_half_height: f32,
    /// Velocity multiplier applied on every paddle hit
    pub speed_ramp_factor: f32,
    /// Ceiling on ball speed after ramping
    pub max_speed: f32,
    /// Bot paddle strategy
    pub bot_follow: BotFollowMode,
    /// Clamp the ball into the unit square at the end of each tick
    pub clamp_ball_position: bool,
    /// Ball x at which the player paddle is reached
    pub player_threshold: f32,
    /// Ball x at which the bot paddle is reached
    pub bot_threshold: f32,
    /// Horizontal serve speed
    pub serve_speed: f32,
    /// First side to this many points wins
    pub win_score: u32,
    /// Allowed range for the player paddle
    pub player_min: f32,
    pub player_max: f32,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            paddle_half_height: 0.1,
            speed_ramp_factor: 1.05,
            max_speed: 0.02,
            bot_follow: BotFollowMode::default(),
            clamp_ball_position: true,
            player_threshold: 0.97,
            bot_threshold: 0.03,
            serve_speed: SERVE_SPEED,
            win_score: 10,
            player_min: PADDLE_MIN,
            player_max: PADDLE_MAX,
        }
    }
}

impl PongConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_in_range("pong.paddle_half_height", self.paddle_half_height, 0.01, 0.5)?;
        ensure_in_range("pong.speed_ramp_factor", self.speed_ramp_factor, 1.0, 2.0)?;
        ensure_in_range("pong.serve_speed", self.serve_speed, 0.0005, 0.05)?;
        ensure_in_range("pong.max_speed", self.max_speed, self.serve_speed, 0.2)?;
        ensure_in_range("pong.player_threshold", self.player_threshold, 0.5, 1.0)?;
        ensure_in_range("pong.bot_threshold", self.bot_threshold, 0.0, 0.5)?;
        ensure_ordered("pong.player_range", self.player_min, self.player_max)?;
        ensure_in_range("pong.player_min", self.player_min, 0.0, 1.0)?;
        ensure_in_range("pong.player_max", self.player_max, 0.0, 1.0)?;
        match self.bot_follow {
            BotFollowMode::Proportional { gain } => {
                ensure_in_range("pong.bot_follow.gain", gain, 0.001, 1.0)?
            }
            BotFollowMode::FixedStep { step } => {
                ensure_in_range("pong.bot_follow.step", step, 0.0001, 0.1)?
            }
        }
        if self.win_score == 0 {
            return Err(ConfigError::ZeroWinScore);
        }
        Ok(())
    }
}

/// Complete Pong state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongState {
    pub ball: Vec2,
    /// Step per tick
    pub velocity: Vec2,
    pub player_y: f32,
    pub bot_y: f32,
    pub player_score: u32,
    pub bot_score: u32,
    /// Set once; the game is over from then on
    pub winner: Option<Side>,
    /// Ticks applied so far (terminal ticks are not counted)
    pub time_ticks: u64,
}

impl Default for PongState {
    fn default() -> Self {
        Self::new(&PongConfig::default())
    }
}

impl PongState {
    /// Opening position: ball at the serve point heading toward the bot
    pub fn new(config: &PongConfig) -> Self {
        Self {
            ball: Vec2::new(SERVE_POINT.0, SERVE_POINT.1),
            velocity: Vec2::new(-config.serve_speed, config.serve_speed),
            player_y: 0.5,
            bot_y: 0.5,
            player_score: 0,
            bot_score: 0,
            winner: None,
            time_ticks: 0,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Bot => self.bot_score,
        }
    }
}

/// Things that happened during a tick, for haptics and sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PongEvent {
    WallBounce,
    PaddleHit(Side),
    Scored(Side),
    Won(Side),
}

/// Pong game session
pub struct PongSimulation<R: Rng = Pcg32> {
    config: PongConfig,
    state: PongState,
    rng: R,
}

impl PongSimulation<Pcg32> {
    /// Start a fresh game with a seeded generator
    pub fn new(config: PongConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> PongSimulation<R> {
    /// Start a fresh game with the given generator
    pub fn with_rng(config: PongConfig, rng: R) -> Result<Self, ConfigError> {
        let state = PongState::new(&config);
        Self::from_state(config, state, rng)
    }

    /// Resume from an existing state. Fails if `config` does not validate.
    pub fn from_state(
        config: PongConfig,
        state: PongState,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, state, rng })
    }

    pub fn config(&self) -> &PongConfig {
        &self.config
    }

    pub fn state(&self) -> &PongState {
        &self.state
    }

    /// Owned copy of the state for a renderer
    pub fn snapshot(&self) -> PongState {
        self.state.clone()
    }

    pub fn ball(&self) -> Vec2 {
        self.state.ball
    }

    pub fn player_y(&self) -> f32 {
        self.state.player_y
    }

    pub fn bot_y(&self) -> f32 {
        self.state.bot_y
    }

    pub fn player_score(&self) -> u32 {
        self.state.player_score
    }

    pub fn bot_score(&self) -> u32 {
        self.state.bot_score
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner
    }

    pub fn is_finished(&self) -> bool {
        self.state.winner.is_some()
    }

    /// Move the player paddle, clamped to the configured range
    pub fn set_player_target(&mut self, y: f32) {
        if y.is_nan() {
            log::warn!("Ignoring NaN player target");
            return;
        }
        self.state.player_y = y.clamp(self.config.player_min, self.config.player_max);
    }

    /// Advance one fixed step. No-op once a winner is set.
    pub fn tick(&mut self) -> Vec<PongEvent> {
        let mut events = Vec::new();
        if self.state.winner.is_some() {
            return events;
        }

        let cfg = self.config;
        let state = &mut self.state;
        state.time_ticks += 1;
        state.ball += state.velocity;

        let bounce = bounce_off_walls(state.ball, state.velocity, WallSet::TOP_AND_BOTTOM);
        if bounce.hit {
            state.velocity = bounce.velocity;
            events.push(PongEvent::WallBounce);
        }

        state.bot_y = clamp_unit(cfg.bot_follow.next(state.bot_y, state.ball.y));

        // Paddles
        let hit = if state.ball.x >= cfg.player_threshold
            && within_paddle(state.ball.y, state.player_y, cfg.paddle_half_height)
        {
            state.ball.x = cfg.player_threshold;
            Some(Side::Player)
        } else if state.ball.x <= cfg.bot_threshold
            && within_paddle(state.ball.y, state.bot_y, cfg.paddle_half_height)
        {
            state.ball.x = cfg.bot_threshold;
            Some(Side::Bot)
        } else {
            None
        };
        if let Some(side) = hit {
            // Send the ball back toward the other side
            let dx = state.velocity.x.abs() * side.opponent().direction();
            state.velocity = (Vec2::new(dx, state.velocity.y) * cfg.speed_ramp_factor)
                .clamp_length_max(cfg.max_speed);
            events.push(PongEvent::PaddleHit(side));
        }

        // Goal lines, evaluated before any clamping
        let scorer = if state.ball.x > 1.0 {
            Some(Side::Bot)
        } else if state.ball.x < 0.0 {
            Some(Side::Player)
        } else {
            None
        };
        if let Some(side) = scorer {
            match side {
                Side::Player => state.player_score += 1,
                Side::Bot => state.bot_score += 1,
            }
            events.push(PongEvent::Scored(side));
            log::debug!(
                "{} scored ({}-{})",
                side,
                state.player_score,
                state.bot_score
            );

            if state.score(side) >= cfg.win_score {
                state.winner = Some(side);
                events.push(PongEvent::Won(side));
                log::info!(
                    "{} wins {}-{} after {} ticks",
                    side,
                    state.player_score,
                    state.bot_score,
                    state.time_ticks
                );
            }

            // Serve toward whoever conceded
            state.ball = Vec2::new(SERVE_POINT.0, SERVE_POINT.1);
            state.velocity = pong_serve(
                &mut self.rng,
                cfg.serve_speed,
                side.opponent().direction(),
            );
        }

        if cfg.clamp_ball_position {
            state.ball = clamp_to_unit_square(state.ball);
        }

        events
    }
}

impl<R: Rng> Simulation for PongSimulation<R> {
    type Event = PongEvent;
    type Snapshot = PongState;

    fn tick(&mut self) -> Vec<PongEvent> {
        PongSimulation::tick(self)
    }

    fn set_target(&mut self, target: f32) {
        self.set_player_target(target);
    }

    fn snapshot(&self) -> PongState {
        PongSimulation::snapshot(self)
    }

    fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }

    fn autopilot_target(&self) -> f32 {
        self.state.ball.y
    }
}
