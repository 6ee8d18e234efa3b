//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected, seeded RNG only
//! - Stable iteration order (bricks row-major)
//! - No rendering or platform dependencies

pub mod breakout;
pub mod collision;
pub mod geometry;
pub mod pong;
pub mod serve;

pub use breakout::{Brick, BreakoutConfig, BreakoutEvent, BreakoutSimulation, BreakoutState};
pub use collision::{WallBounce, WallSet, bounce_off_walls, reflect_velocity};
pub use geometry::Rect;
pub use pong::{BotFollowMode, PongConfig, PongEvent, PongSimulation, PongState, Side};

/// Common surface of both games, as seen by the driver
pub trait Simulation {
    type Event;
    type Snapshot;

    /// Advance one fixed step, returning what happened
    fn tick(&mut self) -> Vec<Self::Event>;

    /// Apply a normalized paddle target
    fn set_target(&mut self, target: f32);

    /// Owned copy of the state for drawing
    fn snapshot(&self) -> Self::Snapshot;

    fn time_ticks(&self) -> u64;

    /// Paddle target that keeps the player's paddle in line with the ball
    fn autopilot_target(&self) -> f32;
}
