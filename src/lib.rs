//! Watch Arcade - Pong and Breakout for a tiny screen
//!
//! Core modules:
//! - `sim`: Deterministic simulations (physics, collisions, scoring)
//! - `driver`: Fixed-step loop and paddle input plumbing
//! - `arcade`: Game selection and session lifetime
//! - `settings`: Driver cadence and game tuning

pub mod arcade;
pub mod driver;
pub mod settings;
pub mod sim;

pub use arcade::{Arcade, GameKind, Session};
pub use settings::{ConfigError, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (100 Hz, one tick every 10 ms)
    pub const SIM_DT: f32 = 1.0 / 100.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Paddle clamp range shared by both games
    pub const PADDLE_MIN: f32 = 0.07;
    pub const PADDLE_MAX: f32 = 0.93;

    /// Serve speed (normalized units per tick)
    pub const SERVE_SPEED: f32 = 0.0035;
    /// Where every serve starts
    pub const SERVE_POINT: (f32, f32) = (0.5, 0.5);
}

/// Clamp a scalar into [0, 1]
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Clamp a point into the unit square
#[inline]
pub fn clamp_to_unit_square(p: Vec2) -> Vec2 {
    p.clamp(Vec2::ZERO, Vec2::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_unit_square() {
        let p = clamp_to_unit_square(Vec2::new(-0.2, 1.4));
        assert_eq!(p, Vec2::new(0.0, 1.0));
        let inside = Vec2::new(0.3, 0.6);
        assert_eq!(clamp_to_unit_square(inside), inside);
    }
}
