//! Serve velocities
//!
//! All randomness in the simulations flows through these functions, and
//! always from a caller-supplied generator.

use glam::Vec2;
use rand::Rng;

/// Random sign, 50/50
#[inline]
pub fn coin_flip_sign<R: Rng>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Pong serve: fixed horizontal speed in `direction` (+1 right, -1 left),
/// vertical speed drawn from ±[speed/2, speed].
pub fn pong_serve<R: Rng>(rng: &mut R, speed: f32, direction: f32) -> Vec2 {
    let dy = rng.random_range(speed * 0.5..=speed) * coin_flip_sign(rng);
    Vec2::new(speed * direction.signum(), dy)
}

/// Breakout serve: random horizontal direction, always upward.
pub fn breakout_serve<R: Rng>(rng: &mut R, speed: f32) -> Vec2 {
    Vec2::new(speed * coin_flip_sign(rng), -speed)
}
