//! Collision detection and response for the unit-square playfield
//!
//! Everything here is axis-aligned: walls are the edges of the unit square,
//! paddles and bricks are boxes. Reflections only fire while the ball is
//! moving into a surface, so a ball resting on an edge for two ticks does not
//! flip back and forth.

use glam::Vec2;

use super::geometry::Rect;

/// Which edges of the playfield reflect the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallSet {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallSet {
    /// Pong: the left and right edges are goal lines
    pub const TOP_AND_BOTTOM: WallSet = WallSet {
        left: false,
        right: false,
        top: true,
        bottom: true,
    };

    /// Breakout: the bottom edge is open
    pub const ALL_BUT_BOTTOM: WallSet = WallSet {
        left: true,
        right: true,
        top: true,
        bottom: false,
    };
}

/// Result of a wall check
#[derive(Debug, Clone, Copy)]
pub struct WallBounce {
    /// Velocity after any reflections
    pub velocity: Vec2,
    /// Whether at least one wall reflected the ball
    pub hit: bool,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect only if the ball is heading into the surface.
///
/// `normal` points away from the surface, back into the playfield.
/// Returns `None` when the ball is already moving away.
#[inline]
pub fn reflect_if_approaching(velocity: Vec2, normal: Vec2) -> Option<Vec2> {
    if velocity.dot(normal) < 0.0 {
        Some(reflect_velocity(velocity, normal))
    } else {
        None
    }
}

/// Bounce the ball off the playfield edges enabled in `walls`.
///
/// A wall is touched once the ball reaches or passes it (`<= 0` / `>= 1`).
pub fn bounce_off_walls(pos: Vec2, velocity: Vec2, walls: WallSet) -> WallBounce {
    let mut vel = velocity;
    let mut hit = false;

    let checks = [
        (walls.left && pos.x <= 0.0, Vec2::X),
        (walls.right && pos.x >= 1.0, Vec2::NEG_X),
        (walls.top && pos.y <= 0.0, Vec2::Y),
        (walls.bottom && pos.y >= 1.0, Vec2::NEG_Y),
    ];

    for (touching, normal) in checks {
        if !touching {
            continue;
        }
        if let Some(reflected) = reflect_if_approaching(vel, normal) {
            vel = reflected;
            hit = true;
        }
    }

    WallBounce { velocity: vel, hit }
}

/// Check if a ball coordinate lines up with a paddle along the paddle's long axis
#[inline]
pub fn within_paddle(ball_coord: f32, paddle_center: f32, half_extent: f32) -> bool {
    (ball_coord - paddle_center).abs() < half_extent
}

/// Index of the first box (in slice order) containing the ball, skipping
/// entries for which `alive` returns false.
pub fn first_hit<T>(
    ball: Vec2,
    items: &[T],
    alive: impl Fn(&T) -> bool,
    bounds: impl Fn(&T) -> Rect,
) -> Option<usize> {
    items
        .iter()
        .position(|item| alive(item) && bounds(item).contains_point(ball))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(0.01, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-0.01)).abs() < 1e-7);
        assert!(reflected.y.abs() < 1e-7);
    }

    #[test]
    fn test_reflect_if_approaching_ignores_departing_ball() {
        let normal = Vec2::Y;
        assert!(reflect_if_approaching(Vec2::new(0.0, 0.01), normal).is_none());
        let bounced = reflect_if_approaching(Vec2::new(0.002, -0.01), normal).unwrap();
        assert_eq!(bounced, Vec2::new(0.002, 0.01));
    }

    #[test]
    fn test_top_wall_bounce() {
        let result = bounce_off_walls(
            Vec2::new(0.4, 0.0),
            Vec2::new(0.003, -0.004),
            WallSet::TOP_AND_BOTTOM,
        );
        assert!(result.hit);
        assert_eq!(result.velocity, Vec2::new(0.003, 0.004));
    }

    #[test]
    fn test_goal_lines_do_not_reflect_in_pong() {
        let result = bounce_off_walls(
            Vec2::new(1.02, 0.5),
            Vec2::new(0.004, 0.001),
            WallSet::TOP_AND_BOTTOM,
        );
        assert!(!result.hit);
        assert_eq!(result.velocity, Vec2::new(0.004, 0.001));
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let result = bounce_off_walls(
            Vec2::new(1.0, 0.0),
            Vec2::new(0.004, -0.004),
            WallSet::ALL_BUT_BOTTOM,
        );
        assert!(result.hit);
        assert_eq!(result.velocity, Vec2::new(-0.004, 0.004));
    }

    #[test]
    fn test_open_bottom_in_breakout() {
        let result = bounce_off_walls(
            Vec2::new(0.5, 1.0),
            Vec2::new(0.0, 0.004),
            WallSet::ALL_BUT_BOTTOM,
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_within_paddle() {
        assert!(within_paddle(0.55, 0.5, 0.1));
        assert!(!within_paddle(0.6, 0.5, 0.1));
        assert!(!within_paddle(0.35, 0.5, 0.1));
    }

    #[test]
    fn test_first_hit_respects_order_and_liveness() {
        let boxes = [
            (false, Rect::new(Vec2::new(0.5, 0.5), Vec2::splat(0.1))),
            (true, Rect::new(Vec2::new(0.5, 0.52), Vec2::splat(0.1))),
            (true, Rect::new(Vec2::new(0.5, 0.55), Vec2::splat(0.1))),
        ];
        let hit = first_hit(Vec2::new(0.5, 0.53), &boxes, |b| b.0, |b| b.1);
        assert_eq!(hit, Some(1));
        let miss = first_hit(Vec2::new(0.9, 0.9), &boxes, |b| b.0, |b| b.1);
        assert_eq!(miss, None);
    }
}
