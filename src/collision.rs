//! Axis-aligned collision primitive with the top dead zone.
//!
//! Every hit test in the game funnels through [`overlaps`]: a strict AABB
//! intersection that additionally reports `false` whenever either rectangle's
//! top edge lies within [`TOP_EFFECT_ZONE`](crate::constants::TOP_EFFECT_ZONE)
//! of the arena's top edge.  At this entity count (tens of live rectangles)
//! no broad phase is warranted.

use bevy::prelude::*;

use crate::constants::TOP_EFFECT_ZONE;

/// Axis-aligned collision rectangle attached to every collidable entity.
///
/// Stores half extents; the world-space rectangle is derived from the
/// entity's `Transform` translation, which is the rectangle centre.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub half: Vec2,
}

impl Hitbox {
    /// Hitbox from full width and height.
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Square hitbox from an edge length.
    #[inline]
    pub fn square(size: f32) -> Self {
        Self::new(size, size)
    }
}

/// World-space axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    #[inline]
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Build the world rectangle of an entity from its transform and hitbox.
    #[inline]
    pub fn of(transform: &Transform, hitbox: &Hitbox) -> Self {
        Self {
            center: transform.translation.truncate(),
            half: hitbox.half,
        }
    }

    /// Y coordinate of the rectangle's top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }
}

/// Whether `aabb` pokes into the suppressed strip below the arena's top edge.
#[inline]
pub fn in_top_zone(aabb: &Aabb, arena_top: f32) -> bool {
    aabb.top() > arena_top - TOP_EFFECT_ZONE
}

/// Strict AABB intersection with the top-dead-zone exclusion.
///
/// Touching edges do not count as an overlap.  Any rectangle inside the top
/// zone collides with nothing, which keeps both gameplay damage and visual
/// effects out of the spawn strip.
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb, arena_top: f32) -> bool {
    if in_top_zone(a, arena_top) || in_top_zone(b, arena_top) {
        return false;
    }

    (a.center.x - b.center.x).abs() < a.half.x + b.half.x
        && (a.center.y - b.center.y).abs() < a.half.y + b.half.y
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA_TOP: f32 = 400.0;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w / 2.0, h / 2.0))
    }

    #[test]
    fn overlapping_rects_below_the_zone_collide() {
        let a = rect(0.0, 0.0, 40.0, 40.0);
        let b = rect(30.0, 10.0, 40.0, 40.0);
        assert!(overlaps(&a, &b, ARENA_TOP));
    }

    #[test]
    fn disjoint_rects_do_not_collide() {
        let a = rect(0.0, 0.0, 40.0, 40.0);
        let b = rect(100.0, 0.0, 40.0, 40.0);
        assert!(!overlaps(&a, &b, ARENA_TOP));
    }

    #[test]
    fn edge_touching_rects_do_not_collide() {
        let a = rect(0.0, 0.0, 40.0, 40.0);
        let b = rect(40.0, 0.0, 40.0, 40.0);
        assert!(!overlaps(&a, &b, ARENA_TOP));
    }

    #[test]
    fn rect_inside_top_zone_never_collides() {
        // Geometric overlap is total, but `a` sits in the top strip.
        let a = rect(0.0, ARENA_TOP - 5.0, 40.0, 40.0);
        let b = rect(0.0, ARENA_TOP - 5.0, 40.0, 40.0);
        assert!(in_top_zone(&a, ARENA_TOP));
        assert!(!overlaps(&a, &b, ARENA_TOP));
    }

    #[test]
    fn either_rect_in_top_zone_suppresses_the_pair() {
        let below = rect(0.0, ARENA_TOP - 60.0, 40.0, 40.0);
        let above = rect(0.0, ARENA_TOP - 25.0, 40.0, 40.0);
        assert!(!in_top_zone(&below, ARENA_TOP));
        assert!(in_top_zone(&above, ARENA_TOP));
        assert!(!overlaps(&below, &above, ARENA_TOP));
        assert!(!overlaps(&above, &below, ARENA_TOP));
    }

    #[test]
    fn matches_standard_aabb_formula_outside_the_zone() {
        // Spot-check a grid of offsets against the textbook min/max formula.
        let a = rect(0.0, 0.0, 30.0, 20.0);
        for dx in [-40.0, -20.0, 0.0, 20.0, 40.0] {
            for dy in [-30.0, -10.0, 0.0, 10.0, 30.0] {
                let b = rect(dx, dy, 30.0, 20.0);
                let expected = (a.center.x - a.half.x) < (b.center.x + b.half.x)
                    && (a.center.x + a.half.x) > (b.center.x - b.half.x)
                    && (a.center.y - a.half.y) < (b.center.y + b.half.y)
                    && (a.center.y + a.half.y) > (b.center.y - b.half.y);
                assert_eq!(overlaps(&a, &b, ARENA_TOP), expected, "dx={dx} dy={dy}");
            }
        }
    }
}
