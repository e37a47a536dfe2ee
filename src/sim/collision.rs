//! Overlap and field-exit tests
//!
//! All collision tests are axis-aligned box overlaps. Helpers here never
//! mutate; the resolver decides what a hit means.

use super::aabb::Aabb;
use super::state::Entity;
use super::store::Pool;
use crate::consts::FIELD_HEIGHT;

/// Whether two boxes overlap
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Index of the first live entity in `pool` (spawn order) overlapping `query`
pub fn first_overlap<T: Entity>(query: &Aabb, pool: &Pool<T>) -> Option<usize> {
    (0..pool.slots()).find(|&i| pool.get(i).is_some_and(|e| overlaps(query, &e.bounds())))
}

/// Centre has fallen past the bottom edge (enemies, asteroids)
#[inline]
pub fn center_below_field(center_y: f32) -> bool {
    center_y > FIELD_HEIGHT
}

/// Whole box is below the field (enemy bullets, powerups)
#[inline]
pub fn exited_bottom(bounds: &Aabb) -> bool {
    bounds.top() > FIELD_HEIGHT
}

/// Box has crossed the top edge (player bullets)
#[inline]
pub fn exited_top(bounds: &Aabb) -> bool {
    bounds.top() < 0.0
}
