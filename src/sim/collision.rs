//! Axis-aligned hitbox overlap
//!
//! Every mover and gem uses the same hitbox shape: its cell box shrunk by a
//! fixed margin on each side, so brushing past a corner doesn't count.
//! Overlap is strict; boxes that only share an edge do not collide.

use glam::Vec2;

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Cell-sized box at `pos` inset by `margin` on every side
    pub fn for_cell(pos: Vec2, cell_size: f32, margin: f32) -> Self {
        Self {
            min: pos + Vec2::splat(margin),
            size: Vec2::splat(cell_size - 2.0 * margin),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap. Degenerate (zero or negative size) boxes never hit.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        if self.size.cmple(Vec2::ZERO).any() || other.size.cmple(Vec2::ZERO).any() {
            return false;
        }
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }
}

/// Index of the first hitbox in `others` that overlaps `hitbox`
pub fn first_overlap<'a, I>(hitbox: &Hitbox, others: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Hitbox>,
{
    others.into_iter().position(|other| hitbox.overlaps(other))
}
