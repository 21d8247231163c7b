use serde::{Deserialize, Serialize};

use super::Rect;

/// Per-corner radii for a rounded rectangle (logical pixels).
///
/// Corners follow CSS convention: top-left, top-right, bottom-right, bottom-left.
/// `UICorner` only ever produces uniform radii, but consumers draw per corner.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }

    /// No rounding.
    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Clamps every radius into `0..=min(w, h) / 2` of `rect`, the largest
    /// rounding a box of that size can show.
    pub fn fit(self, rect: Rect) -> Self {
        let r = rect.normalized();
        let max = (r.size.x.min(r.size.y) / 2.0).max(0.0);
        let f = |v: f32| v.clamp(0.0, max);
        Self {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }
}
