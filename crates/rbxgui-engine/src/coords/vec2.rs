use core::ops::Add;

use rbxgui_script::UDim2;
use serde::{Deserialize, Serialize};

/// 2D vector in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `scale * basis + offset`, per axis.
    #[inline]
    pub fn from_udim2(u: UDim2, basis: Vec2) -> Self {
        Vec2::new(
            u.x.scale * basis.x + u.x.offset,
            u.y.scale * basis.y + u.y.offset,
        )
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}
