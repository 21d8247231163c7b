use rbxgui_script::Color3;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, each channel in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color of element borders, which the document does not carry.
    #[inline]
    pub const fn border() -> Self {
        Self::new(0.4, 0.4, 0.4, 1.0)
    }

    /// A document color at the given opacity. Channels are clamped so
    /// out-of-range `fromRGB` literals paint as their nearest valid color.
    #[inline]
    pub fn from_color3(c: Color3, alpha: f32) -> Self {
        Self::new(
            c.r.clamp(0.0, 1.0),
            c.g.clamp(0.0, 1.0),
            c.b.clamp(0.0, 1.0),
            alpha.clamp(0.0, 1.0),
        )
    }

    /// Opacity from a `BackgroundTransparency` value.
    #[inline]
    pub fn from_transparency(c: Color3, transparency: f32) -> Self {
        Self::from_color3(c, 1.0 - transparency)
    }

    #[inline]
    pub fn is_invisible(self) -> bool {
        self.a <= 0.0
    }
}
