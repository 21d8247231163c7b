//! Coordinate and geometry types shared by layout and its consumers.
//!
//! Canonical space:
//! - Logical pixels
//! - Origin top-left of the viewport
//! - +X right, +Y down
//!
//! Scale/offset pairs from the document model are resolved into this space
//! by [`crate::layout`].

mod color;
mod corner_radii;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use corner_radii::CornerRadii;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
