//! The one place element defaults live.
//!
//! Both the editor's "add element" action and the layout resolver read from
//! here, so a default can never mean one thing on screen and another in the
//! toolbox.

use crate::model::{Color3, Element, ElementKind, UDim2};

/// Size used when an element has no `Size`: 100×30 pixels, no scale.
pub const SIZE: UDim2 = UDim2::from_offset(100.0, 30.0);

/// Position used when an element has no `Position`.
pub const POSITION: UDim2 = UDim2::from_offset(0.0, 0.0);

/// Background color used when an element has no `BackgroundColor3`.
pub const BACKGROUND_COLOR: Color3 = Color3::white();

/// Transparency applied to [`BACKGROUND_COLOR`] when neither a color nor a
/// transparency is set, so unstyled elements read as faint outlines.
pub const UNSET_BACKGROUND_TRANSPARENCY: f32 = 0.9;

/// Transparency used when only the color is set.
pub const BACKGROUND_TRANSPARENCY: f32 = 0.0;

pub const TEXT_COLOR: Color3 = Color3::white();
pub const TEXT_SIZE: u32 = 14;
pub const BORDER_SIZE_PIXEL: u32 = 0;
pub const CORNER_RADIUS: f32 = 0.0;

/// Placeholder asset used for new image elements.
pub const IMAGE: &str = "rbxassetid://0";

/// Default shape for a freshly added element of `kind`.
///
/// Fields that match the global defaults above are still written out so the
/// new element is visible in generated source and can be edited in place.
pub fn shape(kind: &ElementKind) -> Element {
    let base = Element::new(kind.clone()).with_position(UDim2::from_offset(20.0, 20.0));
    match kind {
        ElementKind::Frame => base
            .with_size(UDim2::from_offset(200.0, 150.0))
            .with_background(Color3::from_rgb(45, 45, 45)),
        ElementKind::ScrollingFrame => base
            .with_size(UDim2::from_offset(200.0, 150.0))
            .with_background(Color3::from_rgb(35, 35, 35)),
        ElementKind::TextLabel => base
            .with_size(UDim2::from_offset(160.0, 32.0))
            .with_background(Color3::from_rgb(30, 30, 30))
            .with_text("Label")
            .with_text_color(TEXT_COLOR)
            .with_text_size(TEXT_SIZE),
        ElementKind::TextButton => base
            .with_size(UDim2::from_offset(120.0, 40.0))
            .with_background(Color3::from_rgb(0, 162, 255))
            .with_text("Button")
            .with_text_color(TEXT_COLOR)
            .with_text_size(TEXT_SIZE),
        ElementKind::ImageLabel | ElementKind::ImageButton => base
            .with_size(UDim2::from_offset(100.0, 100.0))
            .with_background(Color3::from_rgb(60, 60, 60))
            .with_image(IMAGE),
        ElementKind::Other(_) => base.with_size(SIZE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_kind_has_a_sized_shape() {
        for kind in ElementKind::KNOWN {
            let e = shape(&kind);
            assert_eq!(e.kind, kind);
            assert!(e.size.is_some());
            assert!(e.name.is_none());
        }
    }

    #[test]
    fn text_kinds_get_text() {
        assert_eq!(shape(&ElementKind::TextButton).text.as_deref(), Some("Button"));
        assert!(shape(&ElementKind::Frame).text.is_none());
        assert!(shape(&ElementKind::ImageLabel).image.is_some());
    }
}
