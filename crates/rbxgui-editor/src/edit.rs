use rbxgui_script::defaults;
use rbxgui_script::{Axis, Channel, Color3, Element, UDim2};

use crate::error::EditError;

/// Largest integer property value written back exactly. Number literals are
/// read as `f32`, which is exact only up to 2^24.
pub const MAX_INTEGER_VALUE: u32 = 1 << 24;

/// Which color property an edit targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorTarget {
    Background,
    Text,
}

/// Which half of a [`UDim`](rbxgui_script::UDim) an axis edit targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UDimPart {
    Scale,
    Offset,
}

/// A single property mutation, as produced by a property form.
///
/// `None` in a `Set*` edit clears the field back to its default.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    SetName(Option<String>),
    SetText(Option<String>),
    SetImage(Option<String>),
    SetTextSize(Option<u32>),
    SetBorderSize(Option<u32>),
    SetCornerRadius(Option<f32>),
    SetTransparency(Option<f32>),
    Move(UDim2),
    Resize(UDim2),
    Recolor { target: ColorTarget, color: Color3 },
    SetPositionAxis { axis: Axis, part: UDimPart, value: f32 },
    SetSizeAxis { axis: Axis, part: UDimPart, value: f32 },
    /// One channel as a `0`–`255` byte.
    SetColorChannel { target: ColorTarget, channel: Channel, value: u8 },
    /// Shifts the position's pixel offsets, leaving scale alone. What a drag
    /// in a preview produces.
    Nudge { dx: f32, dy: f32 },
}

impl Edit {
    /// Rejects values the generator could not write back out.
    pub fn validate(&self) -> Result<(), EditError> {
        let finite = |field: &'static str, v: f32| {
            if v.is_finite() { Ok(()) } else { Err(EditError::NonFinite { field }) }
        };
        let udim2 = |field: &'static str, u: &UDim2| {
            [u.x.scale, u.x.offset, u.y.scale, u.y.offset]
                .into_iter()
                .try_for_each(|v| finite(field, v))
        };
        let integer = |field: &'static str, value: u32| {
            if value <= MAX_INTEGER_VALUE {
                Ok(())
            } else {
                Err(EditError::OutOfRange { field, value, max: MAX_INTEGER_VALUE })
            }
        };
        match self {
            Edit::SetTextSize(Some(v)) => integer("TextSize", *v),
            Edit::SetBorderSize(Some(v)) => integer("BorderSizePixel", *v),
            Edit::SetCornerRadius(Some(v)) => finite("CornerRadius", *v),
            Edit::SetTransparency(Some(v)) => finite("BackgroundTransparency", *v),
            Edit::Move(u) => udim2("Position", u),
            Edit::Resize(u) => udim2("Size", u),
            Edit::Recolor { color, .. } => [color.r, color.g, color.b]
                .into_iter()
                .try_for_each(|v| finite("Color3", v)),
            Edit::SetPositionAxis { value, .. } => finite("Position", *value),
            Edit::SetSizeAxis { value, .. } => finite("Size", *value),
            Edit::Nudge { dx, dy } => finite("Position", *dx).and(finite("Position", *dy)),
            _ => Ok(()),
        }
    }

    /// Applies the edit. Call [`validate`](Self::validate) first.
    pub fn apply(self, e: &mut Element) {
        match self {
            Edit::SetName(v) => e.name = v,
            Edit::SetText(v) => e.text = v,
            Edit::SetImage(v) => e.image = v,
            Edit::SetTextSize(v) => e.text_size = v,
            Edit::SetBorderSize(v) => e.border_size_pixel = v,
            Edit::SetCornerRadius(v) => e.corner_radius = v,
            Edit::SetTransparency(v) => e.background_transparency = v,
            Edit::Move(u) => e.position = Some(u),
            Edit::Resize(u) => e.size = Some(u),
            Edit::Recolor { target, color } => *color_slot(e, target) = Some(color),
            Edit::SetPositionAxis { axis, part, value } => {
                let pos = e.position.get_or_insert(defaults::POSITION);
                set_part(pos, axis, part, value);
            }
            Edit::SetSizeAxis { axis, part, value } => {
                let size = e.size.get_or_insert(defaults::SIZE);
                set_part(size, axis, part, value);
            }
            Edit::SetColorChannel { target, channel, value } => {
                let fallback = match target {
                    ColorTarget::Background => defaults::BACKGROUND_COLOR,
                    ColorTarget::Text => defaults::TEXT_COLOR,
                };
                let color = color_slot(e, target).get_or_insert(fallback);
                *color.channel_mut(channel) = value as f32 / 255.0;
            }
            Edit::Nudge { dx, dy } => {
                let pos = e.position.get_or_insert(defaults::POSITION);
                pos.x.offset += dx;
                pos.y.offset += dy;
            }
        }
    }
}

fn color_slot(e: &mut Element, target: ColorTarget) -> &mut Option<Color3> {
    match target {
        ColorTarget::Background => &mut e.background_color,
        ColorTarget::Text => &mut e.text_color,
    }
}

fn set_part(u: &mut UDim2, axis: Axis, part: UDimPart, value: f32) {
    let udim = u.axis_mut(axis);
    match part {
        UDimPart::Scale => udim.scale = value,
        UDimPart::Offset => udim.offset = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbxgui_script::ElementKind;

    fn label() -> Element {
        Element::named(ElementKind::TextLabel, "t")
    }

    #[test]
    fn axis_edit_starts_from_default_size() {
        let mut e = label();
        Edit::SetSizeAxis { axis: Axis::X, part: UDimPart::Scale, value: 0.5 }.apply(&mut e);
        assert_eq!(e.size, Some(UDim2::new(0.5, 100.0, 0.0, 30.0)));
    }

    #[test]
    fn axis_edit_keeps_the_other_half() {
        let mut e = label().with_position(UDim2::new(0.1, 5.0, 0.2, 6.0));
        Edit::SetPositionAxis { axis: Axis::Y, part: UDimPart::Offset, value: -3.0 }.apply(&mut e);
        assert_eq!(e.position, Some(UDim2::new(0.1, 5.0, 0.2, -3.0)));
    }

    #[test]
    fn channel_edit_is_a_byte() {
        let mut e = label().with_background(Color3::from_rgb(10, 20, 30));
        Edit::SetColorChannel { target: ColorTarget::Background, channel: Channel::G, value: 128 }.apply(&mut e);
        assert_eq!(e.background_color.and_then(|c| c.to_rgb8()), Some([10, 128, 30]));
    }

    #[test]
    fn channel_edit_on_unset_text_color_starts_from_white() {
        let mut e = label();
        Edit::SetColorChannel { target: ColorTarget::Text, channel: Channel::R, value: 0 }.apply(&mut e);
        assert_eq!(e.text_color, Some(Color3::new(0.0, 1.0, 1.0)));
        assert!(e.background_color.is_none());
    }

    #[test]
    fn clearing_a_field() {
        let mut e = label().with_text("hi");
        Edit::SetText(None).apply(&mut e);
        assert!(e.text.is_none());
    }

    #[test]
    fn nudge_moves_offsets_only() {
        let mut e = label().with_position(UDim2::new(0.5, 10.0, 0.5, 10.0));
        Edit::Nudge { dx: 5.0, dy: -15.0 }.apply(&mut e);
        assert_eq!(e.position, Some(UDim2::new(0.5, 15.0, 0.5, -5.0)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            Edit::SetTransparency(Some(f32::NAN)).validate(),
            Err(EditError::NonFinite { field: "BackgroundTransparency" })
        );
        assert!(Edit::Resize(UDim2::new(f32::INFINITY, 0.0, 0.0, 0.0)).validate().is_err());
        assert!(Edit::Resize(UDim2::from_scale(1.0, 1.0)).validate().is_ok());
        assert!(Edit::SetTransparency(None).validate().is_ok());
    }

    #[test]
    fn integers_past_f32_precision_are_rejected() {
        assert!(Edit::SetTextSize(Some(MAX_INTEGER_VALUE)).validate().is_ok());
        assert_eq!(
            Edit::SetTextSize(Some(MAX_INTEGER_VALUE + 1)).validate(),
            Err(EditError::OutOfRange { field: "TextSize", value: MAX_INTEGER_VALUE + 1, max: MAX_INTEGER_VALUE })
        );
        assert!(matches!(
            Edit::SetBorderSize(Some(u32::MAX)).validate(),
            Err(EditError::OutOfRange { field: "BorderSizePixel", .. })
        ));
        assert!(Edit::SetBorderSize(None).validate().is_ok());
    }
}
