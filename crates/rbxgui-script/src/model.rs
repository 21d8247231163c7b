use std::fmt;

use serde::{Deserialize, Serialize};

// ── ElementKind ───────────────────────────────────────────────────────────

/// The GUI class an [`Element`] was constructed from.
///
/// The six known classes are the ones the renderer and toolbox understand.
/// Any other class name found in source text is carried through verbatim as
/// [`ElementKind::Other`] so it survives a generate/extract round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Frame,
    TextLabel,
    TextButton,
    ImageLabel,
    ImageButton,
    ScrollingFrame,
    Other(String),
}

impl ElementKind {
    /// Every known kind, in toolbox order.
    pub const KNOWN: [ElementKind; 6] = [
        ElementKind::Frame,
        ElementKind::TextLabel,
        ElementKind::TextButton,
        ElementKind::ImageLabel,
        ElementKind::ImageButton,
        ElementKind::ScrollingFrame,
    ];

    pub fn from_class(class: &str) -> Self {
        match class {
            "Frame"          => ElementKind::Frame,
            "TextLabel"      => ElementKind::TextLabel,
            "TextButton"     => ElementKind::TextButton,
            "ImageLabel"     => ElementKind::ImageLabel,
            "ImageButton"    => ElementKind::ImageButton,
            "ScrollingFrame" => ElementKind::ScrollingFrame,
            other            => ElementKind::Other(other.to_string()),
        }
    }

    /// The class name as written inside `Instance.new("...")`.
    pub fn class_name(&self) -> &str {
        match self {
            ElementKind::Frame          => "Frame",
            ElementKind::TextLabel      => "TextLabel",
            ElementKind::TextButton     => "TextButton",
            ElementKind::ImageLabel     => "ImageLabel",
            ElementKind::ImageButton    => "ImageButton",
            ElementKind::ScrollingFrame => "ScrollingFrame",
            ElementKind::Other(s)       => s,
        }
    }

    /// Kinds that display a `Text` property.
    pub fn has_text(&self) -> bool {
        matches!(self, ElementKind::TextLabel | ElementKind::TextButton)
    }

    /// Kinds that display an `Image` property.
    pub fn has_image(&self) -> bool {
        matches!(self, ElementKind::ImageLabel | ElementKind::ImageButton)
    }

    /// Kinds that respond to clicks.
    pub fn is_button(&self) -> bool {
        matches!(self, ElementKind::TextButton | ElementKind::ImageButton)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl From<String> for ElementKind {
    fn from(s: String) -> Self {
        ElementKind::from_class(&s)
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.class_name().to_string()
    }
}

// ── UDim / UDim2 ──────────────────────────────────────────────────────────

/// One axis of the scale-plus-offset layout primitive.
///
/// `scale` is a fraction of the parent's extent (nominally 0–1, unbounded),
/// `offset` is an absolute delta in pixels. Both are kept as written.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UDim {
    pub scale: f32,
    pub offset: f32,
}

impl UDim {
    #[inline]
    pub const fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    #[inline]
    pub const fn from_scale(scale: f32) -> Self {
        Self { scale, offset: 0.0 }
    }

    #[inline]
    pub const fn from_offset(offset: f32) -> Self {
        Self { scale: 0.0, offset }
    }
}

/// A two-axis [`UDim`] pair, used for both position and size.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UDim2 {
    pub x: UDim,
    pub y: UDim,
}

impl UDim2 {
    #[inline]
    pub const fn new(x_scale: f32, x_offset: f32, y_scale: f32, y_offset: f32) -> Self {
        Self { x: UDim::new(x_scale, x_offset), y: UDim::new(y_scale, y_offset) }
    }

    #[inline]
    pub const fn from_scale(x: f32, y: f32) -> Self {
        Self { x: UDim::from_scale(x), y: UDim::from_scale(y) }
    }

    #[inline]
    pub const fn from_offset(x: f32, y: f32) -> Self {
        Self { x: UDim::from_offset(x), y: UDim::from_offset(y) }
    }

    pub fn axis(&self, axis: Axis) -> UDim {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut UDim {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

// ── Color3 ────────────────────────────────────────────────────────────────

/// RGB color with each channel normalized to `0.0..=1.0`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0`–`255` channel values, as `Color3.fromRGB` does.
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb_f32(r as f32, g as f32, b as f32)
    }

    /// Like [`from_rgb`](Self::from_rgb) but accepts out-of-range literals the
    /// way the scripting runtime does: no clamping, just the divide.
    #[inline]
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        Self { r: r / 255.0, g: g / 255.0, b: b / 255.0 }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::from_rgb(r, g, b))
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn channel(&self, channel: Channel) -> f32 {
        match channel {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut f32 {
        match channel {
            Channel::R => &mut self.r,
            Channel::G => &mut self.g,
            Channel::B => &mut self.b,
        }
    }

    /// Byte values as emitted by `Color3.fromRGB`, or `None` when some channel
    /// is not a whole multiple of 1/255 (such colors must be written with
    /// `Color3.new` to survive a round trip).
    pub fn to_rgb8(&self) -> Option<[u8; 3]> {
        let mut out = [0u8; 3];
        for (slot, c) in out.iter_mut().zip([self.r, self.g, self.b]) {
            let byte = channel_to_byte(c)?;
            if byte as f32 / 255.0 != c {
                return None;
            }
            *slot = byte;
        }
        Some(out)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    R,
    G,
    B,
}

/// Tolerance applied before flooring so `n / 255 * 255` lands on `n` even
/// when float error puts it a hair below.
const FLOOR_EPSILON: f32 = 1e-3;

fn floor_channel(c: f32) -> f32 {
    (c * 255.0 + FLOOR_EPSILON).floor()
}

fn channel_to_byte(c: f32) -> Option<u8> {
    if !c.is_finite() {
        return None;
    }
    let v = floor_channel(c);
    if (0.0..=255.0).contains(&v) { Some(v as u8) } else { None }
}

// ── Element ───────────────────────────────────────────────────────────────

/// One GUI node: a kind, optional visual/geometric properties, and ordered
/// children.
///
/// Every field other than `kind` is optional and an absent field means "use
/// the default" (see [`crate::defaults`]). Extraction never fills in defaults,
/// so a field the source did not set stays `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<UDim2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<UDim2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_transparency: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_size_pixel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// A bare element with only its kind set.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            name: None,
            position: None,
            size: None,
            background_color: None,
            background_transparency: None,
            border_size_pixel: None,
            text: None,
            text_color: None,
            text_size: None,
            image: None,
            corner_radius: None,
            children: Vec::new(),
        }
    }

    pub fn named(kind: ElementKind, name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::new(kind) }
    }

    // Builder-style setters, mostly for tests and the toolbox.

    pub fn with_position(mut self, p: UDim2) -> Self { self.position = Some(p); self }
    pub fn with_size(mut self, s: UDim2) -> Self { self.size = Some(s); self }
    pub fn with_background(mut self, c: Color3) -> Self { self.background_color = Some(c); self }
    pub fn with_text(mut self, t: impl Into<String>) -> Self { self.text = Some(t.into()); self }
    pub fn with_text_color(mut self, c: Color3) -> Self { self.text_color = Some(c); self }
    pub fn with_text_size(mut self, s: u32) -> Self { self.text_size = Some(s); self }
    pub fn with_image(mut self, i: impl Into<String>) -> Self { self.image = Some(i.into()); self }
    pub fn with_corner_radius(mut self, r: f32) -> Self { self.corner_radius = Some(r); self }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of elements in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Element::subtree_len).sum::<usize>()
    }

    /// Depth-first search for the first element whose `name` matches.
    pub fn find_by_name(&self, name: &str) -> Option<&Element> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_name(name))
    }
}

/// Depth-first search over a whole forest.
pub fn find_by_name<'a>(forest: &'a [Element], name: &str) -> Option<&'a Element> {
    forest.iter().find_map(|e| e.find_by_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_class_name() {
        for kind in ElementKind::KNOWN {
            assert_eq!(ElementKind::from_class(kind.class_name()), kind);
        }
        assert_eq!(
            ElementKind::from_class("TextBox"),
            ElementKind::Other("TextBox".to_string())
        );
    }

    #[test]
    fn from_rgb_normalizes() {
        let c = Color3::from_rgb(255, 128, 0);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 0.502).abs() < 1e-3);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn to_rgb8_is_stable_for_every_byte() {
        for n in 0..=255u8 {
            let c = Color3::from_rgb(n, n, n);
            assert_eq!(c.to_rgb8(), Some([n, n, n]), "byte {n} drifted");
        }
    }

    #[test]
    fn to_rgb8_rejects_non_byte_channels() {
        assert_eq!(Color3::new(0.5, 0.0, 1.0).to_rgb8(), None);
    }

    #[test]
    fn from_hex() {
        assert_eq!(Color3::from_hex("#ff8000"), Some(Color3::from_rgb(255, 128, 0)));
        assert_eq!(Color3::from_hex("00ff00"), Some(Color3::from_rgb(0, 255, 0)));
        assert_eq!(Color3::from_hex("#fff"), None);
    }

    #[test]
    fn find_by_name_searches_children() {
        let forest = vec![
            Element::named(ElementKind::Frame, "outer")
                .with_child(Element::named(ElementKind::TextLabel, "inner")),
        ];
        assert_eq!(find_by_name(&forest, "inner").map(|e| &e.kind), Some(&ElementKind::TextLabel));
        assert!(find_by_name(&forest, "missing").is_none());
        assert_eq!(forest[0].subtree_len(), 2);
    }

    #[test]
    fn serializes_as_plain_data() {
        let e = Element::named(ElementKind::Frame, "f").with_size(UDim2::from_scale(0.5, 1.0));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "Frame");
        assert_eq!(json["name"], "f");
        assert_eq!(json["size"]["x"]["scale"], 0.5);
        assert!(json.get("text").is_none());
        assert!(json.get("children").is_none());
        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }
}
