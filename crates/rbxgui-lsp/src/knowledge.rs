//! Static knowledge base: every class the extractor understands, and every
//! property it reads from each. This drives hover documentation and
//! completion.

// ── Property kinds ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// `UDim2.new(sx, ox, sy, oy)`.
    UDim2,
    /// `UDim.new(scale, offset)`.
    UDim,
    /// `Color3.fromRGB(r, g, b)` or `Color3.new(r, g, b)`.
    Color3,
    /// Float literal.
    Number,
    /// Non-negative integer literal.
    Integer,
    /// Quoted string.
    String,
    /// Another element's binding, or a root container.
    Parent,
}

impl PropKind {
    pub fn label(self) -> &'static str {
        match self {
            PropKind::UDim2   => "UDim2",
            PropKind::UDim    => "UDim",
            PropKind::Color3  => "Color3",
            PropKind::Number  => "number",
            PropKind::Integer => "integer",
            PropKind::String  => "string",
            PropKind::Parent  => "Instance",
        }
    }

    /// Snippet inserted when completing a value of this kind.
    pub fn snippet(self) -> Option<&'static str> {
        match self {
            PropKind::UDim2   => Some("UDim2.new(${1:0}, ${2:0}, ${3:0}, ${4:0})"),
            PropKind::UDim    => Some("UDim.new(${1:0}, ${2:8})"),
            PropKind::Color3  => Some("Color3.fromRGB(${1:255}, ${2:255}, ${3:255})"),
            PropKind::String  => Some("\"$0\""),
            _ => None,
        }
    }
}

// ── Property info ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct PropInfo {
    pub name: &'static str,
    pub kind: PropKind,
    pub doc:  &'static str,
}

// ── Class info ────────────────────────────────────────────────────────────

pub struct ClassInfo {
    pub name:  &'static str,
    pub doc:   &'static str,
    /// Whether instances are elements of the document (as opposed to a root
    /// container or a modifier).
    pub is_element: bool,
    pub props: &'static [PropInfo],
}

// ── Shared prop sets ──────────────────────────────────────────────────────

const BASE_PROPS: &[PropInfo] = &[
    PropInfo { name: "Name",                   kind: PropKind::String,  doc: "Display name. Defaults to the variable name." },
    PropInfo { name: "Parent",                 kind: PropKind::Parent,  doc: "The element this one is nested in, or the screen container." },
    PropInfo { name: "Size",                   kind: PropKind::UDim2,   doc: "Size as a fraction of the parent plus a pixel offset, per axis. Defaults to 100×30 px." },
    PropInfo { name: "Position",               kind: PropKind::UDim2,   doc: "Top-left corner relative to the parent, as scale plus pixel offset." },
    PropInfo { name: "BackgroundColor3",       kind: PropKind::Color3,  doc: "Fill color." },
    PropInfo { name: "BackgroundTransparency", kind: PropKind::Number,  doc: "0 is opaque, 1 is invisible." },
    PropInfo { name: "BorderSizePixel",        kind: PropKind::Integer, doc: "Border width in pixels." },
];

const TEXT_PROPS: &[PropInfo] = &[
    PropInfo { name: "Text",       kind: PropKind::String,  doc: "Displayed text." },
    PropInfo { name: "TextColor3", kind: PropKind::Color3,  doc: "Text color. Defaults to white." },
    PropInfo { name: "TextSize",   kind: PropKind::Integer, doc: "Font size in pixels. Defaults to 14." },
];

const IMAGE_PROPS: &[PropInfo] = &[
    PropInfo { name: "Image", kind: PropKind::String, doc: "Image asset, usually `rbxassetid://<id>`." },
];

// ── Class registry ────────────────────────────────────────────────────────

pub static CLASSES: &[ClassInfo] = &[
    ClassInfo {
        name: "Frame",
        doc: "A plain rectangle. The usual container for grouping other elements.",
        is_element: true,
        props: BASE_PROPS,
    },
    ClassInfo {
        name: "ScrollingFrame",
        doc: "A frame whose contents can scroll. Previewed like a frame.",
        is_element: true,
        props: BASE_PROPS,
    },
    ClassInfo {
        name: "TextLabel",
        doc: "Non-interactive text, left-aligned in the preview.",
        is_element: true,
        props: &[
            BASE_PROPS[0], BASE_PROPS[1], BASE_PROPS[2], BASE_PROPS[3], BASE_PROPS[4], BASE_PROPS[5], BASE_PROPS[6],
            TEXT_PROPS[0], TEXT_PROPS[1], TEXT_PROPS[2],
        ],
    },
    ClassInfo {
        name: "TextButton",
        doc: "Clickable text.",
        is_element: true,
        props: &[
            BASE_PROPS[0], BASE_PROPS[1], BASE_PROPS[2], BASE_PROPS[3], BASE_PROPS[4], BASE_PROPS[5], BASE_PROPS[6],
            TEXT_PROPS[0], TEXT_PROPS[1], TEXT_PROPS[2],
        ],
    },
    ClassInfo {
        name: "ImageLabel",
        doc: "Displays an image. Asset ids preview as a placeholder tile.",
        is_element: true,
        props: &[
            BASE_PROPS[0], BASE_PROPS[1], BASE_PROPS[2], BASE_PROPS[3], BASE_PROPS[4], BASE_PROPS[5], BASE_PROPS[6],
            IMAGE_PROPS[0],
        ],
    },
    ClassInfo {
        name: "ImageButton",
        doc: "Clickable image.",
        is_element: true,
        props: &[
            BASE_PROPS[0], BASE_PROPS[1], BASE_PROPS[2], BASE_PROPS[3], BASE_PROPS[4], BASE_PROPS[5], BASE_PROPS[6],
            IMAGE_PROPS[0],
        ],
    },
    ClassInfo {
        name: "ScreenGui",
        doc: "Top-level container. Elements parented to it are root elements.",
        is_element: false,
        props: &[BASE_PROPS[0], BASE_PROPS[1]],
    },
    ClassInfo {
        name: "UICorner",
        doc: "Rounds the corners of its parent element.",
        is_element: false,
        props: &[
            PropInfo { name: "CornerRadius", kind: PropKind::UDim, doc: "Corner radius; the pixel offset is used." },
            BASE_PROPS[1],
        ],
    },
];

// ── Lookup helpers ────────────────────────────────────────────────────────

pub fn class_by_name(name: &str) -> Option<&'static ClassInfo> {
    CLASSES.iter().find(|c| c.name == name)
}

pub fn prop_in_class(class: &str, prop: &str) -> Option<&'static PropInfo> {
    class_by_name(class)?.props.iter().find(|p| p.name == prop)
}

/// A property by name on any class, for bindings whose class is unknown.
pub fn any_prop(prop: &str) -> Option<&'static PropInfo> {
    CLASSES.iter().flat_map(|c| c.props.iter()).find(|p| p.name == prop)
}
