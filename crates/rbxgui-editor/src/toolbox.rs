//! The palette of element kinds a user can add.

use rbxgui_script::{defaults, Element, ElementKind};

/// One toolbox button.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolboxEntry {
    pub kind: ElementKind,
    pub label: &'static str,
    pub icon: &'static str,
}

impl ToolboxEntry {
    const fn new(kind: ElementKind, label: &'static str, icon: &'static str) -> Self {
        Self { kind, label, icon }
    }

    /// The element this entry adds, before it is given a name.
    pub fn shape(&self) -> Element {
        defaults::shape(&self.kind)
    }
}

/// Toolbox contents, in display order.
pub const TOOLBOX: [ToolboxEntry; 6] = [
    ToolboxEntry::new(ElementKind::Frame, "Frame", "⬜"),
    ToolboxEntry::new(ElementKind::TextLabel, "Text Label", "📝"),
    ToolboxEntry::new(ElementKind::TextButton, "Text Button", "🔘"),
    ToolboxEntry::new(ElementKind::ImageLabel, "Image", "🖼️"),
    ToolboxEntry::new(ElementKind::ImageButton, "Image Button", "🖱️"),
    ToolboxEntry::new(ElementKind::ScrollingFrame, "Scrolling Frame", "📜"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_known_kind_once() {
        let kinds: Vec<ElementKind> = TOOLBOX.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(kinds, ElementKind::KNOWN.to_vec());
    }

    #[test]
    fn button_shape() {
        let button = TOOLBOX[2].shape();
        assert_eq!(button.text.as_deref(), Some("Button"));
        assert!(button.kind.is_button());
    }
}
