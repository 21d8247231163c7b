//! rbxgui editor: an element forest kept in step with its source text.
//!
//! # Quick start
//!
//! ```rust
//! use rbxgui_editor::prelude::*;
//!
//! let mut doc = Document::from_source(rbxgui_script::EXAMPLE_SCRIPT).unwrap();
//!
//! // Add a button inside the first root element, then restyle it.
//! let button = doc.add_element(ElementKind::TextButton, Some(&ElementPath::root(0))).unwrap();
//! doc.apply(&button, Edit::SetText(Some("Quit".into()))).unwrap();
//!
//! // The source text follows every edit.
//! assert!(doc.source().contains("TextButton1.Text = \"Quit\""));
//! ```
//!
//! Text edits go the other way: hand the whole buffer to
//! [`Document::sync_from_source`] and the forest is re-extracted.

pub mod document;
pub mod edit;
pub mod error;
pub mod path;
pub mod toolbox;

pub use document::Document;
pub use edit::{ColorTarget, Edit, UDimPart};
pub use error::EditError;
pub use path::ElementPath;

/// Everything a front end needs to drive a document.
pub mod prelude {
    pub use crate::document::Document;
    pub use crate::edit::{ColorTarget, Edit, UDimPart};
    pub use crate::error::EditError;
    pub use crate::path::{all_paths, ElementPath};
    pub use crate::toolbox::{ToolboxEntry, TOOLBOX};

    pub use rbxgui_engine::coords::{Vec2, Viewport};
    pub use rbxgui_script::{Axis, Channel, Color3, Element, ElementKind, UDim, UDim2};
}
