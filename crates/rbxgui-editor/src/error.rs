use std::fmt;

use crate::path::ElementPath;

/// Why an edit was refused. A refused edit leaves the document unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// The path does not address an element of the current forest.
    NoSuchElement(ElementPath),
    /// Reparenting would put an element inside itself or its own subtree.
    CyclicReparent { path: ElementPath, new_parent: ElementPath },
    /// A numeric value that cannot be written back as a literal.
    NonFinite { field: &'static str },
    /// An integer too large to survive being written back as a number literal.
    OutOfRange { field: &'static str, value: u32, max: u32 },
    /// The edit would nest elements `depth` levels deep, past the document's
    /// [`ExtractOptions::max_depth`](rbxgui_script::ExtractOptions).
    TooDeep { depth: usize, limit: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NoSuchElement(path) => write!(f, "no element at path {}", path),
            EditError::CyclicReparent { path, new_parent } => write!(
                f,
                "cannot move element {} under {}: it is part of its own subtree",
                path, new_parent
            ),
            EditError::NonFinite { field } => write!(f, "{} must be a finite number", field),
            EditError::OutOfRange { field, value, max } => {
                write!(f, "{} of {} is out of range, at most {} is allowed", field, value, max)
            }
            EditError::TooDeep { depth, limit } => {
                write!(f, "elements would nest {} levels deep, limit is {}", depth, limit)
            }
        }
    }
}

impl std::error::Error for EditError {}
