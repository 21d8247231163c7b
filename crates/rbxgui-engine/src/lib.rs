//! rbxgui engine crate.
//!
//! Owns the pieces every front end shares: logger setup, the logical-pixel
//! geometry types, and [`layout::resolve`], which turns an element forest into
//! absolute rectangles with resolved paint.

pub mod coords;
pub mod layout;
pub mod logging;
