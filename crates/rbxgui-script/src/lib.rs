//! Element model, extractor, and generator for Roblox-style Lua GUI scripts.
//!
//! The two directions share one document model:
//!
//! - [`extract`] reads `Instance.new` / property / `Parent` statements into an
//!   ordered forest of [`Element`]s, skipping anything it does not recognize.
//! - [`generate`] writes a forest back out as statements that [`extract`]
//!   reads to an equal forest.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | `Element`, `ElementKind`, `UDim`, `UDim2`, `Color3` |
//! | [`defaults`] | Default values and per-kind default shapes |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`statement`] | Statement splitting and the construction grammar |
//! | [`value`] | Property-value sub-grammars |
//! | [`extract`](mod@extract) | `extract`, `try_extract`, `ExtractOptions` |
//! | [`generate`](mod@generate) | `generate`, `generate_with`, `GenerateOptions` |
//! | [`error`] | `ExtractError` |
//!
//! # Quick start
//!
//! ```rust
//! use rbxgui_script::{extract, generate, ElementKind};
//!
//! let src = r#"
//!     local f = Instance.new("Frame")
//!     f.Size = UDim2.new(0.4, 0, 0.6, 0)
//!     f.Parent = gui
//! "#;
//!
//! let forest = extract(src);
//! assert_eq!(forest[0].kind, ElementKind::Frame);
//! assert_eq!(extract(&generate(&forest, "gui", "PlayerGui")), forest);
//! ```

pub mod defaults;
pub mod error;
pub mod extract;
pub mod generate;
pub mod lexer;
pub mod model;
pub mod statement;
pub mod value;

pub use error::ExtractError;
pub use extract::{extract, try_extract, ExtractOptions, DEFAULT_MAX_DEPTH};
pub use generate::{generate, generate_with, GenerateOptions};
pub use model::{find_by_name, Axis, Channel, Color3, Element, ElementKind, UDim, UDim2};

/// A complete sample script: a framed panel with a title and two buttons.
pub const EXAMPLE_SCRIPT: &str = include_str!("../assets/example.lua");
