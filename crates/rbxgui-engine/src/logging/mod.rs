//! Logging utilities.
//!
//! Every binary in the workspace initializes its logger here, so filter
//! handling is the same for the CLI and the language server. Library crates
//! only use the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
