//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Base tile store management (clear, stats)
//! - [`init`] - Configuration initialization
//! - [`prewarm`] - Bulk base-tile rendering
//! - [`render`] - Single tile rendering

pub mod cache;
pub mod common;
pub mod init;
pub mod prewarm;
pub mod render;
