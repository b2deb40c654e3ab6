//! Infrastructure adapters for configuration, editors, processes, and the filesystem.

pub mod ansi;
pub mod config;
pub mod editors;
pub mod logging;
pub mod process;
pub mod vcs;
