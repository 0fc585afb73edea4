//! CLI interface for libenigma
//!
//! Reads a machine configuration, then applies settings lines and converts
//! messages from an input stream.

pub mod args;
pub mod commands;
pub mod detect;

pub use args::{Cli, ConfigFormat};
pub use detect::{detect_format, DetectionMethod, FormatDetection};
