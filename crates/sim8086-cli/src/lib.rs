//! Command-line support for the sim8086 register-move decoder.

/// Program loading and CLI error types.
pub mod loader;
/// Text rendering for dumps, banners, listings, and trace output.
pub mod report;

#[cfg(test)]
use tempfile as _;
