//! Reads program files into memory.
//!
//! A loaded program carries the length its loader reported alongside the
//! bytes, so the decoder validates both the same way for every front end.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sim8086_core::DecodeFault;

/// Errors surfaced by the command-line driver.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The input file is too large to describe with a signed length.
    #[error("{} is too large to load ({len} bytes)", path.display())]
    TooLarge {
        /// Path that was opened.
        path: PathBuf,
        /// Byte length of the file.
        len: usize,
    },
    /// The instruction stream was malformed.
    #[error("malformed instruction stream: {0}")]
    Decode(#[from] DecodeFault),
}

/// A program image plus the length reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProgram {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Length handed to the decoder.
    pub reported_len: i64,
}

/// Reads `path` into a [`LoadedProgram`].
///
/// # Errors
///
/// Returns [`CliError::Read`] when the file cannot be read and
/// [`CliError::TooLarge`] when its length does not fit in an `i64`.
pub fn load_program(path: &Path) -> Result<LoadedProgram, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reported_len = i64::try_from(bytes.len()).map_err(|_| CliError::TooLarge {
        path: path.to_path_buf(),
        len: bytes.len(),
    })?;
    Ok(LoadedProgram {
        bytes,
        reported_len,
    })
}
