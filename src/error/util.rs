//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(PipelineError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found: {} (needed for: {purpose})", path.display()),
        )));
    }

    if !path.is_file() {
        return Err(PipelineError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "path is not a file: {} (expected a file for: {purpose})",
                path.display()
            ),
        )));
    }

    match fs::File::open(path) {
        Ok(file) => Ok(file),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    format!("permission denied opening {}", path.display())
                }
                _ => format!("failed to open {} for: {purpose}", path.display()),
            };
            Err(PipelineError::Io(io::Error::new(e.kind(), context)))
        }
    }
}
