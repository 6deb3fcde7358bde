use std::fs::File;
use std::io::Read;

use tracing::debug;

use crate::error::{AppError, AppResult, DescriptorError};

/// Resolves the `--curl` value: a path that opens is read as the
/// descriptor, anything else is taken literally.
///
/// # Errors
///
/// Returns an error when the value is blank, or names a file that opens but
/// cannot be read.
pub fn resolve_descriptor(source: &str) -> AppResult<String> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(AppError::descriptor(DescriptorError::Empty));
    }

    let Ok(mut file) = File::open(trimmed) else {
        return Ok(trimmed.to_owned());
    };
    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|err| {
        AppError::descriptor(DescriptorError::Unreadable {
            descriptor: trimmed.to_owned(),
            source: err,
        })
    })?;
    debug!("descriptor read from {}", trimmed);

    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::descriptor(DescriptorError::Empty));
    }
    Ok(content.to_owned())
}
