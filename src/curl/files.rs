use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::DescriptorError;

/// Contents of `@file` payloads, read from disk once per path.
///
/// The lock is never held while reading a file.
#[derive(Debug, Default)]
pub struct BodyFiles {
    cache: Mutex<HashMap<PathBuf, Arc<[u8]>>>,
}

impl BodyFiles {
    /// Returns the cached bytes for `path`, reading the file on first use.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub fn read(&self, path: &Path) -> Result<Arc<[u8]>, DescriptorError> {
        if let Ok(cache) = self.cache.lock()
            && let Some(bytes) = cache.get(path)
        {
            return Ok(Arc::clone(bytes));
        }

        let bytes: Arc<[u8]> = std::fs::read(path)
            .map_err(|err| DescriptorError::ReadBodyFile {
                path: path.to_path_buf(),
                source: err,
            })?
            .into();
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(path.to_path_buf(), Arc::clone(&bytes));
        }
        Ok(bytes)
    }

    /// Number of distinct files read so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
