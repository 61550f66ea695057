//! [`MemoryFiles`] keeps note files in memory.

use std::collections::BTreeSet;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use elicit_core::NoteFiles;

/// In-memory [`NoteFiles`]. Handles are paths; the current file is
/// `current` and moving it appends its extension to the destination.
#[derive(Debug)]
pub struct MemoryFiles {
    files: Mutex<BTreeSet<String>>,
    current: String,
}

impl MemoryFiles {
    /// A file set containing only the current file.
    pub fn new(current: impl Into<String>) -> Self {
        let current = current.into();
        Self {
            files: Mutex::new(BTreeSet::from([current.clone()])),
            current,
        }
    }

    /// Add an existing file.
    pub fn with_file(self, path: impl Into<String>) -> Self {
        self.files.lock().unwrap().insert(path.into());
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl NoteFiles for MemoryFiles {
    type Handle = String;

    async fn exists(&self, path: &str) -> io::Result<bool> {
        Ok(self.contains(path))
    }

    async fn current_file(&self) -> io::Result<String> {
        Ok(self.current.clone())
    }

    async fn move_to(&self, destination: &str, file: String) -> io::Result<String> {
        let mut files = self.files.lock().unwrap();
        if !files.remove(&file) {
            return Err(io::Error::new(io::ErrorKind::NotFound, file));
        }
        let target = match file.rsplit_once('.') {
            Some((_, ext)) if !ext.contains('/') => format!("{}.{}", destination, ext),
            _ => destination.to_string(),
        };
        files.insert(target.clone());
        Ok(target)
    }
}
