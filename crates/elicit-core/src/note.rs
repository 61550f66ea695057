//! Note creation on top of configuration resolution
//!
//! A note configuration must contain `path` and `filename` elements. Once
//! they are resolved, the file currently being materialized by the host is
//! moved to `<path>/<filename>`, unless `<path>/<filename><ext>` already
//! exists.
//!
//! Errors are not caught here; callers are expected to report them.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::{Error, Result, SchemaError};
use crate::orchestrator::Resolver;
use crate::resolution::Resolution;
use crate::schema;

/// Extension appended when checking for an existing note.
pub const DEFAULT_EXTENSION: &str = ".md";

/// File operations needed to place a note.
#[async_trait]
pub trait NoteFiles: Send + Sync {
    /// Handle to a file of the host.
    type Handle: Send;

    /// Whether a file exists at `path` (including its extension).
    async fn exists(&self, path: &str) -> io::Result<bool>;

    /// The file currently being materialized.
    async fn current_file(&self) -> io::Result<Self::Handle>;

    /// Move `file` to `destination`, given without extension; the file keeps
    /// its own extension. Returns the handle of the moved file.
    async fn move_to(&self, destination: &str, file: Self::Handle) -> io::Result<Self::Handle>;
}

/// Resolves note configurations and places the resulting note.
pub struct NoteCreator<F> {
    files: F,
    resolver: Resolver,
    extension: String,
}

impl<F: NoteFiles> NoteCreator<F> {
    pub fn new(files: F, resolver: Resolver) -> Self {
        Self {
            files,
            resolver,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    /// Resolve `config` in place, then place the note.
    pub async fn create(&self, config: &mut Configuration) -> Result<F::Handle> {
        schema::validate_note_elements(config)?;
        let elements = schema::validate_elements(config)?;

        let mut resolution = Resolution::new();
        let result = self.resolver.run(&elements, &mut resolution).await;
        config.apply(&resolution);
        result?;

        self.place(&resolution).await
    }

    /// Place a note for an already resolved configuration.
    pub async fn place(&self, resolution: &Resolution) -> Result<F::Handle> {
        let path = note_text(resolution, "path")?;
        let filename = note_text(resolution, "filename")?;

        let destination = note_destination(path, filename);
        let full_path = format!("{}{}", destination, self.extension);
        if self.files.exists(&full_path).await? {
            return Err(Error::FileConflict {
                name: filename.to_string(),
                path: full_path,
            });
        }

        debug!(%destination, "Moving current file");
        let file = self.files.current_file().await?;
        let moved = self.files.move_to(&destination, file).await?;
        info!(%full_path, "Created note");
        Ok(moved)
    }
}

/// `<path>/<filename>`, or just the filename when `path` is empty.
fn note_destination(path: &str, filename: &str) -> String {
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", path, filename)
    }
}

fn note_text<'a>(resolution: &'a Resolution, key: &str) -> Result<&'a str> {
    match resolution.get(key) {
        None => Err(SchemaError::MissingElement {
            key: key.to_string(),
        }
        .into()),
        Some(value) => value.as_text().ok_or_else(|| {
            SchemaError::InvalidProperty {
                key: key.to_string(),
                property: "value",
                reason: "must resolve to text".to_string(),
            }
            .into()
        }),
    }
}

/// [`NoteFiles`] over a directory on disk.
///
/// Paths are relative to `root`. The current file is a staged file, which
/// keeps its extension when moved.
#[derive(Debug, Clone)]
pub struct FsNoteFiles {
    root: PathBuf,
    staged: PathBuf,
}

impl FsNoteFiles {
    pub fn new(root: impl Into<PathBuf>, staged: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staged: staged.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a note path onto the root. Absolute paths and `..` are refused
    /// so that notes stay inside the root.
    fn within_root(&self, relative: &str) -> io::Result<PathBuf> {
        let relative = Path::new(relative);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::RootDir | Component::Prefix(_) | Component::ParentDir
            )
        });
        if escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("note path leaves the root directory: {}", relative.display()),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl NoteFiles for FsNoteFiles {
    type Handle = PathBuf;

    async fn exists(&self, path: &str) -> io::Result<bool> {
        tokio::fs::try_exists(self.within_root(path)?).await
    }

    async fn current_file(&self) -> io::Result<PathBuf> {
        if tokio::fs::try_exists(&self.staged).await? {
            Ok(self.staged.clone())
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("staged file not found: {}", self.staged.display()),
            ))
        }
    }

    async fn move_to(&self, destination: &str, file: PathBuf) -> io::Result<PathBuf> {
        let mut target = self.within_root(destination)?;
        if let Some(ext) = file.extension() {
            let mut name = target.file_name().unwrap_or_default().to_os_string();
            name.push(".");
            name.push(ext);
            target.set_file_name(name);
        }
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(&file, &target).await?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::AcceptDefaults;
    use crate::value::Value;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn creator(temp: &TempDir) -> NoteCreator<FsNoteFiles> {
        let staged = temp.path().join("staged.md");
        std::fs::write(&staged, "# body").unwrap();
        NoteCreator::new(
            FsNoteFiles::new(temp.path(), staged),
            Resolver::new(Arc::new(AcceptDefaults)),
        )
    }

    fn note(path: &str, filename: &str) -> Resolution {
        let mut resolution = Resolution::new();
        resolution.insert("path", Value::from(path));
        resolution.insert("filename", Value::from(filename));
        resolution
    }

    #[tokio::test]
    async fn test_place_moves_staged_file() {
        let temp = TempDir::new().unwrap();
        let creator = creator(&temp);

        let moved = creator.place(&note("Notes/2024", "Meeting")).await.unwrap();

        assert_eq!(moved, temp.path().join("Notes/2024/Meeting.md"));
        assert_eq!(std::fs::read_to_string(&moved).unwrap(), "# body");
        assert!(!temp.path().join("staged.md").exists());
    }

    #[tokio::test]
    async fn test_place_refuses_existing_note() {
        let temp = TempDir::new().unwrap();
        let creator = creator(&temp);
        std::fs::create_dir_all(temp.path().join("Notes")).unwrap();
        std::fs::write(temp.path().join("Notes/Meeting.md"), "old").unwrap();

        let err = creator.place(&note("Notes", "Meeting")).await.unwrap_err();

        assert_eq!(err.to_string(), "Note 'Meeting' already exists.");
        assert!(temp.path().join("staged.md").exists());
    }

    #[tokio::test]
    async fn test_place_with_empty_path_stays_in_root() {
        let temp = TempDir::new().unwrap();
        let creator = creator(&temp);

        let moved = creator.place(&note("", "Meeting")).await.unwrap();

        assert_eq!(moved, temp.path().join("Meeting.md"));
        assert!(moved.exists());
    }

    #[tokio::test]
    async fn test_place_refuses_paths_outside_root() {
        let temp = TempDir::new().unwrap();
        let creator = creator(&temp);

        for path in ["/tmp", "Notes/../..", ".."] {
            let err = creator.place(&note(path, "Meeting")).await.unwrap_err();
            assert!(
                matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::InvalidInput),
                "{}: {:?}",
                path,
                err
            );
        }
        assert!(temp.path().join("staged.md").exists());
    }

    #[test]
    fn test_note_destination() {
        assert_eq!(note_destination("Notes/2024", "Meeting"), "Notes/2024/Meeting");
        assert_eq!(note_destination("Notes/", "Meeting"), "Notes/Meeting");
        assert_eq!(note_destination("", "Meeting"), "Meeting");
    }

    #[tokio::test]
    async fn test_place_requires_text_path() {
        let temp = TempDir::new().unwrap();
        let creator = creator(&temp);
        let mut resolution = note("Notes", "Meeting");
        resolution.insert("path", Value::from(vec!["a", "b"]));

        assert!(matches!(
            creator.place(&resolution).await,
            Err(Error::Schema(SchemaError::InvalidProperty { .. }))
        ));
    }
}
