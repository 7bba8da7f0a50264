//! Writes creations to disk for viewing in a browser.
//!
//! Layout under the preview directory:
//!
//! - `{creation id}.html`: one file per creation shown
//! - `current.html`: the active creation, overwritten on every `show`

use codemax_application::ports::preview::{PreviewError, PreviewPort};
use codemax_domain::Creation;
use std::path::{Path, PathBuf};
use tracing::debug;

const CURRENT_FILE: &str = "current.html";

/// File-backed [`PreviewPort`]
#[derive(Debug, Clone)]
pub struct FilePreviewRenderer {
    dir: PathBuf,
}

impl FilePreviewRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding the active creation
    pub fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    pub fn creation_path(&self, creation: &Creation) -> PathBuf {
        self.dir.join(format!("{}.html", creation.id))
    }
}

impl PreviewPort for FilePreviewRenderer {
    fn show(&self, creation: &Creation) -> Result<(), PreviewError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.creation_path(creation), &creation.html)?;
        std::fs::write(self.current_path(), &creation.html)?;
        debug!(id = %creation.id, dir = %self.dir.display(), "Preview written");
        Ok(())
    }

    fn clear(&self) -> Result<(), PreviewError> {
        match std::fs::remove_file(self.current_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
