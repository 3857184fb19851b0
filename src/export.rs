//! Exported files, ready to be offered as a download or saved to disk

use std::path::{Path, PathBuf};

use crate::config::{ICS_FILE_NAME, ICS_MIME_TYPE};
use crate::error::PlannerResult;

/// An iCal document, and how it should be offered to the user
#[derive(Clone, Debug, PartialEq)]
pub struct IcsExport {
    file_name: String,
    mime_type: &'static str,
    content: String,
}

impl IcsExport {
    /// Wrap an iCal document, to be saved as `deadlines.ics`
    pub fn new(content: String) -> Self {
        Self {
            file_name: ICS_FILE_NAME.to_string(),
            mime_type: ICS_MIME_TYPE,
            content,
        }
    }

    /// Use another file name. It is sanitized, and `.ics` is appended when missing.
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        let sanitized = sanitize_filename::sanitize(file_name.trim());
        if sanitized.is_empty() {
            log::warn!("Invalid file name {:?}, keeping {}", file_name, self.file_name);
            return self;
        }

        self.file_name = if sanitized.to_lowercase().ends_with(".ics") {
            sanitized
        } else {
            format!("{}.ics", sanitized)
        };
        self
    }

    pub fn file_name(&self) -> &str      { &self.file_name }
    pub fn mime_type(&self) -> &str      { self.mime_type }
    pub fn content(&self) -> &str        { &self.content }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Write this export into `folder` (which is created if needed), and return the path of the written file
    pub fn save_to_folder(&self, folder: &Path) -> PlannerResult<PathBuf> {
        std::fs::create_dir_all(folder)?;
        let path = folder.join(&self.file_name);
        std::fs::write(&path, self.content.as_bytes())?;
        log::info!("Saved {} ({} bytes)", path.display(), self.content.len());
        Ok(path)
    }
}
