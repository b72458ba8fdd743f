use crate::error::{LangExtractError, Result};
use crate::extractor::{CopiedFile, ExtractionProgress};
use crate::index::ManifestRef;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub manifest: ManifestRef,
    pub output_directory: PathBuf,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub extraction_duration: Duration,
    pub extraction_time: DateTime<Utc>,
    pub files: Vec<CopiedFile>,
}

impl ExtractionReport {
    pub fn new(manifest: ManifestRef, output_directory: PathBuf, progress: &ExtractionProgress) -> Self {
        Self {
            manifest,
            output_directory,
            files_copied: progress.files_processed,
            bytes_copied: progress.bytes_processed,
            extraction_duration: progress.elapsed(),
            extraction_time: Utc::now(),
            files: progress.copied.clone(),
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Successfully extracted {} translation files for {}.",
            self.files_copied, self.manifest.version
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LangExtractError::Config {
            message: format!("Failed to serialize report to JSON: {}", e),
        })
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json_content = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LangExtractError::from_io(e, parent))?;
        }
        std::fs::write(path, json_content).map_err(|e| LangExtractError::from_io(e, path))?;

        Ok(())
    }
}
