use crate::config::FilterConfig;
use crate::error::{LangExtractError, Result};
use crate::extractor::object_store::ObjectStore;
use crate::index::{AssetIndex, LangEntry, Version};
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    pub logical_path: String,
    pub destination: PathBuf,
    pub hash: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_processed: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub copied: Vec<CopiedFile>,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_processed: 0,
            current_file: None,
            start_time: Instant::now(),
            copied: Vec::new(),
        }
    }

    pub fn record(&mut self, file: CopiedFile) {
        self.files_processed += 1;
        self.bytes_processed += file.size;
        self.current_file = Some(file.logical_path.clone());
        self.copied.push(file);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

pub struct FileOperations {
    verify_size: bool,
    preserve_mtime: bool,
    buffer_size: usize,
}

impl FileOperations {
    pub fn new() -> Self {
        Self {
            verify_size: true,
            preserve_mtime: true,
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }

    pub fn with_verify_size(mut self, verify: bool) -> Self {
        self.verify_size = verify;
        self
    }

    pub fn with_preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096); // Minimum 4KB buffer
        self
    }

    /// Copy every entry out of `store` into `output_root`.
    ///
    /// The first failure aborts the run; files already copied stay in place
    /// and nothing after the failing entry is written. With the `parallel`
    /// feature, copies already in flight when the failure occurs may still
    /// complete.
    pub fn extract_entries(
        &self,
        entries: &[LangEntry],
        store: &ObjectStore,
        output_root: &Path,
        progress_callback: Option<&(dyn Fn(&ExtractionProgress) + Sync)>,
    ) -> Result<ExtractionProgress> {
        fs::create_dir_all(output_root).map_err(|e| LangExtractError::from_io(e, output_root))?;

        #[cfg(feature = "parallel")]
        let progress = {
            use rayon::prelude::*;
            use std::sync::Mutex;

            let shared = Mutex::new(ExtractionProgress::new(entries.len()));
            entries.par_iter().try_for_each(|entry| {
                let file = self.copy_entry(entry, store, output_root)?;
                let mut progress = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                progress.record(file);
                if let Some(callback) = progress_callback {
                    callback(&progress);
                }
                Ok::<(), LangExtractError>(())
            })?;

            let mut progress = shared.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
            progress.copied.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
            progress
        };

        #[cfg(not(feature = "parallel"))]
        let progress = {
            let mut progress = ExtractionProgress::new(entries.len());
            for entry in entries {
                if let Some(callback) = progress_callback {
                    callback(&progress);
                }

                let file = self.copy_entry(entry, store, output_root)?;
                progress.record(file);
            }
            progress
        };

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    pub fn copy_entry(
        &self,
        entry: &LangEntry,
        store: &ObjectStore,
        output_root: &Path,
    ) -> Result<CopiedFile> {
        if !store.contains(&entry.hash) {
            return Err(LangExtractError::ObjectNotFound {
                path: store.object_path(&entry.hash).display().to_string(),
                logical_path: entry.logical_path.clone(),
            });
        }
        let source = store.object_path(&entry.hash);

        let dest = output_root.join(&entry.destination);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| LangExtractError::from_io(e, parent))?;
        }

        let size = self.copy_file_with_buffer(&source, &dest)?;

        if self.verify_size {
            if let Some(expected) = entry.size.filter(|&expected| expected != size) {
                let _ = fs::remove_file(&dest);
                return Err(LangExtractError::SizeMismatch {
                    logical_path: entry.logical_path.clone(),
                    expected,
                    actual: size,
                });
            }
        }

        tracing::debug!(
            logical_path = %entry.logical_path,
            dest = %dest.display(),
            bytes = size,
            "copied asset object"
        );

        Ok(CopiedFile {
            logical_path: entry.logical_path.clone(),
            destination: entry.destination.clone(),
            hash: entry.hash.clone(),
            size,
        })
    }

    fn copy_file_with_buffer(&self, source: &Path, dest: &Path) -> Result<u64> {
        let source_file = fs::File::open(source).map_err(|e| LangExtractError::from_io(e, source))?;
        let dest_file = fs::File::create(dest).map_err(|e| LangExtractError::from_io(e, dest))?;

        let mut reader = BufReader::with_capacity(self.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size, dest_file);

        let total_bytes = std::io::copy(&mut reader, &mut writer)
            .map_err(|e| LangExtractError::from_io(e, dest))?;
        writer.flush().map_err(|e| LangExtractError::from_io(e, dest))?;

        if self.preserve_mtime {
            if let Ok(modified_time) = fs::metadata(source).and_then(|m| m.modified()) {
                let _ = filetime::set_file_mtime(
                    dest,
                    filetime::FileTime::from_system_time(modified_time),
                );
            }
        }

        Ok(total_bytes)
    }
}

impl Default for FileOperations {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy the default localization entries of one asset index.
///
/// `object_store_root` is the directory holding `objects/`, usually
/// `<game dir>/assets`. The version is parsed from the index file stem.
pub fn extract(
    manifest_path: &Path,
    object_store_root: &Path,
    output_dir: &Path,
) -> Result<(Version, usize)> {
    let version = manifest_path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse::<Version>().ok())
        .ok_or_else(|| LangExtractError::Parse {
            path: manifest_path.display().to_string(),
            message: "file name is not a version".to_string(),
        })?;

    let index = AssetIndex::load(manifest_path)?;
    let entries = index.lang_entries(&FilterConfig::default())?;
    let store = ObjectStore::new(object_store_root.join("objects"));

    let progress = FileOperations::new().extract_entries(&entries, &store, output_dir, None)?;
    Ok((version, progress.files_processed))
}
