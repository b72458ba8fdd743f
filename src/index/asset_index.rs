use crate::config::FilterConfig;
use crate::error::{LangExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// An asset index document, `{"objects": {"<logical path>": {"hash": ..}}}`.
///
/// Fields other than `objects` (`virtual`, `map_to_resources`) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssetIndex {
    pub objects: BTreeMap<String, AssetObject>,
}

/// A manifest entry selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangEntry {
    pub logical_path: String,
    pub destination: PathBuf,
    pub hash: String,
    pub size: Option<u64>,
}

impl AssetIndex {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => LangExtractError::Permission {
                path: path.display().to_string(),
            },
            _ => LangExtractError::Parse {
                path: path.display().to_string(),
                message: format!("cannot read file: {}", e),
            },
        })?;

        Self::from_json(&content).map_err(|message| LangExtractError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Entries whose logical path starts with `filter.prefix`, in logical
    /// path order, each with its destination relative to the output root.
    ///
    /// An entry naming the prefix itself has nothing left after stripping
    /// and is skipped.
    pub fn lang_entries(&self, filter: &FilterConfig) -> Result<Vec<LangEntry>> {
        let mut entries = Vec::new();

        for (logical_path, object) in &self.objects {
            if !logical_path.starts_with(&filter.prefix) {
                continue;
            }

            let remainder = logical_path
                .strip_prefix(&filter.strip_prefix)
                .unwrap_or(logical_path);
            if remainder.is_empty() || remainder == filter.prefix.as_str() {
                continue;
            }

            validate_hash(&object.hash).map_err(|message| LangExtractError::Parse {
                path: logical_path.clone(),
                message,
            })?;

            entries.push(LangEntry {
                logical_path: logical_path.clone(),
                destination: relative_destination(remainder)?,
                hash: object.hash.clone(),
                size: object.size,
            });
        }

        Ok(entries)
    }
}

fn validate_hash(hash: &str) -> std::result::Result<(), String> {
    if hash.len() < 2 {
        return Err(format!("hash too short: {:?}", hash));
    }
    if !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("hash contains invalid characters: {:?}", hash));
    }
    Ok(())
}

fn relative_destination(remainder: &str) -> Result<PathBuf> {
    let path = PathBuf::from(remainder);

    // Security: the destination must stay inside the output directory
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || path.file_name().is_none() {
        return Err(LangExtractError::InvalidPath {
            path: format!("Destination escapes output directory: {}", remainder),
        });
    }

    Ok(path)
}
