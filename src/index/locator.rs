use crate::error::{LangExtractError, Result};
use crate::index::version::Version;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const INDEX_EXTENSION: &str = "json";

/// The asset index chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRef {
    #[serde(serialize_with = "serialize_display")]
    pub version: Version,
    pub path: PathBuf,
}

fn serialize_display<S: serde::Serializer>(
    version: &Version,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(version)
}

/// Pick the file name whose stem parses to the greatest [`Version`].
///
/// Names without a `.json` extension (any case) or with a stem that is not
/// a version are ignored. Equal versions (`1.0.json`, `1.0.0.json`,
/// `3.JSON`, `3.json`) resolve to the lexicographically largest name so the
/// result never depends on directory iteration order.
pub fn select_latest<I, S>(names: I) -> Option<(String, Version)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let stem = strip_index_extension(name)?;
            let version = stem.parse::<Version>().ok()?;
            Some((name.to_string(), version))
        })
        .max_by(|(name_a, ver_a), (name_b, ver_b)| ver_a.cmp(ver_b).then_with(|| name_a.cmp(name_b)))
}

fn strip_index_extension(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(INDEX_EXTENSION.len() + 1)?;
    let (stem, ext) = (name.get(..split)?, name.get(split..)?);
    match ext.strip_prefix('.') {
        Some(ext) if ext.eq_ignore_ascii_case(INDEX_EXTENSION) => Some(stem),
        _ => None,
    }
}

pub struct IndexLocator {
    indexes_dir: PathBuf,
}

impl IndexLocator {
    pub fn new<P: Into<PathBuf>>(indexes_dir: P) -> Self {
        Self {
            indexes_dir: indexes_dir.into(),
        }
    }

    pub fn indexes_dir(&self) -> &Path {
        &self.indexes_dir
    }

    /// File names of the `*.json` files directly inside the index directory.
    pub fn candidate_names(&self) -> Result<Vec<String>> {
        let dir = &self.indexes_dir;

        if !dir.is_dir() {
            return Err(LangExtractError::NoManifest {
                dir: dir.display().to_string(),
            });
        }

        let mut names = Vec::new();
        let walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => match err.io_error().map(|e| e.kind()) {
                    // Dangling symlink or a file removed mid-scan
                    Some(std::io::ErrorKind::NotFound) => {
                        tracing::debug!(error = %err, "skipping unreadable index entry");
                        continue;
                    }
                    Some(std::io::ErrorKind::PermissionDenied) => {
                        return Err(LangExtractError::Permission {
                            path: err.path().unwrap_or(dir).display().to_string(),
                        });
                    }
                    _ => {
                        return Err(LangExtractError::Io(std::io::Error::new(
                            std::io::ErrorKind::Other,
                            err.to_string(),
                        )));
                    }
                },
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let is_json = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(INDEX_EXTENSION));
            if !is_json {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    pub fn select_latest(&self) -> Result<ManifestRef> {
        let names = self.candidate_names()?;
        tracing::debug!(count = names.len(), dir = %self.indexes_dir.display(), "scanned asset indexes");

        let (selected, version) =
            select_latest(&names).ok_or_else(|| LangExtractError::NoManifest {
                dir: self.indexes_dir.display().to_string(),
            })?;

        tracing::info!(%version, file = %selected, "selected asset index");

        Ok(ManifestRef {
            version,
            path: self.indexes_dir.join(selected),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_select_latest_is_numeric() {
        let (name, version) = select_latest(["1.9.json", "1.10.json", "1.2.json"]).unwrap();
        assert_eq!(name, "1.10.json");
        assert_eq!(version.to_string(), "1.10");
    }

    #[test]
    fn test_select_latest_skips_non_versions() {
        let (name, _) =
            select_latest(["legacy.json", "pre-1.6.json", "5.json", "17.json", "notes.txt"]).unwrap();
        assert_eq!(name, "17.json");
    }

    #[test]
    fn test_select_latest_none_when_nothing_parses() {
        assert!(select_latest(["legacy.json", "readme.md"]).is_none());
        assert!(select_latest(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_equal_versions_break_ties_by_name() {
        let (name, _) = select_latest(["1.0.json", "1.0.0.json"]).unwrap();
        assert_eq!(name, "1.0.json");

        let (name, _) = select_latest(["1.0.0.json", "1.0.json"]).unwrap();
        assert_eq!(name, "1.0.json");
    }

    #[test]
    fn test_extension_case_ties_are_order_independent() {
        let (name, _) = select_latest(["3.JSON", "3.json"]).unwrap();
        assert_eq!(name, "3.json");

        let (name, _) = select_latest(["3.json", "3.JSON"]).unwrap();
        assert_eq!(name, "3.json");

        assert!(select_latest(["json", ".json", "3.jsonx"]).is_none());
    }

    #[test]
    fn test_locator_scans_directory() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["1.9.json", "1.10.json", "1.2.json", "legacy.json"] {
            fs::write(temp_dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(temp_dir.path().join("99.json")).unwrap();

        let locator = IndexLocator::new(temp_dir.path());
        let manifest = locator.select_latest().unwrap();
        assert_eq!(manifest.version.to_string(), "1.10");
        assert_eq!(manifest.path, temp_dir.path().join("1.10.json"));
    }

    #[test]
    fn test_locator_uppercase_extension() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("3.JSON"), "{}").unwrap();
        fs::write(temp_dir.path().join("2.json"), "{}").unwrap();

        let manifest = IndexLocator::new(temp_dir.path()).select_latest().unwrap();
        assert_eq!(manifest.path, temp_dir.path().join("3.JSON"));
    }

    #[test]
    fn test_locator_mixed_case_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("3.JSON"), "{}").unwrap();
        fs::write(temp_dir.path().join("3.json"), "{}").unwrap();

        let manifest = IndexLocator::new(temp_dir.path()).select_latest().unwrap();
        assert_eq!(manifest.path, temp_dir.path().join("3.json"));
    }

    #[test]
    #[cfg(unix)]
    fn test_dangling_symlink_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("1.10.json"), "{}").unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing.json"),
            temp_dir.path().join("old.json"),
        )
        .unwrap();

        let manifest = IndexLocator::new(temp_dir.path()).select_latest().unwrap();
        assert_eq!(manifest.version.to_string(), "1.10");
        assert_eq!(manifest.path, temp_dir.path().join("1.10.json"));
    }

    #[test]
    fn test_empty_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = IndexLocator::new(temp_dir.path()).select_latest().unwrap_err();
        assert!(matches!(err, LangExtractError::NoManifest { .. }));
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = IndexLocator::new(temp_dir.path().join("indexes"))
            .select_latest()
            .unwrap_err();
        assert!(matches!(err, LangExtractError::NoManifest { .. }));
    }
}
