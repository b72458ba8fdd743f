use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LangExtractError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No asset index found in {dir}")]
    NoManifest { dir: String },

    #[error("Asset object not found: {path} (for {logical_path})")]
    ObjectNotFound { path: String, logical_path: String },

    #[error("Failed to parse asset index {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Size mismatch for {logical_path}: expected {expected} bytes, copied {actual}")]
    SizeMismatch {
        logical_path: String,
        expected: u64,
        actual: u64,
    },
}

/// Coarse classification for callers that want to react to a failure
/// without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Permission,
    Io,
    Config,
    Integrity,
}

impl LangExtractError {
    /// Wrap an I/O error raised while touching `path`, promoting
    /// permission failures to their own variant.
    pub fn from_io(error: std::io::Error, path: &Path) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => LangExtractError::Permission {
                path: path.display().to_string(),
            },
            _ => LangExtractError::Io(error),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LangExtractError::NoManifest { .. } | LangExtractError::ObjectNotFound { .. } => {
                ErrorKind::NotFound
            }
            LangExtractError::Parse { .. } => ErrorKind::Parse,
            LangExtractError::Permission { .. } => ErrorKind::Permission,
            LangExtractError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorKind::Permission
            }
            LangExtractError::Io(_) | LangExtractError::InvalidPath { .. } => ErrorKind::Io,
            LangExtractError::Config { .. } => ErrorKind::Config,
            LangExtractError::SizeMismatch { .. } => ErrorKind::Integrity,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            LangExtractError::Config { .. } => 1,
            LangExtractError::NoManifest { .. } => 2,
            LangExtractError::ObjectNotFound { .. } => 3,
            LangExtractError::Parse { .. } => 4,
            LangExtractError::Permission { .. } => 5,
            LangExtractError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => 5,
            LangExtractError::Io(_) => 6,
            LangExtractError::InvalidPath { .. } => 7,
            LangExtractError::SizeMismatch { .. } => 8,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for LangExtractError {
    fn user_message(&self) -> String {
        match self {
            LangExtractError::NoManifest { dir } => {
                format!("No versioned asset index (<version>.json) found in {}", dir)
            }
            LangExtractError::ObjectNotFound { path, logical_path } => {
                format!("Missing asset object for {}: {}", logical_path, path)
            }
            LangExtractError::Parse { path, message } => {
                format!("Asset index {} is not valid: {}", path, message)
            }
            LangExtractError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            LangExtractError::SizeMismatch {
                logical_path,
                expected,
                actual,
            } => {
                format!(
                    "Copied {} for {} but the index lists {}",
                    format_bytes(*actual),
                    logical_path,
                    format_bytes(*expected)
                )
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            LangExtractError::NoManifest { .. } => Some(
                "Launch the game at least once so it downloads its assets, or point --minecraft-dir at the right data directory.".to_string()
            ),
            LangExtractError::ObjectNotFound { .. } => Some(
                "The asset store is incomplete. Start the matching game version once to let the launcher repair it.".to_string()
            ),
            LangExtractError::Parse { .. } => Some(
                "The index file may be truncated. Delete it and let the launcher download it again.".to_string()
            ),
            LangExtractError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            LangExtractError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the target directory.".to_string()
            ),
            LangExtractError::SizeMismatch { .. } => Some(
                "The stored object may be corrupted. Re-run with --no-verify-size to copy it anyway.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for LangExtractError {
    fn from(error: toml::de::Error) -> Self {
        LangExtractError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LangExtractError>;

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_user_friendly_messages() {
        let error = LangExtractError::NoManifest {
            dir: "/tmp/indexes".to_string(),
        };
        assert!(error.user_message().contains("/tmp/indexes"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
        assert_eq!(format_bytes(500), "500 B");
    }

    #[test]
    fn test_permission_promotion() {
        let path = PathBuf::from("/out/en_us.json");
        let error = LangExtractError::from_io(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            &path,
        );
        assert!(matches!(error, LangExtractError::Permission { .. }));
        assert_eq!(error.kind(), ErrorKind::Permission);

        let error = LangExtractError::from_io(io::Error::new(io::ErrorKind::Other, "boom"), &path);
        assert!(matches!(error, LangExtractError::Io(_)));
        assert_eq!(error.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_kinds_and_exit_codes() {
        let missing = LangExtractError::ObjectNotFound {
            path: "objects/ab/abcd".to_string(),
            logical_path: "minecraft/lang/en_us.json".to_string(),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.exit_code(), 3);

        let parse = LangExtractError::Parse {
            path: "17.json".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(parse.kind(), ErrorKind::Parse);
        assert_eq!(parse.exit_code(), 4);

        let no_manifest = LangExtractError::NoManifest {
            dir: "indexes".to_string(),
        };
        assert_eq!(no_manifest.kind(), ErrorKind::NotFound);
        assert_eq!(no_manifest.exit_code(), 2);
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = LangExtractError::from(toml_error);
        assert!(matches!(error, LangExtractError::Config { .. }));
    }
}
