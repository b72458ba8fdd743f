use crate::error::{LangExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "minecraft/lang";
pub const DEFAULT_STRIP_PREFIX: &str = "minecraft/lang/";
pub const DEFAULT_OUTPUT_DIR: &str = "translations";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Game data directory. Resolved per platform when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    pub indexes_dir: PathBuf,
    pub objects_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub prefix: String,
    pub strip_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub verify_size: bool,
    pub preserve_mtime: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: None,
            indexes_dir: PathBuf::from("assets").join("indexes"),
            objects_dir: PathBuf::from("assets").join("objects"),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            strip_prefix: DEFAULT_STRIP_PREFIX.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            verify_size: true,
            preserve_mtime: true,
        }
    }
}

impl SourceConfig {
    pub fn indexes_path(&self, root: &Path) -> PathBuf {
        root.join(&self.indexes_dir)
    }

    /// Object store root; objects live under `<store>/<hh>/<hash>`.
    pub fn objects_path(&self, root: &Path) -> PathBuf {
        root.join(&self.objects_dir)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LangExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| LangExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| LangExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["langextract.toml", ".langextract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref root) = cli_args.source_root {
            self.source.root = Some(root.clone());
        }

        if let Some(ref prefix) = cli_args.prefix {
            let prefix = prefix.trim_end_matches('/');
            self.filter.prefix = prefix.to_string();
            self.filter.strip_prefix = format!("{}/", prefix);
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = output_dir.clone();
        }

        if let Some(verify) = cli_args.verify_size {
            self.output.verify_size = verify;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| LangExtractError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| LangExtractError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filter.prefix.is_empty() {
            return Err(LangExtractError::Config {
                message: "The logical path prefix must not be empty".to_string(),
            });
        }

        if !self.filter.strip_prefix.starts_with(&self.filter.prefix) {
            return Err(LangExtractError::Config {
                message: format!(
                    "strip_prefix {:?} must start with prefix {:?}",
                    self.filter.strip_prefix, self.filter.prefix
                ),
            });
        }

        for (name, dir) in [
            ("indexes_dir", &self.source.indexes_dir),
            ("objects_dir", &self.source.objects_dir),
        ] {
            if dir.is_absolute() {
                return Err(LangExtractError::Config {
                    message: format!(
                        "{} must be relative to the game directory: {}",
                        name,
                        dir.display()
                    ),
                });
            }
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(LangExtractError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub source_root: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub verify_size: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_root(mut self, root: Option<PathBuf>) -> Self {
        self.source_root = root;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_verify_size(mut self, verify: Option<bool>) -> Self {
        self.verify_size = verify;
        self
    }
}
