pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod index;
pub mod platform;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, OutputConfig, SourceConfig};
pub use error::{ErrorKind, LangExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{extract, CopiedFile, ExtractionProgress, ExtractionReport, FileOperations, ObjectStore};
pub use index::{select_latest, AssetIndex, AssetObject, IndexLocator, LangEntry, ManifestRef, Version};
pub use platform::{default_game_dir, HostEnv, HostOs};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface: one configured extraction run.
pub struct LangExtract {
    config: Config,
    game_dir: PathBuf,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl LangExtract {
    /// `config.source.root` must already be resolved; see [`resolve_game_dir`].
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let game_dir = config.source.root.clone().ok_or_else(|| LangExtractError::Config {
            message: "No Minecraft directory configured".to_string(),
        })?;
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Ok(Self {
            config,
            game_dir,
            output_formatter,
            progress_manager,
        })
    }

    pub fn from_cli(cli_args: &Cli, os: HostOs, env: &HostEnv) -> Result<Self> {
        let mut config = cli_args.load_config(env)?;
        config.source.root = Some(resolve_game_dir(&config, os, env)?);
        config.output.directory = platform::expand_home(&config.output.directory, env);

        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    pub fn locate_index(&self) -> Result<ManifestRef> {
        let locator = IndexLocator::new(self.config.source.indexes_path(&self.game_dir));
        self.output_formatter.debug(&format!(
            "Scanning asset indexes in {}",
            locator.indexes_dir().display()
        ));
        locator.select_latest()
    }

    /// Select the index and list what would be copied, without writing.
    pub fn plan(&self) -> Result<(ManifestRef, Vec<LangEntry>)> {
        let manifest = self.locate_index()?;
        let index = AssetIndex::load(&manifest.path)?;
        let entries = index.lang_entries(&self.config.filter)?;

        self.output_formatter.debug(&format!(
            "{} of {} index entries match {}",
            entries.len(),
            index.len(),
            self.config.filter.prefix
        ));

        Ok((manifest, entries))
    }

    pub fn extract_translations(&self) -> Result<ExtractionReport> {
        self.output_formatter.start_operation("Locating the latest asset index");
        let (manifest, entries) = self.plan()?;
        self.output_formatter.info(&format!(
            "Using asset index {} ({} translation files)",
            manifest.version,
            entries.len()
        ));

        let output_dir = self.config.output.directory.clone();
        let store = ObjectStore::new(self.config.source.objects_path(&self.game_dir));

        self.output_formatter.start_operation("Copying translation files");
        let file_progress = self.progress_manager.create_file_progress(entries.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let file_ops = FileOperations::new()
            .with_verify_size(self.config.output.verify_size)
            .with_preserve_mtime(self.config.output.preserve_mtime);

        let result = file_ops.extract_entries(&entries, &store, &output_dir, Some(&progress_callback));
        let progress = match result {
            Ok(progress) => progress,
            Err(e) => {
                file_progress.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Copied {} files", progress.files_processed),
            progress.elapsed(),
        );

        Ok(ExtractionReport::new(manifest, output_dir, &progress))
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &LangExtractError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// The configured root if any, otherwise the platform default.
pub fn resolve_game_dir(config: &Config, os: HostOs, env: &HostEnv) -> Result<PathBuf> {
    match config.source.root {
        Some(ref root) => Ok(platform::expand_home(root, env)),
        None => default_game_dir(os, env).ok_or_else(|| LangExtractError::Config {
            message: "Cannot determine the default Minecraft directory; pass --minecraft-dir"
                .to_string(),
        }),
    }
}

/// Select the newest index under `<game_dir>/assets/indexes` and copy its
/// `minecraft/lang` entries into `output_dir`.
pub fn extract_translations(game_dir: &Path, output_dir: &Path) -> Result<(Version, usize)> {
    let source = SourceConfig::default();
    let manifest = IndexLocator::new(source.indexes_path(game_dir)).select_latest()?;
    let assets = game_dir.join("assets");

    let (_, count) = extract(&manifest.path, &assets, output_dir)?;
    Ok((manifest.version, count))
}
