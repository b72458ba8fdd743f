use clap::Parser;
use langextract::{
    Cli, HostEnv, HostOs, LangExtract, LangExtractError, OutputFormatter, OutputMode,
    UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let env = HostEnv::from_process();
    let app = match LangExtract::from_cli(&cli, HostOs::current(), &env) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    if cli.dry_run {
        return handle_dry_run(&app);
    }

    match app.extract_translations() {
        Ok(report) => {
            app.output_formatter().print_extraction_report(&report);

            if let Some(ref report_path) = cli.report {
                if let Err(e) = report.save_json(report_path) {
                    app.handle_error(&e);
                    return e.exit_code();
                }
            }
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "extraction failed");
            app.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "langextract.toml".to_string());

    match LangExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  langextract --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            e.exit_code()
        }
    }
}

fn handle_dry_run(app: &LangExtract) -> i32 {
    let formatter = app.output_formatter();

    formatter.info("DRY RUN MODE - No files will be copied");

    match app.plan() {
        Ok((manifest, entries)) => {
            if formatter.mode() != OutputMode::Json {
                println!(
                    "Would extract {} translation files for {} into {}:",
                    entries.len(),
                    manifest.version,
                    app.config().output.directory.display()
                );
            }
            formatter.print_plan(&entries);
            0
        }
        Err(e) => {
            app.handle_error(&e);
            e.exit_code()
        }
    }
}

fn print_startup_error(error: &LangExtractError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let default_directive = match verbosity {
        0 => "langextract=warn",
        1 => "langextract=info",
        _ => "langextract=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
