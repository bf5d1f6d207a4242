//! stepline CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use stepline::cli::commands::display::error_chain;
use stepline::cli::{Cli, CommandDispatcher};
use stepline::config::{load_config, validate};
use stepline::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. `settings.log_level` from the config file, which is validated
///    before any command runs
/// 4. Default is INFO
fn init_tracing(debug: bool, config_filter: Option<String>) {
    let filter = if debug {
        EnvFilter::new("stepline=debug")
    } else {
        let fallback = config_filter.as_deref().unwrap_or("stepline=info");
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new("stepline=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let config = load_config(&project_root, cli.config.as_deref());
    let log_filter = config.as_ref().ok().map(|c| c.settings.log_filter());
    init_tracing(cli.debug, log_filter);

    tracing::debug!("stepline starting with args: {:?}", cli);

    // Flags win over settings.output
    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        config
            .as_ref()
            .map(|c| OutputMode::from(c.settings.output))
            .unwrap_or_default()
    };

    let mut ui = create_ui(output_mode, cli.no_color);

    let config = match config.and_then(|c| validate(&c).map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            ui.error(&format!("Error: {}", error_chain(e)));
            return ExitCode::from(2);
        }
    };

    let dispatcher = CommandDispatcher::new(project_root, config);

    match dispatcher.dispatch(&cli.command, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", error_chain(e)));
            ExitCode::from(1)
        }
    }
}
