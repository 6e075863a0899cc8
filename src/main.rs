use clap::Parser;
use kubebuddy_report::AppError;
use kubebuddy_report::cli::dispatcher::Dispatcher;
use kubebuddy_report::cli::main_types::Cli;
use kubebuddy_report::display::DisplayOptions;
use kubebuddy_report::storage::config::Config;
use kubebuddy_report::utils::logging::init_logging;
use std::path::Path;

fn report_error(err: &AppError) {
    eprintln!("{} Error: {}", err.severity().emoji(), err.display_friendly());
    if let Some(hint) = err.troubleshooting_hint() {
        eprintln!("   Hint: {}", hint);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = match &cli.config_dir {
        Some(dir) => Some(Config::file_in_dir(Path::new(dir))?),
        None => None,
    };

    let config = Config::load(config_path.clone())?;
    if let Some(config_dir) = &cli.config_dir {
        log::debug!("Using config directory: {}", config_dir);
    }

    let display = DisplayOptions::resolve(config.display.no_color, cli.no_color);
    display.validate()?;

    let mut dispatcher = Dispatcher::new(config, config_path, display);
    dispatcher.dispatch(cli.command)
}

fn main() {
    let cli = Cli::parse();

    // Keep the handle alive so buffered records are flushed on exit
    let _logger = match init_logging(cli.verbose) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: {}", err);
            None
        }
    };

    if let Err(err) = run(cli) {
        log::error!("{}", err);
        report_error(&err);
        std::process::exit(1);
    }
}
