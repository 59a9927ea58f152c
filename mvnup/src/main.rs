// mvnup/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use mvnup_common::config::Config;
use mvnup_common::error::InstallError;
use mvnup_common::model::InstallReport;
use mvnup_core::Installer;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
mod report;

use cli::CliArgs;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INTERRUPTED: i32 = 130;

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("MVNUP_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn error_line(e: &InstallError) -> String {
    format!("{}: {}", "Error".red().bold(), e)
}

fn fail(e: &InstallError) -> ! {
    debug!("Command failed: {:?}", e);
    eprintln!("{}", error_line(e));
    process::exit(EXIT_FAILURE);
}

/// `None` means the run was interrupted before it produced a report.
fn exit_code(report: Option<&InstallReport>) -> i32 {
    match report {
        None => EXIT_INTERRUPTED,
        Some(report) if report.is_success() => EXIT_SUCCESS,
        Some(_) => EXIT_FAILURE,
    }
}

/// Resolves once Ctrl-C is pressed. Never resolves if the handler cannot be
/// installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    let config = Config::load(&cli_args.install_options()).unwrap_or_else(|e| fail(&e));
    let installer = Installer::new(&config).unwrap_or_else(|e| fail(&e));

    let report = tokio::select! {
        report = installer.run(&config.plan) => Some(report),
        _ = interrupted() => None,
    };
    match &report {
        Some(report) => report::print_report(report),
        None => eprintln!("\n{}", error_line(&InstallError::Interrupted)),
    }
    let code = exit_code(report.as_ref());
    if code != EXIT_SUCCESS {
        process::exit(code);
    }
    debug!("Installation completed successfully.");
}
