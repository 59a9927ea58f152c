// mvnup/src/report.rs
use colored::Colorize;
use mvnup_common::model::{ArtifactKind, InstallReport, InstallResult, ShellUpdate};

fn heading(text: &str) {
    println!("{}{}", "==> ".bold().blue(), text.bold());
}

fn print_success(result: &InstallResult) {
    heading(&format!("{} installation completed.", result.artifact));
    println!("Installed to: {}", result.final_destination.display());
    if result.artifact == ArtifactKind::Runtime {
        println!("JAVA_HOME:    {}", result.home.display());
    }
    if let Some(link) = &result.symlink {
        println!("Symlink:      {}", link.display());
    }
}

/// Prints the outcome of a run. Failures go to stderr, one line each.
pub fn print_report(report: &InstallReport) {
    for result in &report.results {
        match result.error_detail() {
            None => print_success(result),
            Some(detail) => eprintln!("{}: {}", "Error".red().bold(), detail),
        }
    }

    if let Some(reason) = &report.runtime_skipped {
        println!(
            "{} Skipping {} installation: {}",
            "Note:".yellow(),
            ArtifactKind::Runtime,
            reason
        );
    }

    match &report.shell {
        ShellUpdate::Updated { profile } => {
            heading(&format!(
                "Updated shell configuration: {}. Log out/in or run `source {}` to apply.",
                profile.display(),
                profile.display()
            ));
        }
        ShellUpdate::AlreadyConfigured { profile } => {
            println!(
                "Shell configuration already contained the required settings ({}).",
                profile.display()
            );
        }
        ShellUpdate::NotApplicable => {
            if !report.manual_steps.is_empty() {
                println!("\nRun the following commands in an elevated terminal:");
                for step in &report.manual_steps {
                    println!("  {step}");
                }
            }
        }
        ShellUpdate::Skipped => {}
        ShellUpdate::Failed(e) => {
            eprintln!(
                "{}: Could not update shell configuration: {}",
                "Error".red().bold(),
                e
            );
        }
    }
}
