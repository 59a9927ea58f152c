// mvnup-core/src/lib.rs
pub mod install;
pub mod shell;

pub use install::extract::extract_archive;
pub use install::link::{link, LinkOutcome};
pub use install::Installer;
pub use shell::{detect_profile, ensure_line, environment_edit, ShellProfileEdit};
