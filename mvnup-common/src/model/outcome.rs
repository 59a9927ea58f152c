// mvnup-common/src/model/outcome.rs
use std::fmt;
use std::path::PathBuf;

use super::artifact::{ArtifactKind, ChecksumAlgorithm};
use crate::error::InstallError;

/// An archive sitting in a temporary download directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArchive {
    pub source_url: String,
    pub local_path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRecord {
    pub algorithm: ChecksumAlgorithm,
    pub expected_hex: String,
    pub actual_hex: String,
}

impl ChecksumRecord {
    pub fn matches(&self) -> bool {
        self.expected_hex.eq_ignore_ascii_case(&self.actual_hex)
    }
}

/// Per-artifact progress.
///
/// There is no separate failed stage. A failed artifact keeps the last stage
/// it reached and carries the cause in [`InstallResult::error`], so the step
/// that failed is `stage.next_step()`. See [`InstallResult::is_failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Pending,
    Downloaded,
    Verified,
    Extracted,
    Linked,
    Done,
}

impl InstallStage {
    /// Name of the step that moves an artifact out of this stage.
    pub fn next_step(&self) -> &'static str {
        match self {
            InstallStage::Pending => "download",
            InstallStage::Downloaded => "verify",
            InstallStage::Verified => "extract",
            InstallStage::Extracted => "link",
            InstallStage::Linked | InstallStage::Done => "finish",
        }
    }
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStage::Pending => "pending",
            InstallStage::Downloaded => "downloaded",
            InstallStage::Verified => "verified",
            InstallStage::Extracted => "extracted",
            InstallStage::Linked => "linked",
            InstallStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct InstallResult {
    pub artifact: ArtifactKind,
    pub final_destination: PathBuf,
    /// Directory exported as the artifact's home variable.
    pub home: PathBuf,
    pub symlink: Option<PathBuf>,
    pub symlink_created: bool,
    pub stage: InstallStage,
    pub error: Option<InstallError>,
}

impl InstallResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.stage == InstallStage::Done
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// One line naming the artifact, the failed step and the cause.
    pub fn error_detail(&self) -> Option<String> {
        self.error.as_ref().map(|e| {
            format!(
                "{} failed during {}: {}",
                self.artifact,
                self.stage.next_step(),
                e
            )
        })
    }
}

#[derive(Debug, Clone)]
pub enum ShellUpdate {
    Updated { profile: PathBuf },
    AlreadyConfigured { profile: PathBuf },
    /// The platform has no shell profile; see the report's manual steps.
    NotApplicable,
    /// Nothing was installed, so nothing was exported.
    Skipped,
    Failed(InstallError),
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub results: Vec<InstallResult>,
    pub runtime_skipped: Option<String>,
    pub shell: ShellUpdate,
    pub manual_steps: Vec<String>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(InstallResult::succeeded)
            && !matches!(self.shell, ShellUpdate::Failed(_))
    }

    pub fn result_for(&self, artifact: ArtifactKind) -> Option<&InstallResult> {
        self.results.iter().find(|r| r.artifact == artifact)
    }

    pub fn failures(&self) -> impl Iterator<Item = &InstallResult> {
        self.results.iter().filter(|r| !r.succeeded())
    }
}
