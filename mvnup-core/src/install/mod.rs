// mvnup-core/src/install/mod.rs
// Per-artifact install pipeline and the run that ties artifacts together.

use std::path::{Path, PathBuf};

use mvnup_common::config::{Config, InstallPlan};
use mvnup_common::error::{InstallError, Result};
use mvnup_common::model::{
    ArtifactKind, InstallReport, InstallRequest, InstallResult, InstallStage, ShellUpdate,
};
use mvnup_net::{build_http_client, build_urls, download, verify_checksum};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::shell;

pub mod extract;
pub mod link;

use link::LinkOutcome;

/// Where the runtime keeps `bin/` inside its extracted tree. macOS builds
/// nest it under `Contents/Home`.
pub fn runtime_home(destination: &Path) -> PathBuf {
    let nested = destination.join("Contents").join("Home");
    if nested.is_dir() {
        nested
    } else {
        destination.to_path_buf()
    }
}

/// What `install_one` hands back on success.
struct Installed {
    home: PathBuf,
    symlink: Option<PathBuf>,
    symlink_created: bool,
}

pub struct Installer<'a> {
    config: &'a Config,
    client: Client,
}

impl<'a> Installer<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        Ok(Self::with_client(config, build_http_client()?))
    }

    pub fn with_client(config: &'a Config, client: Client) -> Self {
        Self { config, client }
    }

    /// Runs one artifact through download, verification, extraction and
    /// linking. A failure stops this artifact only; it is recorded in the
    /// result together with the stage that was reached.
    pub async fn install_artifact(&self, request: &InstallRequest) -> InstallResult {
        let mut stage = InstallStage::Pending;
        let outcome = self.install_one(request, &mut stage).await;
        match outcome {
            Ok(installed) => InstallResult {
                artifact: request.artifact,
                final_destination: request.destination.clone(),
                home: installed.home,
                symlink: installed.symlink,
                symlink_created: installed.symlink_created,
                stage: InstallStage::Done,
                error: None,
            },
            Err(e) => {
                warn!(
                    "{} failed during {}: {}",
                    request.artifact,
                    stage.next_step(),
                    e
                );
                InstallResult {
                    artifact: request.artifact,
                    final_destination: request.destination.clone(),
                    home: request.destination.clone(),
                    symlink: None,
                    symlink_created: false,
                    stage,
                    error: Some(e),
                }
            }
        }
    }

    async fn install_one(
        &self,
        request: &InstallRequest,
        stage: &mut InstallStage,
    ) -> Result<Installed> {
        let platform = &self.config.platform;
        let destination = &request.destination;
        let destination_exists = destination.symlink_metadata().is_ok();
        if destination_exists && !request.force_overwrite {
            return Err(InstallError::DestinationExists(destination.clone()));
        }

        let urls = build_urls(request, platform)?;
        let tmp = tempfile::Builder::new()
            .prefix("mvnup-")
            .tempdir()
            .map_err(InstallError::from)?;
        let archive_path = tmp.path().join(&urls.file_name);

        info!("Downloading {} from {} ...", request.artifact, urls.archive_url);
        let archive = download(&self.client, &urls.archive_url, &archive_path).await?;
        debug!("Downloaded {} bytes", archive.size_bytes);
        *stage = InstallStage::Downloaded;

        if request.skip_checksum {
            warn!(
                "{} checksum verification skipped at user request.",
                request.artifact
            );
        } else {
            info!(
                "Verifying {} checksum for {} ...",
                request.checksum_algorithm, request.artifact
            );
            verify_checksum(
                &self.client,
                &archive.local_path,
                &urls.checksum_url,
                request.checksum_algorithm,
                request.expected_checksum_len,
            )
            .await?;
        }
        *stage = InstallStage::Verified;

        if destination_exists {
            info!("Removing existing {} ...", destination.display());
            link::remove_existing_link_target(destination)?;
        }

        info!("Extracting {} to {} ...", request.artifact, destination.display());
        extract::extract_archive(&archive.local_path, destination, platform)?;
        drop(tmp);
        *stage = InstallStage::Extracted;

        let home = match request.artifact {
            ArtifactKind::Runtime => runtime_home(destination),
            ArtifactKind::BuildTool => destination.clone(),
        };

        let mut symlink = None;
        let mut symlink_created = false;
        if let Some(link_path) = &request.symlink {
            match link::link(destination, link_path, platform) {
                Ok(outcome) => {
                    symlink_created = outcome == LinkOutcome::Created;
                    symlink = Some(link_path.clone());
                }
                Err(e @ InstallError::SymlinkUnsupported { .. }) => {
                    warn!("{}", e);
                }
                Err(e) => return Err(e),
            }
        }
        *stage = InstallStage::Linked;

        info!("{} installed to {}", request.artifact, destination.display());
        Ok(Installed {
            home,
            symlink,
            symlink_created,
        })
    }

    /// Installs the build tool, then the runtime when the plan includes it,
    /// then updates the shell environment once for everything that succeeded.
    pub async fn run(&self, plan: &InstallPlan) -> InstallReport {
        let mut results = vec![self.install_artifact(&plan.build_tool).await];

        let runtime_skipped = match &plan.runtime {
            Ok(request) => {
                results.push(self.install_artifact(request).await);
                None
            }
            Err(reason) => {
                info!("Skipping {}: {}", ArtifactKind::Runtime, reason);
                Some(reason.clone())
            }
        };

        let home_of = |artifact: ArtifactKind| {
            results
                .iter()
                .find(|r| r.artifact == artifact && r.succeeded())
                .map(|r| r.home.clone())
        };
        let runtime_home = home_of(ArtifactKind::Runtime);
        let build_tool_home = home_of(ArtifactKind::BuildTool);
        let (shell, manual_steps) =
            self.finalize_environment(runtime_home.as_deref(), build_tool_home.as_deref());

        InstallReport {
            results,
            runtime_skipped,
            shell,
            manual_steps,
        }
    }

    fn finalize_environment(
        &self,
        runtime_home: Option<&Path>,
        build_tool_home: Option<&Path>,
    ) -> (ShellUpdate, Vec<String>) {
        if runtime_home.is_none() && build_tool_home.is_none() {
            debug!("Nothing installed; leaving shell configuration alone");
            return (ShellUpdate::Skipped, Vec::new());
        }
        let platform = &self.config.platform;
        if !platform.uses_shell_profile() {
            return (
                ShellUpdate::NotApplicable,
                shell::manual_setup_commands(runtime_home, build_tool_home),
            );
        }

        let Some(profile) =
            shell::detect_profile(platform, self.config.shell.as_deref(), &self.config.home)
        else {
            return (ShellUpdate::NotApplicable, Vec::new());
        };
        let edit = shell::environment_edit(&profile, runtime_home, build_tool_home);
        match edit.apply() {
            Ok(true) => {
                info!("Updated shell configuration: {}", profile.display());
                (ShellUpdate::Updated { profile }, Vec::new())
            }
            Ok(false) => (ShellUpdate::AlreadyConfigured { profile }, Vec::new()),
            Err(e) => {
                warn!("Failed to update {}: {}", profile.display(), e);
                (ShellUpdate::Failed(e), Vec::new())
            }
        }
    }
}
