// mvnup-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use tracing::debug;

use super::error::{InstallError, Result};
use crate::model::{ArtifactKind, InstallRequest};
use crate::platform::Platform;
use crate::template;

pub const DEFAULT_BUILD_TOOL_VERSION: &str = "3.9.11";
pub const DEFAULT_RUNTIME_VERSION: &str = "21.0.6+7";
pub const DEFAULT_DESTINATION: &str = "~/opt/apache-maven-<version>";
pub const DEFAULT_SYMLINK: &str = "~/opt/apache-maven";
pub const DEFAULT_JDK_DESTINATION: &str = "~/opt/temurin-<version>";
pub const DEFAULT_JAVA_SYMLINK: &str = "~/opt/java";

const MIRROR_ENV: &str = "MVNUP_MIRROR";
const JDK_MIRROR_ENV: &str = "MVNUP_JDK_MIRROR";

/// Raw, unresolved options as the user supplied them.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub version: String,
    pub destination: PathBuf,
    pub symlink: Option<PathBuf>,
    pub mirror: Option<String>,
    pub skip_jdk: bool,
    pub jdk_version: String,
    pub jdk_destination: PathBuf,
    pub java_symlink: Option<PathBuf>,
    pub jdk_mirror: Option<String>,
    pub force: bool,
    pub skip_checksum: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_BUILD_TOOL_VERSION.to_string(),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            symlink: Some(PathBuf::from(DEFAULT_SYMLINK)),
            mirror: None,
            skip_jdk: false,
            jdk_version: DEFAULT_RUNTIME_VERSION.to_string(),
            jdk_destination: PathBuf::from(DEFAULT_JDK_DESTINATION),
            java_symlink: Some(PathBuf::from(DEFAULT_JAVA_SYMLINK)),
            jdk_mirror: None,
            force: false,
            skip_checksum: false,
        }
    }
}

/// The parts of the process environment the installer cares about.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub home: Option<PathBuf>,
    pub shell: Option<String>,
    pub mirror: Option<String>,
    pub jdk_mirror: Option<String>,
}

impl Environment {
    pub fn capture() -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|s| !s.trim().is_empty());
        Self {
            home: UserDirs::new().map(|ud| ud.home_dir().to_path_buf()),
            shell: non_empty("SHELL"),
            mirror: non_empty(MIRROR_ENV),
            jdk_mirror: non_empty(JDK_MIRROR_ENV),
        }
    }
}

/// Which artifacts to install, in order.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub build_tool: InstallRequest,
    /// `Err` carries the reason the runtime is not installed.
    pub runtime: std::result::Result<InstallRequest, String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub home: PathBuf,
    pub shell: Option<String>,
    pub platform: Platform,
    pub plan: InstallPlan,
}

impl Config {
    /// Builds the configuration from CLI options and the live environment.
    pub fn load(options: &InstallOptions) -> Result<Self> {
        Self::resolve(options, Environment::capture(), Platform::current())
    }

    pub fn resolve(options: &InstallOptions, env: Environment, platform: Platform) -> Result<Self> {
        debug!("Resolving mvnup configuration for {}", platform);

        let home = env.home.clone().ok_or_else(|| {
            InstallError::Config("Could not determine the home directory".to_string())
        })?;
        debug!("Home directory: {}", home.display());

        let build_tool = build_request(
            ArtifactKind::BuildTool,
            &options.version,
            &options.destination,
            options.symlink.as_deref(),
            options.mirror.as_ref().or(env.mirror.as_ref()),
            options,
            &home,
        )?;

        let runtime = if options.skip_jdk {
            Err("--skip-jdk was given".to_string())
        } else if !platform.auto_installs_runtime() {
            Err(format!(
                "automatic JDK installation is not supported on {platform}; install a JDK manually"
            ))
        } else {
            Ok(build_request(
                ArtifactKind::Runtime,
                &options.jdk_version,
                &options.jdk_destination,
                options.java_symlink.as_deref(),
                options.jdk_mirror.as_ref().or(env.jdk_mirror.as_ref()),
                options,
                &home,
            )?)
        };
        if let Err(reason) = &runtime {
            debug!("Runtime will not be installed: {}", reason);
        }

        debug!("Configuration resolved successfully.");
        Ok(Self {
            home,
            shell: env.shell,
            platform,
            plan: InstallPlan {
                build_tool,
                runtime,
            },
        })
    }

    pub fn home_dir(&self) -> &Path {
        &self.home
    }
}

fn build_request(
    artifact: ArtifactKind,
    version: &str,
    destination: &Path,
    symlink: Option<&Path>,
    mirror: Option<&String>,
    options: &InstallOptions,
    home: &Path,
) -> Result<InstallRequest> {
    let version = version.trim();
    if version.is_empty() {
        return Err(InstallError::Config(format!(
            "{} version must not be empty",
            artifact
        )));
    }

    let destination = template::resolve_path(destination, version, home);
    let symlink = symlink.map(|p| template::resolve_path(p, version, home));
    if symlink.as_deref() == Some(destination.as_path()) {
        return Err(InstallError::Config(format!(
            "{} symlink must differ from its destination {}",
            artifact,
            destination.display()
        )));
    }
    debug!(
        "{} {} -> {} (symlink: {:?})",
        artifact,
        version,
        destination.display(),
        symlink
    );

    let mut request = InstallRequest::new(artifact, version, destination)
        .with_symlink(symlink)
        .with_force_overwrite(options.force)
        .with_skip_checksum(options.skip_checksum);
    if let Some(mirror) = mirror {
        debug!("Using mirror for {}: {}", artifact, mirror);
        request = request.with_url_template(mirror.trim());
    }
    Ok(request)
}
