// mvnup-common/src/model/artifact.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::InstallError;

pub const DEFAULT_BUILD_TOOL_URL_TEMPLATE: &str =
    "https://dlcdn.apache.org/maven/maven-3/{version}/binaries";
pub const DEFAULT_RUNTIME_URL_TEMPLATE: &str =
    "https://github.com/adoptium/temurin{major}-binaries/releases/download/jdk-{release_tag}";

/// One installable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Apache Maven.
    BuildTool,
    /// Temurin JDK.
    Runtime,
}

impl ArtifactKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ArtifactKind::BuildTool => "Apache Maven",
            ArtifactKind::Runtime => "Temurin JDK",
        }
    }

    /// Environment variable exported into the shell profile for this artifact.
    pub fn home_variable(&self) -> &'static str {
        match self {
            ArtifactKind::BuildTool => "MAVEN_HOME",
            ArtifactKind::Runtime => "JAVA_HOME",
        }
    }

    pub fn default_url_template(&self) -> &'static str {
        match self {
            ArtifactKind::BuildTool => DEFAULT_BUILD_TOOL_URL_TEMPLATE,
            ArtifactKind::Runtime => DEFAULT_RUNTIME_URL_TEMPLATE,
        }
    }

    /// Digest published next to the archive by the upstream project.
    pub fn checksum_algorithm(&self) -> ChecksumAlgorithm {
        match self {
            ArtifactKind::BuildTool => ChecksumAlgorithm::Sha512,
            ArtifactKind::Runtime => ChecksumAlgorithm::Sha256,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha256,
    Sha512,
}

impl ChecksumAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Sha512 => "sha512",
        }
    }

    /// Length of the lowercase hex digest.
    pub fn hex_len(&self) -> usize {
        match self {
            ChecksumAlgorithm::Sha256 => 64,
            ChecksumAlgorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(ChecksumAlgorithm::Sha256),
            "sha512" => Ok(ChecksumAlgorithm::Sha512),
            other => Err(InstallError::Validation(format!(
                "Unsupported checksum algorithm '{other}'"
            ))),
        }
    }
}

/// Everything needed to install one artifact. Built once while the
/// configuration is resolved and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub artifact: ArtifactKind,
    pub version: String,
    pub destination: PathBuf,
    pub symlink: Option<PathBuf>,
    pub url_template: String,
    pub checksum_algorithm: ChecksumAlgorithm,
    pub expected_checksum_len: Option<usize>,
    pub force_overwrite: bool,
    pub skip_checksum: bool,
}

impl InstallRequest {
    /// A request with the artifact's upstream defaults for URL and checksum.
    pub fn new(artifact: ArtifactKind, version: impl Into<String>, destination: PathBuf) -> Self {
        let checksum_algorithm = artifact.checksum_algorithm();
        Self {
            artifact,
            version: version.into(),
            destination,
            symlink: None,
            url_template: artifact.default_url_template().to_string(),
            checksum_algorithm,
            expected_checksum_len: Some(checksum_algorithm.hex_len()),
            force_overwrite: false,
            skip_checksum: false,
        }
    }

    pub fn with_symlink(mut self, symlink: Option<PathBuf>) -> Self {
        self.symlink = symlink;
        self
    }

    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    pub fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    pub fn with_skip_checksum(mut self, skip: bool) -> Self {
        self.skip_checksum = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_algorithm_names_loosely() {
        assert_eq!("SHA-512".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Sha512);
        assert_eq!("sha256".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Sha256);
        assert!("md5".parse::<ChecksumAlgorithm>().is_err());
    }

    #[test]
    fn request_defaults_follow_artifact() {
        let req = InstallRequest::new(ArtifactKind::BuildTool, "3.9.11", PathBuf::from("/x"));
        assert_eq!(req.checksum_algorithm, ChecksumAlgorithm::Sha512);
        assert_eq!(req.expected_checksum_len, Some(128));
        assert_eq!(req.url_template, DEFAULT_BUILD_TOOL_URL_TEMPLATE);

        let jdk = InstallRequest::new(ArtifactKind::Runtime, "21.0.6+7", PathBuf::from("/y"));
        assert_eq!(jdk.checksum_algorithm, ChecksumAlgorithm::Sha256);
        assert_eq!(jdk.expected_checksum_len, Some(64));
    }
}
