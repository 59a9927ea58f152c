// mvnup-net/src/urls.rs
//! Download locations for each artifact, derived from its request and the
//! host platform. Pure string work; nothing here touches the network.

use mvnup_common::error::{InstallError, Result};
use mvnup_common::model::{ArtifactKind, InstallRequest};
use mvnup_common::platform::Platform;
use mvnup_common::template;

use crate::validation::validate_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactUrls {
    pub archive_url: String,
    pub checksum_url: String,
    /// Last path segment of the archive URL.
    pub file_name: String,
}

pub fn build_urls(request: &InstallRequest, platform: &Platform) -> Result<ArtifactUrls> {
    let urls = match request.artifact {
        ArtifactKind::BuildTool => build_tool_urls(request, platform),
        ArtifactKind::Runtime => runtime_urls(request, platform)?,
    };
    validate_url(&urls.archive_url)?;
    validate_url(&urls.checksum_url)?;
    Ok(urls)
}

fn join(base: &str, file_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file_name)
}

fn build_tool_urls(request: &InstallRequest, platform: &Platform) -> ArtifactUrls {
    let version = request.version.as_str();
    let file_name = format!("apache-maven-{version}-bin{}", platform.archive_extension());
    let base = template::render(&request.url_template, &[("version", version)]);
    let archive_url = join(&base, &file_name);
    ArtifactUrls {
        checksum_url: format!("{archive_url}.sha512"),
        archive_url,
        file_name,
    }
}

/// Feature release number, e.g. `21` for `21.0.6+7`.
fn major_version(version: &str) -> Option<&str> {
    let end = version
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(version.len());
    (end > 0).then(|| &version[..end])
}

fn runtime_urls(request: &InstallRequest, platform: &Platform) -> Result<ArtifactUrls> {
    let version = request.version.as_str();
    let major = major_version(version).ok_or_else(|| {
        InstallError::Validation(format!(
            "JDK version '{version}' does not start with a feature release number"
        ))
    })?;
    let (os, arch) = platform
        .temurin_os()
        .zip(platform.temurin_arch())
        .ok_or_else(|| {
            InstallError::Validation(format!("No Temurin build is published for {platform}"))
        })?;

    let release_tag = version.replace('+', "%2B");
    let file_version = version.replace('+', "_");
    let file_name = format!("OpenJDK{major}U-jdk_{arch}_{os}_hotspot_{file_version}.tar.gz");
    let base = template::render(
        &request.url_template,
        &[
            ("major", major),
            ("release_tag", &release_tag),
            ("version", version),
        ],
    );
    let archive_url = join(&base, &file_name);
    Ok(ArtifactUrls {
        checksum_url: format!("{archive_url}.sha256.txt"),
        archive_url,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn maven(version: &str) -> InstallRequest {
        InstallRequest::new(ArtifactKind::BuildTool, version, PathBuf::from("/opt/m"))
    }

    fn jdk(version: &str) -> InstallRequest {
        InstallRequest::new(ArtifactKind::Runtime, version, PathBuf::from("/opt/j"))
    }

    #[test]
    fn maven_on_linux_uses_tarball() {
        let urls = build_urls(&maven("3.9.11"), &Platform::from_consts("linux", "x86_64")).unwrap();
        assert_eq!(
            urls.archive_url,
            "https://dlcdn.apache.org/maven/maven-3/3.9.11/binaries/apache-maven-3.9.11-bin.tar.gz"
        );
        assert_eq!(urls.checksum_url, format!("{}.sha512", urls.archive_url));
        assert_eq!(urls.file_name, "apache-maven-3.9.11-bin.tar.gz");
    }

    #[test]
    fn maven_on_windows_uses_zip() {
        let urls =
            build_urls(&maven("3.9.11"), &Platform::from_consts("windows", "x86_64")).unwrap();
        assert!(urls.archive_url.ends_with("/apache-maven-3.9.11-bin.zip"));
        assert!(urls.checksum_url.ends_with("-bin.zip.sha512"));
    }

    #[test]
    fn mirror_with_trailing_slash() {
        let req = maven("3.9.10").with_url_template("http://127.0.0.1:9000/maven/{version}/");
        let urls = build_urls(&req, &Platform::from_consts("linux", "x86_64")).unwrap();
        assert_eq!(
            urls.archive_url,
            "http://127.0.0.1:9000/maven/3.9.10/apache-maven-3.9.10-bin.tar.gz"
        );
    }

    #[test]
    fn temurin_on_linux_x64() {
        let urls = build_urls(&jdk("21.0.6+7"), &Platform::from_consts("linux", "x86_64")).unwrap();
        assert_eq!(
            urls.archive_url,
            "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.6%2B7/\
             OpenJDK21U-jdk_x64_linux_hotspot_21.0.6_7.tar.gz"
        );
        assert_eq!(urls.checksum_url, format!("{}.sha256.txt", urls.archive_url));
    }

    #[test]
    fn temurin_on_mac_arm() {
        let urls =
            build_urls(&jdk("17.0.12+7"), &Platform::from_consts("macos", "aarch64")).unwrap();
        assert!(urls
            .archive_url
            .ends_with("/OpenJDK17U-jdk_aarch64_mac_hotspot_17.0.12_7.tar.gz"));
    }

    #[test]
    fn temurin_rejects_unknown_platform_and_version() {
        assert!(build_urls(&jdk("21.0.6+7"), &Platform::from_consts("linux", "riscv64")).is_err());
        assert!(build_urls(&jdk("jdk-21"), &Platform::from_consts("linux", "x86_64")).is_err());
    }

    #[test]
    fn non_http_mirror_is_rejected() {
        let req = maven("3.9.11").with_url_template("file:///srv/maven/{version}");
        let err = build_urls(&req, &Platform::from_consts("linux", "x86_64")).unwrap_err();
        assert!(matches!(err, InstallError::Validation(_)));
    }
}
