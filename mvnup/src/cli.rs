// mvnup/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use mvnup_common::config::{
    InstallOptions, DEFAULT_BUILD_TOOL_VERSION, DEFAULT_DESTINATION, DEFAULT_JAVA_SYMLINK,
    DEFAULT_JDK_DESTINATION, DEFAULT_RUNTIME_VERSION, DEFAULT_SYMLINK,
};

/// Install Apache Maven and a Temurin JDK into your home directory.
///
/// Paths may contain `<version>` and start with `~`.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None, name = "mvnup", bin_name = "mvnup")]
#[command(disable_version_flag = true)]
pub struct CliArgs {
    /// Maven version to install
    #[arg(long, default_value = DEFAULT_BUILD_TOOL_VERSION)]
    pub version: String,

    /// Target directory for Maven
    #[arg(long, default_value = DEFAULT_DESTINATION)]
    pub destination: PathBuf,

    /// Symlink that will point at the Maven directory
    #[arg(long, default_value = DEFAULT_SYMLINK, conflicts_with = "no_symlink")]
    pub symlink: PathBuf,

    /// Do not create the Maven symlink
    #[arg(long)]
    pub no_symlink: bool,

    /// Base URL for Maven downloads; `{version}` is substituted [env: MVNUP_MIRROR]
    #[arg(long)]
    pub mirror: Option<String>,

    /// Skip the Temurin JDK installation
    #[arg(long)]
    pub skip_jdk: bool,

    /// Temurin JDK version to install
    #[arg(long, default_value = DEFAULT_RUNTIME_VERSION)]
    pub jdk_version: String,

    /// Target directory for the JDK
    #[arg(long, default_value = DEFAULT_JDK_DESTINATION)]
    pub jdk_destination: PathBuf,

    /// Symlink that will point at the JDK directory
    #[arg(long, default_value = DEFAULT_JAVA_SYMLINK, conflicts_with = "no_java_symlink")]
    pub java_symlink: PathBuf,

    /// Do not create the JDK symlink
    #[arg(long)]
    pub no_java_symlink: bool,

    /// Base URL for JDK downloads; `{major}`, `{release_tag}` and `{version}` are substituted [env: MVNUP_JDK_MIRROR]
    #[arg(long)]
    pub jdk_mirror: Option<String>,

    /// Replace existing installations
    #[arg(long)]
    pub force: bool,

    /// Do not verify downloads against the published checksums
    #[arg(long)]
    pub skip_checksum: bool,

    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    pub fn install_options(&self) -> InstallOptions {
        InstallOptions {
            version: self.version.clone(),
            destination: self.destination.clone(),
            symlink: (!self.no_symlink).then(|| self.symlink.clone()),
            mirror: self.mirror.clone(),
            skip_jdk: self.skip_jdk,
            jdk_version: self.jdk_version.clone(),
            jdk_destination: self.jdk_destination.clone(),
            java_symlink: (!self.no_java_symlink).then(|| self.java_symlink.clone()),
            jdk_mirror: self.jdk_mirror.clone(),
            force: self.force,
            skip_checksum: self.skip_checksum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = CliArgs::try_parse_from(["mvnup"]).unwrap();
        let opts = args.install_options();
        assert_eq!(opts.version, "3.9.11");
        assert_eq!(opts.jdk_version, "21.0.6+7");
        assert_eq!(opts.destination, PathBuf::from("~/opt/apache-maven-<version>"));
        assert_eq!(opts.symlink, Some(PathBuf::from("~/opt/apache-maven")));
        assert_eq!(opts.java_symlink, Some(PathBuf::from("~/opt/java")));
        assert!(!opts.force && !opts.skip_checksum && !opts.skip_jdk);
    }

    #[test]
    fn version_flag_sets_the_build_tool_version() {
        let args =
            CliArgs::try_parse_from(["mvnup", "--version", "3.9.10", "--skip-jdk", "-vv"]).unwrap();
        assert_eq!(args.version, "3.9.10");
        assert!(args.skip_jdk);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn no_symlink_flags_drop_links() {
        let args =
            CliArgs::try_parse_from(["mvnup", "--no-symlink", "--no-java-symlink"]).unwrap();
        let opts = args.install_options();
        assert_eq!(opts.symlink, None);
        assert_eq!(opts.java_symlink, None);
    }

    #[test]
    fn symlink_and_no_symlink_conflict() {
        assert!(CliArgs::try_parse_from(["mvnup", "--symlink", "/x", "--no-symlink"]).is_err());
    }
}
