// mvnup-common/src/platform.rs
//! Host platform capabilities, resolved once at startup.

use std::env::consts;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    MacOs,
    Windows,
    OtherUnix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Aarch64,
    Other,
}

/// Every component branches on these capability methods instead of
/// comparing platform names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: OsFamily,
    pub arch: Arch,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_consts(consts::OS, consts::ARCH)
    }

    pub fn from_consts(os: &str, arch: &str) -> Self {
        let os = match os {
            "linux" => OsFamily::Linux,
            "macos" => OsFamily::MacOs,
            "windows" => OsFamily::Windows,
            _ => OsFamily::OtherUnix,
        };
        let arch = match arch {
            "x86_64" => Arch::X64,
            "aarch64" => Arch::Aarch64,
            _ => Arch::Other,
        };
        Self { os, arch }
    }

    pub fn is_windows_family(&self) -> bool {
        self.os == OsFamily::Windows
    }

    /// Extension of the build tool's binary distribution on this platform.
    pub fn archive_extension(&self) -> &'static str {
        if self.is_windows_family() {
            ".zip"
        } else {
            ".tar.gz"
        }
    }

    pub fn supports_unprivileged_symlinks(&self) -> bool {
        !self.is_windows_family()
    }

    /// Whether the runtime can be installed without manual, elevated setup.
    pub fn auto_installs_runtime(&self) -> bool {
        matches!(self.os, OsFamily::Linux | OsFamily::MacOs)
            && matches!(self.arch, Arch::X64 | Arch::Aarch64)
    }

    pub fn uses_shell_profile(&self) -> bool {
        !self.is_windows_family()
    }

    /// OS segment of Temurin release file names.
    pub fn temurin_os(&self) -> Option<&'static str> {
        match self.os {
            OsFamily::Linux => Some("linux"),
            OsFamily::MacOs => Some("mac"),
            OsFamily::Windows => Some("windows"),
            OsFamily::OtherUnix => None,
        }
    }

    /// Architecture segment of Temurin release file names.
    pub fn temurin_arch(&self) -> Option<&'static str> {
        match self.arch {
            Arch::X64 => Some("x64"),
            Arch::Aarch64 => Some("aarch64"),
            Arch::Other => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let os = match self.os {
            OsFamily::Linux => "linux",
            OsFamily::MacOs => "macos",
            OsFamily::Windows => "windows",
            OsFamily::OtherUnix => "unix",
        };
        let arch = match self.arch {
            Arch::X64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Other => "unknown",
        };
        write!(f, "{os}-{arch}")
    }
}
