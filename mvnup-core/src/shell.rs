// mvnup-core/src/shell.rs
//! Shell profile detection and idempotent line edits.
//!
//! Lines are compared after trimming, so re-running an install never
//! duplicates an `export`. Each appended line is preceded by a blank line
//! when the profile already has content.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use mvnup_common::error::{InstallError, Result};
use mvnup_common::model::ArtifactKind;
use mvnup_common::platform::Platform;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Other,
}

impl Shell {
    /// Classifies a `$SHELL` value such as `/usr/bin/zsh`.
    pub fn from_path(shell: Option<&str>) -> Self {
        match shell {
            Some(s) if s.ends_with("zsh") => Shell::Zsh,
            Some(s) if s.ends_with("bash") => Shell::Bash,
            _ => Shell::Other,
        }
    }

    /// Profile files in order of preference.
    pub fn profile_candidates(self, home: &Path) -> Vec<PathBuf> {
        let names: &[&str] = match self {
            Shell::Zsh => &[".zshrc", ".zsh_profile", ".profile"],
            Shell::Bash => &[".bashrc", ".bash_profile", ".profile"],
            Shell::Other => &[".profile", ".bashrc"],
        };
        names.iter().map(|n| home.join(n)).collect()
    }
}

/// First existing candidate, else the first candidate. `None` where the
/// platform has no shell profile.
pub fn detect_profile(platform: &Platform, shell: Option<&str>, home: &Path) -> Option<PathBuf> {
    if !platform.uses_shell_profile() {
        return None;
    }
    let candidates = Shell::from_path(shell).profile_candidates(home);
    let found = candidates.iter().find(|p| p.exists()).cloned();
    let profile = found.or_else(|| candidates.into_iter().next());
    debug!("Detected shell profile: {:?}", profile);
    profile
}

/// Appends the missing `lines` to `profile` in order. Returns whether
/// anything was written.
fn append_missing(profile: &Path, lines: &[String]) -> Result<bool> {
    // Profiles may hold bytes that are not UTF-8; they are compared lossily
    // and never rewritten.
    let (existing, mut non_empty) = match fs::read(profile) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            let set: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
            (set, !bytes.is_empty())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Vec::new(), false),
        Err(e) => return Err(InstallError::fs(profile, e)),
    };

    let mut seen: std::collections::HashSet<String> = existing.into_iter().collect();
    let mut missing = Vec::new();
    for line in lines {
        let normalized = line.trim().to_string();
        if seen.insert(normalized.clone()) {
            missing.push(normalized);
        }
    }
    if missing.is_empty() {
        return Ok(false);
    }

    if let Some(parent) = profile.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::fs(parent, e))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(profile)
        .map_err(|e| InstallError::fs(profile, e))?;
    let mut buf = String::new();
    for line in &missing {
        if non_empty {
            buf.push('\n');
        }
        buf.push_str(line);
        buf.push('\n');
        non_empty = true;
    }
    file.write_all(buf.as_bytes())
        .map_err(|e| InstallError::fs(profile, e))?;
    debug!("Appended {} line(s) to {}", missing.len(), profile.display());
    Ok(true)
}

/// Ensures `line` is present in `profile`. Returns `true` when it was added.
pub fn ensure_line(profile: &Path, line: &str) -> Result<bool> {
    append_missing(profile, &[line.to_string()])
}

/// A set of lines that must all be present in one profile file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellProfileEdit {
    pub file_path: PathBuf,
    pub lines_to_ensure: Vec<String>,
}

impl ShellProfileEdit {
    /// Applies the edit; a second application is a no-op returning `false`.
    pub fn apply(&self) -> Result<bool> {
        append_missing(&self.file_path, &self.lines_to_ensure)
    }
}

pub fn export_line(variable: &str, value: &Path) -> String {
    format!("export {}=\"{}\"", variable, value.display())
}

/// The exports and `PATH` line for the artifacts that were installed.
pub fn environment_edit(
    profile: &Path,
    runtime_home: Option<&Path>,
    build_tool_home: Option<&Path>,
) -> ShellProfileEdit {
    let homes = [
        (ArtifactKind::Runtime, runtime_home),
        (ArtifactKind::BuildTool, build_tool_home),
    ];
    let mut lines = Vec::new();
    let mut path_segments = Vec::new();
    for (artifact, home) in homes {
        if let Some(home) = home {
            let var = artifact.home_variable();
            lines.push(export_line(var, home));
            path_segments.push(format!("${var}/bin"));
        }
    }
    if !path_segments.is_empty() {
        lines.push(format!(
            "export PATH=\"{}:$PATH\"",
            path_segments.join(":")
        ));
    }
    ShellProfileEdit {
        file_path: profile.to_path_buf(),
        lines_to_ensure: lines,
    }
}

/// `setx` commands for platforms without a shell profile.
pub fn manual_setup_commands(
    runtime_home: Option<&Path>,
    build_tool_home: Option<&Path>,
) -> Vec<String> {
    let mut commands = Vec::new();
    let mut bins = Vec::new();
    if let Some(home) = runtime_home {
        commands.push(format!(
            "setx {} \"{}\"",
            ArtifactKind::Runtime.home_variable(),
            home.display()
        ));
        bins.push(home.join("bin"));
    }
    if let Some(home) = build_tool_home {
        bins.push(home.join("bin"));
    }
    for bin in bins {
        commands.push(format!("setx PATH \"%PATH%;{}\"", bin.display()));
    }
    commands
}
