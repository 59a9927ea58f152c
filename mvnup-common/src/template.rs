// mvnup-common/src/template.rs
//! Placeholder substitution for URLs and install paths.
//!
//! URL templates use `{name}` placeholders; user supplied paths use the
//! `<version>` token and may start with `~`. Both are resolved once while the
//! configuration is built.

use std::path::{Path, PathBuf};

pub const VERSION_PLACEHOLDER: &str = "<version>";

/// Replaces every `{key}` in `template` with its value.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

pub fn substitute_version(path: &Path, version: &str) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.contains(VERSION_PLACEHOLDER) {
        PathBuf::from(raw.replace(VERSION_PLACEHOLDER, version))
    } else {
        path.to_path_buf()
    }
}

pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolves a user supplied path: `<version>` first, then `~`.
pub fn resolve_path(path: &Path, version: &str, home: &Path) -> PathBuf {
    expand_home(&substitute_version(path, version), home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_all_occurrences() {
        let out = render(
            "https://mirror/{version}/x-{version}-{major}",
            &[("version", "3.9.11"), ("major", "3")],
        );
        assert_eq!(out, "https://mirror/3.9.11/x-3.9.11-3");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        assert_eq!(render("a/{other}", &[("version", "1")]), "a/{other}");
    }

    #[test]
    fn resolve_path_substitutes_version_and_home() {
        let out = resolve_path(
            Path::new("~/tools/apache-maven-<version>"),
            "3.9.10",
            Path::new("/home/dev"),
        );
        assert_eq!(out, PathBuf::from("/home/dev/tools/apache-maven-3.9.10"));
    }

    #[test]
    fn plain_paths_are_untouched() {
        let out = resolve_path(Path::new("/opt/maven"), "3.9.10", Path::new("/home/dev"));
        assert_eq!(out, PathBuf::from("/opt/maven"));
    }

    #[test]
    fn tilde_inside_a_name_is_not_expanded() {
        let out = expand_home(Path::new("~backup/x"), Path::new("/home/dev"));
        assert_eq!(out, PathBuf::from("~backup/x"));
    }
}
