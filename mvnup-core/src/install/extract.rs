// mvnup-core/src/install/extract.rs
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use mvnup_common::error::{InstallError, Result};
use mvnup_common::platform::Platform;
use tar::Archive;
use tracing::{debug, warn};
use xz2::read::XzDecoder;
use zip::read::ZipArchive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    TarXz,
    TarBz2,
    Tar,
}

impl ArchiveKind {
    /// Picks the format from the file name. On Windows-family platforms an
    /// archive without a tar suffix is assumed to be a zip.
    pub fn detect(archive_path: &Path, platform: &Platform) -> Option<Self> {
        let name = archive_path.file_name()?.to_string_lossy().to_ascii_lowercase();
        let kind = if name.ends_with(".zip") {
            ArchiveKind::Zip
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            ArchiveKind::TarGz
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            ArchiveKind::TarXz
        } else if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") || name.ends_with(".tbz") {
            ArchiveKind::TarBz2
        } else if name.ends_with(".tar") {
            ArchiveKind::Tar
        } else if platform.is_windows_family() {
            ArchiveKind::Zip
        } else {
            return None;
        };
        Some(kind)
    }
}

/// Hidden sibling used while unpacking: `.<destination-name>.tmp`.
pub fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "install".to_string());
    destination.with_file_name(format!(".{name}.tmp"))
}

/// Removes the staging directory when dropped, whatever the outcome.
struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    fn create(path: PathBuf) -> Result<Self> {
        if path.symlink_metadata().is_ok() {
            debug!("Removing stale staging directory {}", path.display());
            remove_any(&path).map_err(|e| InstallError::fs(&path, e))?;
        }
        fs::create_dir_all(&path).map_err(|e| InstallError::fs(&path, e))?;
        Ok(Self { path })
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                warn!(
                    "Failed to remove staging directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

fn remove_any(path: &Path) -> io::Result<()> {
    let meta = path.symlink_metadata()?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn ensure_absent(destination: &Path) -> Result<()> {
    if destination.symlink_metadata().is_ok() {
        return Err(InstallError::DestinationExists(destination.to_path_buf()));
    }
    Ok(())
}

/// Unpacks `archive_path` so that its single top-level directory becomes
/// `destination`. The destination is either left untouched or appears fully
/// populated; partial content only ever lives in the staging directory.
pub fn extract_archive(
    archive_path: &Path,
    destination: &Path,
    platform: &Platform,
) -> Result<PathBuf> {
    ensure_absent(destination)?;
    let kind = ArchiveKind::detect(archive_path, platform).ok_or_else(|| {
        InstallError::corrupt(archive_path, "unsupported archive type")
    })?;
    debug!(
        "Extracting {} ({:?}) to {}",
        archive_path.display(),
        kind,
        destination.display()
    );

    let staging = StagingDir::create(staging_path(destination))?;
    let file = File::open(archive_path).map_err(|e| InstallError::fs(archive_path, e))?;
    match kind {
        ArchiveKind::Zip => extract_zip_archive(file, &staging.path, archive_path)?,
        ArchiveKind::TarGz => extract_tar_archive(GzDecoder::new(file), &staging.path, archive_path)?,
        ArchiveKind::TarXz => extract_tar_archive(XzDecoder::new(file), &staging.path, archive_path)?,
        ArchiveKind::TarBz2 => {
            extract_tar_archive(BzDecoder::new(file), &staging.path, archive_path)?
        }
        ArchiveKind::Tar => extract_tar_archive(file, &staging.path, archive_path)?,
    }

    let root = single_root_dir(&staging.path, archive_path)?;
    ensure_absent(destination)?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::fs(parent, e))?;
    }
    fs::rename(&root, destination).map_err(|e| InstallError::fs(destination, e))?;
    debug!("Moved {} into place at {}", root.display(), destination.display());
    Ok(destination.to_path_buf())
}

/// The one directory the archive unpacked to.
fn single_root_dir(staging: &Path, archive_path: &Path) -> Result<PathBuf> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(staging).map_err(|e| InstallError::fs(staging, e))? {
        let entry = entry.map_err(|e| InstallError::fs(staging, e))?;
        entries.push(entry.path());
    }
    match entries.as_slice() {
        [only] if is_real_dir(only) => Ok(only.clone()),
        [] => Err(InstallError::corrupt(archive_path, "archive is empty")),
        [only] => Err(InstallError::corrupt(
            archive_path,
            format!(
                "expected a single top-level directory, found file '{}'",
                only.file_name().unwrap_or_default().to_string_lossy()
            ),
        )),
        many => Err(InstallError::corrupt(
            archive_path,
            format!(
                "expected a single top-level directory, found {} entries",
                many.len()
            ),
        )),
    }
}

fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_dir())
}

/// Fails if any existing component of `relative` under `target_dir` is a
/// symlink, so nothing is ever written through a link.
fn ensure_no_symlink_in_path(target_dir: &Path, relative: &Path, archive_path: &Path) -> Result<()> {
    let mut current = target_dir.to_path_buf();
    for comp in relative.components() {
        current.push(comp);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(InstallError::corrupt(
                    archive_path,
                    format!("entry {} is written through a symlink", relative.display()),
                ))
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    Ok(())
}

/// A symlink at `relative` pointing at `link_target` must stay inside the
/// extraction root.
fn check_link_target(relative: &Path, link_target: &Path, archive_path: &Path) -> Result<()> {
    let escapes = || {
        InstallError::corrupt(
            archive_path,
            format!(
                "symlink {} -> {} points outside the archive",
                relative.display(),
                link_target.display()
            ),
        )
    };
    let mut depth: usize = relative.parent().map_or(0, |p| p.components().count());
    for comp in link_target.components() {
        match comp {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => depth = depth.checked_sub(1).ok_or_else(escapes)?,
            Component::Prefix(_) | Component::RootDir => return Err(escapes()),
        }
    }
    Ok(())
}

/// Rejects absolute paths and `..`; returns the path with `.` segments dropped.
fn safe_relative_path(path: &Path, archive_path: &Path) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Normal(p) => clean.push(p),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(InstallError::corrupt(
                    archive_path,
                    format!("unsafe '..' in entry path {}", path.display()),
                ))
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(InstallError::corrupt(
                    archive_path,
                    format!("absolute entry path {}", path.display()),
                ))
            }
        }
    }
    Ok(clean)
}

fn unpack_error(archive_path: &Path, target: &Path, e: io::Error) -> InstallError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        return InstallError::fs(target, e);
    }
    InstallError::corrupt(
        archive_path,
        format!("failed to unpack {}: {}", target.display(), e),
    )
}

fn extract_tar_archive<R: Read>(reader: R, target_dir: &Path, archive_path: &Path) -> Result<()> {
    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.set_overwrite(true);

    let entries = archive
        .entries()
        .map_err(|e| InstallError::corrupt(archive_path, e.to_string()))?;
    for entry_result in entries {
        let mut entry = entry_result.map_err(|e| {
            InstallError::corrupt(archive_path, format!("error reading TAR entry: {e}"))
        })?;
        let path_in_archive = entry
            .path()
            .map_err(|e| {
                InstallError::corrupt(archive_path, format!("invalid path in TAR entry: {e}"))
            })?
            .into_owned();
        let relative = safe_relative_path(&path_in_archive, archive_path)?;
        if relative.as_os_str().is_empty() {
            continue;
        }

        let unpacked = entry
            .unpack_in(target_dir)
            .map_err(|e| unpack_error(archive_path, &target_dir.join(&relative), e))?;
        if !unpacked {
            return Err(InstallError::corrupt(
                archive_path,
                format!("entry {} escapes the target directory", relative.display()),
            ));
        }
    }
    debug!("Finished TAR extraction for {}", archive_path.display());
    Ok(())
}

fn extract_zip_archive<R: Read + Seek>(
    reader: R,
    target_dir: &Path,
    archive_path: &Path,
) -> Result<()> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| InstallError::corrupt(archive_path, format!("failed to open ZIP: {e}")))?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| {
            InstallError::corrupt(archive_path, format!("error reading ZIP index {i}: {e}"))
        })?;
        let raw_name = file.name().to_string();
        let relative = match file.enclosed_name() {
            Some(p) => safe_relative_path(&p.to_path_buf(), archive_path)?,
            None => {
                return Err(InstallError::corrupt(
                    archive_path,
                    format!("unsafe entry path {raw_name}"),
                ))
            }
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let out_path = target_dir.join(&relative);
        ensure_no_symlink_in_path(target_dir, &relative, archive_path)?;

        if file.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| InstallError::fs(&out_path, e))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::fs(parent, e))?;
        }

        if file.is_symlink() {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .map_err(|e| unpack_error(archive_path, &out_path, e))?;
            let link_target = PathBuf::from(String::from_utf8_lossy(&buf).to_string());
            check_link_target(&relative, &link_target, archive_path)?;
            #[cfg(unix)]
            {
                std::os::unix::fs::symlink(&link_target, &out_path)
                    .map_err(|e| InstallError::fs(&out_path, e))?;
            }
            #[cfg(not(unix))]
            {
                warn!(
                    "Cannot create symlink on non-unix system: {} -> {}",
                    out_path.display(),
                    link_target.display()
                );
            }
            continue;
        }

        let mut out_file = File::create(&out_path).map_err(|e| InstallError::fs(&out_path, e))?;
        io::copy(&mut file, &mut out_file).map_err(|e| unpack_error(archive_path, &out_path, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(|e| InstallError::fs(&out_path, e))?;
            }
        }
    }
    debug!("Finished ZIP extraction for {}", archive_path.display());
    Ok(())
}
