#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use mvnup_common::config::{Config, Environment, InstallOptions};
use mvnup_common::platform::Platform;
use sha2::{Digest, Sha256, Sha512};
use tar::{Builder, Header};

/// A gzipped tarball with every file under `root/`.
pub fn tar_gz(root: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in files {
        let mut header = Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{root}/{name}"), *data)
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn zip_archive(root: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in files {
        writer.start_file(format!("{root}/{name}"), options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn linux() -> Platform {
    Platform::from_consts("linux", "x86_64")
}

/// Options rooted in a throwaway home, pointing both artifacts at `base`.
pub fn options(home: &Path, build_tool_mirror: String) -> InstallOptions {
    InstallOptions {
        destination: home.join("opt/apache-maven-<version>"),
        symlink: Some(home.join("opt/apache-maven")),
        mirror: Some(build_tool_mirror),
        jdk_destination: home.join("opt/temurin-<version>"),
        java_symlink: Some(home.join("opt/java")),
        skip_jdk: true,
        ..Default::default()
    }
}

pub fn config(opts: &InstallOptions, home: &Path, platform: Platform) -> Config {
    let env = Environment {
        home: Some(home.to_path_buf()),
        shell: Some("/bin/bash".to_string()),
        mirror: None,
        jdk_mirror: None,
    };
    Config::resolve(opts, env, platform).unwrap()
}

pub fn bashrc(home: &Path) -> PathBuf {
    home.join(".bashrc")
}
