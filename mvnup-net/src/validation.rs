// mvnup-net/src/validation.rs
use std::fs::File;
use std::io::Read;
use std::path::Path;

use mvnup_common::error::{InstallError, Result};
use mvnup_common::model::{ChecksumAlgorithm, ChecksumRecord};
use reqwest::Client;
use sha2::{Digest, Sha256, Sha512};
use tracing::debug;
use url::Url;

use crate::http::fetch_text;

const CHUNK_SIZE: usize = 1024 * 1024;

/// Validates a URL, ensuring it uses an HTTP(S) scheme.
pub fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| InstallError::Validation(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" | "http" => Ok(()),
        other => Err(InstallError::Validation(format!(
            "Invalid URL scheme for '{url_str}': must be http or https, but got '{other}'"
        ))),
    }
}

fn hash_reader<D: Digest, R: Read>(mut reader: R) -> std::io::Result<(String, u64)> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        total += n as u64;
    }
    Ok((hex::encode(hasher.finalize()), total))
}

/// Lowercase hex digest of the file at `path`.
pub fn compute_digest(path: &Path, algorithm: ChecksumAlgorithm) -> Result<String> {
    let file = File::open(path).map_err(|e| InstallError::fs(path, e))?;
    let (actual, bytes_read) = match algorithm {
        ChecksumAlgorithm::Sha256 => hash_reader::<Sha256, _>(file),
        ChecksumAlgorithm::Sha512 => hash_reader::<Sha512, _>(file),
    }
    .map_err(|e| InstallError::fs(path, e))?;
    debug!(
        "Calculated {}: {} ({} bytes read)",
        algorithm, actual, bytes_read
    );
    Ok(actual)
}

/// Pulls the expected digest out of a checksum sidecar body: first
/// whitespace-delimited token, lowercased.
pub fn parse_expected_checksum(
    body: &str,
    checksum_url: &str,
    expected_len: Option<usize>,
) -> Result<String> {
    let token = body.split_whitespace().next().ok_or_else(|| InstallError::Format {
        url: checksum_url.to_string(),
        reason: "checksum file is empty".to_string(),
    })?;
    if let Some(len) = expected_len {
        if token.len() != len {
            return Err(InstallError::Format {
                url: checksum_url.to_string(),
                reason: format!("expected {len} hex characters, found {}", token.len()),
            });
        }
    }
    if !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InstallError::Format {
            url: checksum_url.to_string(),
            reason: format!("'{token}' is not a hex digest"),
        });
    }
    Ok(token.to_ascii_lowercase())
}

/// Compares the digest of `path` with an expected hex value.
pub fn compare_digest(
    path: &Path,
    algorithm: ChecksumAlgorithm,
    expected_hex: &str,
) -> Result<ChecksumRecord> {
    let record = ChecksumRecord {
        algorithm,
        expected_hex: expected_hex.to_string(),
        actual_hex: compute_digest(path, algorithm)?,
    };
    debug!("Expected {}: {}", algorithm, record.expected_hex);
    if record.matches() {
        Ok(record)
    } else {
        Err(InstallError::ChecksumMismatch {
            path: path.to_path_buf(),
            algorithm: algorithm.to_string(),
            expected: record.expected_hex,
            actual: record.actual_hex,
        })
    }
}

/// Fetches the checksum sidecar at `checksum_url` and verifies `path` against it.
pub async fn verify_checksum(
    client: &Client,
    path: &Path,
    checksum_url: &str,
    algorithm: ChecksumAlgorithm,
    expected_len: Option<usize>,
) -> Result<ChecksumRecord> {
    debug!("Verifying {} checksum for: {}", algorithm, path.display());
    let body = fetch_text(client, checksum_url).await?;
    let expected = parse_expected_checksum(&body, checksum_url, expected_len)?;
    compare_digest(path, algorithm, &expected)
}
