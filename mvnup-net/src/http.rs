use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use mvnup_common::error::{InstallError, Result};
use mvnup_common::model::DownloadedArchive;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::validation::validate_url;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 10;
const USER_AGENT_STRING: &str = concat!("mvnup/", env!("CARGO_PKG_VERSION"), " (Rust)");

/// Client shared by every request of a run.
pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| InstallError::Config(format!("Failed to build HTTP client: {e}")))
}

/// Path the body is streamed into before the final rename.
fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());
    dest.with_file_name(format!("{name}.part"))
}

async fn get_checked(client: &Client, url: &str) -> Result<Response> {
    validate_url(url)?;
    let response = client.get(url).send().await.map_err(|e| {
        debug!("HTTP request failed for {url}: {e}");
        InstallError::network(url, e.to_string())
    })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);

    if status.is_success() {
        return Ok(response);
    }
    error!("HTTP error {} for URL {}", status, url);
    let reason = match status {
        StatusCode::NOT_FOUND => "Resource not found (404)".to_string(),
        StatusCode::FORBIDDEN => "Access forbidden (403)".to_string(),
        other => format!("HTTP status {other}"),
    };
    Err(InstallError::network(url, reason))
}

/// Streams `url` into `dest`. The body lands in `<dest>.part` first and is
/// renamed only once the last chunk has been written; a failed transfer
/// leaves nothing behind.
pub async fn download(client: &Client, url: &str, dest: &Path) -> Result<DownloadedArchive> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::fs(parent, e))?;
    }
    let part = partial_path(dest);
    debug!("Downloading {} to temporary path: {}", url, part.display());

    match stream_to_file(client, url, &part).await {
        Ok(size_bytes) => {
            fs::rename(&part, dest).map_err(|e| {
                let _ = fs::remove_file(&part);
                InstallError::fs(dest, e)
            })?;
            debug!("Downloaded {} bytes to {}", size_bytes, dest.display());
            Ok(DownloadedArchive {
                source_url: url.to_string(),
                local_path: dest.to_path_buf(),
                size_bytes,
            })
        }
        Err(e) => {
            if part.exists() {
                if let Err(remove_err) = fs::remove_file(&part) {
                    debug!(
                        "Failed to remove partial download {}: {}",
                        part.display(),
                        remove_err
                    );
                }
            }
            Err(e)
        }
    }
}

async fn stream_to_file(client: &Client, url: &str, part: &Path) -> Result<u64> {
    let response = get_checked(client, url).await?;
    let mut file = TokioFile::create(part)
        .await
        .map_err(|e| InstallError::fs(part, e))?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| InstallError::network(url, e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| InstallError::fs(part, e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| InstallError::fs(part, e))?;
    Ok(written)
}

/// Fetches a small text resource such as a checksum sidecar.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = get_checked(client, url).await?;
    response
        .text()
        .await
        .map_err(|e| InstallError::network(url, e.to_string()))
}
