// mvnup-net/src/lib.rs
pub mod http;
pub mod urls;
pub mod validation;

pub use http::{build_http_client, download, fetch_text};
pub use urls::{build_urls, ArtifactUrls};
pub use validation::{compute_digest, validate_url, verify_checksum};
