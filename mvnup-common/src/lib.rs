// mvnup-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod template;

// Re-export key types
pub use config::{Config, InstallOptions, InstallPlan};
pub use error::{InstallError, Result};
pub use model::{ArtifactKind, ChecksumAlgorithm, InstallRequest};
pub use platform::Platform;
