// mvnup-common/src/model/mod.rs
pub mod artifact;
pub mod outcome;

pub use artifact::{ArtifactKind, ChecksumAlgorithm, InstallRequest};
pub use outcome::{
    ChecksumRecord, DownloadedArchive, InstallReport, InstallResult, InstallStage, ShellUpdate,
};
