use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Ordering tag for list and search requests, assigned by the caller.
pub type RequestSeq = u64;

/// Document as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Size in kilobytes. Missing, null and negative sizes read as 0.
    #[serde(default, deserialize_with = "size_or_zero")]
    pub size: u64,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

fn size_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let size: Option<i64> = Option::deserialize(deserializer)?;
    Ok(size.map_or(0, |size| u64::try_from(size).unwrap_or(0)))
}

/// Failures surfaced by [`crate::DocumentRepository`].
///
/// `Display` yields the message shown to the user; `cause` keeps the
/// transport detail for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("There was an error loading the documents.")]
    LoadFailure { cause: FailureKind },
    #[error("There was an error while searching documents. Please try again.")]
    SearchFailure { cause: FailureKind },
    #[error("An error occured while trying to delete this document. Please try again.")]
    DeleteRejected { id: String, status: u16 },
    #[error("Please try again.")]
    DeleteFailed { id: String, cause: FailureKind },
    #[error("There was an error uploading the file. Please try again.")]
    UploadFailed { cause: FailureKind },
    #[error("File size is too large.")]
    FileTooLarge { max_bytes: u64, actual: u64 },
    #[error("Invalid file type.")]
    InvalidFileType { mime_type: String },
}

impl RepositoryError {
    /// True for failures decided locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RepositoryError::FileTooLarge { .. } | RepositoryError::InvalidFileType { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode(String),
    Network(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode(detail) => write!(f, "undecodable response: {detail}"),
            FailureKind::Network(detail) => write!(f, "network error: {detail}"),
        }
    }
}

/// Completion reports sent from the engine worker back to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The search box has been quiet for the debounce window.
    SearchReady { text: String },
    ListCompleted {
        seq: RequestSeq,
        result: Result<Vec<DocumentRecord>, RepositoryError>,
    },
    SearchCompleted {
        seq: RequestSeq,
        result: Result<Vec<DocumentRecord>, RepositoryError>,
    },
    DeleteCompleted {
        id: String,
        result: Result<(), RepositoryError>,
    },
    /// The file passed validation and is being sent.
    UploadStarted,
    UploadCompleted {
        result: Result<DocumentRecord, RepositoryError>,
    },
}
