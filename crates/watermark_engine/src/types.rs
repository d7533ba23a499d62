use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Embed,
    Detect,
}

impl Operation {
    /// Path segment of the operation's endpoint below the server root.
    pub fn path_segment(self) -> &'static str {
        match self {
            Operation::Embed => "embed",
            Operation::Detect => "detect",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// One multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadField {
    File {
        name: String,
        file_name: String,
        path: PathBuf,
    },
    Text {
        name: String,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub submission_id: SubmissionId,
    pub operation: Operation,
    pub fields: Vec<UploadField>,
}

/// A response whose body decoded as the expected JSON shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    Embedded { download_filename: String },
    Detected { watermark: String },
    Rejected { status: u16, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("could not read {path:?}: {message}")]
    FileAccess { path: PathBuf, message: String },
    #[error("upload too large (max {max_bytes} bytes, actual {actual} bytes)")]
    TooLarge { max_bytes: u64, actual: u64 },
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("unexpected response body (status {status}): {message}")]
    MalformedBody { status: u16, message: String },
    #[error("could not save download: {0}")]
    Persist(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SubmissionSettled {
        submission_id: SubmissionId,
        operation: Operation,
        result: Result<GatewayReply, GatewayError>,
    },
    DownloadFinished {
        filename: String,
        result: Result<PathBuf, GatewayError>,
    },
}
