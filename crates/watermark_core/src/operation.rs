use std::fmt;

use crate::{SelectedFile, SettledContent};

/// Value the server reports when a file carries no watermark.
pub const NO_WATERMARK_SENTINEL: &str = "[No Watermark Found]";

pub type SubmissionId = u64;

/// The two server actions, each with its own form and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Embed,
    Detect,
}

impl OperationKind {
    pub const ALL: [OperationKind; 2] = [OperationKind::Embed, OperationKind::Detect];

    pub fn endpoint(self) -> &'static str {
        match self {
            OperationKind::Embed => "/embed",
            OperationKind::Detect => "/detect",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Embed => "embed",
            OperationKind::Detect => "detect",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "embed" => Some(OperationKind::Embed),
            "detect" => Some(OperationKind::Detect),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One named field of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    File { name: String, file: SelectedFile },
    Text { name: String, value: String },
}

/// Snapshot of a form taken at submit time, consumed by exactly one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub submission_id: SubmissionId,
    pub kind: OperationKind,
    pub fields: Vec<FormField>,
}

impl OperationRequest {
    pub fn files(&self) -> impl Iterator<Item = &SelectedFile> {
        self.fields.iter().filter_map(|field| match field {
            FormField::File { file, .. } => Some(file),
            FormField::Text { .. } => None,
        })
    }
}

/// A response that arrived and carried a decodable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationReply {
    /// 2xx from `/embed`.
    Embedded { download_filename: String },
    /// 2xx from `/detect`.
    Detected { watermark: String },
    /// Non-2xx with the server's error text.
    Rejected { error: String },
}

/// The round trip never produced a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    Transport(String),
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionFailure::Transport(detail) => f.write_str(detail),
        }
    }
}

/// Maps the outcome of one submission to the content shown in the results area.
pub fn interpret(
    kind: OperationKind,
    result: &Result<OperationReply, SubmissionFailure>,
) -> SettledContent {
    let reply = match result {
        Ok(reply) => reply,
        Err(failure) => {
            return SettledContent::ErrorMessage(format!("Server connection error: {failure}"));
        }
    };

    match (kind, reply) {
        (_, OperationReply::Rejected { error }) => {
            SettledContent::ErrorMessage(format!("Error: {error}"))
        }
        (OperationKind::Embed, OperationReply::Embedded { download_filename }) => {
            SettledContent::DownloadLink {
                filename: download_filename.clone(),
            }
        }
        (OperationKind::Detect, OperationReply::Detected { watermark }) => {
            if watermark == NO_WATERMARK_SENTINEL {
                SettledContent::ErrorMessage("No watermark was found in this file.".to_string())
            } else {
                SettledContent::SuccessMessage(format!("Secret Message Found: \"{watermark}\""))
            }
        }
        // The engine decodes replies by kind, so a crossed reply means the
        // wiring is broken rather than the server.
        (kind, other) => SettledContent::ErrorMessage(format!(
            "Server connection error: unexpected {kind} reply {other:?}"
        )),
    }
}
