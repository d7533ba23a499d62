use crate::{DragEvent, OperationKind, OperationReply, SelectedFile, SubmissionFailure, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Files chosen through the native picker of one form.
    FilesPicked {
        kind: OperationKind,
        files: Vec<SelectedFile>,
    },
    /// Drag lifecycle event over one form's drop region.
    Drag {
        kind: OperationKind,
        event: DragEvent,
    },
    /// User edited the secret message of the embed form.
    MessageEdited(String),
    /// User submitted one of the forms.
    SubmitClicked(OperationKind),
    /// Engine completion for a submission.
    SubmissionSettled {
        submission_id: SubmissionId,
        kind: OperationKind,
        result: Result<OperationReply, SubmissionFailure>,
    },
    /// User followed the download link in the results area.
    DownloadClicked,
    /// Engine completion for a download; `Ok` carries the saved location.
    DownloadFinished {
        filename: String,
        result: Result<String, String>,
    },
}
