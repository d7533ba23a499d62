use crate::OperationRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the snapshot to the operation's endpoint.
    Submit(OperationRequest),
    /// Fetch `/download/{filename}` and store it locally.
    Download { filename: String },
}
