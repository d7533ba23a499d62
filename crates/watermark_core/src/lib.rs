//! Watermark client core: pure state machine and view-model helpers.
mod acquisition;
mod effect;
mod msg;
mod operation;
mod presenter;
mod state;
mod update;
mod view_model;

pub use acquisition::{DragEvent, DropZone, SelectedFile, UploadSlot, NO_FILE_CHOSEN};
pub use effect::Effect;
pub use msg::Msg;
pub use operation::{
    interpret, FormField, OperationKind, OperationReply, OperationRequest, SubmissionFailure,
    SubmissionId, NO_WATERMARK_SENTINEL,
};
pub use presenter::{PresentationState, ResultPresenter, SettledContent};
pub use state::{AppState, DownloadStatus, UploadForm};
pub use update::update;
pub use view_model::{AppViewModel, ResultsView, SlotView};
