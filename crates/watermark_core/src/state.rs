use crate::{
    DragEvent, DropZone, FormField, OperationKind, OperationRequest, ResultPresenter, SelectedFile,
    SubmissionId, UploadSlot,
};
use crate::view_model::{AppViewModel, ResultsView, SlotView};

/// Form field carrying the audio file, as the server reads it.
pub(crate) const AUDIO_FIELD: &str = "audio";
/// Embed form field carrying the secret message.
pub(crate) const WATERMARK_FIELD: &str = "watermark";

/// One operation's form: its upload slot, drop region and auxiliary fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    kind: OperationKind,
    slot: UploadSlot,
    drop_zone: DropZone,
    message: String,
    in_flight: usize,
}

impl UploadForm {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            slot: UploadSlot::new(),
            drop_zone: DropZone::default(),
            message: String::new(),
            in_flight: 0,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn slot(&self) -> &UploadSlot {
        &self.slot
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Picker path. Returns `true` when the slot changed.
    pub(crate) fn pick(&mut self, files: Vec<SelectedFile>) -> bool {
        self.slot.accept(files)
    }

    /// Drag path. Returns `true` when anything visible changed.
    pub(crate) fn drag(&mut self, event: DragEvent) -> bool {
        let was_highlighted = self.drop_zone.is_highlighted();
        let dropped = self.drop_zone.handle(event);
        let slot_changed = dropped.is_some_and(|files| self.slot.accept(files));
        slot_changed || was_highlighted != self.drop_zone.is_highlighted()
    }

    pub(crate) fn set_message(&mut self, message: String) -> bool {
        if self.message == message {
            return false;
        }
        self.message = message;
        true
    }

    /// Snapshot of every field, or `None` while the required file is missing.
    pub(crate) fn snapshot(&self, submission_id: SubmissionId) -> Option<OperationRequest> {
        if !self.slot.is_active() {
            return None;
        }
        let mut fields: Vec<FormField> = self
            .slot
            .files()
            .iter()
            .map(|file| FormField::File {
                name: AUDIO_FIELD.to_string(),
                file: file.clone(),
            })
            .collect();
        if self.kind == OperationKind::Embed {
            fields.push(FormField::Text {
                name: WATERMARK_FIELD.to_string(),
                value: self.message.clone(),
            });
        }
        Some(OperationRequest {
            submission_id,
            kind: self.kind,
            fields,
        })
    }

    pub(crate) fn begin_submission(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn end_submission(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn view(&self) -> SlotView {
        SlotView {
            kind: self.kind,
            display_name: self.slot.display_name().to_string(),
            active: self.slot.is_active(),
            highlighted: self.drop_zone.is_highlighted(),
            message: self.message.clone(),
            in_flight: self.in_flight,
        }
    }
}

/// Progress of the most recent download of a sealed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    InProgress { filename: String },
    Saved { filename: String, location: String },
    Failed { filename: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    embed: UploadForm,
    detect: UploadForm,
    presenter: ResultPresenter,
    next_submission_id: SubmissionId,
    download: Option<DownloadStatus>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            embed: UploadForm::new(OperationKind::Embed),
            detect: UploadForm::new(OperationKind::Detect),
            presenter: ResultPresenter::new(),
            next_submission_id: 1,
            download: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self, kind: OperationKind) -> &UploadForm {
        match kind {
            OperationKind::Embed => &self.embed,
            OperationKind::Detect => &self.detect,
        }
    }

    pub(crate) fn form_mut(&mut self, kind: OperationKind) -> &mut UploadForm {
        match kind {
            OperationKind::Embed => &mut self.embed,
            OperationKind::Detect => &mut self.detect,
        }
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub(crate) fn presenter_mut(&mut self) -> &mut ResultPresenter {
        &mut self.presenter
    }

    pub(crate) fn allocate_submission_id(&mut self) -> SubmissionId {
        let id = self.next_submission_id;
        self.next_submission_id += 1;
        id
    }

    pub fn download(&self) -> Option<&DownloadStatus> {
        self.download.as_ref()
    }

    /// Submissions still awaiting a response, across both forms.
    pub fn in_flight_total(&self) -> usize {
        self.embed.in_flight() + self.detect.in_flight()
    }

    /// Whether any submission or download is still outstanding.
    pub fn has_pending_work(&self) -> bool {
        self.in_flight_total() > 0
            || matches!(self.download, Some(DownloadStatus::InProgress { .. }))
    }

    pub(crate) fn set_download(&mut self, status: DownloadStatus) {
        self.download = Some(status);
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            embed: self.embed.view(),
            detect: self.detect.view(),
            results: ResultsView::from_state(self.presenter.state()),
            download: self.download.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
