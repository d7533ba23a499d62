use crate::{DownloadStatus, OperationKind, PresentationState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub embed: SlotView,
    pub detect: SlotView,
    pub results: ResultsView,
    pub download: Option<DownloadStatus>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn slot(&self, kind: OperationKind) -> &SlotView {
        match kind {
            OperationKind::Embed => &self.embed,
            OperationKind::Detect => &self.detect,
        }
    }
}

/// Name indicator, drop highlight and fields of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub kind: OperationKind,
    pub display_name: String,
    pub active: bool,
    pub highlighted: bool,
    pub message: String,
    pub in_flight: usize,
}

/// The shared results container: a busy sub-element and a content sub-element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsView {
    pub visible: bool,
    pub busy: bool,
    pub settled_by: Option<OperationKind>,
    pub text: String,
    pub markup: String,
    pub is_error: bool,
}

impl ResultsView {
    pub(crate) fn from_state(state: &PresentationState) -> Self {
        match state {
            PresentationState::Hidden => Self::default(),
            PresentationState::Busy => Self {
                visible: true,
                busy: true,
                ..Self::default()
            },
            PresentationState::Settled { kind, content } => Self {
                visible: true,
                busy: false,
                settled_by: Some(*kind),
                text: content.text(),
                markup: content.to_markup(),
                is_error: content.is_error(),
            },
        }
    }
}
