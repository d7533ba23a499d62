use watermark_logging::{wm_info, wm_warn};

use crate::{interpret, AppState, DownloadStatus, Effect, Msg, OperationKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked { kind, files } => {
            if state.form_mut(kind).pick(files) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Drag { kind, event } => {
            if state.form_mut(kind).drag(event) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MessageEdited(message) => {
            if state.form_mut(OperationKind::Embed).set_message(message) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SubmitClicked(kind) => {
            if !state.form(kind).slot().is_active() {
                wm_warn!("{} submit ignored: no file chosen", kind);
                return (state, Vec::new());
            }
            let submission_id = state.allocate_submission_id();
            let Some(request) = state.form(kind).snapshot(submission_id) else {
                return (state, Vec::new());
            };
            wm_info!(
                "Submit submission_id={} kind={} fields={}",
                submission_id,
                kind,
                request.fields.len()
            );
            state.form_mut(kind).begin_submission();
            state.presenter_mut().show_busy();
            state.mark_dirty();
            vec![Effect::Submit(request)]
        }
        Msg::SubmissionSettled {
            submission_id,
            kind,
            result,
        } => {
            let content = interpret(kind, &result);
            if content.is_error() {
                wm_warn!(
                    "Settled submission_id={} kind={} with error: {}",
                    submission_id,
                    kind,
                    content.text()
                );
            } else {
                wm_info!("Settled submission_id={} kind={}", submission_id, kind);
            }
            state.form_mut(kind).end_submission();
            state.presenter_mut().show_settled(kind, content);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DownloadClicked => match state.presenter().download_filename() {
            Some(filename) => {
                let filename = filename.to_string();
                state.set_download(DownloadStatus::InProgress {
                    filename: filename.clone(),
                });
                state.mark_dirty();
                vec![Effect::Download { filename }]
            }
            None => Vec::new(),
        },
        Msg::DownloadFinished { filename, result } => {
            let status = match result {
                Ok(location) => DownloadStatus::Saved { filename, location },
                Err(error) => DownloadStatus::Failed { filename, error },
            };
            state.set_download(status);
            state.mark_dirty();
            Vec::new()
        }
    };

    (state, effects)
}
