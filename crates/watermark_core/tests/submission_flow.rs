use std::sync::Once;

use pretty_assertions::assert_eq;
use watermark_core::{
    update, AppState, DownloadStatus, Effect, FormField, Msg, OperationKind, OperationReply,
    OperationRequest, PresentationState, SelectedFile, SettledContent, SubmissionFailure,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watermark_logging::initialize_for_tests);
}

fn wav(name: &str) -> SelectedFile {
    SelectedFile::new(name, format!("/audio/{name}"), 2048)
}

fn with_file(kind: OperationKind, name: &str) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesPicked {
            kind,
            files: vec![wav(name)],
        },
    );
    state
}

fn submit(state: AppState, kind: OperationKind) -> (AppState, OperationRequest) {
    let (state, effects) = update(state, Msg::SubmitClicked(kind));
    match effects.as_slice() {
        [Effect::Submit(request)] => {
            let request = request.clone();
            (state, request)
        }
        other => panic!("expected one submit effect, got {other:?}"),
    }
}

fn settle(
    state: AppState,
    request: &OperationRequest,
    result: Result<OperationReply, SubmissionFailure>,
) -> AppState {
    let (state, effects) = update(
        state,
        Msg::SubmissionSettled {
            submission_id: request.submission_id,
            kind: request.kind,
            result,
        },
    );
    assert!(effects.is_empty());
    state
}

fn settled_content(state: &AppState) -> SettledContent {
    match state.presenter().state() {
        PresentationState::Settled { content, .. } => content.clone(),
        other => panic!("expected settled state, got {other:?}"),
    }
}

#[test]
fn submit_without_file_is_refused() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::SubmitClicked(OperationKind::Detect));
    assert!(effects.is_empty());
    assert_eq!(state.presenter().state(), &PresentationState::Hidden);
    assert!(!state.consume_dirty());
}

#[test]
fn submit_goes_busy_before_the_response() {
    init_logging();
    let state = with_file(OperationKind::Detect, "a.wav");
    let (state, request) = submit(state, OperationKind::Detect);

    assert_eq!(state.presenter().state(), &PresentationState::Busy);
    let view = state.view();
    assert!(view.results.visible);
    assert!(view.results.busy);
    assert!(view.results.text.is_empty());
    assert_eq!(view.detect.in_flight, 1);
    assert_eq!(request.kind, OperationKind::Detect);
    assert_eq!(state.in_flight_total(), 1);
    assert!(state.has_pending_work());
}

#[test]
fn embed_snapshot_carries_file_and_message() {
    init_logging();
    let state = with_file(OperationKind::Embed, "song.wav");
    let (state, _) = update(state, Msg::MessageEdited("top secret".to_string()));
    let (_state, request) = submit(state, OperationKind::Embed);

    assert_eq!(
        request.fields,
        vec![
            FormField::File {
                name: "audio".to_string(),
                file: wav("song.wav"),
            },
            FormField::Text {
                name: "watermark".to_string(),
                value: "top secret".to_string(),
            },
        ]
    );
}

#[test]
fn embed_success_links_to_download() {
    init_logging();
    let state = with_file(OperationKind::Embed, "in.wav");
    let (state, request) = submit(state, OperationKind::Embed);
    let state = settle(
        state,
        &request,
        Ok(OperationReply::Embedded {
            download_filename: "out.wav".to_string(),
        }),
    );

    assert_eq!(
        settled_content(&state),
        SettledContent::DownloadLink {
            filename: "out.wav".to_string()
        }
    );
    assert_eq!(state.presenter().download_filename(), Some("out.wav"));
    let view = state.view();
    assert!(view.results.markup.contains("href=\"/download/out.wav\""));
    assert!(!view.results.busy);
    assert_eq!(view.embed.in_flight, 0);
}

#[test]
fn detect_sentinel_is_shown_as_error() {
    init_logging();
    let state = with_file(OperationKind::Detect, "clean.wav");
    let (state, request) = submit(state, OperationKind::Detect);
    let state = settle(
        state,
        &request,
        Ok(OperationReply::Detected {
            watermark: "[No Watermark Found]".to_string(),
        }),
    );

    assert_eq!(
        settled_content(&state),
        SettledContent::ErrorMessage("No watermark was found in this file.".to_string())
    );
    assert!(state.view().results.is_error);
}

#[test]
fn detect_success_quotes_the_message() {
    init_logging();
    let state = with_file(OperationKind::Detect, "sealed.wav");
    let (state, request) = submit(state, OperationKind::Detect);
    let state = settle(
        state,
        &request,
        Ok(OperationReply::Detected {
            watermark: "hello".to_string(),
        }),
    );

    assert_eq!(state.view().results.text, "Secret Message Found: \"hello\"");
}

#[test]
fn rejection_has_same_text_for_both_kinds() {
    init_logging();
    for kind in OperationKind::ALL {
        let state = with_file(kind, "bad.wav");
        let (state, request) = submit(state, kind);
        let state = settle(
            state,
            &request,
            Ok(OperationReply::Rejected {
                error: "bad file".to_string(),
            }),
        );
        assert_eq!(state.view().results.text, "Error: bad file");
    }
}

#[test]
fn transport_failure_keeps_detail() {
    init_logging();
    let state = with_file(OperationKind::Embed, "a.wav");
    let (state, request) = submit(state, OperationKind::Embed);
    let state = settle(
        state,
        &request,
        Err(SubmissionFailure::Transport("connection refused".to_string())),
    );

    let text = state.view().results.text;
    assert!(text.starts_with("Server connection error:"));
    assert!(text.contains("connection refused"));
}

#[test]
fn last_resolved_submission_wins() {
    init_logging();
    let state = with_file(OperationKind::Embed, "a.wav");
    let (state, _) = update(
        state,
        Msg::FilesPicked {
            kind: OperationKind::Detect,
            files: vec![wav("b.wav")],
        },
    );
    let (state, embed_request) = submit(state, OperationKind::Embed);
    let (state, detect_request) = submit(state, OperationKind::Detect);
    assert!(detect_request.submission_id > embed_request.submission_id);

    let state = settle(
        state,
        &detect_request,
        Ok(OperationReply::Detected {
            watermark: "hi".to_string(),
        }),
    );
    let state = settle(
        state,
        &embed_request,
        Ok(OperationReply::Embedded {
            download_filename: "sealed_a.wav".to_string(),
        }),
    );

    let view = state.view();
    assert_eq!(view.results.settled_by, Some(OperationKind::Embed));
    assert_eq!(
        settled_content(&state),
        SettledContent::DownloadLink {
            filename: "sealed_a.wav".to_string()
        }
    );
}

#[test]
fn resubmitting_after_failure_goes_busy_again() {
    init_logging();
    let state = with_file(OperationKind::Detect, "a.wav");
    let (state, request) = submit(state, OperationKind::Detect);
    let state = settle(
        state,
        &request,
        Err(SubmissionFailure::Transport("timed out".to_string())),
    );
    let (state, second) = submit(state, OperationKind::Detect);

    assert_ne!(second.submission_id, request.submission_id);
    assert_eq!(state.presenter().state(), &PresentationState::Busy);
}

#[test]
fn download_only_follows_a_shown_link() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::DownloadClicked);
    assert!(effects.is_empty());

    let state = with_file(OperationKind::Embed, "in.wav");
    let (state, request) = submit(state, OperationKind::Embed);
    let state = settle(
        state,
        &request,
        Ok(OperationReply::Embedded {
            download_filename: "sealed_in.wav".to_string(),
        }),
    );
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert!(state.has_pending_work());
    assert_eq!(
        effects,
        vec![Effect::Download {
            filename: "sealed_in.wav".to_string()
        }]
    );

    let (state, _) = update(
        state,
        Msg::DownloadFinished {
            filename: "sealed_in.wav".to_string(),
            result: Ok("/out/sealed_in.wav".to_string()),
        },
    );
    assert!(!state.has_pending_work());
    assert_eq!(
        state.view().download,
        Some(DownloadStatus::Saved {
            filename: "sealed_in.wav".to_string(),
            location: "/out/sealed_in.wav".to_string(),
        })
    );
}
