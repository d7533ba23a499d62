use std::sync::mpsc;
use std::thread;

use watermark_core::{
    Effect, FormField, Msg, OperationKind, OperationReply, OperationRequest, SubmissionFailure,
};
use watermark_engine::{
    EngineEvent, EngineEvents, EngineHandle, GatewayError, GatewayReply, Operation, UploadField,
    UploadRequest,
};
use watermark_logging::wm_info;

use super::app::HostEvent;
use super::config::ClientConfig;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &ClientConfig, host_tx: mpsc::Sender<HostEvent>) -> Result<Self, GatewayError> {
        let (engine, events) =
            EngineHandle::new(config.gateway_settings(), config.output_dir.clone())?;
        spawn_event_pump(events, host_tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit(request) => {
                    wm_info!(
                        "Submit submission_id={} endpoint={}",
                        request.submission_id,
                        request.kind.endpoint()
                    );
                    self.engine.submit(to_upload(request));
                }
                Effect::Download { filename } => {
                    wm_info!("Download filename={}", filename);
                    self.engine.download(filename);
                }
            }
        }
    }
}

fn spawn_event_pump(events: EngineEvents, host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if host_tx.send(HostEvent::Msg(to_msg(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn to_upload(request: OperationRequest) -> UploadRequest {
    let fields = request
        .fields
        .into_iter()
        .map(|field| match field {
            FormField::File { name, file } => UploadField::File {
                name,
                file_name: file.name,
                path: file.path,
            },
            FormField::Text { name, value } => UploadField::Text { name, value },
        })
        .collect();
    UploadRequest {
        submission_id: request.submission_id,
        operation: map_kind(request.kind),
        fields,
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SubmissionSettled {
            submission_id,
            operation,
            result,
        } => Msg::SubmissionSettled {
            submission_id,
            kind: map_operation(operation),
            result: result
                .map(map_reply)
                .map_err(|err| SubmissionFailure::Transport(err.to_string())),
        },
        EngineEvent::DownloadFinished { filename, result } => Msg::DownloadFinished {
            filename,
            result: result
                .map(|path| path.display().to_string())
                .map_err(|err| err.to_string()),
        },
    }
}

fn map_kind(kind: OperationKind) -> Operation {
    match kind {
        OperationKind::Embed => Operation::Embed,
        OperationKind::Detect => Operation::Detect,
    }
}

fn map_operation(operation: Operation) -> OperationKind {
    match operation {
        Operation::Embed => OperationKind::Embed,
        Operation::Detect => OperationKind::Detect,
    }
}

fn map_reply(reply: GatewayReply) -> OperationReply {
    match reply {
        GatewayReply::Embedded { download_filename } => {
            OperationReply::Embedded { download_filename }
        }
        GatewayReply::Detected { watermark } => OperationReply::Detected { watermark },
        GatewayReply::Rejected { error, .. } => OperationReply::Rejected { error },
    }
}
