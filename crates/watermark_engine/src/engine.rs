use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use watermark_logging::{wm_debug, wm_error, wm_info, wm_warn};

use crate::gateway::{Gateway, GatewaySettings, ReqwestGateway};
use crate::{safe_download_name, AtomicFileWriter, EngineEvent, GatewayError, UploadRequest};

enum EngineCommand {
    Submit(UploadRequest),
    Download { filename: String },
}

/// Sending half of the engine. Every command runs as its own task, so an
/// outstanding upload never holds back another one.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving half of the engine: completions in the order they happen.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        settings: GatewaySettings,
        output_dir: PathBuf,
    ) -> Result<(Self, EngineEvents), GatewayError> {
        let gateway = ReqwestGateway::new(settings)?;
        Ok(Self::with_gateway(Arc::new(gateway), output_dir))
    }

    pub fn with_gateway(gateway: Arc<dyn Gateway>, output_dir: PathBuf) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let writer = AtomicFileWriter::new(output_dir);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    wm_error!("Could not start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let gateway = gateway.clone();
                let writer = writer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(gateway.as_ref(), &writer, command, event_tx).await;
                });
            }
            // Let in-flight requests finish once the handle is dropped.
            runtime.shutdown_timeout(Duration::from_secs(5));
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    pub fn submit(&self, request: UploadRequest) {
        if self.cmd_tx.send(EngineCommand::Submit(request)).is_err() {
            wm_warn!("Engine stopped; submission dropped");
        }
    }

    pub fn download(&self, filename: impl Into<String>) {
        let command = EngineCommand::Download {
            filename: filename.into(),
        };
        if self.cmd_tx.send(command).is_err() {
            wm_warn!("Engine stopped; download dropped");
        }
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    gateway: &dyn Gateway,
    writer: &AtomicFileWriter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Submit(request) => {
            let result = gateway.submit(&request).await;
            if let Err(err) = &result {
                wm_debug!(
                    "submission_id={} {} failed: {}",
                    request.submission_id,
                    request.operation,
                    err
                );
            }
            EngineEvent::SubmissionSettled {
                submission_id: request.submission_id,
                operation: request.operation,
                result,
            }
        }
        EngineCommand::Download { filename } => {
            let result = download_to_disk(gateway, writer, &filename).await;
            match &result {
                Ok(path) => wm_info!("Saved {} to {:?}", filename, path),
                Err(err) => wm_warn!("Download of {} failed: {}", filename, err),
            }
            EngineEvent::DownloadFinished { filename, result }
        }
    };
    let _ = event_tx.send(event);
}

async fn download_to_disk(
    gateway: &dyn Gateway,
    writer: &AtomicFileWriter,
    filename: &str,
) -> Result<PathBuf, GatewayError> {
    let content = gateway.download(filename).await?;
    let local_name = safe_download_name(filename);
    let writer = writer.clone();
    tokio::task::spawn_blocking(move || writer.write(&local_name, &content))
        .await
        .map_err(|err| GatewayError::Persist(err.to_string()))?
        .map_err(|err| GatewayError::Persist(err.to_string()))
}
