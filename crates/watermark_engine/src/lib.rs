//! Watermark engine: uploads, response decoding and download persistence.
mod engine;
mod filename;
mod gateway;
mod persist;
mod reply;
mod types;

pub use engine::{EngineEvents, EngineHandle};
pub use filename::safe_download_name;
pub use gateway::{Gateway, GatewaySettings, ReqwestGateway};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use reply::decode_reply;
pub use types::{
    EngineEvent, GatewayError, GatewayReply, Operation, SubmissionId, UploadField, UploadRequest,
};
