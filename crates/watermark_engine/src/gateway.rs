use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;
use url::Url;
use watermark_logging::{wm_debug, wm_info};

use crate::reply::decode_reply;
use crate::{GatewayError, GatewayReply, UploadField, UploadRequest};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` lets a request run until the server answers or the connection drops.
    pub request_timeout: Option<Duration>,
    pub max_upload_bytes: u64,
    pub max_download_bytes: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_upload_bytes: 500 * MIB,
            max_download_bytes: 500 * MIB,
        }
    }
}

#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Posts one form to its operation endpoint and decodes the answer.
    async fn submit(&self, request: &UploadRequest) -> Result<GatewayReply, GatewayError>;

    /// Fetches `/download/{filename}`.
    async fn download(&self, filename: &str) -> Result<Bytes, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    settings: GatewaySettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| GatewayError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(settings.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn build_form(&self, fields: &[UploadField]) -> Result<Form, GatewayError> {
        let mut total: u64 = 0;
        let mut form = Form::new();
        for field in fields {
            form = match field {
                UploadField::Text { name, value } => form.text(name.clone(), value.clone()),
                UploadField::File {
                    name,
                    file_name,
                    path,
                } => {
                    let (part, len) = file_part(path, file_name).await?;
                    total += len;
                    form.part(name.clone(), part)
                }
            };
        }
        if total > self.settings.max_upload_bytes {
            return Err(GatewayError::TooLarge {
                max_bytes: self.settings.max_upload_bytes,
                actual: total,
            });
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl Gateway for ReqwestGateway {
    async fn submit(&self, request: &UploadRequest) -> Result<GatewayReply, GatewayError> {
        let url = self.endpoint(&[request.operation.path_segment()])?;
        let form = self.build_form(&request.fields).await?;

        wm_info!(
            "POST {} submission_id={}",
            url,
            request.submission_id
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        wm_debug!(
            "submission_id={} status={} body_len={}",
            request.submission_id,
            status,
            body.len()
        );
        decode_reply(request.operation, status, &body)
    }

    async fn download(&self, filename: &str) -> Result<Bytes, GatewayError> {
        let url = self.endpoint(&["download", filename])?;
        wm_info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::HttpStatus(status.as_u16()));
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(GatewayError::TooLarge {
                    max_bytes,
                    actual: content_len,
                });
            }
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = buffer.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(GatewayError::TooLarge {
                    max_bytes,
                    actual: next_len,
                });
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }
}

/// Streams the file from disk instead of buffering it whole.
async fn file_part(path: &Path, file_name: &str) -> Result<(Part, u64), GatewayError> {
    let file_access = |err: std::io::Error| GatewayError::FileAccess {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let file = tokio::fs::File::open(path).await.map_err(file_access)?;
    let len = file.metadata().await.map_err(file_access)?.len();
    let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
    let part = Part::stream_with_length(body, len).file_name(file_name.to_string());
    Ok((part, len))
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::Timeout;
    }
    GatewayError::Transport(err.to_string())
}
