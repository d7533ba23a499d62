use serde::Deserialize;
use serde_json::Value;

use crate::{GatewayError, GatewayReply, Operation};

#[derive(Debug, Deserialize)]
struct EmbedBody {
    download_filename: String,
}

#[derive(Debug, Deserialize)]
struct DetectBody {
    watermark: String,
}

/// Decodes a response body by operation and status class.
///
/// Success bodies carry the operation's payload. Any other status is
/// `Rejected` as long as the body is JSON: a non-string `error` is shown as
/// its JSON text and a missing one as `undefined`. A body that is not JSON
/// at all, or a success body of another shape, is `MalformedBody`.
pub fn decode_reply(
    operation: Operation,
    status: u16,
    body: &[u8],
) -> Result<GatewayReply, GatewayError> {
    let malformed = |err: serde_json::Error| GatewayError::MalformedBody {
        status,
        message: err.to_string(),
    };

    if !(200..300).contains(&status) {
        let value: Value = serde_json::from_slice(body).map_err(malformed)?;
        let error = match value.get("error") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        };
        return Ok(GatewayReply::Rejected { status, error });
    }

    match operation {
        Operation::Embed => {
            let EmbedBody { download_filename } =
                serde_json::from_slice(body).map_err(malformed)?;
            Ok(GatewayReply::Embedded { download_filename })
        }
        Operation::Detect => {
            let DetectBody { watermark } = serde_json::from_slice(body).map_err(malformed)?;
            Ok(GatewayReply::Detected { watermark })
        }
    }
}
