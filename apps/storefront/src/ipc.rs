//! # Invoke Loop
//!
//! One JSON request per line in, one JSON response per line out.
//!
//! ```text
//! stdin  ─► {"id":1,"cmd":"get_cart"}
//! stdout ◄─ {"id":1,"ok":true,"data":{"items":[],"totals":{...}}}
//!
//! stdin  ─► {"id":2,"cmd":"toggle_section","args":{"section":9}}
//! stdout ◄─ {"id":2,"ok":false,"error":{"code":"BAD_REQUEST","message":"..."}}
//! ```
//!
//! Requests are handled one at a time, in arrival order. A line that is not
//! a valid request gets an error response with a `null` id.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::error::ApiError;
use crate::state::StorefrontState;

#[derive(Debug, Deserialize)]
pub struct Request {
    /// Echoed back so the caller can match responses.
    #[serde(default)]
    pub id: Value,
    pub cmd: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn success(id: Value, data: Value) -> Self {
        Response {
            id,
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(id: Value, error: ApiError) -> Self {
        Response {
            id,
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Handles one input line. Blank lines produce no response.
pub async fn handle_line(state: &StorefrontState, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(cmd = %request.cmd, "Invoke request");
            match commands::dispatch(state, &request.cmd, request.args).await {
                Ok(data) => Response::success(request.id, data),
                Err(err) => {
                    debug!(cmd = %request.cmd, code = ?err.code, "Command failed: {}", err.message);
                    Response::failure(request.id, err)
                }
            }
        }
        Err(e) => {
            warn!("Malformed invoke request: {}", e);
            Response::failure(Value::Null, ApiError::bad_request(format!("Malformed request: {}", e)))
        }
    };

    match serde_json::to_string(&response) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            error!("Failed to encode response: {}", e);
            let fallback = Response::failure(response.id, ApiError::internal("Failed to encode response"));
            serde_json::to_string(&fallback).ok()
        }
    }
}

/// Serves requests from `reader` until end of input.
pub async fn serve<R, W>(state: &StorefrontState, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        if let Some(response) = handle_line(state, &line).await {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            handled += 1;
        }
    }

    info!(handled, "Input closed, invoke loop stopped");
    Ok(())
}
