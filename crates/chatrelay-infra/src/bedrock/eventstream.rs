//! AWS event stream decoding for agent responses.
//!
//! `InvokeAgent` answers with the AWS event stream binary protocol (not SSE).
//! Each frame has the layout:
//!
//! ```text
//! [total_len:4][headers_len:4][prelude_crc:4][headers...][payload...][msg_crc:4]
//! ```
//!
//! Headers say what the frame is: `:message-type` is `event`, `exception` or
//! `error`; `:event-type` / `:exception-type` name the event. `chunk` events
//! carry `{"bytes":"<base64>"}` whose decoded bytes are one answer fragment.
//! CRCs are not checked; TLS already covers integrity.

use std::fmt::Display;

use base64::Engine;
use futures_util::{Stream, StreamExt};

use chatrelay_core::backend::agent::FragmentStream;
use chatrelay_types::error::AgentError;

use super::types::{AgentChunkPayload, ExceptionPayload};

const PRELUDE_LEN: usize = 12;
const MESSAGE_CRC_LEN: usize = 4;

/// One string-valued header from a frame. Non-string headers are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EventHeader {
    name: String,
    value: String,
}

/// A decoded frame, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub message_type: String,
    /// `:event-type` or `:exception-type`, whichever is present.
    pub event_type: String,
    pub error_message: Option<String>,
    pub payload: Vec<u8>,
}

/// What a frame means to the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    Fragment(Vec<u8>),
    Failure(AgentError),
    /// Trace, return-control and other frames the relay does not consume.
    Skip,
}

/// Parse binary headers.
///
/// Header format: `[name_len:1][name:N][type:1][value...]` where the value
/// length depends on the type tag. Only strings (type 7) are kept.
fn parse_headers(mut buf: &[u8]) -> Vec<EventHeader> {
    let mut headers = Vec::new();
    while let Some((&name_len, rest)) = buf.split_first() {
        let name_len = name_len as usize;
        if rest.len() < name_len + 1 {
            break;
        }
        let name = String::from_utf8_lossy(&rest[..name_len]).to_string();
        let header_type = rest[name_len];
        buf = &rest[name_len + 1..];

        let value_len = match header_type {
            0 | 1 => 0,
            2 => 1,
            3 => 2,
            4 => 4,
            5 | 8 => 8,
            9 => 16,
            6 | 7 => {
                if buf.len() < 2 {
                    break;
                }
                let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
                buf = &buf[2..];
                len
            }
            _ => break,
        };
        if buf.len() < value_len {
            break;
        }
        if header_type == 7 {
            let value = String::from_utf8_lossy(&buf[..value_len]).to_string();
            headers.push(EventHeader { name, value });
        }
        buf = &buf[value_len..];
    }
    headers
}

/// Parse one frame from the front of `buf`.
///
/// Returns `Ok(None)` when the buffer does not yet hold a complete frame, and
/// `Ok(Some((frame, consumed)))` otherwise. A prelude whose lengths cannot
/// describe a valid frame is an error; the stream cannot resynchronise.
pub fn parse_frame(buf: &[u8]) -> Result<Option<(Frame, usize)>, AgentError> {
    if buf.len() < PRELUDE_LEN {
        return Ok(None);
    }

    let total_len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    let headers_len = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;

    let headers_end = PRELUDE_LEN + headers_len;
    if total_len < PRELUDE_LEN + MESSAGE_CRC_LEN || headers_end > total_len - MESSAGE_CRC_LEN {
        return Err(AgentError::Stream(format!(
            "malformed event stream prelude (total={total_len}, headers={headers_len})"
        )));
    }
    if buf.len() < total_len {
        return Ok(None);
    }

    let payload_end = total_len - MESSAGE_CRC_LEN;
    let headers = parse_headers(&buf[PRELUDE_LEN..headers_end]);
    let header = |name: &str| headers.iter().find(|h| h.name == name).map(|h| h.value.clone());

    let frame = Frame {
        message_type: header(":message-type").unwrap_or_else(|| "event".to_string()),
        event_type: header(":event-type")
            .or_else(|| header(":exception-type"))
            .unwrap_or_default(),
        error_message: header(":error-message"),
        payload: buf[headers_end..payload_end].to_vec(),
    };
    Ok(Some((frame, total_len)))
}

/// Interpret a frame.
pub fn interpret_frame(frame: Frame) -> Result<FrameEvent, AgentError> {
    match frame.message_type.as_str() {
        "exception" => {
            let payload: ExceptionPayload = serde_json::from_slice(&frame.payload).unwrap_or_default();
            let message = payload.message.unwrap_or_default();
            let err = if frame.event_type.to_lowercase().contains("throttling") {
                AgentError::Throttled(message)
            } else {
                AgentError::Backend(format!("{}: {message}", frame.event_type))
            };
            Ok(FrameEvent::Failure(err))
        }
        "error" => Ok(FrameEvent::Failure(AgentError::Backend(
            frame
                .error_message
                .unwrap_or_else(|| "unspecified event stream error".to_string()),
        ))),
        _ if frame.event_type == "chunk" => {
            let chunk: AgentChunkPayload = serde_json::from_slice(&frame.payload)
                .map_err(|e| AgentError::Decode(format!("chunk wrapper: {e}")))?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(chunk.bytes.as_bytes())
                .map_err(|e| AgentError::Decode(format!("base64 decode: {e}")))?;
            Ok(FrameEvent::Fragment(bytes))
        }
        _ => {
            if !frame.event_type.is_empty() {
                tracing::debug!(event_type = %frame.event_type, "non-chunk agent frame, skipping");
            }
            Ok(FrameEvent::Skip)
        }
    }
}

/// Turn a raw response body into a stream of answer fragments.
///
/// Ends with the first failure; a body that stops mid-frame is reported as a
/// truncated stream.
pub fn fragment_stream<S, B, E>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut body = Box::pin(body);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| AgentError::Stream(format!("response body read: {e}")))?;
            buffer.extend_from_slice(chunk.as_ref());

            // Drain as many complete frames as the buffer holds.
            while let Some((frame, consumed)) = parse_frame(&buffer)? {
                buffer.drain(..consumed);
                match interpret_frame(frame)? {
                    FrameEvent::Fragment(bytes) => yield bytes,
                    FrameEvent::Failure(err) => Err(err)?,
                    FrameEvent::Skip => {}
                }
            }
        }

        if !buffer.is_empty() {
            Err(AgentError::Stream(format!(
                "event stream ended inside a frame ({} bytes pending)",
                buffer.len()
            )))?;
        }
    })
}

/// Frame encoder for tests (dummy CRCs).
#[cfg(test)]
pub(crate) fn encode_frame(headers: &[(&str, &str)], payload: &[u8]) -> Vec<u8> {
    let mut headers_buf = Vec::new();
    for (name, value) in headers {
        headers_buf.push(name.len() as u8);
        headers_buf.extend_from_slice(name.as_bytes());
        headers_buf.push(7);
        headers_buf.extend_from_slice(&(value.len() as u16).to_be_bytes());
        headers_buf.extend_from_slice(value.as_bytes());
    }
    let total_len = PRELUDE_LEN + headers_buf.len() + payload.len() + MESSAGE_CRC_LEN;

    let mut frame = Vec::with_capacity(total_len);
    frame.extend_from_slice(&(total_len as u32).to_be_bytes());
    frame.extend_from_slice(&(headers_buf.len() as u32).to_be_bytes());
    frame.extend_from_slice(&[0u8; 4]);
    frame.extend_from_slice(&headers_buf);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&[0u8; 4]);
    frame
}

/// A `chunk` event frame carrying `text`.
#[cfg(test)]
pub(crate) fn chunk_frame(text: &str) -> Vec<u8> {
    let b64 = base64::engine::general_purpose::STANDARD.encode(text);
    encode_frame(
        &[(":message-type", "event"), (":event-type", "chunk")],
        format!(r#"{{"bytes":"{b64}"}}"#).as_bytes(),
    )
}

/// An exception frame of the given type.
#[cfg(test)]
pub(crate) fn exception_frame(exception_type: &str, message: &str) -> Vec<u8> {
    encode_frame(
        &[(":message-type", "exception"), (":exception-type", exception_type)],
        format!(r#"{{"message":"{message}"}}"#).as_bytes(),
    )
}
