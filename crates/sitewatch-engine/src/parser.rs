use serde_json::Value;
use sitewatch_types::NetworkEvent;

use crate::error::{Error, Result};
use crate::schema::{DevtoolsEnvelope, LogEntry, ResponseParams};

const METHOD_RESPONSE_RECEIVED: &str = "Network.responseReceived";
const METHOD_LOADING_FAILED: &str = "Network.loadingFailed";

/// Parse a single drained log entry.
///
/// Returns `Ok(Some)` for the two method families the pipeline cares about,
/// `Ok(None)` for well-formed entries of any other method, and `Err` for
/// entries that are not valid envelopes. Callers must treat `Err` as
/// droppable, never fatal.
pub fn parse_entry(raw: &str) -> Result<Option<NetworkEvent>> {
    let envelope = decode_envelope(raw)?;

    match envelope.message.method.as_str() {
        METHOD_RESPONSE_RECEIVED => {
            let params: ResponseParams = serde_json::from_value(envelope.message.params)?;
            let response = params.response;

            let content_type = response.mime_type.clone().or_else(|| {
                response
                    .headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                    .map(|(_, v)| v.clone())
            });

            Ok(Some(NetworkEvent::ResponseReceived {
                url: response.url,
                status: response.status,
                mime_type: content_type,
                headers: response.headers,
            }))
        }
        METHOD_LOADING_FAILED => {
            let params = envelope.message.params;
            let url = str_field(&params, "url").unwrap_or("Unknown URL").to_string();
            let error_text = str_field(&params, "errorText")
                .unwrap_or("Unknown error")
                .to_string();

            Ok(Some(NetworkEvent::LoadingFailed {
                url,
                error_text,
                raw_params: params,
            }))
        }
        _ => Ok(None),
    }
}

/// Unwrap the double-encoded envelope. Entries that arrive already unwrapped
/// (no outer `message` string) are accepted as well; test fixtures and some
/// log transports deliver that shape.
fn decode_envelope(raw: &str) -> Result<DevtoolsEnvelope> {
    if let Ok(entry) = serde_json::from_str::<LogEntry>(raw) {
        return Ok(serde_json::from_str(&entry.message)?);
    }

    serde_json::from_str(raw).map_err(|e| Error::Envelope(e.to_string()))
}

fn str_field<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}
