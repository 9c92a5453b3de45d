//! Asynchronous HTTP request helper.
//!
//! [`ajax`] issues exactly one request over the Fetch API and settles
//! exactly once: `Ok` on status 200, `Err` on anything else, including
//! transport-level failures. Body encoding on both sides is negotiated
//! through media types in [`AjaxOptions`].

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::config::{DEFAULT_METHOD, DEFAULT_REQUEST_DATA_TYPE, DEFAULT_RESPONSE_DATA_TYPE, media};
use crate::error::AjaxError;

// =============================================================================
// Options & Response Types
// =============================================================================

/// Configuration for one [`ajax`] call.
///
/// Every field has the documented default, so callers typically start
/// from `AjaxOptions::default()` and override what they need.
pub struct AjaxOptions {
    /// HTTP verb; case-insensitive, normalized to uppercase. Default "GET".
    pub method: String,
    /// Username for the Authorization header. Default none.
    pub username: Option<String>,
    /// Password for the Authorization header; only used with a username.
    pub password: Option<String>,
    /// Invoked synchronously, with no arguments, immediately before the
    /// request is dispatched (loading indicators and the like).
    pub before: Option<Box<dyn FnOnce()>>,
    /// Invoked exactly once after the response is parsed, on success and
    /// failure alike, with the parsed body, status code, and transport.
    pub after: Option<Box<dyn FnOnce(&ResponseBody, u16, Option<&Response>)>>,
    /// Media type of the outgoing body. Default "application/json".
    pub request_data_type: String,
    /// Outgoing payload; ignored for GET. Default none.
    pub data: Option<JsValue>,
    /// Expected media type of the incoming body. Default "text/plain".
    pub response_data_type: String,
}

impl Default for AjaxOptions {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            username: None,
            password: None,
            before: None,
            after: None,
            request_data_type: DEFAULT_REQUEST_DATA_TYPE.to_string(),
            data: None,
            response_data_type: DEFAULT_RESPONSE_DATA_TYPE.to_string(),
        }
    }
}

/// Parsed response payload.
///
/// JSON-typed responses that fail to parse degrade silently to
/// [`ResponseBody::Text`]; a parse failure is never an error by itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON.
    Json(serde_json::Value),
    /// Raw body text.
    Text(String),
}

impl ResponseBody {
    /// The body as text: the raw string, or the JSON value re-serialized.
    pub fn as_text(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Deserialize the body into a caller type.
    ///
    /// Returns `None` when the body does not represent a `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        match self {
            Self::Json(value) => serde_json::from_value(value.clone()).ok(),
            Self::Text(text) => serde_json::from_str(text).ok(),
        }
    }
}

/// Successful outcome of an [`ajax`] call.
#[derive(Debug, Clone)]
pub struct AjaxResponse {
    /// Parsed response body.
    pub body: ResponseBody,
    /// HTTP status code; always 200 on the success path.
    pub status: u16,
    /// The underlying response object.
    pub transport: Response,
}

// =============================================================================
// Request Helper
// =============================================================================

/// Issue one HTTP request and await its outcome.
///
/// Status 200 exactly resolves to `Ok`; every other status, and any
/// transport-level failure (reported as status 0 with no transport
/// reference), rejects with [`AjaxError::Http`] carrying the same parsed
/// body/status/transport triple. The `after` hook runs exactly once on
/// every path that dispatched a request.
pub async fn ajax(url: &str, options: AjaxOptions) -> Result<AjaxResponse, AjaxError> {
    let AjaxOptions {
        method,
        username,
        password,
        before,
        after,
        request_data_type,
        data,
        response_data_type,
    } = options;

    if let Some(before) = before {
        before();
    }

    let window = web_sys::window().ok_or(AjaxError::NoWindow)?;
    let method = normalize_method(&method);

    let opts = RequestInit::new();
    opts.set_method(&method);
    opts.set_mode(RequestMode::Cors);

    let headers = Headers::new().map_err(|_| AjaxError::RequestCreationFailed)?;
    // Multipart bodies need a transport-generated boundary parameter, so
    // the header is left for the transport to fill in.
    if request_data_type != media::MULTIPART_FORM_DATA {
        headers
            .set("Content-Type", &request_data_type)
            .map_err(|_| AjaxError::RequestCreationFailed)?;
    }
    if let Some(username) = &username {
        let credentials = format!("{}:{}", username, password.as_deref().unwrap_or(""));
        headers
            .set(
                "Authorization",
                &format!("Basic {}", BASE64.encode(credentials)),
            )
            .map_err(|_| AjaxError::RequestCreationFailed)?;
    }
    opts.set_headers(&headers);

    if method != "GET"
        && let Some(body) = outgoing_body(&request_data_type, data)
    {
        opts.set_body(&body);
    }

    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|_| AjaxError::RequestCreationFailed)?;

    let response = match JsFuture::from(window.fetch_with_request(&request)).await {
        Ok(value) => value
            .dyn_into::<Response>()
            .map_err(|_| AjaxError::RequestCreationFailed)?,
        Err(err) => {
            // The exchange never produced a response; surface the transport
            // message as the body with an XHR-style zero status.
            let body = ResponseBody::Text(error_message(&err));
            if let Some(after) = after {
                after(&body, 0, None);
            }
            return Err(AjaxError::Http {
                body,
                status: 0,
                transport: None,
            });
        }
    };

    let status = response.status();
    let raw = read_text(&response).await;
    let body = parse_body(raw, &response_data_type);

    if let Some(after) = after {
        after(&body, status, Some(&response));
    }

    // Deliberately narrow success predicate: 200 exactly, not the 2xx range.
    if status == 200 {
        Ok(AjaxResponse {
            body,
            status,
            transport: response,
        })
    } else {
        Err(AjaxError::Http {
            body,
            status,
            transport: Some(response),
        })
    }
}

/// Uppercase the configured HTTP verb.
fn normalize_method(method: &str) -> String {
    method.trim().to_ascii_uppercase()
}

/// Encode the outgoing body for a non-GET request.
///
/// JSON request types serialize the configured payload to a JSON string;
/// every other type passes the payload to the transport untouched.
fn outgoing_body(request_data_type: &str, data: Option<JsValue>) -> Option<JsValue> {
    let data = data?;
    if request_data_type == media::APPLICATION_JSON {
        js_sys::JSON::stringify(&data).ok().map(JsValue::from)
    } else {
        Some(data)
    }
}

/// Read the response body as text.
///
/// Read failures degrade to the empty string so the `after` hook and the
/// status classification still run.
async fn read_text(response: &Response) -> String {
    let Ok(promise) = response.text() else {
        return String::new();
    };
    JsFuture::from(promise)
        .await
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_default()
}

/// Parse the raw body according to the expected response media type.
fn parse_body(raw: String, response_data_type: &str) -> ResponseBody {
    match response_data_type {
        media::APPLICATION_JSON | media::APPLICATION_JAVASCRIPT => {
            match serde_json::from_str(&raw) {
                Ok(value) => ResponseBody::Json(value),
                // Silent fallback: an unparsable body is still a body.
                Err(_) => ResponseBody::Text(raw),
            }
        }
        _ => ResponseBody::Text(raw),
    }
}

fn error_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
