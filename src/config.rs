//! Crate configuration constants.
//!
//! Centralizes the defaults and well-known values shared by the request
//! and JSONP helpers.

// =============================================================================
// Media Types
// =============================================================================

/// Recognized media types for request/response body negotiation.
pub mod media {
    /// JSON bodies; outgoing payloads are stringified, incoming parsed.
    pub const APPLICATION_JSON: &str = "application/json";
    /// Treated like JSON on the response side (JSONP-style endpoints).
    pub const APPLICATION_JAVASCRIPT: &str = "application/javascript";
    /// Multipart bodies; the transport generates the boundary parameter,
    /// so no explicit Content-Type header is set for this type.
    pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
    /// Plain text; the raw response body is used unmodified.
    pub const TEXT_PLAIN: &str = "text/plain";
}

// =============================================================================
// Request Defaults
// =============================================================================

/// Default HTTP method for `ajax`.
pub const DEFAULT_METHOD: &str = "GET";

/// Default media type of the outgoing request body.
pub const DEFAULT_REQUEST_DATA_TYPE: &str = media::APPLICATION_JSON;

/// Default expected media type of the incoming response body.
pub const DEFAULT_RESPONSE_DATA_TYPE: &str = media::TEXT_PLAIN;

// =============================================================================
// JSONP Configuration
// =============================================================================

/// Prefix for generated per-call JSONP callback names.
pub const JSONP_CALLBACK_PREFIX: &str = "jsonpCallback";

/// Prefix for the id of the injected script element. The full id is the
/// prefix followed by the callback name, so each in-flight exchange can
/// locate and remove its own element.
pub const JSONP_SCRIPT_ID_PREFIX: &str = "jsonp-script-";

/// Default JSONP timeout in seconds.
pub const DEFAULT_JSONP_TIMEOUT_SECS: u32 = 5;

/// Synthetic status reported when a JSONP exchange times out.
pub const JSONP_TIMEOUT_STATUS: u16 = 408;

/// Message carried by a JSONP timeout rejection.
pub const JSONP_TIMEOUT_MESSAGE: &str = "Request Timeout.";

// =============================================================================
// Time Constants
// =============================================================================

/// Milliseconds per second for timer arming.
pub const MS_PER_SECOND: u32 = 1000;
