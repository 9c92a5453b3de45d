//! Custom error types for the page helpers.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each helper:
//!
//! - [`DomError`] - option construction/append failures
//! - [`AjaxError`] - fetch transport and HTTP status failures
//! - [`JsonpError`] - script injection, callback, and timeout failures

use std::fmt;

use crate::config::{JSONP_TIMEOUT_MESSAGE, JSONP_TIMEOUT_STATUS};
use crate::request::ResponseBody;

/// DOM mutation errors for the `<select>` helpers.
#[derive(Debug, Clone)]
pub enum DomError {
    /// Failed to construct the option element
    OptionCreationFailed,
    /// Failed to append the option to the select element
    AppendFailed,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OptionCreationFailed => write!(f, "Failed to create option element"),
            Self::AppendFailed => write!(f, "Failed to append option element"),
        }
    }
}

impl std::error::Error for DomError {}

/// Request errors for the `ajax` helper.
///
/// The `Http` variant carries the same triple the success path does, so a
/// rejected exchange still exposes the parsed body, the status code, and
/// (when the exchange reached the server) the transport object.
#[derive(Debug, Clone)]
pub enum AjaxError {
    /// Browser window not available
    NoWindow,
    /// Failed to create the HTTP request
    RequestCreationFailed,
    /// The exchange completed with a non-success outcome. Status 0 with no
    /// transport reference marks a network-level failure (CORS, DNS, ...).
    Http {
        /// Parsed response body, or the transport error message.
        body: ResponseBody,
        /// HTTP status code; 0 when the request never reached a response.
        status: u16,
        /// The underlying response object, when one was received.
        transport: Option<web_sys::Response>,
    },
}

impl fmt::Display for AjaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "Browser window not available"),
            Self::RequestCreationFailed => write!(f, "Failed to create request"),
            Self::Http { status: 0, body, .. } => {
                write!(f, "Network error: {}", body.as_text())
            }
            Self::Http { status, .. } => write!(f, "HTTP error: {}", status),
        }
    }
}

impl std::error::Error for AjaxError {}

/// Errors for the `jsonp` helper.
#[derive(Debug, Clone)]
pub enum JsonpError {
    /// Browser window not available
    NoWindow,
    /// Document not available on the window
    NoDocument,
    /// Failed to create or inject the script element
    ScriptInjectionFailed,
    /// Failed to register the global callback slot
    CallbackRegistrationFailed,
    /// The remote endpoint reported a non-200 status
    Status {
        /// Response payload passed to the callback.
        body: ResponseBody,
        /// Status code passed to the callback.
        status: u16,
    },
    /// The timer fired before the callback was invoked
    Timeout,
}

impl JsonpError {
    /// Status code carried by the rejection, when one applies.
    ///
    /// `Timeout` reports the synthetic 408 the timeout branch settles with.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Timeout => Some(JSONP_TIMEOUT_STATUS),
            _ => None,
        }
    }
}

impl fmt::Display for JsonpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "Browser window not available"),
            Self::NoDocument => write!(f, "Document not available"),
            Self::ScriptInjectionFailed => write!(f, "Failed to inject script element"),
            Self::CallbackRegistrationFailed => write!(f, "Failed to register JSONP callback"),
            Self::Status { status, .. } => write!(f, "JSONP error: {}", status),
            Self::Timeout => write!(f, "{}", JSONP_TIMEOUT_MESSAGE),
        }
    }
}

impl std::error::Error for JsonpError {}
