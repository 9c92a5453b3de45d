//! Browser page helpers compiled to WebAssembly.
//!
//! One flat namespace of small, stateless utilities for host page scripts:
//!
//! - [`clear_child_nodes`] - remove every child of a DOM node
//! - [`append_option`] - append one `<option>` to a `<select>`
//! - [`select_value`] - select the first matching `<option>` by value
//! - [`ajax`] - issue one HTTP request and await its parsed outcome
//! - [`jsonp`] - issue one script-tag cross-origin request with a timeout
//!
//! The helpers are independent of each other and hold no state between
//! calls. `ajax` and `jsonp` are async functions whose `Result` carries
//! the single success-or-failure settlement of the exchange.

pub mod config;
mod dom;
mod error;
mod jsonp;
mod request;
mod url;

pub use dom::{OptionAttrs, append_option, clear_child_nodes, select_value};
pub use error::{AjaxError, DomError, JsonpError};
pub use jsonp::{JsonpOptions, JsonpResponse, jsonp};
pub use request::{AjaxOptions, AjaxResponse, ResponseBody, ajax};
