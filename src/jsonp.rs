//! Legacy cross-origin JSONP request helper.
//!
//! [`jsonp`] injects a script element pointing at the target URL and
//! registers a window-global callback the remote endpoint invokes as
//! `(status, response)`. The exchange settles exactly once between the
//! callback branch and a one-shot timeout; the injected script and the
//! callback slot are cleaned up after settlement on every path.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Window};

use crate::config::{
    DEFAULT_JSONP_TIMEOUT_SECS, JSONP_CALLBACK_PREFIX, JSONP_SCRIPT_ID_PREFIX,
    JSONP_TIMEOUT_MESSAGE, JSONP_TIMEOUT_STATUS, MS_PER_SECOND,
};
use crate::error::JsonpError;
use crate::request::ResponseBody;
use crate::url::build_jsonp_url;

// =============================================================================
// Options & Response Types
// =============================================================================

/// Configuration for one [`jsonp`] call.
pub struct JsonpOptions {
    /// Global symbol the remote endpoint invokes. `None` generates a
    /// unique per-call name, which keeps concurrent calls from clobbering
    /// each other's callback slot. Endpoints that require a fixed symbol
    /// can still pin one here; concurrent calls sharing a pinned name are
    /// not supported.
    pub callback_name: Option<String>,
    /// Timeout in seconds. Default 5.
    pub timeout_secs: u32,
    /// Query parameters appended to the request URL, values URL-encoded.
    pub data: Vec<(String, String)>,
    /// Invoked synchronously, with no arguments, before the script is
    /// injected.
    pub before: Option<Box<dyn FnOnce()>>,
    /// Invoked exactly once after the exchange settles, on every branch.
    pub after: Option<Box<dyn FnOnce()>>,
}

impl Default for JsonpOptions {
    fn default() -> Self {
        Self {
            callback_name: None,
            timeout_secs: DEFAULT_JSONP_TIMEOUT_SECS,
            data: Vec::new(),
            before: None,
            after: None,
        }
    }
}

/// Successful outcome of a [`jsonp`] call.
#[derive(Debug, Clone)]
pub struct JsonpResponse {
    /// Response payload passed to the callback.
    pub body: ResponseBody,
    /// Status code passed to the callback; always 200 on this path.
    pub status: u16,
}

thread_local! {
    static NEXT_CALLBACK_ID: Cell<u64> = const { Cell::new(0) };
}

/// Generate a fresh window-global callback name.
fn next_callback_name() -> String {
    NEXT_CALLBACK_ID.with(|id| {
        let n = id.get() + 1;
        id.set(n);
        format!("{}{}", JSONP_CALLBACK_PREFIX, n)
    })
}

// =============================================================================
// JSONP Helper
// =============================================================================

/// Issue one script-tag cross-origin request and await its settlement.
///
/// Exactly one of three terminal outcomes applies, whichever occurs
/// first: the callback fires with status 200 (`Ok`), the callback fires
/// with any other status ([`JsonpError::Status`]), or the timer expires
/// ([`JsonpError::Timeout`], reported as "Request Timeout." / 408). The
/// `after` hook runs exactly once, after settlement.
pub async fn jsonp(url: &str, options: JsonpOptions) -> Result<JsonpResponse, JsonpError> {
    let JsonpOptions {
        callback_name,
        timeout_secs,
        data,
        before,
        after,
    } = options;

    if let Some(before) = before {
        before();
    }

    let window = web_sys::window().ok_or(JsonpError::NoWindow)?;
    let document = window.document().ok_or(JsonpError::NoDocument)?;

    let callback_name = callback_name.unwrap_or_else(next_callback_name);
    let script_id = format!("{}{}", JSONP_SCRIPT_ID_PREFIX, callback_name);
    let full_url = build_jsonp_url(url, &callback_name, &data);

    // Capture the settle functions of a fresh promise; the executor runs
    // synchronously inside `Promise::new`, and the promise itself is what
    // guarantees single settlement between the two branches.
    let mut settle: Option<(Function, Function)> = None;
    let promise = Promise::new(&mut |resolve, reject| {
        settle = Some((resolve, reject));
    });
    let (resolve, reject) = settle.ok_or(JsonpError::CallbackRegistrationFailed)?;

    // One slot for the armed timer; consumed, and thereby cancelled, by
    // the callback branch when it wins.
    let timer: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(|_| JsonpError::ScriptInjectionFailed)?
        .dyn_into()
        .map_err(|_| JsonpError::ScriptInjectionFailed)?;
    script.set_id(&script_id);
    script.set_src(&full_url);

    // The handler the remote endpoint invokes as (status, response).
    let response_handler = {
        let timer = Rc::clone(&timer);
        let resolve = resolve.clone();
        let reject = reject.clone();
        Closure::wrap(Box::new(move |status: JsValue, response: JsValue| {
            drop(timer.borrow_mut().take());
            let code = loose_status(&status);
            let settled = settlement(code, &response, false);
            let target = if code == 200 { &resolve } else { &reject };
            let _ = target.call1(&JsValue::UNDEFINED, &settled);
        }) as Box<dyn FnMut(JsValue, JsValue)>)
    };
    Reflect::set(
        &window,
        &JsValue::from_str(&callback_name),
        response_handler.as_ref(),
    )
    .map_err(|_| JsonpError::CallbackRegistrationFailed)?;

    // Appending the element dispatches the request.
    let inject = document
        .body()
        .ok_or(JsonpError::ScriptInjectionFailed)
        .and_then(|body| {
            body.append_child(&script)
                .map_err(|_| JsonpError::ScriptInjectionFailed)
        });
    if let Err(err) = inject {
        neutralize_callback(&window, &callback_name);
        return Err(err);
    }

    let timeout_handler = {
        let window = window.clone();
        let callback_name = callback_name.clone();
        let script_id = script_id.clone();
        move || {
            // A late response must find a no-op, not a settled promise or
            // a dropped closure.
            neutralize_callback(&window, &callback_name);
            remove_script(&script_id);
            let settled = settlement(
                JSONP_TIMEOUT_STATUS,
                &JsValue::from_str(JSONP_TIMEOUT_MESSAGE),
                true,
            );
            let _ = reject.call1(&JsValue::UNDEFINED, &settled);
        }
    };
    *timer.borrow_mut() = Some(Timeout::new(
        timeout_secs.saturating_mul(MS_PER_SECOND),
        timeout_handler,
    ));

    let outcome = JsFuture::from(promise).await;

    // Post-settlement cleanup, shared by every branch: cancel the timer,
    // detach the global slot before the closure drops, remove the script.
    drop(timer.borrow_mut().take());
    neutralize_callback(&window, &callback_name);
    remove_script(&script_id);
    drop(response_handler);

    if let Some(after) = after {
        after();
    }

    match outcome {
        Ok(settled) => Ok(JsonpResponse {
            body: settled_body(&settled),
            status: settled_status(&settled),
        }),
        Err(settled) => {
            let timed_out = Reflect::get(&settled, &JsValue::from_str("timedOut"))
                .ok()
                .and_then(|value| value.as_bool())
                .unwrap_or(false);
            if timed_out {
                Err(JsonpError::Timeout)
            } else {
                Err(JsonpError::Status {
                    body: settled_body(&settled),
                    status: settled_status(&settled),
                })
            }
        }
    }
}

// =============================================================================
// Settlement Plumbing
// =============================================================================

/// Replace the window-global callback slot with a JS no-op.
fn neutralize_callback(window: &Window, callback_name: &str) {
    let _ = Reflect::set(
        window,
        &JsValue::from_str(callback_name),
        &Function::new_no_args(""),
    );
}

/// Remove the injected script element, if it is still in the document.
fn remove_script(script_id: &str) {
    if let Some(window) = web_sys::window()
        && let Some(document) = window.document()
        && let Some(element) = document.get_element_by_id(script_id)
    {
        element.remove();
    }
}

/// Status code as the remote endpoint reported it, numeric or stringly.
fn loose_status(status: &JsValue) -> u16 {
    status
        .as_f64()
        .or_else(|| status.as_string().and_then(|s| s.parse().ok()))
        .unwrap_or(0.0) as u16
}

/// Build the `{ status, body }` value a settlement carries.
fn settlement(status: u16, body: &JsValue, timed_out: bool) -> JsValue {
    let settled = Object::new();
    let _ = Reflect::set(
        &settled,
        &JsValue::from_str("status"),
        &JsValue::from_f64(f64::from(status)),
    );
    let _ = Reflect::set(&settled, &JsValue::from_str("body"), body);
    if timed_out {
        let _ = Reflect::set(&settled, &JsValue::from_str("timedOut"), &JsValue::TRUE);
    }
    settled.into()
}

fn settled_status(settled: &JsValue) -> u16 {
    Reflect::get(settled, &JsValue::from_str("status"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0) as u16
}

fn settled_body(settled: &JsValue) -> ResponseBody {
    let raw = Reflect::get(settled, &JsValue::from_str("body")).unwrap_or(JsValue::UNDEFINED);
    lift_body(&raw)
}

/// Lift a callback payload into a [`ResponseBody`].
fn lift_body(value: &JsValue) -> ResponseBody {
    if let Some(text) = value.as_string() {
        return ResponseBody::Text(text);
    }
    match serde_wasm_bindgen::from_value::<serde_json::Value>(value.clone()) {
        Ok(parsed) => ResponseBody::Json(parsed),
        Err(_) => ResponseBody::Text(format!("{:?}", value)),
    }
}
