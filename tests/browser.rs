//! Browser-side behavior tests for the DOM, request, and JSONP helpers.
//!
//! Run with `wasm-pack test --headless --chrome` (or any wasm-bindgen
//! test runner); pure parsing and URL logic is covered by native unit
//! tests inside the crate.

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlOptionElement, HtmlSelectElement};

use pagekit::{
    AjaxError, AjaxOptions, JsonpError, JsonpOptions, JsonpResponse, OptionAttrs, ResponseBody,
    ajax, append_option, clear_child_nodes, jsonp, select_value,
};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn new_select() -> HtmlSelectElement {
    document()
        .create_element("select")
        .unwrap()
        .dyn_into()
        .unwrap()
}

fn option_at(select: &HtmlSelectElement, index: u32) -> HtmlOptionElement {
    select.options().item(index).unwrap().dyn_into().unwrap()
}

// =============================================================================
// DOM Helpers
// =============================================================================

#[wasm_bindgen_test]
fn clear_child_nodes_empties_parent() {
    let parent = document().create_element("div").unwrap();
    for _ in 0..3 {
        let child = document().create_element("span").unwrap();
        parent.append_child(&child).unwrap();
    }
    assert!(parent.has_child_nodes());

    clear_child_nodes(&parent);
    assert!(!parent.has_child_nodes());

    // Second call on an already-empty parent is a no-op.
    clear_child_nodes(&parent);
    assert!(!parent.has_child_nodes());
}

#[wasm_bindgen_test]
fn append_option_defaults_text_to_value() {
    let select = new_select();
    append_option(&select, "x", OptionAttrs::default()).unwrap();

    let option = option_at(&select, 0);
    assert_eq!(option.value(), "x");
    assert_eq!(option.text(), "x");
}

#[wasm_bindgen_test]
fn append_option_keeps_value_and_text_distinct() {
    let select = new_select();
    append_option(
        &select,
        "x",
        OptionAttrs {
            selected: false,
            text: Some("Y".to_string()),
        },
    )
    .unwrap();

    let option = option_at(&select, 0);
    assert_eq!(option.value(), "x");
    assert_eq!(option.text(), "Y");
}

#[wasm_bindgen_test]
fn append_option_selected_flag() {
    let select = new_select();
    append_option(&select, "a", OptionAttrs::default()).unwrap();
    append_option(
        &select,
        "b",
        OptionAttrs {
            selected: true,
            text: None,
        },
    )
    .unwrap();

    assert!(!option_at(&select, 0).selected());
    assert!(option_at(&select, 1).selected());
    assert_eq!(select.selected_index(), 1);
}

#[wasm_bindgen_test]
fn select_value_marks_first_match_only() {
    let select = new_select();
    for value in ["a", "b", "c"] {
        append_option(&select, value, OptionAttrs::default()).unwrap();
    }

    select_value(&select, "b");
    assert!(!option_at(&select, 0).selected());
    assert!(option_at(&select, 1).selected());
    assert!(!option_at(&select, 2).selected());
}

#[wasm_bindgen_test]
fn select_value_unknown_value_changes_nothing() {
    let select = new_select();
    for value in ["a", "b", "c"] {
        append_option(&select, value, OptionAttrs::default()).unwrap();
    }
    let before = select.selected_index();

    select_value(&select, "zzz");
    assert_eq!(select.selected_index(), before);
}

// =============================================================================
// ajax
// =============================================================================

#[wasm_bindgen_test]
async fn ajax_resolves_parsed_json_on_200() {
    let after_calls = Rc::new(Cell::new(0u32));
    let before_called = Rc::new(Cell::new(false));

    let options = AjaxOptions {
        response_data_type: "application/json".to_string(),
        before: Some(Box::new({
            let before_called = Rc::clone(&before_called);
            move || before_called.set(true)
        })),
        after: Some(Box::new({
            let after_calls = Rc::clone(&after_calls);
            move |_: &ResponseBody, status: u16, _: Option<&web_sys::Response>| {
                assert_eq!(status, 200);
                after_calls.set(after_calls.get() + 1);
            }
        })),
        ..Default::default()
    };

    // data: URLs resolve with status 200 and the encoded body.
    let response = ajax("data:application/json,%7B%22a%22%3A1%7D", options)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, ResponseBody::Json(serde_json::json!({"a": 1})));
    assert!(before_called.get());
    assert_eq!(after_calls.get(), 1);
}

#[wasm_bindgen_test]
async fn ajax_rejects_non_200_and_still_calls_after() {
    let after_calls = Rc::new(Cell::new(0u32));

    let options = AjaxOptions {
        after: Some(Box::new({
            let after_calls = Rc::clone(&after_calls);
            move |_: &ResponseBody, _: u16, _: Option<&web_sys::Response>| {
                after_calls.set(after_calls.get() + 1);
            }
        })),
        ..Default::default()
    };

    let result = ajax("/no-such-resource-for-pagekit-tests", options).await;
    match result {
        Err(AjaxError::Http { status, .. }) => assert_ne!(status, 200),
        other => panic!("expected Http rejection, got {:?}", other.map(|r| r.status)),
    }
    assert_eq!(after_calls.get(), 1);
}

#[wasm_bindgen_test]
async fn ajax_get_sends_no_body() {
    // A GET Request carrying a body is rejected by the Request
    // constructor, so a successful exchange proves the configured
    // payload was omitted from the dispatch.
    let payload = Object::new();
    Reflect::set(&payload, &JsValue::from_str("a"), &JsValue::from_f64(1.0)).unwrap();

    let options = AjaxOptions {
        method: "get".to_string(),
        data: Some(payload.into()),
        ..Default::default()
    };

    let response = ajax("data:text/plain,ok", options).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, ResponseBody::Text("ok".to_string()));
}

#[wasm_bindgen_test]
async fn ajax_unparsable_json_falls_back_to_text() {
    let options = AjaxOptions {
        response_data_type: "application/json".to_string(),
        ..Default::default()
    };

    let response = ajax("data:text/plain,not-json", options).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, ResponseBody::Text("not-json".to_string()));
}

// =============================================================================
// jsonp
// =============================================================================

type PendingJsonp = Rc<RefCell<Option<Result<JsonpResponse, JsonpError>>>>;

/// Start a jsonp exchange in the background and hand back its eventual
/// outcome slot plus the after-hook call counter.
fn start_jsonp(callback_name: &str, timeout_secs: u32) -> (PendingJsonp, Rc<Cell<u32>>) {
    let outcome: PendingJsonp = Rc::new(RefCell::new(None));
    let after_calls = Rc::new(Cell::new(0u32));

    let options = JsonpOptions {
        callback_name: Some(callback_name.to_string()),
        timeout_secs,
        after: Some(Box::new({
            let after_calls = Rc::clone(&after_calls);
            move || after_calls.set(after_calls.get() + 1)
        })),
        ..Default::default()
    };

    spawn_local({
        let outcome = Rc::clone(&outcome);
        async move {
            *outcome.borrow_mut() = Some(jsonp("/jsonp-feed-for-pagekit-tests", options).await);
        }
    });

    (outcome, after_calls)
}

/// Invoke the window-global callback the way a remote endpoint would.
fn invoke_global(name: &str, status: f64, body: &JsValue) {
    let window = web_sys::window().unwrap();
    let callback: Function = Reflect::get(&window, &JsValue::from_str(name))
        .unwrap()
        .dyn_into()
        .unwrap();
    callback
        .call2(&JsValue::UNDEFINED, &JsValue::from_f64(status), body)
        .unwrap();
}

#[wasm_bindgen_test]
async fn jsonp_resolves_when_callback_fires_first() {
    let (outcome, after_calls) = start_jsonp("pagekitTestOk", 5);
    TimeoutFuture::new(50).await;

    let body = Object::new();
    Reflect::set(&body, &JsValue::from_str("ok"), &JsValue::TRUE).unwrap();
    invoke_global("pagekitTestOk", 200.0, &body.into());
    TimeoutFuture::new(50).await;

    let response = outcome.borrow_mut().take().expect("settled").unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        ResponseBody::Json(serde_json::json!({"ok": true}))
    );
    assert_eq!(after_calls.get(), 1);

    // Settlement removes the injected script element.
    assert!(
        document()
            .get_element_by_id("jsonp-script-pagekitTestOk")
            .is_none()
    );
}

#[wasm_bindgen_test]
async fn jsonp_rejects_non_200_status() {
    let (outcome, after_calls) = start_jsonp("pagekitTestErr", 5);
    TimeoutFuture::new(50).await;

    invoke_global("pagekitTestErr", 500.0, &JsValue::from_str("oops"));
    TimeoutFuture::new(50).await;

    let settled = outcome.borrow_mut().take().expect("settled");
    match settled {
        Err(JsonpError::Status { body, status }) => {
            assert_eq!(status, 500);
            assert_eq!(body, ResponseBody::Text("oops".to_string()));
        }
        other => panic!("expected Status rejection, got {:?}", other.map(|r| r.status)),
    }
    assert_eq!(after_calls.get(), 1);
}

#[wasm_bindgen_test]
async fn jsonp_times_out_when_nothing_answers() {
    let (outcome, after_calls) = start_jsonp("pagekitTestTimeout", 1);
    TimeoutFuture::new(1300).await;

    let settled = outcome.borrow_mut().take().expect("settled");
    match settled {
        Err(err) => {
            assert!(matches!(err, JsonpError::Timeout));
            assert_eq!(err.status(), Some(408));
            assert_eq!(err.to_string(), "Request Timeout.");
        }
        Ok(response) => panic!("expected timeout, resolved with {}", response.status),
    }
    assert_eq!(after_calls.get(), 1);
    assert!(
        document()
            .get_element_by_id("jsonp-script-pagekitTestTimeout")
            .is_none()
    );

    // A late response now lands on the no-op installed at timeout: no
    // second settlement, no second after invocation.
    invoke_global("pagekitTestTimeout", 200.0, &JsValue::from_str("late"));
    TimeoutFuture::new(50).await;
    assert!(outcome.borrow().is_none());
    assert_eq!(after_calls.get(), 1);
}
