//! Browser-side checks for the JS bindings.

#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Reflect, JSON};
use memory_view_wasm::WasmMemoryView;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::wasm_bindgen_test;

fn js(source: &str) -> JsValue {
    JSON::parse(source).expect("valid JSON literal")
}

fn field(object: &JsValue, name: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(name)).expect("object field")
}

fn view() -> WasmMemoryView {
    WasmMemoryView::new(
        256,
        js(r#"{ "ip": 255, "ssp": 254, "usp": 253 }"#),
        js(r#"{ "showInstructions": true }"#),
    )
    .map_err(|_| "construction failed")
    .expect("valid view")
}

#[wasm_bindgen_test]
fn rejects_sizes_that_do_not_fill_rows() {
    assert!(WasmMemoryView::new(20, JsValue::UNDEFINED, JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn operations_update_cells() {
    let view = view();
    assert!(view.push_memory_operation(js(
        r#"{ "operationType": "ADD_REGION", "data": { "regionID": "r1",
             "name": "CodeSegment", "startAddress": 0, "endAddress": 15 } }"#
    )));
    assert!(view.push_register_operation(js(
        r#"{ "operationType": "WRITE", "data": { "index": "IP", "value": 5 } }"#
    )));
    assert!(!view.push_register_operation(js(r#"{ "index": "IP" }"#)));

    let cell = view.cell(5).map_err(|_| "encode").expect("cell");
    assert_eq!(field(&cell, "style").as_string().as_deref(), Some("marker marker-ip"));
    let cell = view.cell(4).map_err(|_| "encode").expect("cell");
    assert_eq!(field(&cell, "style").as_string().as_deref(), Some("code-segment"));
    assert!(view.cell(4096).map_err(|_| "encode").expect("cell").is_undefined());
    assert_eq!(view.read_register("IP").map_err(|_| "name").expect("register"), 5);
}

#[wasm_bindgen_test]
fn commit_edit_calls_the_store_and_reports_failures() {
    let view = view();
    let accept = Function::new_with_args("address, value, flag", "");
    let reject = Function::new_with_args("address, value, flag", "throw 'read-only';");
    let notifier = Function::new_with_args("message", "globalThis.lastError = message;");

    let outcome = view
        .click(0, 0x20, js(r#"{ "ctrl": true }"#))
        .map_err(|_| "encode")
        .expect("outcome");
    assert_eq!(field(&outcome, "kind").as_string().as_deref(), Some("editStarted"));
    assert!(view.commit_edit(0, "7f", &accept, &notifier));

    view.click(0, 0x21, js(r#"{ "meta": true }"#))
        .map_err(|_| "encode")
        .expect("outcome");
    assert!(!view.commit_edit(0, "7f", &reject, &notifier));
    let last_error = field(&js_sys::global(), "lastError");
    assert_eq!(last_error.as_string().as_deref(), Some("read-only"));
}

#[wasm_bindgen_test]
fn dispose_stops_updates() {
    let mut view = view();
    view.dispose();
    assert!(view.push_memory_operation(js(
        r#"{ "operationType": "STORE_BYTE", "data": { "address": 1, "value": 9 } }"#
    )));
    let cell = view.cell(1).map_err(|_| "encode").expect("cell");
    assert_eq!(field(&cell, "value").as_f64(), Some(0.0));
}
