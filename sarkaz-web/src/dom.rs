use js_sys::{Function, Promise};
use sarkaz_core::StorageError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

/// Retrieve the global `window` object.
///
/// # Errors
/// Returns `Unavailable` outside of a browser context.
pub fn window() -> Result<Window, StorageError> {
    web_sys::window().ok_or_else(|| StorageError::Unavailable("no browser window".to_string()))
}

/// Retrieve the document object for DOM interactions.
///
/// # Errors
/// Returns `Unavailable` when the window has no document.
pub fn document() -> Result<Document, StorageError> {
    window()?
        .document()
        .ok_or_else(|| StorageError::Unavailable("no document".to_string()))
}

/// The document body, where transient elements are attached.
///
/// # Errors
/// Returns `Unavailable` when the document has no body yet.
pub fn body() -> Result<HtmlElement, StorageError> {
    document()?
        .body()
        .ok_or_else(|| StorageError::Unavailable("no document body".to_string()))
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Map a rejected DOM call onto a storage failure.
#[must_use]
pub fn dom_failure(value: JsValue) -> StorageError {
    StorageError::Io(js_error_message(&value))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// A promise together with the function that resolves it.
///
/// # Errors
/// Returns an error if the promise executor did not hand out its resolver.
pub fn deferred() -> Result<(Promise, Function), StorageError> {
    let mut resolve_slot: Option<Function> = None;
    let promise = Promise::new(&mut |resolve, _reject| {
        resolve_slot = Some(resolve);
    });
    let resolve = resolve_slot
        .ok_or_else(|| StorageError::Unavailable("promise resolver was not set".to_string()))?;
    Ok((promise, resolve))
}
