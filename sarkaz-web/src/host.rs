//! Save/load through the desktop shell hosting the page.
//!
//! The shell injects an IPC object on `window`; its `invoke(command, args)`
//! returns a promise. The commands on the other side are the desk crate's
//! `write_json` and `read_json`.

use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use log::debug;
use sarkaz_core::{
    CANCELLED_REPLY, READ_COMMAND, SessionStorage, StorageError, StorageKind, WRITE_COMMAND,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::dom;

/// Global the desktop shell defines on `window`.
pub const HOST_GLOBAL: &str = "__TAURI_INTERNALS__";

/// Whether the page runs inside the desktop shell.
#[must_use]
pub fn native_host_available() -> bool {
    web_sys::window().is_some_and(|window| {
        Reflect::has(&window, &JsValue::from_str(HOST_GLOBAL)).unwrap_or(false)
    })
}

fn host_failure(value: &JsValue) -> StorageError {
    let message = dom::js_error_message(value);
    if message == CANCELLED_REPLY {
        StorageError::Cancelled
    } else {
        StorageError::Host(message)
    }
}

async fn invoke(command: &str, args: &JsValue) -> Result<JsValue, StorageError> {
    let window = dom::window()?;
    let internals = Reflect::get(&window, &JsValue::from_str(HOST_GLOBAL))
        .map_err(|err| host_failure(&err))?;
    if internals.is_undefined() {
        return Err(StorageError::Unavailable(format!("{HOST_GLOBAL} is not defined")));
    }
    let invoke: Function = Reflect::get(&internals, &JsValue::from_str("invoke"))
        .map_err(|err| host_failure(&err))?
        .dyn_into()
        .map_err(|_| StorageError::Host("host invoke is not a function".to_string()))?;

    debug!("invoking host command {command}");
    let pending: Promise = invoke
        .call2(&internals, &JsValue::from_str(command), args)
        .map_err(|err| host_failure(&err))?
        .dyn_into()
        .map_err(|_| StorageError::Host(format!("{command} did not return a promise")))?;
    JsFuture::from(pending)
        .await
        .map_err(|err| host_failure(&err))
}

/// Storage backed by the desktop shell's file commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHostStorage;

#[async_trait(?Send)]
impl SessionStorage for NativeHostStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::NativeHost
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("content"), &JsValue::from_str(content))
            .map_err(|err| host_failure(&err))?;
        invoke(WRITE_COMMAND, &args).await?;
        Ok(())
    }

    async fn read(&self) -> Result<String, StorageError> {
        let reply = invoke(READ_COMMAND, &Object::new()).await?;
        reply
            .as_string()
            .ok_or_else(|| StorageError::Encoding(format!("{READ_COMMAND} returned a non-string")))
    }
}
