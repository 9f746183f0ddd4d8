//! Save/load for a plain browser tab: saving downloads `data.json`, loading
//! opens a file picker.

use async_trait::async_trait;
use js_sys::Array;
use log::debug;
use sarkaz_core::{DEFAULT_FILE_NAME, SessionStorage, StorageError, StorageKind};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Event, File, HtmlAnchorElement, HtmlInputElement, Url};

use crate::dom::{self, dom_failure};

pub const JSON_MIME: &str = "application/json";
pub const JSON_ACCEPT: &str = ".json";

/// Either event settles a pick; `cancel` fires when the dialog is dismissed.
const PICKER_EVENTS: [&str; 2] = ["change", "cancel"];

/// Storage using browser downloads and uploads.
#[derive(Debug, Clone)]
pub struct BrowserFileStorage {
    file_name: String,
}

impl Default for BrowserFileStorage {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

impl BrowserFileStorage {
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn download(&self, content: &str) -> Result<(), StorageError> {
        let parts = Array::of1(&JsValue::from_str(content));
        let options = BlobPropertyBag::new();
        options.set_type(JSON_MIME);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(dom_failure)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(dom_failure)?;

        let anchor: HtmlAnchorElement = dom::document()?
            .create_element("a")
            .map_err(dom_failure)?
            .dyn_into()
            .map_err(dom_failure_from_element)?;
        anchor.set_href(&url);
        anchor.set_download(&self.file_name);

        let body = dom::body()?;
        body.append_child(&anchor).map_err(dom_failure)?;
        anchor.click();
        body.remove_child(&anchor).map_err(dom_failure)?;
        Url::revoke_object_url(&url).map_err(dom_failure)?;
        debug!("download of {} triggered", self.file_name);
        Ok(())
    }

    /// Show the picker and wait for a file, or `None` if it was dismissed.
    async fn pick_file(&self) -> Result<Option<File>, StorageError> {
        let input: HtmlInputElement = dom::document()?
            .create_element("input")
            .map_err(dom_failure)?
            .dyn_into()
            .map_err(dom_failure_from_element)?;
        input.set_type("file");
        input.set_accept(JSON_ACCEPT);
        input.set_multiple(false);
        input
            .style()
            .set_property("display", "none")
            .map_err(dom_failure)?;

        let (selection, resolve) = dom::deferred()?;
        let settle = {
            let input = input.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let file = if event.type_() == "change" {
                    input.files().and_then(|files| files.get(0))
                } else {
                    None
                };
                let value = file.map_or(JsValue::NULL, JsValue::from);
                let _ = resolve.call1(&JsValue::UNDEFINED, &value);
            }) as Box<dyn FnMut(Event)>)
        };
        for event in PICKER_EVENTS {
            input
                .add_event_listener_with_callback(event, settle.as_ref().unchecked_ref())
                .map_err(dom_failure)?;
        }

        // Stays attached until settled; detached inputs may never report a cancel.
        let body = dom::body()?;
        body.append_child(&input).map_err(dom_failure)?;
        input.click();
        let picked = JsFuture::from(selection).await;

        for event in PICKER_EVENTS {
            let _ = input.remove_event_listener_with_callback(event, settle.as_ref().unchecked_ref());
        }
        drop(settle);
        body.remove_child(&input).map_err(dom_failure)?;

        let picked = picked.map_err(dom_failure)?;
        if picked.is_null() {
            return Ok(None);
        }
        picked
            .dyn_into::<File>()
            .map(Some)
            .map_err(|_| StorageError::Io("picker returned something other than a file".to_string()))
    }
}

fn dom_failure_from_element(element: web_sys::Element) -> StorageError {
    StorageError::Io(format!("unexpected element <{}>", element.tag_name()))
}

#[async_trait(?Send)]
impl SessionStorage for BrowserFileStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::BrowserFallback
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        self.download(content)
    }

    async fn read(&self) -> Result<String, StorageError> {
        let Some(file) = self.pick_file().await? else {
            return Err(StorageError::Cancelled);
        };
        debug!("reading {} ({} bytes)", file.name(), file.size());
        let text = JsFuture::from(file.text())
            .await
            .map_err(|err| StorageError::Encoding(dom::js_error_message(&err)))?;
        text.as_string()
            .ok_or_else(|| StorageError::Encoding(format!("{} is not text", file.name())))
    }
}
