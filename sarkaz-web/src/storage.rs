//! Storage selection for the web shell.

use log::info;
use sarkaz_core::SessionStorage;

use crate::browser::BrowserFileStorage;
use crate::host::{NativeHostStorage, native_host_available};

/// Pick the save/load strategy for the current page: the desktop shell's file
/// commands when the page runs inside it, browser download/upload otherwise.
#[must_use]
pub fn select_storage() -> Box<dyn SessionStorage> {
    if native_host_available() {
        info!("desktop host detected; saving through host commands");
        Box::new(NativeHostStorage)
    } else {
        info!("no desktop host; saving through browser download/upload");
        Box::new(BrowserFileStorage::default())
    }
}
