#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod browser;
pub mod dom;
pub mod host;
pub mod storage;

pub use bridge::{BridgeError, WebScorekeeper, WebSession};
pub use browser::BrowserFileStorage;
pub use host::{NativeHostStorage, native_host_available};
pub use storage::select_storage;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    log::debug!(
        "sarkaz-web started, native host: {}",
        native_host_available()
    );
}
