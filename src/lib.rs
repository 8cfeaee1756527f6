//! Client-side behaviour for the static portfolio page: scroll reveals,
//! progress bars, active nav tracking, the mobile menu, the sticky header,
//! the back-to-top button and contact form validation.
//!
//! The browser-facing wiring lives in `app` and `dom`; the decisions it
//! applies come from the DOM-free modules below, which are unit-tested
//! natively.

mod app;
pub mod chrome;
pub mod config;
mod dom;
pub mod error;
pub mod form;
pub mod navigation;
pub mod visibility;

use wasm_bindgen::prelude::*;

use crate::config::PortfolioConfig;
use crate::error::UiError;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let config = app::embedded_config();
    if config.auto_mount {
        app::boot(config);
    }
}

/// Mounts with a configuration object supplied by the host page. Only
/// meaningful when the embedded configuration sets `auto_mount: false`.
#[wasm_bindgen]
pub fn init_with_config(config: JsValue) -> Result<(), JsValue> {
    let config = parse_config(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
    app::boot(config);
    Ok(())
}

fn parse_config(value: JsValue) -> Result<PortfolioConfig, UiError> {
    let config: PortfolioConfig = serde_wasm_bindgen::from_value(value)?;
    config.validate()?;
    Ok(config)
}
