use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("configuration object rejected: {0}")]
    ConfigValue(#[from] serde_wasm_bindgen::Error),
    #[error("{watcher} threshold {value} is outside 0.0..=1.0")]
    InvalidThreshold { watcher: &'static str, value: f64 },
    #[error("{name} offset {value} must not be negative")]
    InvalidOffset { name: &'static str, value: f64 },
    #[error("field rule #{index} has an empty selector")]
    InvalidFieldRule { index: usize },
    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl From<JsValue> for UiError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(text) => Self::Dom(text),
            None => Self::Dom(format!("{value:?}")),
        }
    }
}

pub type UiResult<T> = Result<T, UiError>;
