use thiserror::Error;
use vbar_core::VbarError;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("No global window object")]
    NoWindow,

    #[error("Window has no document")]
    NoDocument,

    #[error("Document has no body")]
    NoBody,

    #[error("JavaScript error: {0}")]
    Js(String),
}

impl WebError {
    /// Wrap a thrown JS value.
    pub fn js(value: JsValue) -> Self {
        WebError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<WebError> for VbarError {
    fn from(err: WebError) -> Self {
        VbarError::Host(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
