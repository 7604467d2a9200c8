use wasm_bindgen::JsValue;

/// Errors surfaced by the sky renderer and its host bindings.
#[derive(Debug, thiserror::Error)]
pub enum SkyError {
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The JSON configuration could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),

    /// No canvas element with the given id exists in the document.
    #[error("canvas element `{0}` not found")]
    CanvasNotFound(String),

    /// The canvas exists but did not hand out a 2d context.
    #[error("2d rendering context unavailable")]
    ContextUnavailable,

    #[error("sky not initialized")]
    NotInitialized,
}

impl From<SkyError> for JsValue {
    fn from(err: SkyError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
