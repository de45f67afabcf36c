//! Errors produced while building the route table, talking to the browser, or persisting the meal
//! plan.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// The error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Two routes in a table share a path.
    #[error("duplicate route path `{0}`")]
    DuplicatePath(String),

    /// Two routes in a table share a name.
    #[error("duplicate route name `{0}`")]
    DuplicateName(String),

    /// Reading or writing persistent storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A DOM or browser API call failed.
    #[error("dom error: {0}")]
    Dom(String),

    /// A stored value could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn dom(value: JsValue) -> Self {
        Error::Dom(describe(&value))
    }

    pub(crate) fn storage(value: JsValue) -> Self {
        Error::Storage(describe(&value))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// A specialized `Result` using this crate's [`Error`].
///
/// [`Error`]: enum.Error.html
pub type Result<T> = std::result::Result<T, Error>;
