/// Error type shared by the capture, browse and background surfaces

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `chrome.*` call rejected.
    #[error("Browser call failed: {0}")]
    Browser(String),

    /// Reading or writing `chrome.storage.local` failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A value coming across the JS boundary had the wrong shape.
    #[error("Failed to decode: {0}")]
    Decode(String),

    #[error("Tab group {0} metadata unavailable")]
    MissingGroup(i32),

    /// The stored revision moved since this surface last loaded it.
    #[error("Saved items changed elsewhere (expected revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },

    #[error("Save failed: {0}")]
    SaveFailed(Box<Error>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn browser(context: &str, err: JsValue) -> Self {
        Error::Browser(format!("{}: {:?}", context, err))
    }

    pub fn storage(context: &str, err: JsValue) -> Self {
        Error::Storage(format!("{}: {:?}", context, err))
    }

    /// Wrap any failure at the capture boundary. Already-wrapped errors pass through.
    pub fn save_failed(self) -> Self {
        match self {
            Error::SaveFailed(_) => self,
            other => Error::SaveFailed(Box::new(other)),
        }
    }
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
