//! HTTP response handling

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{Result, WrexError};

/// A received response together with the URI it came from.
///
/// The body can be decoded once; [`Response::decode`] takes the wrapper by
/// value, so a second decode does not compile.
#[derive(Debug)]
pub struct Response {
    response: reqwest::Response,
    uri: String,
}

impl Response {
    pub(crate) fn new(response: reqwest::Response, uri: String) -> Self {
        Self { response, uri }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// The URI the originating request was built with.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Read the full body and parse it as JSON into `T`.
    pub async fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self
            .response
            .bytes()
            .await
            .map_err(WrexError::from_dispatch)?;
        serde_json::from_slice(&bytes).map_err(WrexError::Deserialization)
    }
}
