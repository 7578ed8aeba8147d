//! Request building and dispatch
//!
//! A [`Request`] collects URI, timeout, headers and credentials, then one
//! terminal body-building call turns it into a [`PreparedRequest`] that can
//! be dispatched exactly once.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde::Serialize;
use url::Url;

use crate::auth::BasicAuth;
use crate::error::{Result, WrexError};
use crate::multipart::{build_form, FilePart};
use crate::response::Response;

/// A request under construction.
///
/// Decorator calls consume the builder and return the updated value, so a
/// half-configured request is never observable through an alias. Finalizing
/// calls consume the builder too; building twice from the same value is a
/// compile error.
#[derive(Debug, Clone)]
pub struct Request {
    uri: String,
    timeout: Duration,
    headers: Vec<(String, String)>,
    auth: Option<BasicAuth>,
}

impl Request {
    pub fn new(uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            uri: uri.into(),
            timeout,
            headers: Vec::new(),
            auth: None,
        }
    }

    /// Append a header. Duplicate keys are allowed and insertion order is
    /// preserved on the wire.
    pub fn add_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Attach basic auth credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth::new(username, password));
        self
    }

    /// GET request to a JSON endpoint. No body is attached.
    pub fn get_json(self) -> Result<PreparedRequest> {
        self.finalize_json::<()>(Method::GET, None)
    }

    /// POST request with a JSON-serialized body.
    pub fn post_json<T: Serialize>(self, body: &T) -> Result<PreparedRequest> {
        self.finalize_json(Method::POST, Some(body))
    }

    /// PUT request with a JSON-serialized body.
    pub fn put_json<T: Serialize>(self, body: &T) -> Result<PreparedRequest> {
        self.finalize_json(Method::PUT, Some(body))
    }

    /// POST request with a multipart form body containing only fields.
    ///
    /// Fields are encoded in the order given.
    pub fn post_form(self, fields: &[(&str, &str)]) -> Result<PreparedRequest> {
        self.finalize_form(Method::POST, None, fields)
    }

    /// PUT request with a multipart form body containing only fields.
    pub fn put_form(self, fields: &[(&str, &str)]) -> Result<PreparedRequest> {
        self.finalize_form(Method::PUT, None, fields)
    }

    /// POST request with a multipart body: the file part first, then the
    /// fields in the order given.
    pub fn post_form_file(self, fields: &[(&str, &str)], file: FilePart) -> Result<PreparedRequest> {
        self.finalize_form(Method::POST, Some(file), fields)
    }

    /// PUT request with a multipart body: the file part first, then the
    /// fields in the order given.
    pub fn put_form_file(self, fields: &[(&str, &str)], file: FilePart) -> Result<PreparedRequest> {
        self.finalize_form(Method::PUT, Some(file), fields)
    }

    /// POST request with a multipart body whose file part is read from disk.
    ///
    /// Fails with [`WrexError::FileAccess`] before any network activity if
    /// the path cannot be read.
    pub async fn post_form_file_disk(
        self,
        fields: &[(&str, &str)],
        field_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<PreparedRequest> {
        let file = FilePart::from_path(field_name, path).await?;
        self.finalize_form(Method::POST, Some(file), fields)
    }

    /// PUT request with a multipart body whose file part is read from disk.
    pub async fn put_form_file_disk(
        self,
        fields: &[(&str, &str)],
        field_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<PreparedRequest> {
        let file = FilePart::from_path(field_name, path).await?;
        self.finalize_form(Method::PUT, Some(file), fields)
    }

    /// Bodyless GET request.
    ///
    /// Unlike every other finalizer, this skips header and basic-auth
    /// injection. The asymmetry is part of the inherited contract and is
    /// kept as-is; use [`Request::get_json`] when decorations must apply.
    pub fn get(self) -> Result<PreparedRequest> {
        let url = parse_uri(&self.uri)?;
        Ok(PreparedRequest {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: PreparedBody::Empty,
            timeout: self.timeout,
            uri: self.uri,
        })
    }

    fn finalize_json<T: Serialize>(
        self,
        method: Method,
        body: Option<&T>,
    ) -> Result<PreparedRequest> {
        let url = parse_uri(&self.uri)?;
        let body = match body {
            Some(value) => {
                PreparedBody::Json(serde_json::to_vec(value).map_err(WrexError::Serialization)?)
            }
            None => PreparedBody::Empty,
        };
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.apply_decorations(&mut headers)?;
        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            timeout: self.timeout,
            uri: self.uri,
        })
    }

    fn finalize_form(
        self,
        method: Method,
        file: Option<FilePart>,
        fields: &[(&str, &str)],
    ) -> Result<PreparedRequest> {
        let url = parse_uri(&self.uri)?;
        // The multipart Content-Type with its boundary is set at dispatch.
        let mut headers = HeaderMap::new();
        self.apply_decorations(&mut headers)?;
        Ok(PreparedRequest {
            method,
            url,
            headers,
            body: PreparedBody::Multipart(build_form(file, fields)),
            timeout: self.timeout,
            uri: self.uri,
        })
    }

    /// Apply caller headers in insertion order, then credentials.
    fn apply_decorations(&self, headers: &mut HeaderMap) -> Result<()> {
        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                WrexError::RequestConstruction(format!("Invalid header name '{}': {}", key, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                WrexError::RequestConstruction(format!("Invalid header value for '{}': {}", key, e))
            })?;
            headers.append(name, value);
        }
        if let Some(auth) = &self.auth {
            let value = HeaderValue::from_str(&auth.header_value()).map_err(|e| {
                WrexError::RequestConstruction(format!("Invalid credentials: {}", e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

fn parse_uri(uri: &str) -> Result<Url> {
    Url::parse(uri)
        .map_err(|e| WrexError::RequestConstruction(format!("Invalid URL '{}': {}", uri, e)))
}

#[derive(Debug)]
enum PreparedBody {
    Empty,
    Json(Vec<u8>),
    Multipart(Form),
}

/// A finalized request, ready to dispatch.
#[derive(Debug)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: PreparedBody,
    timeout: Duration,
    uri: String,
}

impl PreparedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Dispatch the request through a client configured with the builder's
    /// timeout. Blocks the calling task until response headers arrive or
    /// the deadline elapses.
    pub async fn send(self) -> Result<Response> {
        let client = Client::builder().timeout(self.timeout).build().map_err(|e| {
            WrexError::RequestConstruction(format!("Failed to build HTTP client: {}", e))
        })?;

        log::debug!("dispatching {} {}", self.method, self.url);

        let mut request = client.request(self.method, self.url).headers(self.headers);
        request = match self.body {
            PreparedBody::Empty => request,
            PreparedBody::Json(bytes) => request.body(bytes),
            PreparedBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(WrexError::from_dispatch)?;
        Ok(Response::new(response, self.uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        Request::new("http://localhost/posts", Duration::from_secs(10))
    }

    #[test]
    fn get_json_attaches_no_body() {
        let prepared = request().get_json().expect("prepare");
        assert_eq!(prepared.method(), &Method::GET);
        assert!(matches!(prepared.body, PreparedBody::Empty));
        assert_eq!(
            prepared.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn post_json_serializes_body() {
        let prepared = request()
            .post_json(&serde_json::json!({"id": 12}))
            .expect("prepare");
        assert_eq!(prepared.method(), &Method::POST);
        match &prepared.body {
            PreparedBody::Json(bytes) => assert_eq!(bytes, br#"{"id":12}"#),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_headers_keep_insertion_order() {
        let prepared = request()
            .add_header("x-tag", "one")
            .add_header("x-tag", "two")
            .get_json()
            .expect("prepare");
        let values: Vec<_> = prepared.headers().get_all("x-tag").iter().collect();
        assert_eq!(values, ["one", "two"]);
    }

    #[test]
    fn basic_auth_sets_authorization_header() {
        let prepared = request()
            .basic_auth("user", "pass")
            .get_json()
            .expect("prepare");
        assert_eq!(
            prepared.headers().get(AUTHORIZATION).unwrap(),
            "Basic dXNlcjpwYXNz"
        );
    }

    #[test]
    fn no_basic_auth_means_no_authorization_header() {
        let prepared = request().get_json().expect("prepare");
        assert!(prepared.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn get_skips_headers_and_auth() {
        let prepared = request()
            .add_header("x-tag", "one")
            .basic_auth("user", "pass")
            .get()
            .expect("prepare");
        assert!(prepared.headers().is_empty());
    }

    #[test]
    fn malformed_uri_is_a_construction_error() {
        let result = Request::new("not a url", Duration::from_secs(1)).get_json();
        assert!(matches!(result, Err(WrexError::RequestConstruction(_))));
    }

    #[test]
    fn invalid_header_name_is_a_construction_error() {
        let result = request().add_header("bad header\n", "v").get_json();
        assert!(matches!(result, Err(WrexError::RequestConstruction(_))));
    }

    #[test]
    fn form_builds_multipart_body() {
        let prepared = request()
            .post_form(&[("genre", "mystery")])
            .expect("prepare");
        assert!(matches!(prepared.body, PreparedBody::Multipart(_)));
        assert!(prepared.headers().get(CONTENT_TYPE).is_none());
    }
}
