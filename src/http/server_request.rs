//! Incoming server-side request values and their derivation from an
//! environment snapshot.
//!
//! A [`ServerRequest`] is built once per inbound request. The environment
//! (server variables, posted fields, uploaded-file descriptors, cookie jar)
//! is always passed in explicitly — nothing is read from ambient process
//! state — and is only consulted at construction, for the fields the caller
//! did not supply.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::{Url, form_urlencoded};

use crate::error::HttpError;
use crate::http::headers::HeaderValues;
use crate::http::request::Request;
use crate::http::stream::BodyHandle;
use crate::http::uploaded_file::{self, FileTree};
use crate::http::{HttpMethod, HttpVersion};

/// A snapshot of the raw request environment, the analog of the CGI
/// superglobals. Server variables are never mutated after construction.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Environment {
    /// Server/CGI variables (`REQUEST_URI`, `HTTP_*`, ...).
    #[serde(default)]
    pub server: IndexMap<String, String>,

    /// Posted body fields, already deserialized.
    #[serde(default)]
    pub post: Option<Value>,

    /// Raw uploaded-file descriptors, flat or parallel-array shaped.
    #[serde(default)]
    pub files: Option<Value>,

    /// The client's cookie jar.
    #[serde(default)]
    pub cookies: IndexMap<String, String>,
}

/// An incoming request: a [`Request`] plus the environment-derived state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServerRequest {
    request: Request,
    server_params: IndexMap<String, String>,
    cookie_params: IndexMap<String, String>,
    query_params: IndexMap<String, String>,
    uploaded_files: IndexMap<String, FileTree>,
    parsed_body: Option<Value>,
    attributes: IndexMap<String, Value>,
}

/// Builds a [`ServerRequest`]. Any part set explicitly bypasses derivation
/// from the server variables.
#[derive(Default)]
pub struct ServerRequestBuilder {
    server_params: IndexMap<String, String>,
    parsed_body: Option<Value>,
    uploaded_files: Option<Value>,
    cookie_params: IndexMap<String, String>,
    attributes: IndexMap<String, Value>,
    uri: Option<Url>,
    method: Option<HttpMethod>,
    body: Option<BodyHandle>,
    headers: Option<IndexMap<String, Vec<String>>>,
    version: Option<String>,
}

impl ServerRequestBuilder {
    pub fn server_params(mut self, params: IndexMap<String, String>) -> Self {
        self.server_params = params;
        self
    }

    pub fn parsed_body(mut self, body: Value) -> Self {
        self.parsed_body = Some(body);
        self
    }

    /// Raw uploaded-file descriptors, normalized during `build`.
    pub fn uploaded_files(mut self, raw: Value) -> Self {
        self.uploaded_files = Some(raw);
        self
    }

    pub fn cookie_params(mut self, cookies: IndexMap<String, String>) -> Self {
        self.cookie_params = cookies;
        self
    }

    pub fn attributes(mut self, attributes: IndexMap<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn uri(mut self, uri: Url) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn body(mut self, body: BodyHandle) -> Self {
        self.body = Some(body);
        self
    }

    /// Explicit headers. An empty map is meaningful: it suppresses the
    /// `HTTP_*` derivation entirely.
    pub fn headers(mut self, headers: IndexMap<String, Vec<String>>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn build(self) -> Result<ServerRequest, HttpError> {
        let uploaded_files = match &self.uploaded_files {
            Some(raw) => uploaded_file::normalize_tree(raw)?,
            None => IndexMap::new(),
        };
        let uri = match self.uri {
            Some(uri) => Some(uri),
            None => derive_uri(&self.server_params)?,
        };
        let version = match self.version {
            Some(version) => Some(version),
            None => derive_protocol_version(&self.server_params),
        };
        let method = match self.method {
            Some(method) => Some(method),
            None => derive_method(&self.server_params)?,
        };
        let headers = match self.headers {
            Some(headers) => Some(headers),
            None => derive_headers(&self.server_params),
        };
        let query_params = derive_query_params(&self.server_params, uri.as_ref());
        tracing::debug!(
            uri = uri.as_ref().map(Url::as_str),
            method = method.map(|m| m.as_str()),
            query_params = query_params.len(),
            "built server request from environment"
        );
        let request = Request::from_parts(uri, method, self.body, headers, version.as_deref())?;
        Ok(ServerRequest {
            request,
            server_params: self.server_params,
            cookie_params: self.cookie_params,
            query_params,
            uploaded_files,
            parsed_body: self.parsed_body,
            attributes: self.attributes,
        })
    }
}

/// Scheme is `https` iff `HTTPS` is present and equals `on` or `1`
/// case-insensitively. Host comes from `HTTP_HOST`, else `SERVER_NAME`
/// (falling back to `unknown-host`) with a non-default `SERVER_PORT`
/// appended. Without `REQUEST_URI` there is no URI at all.
fn derive_uri(server: &IndexMap<String, String>) -> Result<Option<Url>, HttpError> {
    let Some(request_uri) = server.get("REQUEST_URI") else {
        return Ok(None);
    };
    let scheme = match server.get("HTTPS") {
        Some(https) => {
            let https = https.to_ascii_lowercase();
            if https == "on" || https == "1" {
                "https"
            } else {
                "http"
            }
        }
        None => "http",
    };
    let host_port = match server.get("HTTP_HOST") {
        Some(host) => host.clone(),
        None => {
            let mut host = server
                .get("SERVER_NAME")
                .cloned()
                .unwrap_or_else(|| "unknown-host".to_string());
            if let Some(port) = server.get("SERVER_PORT") {
                let default = if scheme == "https" { "443" } else { "80" };
                if port != default {
                    host.push(':');
                    host.push_str(port);
                }
            }
            host
        }
    };
    let uri = Url::parse(&format!("{scheme}://{host_port}{request_uri}"))?;
    Ok(Some(uri))
}

/// `SERVER_PROTOCOL` of the form `HTTP/<version>`; anything else yields no
/// override.
fn derive_protocol_version(server: &IndexMap<String, String>) -> Option<String> {
    server
        .get("SERVER_PROTOCOL")?
        .strip_prefix("HTTP/")
        .map(str::to_string)
}

fn derive_method(server: &IndexMap<String, String>) -> Result<Option<HttpMethod>, HttpError> {
    match server.get("REQUEST_METHOD") {
        Some(method) => Ok(Some(HttpMethod::parse(method)?)),
        None => Ok(None),
    }
}

/// Every `HTTP_`-prefixed variable becomes a header: prefix stripped, name
/// lower-cased, `_` replaced by `-`. No such variables means "unset", which
/// is distinct from an explicitly empty header map.
fn derive_headers(server: &IndexMap<String, String>) -> Option<IndexMap<String, Vec<String>>> {
    let mut headers = IndexMap::new();
    for (key, value) in server {
        if let Some(name) = key.strip_prefix("HTTP_") {
            let name = name.to_ascii_lowercase().replace('_', "-");
            headers.insert(name, vec![value.clone()]);
        }
    }
    if headers.is_empty() { None } else { Some(headers) }
}

/// Query parameters come from `QUERY_STRING` when present, else from the
/// derived URI's query. Duplicate keys resolve last-wins.
fn derive_query_params(
    server: &IndexMap<String, String>,
    uri: Option<&Url>,
) -> IndexMap<String, String> {
    let query = match server.get("QUERY_STRING") {
        Some(query) => Some(query.clone()),
        None => uri.and_then(|u| u.query().map(str::to_string)),
    };
    match query {
        Some(query) if !query.is_empty() => form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
        _ => IndexMap::new(),
    }
}

impl ServerRequest {
    /// An empty server request with nothing derived and nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ServerRequestBuilder {
        ServerRequestBuilder::default()
    }

    /// Build a request from a full environment snapshot, deriving URI,
    /// method, version, headers and query parameters from the server
    /// variables.
    pub fn from_env(env: &Environment) -> Result<Self, HttpError> {
        let mut builder = Self::builder()
            .server_params(env.server.clone())
            .cookie_params(env.cookies.clone());
        if let Some(post) = &env.post {
            builder = builder.parsed_body(post.clone());
        }
        if let Some(files) = &env.files {
            builder = builder.uploaded_files(files.clone());
        }
        builder.build()
    }

    /// The environment snapshot this request was built from. Read-only for
    /// the lifetime of the instance.
    pub fn server_params(&self) -> &IndexMap<String, String> {
        &self.server_params
    }

    pub fn cookie_params(&self) -> &IndexMap<String, String> {
        &self.cookie_params
    }

    pub fn with_cookie_params(&self, cookies: IndexMap<String, String>) -> Self {
        let mut request = self.clone();
        request.cookie_params = cookies;
        request
    }

    pub fn query_params(&self) -> &IndexMap<String, String> {
        &self.query_params
    }

    /// Sibling with the query parameters replaced. Neither the URI nor the
    /// server params change with them.
    pub fn with_query_params(&self, query: IndexMap<String, String>) -> Self {
        let mut request = self.clone();
        request.query_params = query;
        request
    }

    /// The normalized upload tree; empty when no files arrived.
    pub fn uploaded_files(&self) -> &IndexMap<String, FileTree> {
        &self.uploaded_files
    }

    pub fn with_uploaded_files(&self, files: IndexMap<String, FileTree>) -> Self {
        let mut request = self.clone();
        request.uploaded_files = files;
        request
    }

    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    pub fn with_parsed_body(&self, data: Option<Value>) -> Self {
        let mut request = self.clone();
        request.parsed_body = data;
        request
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sibling with one attribute set; the rest of the mapping is shared
    /// state copied as-is.
    pub fn with_attribute(&self, name: &str, value: Value) -> Self {
        let mut request = self.clone();
        request.attributes.insert(name.to_string(), value);
        request
    }

    /// Sibling with one attribute removed.
    pub fn without_attribute(&self, name: &str) -> Self {
        let mut request = self.clone();
        request.attributes.shift_remove(name);
        request
    }

    // Request surface, delegated so siblings keep the concrete type.

    pub fn request_target(&self) -> String {
        self.request.request_target()
    }

    pub fn with_request_target(&self, target: &str) -> Self {
        Self {
            request: self.request.with_request_target(target),
            ..self.clone()
        }
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.request.method()
    }

    pub fn with_method(&self, method: &str) -> Result<Self, HttpError> {
        Ok(Self {
            request: self.request.with_method(method)?,
            ..self.clone()
        })
    }

    pub fn uri(&self) -> Option<&Url> {
        self.request.uri()
    }

    pub fn with_uri(&self, uri: Url, preserve_host: bool) -> Self {
        Self {
            request: self.request.with_uri(uri, preserve_host),
            ..self.clone()
        }
    }

    pub fn protocol_version(&self) -> HttpVersion {
        self.request.protocol_version()
    }

    pub fn with_protocol_version(&self, version: &str) -> Result<Self, HttpError> {
        Ok(Self {
            request: self.request.with_protocol_version(version)?,
            ..self.clone()
        })
    }

    pub fn headers(&self) -> IndexMap<String, Vec<String>> {
        self.request.headers()
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.request.has_header(name)
    }

    pub fn header(&self, name: &str) -> &[String] {
        self.request.header(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.request.header_line(name)
    }

    pub fn with_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        Self {
            request: self.request.with_header(name, values),
            ..self.clone()
        }
    }

    pub fn with_added_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        Self {
            request: self.request.with_added_header(name, values),
            ..self.clone()
        }
    }

    pub fn without_header(&self, name: &str) -> Self {
        Self {
            request: self.request.without_header(name),
            ..self.clone()
        }
    }

    pub fn body(&self) -> Option<&BodyHandle> {
        self.request.body()
    }

    pub fn with_body(&self, body: BodyHandle) -> Self {
        Self {
            request: self.request.with_body(body),
            ..self.clone()
        }
    }
}
