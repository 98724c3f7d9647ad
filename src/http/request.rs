//! Outgoing request values.

use indexmap::IndexMap;
use url::Url;

use crate::error::HttpError;
use crate::http::headers::HeaderValues;
use crate::http::message::Message;
use crate::http::stream::BodyHandle;
use crate::http::{HttpMethod, HttpVersion};

/// An HTTP request: a [`Message`] plus method, URI and request target.
///
/// Like every type in the message family, a request is immutable; with-
/// operations return siblings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Request {
    message: Message,
    request_target: Option<String>,
    uri: Option<Url>,
    method: Option<HttpMethod>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        uri: Option<Url>,
        method: Option<HttpMethod>,
        body: Option<BodyHandle>,
        headers: Option<IndexMap<String, Vec<String>>>,
        version: Option<&str>,
    ) -> Result<Self, HttpError> {
        Ok(Self {
            message: Message::from_parts(body, headers, version)?,
            request_target: None,
            uri,
            method,
        })
    }

    /// The request target: the explicit override if one was set, else the
    /// URI's path and query, else `"/"`.
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.request_target {
            return target.clone();
        }
        let Some(uri) = &self.uri else {
            return "/".to_string();
        };
        let mut target = uri.path().to_string();
        if let Some(query) = uri.query() {
            if !query.is_empty() {
                target.push('?');
                target.push_str(query);
            }
        }
        if target.is_empty() {
            target = "/".to_string();
        }
        target
    }

    /// Sibling with the request target overridden verbatim. Nothing is
    /// validated: callers may need absolute-form, authority-form or
    /// asterisk-form targets.
    pub fn with_request_target(&self, target: &str) -> Self {
        let mut request = self.clone();
        request.request_target = Some(target.to_string());
        request
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    /// Sibling with the method replaced. The token is upper-cased before
    /// validation against the supported verb set.
    pub fn with_method(&self, method: &str) -> Result<Self, HttpError> {
        let method = HttpMethod::parse(method)?;
        let mut request = self.clone();
        request.method = Some(method);
        Ok(request)
    }

    pub fn uri(&self) -> Option<&Url> {
        self.uri.as_ref()
    }

    /// Sibling with the URI replaced.
    ///
    /// A URI carrying a host rewrites the `Host` header to `host[:port]`
    /// (port only when the URI names one), unless `preserve_host` is set
    /// and a `Host` header already exists. A URI without a host leaves the
    /// headers untouched.
    pub fn with_uri(&self, uri: Url, preserve_host: bool) -> Self {
        let mut request = self.clone();
        let mut host = match uri.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                request.uri = Some(uri);
                return request;
            }
        };
        if let Some(port) = uri.port() {
            host.push(':');
            host.push_str(&port.to_string());
        }
        request.uri = Some(uri);
        if preserve_host && self.has_header("Host") {
            return request;
        }
        request.message.headers_mut().set("Host", vec![host]);
        request
    }

    // Message surface, delegated so siblings keep the concrete type.

    pub fn protocol_version(&self) -> HttpVersion {
        self.message.protocol_version()
    }

    pub fn with_protocol_version(&self, version: &str) -> Result<Self, HttpError> {
        Ok(Self {
            message: self.message.with_protocol_version(version)?,
            ..self.clone()
        })
    }

    pub fn headers(&self) -> IndexMap<String, Vec<String>> {
        self.message.headers()
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.message.has_header(name)
    }

    pub fn header(&self, name: &str) -> &[String] {
        self.message.header(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.message.header_line(name)
    }

    pub fn with_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        Self {
            message: self.message.with_header(name, values),
            ..self.clone()
        }
    }

    pub fn with_added_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        Self {
            message: self.message.with_added_header(name, values),
            ..self.clone()
        }
    }

    pub fn without_header(&self, name: &str) -> Self {
        Self {
            message: self.message.without_header(name),
            ..self.clone()
        }
    }

    pub fn body(&self) -> Option<&BodyHandle> {
        self.message.body()
    }

    pub fn with_body(&self, body: BodyHandle) -> Self {
        Self {
            message: self.message.with_body(body),
            ..self.clone()
        }
    }
}
