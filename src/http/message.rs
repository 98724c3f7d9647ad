//! The base immutable message value: protocol version, headers, body.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::HttpError;
use crate::http::HttpVersion;
use crate::http::headers::{HeaderValues, HttpHeaders};
use crate::http::stream::BodyHandle;

/// An immutable HTTP message.
///
/// Every operation that would change state clones the receiver, replaces
/// one logical field on the clone and returns it; the receiver itself is
/// never mutated. A sibling shares the parent's body handle unless it came
/// out of [`Message::with_body`].
#[derive(Clone, Default)]
pub struct Message {
    version: HttpVersion,
    headers: HttpHeaders,
    body: Option<BodyHandle>,
}

impl Message {
    /// An empty message: version 1.1, no headers, no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a message from optional parts. `version` is validated against
    /// the supported set.
    pub fn from_parts(
        body: Option<BodyHandle>,
        headers: Option<IndexMap<String, Vec<String>>>,
        version: Option<&str>,
    ) -> Result<Self, HttpError> {
        let version = match version {
            Some(v) => HttpVersion::parse(v)?,
            None => HttpVersion::default(),
        };
        let headers = match headers {
            Some(seed) => HttpHeaders::from_seed(seed),
            None => HttpHeaders::new(),
        };
        Ok(Self {
            version,
            headers,
            body,
        })
    }

    pub fn protocol_version(&self) -> HttpVersion {
        self.version
    }

    /// Sibling with only the protocol version replaced.
    pub fn with_protocol_version(&self, version: &str) -> Result<Self, HttpError> {
        let version = HttpVersion::parse(version)?;
        let mut message = self.clone();
        message.version = version;
        Ok(message)
    }

    /// Snapshot of all headers under their original casing.
    pub fn headers(&self) -> IndexMap<String, Vec<String>> {
        self.headers.all()
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.has(name)
    }

    /// All values for `name`; empty when absent.
    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name)
    }

    /// Values for `name` joined by `,`; empty string when absent.
    pub fn header_line(&self, name: &str) -> String {
        self.headers.get_line(name)
    }

    /// Sibling with all values for `name` replaced.
    pub fn with_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        let mut message = self.clone();
        message.headers.set(name, values.into().into_vec());
        message
    }

    /// Sibling with the values appended to `name`, keeping existing ones.
    pub fn with_added_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        let mut message = self.clone();
        message.headers.add(name, values.into().into_vec());
        message
    }

    /// Sibling without the named header.
    pub fn without_header(&self, name: &str) -> Self {
        let mut message = self.clone();
        message.headers.remove(name);
        message
    }

    pub fn body(&self) -> Option<&BodyHandle> {
        self.body.as_ref()
    }

    /// Sibling with only the body replaced; the receiver keeps its own.
    pub fn with_body(&self, body: BodyHandle) -> Self {
        let mut message = self.clone();
        message.body = Some(body);
        message
    }

    /// Crate-internal write access used by the sibling-construction paths
    /// of the richer message types.
    pub(crate) fn headers_mut(&mut self) -> &mut HttpHeaders {
        &mut self.headers
    }
}

impl PartialEq for Message {
    /// Messages are equal when version and headers match and both refer to
    /// the same body handle (or neither has one).
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.headers == other.headers
            && match (&self.body, &other.body) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}
