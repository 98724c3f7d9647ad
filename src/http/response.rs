//! Outgoing response values.

use indexmap::IndexMap;

use crate::error::HttpError;
use crate::http::HttpVersion;
use crate::http::headers::HeaderValues;
use crate::http::message::Message;
use crate::http::status;
use crate::http::stream::BodyHandle;

/// An HTTP response: a [`Message`] plus status code and reason phrase.
///
/// The status code must be present in the registry in
/// [`status`](crate::http::status). An empty reason phrase means "use the
/// registry default"; only an explicit non-empty phrase overrides it.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    message: Message,
    status_code: u16,
    reason_phrase: String,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            message: Message::new(),
            status_code: 200,
            reason_phrase: String::new(),
        }
    }
}

impl Response {
    /// A `200 OK` response with no headers and no body.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        status_code: Option<u16>,
        reason_phrase: Option<&str>,
        body: Option<BodyHandle>,
        headers: Option<IndexMap<String, Vec<String>>>,
        version: Option<&str>,
    ) -> Result<Self, HttpError> {
        let status_code = match status_code {
            Some(code) => {
                if !status::is_valid(code) {
                    return Err(HttpError::InvalidStatusCode(code));
                }
                code
            }
            None => 200,
        };
        Ok(Self {
            message: Message::from_parts(body, headers, version)?,
            status_code,
            reason_phrase: reason_phrase.unwrap_or("").to_string(),
        })
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Sibling with the status replaced. Passing an empty `reason_phrase`
    /// resets the sibling to the registry default for `code`.
    pub fn with_status(&self, code: u16, reason_phrase: &str) -> Result<Self, HttpError> {
        if !status::is_valid(code) {
            return Err(HttpError::InvalidStatusCode(code));
        }
        let mut response = self.clone();
        response.status_code = code;
        response.reason_phrase = reason_phrase.to_string();
        Ok(response)
    }

    /// The explicit reason phrase when set and non-empty, else the
    /// registry default for the current status code.
    pub fn reason_phrase(&self) -> &str {
        if !self.reason_phrase.is_empty() {
            return &self.reason_phrase;
        }
        status::reason_phrase(self.status_code).unwrap_or("")
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
