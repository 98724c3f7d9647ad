//! The immutable HTTP message model.
//!
//! [`Message`](message::Message) carries the state common to every HTTP
//! message: protocol version, headers and an optional body handle.
//! [`Request`](request::Request), [`Response`](response::Response) and
//! [`ServerRequest`](server_request::ServerRequest) embed it and add their
//! own state. All of them are value types: operations that would change
//! state return a new sibling instance and never touch the receiver.

use crate::error::HttpError;

pub mod headers;
pub mod message;
pub mod request;
pub mod response;
pub mod server_request;
pub mod status;
pub mod stream;
pub mod uploaded_file;

/// All HTTP versions a message may carry.
#[derive(PartialEq, Eq, PartialOrd, Debug, Clone, Copy, Default)]
pub enum HttpVersion {
    V1_0,
    #[default]
    V1_1,
    V2_0,
}

impl HttpVersion {
    /// Parse a bare version number such as `"1.1"`.
    pub fn parse(version: &str) -> Result<HttpVersion, HttpError> {
        match version {
            "1.0" => Ok(HttpVersion::V1_0),
            "1.1" => Ok(HttpVersion::V1_1),
            "2.0" => Ok(HttpVersion::V2_0),
            _ => Err(HttpError::InvalidProtocolVersion(version.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::V1_0 => "1.0",
            HttpVersion::V1_1 => "1.1",
            HttpVersion::V2_0 => "2.0",
        }
    }
}

/// The request methods a message may carry.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum HttpMethod {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl HttpMethod {
    /// Parse a method token. The token is upper-cased first, so `"get"`
    /// and `"GET"` both resolve to [`HttpMethod::Get`].
    pub fn parse(method: &str) -> Result<HttpMethod, HttpError> {
        match method.to_ascii_uppercase().as_str() {
            "CONNECT" => Ok(HttpMethod::Connect),
            "DELETE" => Ok(HttpMethod::Delete),
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "PATCH" => Ok(HttpMethod::Patch),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "TRACE" => Ok(HttpMethod::Trace),
            other => Err(HttpError::InvalidMethod(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Trace => "TRACE",
        }
    }
}
