//! `httpmsg` models HTTP messages as immutable value objects and reconciles
//! managed cookies against a response's `Set-Cookie` headers.
//!
//! The message family — [`Message`], [`Request`], [`Response`],
//! [`ServerRequest`] — is mutated only by replacement: every with-
//! operation returns a new sibling instance and never touches the
//! receiver. A [`ServerRequest`] is derived once per inbound request from
//! an explicit [`Environment`] snapshot. Cookies accumulate in a
//! [`CookieContext`] during handling and are merged into the response's
//! `Set-Cookie` sequence at emission time.
//!
//! This is purely an in-memory modeling layer: there is no connection
//! handling and no wire-protocol parsing here.

pub mod cookie;
pub mod error;
pub mod http;

pub use crate::cookie::{Cookie, CookieContext};
pub use crate::error::HttpError;
pub use crate::http::headers::{HeaderValues, HttpHeaders};
pub use crate::http::message::Message;
pub use crate::http::request::Request;
pub use crate::http::response::Response;
pub use crate::http::server_request::{Environment, ServerRequest, ServerRequestBuilder};
pub use crate::http::stream::{BodyHandle, MemoryStream, MessageBody, body_handle};
pub use crate::http::uploaded_file::{FileTree, UploadedFile};
pub use crate::http::{HttpMethod, HttpVersion};
