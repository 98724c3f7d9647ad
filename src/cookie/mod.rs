//! Cookies pending emission onto a response.
//!
//! A [`Cookie`] is the one mutable entity in the model: it is created with
//! defaults, adjusted in place while a request is handled, and rendered to
//! a `Set-Cookie` line at emission time. [`CookieContext`] collects cookies
//! by name and reconciles them into a response's header sequence.

use chrono::{DateTime, Utc};

use crate::http::response::Response;

pub mod context;

pub use context::CookieContext;

/// A single cookie: name, value, expiry and emission attributes.
///
/// An empty value marks the cookie for deletion; its wire form then carries
/// the literal value `deleted` and an epoch expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    expires: i64,
    path: String,
    domain: String,
    secure: bool,
    httponly: bool,
}

impl Cookie {
    /// A session cookie named `name`: empty value, no expiry, no path or
    /// domain, both flags off.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            expires: 0,
            path: String::new(),
            domain: String::new(),
            secure: false,
            httponly: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Unix timestamp of the expiry; 0 means a session cookie.
    pub fn expires(&self) -> i64 {
        self.expires
    }

    pub fn set_expires(&mut self, expires: i64) {
        self.expires = expires;
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = domain.into();
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn set_secure(&mut self, secure: bool) {
        self.secure = secure;
    }

    pub fn httponly(&self) -> bool {
        self.httponly
    }

    pub fn set_httponly(&mut self, httponly: bool) {
        self.httponly = httponly;
    }

    /// Render the `Set-Cookie` line for this cookie.
    ///
    /// Segments appear in fixed order: `Expires` (only when the expiry is
    /// set), `Path`, `Domain`, `Secure`, `HttpOnly`, each separated by
    /// `"; "`. A deletion line never carries `Secure` or `HttpOnly`.
    pub fn to_wire_string(&self) -> String {
        if self.value.is_empty() {
            return self.to_deleted_string();
        }
        let mut header = format!("{}={}", self.name, self.value);
        if self.expires != 0 {
            header.push_str("; Expires=");
            header.push_str(&cookie_date(self.expires));
        }
        if !self.path.is_empty() {
            header.push_str("; Path=");
            header.push_str(&self.path);
        }
        if !self.domain.is_empty() {
            header.push_str("; Domain=");
            header.push_str(&self.domain);
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if self.httponly {
            header.push_str("; HttpOnly");
        }
        header
    }

    fn to_deleted_string(&self) -> String {
        let mut header = format!("{}=deleted; Expires={}", self.name, cookie_date(0));
        if !self.path.is_empty() {
            header.push_str("; Path=");
            header.push_str(&self.path);
        }
        if !self.domain.is_empty() {
            header.push_str("; Domain=");
            header.push_str(&self.domain);
        }
        header
    }

    /// Sibling response with this cookie reconciled into its `Set-Cookie`
    /// sequence: an existing line for the same name is replaced in place,
    /// otherwise the rendered line is appended.
    pub fn add_to_response(&self, response: &Response) -> Response {
        context::modify_headers(response, std::iter::once(self))
    }

    /// Sibling response with this cookie's line removed from the
    /// `Set-Cookie` sequence.
    pub fn delete_from_response(&self, response: &Response) -> Response {
        context::delete_headers(response, std::iter::once(self))
    }
}

/// Cookie `Expires` timestamps use the Netscape layout with a full weekday
/// name and dashed date, e.g. `Tuesday, 17-Jan-2017 03:14:07 GMT`.
fn cookie_date(timestamp: i64) -> String {
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or(DateTime::UNIX_EPOCH);
    datetime.format("%A, %d-%b-%Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2017-01-17 03:14:07 UTC
    const EXPIRES: i64 = 1484622847;
    const EXPIRES_DATE: &str = "Tuesday, 17-Jan-2017 03:14:07 GMT";
    const DELETED_DATE: &str = "Thursday, 01-Jan-1970 00:00:00 GMT";

    #[test]
    fn defaults() {
        let cookie = Cookie::new("testname");
        assert_eq!(cookie.name(), "testname");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.expires(), 0);
        assert_eq!(cookie.path(), "");
        assert_eq!(cookie.domain(), "");
        assert!(!cookie.secure());
        assert!(!cookie.httponly());
    }

    #[test]
    fn setters_mutate_in_place() {
        let mut cookie = Cookie::new("testname");
        cookie.set_value("testvalue");
        cookie.set_expires(10);
        cookie.set_path("/testpath");
        cookie.set_domain("domain.net");
        cookie.set_secure(true);
        cookie.set_httponly(true);
        assert_eq!(cookie.value(), "testvalue");
        assert_eq!(cookie.expires(), 10);
        assert_eq!(cookie.path(), "/testpath");
        assert_eq!(cookie.domain(), "domain.net");
        assert!(cookie.secure());
        assert!(cookie.httponly());

        cookie.set_secure(false);
        assert!(!cookie.secure());
        assert!(cookie.httponly());
    }

    #[test]
    fn wire_string_grows_segment_by_segment() {
        let mut cookie = Cookie::new("fooName");
        cookie.set_value("fooValue");
        assert_eq!(cookie.to_wire_string(), "fooName=fooValue");

        cookie.set_expires(EXPIRES);
        assert_eq!(
            cookie.to_wire_string(),
            format!("fooName=fooValue; Expires={EXPIRES_DATE}")
        );

        cookie.set_path("/foo");
        assert_eq!(
            cookie.to_wire_string(),
            format!("fooName=fooValue; Expires={EXPIRES_DATE}; Path=/foo")
        );

        cookie.set_domain("foo.com");
        assert_eq!(
            cookie.to_wire_string(),
            format!("fooName=fooValue; Expires={EXPIRES_DATE}; Path=/foo; Domain=foo.com")
        );

        cookie.set_secure(true);
        assert_eq!(
            cookie.to_wire_string(),
            format!("fooName=fooValue; Expires={EXPIRES_DATE}; Path=/foo; Domain=foo.com; Secure")
        );

        cookie.set_httponly(true);
        assert_eq!(
            cookie.to_wire_string(),
            format!(
                "fooName=fooValue; Expires={EXPIRES_DATE}; Path=/foo; Domain=foo.com; Secure; HttpOnly"
            )
        );
    }

    #[test]
    fn wire_string_shrinks_as_fields_clear() {
        let mut cookie = Cookie::new("fooName");
        cookie.set_value("fooValue");
        cookie.set_expires(EXPIRES);
        cookie.set_path("/foo");
        cookie.set_domain("foo.com");
        cookie.set_secure(true);
        cookie.set_httponly(true);

        cookie.set_expires(0);
        assert_eq!(
            cookie.to_wire_string(),
            "fooName=fooValue; Path=/foo; Domain=foo.com; Secure; HttpOnly"
        );

        cookie.set_path("");
        assert_eq!(
            cookie.to_wire_string(),
            "fooName=fooValue; Domain=foo.com; Secure; HttpOnly"
        );

        cookie.set_domain("");
        assert_eq!(cookie.to_wire_string(), "fooName=fooValue; Secure; HttpOnly");

        cookie.set_secure(false);
        assert_eq!(cookie.to_wire_string(), "fooName=fooValue; HttpOnly");

        cookie.set_httponly(false);
        assert_eq!(cookie.to_wire_string(), "fooName=fooValue");
    }

    #[test]
    fn empty_value_renders_a_deletion_line() {
        let mut cookie = Cookie::new("fooName");
        assert_eq!(
            cookie.to_wire_string(),
            format!("fooName=deleted; Expires={DELETED_DATE}")
        );

        cookie.set_path("/foo");
        cookie.set_domain("foo.com");
        cookie.set_secure(true);
        cookie.set_httponly(true);
        // never Secure/HttpOnly on a deletion line
        assert_eq!(
            cookie.to_wire_string(),
            format!("fooName=deleted; Expires={DELETED_DATE}; Path=/foo; Domain=foo.com")
        );
    }

    #[test]
    fn single_cookie_reconciliation_round() {
        let response = Response::new();
        assert!(response.header("Set-Cookie").is_empty());

        let mut foo = Cookie::new("foo");
        foo.set_value("bar");
        let response = foo.add_to_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foo=bar"]);

        foo.set_value("boo");
        let response = foo.add_to_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foo=boo"]);

        let mut foo2 = Cookie::new("foo2");
        foo2.set_value("bar2");
        let response = foo2.add_to_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foo=boo", "foo2=bar2"]);

        foo.set_value("B++");
        let response = foo.add_to_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foo=B++", "foo2=bar2"]);

        let response = foo2.delete_from_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foo=B++"]);

        let response = foo.delete_from_response(&response);
        assert!(response.header("Set-Cookie").is_empty());
    }
}
