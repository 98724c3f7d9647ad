//! Managed cookie collections and `Set-Cookie` reconciliation.

use indexmap::IndexMap;

use crate::cookie::Cookie;
use crate::http::response::Response;

const COOKIE_HEADER_NAME: &str = "Set-Cookie";

/// A collection of cookies pending emission, unique by name.
///
/// Storing a cookie under an existing name replaces the previous entry
/// (last write wins); at most one cookie per name exists at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieContext {
    cookies: IndexMap<String, Cookie>,
}

impl CookieContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cookie with defaults and the given value, without storing
    /// it.
    pub fn create(&self, name: &str, value: &str) -> Cookie {
        let mut cookie = Cookie::new(name);
        cookie.set_value(value);
        cookie
    }

    /// Store `cookie` under its own name, replacing any previous entry.
    pub fn set(&mut self, cookie: Cookie) {
        self.cookies.insert(cookie.name().to_string(), cookie);
    }

    /// Create and store a cookie in one step.
    pub fn set_value(&mut self, name: &str, value: &str) {
        let cookie = self.create(name, value);
        self.set(cookie);
    }

    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    /// Mutable access to a stored cookie, for in-place adjustment before
    /// emission.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Cookie> {
        self.cookies.get_mut(name)
    }

    /// Every managed cookie in insertion order.
    pub fn all(&self) -> &IndexMap<String, Cookie> {
        &self.cookies
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn delete(&mut self, name: &str) {
        self.cookies.shift_remove(name);
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Overwrite this context's entries with `other`'s, keyed by name.
    /// Names present only in this context are untouched; a right-biased
    /// union.
    pub fn merge_context(&mut self, other: &CookieContext) {
        for (name, cookie) in &other.cookies {
            self.cookies.insert(name.clone(), cookie.clone());
        }
    }

    /// Sibling response with every managed cookie reconciled into its
    /// `Set-Cookie` sequence: existing lines for managed names are
    /// replaced in place, cookies without an existing line are appended in
    /// context order, and unrelated lines pass through untouched.
    pub fn add_to_response(&self, response: &Response) -> Response {
        modify_headers(response, self.cookies.values())
    }

    /// Sibling response with every managed cookie's line removed from the
    /// `Set-Cookie` sequence. Unrelated lines pass through untouched.
    pub fn delete_from_response(&self, response: &Response) -> Response {
        delete_headers(response, self.cookies.values())
    }
}

/// A line belongs to a managed cookie when it starts with `<name>=`. Each
/// existing line is emitted exactly once; the first matching cookie in
/// iteration order wins.
pub(crate) fn modify_headers<'a>(
    response: &Response,
    cookies: impl Iterator<Item = &'a Cookie>,
) -> Response {
    let keys: Vec<(String, &Cookie)> = cookies
        .map(|cookie| (format!("{}=", cookie.name()), cookie))
        .collect();

    let existing = response.header(COOKIE_HEADER_NAME);
    let mut lines = Vec::with_capacity(existing.len() + keys.len());
    let mut found: Vec<&str> = Vec::new();
    for line in existing {
        match keys.iter().find(|(key, _)| line.starts_with(key.as_str())) {
            Some((_, cookie)) => {
                lines.push(cookie.to_wire_string());
                found.push(cookie.name());
            }
            None => lines.push(line.clone()),
        }
    }
    for (_, cookie) in &keys {
        if !found.contains(&cookie.name()) {
            lines.push(cookie.to_wire_string());
        }
    }
    tracing::debug!(
        replaced = found.len(),
        emitted = lines.len(),
        "reconciled cookies into response"
    );
    response.with_header(COOKIE_HEADER_NAME, lines)
}

pub(crate) fn delete_headers<'a>(
    response: &Response,
    cookies: impl Iterator<Item = &'a Cookie>,
) -> Response {
    let keys: Vec<String> = cookies
        .map(|cookie| format!("{}=", cookie.name()))
        .collect();
    let lines: Vec<String> = response
        .header(COOKIE_HEADER_NAME)
        .iter()
        .filter(|line| !keys.iter().any(|key| line.starts_with(key.as_str())))
        .cloned()
        .collect();
    response.with_header(COOKIE_HEADER_NAME, lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_does_not_store() {
        let context = CookieContext::new();
        let cookie = context.create("testname", "");
        assert_eq!(cookie.name(), "testname");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.expires(), 0);
        assert!(!cookie.secure());
        assert!(!cookie.httponly());
        assert!(context.all().is_empty());
        assert!(context.get("testname").is_none());
    }

    #[test]
    fn set_stores_by_name_last_write_wins() {
        let mut context = CookieContext::new();
        let cookie = context.create("foo", "bar");
        context.set(cookie);
        assert_eq!(context.len(), 1);
        assert_eq!(context.get("foo").unwrap().value(), "bar");

        context.set_value("foo", "boo");
        assert_eq!(context.len(), 1);
        assert_eq!(context.get("foo").unwrap().value(), "boo");
    }

    #[test]
    fn get_mut_adjusts_in_place() {
        let mut context = CookieContext::new();
        context.set_value("foo", "bar");
        context.get_mut("foo").unwrap().set_secure(true);
        assert!(context.get("foo").unwrap().secure());
    }

    #[test]
    fn delete_and_clear() {
        let mut context = CookieContext::new();
        context.set_value("foo", "bar");
        context.set_value("foo2", "bar2");
        context.set_value("foo3", "bar3");
        assert!(context.get("none").is_none());
        assert_eq!(context.len(), 3);

        context.delete("foo");
        assert!(context.get("foo").is_none());
        context.delete("foo2");
        assert_eq!(context.len(), 1);

        context.clear();
        assert!(context.is_empty());
    }

    #[test]
    fn add_to_response_appends_in_context_order() {
        let response = Response::new();
        assert!(response.header("Set-Cookie").is_empty());

        let mut context = CookieContext::new();
        context.set_value("foo", "bar");
        context.set_value("foo2", "bar2");
        context.set_value("foo3", "bar3");

        let response = context.add_to_response(&response);
        assert_eq!(
            response.header("Set-Cookie"),
            ["foo=bar", "foo2=bar2", "foo3=bar3"]
        );

        let response = context.delete_from_response(&response);
        assert!(response.header("Set-Cookie").is_empty());
    }

    #[test]
    fn add_to_response_replaces_in_place() {
        let mut context = CookieContext::new();
        context.set_value("foo", "bar");
        let response = context.add_to_response(&Response::new());

        context.clear();
        context.set_value("foo2", "bar2");
        let response = context.add_to_response(&response);

        context.clear();
        context.set_value("foo", "boo");
        let response = context.add_to_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foo=boo", "foo2=bar2"]);

        context.clear();
        context.set_value("foo2", "B2++");
        let response = context.delete_from_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foo=boo"]);
    }

    #[test]
    fn unrelated_lines_pass_through_once() {
        // two managed cookies against a line neither of them owns
        let response = Response::new().with_header("Set-Cookie", "other=value; Path=/");
        let mut context = CookieContext::new();
        context.set_value("foo", "bar");
        context.set_value("foo2", "bar2");

        let response = context.add_to_response(&response);
        assert_eq!(
            response.header("Set-Cookie"),
            ["other=value; Path=/", "foo=bar", "foo2=bar2"]
        );

        let response = context.delete_from_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["other=value; Path=/"]);
    }

    #[test]
    fn prefix_match_requires_the_equals_sign() {
        let response = Response::new().with_header("Set-Cookie", "foobar=1");
        let mut context = CookieContext::new();
        context.set_value("foo", "bar");

        let response = context.add_to_response(&response);
        assert_eq!(response.header("Set-Cookie"), ["foobar=1", "foo=bar"]);
    }

    #[test]
    fn merge_context_is_right_biased() {
        let mut context = CookieContext::new();
        context.set_value("foo", "bar");
        context.set_value("foo2", "bar2");

        let mut other = CookieContext::new();
        other.set_value("foo", "bar+");
        other.set_value("foo3", "bar3+");

        context.merge_context(&other);
        assert_eq!(context.len(), 3);
        assert_eq!(context.get("foo").unwrap().value(), "bar+");
        assert_eq!(context.get("foo2").unwrap().value(), "bar2");
        assert_eq!(context.get("foo3").unwrap().value(), "bar3+");
    }

    #[test]
    fn rendered_attributes_survive_reconciliation() {
        let mut context = CookieContext::new();
        let mut cookie = context.create("session", "abc123");
        cookie.set_path("/app");
        cookie.set_secure(true);
        context.set(cookie);

        let response = context.add_to_response(&Response::new());
        assert_eq!(
            response.header("Set-Cookie"),
            ["session=abc123; Path=/app; Secure"]
        );
    }
}
