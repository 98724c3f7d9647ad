//! The status-code registry: every code a [`Response`] accepts, mapped to
//! its canonical reason phrase.
//!
//! [`Response`]: crate::http::response::Response

use indexmap::IndexMap;
use once_cell::sync::Lazy;

static REASON_PHRASES: Lazy<IndexMap<u16, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        // informational
        (100, "Continue"),
        (101, "Switching Protocols"),
        (102, "Processing"),
        // success
        (200, "OK"),
        (201, "Created"),
        (202, "Accepted"),
        (203, "Non-Authoritative Information"),
        (204, "No Content"),
        (205, "Reset Content"),
        (206, "Partial Content"),
        (207, "Multi-status"),
        (208, "Already Reported"),
        // redirection
        (300, "Multiple Choices"),
        (301, "Moved Permanently"),
        (302, "Found"),
        (303, "See Other"),
        (304, "Not Modified"),
        (305, "Use Proxy"),
        (306, "Switch Proxy"),
        (307, "Temporary Redirect"),
        // client error
        (400, "Bad Request"),
        (401, "Unauthorized"),
        (402, "Payment Required"),
        (403, "Forbidden"),
        (404, "Not Found"),
        (405, "Method Not Allowed"),
        (406, "Not Acceptable"),
        (407, "Proxy Authentication Required"),
        (408, "Request Time-out"),
        (409, "Conflict"),
        (410, "Gone"),
        (411, "Length Required"),
        (412, "Precondition Failed"),
        (413, "Request Entity Too Large"),
        (414, "Request-URI Too Large"),
        (415, "Unsupported Media Type"),
        (416, "Requested range not satisfiable"),
        (417, "Expectation Failed"),
        (418, "I'm a teapot"),
        (422, "Unprocessable Entity"),
        (423, "Locked"),
        (424, "Failed Dependency"),
        (425, "Unordered Collection"),
        (426, "Upgrade Required"),
        (428, "Precondition Required"),
        (429, "Too Many Requests"),
        (431, "Request Header Fields Too Large"),
        (451, "Unavailable For Legal Reasons"),
        // server error
        (500, "Internal Server Error"),
        (501, "Not Implemented"),
        (502, "Bad Gateway"),
        (503, "Service Unavailable"),
        (504, "Gateway Time-out"),
        (505, "HTTP Version not supported"),
        (506, "Variant Also Negotiates"),
        (507, "Insufficient Storage"),
        (508, "Loop Detected"),
        (511, "Network Authentication Required"),
    ])
});

/// Whether `code` is a known status code.
pub fn is_valid(code: u16) -> bool {
    REASON_PHRASES.contains_key(&code)
}

/// The registry reason phrase for `code`, if known.
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    REASON_PHRASES.get(&code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(reason_phrase(200), Some("OK"));
        assert_eq!(reason_phrase(301), Some("Moved Permanently"));
        assert_eq!(reason_phrase(404), Some("Not Found"));
        assert_eq!(reason_phrase(429), Some("Too Many Requests"));
        assert_eq!(reason_phrase(511), Some("Network Authentication Required"));
    }

    #[test]
    fn unknown_codes() {
        assert!(!is_valid(0));
        assert!(!is_valid(99));
        assert!(!is_valid(419));
        assert!(!is_valid(600));
        assert_eq!(reason_phrase(999), None);
    }
}
