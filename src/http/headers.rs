//! HTTP headers abstraction for [`Message`](crate::http::message::Message)
//! and the richer message types built on it.
//!
//! Headers are stored in an ordered map keyed by the lower-cased name, so
//! lookups are case-insensitive while iteration and serialization keep the
//! casing of the first insertion for each name. One name holds an ordered
//! sequence of values; nothing is deduplicated.
//!
//! The mutating operations are crate-internal: general callers observe a
//! bag through a [`Message`](crate::http::message::Message) and produce
//! changed bags only through the message's with- operations.

use indexmap::IndexMap;

/// One named header: the original-cased name and its values in insertion
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderField {
    name: String,
    values: Vec<String>,
}

/// Header value argument accepted by the with- operations: a single value
/// or an ordered sequence.
#[derive(Debug, Clone)]
pub enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

impl HeaderValues {
    pub(crate) fn into_vec(self) -> Vec<String> {
        match self {
            HeaderValues::One(value) => vec![value],
            HeaderValues::Many(values) => values,
        }
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        HeaderValues::One(value.to_string())
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        HeaderValues::One(value)
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        HeaderValues::Many(values)
    }
}

impl From<&[&str]> for HeaderValues {
    fn from(values: &[&str]) -> Self {
        HeaderValues::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValues {
    fn from(values: [&str; N]) -> Self {
        HeaderValues::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Case-insensitive, order-preserving multi-value header store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    headers: IndexMap<String, HeaderField>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    /// Build a bag from a `name -> values` mapping, indexing each name
    /// case-insensitively while keeping its given casing.
    pub(crate) fn from_seed(seed: IndexMap<String, Vec<String>>) -> Self {
        let mut headers = IndexMap::new();
        for (name, values) in seed {
            let key = name.to_ascii_lowercase();
            headers.insert(key, HeaderField { name, values });
        }
        Self { headers }
    }

    pub fn has(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_ascii_lowercase())
    }

    /// All values for `name` in insertion order; empty when absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|field| field.values.as_slice())
            .unwrap_or(&[])
    }

    /// Values for `name` joined by `,`; empty string when absent.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(",")
    }

    /// Snapshot of every header under its original casing, in insertion
    /// order.
    pub fn all(&self) -> IndexMap<String, Vec<String>> {
        self.headers
            .values()
            .map(|field| (field.name.clone(), field.values.clone()))
            .collect()
    }

    /// Replace all values for `name`, adopting the given casing.
    pub(crate) fn set(&mut self, name: &str, values: Vec<String>) {
        let key = name.to_ascii_lowercase();
        self.headers.insert(
            key,
            HeaderField {
                name: name.to_string(),
                values,
            },
        );
    }

    /// Append values for `name`, keeping the first-seen casing.
    pub(crate) fn add(&mut self, name: &str, values: Vec<String>) {
        let key = name.to_ascii_lowercase();
        let field = self.headers.entry(key).or_insert_with(|| HeaderField {
            name: name.to_string(),
            values: Vec::new(),
        });
        field.values.extend(values);
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.headers.shift_remove(&name.to_ascii_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(pairs: &[(&str, &[&str])]) -> HttpHeaders {
        let mut headers = HttpHeaders::new();
        for (name, values) in pairs {
            headers.set(name, values.iter().map(|v| v.to_string()).collect());
        }
        headers
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let headers = bag(&[("fooheader", &["barvalue", "boovalue"])]);
        assert!(headers.has("fooheader"));
        assert!(headers.has("fooHEADER"));
        assert!(!headers.has("noneheader"));
        assert_eq!(headers.get("fooHEADER"), ["barvalue", "boovalue"]);
        assert!(headers.get("noneheader").is_empty());
    }

    #[test]
    fn line_joins_with_comma() {
        let headers = bag(&[("fooheader", &["barvalue", "boovalue"])]);
        assert_eq!(headers.get_line("fooheader"), "barvalue,boovalue");
        assert_eq!(headers.get_line("fooHEADER"), "barvalue,boovalue");
        assert_eq!(headers.get_line("noneheader"), "");
    }

    #[test]
    fn set_replaces_and_adopts_casing() {
        let mut headers = bag(&[("fooheader", &["barvalue"])]);
        headers.set("fooHEADER", vec!["newVALUE".to_string()]);
        let all = headers.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all["fooHEADER"], ["newVALUE"]);
    }

    #[test]
    fn add_keeps_first_seen_casing() {
        let mut headers = bag(&[("fooheader", &["barvalue"])]);
        headers.add("fooHEADER", vec!["newVALUE".to_string()]);
        let all = headers.all();
        assert_eq!(all["fooheader"], ["barvalue", "newVALUE"]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let headers = bag(&[("b-header", &["1"]), ("a-header", &["2"]), ("c-header", &["3"])]);
        let names: Vec<String> = headers.all().keys().cloned().collect();
        assert_eq!(names, ["b-header", "a-header", "c-header"]);
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut headers = bag(&[("fooheader", &["barvalue"]), ("other", &["x"])]);
        headers.remove("fooHEADER");
        assert!(!headers.has("fooheader"));
        assert!(headers.has("other"));
    }

    #[test]
    fn values_are_not_deduplicated() {
        let mut headers = HttpHeaders::new();
        headers.add("dup", vec!["a".to_string()]);
        headers.add("dup", vec!["a".to_string()]);
        assert_eq!(headers.get("dup"), ["a", "a"]);
    }
}
