use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Encoding detected while normalizing a raw focus-area field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEncoding {
    /// Field was NULL / absent
    Absent,
    /// JSON array text, e.g. `["a","b"]`
    JsonArray,
    /// PostgreSQL array literal, e.g. `{a,"b c"}`
    PgArray,
    /// Comma-separated or plain text
    Delimited,
    /// Looked structured but failed to decode; split on commas instead
    Fallback,
}

/// Normalized list of focus-area tags
///
/// Every raw focus-area column is decoded into a `TagList` once, at the
/// storage boundary. Elements are always trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagList(Vec<String>);

impl TagList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from an already-parsed list, trimming and dropping empty entries
    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .filter_map(|item| {
                    let trimmed = item.as_ref().trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                })
                .collect(),
        )
    }

    /// Normalize a raw text field
    pub fn parse(raw: Option<&str>) -> Self {
        Self::parse_with_encoding(raw).0
    }

    /// Normalize a raw text field, logging when a structured value had to be
    /// coerced through the comma fallback
    pub fn parse_field(field: &str, raw: Option<&str>) -> Self {
        let (tags, encoding) = Self::parse_with_encoding(raw);
        if encoding == TagEncoding::Fallback {
            tracing::warn!(
                field,
                raw = raw.unwrap_or_default(),
                tags = tags.len(),
                "Malformed focus-area encoding, treated as comma-separated text"
            );
        }
        tags
    }

    /// Normalize a raw text field and report which encoding was recognised
    ///
    /// 1. absent → empty
    /// 2. `[`-prefixed → JSON array, `{`-prefixed → PostgreSQL array literal
    /// 3. anything else, or a failed decode from step 2 → comma-separated
    pub fn parse_with_encoding(raw: Option<&str>) -> (Self, TagEncoding) {
        let Some(raw) = raw else {
            return (Self::new(), TagEncoding::Absent);
        };

        let trimmed = raw.trim();

        if trimmed.starts_with('[') {
            return match serde_json::from_str::<Vec<Value>>(trimmed) {
                Ok(items) => (Self::from_json_items(&items), TagEncoding::JsonArray),
                Err(_) => (split_delimited(trimmed), TagEncoding::Fallback),
            };
        }

        if trimmed.starts_with('{') {
            return match parse_pg_array(trimmed) {
                Some(items) => (Self::from_list(items), TagEncoding::PgArray),
                None => (split_delimited(trimmed), TagEncoding::Fallback),
            };
        }

        (split_delimited(trimmed), TagEncoding::Delimited)
    }

    /// Normalize an already-decoded JSON value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::new(),
            Value::String(s) => Self::parse(Some(s.as_str())),
            Value::Array(items) => Self::from_json_items(items),
            Value::Number(_) | Value::Bool(_) => Self::from_list([value.to_string()]),
            Value::Object(_) => {
                tracing::warn!("Ignoring JSON object where a focus-area list was expected");
                Self::new()
            }
        }
    }

    fn from_json_items(items: &[Value]) -> Self {
        let mut dropped = 0usize;
        let tags = items.iter().filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => None,
            Value::Array(_) | Value::Object(_) => {
                dropped += 1;
                None
            }
        });
        let list = Self::from_list(tags.collect::<Vec<_>>());

        if dropped > 0 {
            tracing::warn!(dropped, "Dropped non-scalar focus-area entries");
        }

        list
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for TagList {
    fn from(items: Vec<String>) -> Self {
        Self::from_list(items)
    }
}

impl AsRef<[String]> for TagList {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for TagList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn split_delimited(raw: &str) -> TagList {
    TagList::from_list(raw.split(','))
}

/// Decode a one-dimensional PostgreSQL array literal.
///
/// Returns `None` for anything that is not a well-formed literal, including
/// nested arrays.
fn parse_pg_array(raw: &str) -> Option<Vec<String>> {
    let inner = raw.strip_prefix('{')?.strip_suffix('}')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        let mut item = String::new();
        let mut quoted = false;

        match chars.peek() {
            Some('"') => {
                quoted = true;
                chars.next();
                loop {
                    match chars.next()? {
                        '\\' => item.push(chars.next()?),
                        '"' => break,
                        c => item.push(c),
                    }
                }
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            Some('{') => return None,
            _ => {
                while let Some(&c) = chars.peek() {
                    match c {
                        ',' => break,
                        '"' | '{' | '}' => return None,
                        _ => {
                            item.push(c);
                            chars.next();
                        }
                    }
                }
            }
        }

        // Unquoted NULL is SQL null, not a tag
        if quoted || !item.trim().eq_ignore_ascii_case("null") {
            items.push(item);
        }

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(_) => return None,
        }
    }

    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> TagList {
        TagList::from_list(items.iter().copied())
    }

    #[test]
    fn test_absent_is_empty() {
        let (list, encoding) = TagList::parse_with_encoding(None);
        assert!(list.is_empty());
        assert_eq!(encoding, TagEncoding::Absent);
    }

    #[test]
    fn test_json_array() {
        let (list, encoding) = TagList::parse_with_encoding(Some(r#"["a", " b ", ""]"#));
        assert_eq!(list, tags(&["a", "b"]));
        assert_eq!(encoding, TagEncoding::JsonArray);
    }

    #[test]
    fn test_pg_array_literal() {
        let (list, encoding) =
            TagList::parse_with_encoding(Some(r#"{marketing_sales,"team building",NULL}"#));
        assert_eq!(list, tags(&["marketing_sales", "team building"]));
        assert_eq!(encoding, TagEncoding::PgArray);
    }

    #[test]
    fn test_pg_array_escapes_and_quoted_null() {
        let list = TagList::parse(Some(r#"{"say \"hi\"","NULL"}"#));
        assert_eq!(list, tags(&["say \"hi\"", "NULL"]));
    }

    #[test]
    fn test_empty_pg_array() {
        let (list, encoding) = TagList::parse_with_encoding(Some("{}"));
        assert!(list.is_empty());
        assert_eq!(encoding, TagEncoding::PgArray);
    }

    #[test]
    fn test_comma_separated() {
        let (list, encoding) = TagList::parse_with_encoding(Some(" a , b,,c "));
        assert_eq!(list, tags(&["a", "b", "c"]));
        assert_eq!(encoding, TagEncoding::Delimited);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let (list, encoding) = TagList::parse_with_encoding(Some(r#"["a", "b""#));
        assert_eq!(encoding, TagEncoding::Fallback);
        assert_eq!(list, tags(&[r#"["a""#, r#""b""#]));
    }

    #[test]
    fn test_nested_pg_array_falls_back() {
        let (_, encoding) = TagList::parse_with_encoding(Some("{{a,b},{c}}"));
        assert_eq!(encoding, TagEncoding::Fallback);
    }

    #[test]
    fn test_objects_never_become_tags() {
        let list = TagList::parse(Some(r#"[{"name":"x"}, "ops", 7, null]"#));
        assert_eq!(list, tags(&["ops", "7"]));
    }

    #[test]
    fn test_deserialize_from_any_shape() {
        let from_array: TagList = serde_json::from_str(r#"["a","b"]"#).unwrap();
        let from_text: TagList = serde_json::from_str(r#""a,b""#).unwrap();
        let from_null: TagList = serde_json::from_str("null").unwrap();

        assert_eq!(from_array, tags(&["a", "b"]));
        assert_eq!(from_text, tags(&["a", "b"]));
        assert!(from_null.is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&tags(&["a", "b"])).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }
}
