//! `application/x-www-form-urlencoded` request bodies.

use std::fmt::Display;
use url::form_urlencoded;

/// Content type sent with a [`Form`] body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A url-encoded form, built with chainable calls.
///
/// Fields keep insertion order and duplicate names are allowed.
///
/// ```
/// use please::Form;
///
/// let form = Form::new()
///     .add("time", "money")
///     .add_values("k", ["a", "b", "c"])
///     .add("answer", 42);
/// assert_eq!(form.encode(), "time=money&k=a&k=b&k=c&answer=42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, Option<String>)>,
}

impl Form {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single field. The value is formatted with `Display`.
    pub fn add(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.fields.push((name.into(), Some(value.to_string())));
        self
    }

    /// Adds a field whose value may be absent. `None` encodes as a bare name.
    pub fn add_optional<V: Display>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.fields
            .push((name.into(), value.map(|v| v.to_string())));
        self
    }

    /// Adds every `(name, value)` pair, e.g. from a map.
    pub fn add_all<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        for (name, value) in pairs {
            self = self.add(name, value);
        }
        self
    }

    /// Adds several values under one name: `k=a&k=b&k=c`.
    pub fn add_values<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        for value in values {
            self = self.add(name, value);
        }
        self
    }

    /// Number of fields, counting duplicates.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order. A bare key has no value.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Encodes the form as UTF-8 `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.fields {
            match value {
                Some(value) => serializer.append_pair(name, value),
                None => serializer.append_key_only(name),
            };
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Form {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Form::new().add_all(iter)
    }
}
