//! Filter/sort/pagination query building shared across all list screens.
//!
//! A [`FilterQuery`] is a sparse mapping from filter name to an optional scalar.
//! [`FilterQuery::build`] turns it into the canonical [`SerializedQuery`] that the
//! transport encodes onto the request URL.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::Url;

/// Well-known query parameter names.
pub const PAGE: &str = "page";
pub const LIMIT: &str = "limit";
pub const SEARCH: &str = "search";
pub const SORT_BY: &str = "sortBy";
pub const ORDER: &str = "order";

/// A single typed filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl QueryValue {
    /// Guess a serialized value's type: booleans, then integers, then text.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => raw
                .parse::<i64>()
                .map(Self::Int)
                .unwrap_or_else(|_| Self::Text(raw.to_string())),
        }
    }

    /// Parse `raw` into the same variant as `self`, falling back to text.
    pub fn parse_like(&self, raw: &str) -> Self {
        let text = || Self::Text(raw.to_string());
        match self {
            Self::Int(_) => raw.parse().map(Self::Int).unwrap_or_else(|_| text()),
            Self::Bool(_) => raw.parse().map(Self::Bool).unwrap_or_else(|_| text()),
            Self::Text(_) => text(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Sort direction for `order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for QueryValue {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Self::Text("asc".to_string()),
            SortOrder::Desc => Self::Text("desc".to_string()),
        }
    }
}

/// Sparse set of filter, sort and pagination fields.
///
/// A field mapped to `None` is explicitly unset; it is never serialized, and when used
/// as a patch it clears the field it names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    fields: BTreeMap<String, Option<QueryValue>>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field (builder style).
    pub fn with(mut self, name: &str, value: impl Into<QueryValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field only when a value is present; `None` leaves the query unchanged.
    pub fn with_opt<V: Into<QueryValue>>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.set(name, v);
        }
        self
    }

    /// Record an explicit unset (useful in patches).
    pub fn without(mut self, name: &str) -> Self {
        self.fields.insert(name.to_string(), None);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<QueryValue>) {
        self.fields.insert(name.to_string(), Some(value.into()));
    }

    pub fn unset(&mut self, name: &str) {
        self.fields.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    /// Current page cursor, defaulting to 1 when unset or out of range.
    pub fn page(&self) -> u32 {
        self.get(PAGE)
            .and_then(QueryValue::as_int)
            .filter(|p| *p >= 1)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1)
    }

    pub fn set_page(&mut self, page: u32) {
        self.set(PAGE, page.max(1));
    }

    pub fn limit(&self) -> Option<u32> {
        self.get(LIMIT)
            .and_then(QueryValue::as_int)
            .filter(|l| *l >= 1)
            .and_then(|l| u32::try_from(l).ok())
    }

    pub fn search(&self) -> Option<&str> {
        self.get(SEARCH).and_then(QueryValue::as_text)
    }

    /// Overlay `patch` onto this query. Explicit unsets in the patch clear fields here.
    pub fn merge(&mut self, patch: FilterQuery) {
        for (name, value) in patch.fields {
            match value {
                Some(v) => {
                    self.fields.insert(name, Some(v));
                }
                None => {
                    self.fields.remove(&name);
                }
            }
        }
    }

    /// Serialize into the canonical request descriptor.
    ///
    /// Unset fields are omitted, `search` is dropped when blank after trimming, and
    /// non-positive `page`/`limit` values are dropped so the server falls back to its
    /// defaults. Every other field passes through verbatim.
    pub fn build(&self) -> SerializedQuery {
        let mut params = BTreeMap::new();
        for (name, value) in &self.fields {
            let Some(value) = value else { continue };
            match (name.as_str(), value) {
                (SEARCH, QueryValue::Text(s)) => {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    params.insert(name.clone(), trimmed.to_string());
                }
                (PAGE | LIMIT, QueryValue::Int(n)) if *n < 1 => continue,
                _ => {
                    params.insert(name.clone(), value.to_string());
                }
            }
        }
        SerializedQuery(params)
    }
}

/// Free-function form of [`FilterQuery::build`].
pub fn build(filters: &FilterQuery) -> SerializedQuery {
    filters.build()
}

/// Wire form of a [`FilterQuery`]: a name to string mapping, encoded by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedQuery(BTreeMap<String, String>);

impl SerializedQuery {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse back without a known source query. `search` stays text; every other value
    /// has its type guessed, so prefer [`Self::parse_as`] when the shape is known.
    pub fn parse(&self) -> FilterQuery {
        self.parse_as(&FilterQuery::default())
    }

    /// Parse back using the value types of `shape`. Fields `shape` lacks are guessed.
    pub fn parse_as(&self, shape: &FilterQuery) -> FilterQuery {
        let fields = self
            .0
            .iter()
            .map(|(name, raw)| {
                let value = match (name.as_str(), shape.get(name)) {
                    (_, Some(hint)) => hint.parse_like(raw),
                    (SEARCH, None) => QueryValue::Text(raw.clone()),
                    _ => QueryValue::parse(raw),
                };
                (name.clone(), Some(value))
            })
            .collect();
        FilterQuery { fields }
    }

    /// Read the query pairs of a URL.
    pub fn from_url(url: &Url) -> Self {
        Self(url.query_pairs().into_owned().collect())
    }

    /// Append every pair to the URL's query string.
    pub fn append_to(&self, url: &mut Url) {
        if self.0.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &self.0 {
            pairs.append_pair(k, v);
        }
    }
}
