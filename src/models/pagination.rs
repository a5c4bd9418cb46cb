//! Pagination primitives shared across all list endpoints.
//!
//! The API answers collection requests in two shapes. [`CollectionPayload`] resolves
//! that once at the fetch boundary into a [`Page`]; nothing downstream re-inspects
//! the raw body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::FetchError;

/// Key under which nested collection payloads carry their pagination block.
pub const PAGINATION_KEY: &str = "pagination";

/// Pagination block as the server sends it.
///
/// Some endpoints name the cursor `page`, others `current`; both are accepted here
/// and normalised to [`PaginationMeta::current`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RawPagination {
    /// Normalise into the canonical metadata.
    ///
    /// * `fallback_limit` - the limit that was requested (or the configured default),
    ///   used when the server omits `limit`.
    pub fn normalize(&self, fallback_limit: u32) -> PaginationMeta {
        let limit = self.limit.unwrap_or(fallback_limit).max(1);
        let pages = self.pages.unwrap_or_else(|| {
            u32::try_from(self.total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        });
        let current = self
            .current
            .or(self.page)
            .unwrap_or(1)
            .clamp(1, pages.max(1));
        PaginationMeta {
            current,
            pages,
            total: self.total,
            limit,
        }
    }
}

/// Canonical pagination metadata.
///
/// Invariant: `1 <= current <= max(pages, 1)` and `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current: u32,
    pub pages: u32,
    pub total: u64,
    pub limit: u32,
}

impl PaginationMeta {
    /// Metadata for an unpaginated response: everything is on one page.
    pub fn single_page(item_count: usize, fallback_limit: u32) -> Self {
        let total = item_count as u64;
        Self {
            current: 1,
            pages: u32::from(item_count > 0),
            total,
            limit: u32::try_from(item_count)
                .unwrap_or(u32::MAX)
                .max(fallback_limit)
                .max(1),
        }
    }
}

/// One page of a server-ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

/// The two collection shapes the API uses for `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CollectionPayload {
    /// `data` is the items array; pagination is a sibling of `data`.
    Flat(Vec<Value>),
    /// `data` is an object holding the items array and its own pagination.
    Nested(Map<String, Value>),
}

impl CollectionPayload {
    /// Resolve the payload into a typed page.
    ///
    /// * `items_key` - name of the items array in the nested shape; when `None` the
    ///   single array-valued field of the object is used.
    /// * `sibling` - pagination found next to `data` in the envelope.
    /// * `fallback_limit` - limit to assume when the server does not report one.
    pub fn into_page<T: DeserializeOwned>(
        self,
        items_key: Option<&str>,
        sibling: Option<RawPagination>,
        fallback_limit: u32,
    ) -> Result<Page<T>, FetchError> {
        let (raw_items, pagination) = match self {
            CollectionPayload::Flat(items) => (items, sibling),
            CollectionPayload::Nested(mut object) => {
                let nested = match object.remove(PAGINATION_KEY) {
                    Some(p) => Some(serde_json::from_value::<RawPagination>(p)?),
                    None => None,
                };
                let items = take_items(&mut object, items_key)?;
                (items, nested.or(sibling))
            }
        };

        let items = raw_items
            .into_iter()
            .map(serde_json::from_value::<T>)
            .collect::<Result<Vec<_>, _>>()?;

        let meta = match pagination {
            Some(raw) => raw.normalize(fallback_limit),
            None => PaginationMeta::single_page(items.len(), fallback_limit),
        };

        if items.len() > meta.limit as usize {
            tracing::warn!(
                items = items.len(),
                limit = meta.limit,
                "Server returned more items than the page limit"
            );
        }

        Ok(Page { items, meta })
    }
}

fn take_items(object: &mut Map<String, Value>, items_key: Option<&str>) -> Result<Vec<Value>, FetchError> {
    let key = match items_key {
        Some(key) => key.to_string(),
        None => {
            let mut arrays = object
                .iter()
                .filter(|(_, v)| v.is_array())
                .map(|(k, _)| k.clone());
            match (arrays.next(), arrays.next()) {
                (Some(only), None) => only,
                (None, _) => {
                    return Err(FetchError::Decode(
                        "collection payload has no items array".to_string(),
                    ))
                }
                (Some(_), Some(_)) => {
                    return Err(FetchError::Decode(
                        "collection payload has more than one array; items key required"
                            .to_string(),
                    ))
                }
            }
        }
    };

    match object.remove(&key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(FetchError::Decode(format!("`{key}` is not an array"))),
        None => Err(FetchError::Decode(format!("`{key}` missing from payload"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        #[serde(rename = "_id")]
        id: String,
    }

    fn payload(v: Value) -> CollectionPayload {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn normalize_accepts_page_or_current() {
        let with_page = RawPagination {
            total: 23,
            page: Some(2),
            pages: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        let with_current = RawPagination {
            total: 23,
            current: Some(2),
            pages: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(with_page.normalize(20), with_current.normalize(20));
        assert_eq!(with_page.normalize(20).current, 2);
    }

    #[test]
    fn normalize_derives_pages_and_limit() {
        let raw = RawPagination {
            total: 23,
            current: Some(1),
            ..Default::default()
        };
        let meta = raw.normalize(10);
        assert_eq!(
            meta,
            PaginationMeta {
                current: 1,
                pages: 3,
                total: 23,
                limit: 10
            }
        );
    }

    #[test]
    fn normalize_clamps_current() {
        let raw = RawPagination {
            total: 0,
            current: Some(4),
            pages: Some(0),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(raw.normalize(10).current, 1);
    }

    #[test]
    fn flat_shape_uses_sibling_pagination() {
        let page: Page<Item> = payload(json!([{"_id": "a"}, {"_id": "b"}]))
            .into_page(
                None,
                Some(RawPagination {
                    total: 12,
                    page: Some(1),
                    pages: Some(6),
                    limit: Some(2),
                    ..Default::default()
                }),
                10,
            )
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.pages, 6);
        assert_eq!(page.meta.limit, 2);
    }

    #[test]
    fn nested_shape_with_named_key() {
        let page: Page<Item> = payload(json!({
            "contacts": [{"_id": "c1"}],
            "pagination": {"current": 2, "pages": 2, "total": 11}
        }))
        .into_page(Some("contacts"), None, 10)
        .unwrap();
        assert_eq!(page.items, vec![Item { id: "c1".to_string() }]);
        assert_eq!(
            page.meta,
            PaginationMeta {
                current: 2,
                pages: 2,
                total: 11,
                limit: 10
            }
        );
    }

    #[test]
    fn nested_shape_infers_single_array() {
        let page: Page<Item> = payload(json!({
            "logs": [{"_id": "l1"}, {"_id": "l2"}],
            "summary": {"total": 2},
            "pagination": {"page": 1, "pages": 1, "total": 2, "limit": 50}
        }))
        .into_page(None, None, 10)
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.limit, 50);
    }

    #[test]
    fn nested_shape_with_ambiguous_arrays_fails() {
        let result: Result<Page<Item>, _> = payload(json!({
            "a": [],
            "b": []
        }))
        .into_page(None, None, 10);
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn missing_pagination_is_single_page() {
        let page: Page<Item> = payload(json!([{"_id": "t1"}, {"_id": "t2"}, {"_id": "t3"}]))
            .into_page(None, None, 10)
            .unwrap();
        assert_eq!(
            page.meta,
            PaginationMeta {
                current: 1,
                pages: 1,
                total: 3,
                limit: 10
            }
        );

        let empty: Page<Item> = payload(json!([])).into_page(None, None, 10).unwrap();
        assert_eq!(empty.meta.pages, 0);
        assert_eq!(empty.meta.current, 1);
    }
}
