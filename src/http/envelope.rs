use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Strips the `{ status, data }` envelope. Bodies without one are passed
/// through untouched.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub limit: u32,
    #[schema(example = 3)]
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMetadata {
    /// Metadata for a list that arrived without any: everything on one page.
    pub fn single_page(len: usize) -> Self {
        Self {
            page: 1,
            limit: len as u32,
            total_pages: 1,
            has_next_page: false,
            has_previous_page: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Every list shape the backend has been seen to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Paged {
        items: Vec<T>,
        #[serde(default)]
        metadata: Option<PageMetadata>,
    },
    /// Older endpoints return the bare array as `data`.
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn normalize(self) -> Page<T> {
        match self {
            ListPayload::Paged {
                items,
                metadata: Some(metadata),
            } => Page { items, metadata },
            ListPayload::Paged {
                items,
                metadata: None,
            }
            | ListPayload::Bare(items) => Page {
                metadata: PageMetadata::single_page(items.len()),
                items,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_envelope_takes_data() {
        let body = json!({ "status": "success", "data": { "id": "E1" } });
        assert_eq!(unwrap_envelope(body), json!({ "id": "E1" }));
    }

    #[test]
    fn unwrap_envelope_passes_bare_bodies_through() {
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_envelope(Value::Null), Value::Null);
    }

    #[test]
    fn paged_list_keeps_metadata() {
        let payload: ListPayload<u32> = serde_json::from_value(json!({
            "items": [1, 2],
            "metadata": {
                "page": 2,
                "limit": 2,
                "totalPages": 4,
                "hasNextPage": true,
                "hasPreviousPage": true
            }
        }))
        .unwrap();

        let page = payload.normalize();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.metadata.page, 2);
        assert_eq!(page.metadata.total_pages, 4);
        assert!(page.metadata.has_next_page);
    }

    #[test]
    fn legacy_bare_list_gets_single_page_metadata() {
        let payload: ListPayload<u32> = serde_json::from_value(json!([5, 6, 7])).unwrap();
        let page = payload.normalize();

        assert_eq!(page.items, vec![5, 6, 7]);
        assert_eq!(page.metadata, PageMetadata::single_page(3));
    }
}
