// SPDX-License-Identifier: MIT

//! Response and request envelopes shared by every endpoint

use serde::{Deserialize, Serialize};

/// Standard `{ code, message, data }` envelope
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeneralResponse<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: T,
}

impl<T> GeneralResponse<T> {
    /// The server message, or `fallback` when the server sent none
    pub fn message_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total_rows_count: u64,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub number_of_pages: u32,
}

impl<T> PaginationResponse<T> {
    /// An empty first page, used when a dependent lookup has no parent yet
    pub fn empty(message: impl Into<String>, page_size: u32) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: Vec::new(),
            total_rows_count: 0,
            page_number: 1,
            page_size,
            current_page: 1,
            number_of_pages: 1,
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.number_of_pages
    }
}

/// Query parameters accepted by the list endpoints
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<i64>,
}

impl PaginationRequest {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() { None } else { Some(search) };
        self
    }

    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_general_response_tolerates_missing_fields() {
        let resp: GeneralResponse<Value> = serde_json::from_value(json!({"code": 200})).unwrap();
        assert_eq!(resp.code, 200);
        assert!(resp.message.is_empty());
        assert!(resp.data.is_null());
        assert_eq!(resp.message_or("Draft saved"), "Draft saved");
    }

    #[test]
    fn test_pagination_request_skips_unset_fields() {
        let req = PaginationRequest::page(2, 10).with_search("heart");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"pageNumber": 2, "pageSize": 10, "search": "heart"}));
    }

    #[test]
    fn test_pagination_response_deserialize() {
        let resp: PaginationResponse<Value> = serde_json::from_value(json!({
            "code": 200,
            "message": "",
            "data": [{"id": 1}],
            "totalRowsCount": 11,
            "pageNumber": 1,
            "pageSize": 10,
            "currentPage": 1,
            "numberOfPages": 2
        }))
        .unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.total_rows_count, 11);
        assert!(resp.has_more());
    }
}
