// SPDX-License-Identifier: MIT

//! Lookup lists behind the select fields
//!
//! Dependent lists (regions of a country, cities of a region) stay disabled
//! while their parent has no value: the loader answers with an empty page
//! and sends nothing.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::client::ApiClient;
use super::models::{GeneralResponse, Lookup, LookupKind, PaginationRequest, PaginationResponse};
use crate::error::Result;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[async_trait]
pub trait LookupApi: Send + Sync {
    async fn lookup_page(
        &self,
        kind: LookupKind,
        query: &PaginationRequest,
    ) -> Result<PaginationResponse<Lookup>>;

    /// Named enum lists, e.g. `SiteRequirementsStatus`
    async fn lookup_enum(&self, name: &str) -> Result<GeneralResponse<Value>>;
}

#[async_trait]
impl LookupApi for ApiClient {
    async fn lookup_page(
        &self,
        kind: LookupKind,
        query: &PaginationRequest,
    ) -> Result<PaginationResponse<Lookup>> {
        self.get(kind.path(), Some(query)).await
    }

    async fn lookup_enum(&self, name: &str) -> Result<GeneralResponse<Value>> {
        let name: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        self.get(&format!("Lookup/enums?names={}", name), None).await
    }
}

/// Select option derived from a lookup entry
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOption {
    pub label: String,
    pub value: i64,
}

impl From<Lookup> for LookupOption {
    fn from(l: Lookup) -> Self {
        Self {
            label: l.label,
            value: l.id,
        }
    }
}

/// Paged, searchable loader for one lookup list
pub struct LookupLoader {
    api: Arc<dyn LookupApi>,
    kind: LookupKind,
    page_size: u32,
}

impl LookupLoader {
    pub fn new(api: Arc<dyn LookupApi>, kind: LookupKind) -> Self {
        Self {
            api,
            kind,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub async fn load(&self, search: &str, page: u32) -> Result<PaginationResponse<LookupOption>> {
        let query = PaginationRequest::page(page.max(1), self.page_size).with_search(search);
        self.fetch(query).await
    }

    /// Load the children of `parent`; an unset parent yields an empty page
    pub async fn load_children(
        &self,
        parent: Option<i64>,
        search: &str,
        page: u32,
    ) -> Result<PaginationResponse<LookupOption>> {
        let parent = match parent {
            Some(id) if id > 0 => id,
            _ => {
                return Ok(PaginationResponse::empty(
                    self.kind.missing_parent_message(),
                    self.page_size,
                ))
            }
        };
        let query = PaginationRequest::page(page.max(1), self.page_size)
            .with_search(search)
            .with_parent(parent);
        self.fetch(query).await
    }

    async fn fetch(&self, query: PaginationRequest) -> Result<PaginationResponse<LookupOption>> {
        let page = self.api.lookup_page(self.kind, &query).await?;
        Ok(PaginationResponse {
            code: page.code,
            message: page.message,
            data: page.data.into_iter().map(LookupOption::from).collect(),
            total_rows_count: page.total_rows_count,
            page_number: page.page_number,
            page_size: page.page_size,
            current_page: page.current_page,
            number_of_pages: page.number_of_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every query it receives
    struct MockLookups {
        calls: Mutex<Vec<(LookupKind, PaginationRequest)>>,
    }

    impl MockLookups {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LookupApi for MockLookups {
        async fn lookup_page(
            &self,
            kind: LookupKind,
            query: &PaginationRequest,
        ) -> Result<PaginationResponse<Lookup>> {
            self.calls.lock().unwrap().push((kind, query.clone()));
            Ok(PaginationResponse {
                code: 200,
                message: String::new(),
                data: vec![Lookup {
                    id: 7,
                    label: "Riyadh".to_string(),
                }],
                total_rows_count: 1,
                page_number: 1,
                page_size: 10,
                current_page: 1,
                number_of_pages: 1,
            })
        }

        async fn lookup_enum(&self, _name: &str) -> Result<GeneralResponse<Value>> {
            Ok(GeneralResponse::default())
        }
    }

    #[tokio::test]
    async fn test_children_without_parent_send_nothing() {
        let api = Arc::new(MockLookups::new());
        let loader = LookupLoader::new(api.clone(), LookupKind::City);

        let page = loader.load_children(None, "", 1).await.unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.message, "No region selected");
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_children_with_parent_pass_parent_id() {
        let api = Arc::new(MockLookups::new());
        let loader = LookupLoader::new(api.clone(), LookupKind::City).with_page_size(20);

        let page = loader.load_children(Some(3), "ri", 2).await.unwrap();

        assert_eq!(
            page.data,
            vec![LookupOption {
                label: "Riyadh".to_string(),
                value: 7
            }]
        );
        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, LookupKind::City);
        assert_eq!(calls[0].1.parent_id, Some(3));
        assert_eq!(calls[0].1.page_number, Some(2));
        assert_eq!(calls[0].1.page_size, Some(20));
        assert_eq!(calls[0].1.search.as_deref(), Some("ri"));
    }
}
