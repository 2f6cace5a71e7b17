//! The shared backend client.
//!
//! One `ApiClient` serves every screen in both binaries. Auth is pluggable
//! per call: public catalog reads take no token, everything else takes the
//! bearer token resolved from the caller's session. Public catalog
//! responses are cached with `moka` (5-minute TTL) and invalidated on any
//! admin catalog mutation.

mod auth;
mod books;
mod cart;
mod categories;
mod coupons;
mod orders;
mod reviews;
mod users;

pub use orders::ListOrdersQuery;
pub use users::ListUsersQuery;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, classify_response};
use crate::types::{Book, Category};

/// Cached catalog values.
///
/// `Arc` keeps cache hits cheap; lists are shared, never mutated.
#[derive(Clone)]
enum CacheValue {
    Books(Arc<Vec<Book>>),
    Categories(Arc<Vec<Category>>),
}

/// Client for the bookstore REST backend.
///
/// Cheaply cloneable; all clones share one connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Catalog cache TTL.
    const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Create a new client for the given backend origin,
    /// e.g. `https://books.example.com`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Self::CACHE_TTL)
            .build();

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    /// The backend origin this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Drop all cached catalog data.
    ///
    /// Called after any admin book/category mutation so the storefront does
    /// not serve a stale list for up to the full TTL.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.inner.client.get(self.url(path))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.inner.client.post(self.url(path))
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.inner.client.put(self.url(path))
    }

    fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.inner.client.delete(self.url(path))
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.execute_raw(request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send a request, discarding any response body.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.execute_raw(request).await?;
        Ok(())
    }

    async fn execute_raw(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(classify_response(status.as_u16(), &text));
        }

        Ok(text)
    }

    async fn cached_books(&self, key: &str) -> Option<Arc<Vec<Book>>> {
        match self.inner.cache.get(key).await {
            Some(CacheValue::Books(books)) => Some(books),
            _ => None,
        }
    }

    async fn cache_books(&self, key: String, books: Arc<Vec<Book>>) {
        self.inner.cache.insert(key, CacheValue::Books(books)).await;
    }

    async fn cached_categories(&self, key: &str) -> Option<Arc<Vec<Category>>> {
        match self.inner.cache.get(key).await {
            Some(CacheValue::Categories(categories)) => Some(categories),
            _ => None,
        }
    }

    async fn cache_categories(&self, key: String, categories: Arc<Vec<Category>>) {
        self.inner
            .cache
            .insert(key, CacheValue::Categories(categories))
            .await;
    }
}

/// Query parameters for book listings.
///
/// `limit: Some(0)` asks the backend for the full, unpaginated list (the
/// dashboard uses this to count books).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBooksQuery {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
}

impl ListBooksQuery {
    /// The full unpaginated list.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            limit: Some(0),
            skip: None,
            search: None,
            category: None,
            language: None,
        }
    }

    /// One page of `limit` books starting at offset `skip`.
    #[must_use]
    pub const fn page(limit: u32, skip: u32) -> Self {
        Self {
            limit: Some(limit),
            skip: Some(skip),
            search: None,
            category: None,
            language: None,
        }
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }
        params
    }

    /// Cache key for this query; `None` when the query is not cacheable
    /// (free-text searches are long-tail and skip the cache).
    pub(crate) fn cache_key(&self) -> Option<String> {
        if self.search.is_some() {
            return None;
        }
        Some(format!(
            "books:limit={:?}:skip={:?}:category={:?}:language={:?}",
            self.limit, self.skip, self.category, self.language
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("https://books.example.com/");
        assert_eq!(client.base_url(), "https://books.example.com");
        assert_eq!(
            client.url("/api/v1/cart"),
            "https://books.example.com/api/v1/cart"
        );
    }

    #[test]
    fn test_list_query_params_in_order() {
        let query = ListBooksQuery {
            limit: Some(20),
            skip: None,
            search: None,
            category: Some("fiction".into()),
            language: Some("Somali".into()),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("limit", "20".to_string()),
                ("category", "fiction".to_string()),
                ("language", "Somali".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_queries_are_not_cached() {
        let mut query = ListBooksQuery::page(5, 0);
        assert!(query.cache_key().is_some());
        query.search = Some("cawl".into());
        assert!(query.cache_key().is_none());
    }

    #[test]
    fn test_distinct_filters_get_distinct_cache_keys() {
        let somali = ListBooksQuery {
            language: Some("Somali".into()),
            ..ListBooksQuery::all()
        };
        let arabic = ListBooksQuery {
            language: Some("Arabic".into()),
            ..ListBooksQuery::all()
        };
        assert_ne!(somali.cache_key(), arabic.cache_key());
    }
}
