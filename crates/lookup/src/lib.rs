//! HTTP transport for the remote fuzzy-category lookup service.
//!
//! The service is best effort: any transport error, timeout, or non-success
//! status is equivalent to "not found" at the resolver level — the resolver
//! logs it and moves on to the next candidate.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use beleg_normalize::{CategoryLookup, LookupError, RemoteMatch, DEFAULT_THRESHOLD};

pub mod wire {
    use super::*;

    /// Query parameters of `GET /lookup`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryRequest {
        pub item_name: String,
        pub threshold: u8,
    }

    /// Response body of `GET /lookup`. `matched_name` and `score` carry the
    /// best candidate even when `found` is false; `category` only when found.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryResponse {
        pub item_name: String,
        pub matched_name: Option<String>,
        pub category: Option<String>,
        pub score: Option<u8>,
        pub found: bool,
    }
}

use wire::CategoryResponse;

/// Per-call timeout. Lookups inside the item-resolution fan-out must fail
/// fast rather than stall the whole receipt.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// reqwest-backed implementation of [`CategoryLookup`].
pub struct HttpCategoryLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCategoryLookup {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn lookup_default(&self, item_name: &str) -> Result<Option<RemoteMatch>, LookupError> {
        self.lookup(item_name, DEFAULT_THRESHOLD).await
    }
}

#[async_trait]
impl CategoryLookup for HttpCategoryLookup {
    async fn lookup(&self, item_name: &str, threshold: u8) -> Result<Option<RemoteMatch>, LookupError> {
        let url = format!("{}/lookup", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("item_name", item_name), ("threshold", &threshold.to_string())])
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: CategoryResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(parse_response(body))
    }
}

/// `found=false` (or a found response missing its fields) is a clean miss.
fn parse_response(body: CategoryResponse) -> Option<RemoteMatch> {
    if !body.found {
        return None;
    }
    match (body.matched_name, body.category, body.score) {
        (Some(matched_name), Some(category), Some(score)) => {
            Some(RemoteMatch { matched_name, category, score })
        }
        _ => {
            tracing::warn!("Lookup service sent found=true with missing fields");
            None
        }
    }
}
