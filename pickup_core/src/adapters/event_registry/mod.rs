mod types;

pub use types::{
    ArticlesPage, EventRegistryArticle, EventRegistrySource, GetArticlesRequest,
    GetArticlesResponse,
};

use super::{RawArticle, SourceAdapter};
use crate::config::PickupConfig;
use crate::error::{AdapterError, PickupError};
use crate::types::SourceKind;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};

/// Entity/event-oriented article index (newsapi.ai, a.k.a. Event Registry).
///
/// Optional: without an API key the adapter reports itself disabled and
/// `fetch` returns nothing without touching the network.
pub struct EventIndexAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl EventIndexAdapter {
    pub fn new(config: &PickupConfig) -> Result<Self, PickupError> {
        let client = Client::builder()
            .user_agent(concat!("pickup/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.event_registry.base_url.trim_end_matches('/').to_string(),
            api_key: config
                .event_registry
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            page_size: config.effective_page_size(),
        })
    }
}

#[async_trait]
impl SourceAdapter for EventIndexAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::EventIndex
    }

    fn name(&self) -> &'static str {
        "newsapi-ai"
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(
        &self,
        query: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawArticle>, AdapterError> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let body = GetArticlesRequest {
            api_key: key,
            keyword: query,
            date_start: start.to_string(),
            date_end: end.to_string(),
            result_type: "articles",
            articles_page: 1,
            articles_count: self.page_size,
            articles_sort_by: "date",
        };

        let resp = self
            .client
            .post(format!("{}/api/v1/article/getArticles", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let parsed: Option<GetArticlesResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|p| p.error)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AdapterError::Authentication(message)
                }
                StatusCode::TOO_MANY_REQUESTS => AdapterError::RateLimited(message),
                _ => classify(message),
            });
        }

        // Re-parse strictly so a malformed success body surfaces as a decode error
        let parsed = match parsed {
            Some(p) => p,
            None => serde_json::from_str::<GetArticlesResponse>(&text)?,
        };
        if let Some(message) = parsed.error {
            return Err(classify(message));
        }

        let page = parsed.articles.unwrap_or_default();
        tracing::debug!(
            total = ?page.total_results,
            returned = page.results.len(),
            "event registry response"
        );
        Ok(page
            .results
            .into_iter()
            .take(self.page_size as usize)
            .map(RawArticle::EventIndex)
            .collect())
    }
}

fn classify(message: String) -> AdapterError {
    let lower = message.to_lowercase();
    if lower.contains("api key") || lower.contains("apikey") {
        AdapterError::Authentication(message)
    } else if lower.contains("daily limit") || lower.contains("too many") {
        AdapterError::RateLimited(message)
    } else {
        AdapterError::Api(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn disabled_without_key() {
        let adapter = EventIndexAdapter::new(&PickupConfig::default()).unwrap();
        assert!(!adapter.is_enabled());
    }

    #[test]
    fn blank_key_counts_as_absent() {
        let config = PickupConfig {
            event_registry: ProviderConfig::new("http://localhost").with_api_key("  "),
            ..Default::default()
        };
        assert!(!EventIndexAdapter::new(&config).unwrap().is_enabled());
    }

    #[tokio::test]
    async fn disabled_fetch_returns_empty() {
        let config = PickupConfig {
            // Unroutable: any request would fail
            event_registry: ProviderConfig::new("http://127.0.0.1:1"),
            ..Default::default()
        };
        let adapter = EventIndexAdapter::new(&config).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = adapter.fetch("Jane Doe Atlas", start, start).await.unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn classify_messages() {
        assert!(matches!(
            classify("Invalid API key provided".into()),
            AdapterError::Authentication(_)
        ));
        assert!(matches!(
            classify("You have reached your daily limit".into()),
            AdapterError::RateLimited(_)
        ));
        assert!(matches!(classify("Unknown keyword".into()), AdapterError::Api(_)));
    }
}
