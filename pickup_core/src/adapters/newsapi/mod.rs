mod types;

pub use types::{EverythingResponse, NewsApiArticle, NewsApiErrorBody, NewsApiSource};

use super::{RawArticle, SourceAdapter};
use crate::config::{PickupConfig, NEWSAPI_KEY_ENV};
use crate::error::{AdapterError, PickupError};
use crate::types::SourceKind;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};

/// Keyword search over NewsAPI.org's `everything` endpoint.
///
/// Asks for the most recent `page_size` English-language matches in the date
/// range, sorted by publish time. That ordering is not relied upon.
pub struct KeywordSearchAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
    page_size: u32,
}

impl KeywordSearchAdapter {
    pub fn new(config: &PickupConfig) -> Result<Self, PickupError> {
        let client = Client::builder()
            .user_agent(concat!("pickup/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.newsapi.base_url.trim_end_matches('/').to_string(),
            api_key: config.newsapi.api_key.clone(),
            language: config.language.clone(),
            page_size: config.effective_page_size(),
        })
    }
}

#[async_trait]
impl SourceAdapter for KeywordSearchAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::KeywordSearch
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch(
        &self,
        query: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawArticle>, AdapterError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            AdapterError::Authentication(format!("Missing credentials: set {}", NEWSAPI_KEY_ENV))
        })?;

        let from = start.to_string();
        let to = end.to_string();
        let page_size = self.page_size.to_string();

        let resp = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .header("X-Api-Key", key)
            .query(&[
                ("q", query),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("language", self.language.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(decode_error(status, &body));
        }

        let parsed: EverythingResponse = serde_json::from_str(&body)?;
        if parsed.status != "ok" {
            return Err(classify(
                parsed.code.as_deref(),
                parsed.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        tracing::debug!(
            total = ?parsed.total_results,
            returned = parsed.articles.len(),
            "newsapi response"
        );
        Ok(parsed.articles.into_iter().map(RawArticle::Keyword).collect())
    }
}

/// Maps a non-2xx response to an adapter error, preferring the provider's code.
fn decode_error(status: StatusCode, body: &str) -> AdapterError {
    let parsed: Option<NewsApiErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        StatusCode::UNAUTHORIZED => AdapterError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => AdapterError::RateLimited(message),
        _ => classify(code.as_deref(), message),
    }
}

fn classify(code: Option<&str>, message: String) -> AdapterError {
    match code {
        Some("apiKeyMissing" | "apiKeyInvalid" | "apiKeyDisabled" | "apiKeyExhausted") => {
            AdapterError::Authentication(message)
        }
        Some("rateLimited") => AdapterError::RateLimited(message),
        _ => AdapterError::Api(message),
    }
}
