//! Provider adapters behind a uniform "search articles in a date range" capability.

pub mod event_registry;
pub mod newsapi;

pub use event_registry::{EventIndexAdapter, EventRegistryArticle};
pub use newsapi::{KeywordSearchAdapter, NewsApiArticle};

use crate::config::{PickupConfig, NEWSAPI_KEY_ENV};
use crate::error::{AdapterError, PickupError};
use crate::types::SourceKind;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// A provider record in its own wire shape.
///
/// Only the normalizer looks inside; the pipeline never hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawArticle {
    Keyword(NewsApiArticle),
    EventIndex(EventRegistryArticle),
}

impl RawArticle {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            RawArticle::Keyword(_) => SourceKind::KeywordSearch,
            RawArticle::EventIndex(_) => SourceKind::EventIndex,
        }
    }
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Short identifier, also the credential store key.
    fn name(&self) -> &'static str;

    /// Disabled adapters are skipped without a warning.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Fetch at most one page of matches for `query` published in `start..=end`.
    ///
    /// Implementations own request construction, authentication and decoding
    /// of provider-specific errors.
    async fn fetch(
        &self,
        query: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawArticle>, AdapterError>;
}

/// Builds the adapters in their fixed invocation order.
///
/// The keyword search key is required; the event index is included but
/// disabled when its key is absent.
pub fn build_adapters(config: &PickupConfig) -> Result<Vec<Arc<dyn SourceAdapter>>, PickupError> {
    config.validate()?;

    if !config.newsapi.has_api_key() {
        return Err(PickupError::MissingCredential(format!(
            "no {} found; run `pickup config set newsapi --value <key>` or export it",
            NEWSAPI_KEY_ENV
        )));
    }

    let keyword = KeywordSearchAdapter::new(config)?;
    let event_index = EventIndexAdapter::new(config)?;
    if !event_index.is_enabled() {
        tracing::info!("no newsapi.ai key configured; skipping event index fetch");
    }

    Ok(vec![Arc::new(keyword), Arc::new(event_index)])
}
