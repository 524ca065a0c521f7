// src/lib.rs
pub mod adapters;
pub mod auth_store;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod query;
pub mod sort;
pub mod types;

pub use adapters::{build_adapters, RawArticle, SourceAdapter};
pub use auth_store::{AuthDetails, AuthStore, FileAuthStore, MemoryAuthStore};
pub use config::PickupConfig;
pub use dedupe::dedupe;
pub use error::{AdapterError, DateParseFailure, PickupError};
pub use normalize::{normalize, parse_timestamp};
pub use pipeline::{CoordinatedRun, Pipeline, RunCoordinator};
pub use query::{build_query, QuerySpec};
pub use sort::sort_chronologically;
pub use types::{
    ArticleRecord, FetchFailed, PickupRow, PublishedAt, ResultSet, RunOutcome, RunReport,
    SourceKind,
};

// Re-exported so callers can drive `Pipeline::run_cancellable` without a direct dependency
pub use tokio_util::sync::CancellationToken;
