//! Fetch, normalize, dedupe and sort across all adapters.

use crate::adapters::{build_adapters, RawArticle, SourceAdapter};
use crate::config::{PickupConfig, DEFAULT_TIMEOUT_MS};
use crate::dedupe::dedupe;
use crate::error::{AdapterError, PickupError};
use crate::normalize::normalize_all;
use crate::query::QuerySpec;
use crate::sort::sort_chronologically;
use crate::types::{FetchFailed, RunReport};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Runs one query against every enabled adapter and merges the results.
///
/// Adapters are queried concurrently; their output is merged in the order the
/// adapters were supplied, so that order decides which copy of a duplicate URL
/// survives.
pub struct Pipeline {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    timeout: Duration,
}

impl Pipeline {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            adapters,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Builds the standard adapters from `config`.
    pub fn from_config(config: &PickupConfig) -> Result<Self, PickupError> {
        Ok(Self::new(build_adapters(config)?).with_timeout(config.timeout()))
    }

    /// Per-adapter time limit; a slower adapter is reported as a timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    pub async fn run(&self, spec: &QuerySpec) -> Result<RunReport, PickupError> {
        self.run_cancellable(spec, CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), but gives up with [`PickupError::Cancelled`]
    /// as soon as `cancel` fires.
    ///
    /// Adapter faults never fail the run; each becomes a [`FetchFailed`]
    /// warning on the report and that adapter contributes nothing.
    pub async fn run_cancellable(
        &self,
        spec: &QuerySpec,
        cancel: CancellationToken,
    ) -> Result<RunReport, PickupError> {
        let started = Instant::now();
        let query = spec.query()?;

        if spec.is_inverted() {
            tracing::warn!(
                start = %spec.start_date,
                end = %spec.end_date,
                "start date is after end date; passing range to providers unchanged"
            );
        }

        let outcomes = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(query = %query, "run cancelled");
                return Err(PickupError::Cancelled);
            }
            outcomes = self.fetch_all(&query, spec.start_date, spec.end_date) => outcomes,
        };

        let mut records = Vec::new();
        let mut warnings = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(raws) => records.extend(normalize_all(raws)),
                Err(warning) => warnings.push(warning),
            }
        }

        let records = sort_chronologically(dedupe(records));
        let mut report = RunReport::new(query, records);
        for warning in warnings {
            report.add_warning(warning);
        }
        report.duration_ms = Some(started.elapsed().as_millis() as u64);

        tracing::info!(
            query = %report.query,
            records = report.results().map_or(0, |r| r.len()),
            warnings = report.warnings.len(),
            duration_ms = report.duration_ms,
            "pickup run finished"
        );
        Ok(report)
    }

    async fn fetch_all(
        &self,
        query: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Result<Vec<RawArticle>, FetchFailed>> {
        let limit = self.timeout;

        let futures: Vec<_> = self
            .adapters
            .iter()
            .filter(|adapter| {
                let enabled = adapter.is_enabled();
                if !enabled {
                    tracing::debug!(adapter = adapter.name(), "adapter disabled; skipping");
                }
                enabled
            })
            .map(|adapter| {
                let adapter = Arc::clone(adapter);
                async move {
                    let kind = adapter.kind();
                    let result = match timeout(limit, adapter.fetch(query, start, end)).await {
                        Ok(result) => result,
                        Err(_) => Err(AdapterError::Timeout(format!(
                            "no response after {}ms",
                            limit.as_millis()
                        ))),
                    };

                    match result {
                        Ok(raws) => {
                            tracing::debug!(
                                adapter = adapter.name(),
                                count = raws.len(),
                                "adapter returned records"
                            );
                            Ok(raws)
                        }
                        Err(err) => {
                            tracing::warn!(
                                adapter = adapter.name(),
                                code = err.code_str(),
                                error = %err,
                                "adapter fetch failed"
                            );
                            Err(FetchFailed {
                                adapter: kind,
                                message: err.describe(kind),
                                timed_out: err.is_timeout(),
                            })
                        }
                    }
                }
            })
            .collect();

        futures::future::join_all(futures).await
    }
}

/// Result of a coordinated run.
#[derive(Debug)]
pub enum CoordinatedRun {
    Completed(RunReport),
    /// A newer run started before this one finished; its results were dropped.
    Superseded,
}

/// Last-request-wins wrapper around a [`Pipeline`].
///
/// Starting a run cancels the one in flight. A run that finishes after a newer
/// one has started reports [`CoordinatedRun::Superseded`] instead of results.
pub struct RunCoordinator {
    pipeline: Pipeline,
    generation: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
}

impl RunCoordinator {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Cancels the previous run and returns the new generation and its token.
    pub fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (generation, token)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Cancels whatever run is in flight without starting a new one.
    pub fn cancel(&self) {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = current.as_ref() {
            token.cancel();
        }
    }

    pub async fn run(&self, spec: &QuerySpec) -> Result<CoordinatedRun, PickupError> {
        let (generation, token) = self.begin();
        let result = self.pipeline.run_cancellable(spec, token).await;

        if !self.is_current(generation) {
            tracing::debug!(generation, "discarding superseded run");
            return Ok(CoordinatedRun::Superseded);
        }
        result.map(CoordinatedRun::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceKind;
    use async_trait::async_trait;

    struct Fixed(Vec<RawArticle>);

    #[async_trait]
    impl SourceAdapter for Fixed {
        fn kind(&self) -> SourceKind {
            SourceKind::KeywordSearch
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(
            &self,
            _query: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<RawArticle>, AdapterError> {
            Ok(self.0.clone())
        }
    }

    fn spec(subject: &str, project: &str) -> QuerySpec {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        QuerySpec::new(subject, project, day, day)
    }

    #[tokio::test]
    async fn invalid_query_fails_before_fetching() {
        let pipeline = Pipeline::new(vec![Arc::new(Fixed(Vec::new()))]);
        let err = pipeline.run(&spec("  ", "Atlas")).await.unwrap_err();
        assert!(matches!(err, PickupError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn pre_cancelled_token_cancels() {
        let pipeline = Pipeline::new(vec![Arc::new(Fixed(Vec::new()))]);
        let token = CancellationToken::new();
        token.cancel();
        let err = pipeline
            .run_cancellable(&spec("Jane Doe", "Atlas"), token)
            .await
            .unwrap_err();
        assert!(matches!(err, PickupError::Cancelled));
    }

    #[tokio::test]
    async fn report_carries_query_and_duration() {
        let pipeline = Pipeline::new(vec![Arc::new(Fixed(Vec::new()))]);
        let report = pipeline.run(&spec(" Jane Doe ", "Atlas")).await.unwrap();
        assert_eq!(report.query, "Jane Doe Atlas");
        assert!(report.duration_ms.is_some());
        assert!(report.is_empty());
    }

    #[test]
    fn begin_advances_generation_and_cancels_previous() {
        let coordinator = RunCoordinator::new(Pipeline::new(Vec::new()));
        let (first, first_token) = coordinator.begin();
        let (second, second_token) = coordinator.begin();
        assert_eq!(second, first + 1);
        assert!(first_token.is_cancelled());
        assert!(!second_token.is_cancelled());
        assert!(coordinator.is_current(second));
        assert!(!coordinator.is_current(first));
    }
}
