use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{BatchOptions, BatchProcessor, BatchProgress, BatchResult, BatchStatus};
use crate::error::EcofactorError;
use crate::store::{BatchRecord, BatchStore, Decision};

/// Stops a batch run before its next group starts.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRun {
    /// One result per input record.
    pub results: Vec<BatchResult>,
    pub progress: BatchProgress,
    pub cancelled: bool,
    /// Eligible count re-read from the store after the run.
    pub eligible_remaining: Option<usize>,
}

impl BatchRun {
    pub fn count(&self, status: BatchStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

type ProgressFn<'a> = Box<dyn Fn(BatchProgress) + Send + Sync + 'a>;

/// Runs eligible candidates through a processor in fixed-size concurrent groups.
///
/// Groups run one after another; the records of a group run concurrently
/// and the manager waits for the whole group before starting the next.
/// A failing record only fails its own result.
pub struct BatchManager<'a> {
    store: &'a dyn BatchStore,
    processor: &'a dyn BatchProcessor,
    options: BatchOptions,
    on_progress: Option<ProgressFn<'a>>,
    cancel: Option<CancellationToken>,
}

impl<'a> BatchManager<'a> {
    pub fn new(
        store: &'a dyn BatchStore,
        processor: &'a dyn BatchProcessor,
        options: BatchOptions,
    ) -> Self {
        Self {
            store,
            processor,
            options,
            on_progress: None,
            cancel: None,
        }
    }

    /// Called after every group with the updated counters.
    pub fn on_progress(mut self, f: impl Fn(BatchProgress) + Send + Sync + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of eligible candidates currently in the store.
    pub async fn refresh_eligible(&self) -> Result<usize, EcofactorError> {
        self.store.count_eligible(self.options.threshold).await
    }

    /// List the store's eligible candidates and process them.
    pub async fn run_eligible(&self) -> Result<BatchRun, EcofactorError> {
        let records = self
            .store
            .list_eligible_batch_records(self.options.threshold)
            .await?;
        Ok(self.run_batch(&records).await)
    }

    /// Process `records`, producing exactly one result per record.
    ///
    /// Records below the threshold or already decided are skipped without
    /// being processed.
    pub async fn run_batch(&self, records: &[BatchRecord]) -> BatchRun {
        let threshold = self.options.threshold;
        let (eligible, ineligible): (Vec<&BatchRecord>, Vec<&BatchRecord>) =
            records.iter().partition(|r| r.is_eligible(threshold));

        let mut results: Vec<BatchResult> = ineligible
            .iter()
            .map(|r| skipped(r, ineligible_reason(r, threshold)))
            .collect();

        let total = eligible.len();
        let group_size = self.options.batch_size.max(1);
        let mut progress = BatchProgress::new(0, total);
        let mut cancelled = false;

        log::info!(
            "batch run: {} eligible, {} skipped, groups of {}",
            total,
            results.len(),
            group_size
        );

        for (n, group) in eligible.chunks(group_size).enumerate() {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                cancelled = true;
                let remaining = &eligible[progress.current..];
                log::info!("batch cancelled; {} records not started", remaining.len());
                results.extend(remaining.iter().map(|r| skipped(r, "cancelled before processing".into())));
                break;
            }

            let settled = join_all(group.iter().map(|r| self.process_one(r))).await;
            log::debug!(
                "group {} settled: {} failed",
                n + 1,
                settled.iter().filter(|r| r.status == BatchStatus::Failed).count()
            );
            results.extend(settled);

            progress = BatchProgress::new(progress.current + group.len(), total);
            if let Some(f) = &self.on_progress {
                f(progress);
            }
        }

        let eligible_remaining = match self.refresh_eligible().await {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("could not refresh eligible count: {}", e);
                None
            }
        };

        let run = BatchRun {
            results,
            progress,
            cancelled,
            eligible_remaining,
        };
        log::info!(
            "batch finished: {} success, {} failed, {} skipped",
            run.count(BatchStatus::Success),
            run.count(BatchStatus::Failed),
            run.count(BatchStatus::Skipped)
        );
        run
    }

    async fn process_one(&self, record: &BatchRecord) -> BatchResult {
        let processed = match self
            .processor
            .process(record, self.options.dedup.as_ref())
            .await
        {
            Ok(p) => p,
            Err(e) => {
                log::warn!("batch record {} failed: {}", record.id, e);
                return failed(record, e.to_string());
            }
        };

        if let Err(e) = self
            .store
            .mark_record_decided(&record.id, Decision::Approved)
            .await
        {
            log::warn!("batch record {} processed but not marked: {}", record.id, e);
            return failed(record, format!("processed but could not be marked approved: {}", e));
        }

        let message = match &processed.merged_into {
            Some(id) => format!("merged into {}", id),
            None => format!("created {}", processed.factor_id),
        };
        BatchResult {
            id: record.id.clone(),
            status: BatchStatus::Success,
            message,
            factor_id: Some(processed.factor_id),
        }
    }
}

fn ineligible_reason(record: &BatchRecord, threshold: f64) -> String {
    match record.decision {
        Some(d) => format!("already {}", d),
        None => format!(
            "confidence {:.2} below threshold {:.2}",
            record.confidence_score, threshold
        ),
    }
}

fn skipped(record: &BatchRecord, message: String) -> BatchResult {
    BatchResult {
        id: record.id.clone(),
        status: BatchStatus::Skipped,
        message,
        factor_id: None,
    }
}

fn failed(record: &BatchRecord, message: String) -> BatchResult {
    BatchResult {
        id: record.id.clone(),
        status: BatchStatus::Failed,
        message,
        factor_id: None,
    }
}
