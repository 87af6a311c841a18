use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use caderno_core::SourcedRecord;
use caderno_parsing::AbstractClassifier;

use crate::{IngestError, collect_sources, ingest_file};

/// A document that could not be ingested.
#[derive(Debug)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub error: IngestError,
}

/// Outcome of a batch: classified records and failures, both in source order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub records: Vec<SourcedRecord>,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Emitted once per finished document.
#[derive(Debug, Clone, Copy)]
pub struct IngestProgress<'a> {
    /// Documents finished so far, including this one.
    pub completed: usize,
    pub total: usize,
    pub path: &'a Path,
    pub succeeded: bool,
}

/// Collect the documents in `dir` and ingest them with [`ingest_paths`].
pub async fn ingest_folder<F>(
    dir: &Path,
    classifier: Arc<AbstractClassifier>,
    workers: usize,
    on_progress: F,
) -> Result<IngestReport, IngestError>
where
    F: FnMut(IngestProgress<'_>),
{
    let sources = collect_sources(dir)?;
    Ok(ingest_paths(sources, classifier, workers, on_progress).await)
}

/// Extract and classify `paths` concurrently.
///
/// Each document runs on the blocking pool; at most `workers` (minimum 1)
/// are in flight at once. A failing document is recorded in
/// [`IngestReport::failures`] and never aborts the batch. `on_progress` is
/// called on the calling task as each document finishes, in completion order.
pub async fn ingest_paths<F>(
    paths: Vec<PathBuf>,
    classifier: Arc<AbstractClassifier>,
    workers: usize,
    mut on_progress: F,
) -> IngestReport
where
    F: FnMut(IngestProgress<'_>),
{
    let total = paths.len();
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut join_set = JoinSet::new();

    for (index, path) in paths.iter().cloned().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let classifier = Arc::clone(&classifier);

        join_set.spawn(async move {
            // The semaphore is never closed, so acquisition only fails on shutdown.
            let _permit = semaphore.acquire_owned().await.ok();
            let result = tokio::task::spawn_blocking(move || ingest_file(&path, &classifier))
                .await
                .unwrap_or_else(|e| Err(IngestError::Join(e.to_string())));
            (index, result)
        });
    }

    let mut slots: Vec<Option<Result<SourcedRecord, IngestError>>> =
        (0..total).map(|_| None).collect();
    let mut aborted = Vec::new();
    let mut completed = 0;

    while let Some(joined) = join_set.join_next().await {
        let (index, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                tracing::error!(error = %e, "ingest task aborted");
                aborted.push(e.to_string());
                continue;
            }
        };

        let path = &paths[index];
        completed += 1;
        match &result {
            Ok(record) => tracing::info!(
                path = %path.display(),
                title = %record.record.title,
                fallbacks = ?record.provenance.fallback_fields(),
                "ingested document"
            ),
            Err(error) => tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to ingest document"
            ),
        }
        on_progress(IngestProgress {
            completed,
            total,
            path,
            succeeded: result.is_ok(),
        });
        slots[index] = Some(result);
    }

    // An aborted task loses its index, so its document is found by elimination.
    for (index, _) in slots.iter().enumerate().filter(|(_, s)| s.is_none()) {
        completed += 1;
        on_progress(IngestProgress {
            completed,
            total,
            path: &paths[index],
            succeeded: false,
        });
    }

    assemble_report(paths, slots, aborted)
}

/// Pair each path with its outcome in source order. Paths whose task never
/// reported back become [`IngestError::Join`] failures, taking the abort
/// messages in turn.
fn assemble_report(
    paths: Vec<PathBuf>,
    slots: Vec<Option<Result<SourcedRecord, IngestError>>>,
    aborted: Vec<String>,
) -> IngestReport {
    let mut aborted = aborted.into_iter();
    let mut report = IngestReport::default();
    for (path, slot) in paths.into_iter().zip(slots) {
        let result = slot.unwrap_or_else(|| {
            let message = aborted
                .next()
                .unwrap_or_else(|| "task did not complete".to_string());
            tracing::warn!(path = %path.display(), error = %message, "document lost to aborted task");
            Err(IngestError::Join(message))
        });
        match result {
            Ok(record) => report.records.push(record),
            Err(error) => report.failures.push(IngestFailure { path, error }),
        }
    }
    report
}
