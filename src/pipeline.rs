//! Pipeline orchestration.
//!
//! Owns the post collection for one run and drives the stages:
//!
//! ```text
//! LiveFetch ──ok──► snapshot save (best effort) ──► summarize ──► render ──► Done
//!     │
//!   error
//!     ▼
//! Fallback ──ok──► summarize ──► render ──► Done
//!     │
//!   error ──► fatal (non-zero exit)
//! ```
//!
//! Offline mode carries no fetcher and starts directly in `Fallback`.
//! Snapshot save failure on the live path is logged and ignored;
//! snapshot load failure on the fallback path and report write failure
//! are fatal.

use std::path::PathBuf;

use thiserror::Error;

use crate::aggregate::{self, SentimentDigest};
use crate::fetch::FeedFetcher;
use crate::model::{PostCollection, TrackedAuthorSet};
use crate::report::{ReportError, ReportFormat, ReportRenderer};
use crate::sentiment::SentimentScorer;
use crate::snapshot::{SnapshotError, SnapshotStore};

/// Pipeline stage. `LiveFetch` and `Fallback` acquire data; `Done` is
/// reached once the report is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LiveFetch,
    Fallback,
    Done,
}

/// Fatal pipeline outcomes. A live-fetch failure alone is not fatal — it
/// only appears here once the snapshot fallback has also failed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("snapshot fallback failed: {0}")]
    Fallback(#[from] SnapshotError),

    #[error("failed to write report: {0}")]
    Report(#[from] ReportError),
}

/// Wires fetcher, snapshot store, scorer, and renderer together for one
/// run.
pub struct Pipeline<'a> {
    /// `None` means live access is disabled; the run starts in
    /// `Fallback` and the network is never touched.
    fetcher: Option<FeedFetcher<'a>>,
    snapshot: SnapshotStore,
    scorer: &'a dyn SentimentScorer,
    report_path: PathBuf,
    format: ReportFormat,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        fetcher: Option<FeedFetcher<'a>>,
        snapshot: SnapshotStore,
        scorer: &'a dyn SentimentScorer,
        report_path: impl Into<PathBuf>,
        format: ReportFormat,
    ) -> Self {
        Self {
            fetcher,
            snapshot,
            scorer,
            report_path: report_path.into(),
            format,
        }
    }

    /// Run the pipeline to completion, returning the digest after the
    /// report has been written.
    pub async fn run(&self, authors: &TrackedAuthorSet) -> Result<SentimentDigest, PipelineError> {
        let mut stage = if self.fetcher.is_some() {
            Stage::LiveFetch
        } else {
            tracing::info!("live access disabled, starting in fallback");
            Stage::Fallback
        };

        let collection = loop {
            match stage {
                Stage::LiveFetch => {
                    let Some(fetcher) = &self.fetcher else {
                        stage = Stage::Fallback;
                        continue;
                    };
                    tracing::info!("stage: live fetch");
                    match fetcher.fetch(authors).await {
                        Ok(collection) => {
                            // Best effort only: a save failure must not
                            // block analysis of freshly fetched data.
                            if let Err(e) = self.snapshot.save(&collection) {
                                tracing::warn!(error = %e, "snapshot save failed, continuing");
                            }
                            break collection;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "live fetch failed, falling back to snapshot");
                            stage = Stage::Fallback;
                        }
                    }
                }
                Stage::Fallback => {
                    tracing::info!("stage: snapshot fallback");
                    break self.snapshot.load()?;
                }
                Stage::Done => unreachable!("Done is only reached after rendering"),
            }
        };

        self.finish(&collection)
    }

    /// Aggregate and render. Shared tail of both data paths.
    fn finish(&self, collection: &PostCollection) -> Result<SentimentDigest, PipelineError> {
        let digest = aggregate::summarize(collection, self.scorer);
        ReportRenderer::save(&digest, self.format, &self.report_path)?;
        tracing::info!(stage = ?Stage::Done, "pipeline complete");
        Ok(digest)
    }
}
