//! `replypulse` - Reply sentiment pipeline
//!
//! Fetches recent posts and their replies for a fixed set of tracked
//! public figures, scores each reply's sentiment polarity, averages the
//! scores per post, and renders the result as a report. When live
//! fetching fails or is disabled, a local JSON snapshot is used instead.
//!
//! # Example
//!
//! ```rust,no_run
//! use replypulse::{
//!     FeedFetcher, HttpFeedApi, LexiconScorer, Pipeline, QuotaPolicy, ReportFormat,
//!     SnapshotStore, TokioSleeper, TrackedAuthorSet,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = HttpFeedApi::new("https://mastodon.social")?;
//!     let sleeper = TokioSleeper;
//!     let scorer = LexiconScorer::new();
//!     let fetcher = FeedFetcher::new(&api, &sleeper, QuotaPolicy::default(), 5, 3, 40);
//!
//!     let pipeline = Pipeline::new(
//!         Some(fetcher),
//!         SnapshotStore::new("data.json"),
//!         &scorer,
//!         "report.html",
//!         ReportFormat::Html,
//!     );
//!
//!     let digest = pipeline.run(&TrackedAuthorSet::default_set()).await?;
//!     println!("{} posts summarized", digest.summaries.len());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod fetch;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod snapshot;

pub use aggregate::{summarize, PostSentimentSummary, SentimentDigest};
pub use api::{ApiPost, EndpointCategory, FeedApi, FetchError, HttpFeedApi, SearchPage};
pub use config::Settings;
pub use fetch::{FeedFetcher, QuotaPolicy, Sleeper, TokioSleeper};
pub use model::{Post, PostCollection, TrackedAuthorSet};
pub use pipeline::{Pipeline, PipelineError, Stage};
pub use report::{ReportError, ReportFormat, ReportRenderer};
pub use sentiment::{LexiconScorer, SentimentSample, SentimentScorer};
pub use snapshot::{SnapshotError, SnapshotStore};

/// Version of replypulse
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
