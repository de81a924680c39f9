//! Rate-limited fetch loop.
//!
//! Walks the tracked authors in order, pulls each author's recent original
//! posts, then paginates a mention search per post to collect reply texts.
//! Before each endpoint use the remaining-call quota is consulted; below
//! the low-water mark the whole loop suspends for one quota window. Any
//! API error aborts the entire fetch — the orchestrator falls back to the
//! snapshot instead.

use std::time::Duration;

use async_trait::async_trait;

use crate::api::{EndpointCategory, FeedApi, FetchError};
use crate::model::{Post, PostCollection, TrackedAuthorSet};

/// Quota backoff policy: when the platform reports fewer remaining calls
/// than `low_water_mark`, suspend for `cooldown` (one quota window).
///
/// A pure value type so the guard condition is testable without sleeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    pub low_water_mark: u32,
    pub cooldown: Duration,
}

impl QuotaPolicy {
    /// True when the remaining-call count requires a cooldown before the
    /// next call of that category.
    #[must_use]
    pub fn needs_cooldown(&self, remaining: u32) -> bool {
        remaining < self.low_water_mark
    }
}

impl Default for QuotaPolicy {
    /// 180 calls per 15-minute window; suspend below 101 remaining.
    fn default() -> Self {
        Self {
            low_water_mark: 101,
            cooldown: Duration::from_secs(15 * 60),
        }
    }
}

/// Suspension point, injectable so tests never really sleep.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Fetches posts and replies for a set of tracked authors.
pub struct FeedFetcher<'a> {
    api: &'a dyn FeedApi,
    sleeper: &'a dyn Sleeper,
    policy: QuotaPolicy,
    posts_per_author: usize,
    reply_page_limit: usize,
    reply_page_size: usize,
}

impl<'a> FeedFetcher<'a> {
    pub fn new(
        api: &'a dyn FeedApi,
        sleeper: &'a dyn Sleeper,
        policy: QuotaPolicy,
        posts_per_author: usize,
        reply_page_limit: usize,
        reply_page_size: usize,
    ) -> Self {
        Self {
            api,
            sleeper,
            policy,
            posts_per_author,
            reply_page_limit,
            reply_page_size,
        }
    }

    /// Fetch recent posts and their replies for every tracked author,
    /// in order.
    ///
    /// Posts with zero matched replies are still recorded so the report
    /// can show them as lacking data rather than omitting them. Any API
    /// error aborts the whole fetch; partial results are discarded by
    /// the caller.
    pub async fn fetch(&self, authors: &TrackedAuthorSet) -> Result<PostCollection, FetchError> {
        let mut collection = PostCollection::new();

        for author in authors.iter() {
            tracing::info!(author, "fetching recent posts");
            self.respect_quota(EndpointCategory::Timeline).await?;

            let originals = self.api.recent_posts(author, self.posts_per_author).await?;
            tracing::debug!(author, count = originals.len(), "recent posts fetched");

            for original in originals {
                let mut post = Post::new(author, original.text.clone());

                self.respect_quota(EndpointCategory::Search).await?;
                self.collect_replies(author, &original.id, &mut post)
                    .await?;

                tracing::debug!(
                    author,
                    post_id = %original.id,
                    replies = post.replies.len(),
                    "post recorded"
                );
                collection.push(post);
            }
        }

        tracing::info!(
            posts = collection.len(),
            replies = collection.reply_count(),
            "fetch complete"
        );
        Ok(collection)
    }

    /// Paginate the mention search for one post, appending texts whose
    /// `in_reply_to` matches the post id. Stops at the page limit or when
    /// the API signals the end.
    async fn collect_replies(
        &self,
        author: &str,
        post_id: &str,
        post: &mut Post,
    ) -> Result<(), FetchError> {
        for page in 0..self.reply_page_limit {
            let results = self
                .api
                .search_mentions(author, page, self.reply_page_size)
                .await?;

            for candidate in &results.posts {
                if candidate.in_reply_to.as_deref() == Some(post_id) {
                    post.push_reply(candidate.text.clone());
                }
            }

            if !results.has_more {
                break;
            }
        }
        Ok(())
    }

    /// Consult the quota for a category; below the low-water mark, suspend
    /// for one full quota window before proceeding.
    async fn respect_quota(&self, category: EndpointCategory) -> Result<(), FetchError> {
        let remaining = self.api.remaining_calls(category).await?;

        if self.policy.needs_cooldown(remaining) {
            tracing::warn!(
                category = category.as_str(),
                remaining,
                cooldown_secs = self.policy.cooldown.as_secs(),
                "quota low, suspending for one quota window"
            );
            self.sleeper.sleep(self.policy.cooldown).await;
        } else {
            tracing::debug!(category = category.as_str(), remaining, "quota ok");
        }
        Ok(())
    }
}
