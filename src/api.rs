//! Social platform API boundary.
//!
//! [`FeedApi`] is the seam between the pipeline and the platform: list an
//! author's recent original posts, search recent posts addressed to an
//! author (paginated), and read remaining-call quota counters per endpoint
//! category. [`HttpFeedApi`] implements it against a Mastodon-style public
//! REST API; tests substitute scripted fakes.
//!
//! Authentication is out of scope — only public endpoints are used.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

/// Any error while talking to the platform API. The fetch loop treats all
/// variants uniformly: the whole fetch attempt is aborted.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed API response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid instance URL: {0}")]
    BadInstance(#[from] url::ParseError),

    #[error("unknown author: {0}")]
    UnknownAuthor(String),
}

/// Endpoint categories with independent rate-limit quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointCategory {
    /// Listing an author's recent posts.
    Timeline,
    /// Searching for posts addressed to an author.
    Search,
}

impl EndpointCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeline => "timeline",
            Self::Search => "search",
        }
    }
}

/// A post as returned by the platform.
#[derive(Debug, Clone)]
pub struct ApiPost {
    pub id: String,
    pub text: String,
    /// Id of the post this one replies to, if any.
    pub in_reply_to: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub posts: Vec<ApiPost>,
    /// Whether the API indicated more pages may follow.
    pub has_more: bool,
}

/// Abstract platform operations used by the fetch loop.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// An author's most recent original posts (no replies, no reposts),
    /// newest first, at most `limit`.
    async fn recent_posts(&self, author: &str, limit: usize) -> Result<Vec<ApiPost>, FetchError>;

    /// One page of recent posts addressed to `author`. Pages are numbered
    /// from zero.
    async fn search_mentions(
        &self,
        author: &str,
        page: usize,
        page_size: usize,
    ) -> Result<SearchPage, FetchError>;

    /// Remaining calls in the current quota window for a category.
    async fn remaining_calls(&self, category: EndpointCategory) -> Result<u32, FetchError>;
}

/// Remaining-call count assumed before the API has reported one.
const DEFAULT_QUOTA: u32 = 300;

/// [`FeedApi`] over a Mastodon-style public REST API.
///
/// Quota counters come from `X-RateLimit-Remaining` response headers and
/// are tracked per endpoint category; account id lookups are cached for
/// the lifetime of the client.
pub struct HttpFeedApi {
    client: Client,
    base: Url,
    quota: RwLock<HashMap<EndpointCategory, u32>>,
    account_ids: RwLock<HashMap<String, String>>,
}

impl HttpFeedApi {
    /// Build a client for the given instance base URL,
    /// e.g. `https://mastodon.social`.
    pub fn new(instance: &str) -> Result<Self, FetchError> {
        let base = Url::parse(instance)?;

        let client = Client::builder()
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("replypulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            quota: RwLock::new(HashMap::new()),
            account_ids: RwLock::new(HashMap::new()),
        })
    }

    /// Issue a GET, record the quota header for `category`, and return the
    /// response after a status check.
    async fn get(&self, url: Url, category: EndpointCategory) -> Result<Response, FetchError> {
        tracing::debug!(url = %url, category = category.as_str(), "API request");
        let response = self.client.get(url.clone()).send().await?;

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
        {
            self.quota.write().await.insert(category, remaining);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: url.path().to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Resolve an author handle to the platform's account id, cached.
    async fn account_id(&self, author: &str) -> Result<String, FetchError> {
        if let Some(id) = self.account_ids.read().await.get(author) {
            return Ok(id.clone());
        }

        let mut url = self.base.join("/api/v1/accounts/lookup")?;
        url.query_pairs_mut().append_pair("acct", author);

        let response = self.get(url, EndpointCategory::Timeline).await;
        let account: Account = match response {
            Ok(r) => r.json().await?,
            Err(FetchError::Status { status: 404, .. }) => {
                return Err(FetchError::UnknownAuthor(author.to_string()))
            }
            Err(e) => return Err(e),
        };

        self.account_ids
            .write()
            .await
            .insert(author.to_string(), account.id.clone());
        Ok(account.id)
    }
}

#[async_trait]
impl FeedApi for HttpFeedApi {
    async fn recent_posts(&self, author: &str, limit: usize) -> Result<Vec<ApiPost>, FetchError> {
        let id = self.account_id(author).await?;

        let mut url = self
            .base
            .join(&format!("/api/v1/accounts/{id}/statuses"))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("exclude_replies", "true")
            .append_pair("exclude_reblogs", "true");

        let statuses: Vec<Status> = self
            .get(url, EndpointCategory::Timeline)
            .await?
            .json()
            .await?;

        Ok(statuses.into_iter().map(Status::into_api_post).collect())
    }

    async fn search_mentions(
        &self,
        author: &str,
        page: usize,
        page_size: usize,
    ) -> Result<SearchPage, FetchError> {
        let mut url = self.base.join("/api/v2/search")?;
        url.query_pairs_mut()
            .append_pair("q", &format!("@{author}"))
            .append_pair("type", "statuses")
            .append_pair("limit", &page_size.to_string())
            .append_pair("offset", &(page * page_size).to_string());

        let results: SearchResults = self
            .get(url, EndpointCategory::Search)
            .await?
            .json()
            .await?;

        let has_more = results.statuses.len() == page_size;
        Ok(SearchPage {
            posts: results
                .statuses
                .into_iter()
                .map(Status::into_api_post)
                .collect(),
            has_more,
        })
    }

    async fn remaining_calls(&self, category: EndpointCategory) -> Result<u32, FetchError> {
        Ok(self
            .quota
            .read()
            .await
            .get(&category)
            .copied()
            .unwrap_or(DEFAULT_QUOTA))
    }
}

/// Strip HTML tags and decode common entities for plain text storage.
pub(crate) fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct Account {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    id: String,
    content: String,
    in_reply_to_id: Option<String>,
}

impl Status {
    fn into_api_post(self) -> ApiPost {
        ApiPost {
            id: self.id,
            text: strip_html(&self.content),
            in_reply_to: self.in_reply_to_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    statuses: Vec<Status>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags() {
        assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn strip_html_decodes_entities() {
        assert_eq!(strip_html("&amp; &lt; &gt;"), "& < >");
    }

    #[test]
    fn strip_html_handles_links() {
        let html = r#"<p>Check <a href="https://example.com">this</a> out</p>"#;
        assert_eq!(strip_html(html), "Check this out");
    }

    #[test]
    fn status_converts_to_api_post() {
        let status = Status {
            id: "42".to_string(),
            content: "<p>hello</p>".to_string(),
            in_reply_to_id: Some("41".to_string()),
        };
        let post = status.into_api_post();
        assert_eq!(post.id, "42");
        assert_eq!(post.text, "hello");
        assert_eq!(post.in_reply_to.as_deref(), Some("41"));
    }

    #[test]
    fn search_results_default_to_empty() {
        let results: SearchResults = serde_json::from_str("{}").unwrap();
        assert!(results.statuses.is_empty());
    }

    #[test]
    fn endpoint_category_names() {
        assert_eq!(EndpointCategory::Timeline.as_str(), "timeline");
        assert_eq!(EndpointCategory::Search.as_str(), "search");
    }

    #[test]
    fn bad_instance_url_is_rejected() {
        assert!(matches!(
            HttpFeedApi::new("not a url"),
            Err(FetchError::BadInstance(_))
        ));
    }
}
