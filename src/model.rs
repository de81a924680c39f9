//! Core data model: posts, tracked authors, and the per-run collection.
//!
//! These are plain value types. The fetch layer builds them, the snapshot
//! layer serializes them, and the aggregation layer reads them — nothing
//! here talks to the network or the filesystem.

use serde::{Deserialize, Serialize};

/// Built-in tracked-author set, used when no config file overrides it.
pub const DEFAULT_AUTHORS: &[&str] = &["BarackObama", "AOC"];

/// One original post from a tracked author, with the reply texts
/// gathered for it.
///
/// Serde field names match the snapshot file format
/// (`username` / `tweet` / `replies`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "username")]
    pub author: String,
    #[serde(rename = "tweet")]
    pub text: String,
    #[serde(default)]
    pub replies: Vec<String>,
}

impl Post {
    /// Create a post with no replies yet.
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            replies: Vec::new(),
        }
    }

    /// Append a reply text. Replies keep fetch order.
    pub fn push_reply(&mut self, reply: impl Into<String>) {
        self.replies.push(reply.into());
    }

    /// Label used to key aggregation results and report rows.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}: {}", self.author, self.text)
    }
}

/// Ordered, immutable set of author handles to poll.
///
/// Duplicates are dropped on construction; first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedAuthorSet {
    handles: Vec<String>,
}

impl TrackedAuthorSet {
    /// Build from a list of handles, deduplicating while preserving order.
    pub fn new<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for handle in handles {
            let handle = handle.into();
            if !handle.is_empty() && !deduped.contains(&handle) {
                deduped.push(handle);
            }
        }
        Self { handles: deduped }
    }

    /// The built-in default set.
    #[must_use]
    pub fn default_set() -> Self {
        Self::new(DEFAULT_AUTHORS.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// All posts gathered (or loaded) for one pipeline run.
///
/// Posts are stored flat in fetch order, which groups them by author
/// since authors are fetched one at a time. The snapshot format is a
/// flat array as well, so save/load preserves order exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, post: Post) {
        self.posts.push(post);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Total reply count across all posts.
    #[must_use]
    pub fn reply_count(&self) -> usize {
        self.posts.iter().map(|p| p.replies.len()).sum()
    }

    /// Authors present in the collection, in first-seen order.
    #[must_use]
    pub fn authors(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for post in &self.posts {
            if !seen.contains(&post.author.as_str()) {
                seen.push(&post.author);
            }
        }
        seen
    }

    /// Posts by a single author, in collection order.
    pub fn posts_for<'a>(&'a self, author: &'a str) -> impl Iterator<Item = &'a Post> {
        self.posts.iter().filter(move |p| p.author == author)
    }
}

impl FromIterator<Post> for PostCollection {
    fn from_iter<T: IntoIterator<Item = Post>>(iter: T) -> Self {
        Self {
            posts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_label_joins_author_and_text() {
        let post = Post::new("alice", "hello world");
        assert_eq!(post.label(), "alice: hello world");
    }

    #[test]
    fn push_reply_preserves_order() {
        let mut post = Post::new("alice", "hello");
        post.push_reply("first");
        post.push_reply("second");
        assert_eq!(post.replies, vec!["first", "second"]);
    }

    #[test]
    fn tracked_authors_dedup_preserves_order() {
        let set = TrackedAuthorSet::new(["a", "b", "a", "c"]);
        let handles: Vec<&str> = set.iter().collect();
        assert_eq!(handles, vec!["a", "b", "c"]);
    }

    #[test]
    fn tracked_authors_skip_empty_handles() {
        let set = TrackedAuthorSet::new(["a", "", "b"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn default_set_matches_builtin_list() {
        let set = TrackedAuthorSet::default_set();
        let handles: Vec<&str> = set.iter().collect();
        assert_eq!(handles, DEFAULT_AUTHORS);
    }

    #[test]
    fn collection_authors_are_first_seen_order() {
        let mut collection = PostCollection::new();
        collection.push(Post::new("bob", "one"));
        collection.push(Post::new("alice", "two"));
        collection.push(Post::new("bob", "three"));
        assert_eq!(collection.authors(), vec!["bob", "alice"]);
    }

    #[test]
    fn posts_for_filters_by_author() {
        let mut collection = PostCollection::new();
        collection.push(Post::new("bob", "one"));
        collection.push(Post::new("alice", "two"));
        collection.push(Post::new("bob", "three"));

        let texts: Vec<&str> = collection
            .posts_for("bob")
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(texts, vec!["one", "three"]);
    }

    #[test]
    fn reply_count_sums_all_posts() {
        let mut a = Post::new("alice", "one");
        a.push_reply("r1");
        a.push_reply("r2");
        let b = Post::new("bob", "two");

        let collection: PostCollection = [a, b].into_iter().collect();
        assert_eq!(collection.reply_count(), 2);
    }

    #[test]
    fn post_serde_uses_snapshot_field_names() {
        let mut post = Post::new("alice", "hello");
        post.push_reply("hi");

        let json = serde_json::to_string(&post).unwrap();
        assert!(json.contains("\"username\":\"alice\""));
        assert!(json.contains("\"tweet\":\"hello\""));
        assert!(json.contains("\"replies\":[\"hi\"]"));
    }
}
