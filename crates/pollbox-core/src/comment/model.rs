//! Comment data models

use crate::types::{CommentId, PollId, UserId};
use chrono::{DateTime, Utc};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

/// Deepest reply level a serialized `CommentNode` may carry.
///
/// Each level adds an array and an object to the output, so this keeps a
/// rendered thread inside the 128-level nesting limit of `serde_json` readers.
pub const MAX_SERIALIZED_DEPTH: usize = 50;

/// A comment on a poll, optionally replying to another comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Poll the comment belongs to
    pub poll_id: PollId,
    /// Author
    pub user_id: UserId,
    /// Comment content
    pub content: String,
    /// Comment replied to; `None` for a root comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment
    pub fn new(
        poll_id: PollId,
        user_id: UserId,
        content: impl Into<String>,
        parent_id: Option<CommentId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CommentId::new(),
            poll_id,
            user_id,
            content: content.into(),
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the content and refresh updated_at
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Check if this is a top-level comment
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A comment with its nested replies, as rendered for a poll
///
/// Serializes as the comment's fields plus a `replies` array, which is left
/// out when empty. Threads nested deeper than [`MAX_SERIALIZED_DEPTH`] fail
/// to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Wrap a comment without replies
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    /// Number of comments in this subtree, including this one
    pub fn total_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.replies.iter());
        }
        count
    }

    /// Deepest reply level below this node; a leaf has depth 0
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.replies.iter().map(|r| (r, depth + 1)));
        }
        deepest
    }
}

// Reply chains can be arbitrarily long; unlink them here instead of
// letting the derived drop recurse once per level.
impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.replies);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.replies);
        }
    }
}

impl Serialize for CommentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        NodeView::new(self, 0).serialize(serializer)
    }
}

#[derive(Serialize)]
struct NodeView<'a> {
    #[serde(flatten)]
    comment: &'a Comment,
    #[serde(skip_serializing_if = "Replies::is_empty")]
    replies: Replies<'a>,
}

impl<'a> NodeView<'a> {
    fn new(node: &'a CommentNode, depth: usize) -> Self {
        Self {
            comment: &node.comment,
            replies: Replies {
                nodes: &node.replies,
                depth: depth + 1,
            },
        }
    }
}

struct Replies<'a> {
    nodes: &'a [CommentNode],
    depth: usize,
}

impl Replies<'_> {
    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Serialize for Replies<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.depth > MAX_SERIALIZED_DEPTH {
            return Err(S::Error::custom(format!(
                "comment thread is nested deeper than {} levels",
                MAX_SERIALIZED_DEPTH
            )));
        }
        serializer.collect_seq(self.nodes.iter().map(|n| NodeView::new(n, self.depth)))
    }
}

/// How deleting a comment treats replies below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadePolicy {
    /// Delete only direct replies; deeper replies stay stored but unrendered
    #[default]
    #[serde(rename = "direct")]
    DirectReplies,
    /// Delete the whole reply subtree
    Recursive,
}

/// Input for posting a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub user_id: UserId,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    /// Create a root comment input
    pub fn new(user_id: UserId, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            parent_id: None,
        }
    }

    /// Make this a reply
    pub fn reply_to(mut self, parent_id: CommentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_update() {
        let mut comment = Comment::new(PollId::new(), UserId::new(), "first", None);
        let old_updated = comment.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        comment.update_content("edited");
        assert_eq!(comment.content, "edited");
        assert!(comment.updated_at > old_updated);
        assert!(comment.is_root());
    }

    #[test]
    fn test_node_serialization_omits_empty_replies() {
        let comment = Comment::new(PollId::new(), UserId::new(), "hello", None);
        let json = serde_json::to_value(CommentNode::leaf(comment)).unwrap();
        assert_eq!(json["content"], "hello");
        assert!(json.get("replies").is_none());
        assert!(json.get("parent_id").is_none());
    }

    fn chain(len: usize) -> CommentNode {
        let poll = PollId::new();
        let user = UserId::new();
        let mut node = CommentNode::leaf(Comment::new(poll, user, format!("level {}", len - 1), None));
        for level in (0..len - 1).rev() {
            let mut parent = CommentNode::leaf(Comment::new(poll, user, format!("level {}", level), None));
            node.comment.parent_id = Some(parent.comment.id);
            parent.replies.push(node);
            node = parent;
        }
        node
    }

    #[test]
    fn test_node_serialization_nests_replies() {
        let poll = PollId::new();
        let user = UserId::new();
        let root = Comment::new(poll, user, "root", None);
        let reply = Comment::new(poll, user, "reply", Some(root.id));
        let mut node = CommentNode::leaf(root);
        node.replies.push(CommentNode::leaf(reply));

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["content"], "root");
        assert_eq!(json["replies"][0]["content"], "reply");
        assert!(json["replies"][0].get("replies").is_none());
    }

    #[test]
    fn test_depth() {
        assert_eq!(chain(1).depth(), 0);
        assert_eq!(chain(4).depth(), 3);
    }

    #[test]
    fn test_deepest_serializable_thread_reads_back() {
        let node = chain(MAX_SERIALIZED_DEPTH + 1);
        assert_eq!(node.depth(), MAX_SERIALIZED_DEPTH);

        let json = serde_json::to_string(&vec![node]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["content"], "level 0");
    }

    #[test]
    fn test_too_deep_thread_fails_to_serialize() {
        let node = chain(MAX_SERIALIZED_DEPTH + 2);
        let err = serde_json::to_string(&node).unwrap_err();
        assert!(err.to_string().contains("nested deeper than"));

        let node = chain(100_000);
        assert!(serde_json::to_string(&node).is_err());
    }

    #[test]
    fn test_drop_long_chain() {
        let node = chain(200_000);
        assert_eq!(node.total_count(), 200_000);
        drop(node);
    }

    #[test]
    fn test_cascade_policy_serde() {
        assert_eq!(
            serde_json::to_string(&CascadePolicy::DirectReplies).unwrap(),
            "\"direct\""
        );
        assert_eq!(
            serde_json::from_str::<CascadePolicy>("\"recursive\"").unwrap(),
            CascadePolicy::Recursive
        );
    }
}
