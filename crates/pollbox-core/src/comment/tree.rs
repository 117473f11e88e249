//! Reply tree reconstruction

use super::model::{Comment, CommentNode};
use crate::types::CommentId;
use std::collections::HashMap;
use tracing::debug;

/// Rebuild the reply hierarchy from a flat list of one poll's comments.
///
/// Sibling order follows input order (newest first, as listed by the
/// comment store). Every comment is indexed before any reply is attached,
/// so a reply may come before or after its parent. Replies whose parent is
/// not in the list are dropped, never promoted to roots; so are comments
/// caught in a parent cycle, since no root reaches them.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let len = comments.len();
    let index: HashMap<CommentId, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];
    let mut orphans = 0usize;

    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id {
            None => roots.push(i),
            Some(parent) => match index.get(&parent) {
                Some(&p) => children[p].push(i),
                None => orphans += 1,
            },
        }
    }

    // Pre-order walk from the roots; explicit stack so depth is unbounded.
    let mut order = Vec::with_capacity(len);
    let mut visited = vec![false; len];
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        order.push(i);
        stack.extend(children[i].iter().rev());
    }

    // Children come after their parent in pre-order, so assembling in
    // reverse finishes every reply before the node that owns it.
    let mut pending: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut built: Vec<Option<CommentNode>> = (0..len).map(|_| None).collect();
    for &i in order.iter().rev() {
        let replies = children[i]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(comment) = pending[i].take() {
            built[i] = Some(CommentNode { comment, replies });
        }
    }

    let unreachable = len - order.len();
    if unreachable > 0 {
        debug!(
            "Dropped {} comment(s) from tree ({} with missing parent)",
            unreachable, orphans
        );
    }

    roots.into_iter().filter_map(|r| built[r].take()).collect()
}
