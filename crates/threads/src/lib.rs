//! フラットなコメント一覧からスレッド（ルート + 1 階層の返信）を組み立てる

use feed_core::{Comment, CommentNode, RawComment, SortOrder};
use std::collections::HashMap;

/// Converts raw comment records. Records without an id cannot be threaded
/// and are skipped.
pub fn comments_from_raw(raw: &[RawComment]) -> Vec<Comment> {
    raw.iter()
        .filter_map(|record| {
            let comment = Comment::from_raw(record);
            if comment.is_none() {
                tracing::warn!("Skipping comment record without an id");
            }
            comment
        })
        .collect()
}

/// Builds the comment forest and sorts the roots.
///
/// - A comment whose parent does not resolve (absent or unknown id) becomes a
///   root, as does every member of a parent cycle.
/// - Replies are attached under their root-level ancestor in arrival order, so
///   the forest is never deeper than one level. `parent_id` is kept on each
///   reply for "replying to" display.
/// - Duplicate ids: the lookup keeps the last occurrence, so replies attach
///   to it. Every input comment still appears exactly once.
pub fn build_thread(comments: Vec<Comment>, sort_by: SortOrder) -> Vec<CommentNode> {
    let lookup: HashMap<i64, usize> = comments
        .iter()
        .enumerate()
        .map(|(index, comment)| (comment.id, index))
        .collect();

    let root_of = resolve_roots(&comments, &lookup);

    // Slot per input index that is a root; replies are buffered until all
    // roots are known so forward references resolve too.
    let mut root_slots: HashMap<usize, usize> = HashMap::new();
    let mut roots: Vec<CommentNode> = Vec::new();
    let mut replies: Vec<(usize, Comment)> = Vec::new();

    for (index, comment) in comments.into_iter().enumerate() {
        match root_of[index] {
            None => {
                root_slots.insert(index, roots.len());
                roots.push(CommentNode::new(comment));
            }
            Some(root_index) => replies.push((root_index, comment)),
        }
    }

    for (root_index, comment) in replies {
        match root_slots.get(&root_index) {
            Some(&slot) => roots[slot].replies.push(CommentNode::new(comment)),
            // resolve_roots only ever points at indexes that are roots themselves
            None => roots.push(CommentNode::new(comment)),
        }
    }

    sort_roots(&mut roots, sort_by);
    roots
}

/// Root-level ancestor of every comment; `None` means the comment is itself a
/// root. Each comment is walked once: a walk stops at the first comment whose
/// root is already known.
///
/// Members of a parent cycle (including a self-reference) become roots, and
/// comments leading into the cycle attach to the member they reach first.
fn resolve_roots(comments: &[Comment], lookup: &HashMap<i64, usize>) -> Vec<Option<usize>> {
    let parent_of: Vec<Option<usize>> = comments
        .iter()
        .map(|comment| comment.parent_id.and_then(|parent_id| lookup.get(&parent_id).copied()))
        .collect();

    // Outer None: not resolved yet. Inner None: is a root.
    let mut resolved: Vec<Option<Option<usize>>> = vec![None; comments.len()];
    // Position of an index in the current walk.
    let mut on_path: Vec<Option<usize>> = vec![None; comments.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..comments.len() {
        if resolved[start].is_some() {
            continue;
        }

        path.clear();
        let mut current = start;
        let (root, attached) = loop {
            if let Some(known) = resolved[current] {
                break (known.unwrap_or(current), path.len());
            }

            on_path[current] = Some(path.len());
            path.push(current);

            match parent_of[current] {
                None => {
                    resolved[current] = Some(None);
                    break (current, path.len() - 1);
                }
                Some(parent) => match on_path[parent] {
                    Some(cycle_start) => {
                        for &member in &path[cycle_start..] {
                            resolved[member] = Some(None);
                        }
                        break (parent, cycle_start);
                    }
                    None => current = parent,
                },
            }
        };

        for &index in &path[..attached] {
            resolved[index] = Some(Some(root));
        }
        for &index in &path {
            on_path[index] = None;
        }
    }

    resolved.into_iter().map(Option::flatten).collect()
}

/// ルートのみを並べ替える（安定ソート、返信は到着順のまま）
pub fn sort_roots(roots: &mut [CommentNode], sort_by: SortOrder) {
    match sort_by {
        SortOrder::Newest => {
            roots.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
        }
        SortOrder::MostLiked => {
            roots.sort_by(|a, b| b.comment.like_count.cmp(&a.comment.like_count));
        }
    }
}

/// 木構造から辿れるコメントの総数（ルート + 直下の返信）
pub fn thread_size(roots: &[CommentNode]) -> usize {
    roots.iter().map(|root| 1 + root.replies.len()).sum()
}
