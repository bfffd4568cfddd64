use std::collections::HashSet;

use crate::candidate::{Candidate, Match, MatchField};
use crate::matcher::MatcherKind;
use crate::model::{bookmark_path, BookmarkId, BookmarkKind, BookmarkNode};

/// Inputs shared by every level of one flatten pass.
pub struct FlattenScope<'a> {
    pub query: &'a str,
    pub expanded: &'a HashSet<BookmarkId>,
    pub matcher: MatcherKind,
}

impl FlattenScope<'_> {
    fn filtering(&self) -> bool {
        !self.query.is_empty()
    }

    fn try_match(&self, field: MatchField, text: &str) -> Option<Match> {
        if !self.filtering() {
            return None;
        }
        self.matcher
            .matches(self.query, text)
            .map(|indices| Match::new(field, indices))
    }
}

/// Display list for the bookmark opener.
///
/// Under a query a folder opens by itself when its subtree holds a matching
/// bookmark or when its own title or path matches. Without a query only the
/// folders in `scope.expanded` open. Untitled folders are never listed but
/// their children still are, one level deeper.
pub fn flatten(
    nodes: &[BookmarkNode],
    scope: &FlattenScope<'_>,
    level: usize,
    parent_path: &str,
) -> Vec<Candidate> {
    let mut out = Vec::new();

    for node in nodes {
        let path = bookmark_path(parent_path, &node.title);
        match node.kind() {
            BookmarkKind::Leaf { url } => {
                let found = scope
                    .try_match(MatchField::Title, &node.title)
                    .or_else(|| scope.try_match(MatchField::Url, url))
                    .or_else(|| scope.try_match(MatchField::Path, &path));
                if scope.filtering() && found.is_none() {
                    continue;
                }
                out.push(Candidate::BookmarkEntry {
                    bookmark: node.clone(),
                    level,
                    path,
                    found,
                });
            }
            BookmarkKind::Folder { children } => {
                let found = scope
                    .try_match(MatchField::Title, &node.title)
                    .or_else(|| scope.try_match(MatchField::Path, &path));
                let nested = flatten(children, scope, level + 1, &path);

                let should_expand = if scope.filtering() {
                    found.is_some()
                        || nested
                            .iter()
                            .any(|item| matches!(item, Candidate::BookmarkEntry { .. }))
                } else {
                    scope.expanded.contains(&node.id)
                };

                if node.has_visible_title() {
                    out.push(Candidate::BookmarkFolder {
                        folder: without_children(node),
                        level,
                        path,
                        is_expanded: should_expand,
                        found,
                    });
                }
                if should_expand {
                    out.extend(nested);
                }
            }
            BookmarkKind::Empty => {}
        }
    }

    out
}

/// Titled folders in pre-order, for filing the current page into one.
pub fn folder_list(
    nodes: &[BookmarkNode],
    query: &str,
    matcher: MatcherKind,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    collect_folders(nodes, query, matcher, 0, "", &mut out);
    out
}

fn collect_folders(
    nodes: &[BookmarkNode],
    query: &str,
    matcher: MatcherKind,
    level: usize,
    parent_path: &str,
    out: &mut Vec<Candidate>,
) {
    for node in nodes {
        let BookmarkKind::Folder { children } = node.kind() else {
            continue;
        };
        let path = bookmark_path(parent_path, &node.title);

        if node.has_visible_title() {
            let found = if query.is_empty() {
                None
            } else {
                matcher
                    .matches(query, &node.title)
                    .map(|indices| Match::new(MatchField::Title, indices))
            };
            if query.is_empty() || found.is_some() {
                out.push(Candidate::BookmarkFolder {
                    folder: without_children(node),
                    level,
                    path: path.clone(),
                    is_expanded: false,
                    found,
                });
            }
        }

        collect_folders(children, query, matcher, level + 1, &path, out);
    }
}

pub fn all_folder_ids(nodes: &[BookmarkNode]) -> HashSet<BookmarkId> {
    folder_ids_where(nodes, |_| true)
}

/// Untitled folders never get a row, so nothing could ever open them.
pub fn hidden_folder_ids(nodes: &[BookmarkNode]) -> HashSet<BookmarkId> {
    folder_ids_where(nodes, |node| !node.has_visible_title())
}

fn folder_ids_where(
    nodes: &[BookmarkNode],
    keep: impl Fn(&BookmarkNode) -> bool,
) -> HashSet<BookmarkId> {
    let mut ids = HashSet::new();
    let mut stack: Vec<&BookmarkNode> = nodes.iter().collect();
    while let Some(node) = stack.pop() {
        if let BookmarkKind::Folder { children } = node.kind() {
            if keep(node) {
                ids.insert(node.id.clone());
            }
            stack.extend(children.iter());
        }
    }
    ids
}

// Folder rows are snapshots of the node itself; the subtree is already flattened.
fn without_children(node: &BookmarkNode) -> BookmarkNode {
    BookmarkNode {
        id: node.id.clone(),
        title: node.title.clone(),
        url: None,
        children: Some(Vec::new()),
    }
}
