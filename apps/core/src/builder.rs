use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::bookmark_tree::{self, FlattenScope};
use crate::candidate::{Candidate, Match, MatchField};
use crate::matcher::MatcherKind;
use crate::mode::Mode;
use crate::model::{BookmarkId, BookmarkNode, GroupId, Tab, TabGroup, TabId};

/// Order of the tab list. Applied the same way with and without a query so
/// the selection does not jump between keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabOrder {
    /// Position in the window, ties keep host order.
    #[default]
    WindowIndex,
    /// Whatever order the host delivered.
    Host,
    /// Most recently accessed first.
    Recency,
}

impl TabOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "window_index" | "index" => Some(Self::WindowIndex),
            "host" => Some(Self::Host),
            "recency" | "recent" => Some(Self::Recency),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub matcher: MatcherKind,
    pub tab_order: TabOrder,
    pub pin_previous_tab: bool,
}

/// Everything a rebuild reads. Borrowed from the session snapshot.
pub struct BuildContext<'a> {
    pub tabs: &'a [Tab],
    pub groups: &'a [TabGroup],
    pub bookmarks: &'a [BookmarkNode],
    pub current_tab_id: Option<TabId>,
    pub previous_tab_id: Option<TabId>,
    pub expanded_folders: &'a HashSet<BookmarkId>,
    pub options: BuildOptions,
}

pub fn build_candidates(query: &str, mode: Mode, ctx: &BuildContext<'_>) -> Vec<Candidate> {
    match mode {
        Mode::Tabs => tab_candidates(query, ctx),
        Mode::Groups => group_candidates(query, ctx),
        Mode::BookmarkFolders => {
            let mut out = bookmark_tree::folder_list(ctx.bookmarks, query, ctx.options.matcher);
            out.push(Candidate::RemoveBookmark);
            out
        }
        Mode::BookmarkOpener => {
            let scope = FlattenScope {
                query,
                expanded: ctx.expanded_folders,
                matcher: ctx.options.matcher,
            };
            bookmark_tree::flatten(ctx.bookmarks, &scope, 0, "")
        }
    }
}

fn tab_candidates(query: &str, ctx: &BuildContext<'_>) -> Vec<Candidate> {
    let matcher = ctx.options.matcher;
    let group_titles: HashMap<GroupId, &str> = ctx
        .groups
        .iter()
        .map(|group| (group.id, group.title.as_str()))
        .collect();

    let mut tabs: Vec<&Tab> = ctx
        .tabs
        .iter()
        .filter(|tab| Some(tab.id) != ctx.current_tab_id)
        .collect();
    sort_tabs(&mut tabs, ctx.options.tab_order);

    let mut out: Vec<Candidate> = tabs
        .into_iter()
        .filter_map(|tab| {
            let group_title = tab
                .group_id
                .and_then(|id| group_titles.get(&id).copied())
                .unwrap_or("");

            let found = if query.is_empty() {
                None
            } else {
                let hit = matcher
                    .matches(query, &tab.title)
                    .map(|indices| Match::new(MatchField::Title, indices))
                    .or_else(|| {
                        matcher
                            .matches(query, &tab.url)
                            .map(|indices| Match::new(MatchField::Url, indices))
                    })
                    .or_else(|| {
                        matcher
                            .matches(query, group_title)
                            .map(|indices| Match::new(MatchField::Group, indices))
                    });
                Some(hit?)
            };

            Some(Candidate::Tab {
                tab: tab.clone(),
                group_title: (!group_title.is_empty()).then(|| group_title.to_string()),
                found,
            })
        })
        .collect();

    if ctx.options.pin_previous_tab {
        if let Some(previous) = ctx.previous_tab_id {
            pin_to_front(&mut out, previous);
        }
    }

    out
}

fn sort_tabs(tabs: &mut [&Tab], order: TabOrder) {
    match order {
        TabOrder::Host => {}
        TabOrder::WindowIndex => tabs.sort_by_key(|tab| tab.index),
        TabOrder::Recency => tabs.sort_by(|a, b| {
            b.last_accessed
                .partial_cmp(&a.last_accessed)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

fn pin_to_front(items: &mut Vec<Candidate>, tab_id: TabId) {
    let position = items
        .iter()
        .position(|item| matches!(item, Candidate::Tab { tab, .. } if tab.id == tab_id));
    if let Some(position) = position {
        let pinned = items.remove(position);
        items.insert(0, pinned);
    }
}

fn group_candidates(query: &str, ctx: &BuildContext<'_>) -> Vec<Candidate> {
    let matcher = ctx.options.matcher;
    let mut groups: Vec<(&TabGroup, Option<Match>)> = ctx
        .groups
        .iter()
        .filter_map(|group| {
            if query.is_empty() {
                return Some((group, None));
            }
            matcher
                .matches(query, &group.title)
                .map(|indices| (group, Some(Match::new(MatchField::Title, indices))))
        })
        .collect();

    groups.sort_by(|(a, _), (b, _)| compare_titles(&a.title, &b.title));

    let mut out: Vec<Candidate> = groups
        .into_iter()
        .map(|(group, found)| Candidate::Group {
            group: group.clone(),
            found,
        })
        .collect();
    out.push(Candidate::NewGroup {
        query: query.to_string(),
    });
    out.push(Candidate::RemoveFromGroup);
    out
}

// Close to a locale compare for titles: case folds first, exact text breaks ties.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
