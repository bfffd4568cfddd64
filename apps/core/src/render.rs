use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, Match, MatchField};
use crate::highlight::Highlighter;
use crate::mode::Mode;
use crate::model::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Tab,
    Group,
    BookmarkFolder,
    BookmarkEntry,
    NewGroup,
    RemoveFromGroup,
    RemoveBookmark,
}

/// Display-ready row for the overlay shell. Marked text uses the configured
/// highlight markers; with `escape_html` on (the default) every text field
/// is HTML-safe apart from those markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub kind: RowKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityId>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub level: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Row {
    fn action(kind: RowKind, label: String) -> Self {
        Self {
            kind,
            entity: None,
            label,
            detail: None,
            note: None,
            level: 0,
            expanded: None,
            icon_url: None,
        }
    }
}

pub fn render_row(candidate: &Candidate, mode: Mode, marker: &Highlighter) -> Row {
    let found = candidate.found();
    let mark = |field: MatchField, text: &str| {
        marker.render(text, Match::indices_for(found, field))
    };

    match candidate {
        Candidate::Tab {
            tab, group_title, ..
        } => Row {
            kind: RowKind::Tab,
            entity: candidate.entity_id(),
            label: mark(MatchField::Title, &tab.title),
            detail: Some(mark(MatchField::Url, &tab.url)),
            note: group_title
                .as_deref()
                .map(|title| format!("Group: {}", mark(MatchField::Group, title))),
            level: 0,
            expanded: None,
            icon_url: tab.fav_icon_url.clone(),
        },
        Candidate::Group { group, .. } => Row::action(
            RowKind::Group,
            format!("Group: {}", mark(MatchField::Title, &group.title)),
        ),
        Candidate::BookmarkFolder {
            folder,
            level,
            path,
            is_expanded,
            ..
        } => {
            let arrow = if *is_expanded { "▼" } else { "►" };
            // the path line only helps where nested folders are browsed
            let detail = (mode == Mode::BookmarkOpener && *level > 0)
                .then(|| mark(MatchField::Path, path));
            Row {
                kind: RowKind::BookmarkFolder,
                entity: candidate.entity_id(),
                label: format!("{arrow} {}", mark(MatchField::Title, &folder.title)),
                detail,
                note: None,
                level: *level,
                expanded: Some(*is_expanded),
                icon_url: None,
            }
        }
        Candidate::BookmarkEntry {
            bookmark,
            level,
            path,
            ..
        } => Row {
            kind: RowKind::BookmarkEntry,
            entity: candidate.entity_id(),
            label: mark(MatchField::Title, &bookmark.title),
            detail: Some(mark(MatchField::Url, bookmark.url.as_deref().unwrap_or_default())),
            note: Some(mark(MatchField::Path, path)),
            level: *level,
            expanded: None,
            icon_url: None,
        },
        Candidate::NewGroup { query } => {
            let label = format!("Create new group: \"{}\"", marker.plain(query));
            Row::action(RowKind::NewGroup, label)
        }
        Candidate::RemoveFromGroup => {
            Row::action(RowKind::RemoveFromGroup, "Remove from group".to_string())
        }
        Candidate::RemoveBookmark => {
            Row::action(RowKind::RemoveBookmark, "Remove from bookmarks".to_string())
        }
    }
}
