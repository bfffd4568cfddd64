use serde::{Deserialize, Serialize};

use crate::model::{BookmarkNode, EntityId, Tab, TabGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Title,
    Url,
    Group,
    Path,
}

/// Which field accepted the query and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub field: MatchField,
    pub indices: Vec<usize>,
}

impl Match {
    pub fn new(field: MatchField, indices: Vec<usize>) -> Self {
        Self { field, indices }
    }

    /// Indices for `field`, or none when another field carried the match.
    pub fn indices_for(found: Option<&Match>, field: MatchField) -> &[usize] {
        match found {
            Some(m) if m.field == field => &m.indices,
            _ => &[],
        }
    }
}

/// One selectable row of the finder, built fresh for every query.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Tab {
        tab: Tab,
        group_title: Option<String>,
        found: Option<Match>,
    },
    Group {
        group: TabGroup,
        found: Option<Match>,
    },
    BookmarkFolder {
        folder: BookmarkNode,
        level: usize,
        path: String,
        is_expanded: bool,
        found: Option<Match>,
    },
    BookmarkEntry {
        bookmark: BookmarkNode,
        level: usize,
        path: String,
        found: Option<Match>,
    },
    NewGroup {
        query: String,
    },
    RemoveFromGroup,
    RemoveBookmark,
}

impl Candidate {
    /// Identity used to keep the selection on the same tab or bookmark node.
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Self::Tab { tab, .. } => Some(EntityId::Tab(tab.id)),
            Self::BookmarkFolder { folder, .. } => Some(EntityId::Bookmark(folder.id.clone())),
            Self::BookmarkEntry { bookmark, .. } => Some(EntityId::Bookmark(bookmark.id.clone())),
            Self::Group { .. }
            | Self::NewGroup { .. }
            | Self::RemoveFromGroup
            | Self::RemoveBookmark => None,
        }
    }

    pub fn found(&self) -> Option<&Match> {
        match self {
            Self::Tab { found, .. }
            | Self::Group { found, .. }
            | Self::BookmarkFolder { found, .. }
            | Self::BookmarkEntry { found, .. } => found.as_ref(),
            Self::NewGroup { .. } | Self::RemoveFromGroup | Self::RemoveBookmark => None,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::BookmarkFolder { .. })
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            Self::NewGroup { .. } | Self::RemoveFromGroup | Self::RemoveBookmark
        )
    }
}
