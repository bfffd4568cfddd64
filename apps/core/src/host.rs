use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{BookmarkId, BookmarkNode, GroupId, Tab, TabGroup, TabId};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("host data unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsSnapshot {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub tab_groups: Vec<TabGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarksSnapshot {
    #[serde(default, alias = "bookmarkTreeNodes")]
    pub bookmark_tree: Vec<BookmarkNode>,
}

/// Everything one overlay session reads from the browser, fetched once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub tab_groups: Vec<TabGroup>,
    #[serde(default, alias = "bookmarkTreeNodes")]
    pub bookmark_tree: Vec<BookmarkNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_tab_id: Option<TabId>,
}

impl HostSnapshot {
    pub fn from_json(payload: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn load(path: &Path) -> Result<Self, HostError> {
        let raw = std::fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

/// Browser-side data the finder consumes.
pub trait BrowserHost {
    fn all_tabs(&self) -> Result<TabsSnapshot, HostError>;
    fn all_bookmarks(&self) -> Result<BookmarksSnapshot, HostError>;
    fn current_tab(&self) -> Result<Option<TabId>, HostError>;
}

/// Host over a fixed snapshot, for the CLI, the transport and tests.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHost {
    snapshot: HostSnapshot,
}

impl SnapshotHost {
    pub fn new(snapshot: HostSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn load(path: &Path) -> Result<Self, HostError> {
        HostSnapshot::load(path).map(Self::new)
    }

    pub fn snapshot(&self) -> &HostSnapshot {
        &self.snapshot
    }

    pub fn deterministic_fixture() -> Self {
        Self::new(HostSnapshot {
            tabs: vec![
                Tab::new(1, "Inbox", "https://mail.example.com").with_index(0),
                Tab::new(2, "Rust Documentation", "https://doc.rust-lang.org")
                    .with_index(1)
                    .with_group(10),
                Tab::new(3, "Issue tracker", "https://issues.example.com")
                    .with_index(2)
                    .with_group(11),
            ],
            tab_groups: vec![TabGroup::new(10, "Research"), TabGroup::new(11, "Work")],
            bookmark_tree: vec![BookmarkNode::folder(
                "0",
                "",
                vec![
                    BookmarkNode::folder(
                        "1",
                        "Bookmarks Bar",
                        vec![
                            BookmarkNode::leaf("10", "Docs", "https://docs.example.com"),
                            BookmarkNode::folder(
                                "11",
                                "Work",
                                vec![BookmarkNode::leaf(
                                    "110",
                                    "Tracker",
                                    "https://issues.example.com",
                                )],
                            ),
                        ],
                    ),
                    BookmarkNode::folder("2", "Other Bookmarks", Vec::new()),
                ],
            )],
            current_tab_id: Some(TabId(1)),
        })
    }
}

impl BrowserHost for SnapshotHost {
    fn all_tabs(&self) -> Result<TabsSnapshot, HostError> {
        Ok(TabsSnapshot {
            tabs: self.snapshot.tabs.clone(),
            tab_groups: self.snapshot.tab_groups.clone(),
        })
    }

    fn all_bookmarks(&self) -> Result<BookmarksSnapshot, HostError> {
        Ok(BookmarksSnapshot {
            bookmark_tree: self.snapshot.bookmark_tree.clone(),
        })
    }

    fn current_tab(&self) -> Result<Option<TabId>, HostError> {
        Ok(self.snapshot.current_tab_id)
    }
}

/// Fire-and-forget request for the browser, produced when a row is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    ActivateTab {
        tab_id: TabId,
    },
    GroupTab {
        group_id: Option<GroupId>,
        group_name: Option<String>,
    },
    RemoveTabFromGroup,
    AddBookmark {
        parent_id: BookmarkId,
    },
    RemoveBookmark,
    OpenBookmark {
        url: String,
    },
}
