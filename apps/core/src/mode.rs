use serde::{Deserialize, Serialize};

pub const CMD_TABS: &str = "toggle-fuzzy-finder";
pub const CMD_GROUPS: &str = "toggle-group-finder";
pub const CMD_BOOKMARK_FOLDERS: &str = "toggle-bookmark-finder";
pub const CMD_BOOKMARK_OPENER: &str = "toggle-bookmark-opener";

/// The active search domain of an overlay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Tabs,
    Groups,
    BookmarkFolders,
    BookmarkOpener,
}

impl Mode {
    pub fn parse(command: &str) -> Option<Self> {
        match command.trim() {
            CMD_TABS => Some(Self::Tabs),
            CMD_GROUPS => Some(Self::Groups),
            CMD_BOOKMARK_FOLDERS => Some(Self::BookmarkFolders),
            CMD_BOOKMARK_OPENER => Some(Self::BookmarkOpener),
            _ => None,
        }
    }

    /// Unknown or missing commands open the tab finder.
    pub fn from_command(command: Option<&str>) -> Self {
        command.and_then(Self::parse).unwrap_or_default()
    }

    pub fn command(self) -> &'static str {
        match self {
            Self::Tabs => CMD_TABS,
            Self::Groups => CMD_GROUPS,
            Self::BookmarkFolders => CMD_BOOKMARK_FOLDERS,
            Self::BookmarkOpener => CMD_BOOKMARK_OPENER,
        }
    }

    pub fn uses_bookmarks(self) -> bool {
        matches!(self, Self::BookmarkFolders | Self::BookmarkOpener)
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Tabs => "search tabs...",
            Self::Groups => "search tab groups or create new...",
            Self::BookmarkFolders => "search bookmark folders...",
            Self::BookmarkOpener => "search bookmarks...",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Self::Tabs => "No matching tabs found.",
            Self::Groups => "No matching tabs or groups found.",
            Self::BookmarkFolders => "No matching bookmark folders found.",
            Self::BookmarkOpener => "No matching bookmarks found.",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}
