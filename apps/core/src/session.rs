use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::bookmark_tree::{all_folder_ids, hidden_folder_ids};
use crate::builder::{build_candidates, BuildContext, BuildOptions};
use crate::candidate::Candidate;
use crate::config::Config;
use crate::highlight::Highlighter;
use crate::host::{BrowserHost, HostCommand, HostError, HostSnapshot};
use crate::mode::Mode;
use crate::model::{BookmarkId, EntityId, TabId};
use crate::render::{render_row, Row};
use crate::selection::{reconcile_selection, step, Direction};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("host request failed: {0}")]
    Host(#[from] HostError),
}

/// State of one open overlay: the fetched snapshot, the expand set, the
/// current list and the selection. Dropped when the overlay closes.
#[derive(Debug, Clone)]
pub struct FinderSession {
    mode: Mode,
    snapshot: HostSnapshot,
    previous_tab_id: Option<TabId>,
    options: BuildOptions,
    follow_cursor: bool,
    highlighter: Highlighter,
    expanded_folders: HashSet<BookmarkId>,
    query: String,
    candidates: Vec<Candidate>,
    selected: Option<usize>,
    anchor: Option<EntityId>,
}

impl FinderSession {
    /// Fetches what `mode` needs from the host, once, and builds the
    /// unfiltered list. A failed fetch opens nothing.
    pub fn open(mode: Mode, host: &dyn BrowserHost, cfg: &Config) -> Result<Self, SessionError> {
        let mut snapshot = HostSnapshot::default();
        if mode.uses_bookmarks() {
            snapshot.bookmark_tree = host.all_bookmarks()?.bookmark_tree;
        } else {
            let tabs = host.all_tabs()?;
            snapshot.tabs = tabs.tabs;
            snapshot.tab_groups = tabs.tab_groups;
            snapshot.current_tab_id = host.current_tab()?;
        }
        Ok(Self::from_snapshot(mode, snapshot, cfg))
    }

    pub fn from_snapshot(mode: Mode, snapshot: HostSnapshot, cfg: &Config) -> Self {
        let expanded_folders = match mode {
            Mode::BookmarkOpener if cfg.expand_all_on_open => {
                all_folder_ids(&snapshot.bookmark_tree)
            }
            Mode::BookmarkOpener => hidden_folder_ids(&snapshot.bookmark_tree),
            _ => HashSet::new(),
        };

        info!(
            mode = %mode,
            tabs = snapshot.tabs.len(),
            groups = snapshot.tab_groups.len(),
            bookmark_roots = snapshot.bookmark_tree.len(),
            "finder session opened"
        );

        let mut session = Self {
            mode,
            snapshot,
            previous_tab_id: None,
            options: cfg.build_options(),
            follow_cursor: cfg.selection.follow_cursor,
            highlighter: cfg.highlighter(),
            expanded_folders,
            query: String::new(),
            candidates: Vec::new(),
            selected: None,
            anchor: None,
        };
        session.rebuild();
        session
    }

    pub fn with_previous_tab(mut self, tab_id: Option<TabId>) -> Self {
        self.previous_tab_id = tab_id;
        self.rebuild();
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.and_then(|index| self.candidates.get(index))
    }

    pub fn anchor(&self) -> Option<&EntityId> {
        self.anchor.as_ref()
    }

    pub fn expanded_folders(&self) -> &HashSet<BookmarkId> {
        &self.expanded_folders
    }

    pub fn rows(&self) -> Vec<Row> {
        self.candidates
            .iter()
            .map(|candidate| render_row(candidate, self.mode, &self.highlighter))
            .collect()
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.rebuild();
    }

    pub fn move_selection(&mut self, direction: Direction) {
        let skip_folders = self.mode == Mode::BookmarkOpener;
        self.selected = step(&self.candidates, self.selected, direction, skip_folders);
        if self.follow_cursor {
            self.anchor_on_selection();
        }
    }

    pub fn move_down(&mut self) {
        self.move_selection(Direction::Down);
    }

    pub fn move_up(&mut self) {
        self.move_selection(Direction::Up);
    }

    /// Points the cursor at `index`; out of range is ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.candidates.len() {
            return false;
        }
        self.selected = Some(index);
        if self.follow_cursor {
            self.anchor_on_selection();
        }
        true
    }

    pub fn expand_folder(&mut self, id: &BookmarkId) {
        self.expanded_folders.insert(id.clone());
        self.rebuild();
    }

    pub fn collapse_folder(&mut self, id: &BookmarkId) {
        self.expanded_folders.remove(id);
        self.rebuild();
    }

    /// Right arrow: opens the selected folder and keeps the cursor on it.
    pub fn expand_selected(&mut self) -> bool {
        let Some(id) = self.selected_folder_id() else {
            return false;
        };
        self.anchor = Some(EntityId::Bookmark(id.clone()));
        self.expand_folder(&id);
        true
    }

    /// Left arrow: closes the selected folder and keeps the cursor on it.
    pub fn collapse_selected(&mut self) -> bool {
        let Some(id) = self.selected_folder_id() else {
            return false;
        };
        self.anchor = Some(EntityId::Bookmark(id.clone()));
        self.collapse_folder(&id);
        true
    }

    /// Click on a folder row in the opener.
    pub fn toggle_folder(&mut self, id: &BookmarkId) {
        self.anchor = Some(EntityId::Bookmark(id.clone()));
        if self.expanded_folders.contains(id) {
            self.collapse_folder(id);
        } else {
            self.expand_folder(id);
        }
    }

    /// Acts on the selected row.
    ///
    /// Returns the browser command to send, after which the overlay closes.
    /// `None` means the overlay stays open (nothing selected, or an opener
    /// folder that was toggled instead).
    pub fn confirm(&mut self) -> Option<HostCommand> {
        let Some(selected) = self.selected().cloned() else {
            return self.confirm_without_selection();
        };
        self.anchor = selected.entity_id();

        let command = match selected {
            Candidate::Tab { tab, .. } => match self.mode {
                Mode::Groups => Some(HostCommand::GroupTab {
                    group_id: None,
                    group_name: Some(tab.title),
                }),
                _ => Some(HostCommand::ActivateTab { tab_id: tab.id }),
            },
            Candidate::Group { group, .. } => Some(HostCommand::GroupTab {
                group_id: Some(group.id),
                group_name: None,
            }),
            Candidate::NewGroup { query } => Some(HostCommand::GroupTab {
                group_id: None,
                group_name: Some(query.trim().to_string()),
            }),
            Candidate::RemoveFromGroup => Some(HostCommand::RemoveTabFromGroup),
            Candidate::RemoveBookmark => Some(HostCommand::RemoveBookmark),
            Candidate::BookmarkFolder { folder, .. } => match self.mode {
                Mode::BookmarkOpener => {
                    self.toggle_folder(&folder.id);
                    None
                }
                _ => Some(HostCommand::AddBookmark {
                    parent_id: folder.id,
                }),
            },
            Candidate::BookmarkEntry { bookmark, .. } => bookmark
                .url
                .filter(|url| !url.is_empty())
                .map(|url| HostCommand::OpenBookmark { url }),
        };

        if let Some(command) = &command {
            info!(mode = %self.mode, ?command, "finder confirmed");
        }
        command
    }

    fn confirm_without_selection(&self) -> Option<HostCommand> {
        let name = self.query.trim();
        if self.mode == Mode::Groups && !name.is_empty() {
            return Some(HostCommand::GroupTab {
                group_id: None,
                group_name: Some(name.to_string()),
            });
        }
        None
    }

    fn selected_folder_id(&self) -> Option<BookmarkId> {
        if self.mode != Mode::BookmarkOpener {
            return None;
        }
        match self.selected()? {
            Candidate::BookmarkFolder { folder, .. } => Some(folder.id.clone()),
            _ => None,
        }
    }

    fn anchor_on_selection(&mut self) {
        if let Some(id) = self.selected().and_then(Candidate::entity_id) {
            self.anchor = Some(id);
        }
    }

    fn rebuild(&mut self) {
        let ctx = BuildContext {
            tabs: &self.snapshot.tabs,
            groups: &self.snapshot.tab_groups,
            bookmarks: &self.snapshot.bookmark_tree,
            current_tab_id: self.snapshot.current_tab_id,
            previous_tab_id: self.previous_tab_id,
            expanded_folders: &self.expanded_folders,
            options: self.options,
        };
        self.candidates = build_candidates(&self.query, self.mode, &ctx);
        self.selected = reconcile_selection(&self.candidates, self.anchor.as_ref());
        debug!(
            mode = %self.mode,
            query_len = self.query.chars().count(),
            candidates = self.candidates.len(),
            selected = ?self.selected,
            "finder list rebuilt"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::FinderSession;
    use crate::config::Config;
    use crate::host::{HostCommand, SnapshotHost};
    use crate::mode::Mode;
    use crate::model::{BookmarkId, EntityId, GroupId, TabId};

    #[test]
    fn tab_session_hides_current_tab_and_activates_selection() {
        let host = SnapshotHost::deterministic_fixture();
        let mut session = FinderSession::open(Mode::Tabs, &host, &Config::default()).unwrap();

        assert_eq!(session.candidates().len(), 2);
        assert_eq!(session.selected_index(), Some(0));
        session.move_down();
        assert_eq!(
            session.confirm(),
            Some(HostCommand::ActivateTab { tab_id: TabId(3) })
        );
        assert_eq!(session.anchor(), Some(&EntityId::Tab(TabId(3))));
    }

    #[test]
    fn group_session_creates_group_from_query() {
        let host = SnapshotHost::deterministic_fixture();
        let mut session = FinderSession::open(Mode::Groups, &host, &Config::default()).unwrap();
        session.set_query(" Reading ");

        // no group matches; the first row is the create action
        assert_eq!(
            session.confirm(),
            Some(HostCommand::GroupTab {
                group_id: None,
                group_name: Some("Reading".to_string()),
            })
        );

        session.set_query("work");
        assert_eq!(
            session.confirm(),
            Some(HostCommand::GroupTab {
                group_id: Some(GroupId(11)),
                group_name: None,
            })
        );
    }

    #[test]
    fn opener_expands_everything_on_open() {
        let host = SnapshotHost::deterministic_fixture();
        let session =
            FinderSession::open(Mode::BookmarkOpener, &host, &Config::default()).unwrap();
        // Bookmarks Bar, Docs, Work, Tracker, Other Bookmarks
        assert_eq!(session.candidates().len(), 5);
        assert_eq!(session.expanded_folders().len(), 4);
    }

    #[test]
    fn collapse_keeps_cursor_on_the_folder() {
        let host = SnapshotHost::deterministic_fixture();
        let mut session =
            FinderSession::open(Mode::BookmarkOpener, &host, &Config::default()).unwrap();
        assert_eq!(session.selected_index(), Some(0));

        session.move_down();
        session.move_down();
        // folders are skipped: Docs then Tracker
        assert_eq!(session.selected_index(), Some(3));

        assert!(!session.collapse_selected());
        session.select(2);
        assert!(session.collapse_selected());
        assert_eq!(session.candidates().len(), 4);
        assert_eq!(session.selected_index(), Some(2));
        assert_eq!(
            session.anchor(),
            Some(&EntityId::Bookmark(BookmarkId::new("11")))
        );

        assert!(session.expand_selected());
        assert_eq!(session.candidates().len(), 5);
        assert_eq!(session.selected_index(), Some(2));
    }

    #[test]
    fn folder_finder_files_into_selected_folder() {
        let host = SnapshotHost::deterministic_fixture();
        let mut session =
            FinderSession::open(Mode::BookmarkFolders, &host, &Config::default()).unwrap();
        session.set_query("work");
        assert_eq!(
            session.confirm(),
            Some(HostCommand::AddBookmark {
                parent_id: BookmarkId::new("11"),
            })
        );

        session.set_query("zzzz");
        assert_eq!(session.confirm(), Some(HostCommand::RemoveBookmark));
    }
}
