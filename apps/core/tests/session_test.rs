use tabhop_core::config::Config;
use tabhop_core::host::{
    BookmarksSnapshot, BrowserHost, HostCommand, HostError, SnapshotHost, TabsSnapshot,
};
use tabhop_core::mode::Mode;
use tabhop_core::model::{BookmarkId, EntityId, TabId};
use tabhop_core::session::{FinderSession, SessionError};

struct OfflineHost;

impl BrowserHost for OfflineHost {
    fn all_tabs(&self) -> Result<TabsSnapshot, HostError> {
        Err(HostError::Unavailable("tabs".into()))
    }

    fn all_bookmarks(&self) -> Result<BookmarksSnapshot, HostError> {
        Err(HostError::Unavailable("bookmarks".into()))
    }

    fn current_tab(&self) -> Result<Option<TabId>, HostError> {
        Ok(None)
    }
}

#[test]
fn failed_fetch_opens_no_session() {
    let result = FinderSession::open(Mode::Tabs, &OfflineHost, &Config::default());
    assert!(matches!(result, Err(SessionError::Host(_))));
}

#[test]
fn selection_survives_typing_after_confirmed_anchor() {
    let host = SnapshotHost::deterministic_fixture();
    let cfg = Config {
        selection: tabhop_core::config::SelectionConfig {
            follow_cursor: true,
        },
        ..Config::default()
    };
    let mut session = FinderSession::open(Mode::Tabs, &host, &cfg).unwrap();

    session.move_down();
    assert_eq!(session.anchor(), Some(&EntityId::Tab(TabId(3))));

    session.set_query("i");
    let selected = session.selected().and_then(|item| item.entity_id());
    assert_eq!(selected, Some(EntityId::Tab(TabId(3))));
}

#[test]
fn without_follow_cursor_typing_resets_to_first_row() {
    let host = SnapshotHost::deterministic_fixture();
    let mut session = FinderSession::open(Mode::Tabs, &host, &Config::default()).unwrap();

    session.move_down();
    assert_eq!(session.anchor(), None);
    session.set_query("");
    assert_eq!(session.selected_index(), Some(0));
}

#[test]
fn previous_tab_is_pinned_when_enabled() {
    let host = SnapshotHost::deterministic_fixture();
    let cfg = Config {
        pin_previous_tab: true,
        ..Config::default()
    };
    let session = FinderSession::open(Mode::Tabs, &host, &cfg)
        .unwrap()
        .with_previous_tab(Some(TabId(3)));

    let first = session.candidates().first().and_then(|item| item.entity_id());
    assert_eq!(first, Some(EntityId::Tab(TabId(3))));
}

#[test]
fn confirming_opener_folder_toggles_instead_of_closing() {
    let host = SnapshotHost::deterministic_fixture();
    let mut session = FinderSession::open(Mode::BookmarkOpener, &host, &Config::default()).unwrap();
    let before = session.candidates().len();

    assert!(session.select(0));
    assert_eq!(session.confirm(), None);
    assert!(!session
        .expanded_folders()
        .contains(&BookmarkId::new("1")));
    assert!(session.candidates().len() < before);
    assert_eq!(session.selected_index(), Some(0));

    assert_eq!(session.confirm(), None);
    assert_eq!(session.candidates().len(), before);
}

#[test]
fn confirming_bookmark_opens_its_url() {
    let host = SnapshotHost::deterministic_fixture();
    let mut session = FinderSession::open(Mode::BookmarkOpener, &host, &Config::default()).unwrap();
    session.set_query("tracker");

    session.move_down();
    assert_eq!(
        session.confirm(),
        Some(HostCommand::OpenBookmark {
            url: "https://issues.example.com".to_string(),
        })
    );
}

#[test]
fn collapsed_on_open_when_configured() {
    let host = SnapshotHost::deterministic_fixture();
    let cfg = Config {
        expand_all_on_open: false,
        ..Config::default()
    };
    let session = FinderSession::open(Mode::BookmarkOpener, &host, &cfg).unwrap();

    // the untitled root stays open; its titled children start collapsed
    assert_eq!(session.expanded_folders().len(), 1);
    assert_eq!(session.candidates().len(), 2);
    assert!(session.candidates().iter().all(|item| item.is_folder()));
}
