use std::collections::HashSet;

use tabhop_core::builder::{build_candidates, BuildContext, BuildOptions};
use tabhop_core::candidate::Candidate;
use tabhop_core::mode::Mode;
use tabhop_core::model::{EntityId, Tab, TabId};
use tabhop_core::selection::{reconcile_selection, step, Direction};

fn tabs() -> Vec<Tab> {
    vec![
        Tab::new(7, "Calendar", "https://calendar.example.com").with_index(0),
        Tab::new(8, "Chat", "https://chat.example.com").with_index(1),
        Tab::new(9, "Docs", "https://docs.example.com").with_index(2),
        Tab::new(42, "Release notes", "https://github.com/org/repo/releases").with_index(3),
    ]
}

fn build(tabs: &[Tab], query: &str) -> Vec<Candidate> {
    let expanded = HashSet::new();
    let ctx = BuildContext {
        tabs,
        groups: &[],
        bookmarks: &[],
        current_tab_id: None,
        previous_tab_id: None,
        expanded_folders: &expanded,
        options: BuildOptions::default(),
    };
    build_candidates(query, Mode::Tabs, &ctx)
}

#[test]
fn selection_follows_tab_to_its_new_position() {
    let tabs = tabs();
    let anchor = EntityId::Tab(TabId(42));

    let before = build(&tabs, "");
    assert_eq!(reconcile_selection(&before, Some(&anchor)), Some(3));

    let after = build(&tabs, "release");
    assert_eq!(reconcile_selection(&after, Some(&anchor)), Some(0));
}

#[test]
fn filtered_out_anchor_falls_back_to_first_row() {
    let tabs = tabs();
    let anchor = EntityId::Tab(TabId(42));

    let items = build(&tabs, "cal");
    assert_eq!(items.len(), 1);
    assert_eq!(reconcile_selection(&items, Some(&anchor)), Some(0));
}

#[test]
fn empty_list_selects_nothing() {
    let tabs = tabs();
    let items = build(&tabs, "zzzz");
    assert!(items.is_empty());
    assert_eq!(reconcile_selection(&items, None), None);
    assert_eq!(step(&items, None, Direction::Down, false), None);
}

#[test]
fn repeated_rebuilds_keep_the_selection() {
    let tabs = tabs();
    let anchor = EntityId::Tab(TabId(9));

    let mut selected = None;
    for query in ["", "d", "do", "doc", "docs"] {
        let items = build(&tabs, query);
        selected = reconcile_selection(&items, Some(&anchor));
        let entity = selected.and_then(|index| items[index].entity_id());
        assert_eq!(entity, Some(anchor.clone()), "query {query:?}");
    }
    assert_eq!(selected, Some(0));
}

#[test]
fn arrow_moves_clamp_to_the_list() {
    let tabs = tabs();
    let items = build(&tabs, "");

    assert_eq!(step(&items, Some(0), Direction::Up, false), Some(0));
    assert_eq!(step(&items, Some(0), Direction::Down, false), Some(1));
    assert_eq!(step(&items, Some(3), Direction::Down, false), Some(3));
}
