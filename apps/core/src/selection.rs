use crate::candidate::Candidate;
use crate::model::EntityId;

/// Index to select after a rebuild.
///
/// Follows `anchor` to its new position when it survived the rebuild,
/// otherwise falls back to the first row. `None` only for an empty list.
pub fn reconcile_selection(candidates: &[Candidate], anchor: Option<&EntityId>) -> Option<usize> {
    if let Some(anchor) = anchor {
        let found = candidates
            .iter()
            .position(|item| item.entity_id().as_ref() == Some(anchor));
        if found.is_some() {
            return found;
        }
    }

    (!candidates.is_empty()).then_some(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Next index for an arrow move, clamped to the list.
///
/// With `skip_folders` folder rows are stepped over and the selection stays
/// put if only folders lie in that direction.
pub fn step(
    candidates: &[Candidate],
    current: Option<usize>,
    direction: Direction,
    skip_folders: bool,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let last = candidates.len() - 1;

    if !skip_folders {
        return Some(match (current, direction) {
            (None, _) => 0,
            (Some(index), Direction::Down) => (index + 1).min(last),
            (Some(index), Direction::Up) => index.saturating_sub(1),
        });
    }

    let selectable = |index: &usize| !candidates[*index].is_folder();
    let next = match (current, direction) {
        (None, Direction::Down) => (0..=last).find(selectable),
        (None, Direction::Up) => None,
        (Some(index), Direction::Down) => (index + 1..=last).find(selectable),
        (Some(index), Direction::Up) => (0..index).rev().find(selectable),
    };
    next.or(current)
}
