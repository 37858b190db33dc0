//! Playlist editing helpers shared by the global and memory editors

use std::collections::HashSet;

/// Append `selected` names not already in `list`, in selection order
///
/// Names outside `library` are ignored so the list stays a library subset.
pub fn add_tracks(list: &mut Vec<String>, selected: &[String], library: &HashSet<String>) {
    for name in selected {
        if library.contains(name) && !list.contains(name) {
            list.push(name.clone());
        }
    }
}

/// Drop every entry named in `selected`
pub fn remove_tracks(list: &mut Vec<String>, selected: &HashSet<String>) {
    list.retain(|name| !selected.contains(name));
}

/// Remove `selected` from `list` and return the index of the previously
/// current track in the new list, or 0 when it was removed
pub fn remove_tracks_keep_current(
    list: &mut Vec<String>,
    current_index: usize,
    selected: &HashSet<String>,
) -> usize {
    let current = list.get(current_index).cloned();
    remove_tracks(list, selected);
    current
        .and_then(|name| list.iter().position(|n| *n == name))
        .unwrap_or(0)
}

/// Swap the item at `index` with its neighbour in `direction` (-1 or +1)
///
/// Returns the item's new index, or `index` unchanged when the move would
/// leave the list.
pub fn move_item(list: &mut [String], index: usize, direction: isize) -> usize {
    let Some(target) = index.checked_add_signed(direction) else {
        return index;
    };
    if index >= list.len() || target >= list.len() {
        return index;
    }
    list.swap(index, target);
    target
}

/// Track name without its final extension
pub fn display_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => &name[..pos],
        _ => name,
    }
}

/// `"1. name"` lines for a playlist
pub fn numbered_lines(list: &[String]) -> Vec<String> {
    list.iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, display_name(name)))
        .collect()
}

/// Now-playing lines with a `"> "` marker on `active`
pub fn now_playing_lines(list: &[String], active: usize) -> Vec<String> {
    list.iter()
        .enumerate()
        .map(|(i, name)| {
            let marker = if i == active { "> " } else { "  " };
            format!("{}{}. {}", marker, i + 1, display_name(name))
        })
        .collect()
}
