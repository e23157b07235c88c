//! Name search over the latest position list

use crate::tracking::types::TrackedObjectPosition;

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive substring filter on `name`. A blank query keeps everything.
pub fn filter_positions(
    positions: &[TrackedObjectPosition],
    query: &str,
) -> Vec<TrackedObjectPosition> {
    let needle = normalize(query);
    if needle.is_empty() {
        return positions.to_vec();
    }
    positions
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// First object whose name contains the query, if any
pub fn first_match<'a>(
    positions: &'a [TrackedObjectPosition],
    query: &str,
) -> Option<&'a TrackedObjectPosition> {
    let needle = normalize(query);
    if needle.is_empty() {
        return None;
    }
    positions
        .iter()
        .find(|p| p.name.to_lowercase().contains(&needle))
}
