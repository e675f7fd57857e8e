//! Roots-only flattening of a directory group snapshot.

use group_visibility_sdk::ExternalGroup;

/// Keep only the groups that no other group of `groups` lists as a member.
///
/// Containment is checked against the given snapshot only; nothing is
/// resolved transitively. Input order is preserved. Groups forming a cycle
/// inside the snapshot all exclude each other.
#[must_use]
pub fn flatten_roots(groups: Vec<ExternalGroup>) -> Vec<ExternalGroup> {
    let nested: Vec<bool> = groups
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            groups.iter().enumerate().any(|(other_idx, other)| {
                other_idx != idx && other.has_members && other.member_ids.contains(&group.id)
            })
        })
        .collect();

    groups
        .into_iter()
        .zip(nested)
        .filter_map(|(group, is_nested)| (!is_nested).then_some(group))
        .collect()
}
