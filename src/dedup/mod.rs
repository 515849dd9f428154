// Duplicate suppression over nested image pools using BLAKE3

use std::collections::HashMap;

use crate::pools::ImageGroups;

/// Suppress byte-identical blobs across the entire nested pool.
///
/// Shape is preserved: same outer length, same inner lengths. A digest seen
/// more than once anywhere in the pool has all of its occurrences replaced
/// with `None`, including the first. Counting happens in a full pass before
/// any replacement so the result does not depend on group order. Only
/// byte-identical blobs are suppressed; near-duplicates pass through.
pub fn suppress_duplicates(groups: &ImageGroups) -> ImageGroups {
    let mut counts: HashMap<blake3::Hash, u32> = HashMap::new();

    for group in groups {
        for blob in group.iter().flatten() {
            *counts.entry(blake3::hash(blob)).or_insert(0) += 1;
        }
    }

    let duplicates = counts.values().filter(|&&n| n > 1).count();
    if duplicates > 0 {
        log::debug!("Suppressing {} duplicated image digests", duplicates);
    }

    groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|blob| match blob {
                    Some(bytes) if counts[&blake3::hash(bytes)] > 1 => None,
                    other => other.clone(),
                })
                .collect()
        })
        .collect()
}
