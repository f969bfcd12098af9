use std::iter::once;

/// Returns the part of `current` that has not been sent yet, given that
/// `previous` is everything already delivered to the client.
///
/// Upstream streams may re-send text they already produced (cumulative
/// snapshots, overlapping windows or full repeats), so the unsent suffix is
/// located in order of preference: plain prefix, first inner occurrence of
/// `previous`, then the longest suffix/prefix overlap. Without any overlap
/// the whole of `current` is treated as new.
pub fn compute_delta(previous: &str, current: &str) -> String {
    if previous.is_empty() {
        return current.to_string();
    }
    if current.is_empty() {
        return String::new();
    }

    if let Some(rest) = current.strip_prefix(previous) {
        return rest.to_string();
    }

    if let Some(pos) = current.find(previous) {
        return current[pos + previous.len()..].to_string();
    }

    // Byte offsets where each prefix of `current` ends, longest first.
    let prefix_ends: Vec<usize> = current
        .char_indices()
        .map(|(idx, _)| idx)
        .skip(1)
        .chain(once(current.len()))
        .collect();

    for &end in prefix_ends.iter().rev() {
        if end <= previous.len() && previous.ends_with(&current[..end]) {
            return current[end..].to_string();
        }
    }

    current.to_string()
}
