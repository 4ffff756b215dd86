//! Single-dimension match rules.

/// Case-insensitive substring match against any present field.
///
/// An empty query matches everything.
pub fn text_matches(query: &str, fields: &[Option<&str>]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Returns true if `labels` contains `label` (exact, case-sensitive).
pub fn contains_label(labels: &[String], label: &str) -> bool {
    labels.iter().any(|item| item == label)
}
