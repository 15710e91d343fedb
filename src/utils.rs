/// Cut to at most `max` chars on a char boundary.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Like `truncate`, but marks the cut with "...".
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Plain substring test against an already-uppercased haystack.
pub fn contains_any(haystack_upper: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack_upper.contains(n))
}
