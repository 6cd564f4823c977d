//! Pluralization for log lines.

/// Format a count with its noun: `1 image`, `3 images`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let s = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{s}")
}
