//! Greedy word wrap against a width function.
//!
//! Words are added to the current line while the joined candidate still fits;
//! otherwise the line is flushed. Words are never split, so a single word wider
//! than `max_width` occupies a line of its own and overflows it.

/// Wraps `text` into lines no wider than `max_width` points.
///
/// `measure(s)` returns the width of `s` in em; it is scaled by `font_size`.
/// Empty or whitespace-only input yields a single empty line, never zero lines.
pub fn wrap_lines<F>(text: &str, measure: F, font_size: f32, max_width: f32) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) * font_size <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
