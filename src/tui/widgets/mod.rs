pub mod lyrics;
pub mod now_playing;
pub mod playlist;
pub mod root;

use ratatui::text::Span;

fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Pad `s` with spaces to `width` terminal columns (wide CJK glyphs count
/// twice), truncating first when it does not fit.
fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_str(s, width);
    while Span::raw(out.as_str()).width() > width {
        out.pop();
    }
    let used = Span::raw(out.as_str()).width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}
