//! Terminal display width helpers.
//!
//! ANSI-aware width calculation so preview columns stay aligned even when cell
//! text carries colour codes or wide glyphs.

use unicode_width::UnicodeWidthChar;

/// Display width of `text` after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Cut plain `text` down to at most `width` columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in clean_str.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Right-pad `text` with spaces to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let mut line = text.to_string();
    let current = display_width(text);
    if current < width {
        line.push_str(&" ".repeat(width - current));
    }
    line
}
