use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a header with text and an underline of the same display width
///
/// `double_line` selects `═` over `─`.
pub fn format_header(text: &str, double_line: bool) -> String {
    let separator = if double_line { "═" } else { "─" };
    format!("{}\n{}\n", text, separator.repeat(text.width()))
}

/// Truncate `text` to at most `width` display columns, ending in `…` when cut
pub fn fit_label(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Indent every line of `text` by `spaces`
pub fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{}{}", pad, line) })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_header_single_line() {
        assert_eq!(format_header("Test Header", false), "Test Header\n───────────\n");
    }

    #[test]
    fn test_format_header_double_line() {
        assert_eq!(format_header("Test Header", true), "Test Header\n═══════════\n");
    }

    #[test]
    fn test_format_header_counts_display_width() {
        assert_eq!(format_header("Loading…", false), "Loading…\n────────\n");
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("Jane Doe", 10), "Jane Doe");
        assert_eq!(fit_label("Jane Doe", 8), "Jane Doe");
        assert_eq!(fit_label("Jane Doe", 5), "Jane…");
        assert_eq!(fit_label("Jane Doe", 0), "");
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb", 2), "  a\n\n  b");
    }
}
