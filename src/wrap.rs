use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Word-wrap `text` into rows no wider than `width` terminal cells.
///
/// Leading whitespace is kept so replies show verbatim. Words wider than a
/// row are broken at the cell limit. Every input line yields at least one row.
pub fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();

    for line in text.lines() {
        if width == 0 {
            rows.push(line.to_string());
        } else {
            wrap_line(line, width, &mut rows);
        }
    }

    if rows.is_empty() {
        rows.push(String::new());
    }

    rows
}

fn wrap_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for segment in segments(line) {
        let segment_width = segment.width();

        if current_width + segment_width <= width {
            current.push_str(segment);
            current_width += segment_width;
            continue;
        }

        // Whitespace that doesn't fit becomes the line break
        if segment.starts_with(char::is_whitespace) {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
            continue;
        }

        if current_width > 0 {
            rows.push(current.trim_end().to_string());
            current.clear();
            current_width = 0;
        }

        if segment_width <= width {
            current.push_str(segment);
            current_width = segment_width;
            continue;
        }

        // Word wider than a row: break it at the cell limit
        for ch in segment.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && current_width > 0 {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    rows.push(current);
}

/// Split a line into alternating runs of whitespace and non-whitespace
fn segments(line: &str) -> impl Iterator<Item = &str> {
    let mut rest = line;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != is_space)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (segment, tail) = rest.split_at(end);
        rest = tail;
        Some(segment)
    })
}
