//! Shared helpers for the integration tests.

#![allow(dead_code)]

use loopbar::{Style, BAR_CELLS};

/// What a terminal that treats `\b` as "cursor left" ends up showing, minus
/// trailing blanks.
pub fn screen(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut cells: Vec<char> = Vec::new();
    let mut cursor: usize = 0;
    for ch in text.chars() {
        if ch == '\x08' {
            cursor = cursor.saturating_sub(1);
            continue;
        }
        if cursor < cells.len() {
            cells[cursor] = ch;
        } else {
            cells.push(ch);
        }
        cursor += 1;
    }
    let shown: String = cells.into_iter().collect();
    shown.trim_end_matches(' ').to_string()
}

/// What a terminal shows after output that repaints with a clear-line sequence.
pub fn repainted(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.rsplit("\x1b[2K\r").next().unwrap_or_default().to_string()
}

pub fn backspaces(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&byte| byte == 0x08).count()
}

/// The line a fresh indicator would draw in one go at `percent`.
pub fn expected_line(style: &Style, show_bar: bool, percent: u8) -> String {
    if !show_bar {
        return format!("{}%", percent);
    }
    let done = usize::from(percent / 2);
    format!(
        "{}{}{}{} {}%",
        style.open,
        style.done.repeat(done),
        style.todo.repeat(BAR_CELLS - done),
        style.close,
        percent
    )
}
