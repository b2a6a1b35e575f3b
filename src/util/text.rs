use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
///
/// CJK characters and most emoji take two columns, combining marks none.
///
/// ```
/// use kiosque::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("été"), 3);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` that fits in `width` columns.
fn take_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Truncate a string to fit within `max_width` columns, appending `"..."`
/// when something was cut.
///
/// Widths of three columns or less have no room for the ellipsis, so the
/// string is simply cut. Text that fits is returned borrowed.
///
/// ```
/// use kiosque::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Court", 10), "Court");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_width(s, max_width).to_string());
    }

    let kept = take_width(s, max_width - ELLIPSIS_WIDTH).trim_end();
    Cow::Owned(format!("{}{}", kept, ELLIPSIS))
}

/// Number of terminal rows `line` occupies when word-wrapped at `width`
/// columns.
///
/// Words move to the next row when they do not fit; a word wider than the
/// row is broken at the column limit.
pub fn wrapped_height(line: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }

    let mut rows = 1;
    let mut used = 0;
    for word in line.split(' ') {
        let w = display_width(word);
        let needed = if used == 0 { w } else { used + 1 + w };
        if needed <= width {
            used = needed;
        } else if w <= width {
            rows += 1;
            used = w;
        } else {
            if used > 0 {
                rows += 1;
            }
            let extra = (w - 1) / width;
            rows += extra;
            used = w - extra * width;
        }
    }
    rows
}

fn is_stripped(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\r')
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Scraped text is rendered straight into the terminal, so anything that
/// could move the cursor or retitle the window has to go.
///
/// - CSI sequences (`ESC [` ... final byte in `@`..=`~`)
/// - OSC sequences (`ESC ]` ... BEL or `ESC \`)
/// - any other control character, bare ESC included
///
/// Tab, newline and carriage return are kept. Clean input is returned
/// borrowed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for f in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&f) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(f) = chars.next() {
                        if f == '\x07' {
                            break;
                        }
                        if f == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_stripped(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}
