//! Display formatting for article dates and text.
//!
//! Every function here is total: malformed input degrades to a fixed
//! sentinel string instead of failing. Display strings are French, matching
//! the collection's source blog.
use chrono::{Local, NaiveDate};
use std::borrow::Cow;

/// Shown when a date code is missing or not 8 characters long.
pub const UNKNOWN_DATE: &str = "Date inconnue";
/// Substituted for the month name when the month field is out of range.
pub const UNKNOWN_MONTH: &str = "mois inconnu";
/// Relative-time fallback for missing or malformed date codes.
pub const LONG_AGO: &str = "Il y a longtemps";
/// Default `truncate_text` length.
pub const DEFAULT_TRUNCATE_LEN: usize = 150;

const ELLIPSIS: &str = "...";

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

// ============================================================================
// Dates
// ============================================================================

/// Parse the leading ASCII digits of `s`, the way a lenient integer parser
/// would. Returns `None` when `s` does not start with a digit.
fn leading_int(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Format a `YYYYMMDD` code as `"D mois YYYY"`, e.g. `"5 janvier 2023"`.
///
/// - Missing or wrong-length codes yield [`UNKNOWN_DATE`].
/// - The year is echoed as-is, the day loses its leading zero.
/// - A month outside 1..=12 yields [`UNKNOWN_MONTH`] in its place.
pub fn format_date(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() != 8 {
        return UNKNOWN_DATE.to_string();
    }

    let year: String = chars[0..4].iter().collect();
    let month: String = chars[4..6].iter().collect();
    let day: String = chars[6..8].iter().collect();

    let month_name = leading_int(&month)
        .and_then(|m| m.checked_sub(1))
        .and_then(|idx| MONTHS_FR.get(idx as usize))
        .copied()
        .unwrap_or(UNKNOWN_MONTH);

    let day = leading_int(&day).map_or(day, |d| d.to_string());

    format!("{} {} {}", day, month_name, year)
}

/// Parse a strict `YYYYMMDD` code into a calendar date.
pub fn parse_date_code(code: &str) -> Option<NaiveDate> {
    if code.len() != 8 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = code[0..4].parse().ok()?;
    let month: u32 = code[4..6].parse().ok()?;
    let day: u32 = code[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// French relative-time phrase for a `YYYYMMDD` code, measured against `today`.
///
/// The distance is the absolute number of whole days between the two dates,
/// so future dates read like past ones.
///
/// | days     | phrase                  |
/// |----------|-------------------------|
/// | 0        | `Aujourd'hui`           |
/// | 1        | `Hier`                  |
/// | 2..=6    | `Il y a N jours`        |
/// | 7..=29   | `Il y a N semaine(s)`   |
/// | 30..=364 | `Il y a N mois`         |
/// | 365..    | `Il y a N an(s)`        |
pub fn time_ago(code: &str, today: NaiveDate) -> String {
    let Some(date) = parse_date_code(code) else {
        return LONG_AGO.to_string();
    };

    let days = (today - date).num_days().unsigned_abs();

    match days {
        0 => "Aujourd'hui".to_string(),
        1 => "Hier".to_string(),
        2..=6 => format!("Il y a {} jours", days),
        7..=29 => {
            let weeks = days / 7;
            format!("Il y a {} semaine{}", weeks, plural_s(weeks))
        }
        30..=364 => format!("Il y a {} mois", days / 30),
        _ => {
            let years = days / 365;
            format!("Il y a {} an{}", years, plural_s(years))
        }
    }
}

/// [`time_ago`] against the local wall-clock date.
pub fn time_ago_now(code: &str) -> String {
    time_ago(code, Local::now().date_naive())
}

// ============================================================================
// Text
// ============================================================================

fn plural_s(n: u64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// Cut `text` to at most `max_chars` characters, appending `"..."` when cut.
///
/// Text that already fits is returned borrowed and untouched. When cut, the
/// kept prefix loses its trailing whitespace before the ellipsis is added.
///
/// ```
/// use kiosque::format::truncate_text;
///
/// assert_eq!(truncate_text("abcdefghij", 5), "abcde...");
/// assert_eq!(truncate_text("court", 150), "court");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}{}", text[..cut].trim_end(), ELLIPSIS)),
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Badge label for a category key: first `-` becomes a space, then
/// capitalized. Articles without a key are labelled `"Article"`.
pub fn category_label(category_scraped: Option<&str>) -> String {
    match category_scraped {
        Some(key) if !key.is_empty() => capitalize(&key.replacen('-', " ", 1)),
        _ => "Article".to_string(),
    }
}

/// `"N article(s) trouvé(s)"` for the search result counter.
pub fn found_count(n: usize) -> String {
    let s = plural_s(n as u64);
    format!("{} article{} trouvé{}", n, s, s)
}
