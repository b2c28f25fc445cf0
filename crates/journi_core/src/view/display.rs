//! List-row formatting for journal entries.
//!
//! # Responsibility
//! - Turn raw entry fields into the strings shown by list and detail screens.
//!
//! # Invariants
//! - Every function is pure for a fixed local time zone and never panics.
//! - The abstract keeps the first 20 characters verbatim; only an ellipsis is
//!   ever appended.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Number of characters kept by [`format_abstract`].
pub const ABSTRACT_MAX_CHARS: usize = 20;
/// Marker appended to truncated abstracts.
pub const ELLIPSIS: char = '\u{2026}';

const LIST_DATE_FORMAT: &str = "%Y-%m-%d";
const DETAIL_DATE_FORMAT: &str = "%Y-%m-%d (%a)";

/// Renders `timestamp` (epoch seconds) as `YYYY-MM-DD` in local time.
pub fn format_date(timestamp: i64) -> String {
    local_datetime(timestamp).format(LIST_DATE_FORMAT).to_string()
}

/// Renders `timestamp` for the detail screen header, e.g. `2017-07-14 (Fri)`.
pub fn format_detail_date(timestamp: i64) -> String {
    local_datetime(timestamp).format(DETAIL_DATE_FORMAT).to_string()
}

/// Returns the first 20 characters of `content`, plus `…` when longer.
pub fn format_abstract(content: &str) -> String {
    match content.char_indices().nth(ABSTRACT_MAX_CHARS) {
        Some((cut, _)) => {
            let mut abstract_text = String::with_capacity(cut + ELLIPSIS.len_utf8());
            abstract_text.push_str(&content[..cut]);
            abstract_text.push(ELLIPSIS);
            abstract_text
        }
        None => content.to_string(),
    }
}

/// Formats one list row as `"{date} - {abstract}"`.
pub fn format_row(date: i64, content: &str) -> String {
    format!("{} - {}", format_date(date), format_abstract(content))
}

// Out-of-range timestamps render as the epoch instead of failing.
fn local_datetime(timestamp: i64) -> DateTime<Local> {
    Local
        .timestamp_opt(timestamp, 0)
        .earliest()
        .unwrap_or_else(|| DateTime::<Utc>::default().with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::{format_abstract, format_date, format_detail_date, format_row, ELLIPSIS};

    const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

    #[test]
    fn date_uses_year_month_day() {
        assert_eq!(format_date(1_500_000_000), "2017-07-14");
    }

    #[test]
    fn detail_date_appends_weekday() {
        assert_eq!(format_detail_date(1_500_000_000), "2017-07-14 (Fri)");
    }

    #[test]
    fn epoch_and_extreme_timestamps_do_not_panic() {
        assert_eq!(format_date(0).len(), 10);
        assert!(!format_date(i64::MAX).is_empty());
        assert!(!format_date(i64::MIN).is_empty());
    }

    #[test]
    fn short_abstract_is_unchanged() {
        assert_eq!(format_abstract(&ALPHABET[..19]), &ALPHABET[..19]);
        assert_eq!(format_abstract(&ALPHABET[..20]), &ALPHABET[..20]);
        assert_eq!(format_abstract(""), "");
    }

    #[test]
    fn long_abstract_is_cut_with_ellipsis() {
        let expected = format!("{}{ELLIPSIS}", &ALPHABET[..20]);
        assert_eq!(format_abstract(ALPHABET), expected);
    }

    #[test]
    fn abstract_counts_characters_not_bytes() {
        let accented = "é".repeat(25);
        let formatted = format_abstract(&accented);
        assert_eq!(formatted.chars().count(), 21);
        assert!(formatted.starts_with(&"é".repeat(20)));
        assert!(formatted.ends_with(ELLIPSIS));
    }

    #[test]
    fn row_joins_date_and_abstract() {
        assert_eq!(format_row(1_500_000_000, "short"), "2017-07-14 - short");
    }
}
