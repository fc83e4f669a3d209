//! Capture filenames.
//!
//! A capture is named `<channel> - <YYMMDD HHhMMmSSs> - <title>.mp4` and then stripped of
//! every character outside `[A-Za-z0-9 _.-]`, so stream titles can never smuggle path
//! separators or shell metacharacters into the filesystem.

use std::sync::OnceLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;

/// Container extension of every capture.
pub const CAPTURE_EXTENSION: &str = "mp4";

/// `strftime` pattern of the timestamp embedded in capture filenames.
pub const TIMESTAMP_FORMAT: &str = "%y%m%d %Hh%Mm%Ss";

fn disallowed() -> &'static Regex {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    DISALLOWED.get_or_init(|| Regex::new(r"[^A-Za-z0-9 _.\-]").expect("static pattern"))
}

/// Removes every character that is not an ASCII alphanumeric, space, hyphen, underscore or
/// dot. Idempotent.
pub fn sanitize(raw: &str) -> String {
    disallowed().replace_all(raw, "").into_owned()
}

/// Builds the sanitized filename for a capture started at `started_at`.
pub fn capture_filename<Tz>(channel: &str, started_at: &DateTime<Tz>, title: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    sanitize(&format!(
        "{} - {} - {}.{}",
        channel,
        started_at.format(TIMESTAMP_FORMAT),
        title,
        CAPTURE_EXTENSION
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Local};

    #[test]
    fn test_sanitize_strips_disallowed_characters() {
        assert_eq!(sanitize("a/b\\c:d*e?f\"g<h>i|j"), "abcdefghij");
        assert_eq!(sanitize("Speedrun! 100% | any% [WR?]"), "Speedrun 100  any WR");
        assert_eq!(sanitize("émoji 🎮 ok_-."), "moji  ok_-.");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "plain title",
            "weird: title / with \\ stuff",
            "日本語のタイトル",
            "tabs\tand\nnewlines",
            "dots...and--dashes__",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-')));
        }
    }

    #[test]
    fn test_capture_filename_format() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let started_at = offset.with_ymd_and_hms(2024, 3, 9, 21, 5, 7).unwrap();

        let name = capture_filename("somechannel", &started_at, "Foo: the game!");
        assert_eq!(name, "somechannel - 240309 21h05m07s - Foo the game.mp4");
    }

    #[test]
    fn test_capture_filename_with_local_time() {
        let started_at = Local::now();
        let name = capture_filename("chan", &started_at, "Foo");
        let pattern = Regex::new(r"^chan - \d{6} \d{2}h\d{2}m\d{2}s - Foo\.mp4$").unwrap();
        assert!(pattern.is_match(&name), "unexpected filename {}", name);
    }
}
