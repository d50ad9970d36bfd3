//! Text normalization and fingerprint extraction.
//!
//! Encode-time extraction and resolve-time matching must normalize text the
//! same way; both go through [`strip_whitespace`].

use scraper::Html;

/// Stripped texts longer than this use the mid-text window.
const LONG_TEXT_CHARS: usize = 200;
/// Window for long texts: skips generic openings.
const LONG_WINDOW: (usize, usize) = (30, 80);
/// Window for short texts.
const SHORT_WINDOW: (usize, usize) = (0, 50);

/// Remove every whitespace character (not collapse to a single space).
pub fn strip_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{feff}')
        .collect()
}

/// Plain text of a markup fragment.
pub fn plain_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    fragment.root_element().text().collect()
}

/// Fingerprint of captured content: a fixed window of its
/// whitespace-stripped plain text, counted in characters.
pub fn extract_fingerprint(content: &str) -> String {
    text_fingerprint(&plain_text(content))
}

/// Fingerprint of text that is already plain, such as a user selection.
///
/// Angle brackets are kept as written.
pub fn text_fingerprint(text: &str) -> String {
    let stripped = strip_whitespace(text);
    let (start, end) = if stripped.chars().count() > LONG_TEXT_CHARS {
        LONG_WINDOW
    } else {
        SHORT_WINDOW
    };
    stripped.chars().skip(start).take(end - start).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_whitespace_removes_all_runs() {
        assert_eq!(strip_whitespace(" a b\n\tc\u{a0}d \u{feff}"), "abcd");
    }

    #[test]
    fn test_plain_text_drops_markup() {
        assert_eq!(plain_text("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(plain_text("no markup"), "no markup");
    }

    #[test]
    fn test_short_text_takes_first_fifty() {
        let text: String = ('a'..='z').cycle().take(120).collect();
        let fp = extract_fingerprint(&text);
        assert_eq!(fp, text[..50]);
    }

    #[test]
    fn test_very_short_text_is_whole_text() {
        assert_eq!(extract_fingerprint("<p>tiny note</p>"), "tinynote");
    }

    #[test]
    fn test_long_text_takes_thirty_to_eighty() {
        let text: String = (0..250).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let fp = extract_fingerprint(&text);
        assert_eq!(fp.chars().count(), 50);
        assert_eq!(fp, text[30..80]);
    }

    #[test]
    fn test_boundary_at_two_hundred_uses_short_window() {
        let text = "x".repeat(200);
        assert_eq!(extract_fingerprint(&text), "x".repeat(50));
    }

    #[test]
    fn test_whitespace_differences_do_not_change_fingerprint() {
        let a = "<p>The quick brown fox</p>\n<p>jumps over the lazy dog</p>";
        let b = "<p>The   quick\nbrown fox</p><p>jumps over\tthe lazy dog</p>";
        assert_eq!(extract_fingerprint(a), extract_fingerprint(b));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let content = "<div>Some <em>content</em> to fingerprint</div>";
        assert_eq!(extract_fingerprint(content), extract_fingerprint(content));
    }

    #[test]
    fn test_plain_text_keeps_angle_brackets() {
        assert_eq!(
            text_fingerprint("Vec<String> holds owned strings"),
            "Vec<String>holdsownedstrings"
        );
        assert_eq!(extract_fingerprint("Vec<String> holds"), "Vecholds");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(60);
        let fp = extract_fingerprint(&text);
        assert_eq!(fp.chars().count(), 50);
    }
}
