//! Caption → filesystem-safe base name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::CandidateName;

/// Anything that is not a word character, whitespace or a hyphen.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Map a raw caption to a filesystem-safe base name.
///
/// Drops every character outside {word characters, whitespace, hyphen}, trims
/// the ends, and collapses internal whitespace runs into a single underscore.
/// Total: any input yields a string, possibly empty.
///
/// ```
/// use caption_rename_core::naming::sanitize;
///
/// assert_eq!(sanitize("Mountain Lake!!"), "Mountain_Lake");
/// assert_eq!(sanitize("?!"), "");
/// ```
pub fn sanitize(caption: &str) -> String {
    let stripped = DISALLOWED.replace_all(caption, "");
    WHITESPACE_RUN
        .replace_all(stripped.trim(), "_")
        .into_owned()
}

impl CandidateName {
    /// Sanitize a caption into a candidate, capping the base at `max_base_len` bytes.
    pub fn from_caption(caption: &str, extension: &str, max_base_len: usize) -> Self {
        let base = truncate_base(sanitize(caption), max_base_len);
        Self::new(base, extension)
    }
}

/// Cut on a char boundary, then drop separators left dangling by the cut.
fn truncate_base(mut base: String, max_len: usize) -> String {
    if base.len() <= max_len {
        return base;
    }
    let mut cut = max_len;
    while !base.is_char_boundary(cut) {
        cut -= 1;
    }
    base.truncate(cut);
    let trimmed_len = base.trim_end_matches(['_', '-']).len();
    base.truncate(trimmed_len);
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every char is a word char, underscore or hyphen.
    fn is_safe(name: &str) -> bool {
        let word = Regex::new(r"^[\w-]*$").unwrap();
        word.is_match(name)
    }

    #[test]
    fn test_sanitize_basic_caption() {
        assert_eq!(sanitize("Mountain Lake!!"), "Mountain_Lake");
        assert_eq!(
            sanitize("a dog running on the beach"),
            "a_dog_running_on_the_beach"
        );
    }

    #[test]
    fn test_sanitize_keeps_hyphens_and_underscores() {
        assert_eq!(sanitize("black-and-white photo_2"), "black-and-white_photo_2");
    }

    #[test]
    fn test_sanitize_trims_and_collapses_whitespace() {
        assert_eq!(sanitize("   two \t\n  words  "), "two_words");
        // Unicode whitespace (NBSP, ideographic space) is whitespace too
        assert_eq!(sanitize("\u{00A0}red\u{3000}\u{2003}car\u{00A0}"), "red_car");
    }

    #[test]
    fn test_sanitize_empty_and_punctuation_only() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("!?.,;:'\"/\\*<>|"), "");
        assert_eq!(sanitize("  ...  "), "");
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize("C:\\Windows"), "CWindows");
    }

    #[test]
    fn test_sanitize_unicode_word_chars() {
        assert_eq!(sanitize("Café au lait ☕"), "Café_au_lait");
        assert_eq!(sanitize("东京 夜景"), "东京_夜景");
    }

    #[test]
    fn test_sanitize_output_is_always_safe() {
        let inputs = [
            "",
            " ",
            "\t\r\n",
            "!!!",
            "a  b",
            " lead",
            "trail ",
            "mixed\u{2028}separators\u{0085}here",
            "emoji 🎉 party 🎈",
            "tabs\tand\tnewlines\n",
            "quote's \"and\" (parens) [brackets] {braces}",
            "dots.in.caption",
            "-hyphen- start",
        ];
        for input in inputs {
            let out = sanitize(input);
            assert!(is_safe(&out), "unsafe output {out:?} for {input:?}");
            assert_eq!(out, out.trim(), "untrimmed output for {input:?}");
            assert!(!out.contains(char::is_whitespace), "whitespace in {out:?}");
        }
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        let caption = "A cat, sitting on a windowsill.";
        assert_eq!(sanitize(caption), sanitize(caption));
    }

    #[test]
    fn test_candidate_from_caption_truncates_on_char_boundary() {
        let candidate = CandidateName::from_caption("ééééé", "jpg", 5);
        // 'é' is two bytes, so only two fit in five bytes
        assert_eq!(candidate.base, "éé");
        assert_eq!(candidate.extension, "jpg");
    }

    #[test]
    fn test_candidate_from_caption_drops_dangling_separator() {
        let candidate = CandidateName::from_caption("sunset over the sea", "png", 12);
        // "sunset_over_" cut at 12 bytes, trailing underscore removed
        assert_eq!(candidate.base, "sunset_over");
    }

    #[test]
    fn test_candidate_from_caption_short_caption_untouched() {
        let candidate = CandidateName::from_caption("Mountain Lake!!", "JPG", 120);
        assert_eq!(candidate, CandidateName::new("Mountain_Lake", "JPG"));
    }
}
