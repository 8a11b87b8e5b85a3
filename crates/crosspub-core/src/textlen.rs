//! Text constraint validation
//!
//! Platform summary boxes enforce a hard character budget where every code
//! point counts as one unit, CJK or not. The one legal optimization is
//! dropping whitespace wedged between a CJK character and a Latin
//! letter/digit; everything else is preserved verbatim.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CJK followed by whitespace followed by a Latin letter/digit, and the
    // mirror image. Two passes keep "中 a 中" correct.
    static ref CJK_THEN_LATIN: Regex =
        Regex::new(r"([\x{4e00}-\x{9fff}])\s+([A-Za-z0-9])").expect("static pattern");
    static ref LATIN_THEN_CJK: Regex =
        Regex::new(r"([A-Za-z0-9])\s+([\x{4e00}-\x{9fff}])").expect("static pattern");
}

/// Character count under the budget rule (one code point, one unit)
#[must_use]
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// Remove whitespace between CJK and Latin characters, both directions
///
/// Idempotent: once the gaps are gone there is nothing left to match.
#[must_use]
pub fn collapse_cjk_latin_gaps(text: &str) -> String {
    let pass = CJK_THEN_LATIN.replace_all(text, "$1$2");
    LATIN_THEN_CJK.replace_all(&pass, "$1$2").into_owned()
}

/// Outcome of validating one text field against a budget
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// The text as given
    pub original: String,
    /// The text after whitespace cleanup
    pub cleaned: String,
    /// Character count of the original
    pub original_count: usize,
    /// Character count after cleanup
    pub cleaned_count: usize,
    /// Whether the budget is met (possibly only after cleanup)
    pub ok: bool,
    /// Human-readable verdict
    pub message: String,
    limit: usize,
}

impl ValidationResult {
    /// The text the caller should publish
    ///
    /// The original wins while it fits on its own; the cleaned text is only
    /// adopted when cleanup is what makes the budget. On failure the
    /// original is returned for diagnosis.
    #[must_use]
    pub fn effective(&self) -> &str {
        if self.ok && self.original_count > self.limit {
            &self.cleaned
        } else {
            &self.original
        }
    }
}

/// Validate `text` against a budget of `max_length` characters
///
/// Never fails; the verdict is in [`ValidationResult::ok`].
#[must_use]
pub fn validate(text: &str, max_length: usize) -> ValidationResult {
    let original_count = count_chars(text);
    let cleaned = collapse_cjk_latin_gaps(text);
    let cleaned_count = count_chars(&cleaned);

    let (ok, message) = if original_count <= max_length {
        if cleaned_count < original_count {
            (
                true,
                format!(
                    "within budget at {original_count}/{max_length} characters; \
                     cleanup could save {}",
                    original_count - cleaned_count
                ),
            )
        } else {
            (
                true,
                format!("within budget at {original_count}/{max_length} characters"),
            )
        }
    } else if cleaned_count <= max_length {
        (
            true,
            format!(
                "within budget after cleanup: {original_count} -> {cleaned_count} characters \
                 (saved {})",
                original_count - cleaned_count
            ),
        )
    } else {
        (
            false,
            format!(
                "over budget: {original_count} characters, {cleaned_count} after cleanup, \
                 limit {max_length}"
            ),
        )
    };

    ValidationResult {
        original: text.to_string(),
        cleaned,
        original_count,
        cleaned_count,
        ok,
        message,
        limit: max_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_treats_every_code_point_as_one() {
        assert_eq!(count_chars("Hello"), 5);
        assert_eq!(count_chars("你好"), 2);
        assert_eq!(count_chars("Hello 世界!"), 9);
        assert_eq!(count_chars(""), 0);
        assert_eq!(count_chars(" "), 1);
    }

    #[test]
    fn test_gap_collapse_both_directions() {
        assert_eq!(collapse_cjk_latin_gaps("中文 English"), "中文English");
        assert_eq!(collapse_cjk_latin_gaps("English 中文"), "English中文");
        assert_eq!(
            collapse_cjk_latin_gaps("中文 English 混合 text"),
            "中文English混合text"
        );
    }

    #[test]
    fn test_gap_collapse_touches_digits_but_not_latin_spacing() {
        assert_eq!(collapse_cjk_latin_gaps("版本 2 发布"), "版本2发布");
        // Space between two Latin words is preserved verbatim.
        assert_eq!(collapse_cjk_latin_gaps("hello world"), "hello world");
        assert_eq!(collapse_cjk_latin_gaps("标点。 引号"), "标点。 引号");
    }

    #[test]
    fn test_gap_collapse_is_idempotent() {
        let samples = [
            "中文 English 混合 text",
            "a 中 b 文 c",
            "no cjk at all",
            "纯中文没有空格",
        ];
        for sample in samples {
            let once = collapse_cjk_latin_gaps(sample);
            let twice = collapse_cjk_latin_gaps(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_cleanup_never_lengthens() {
        let samples = ["中 a", "a 中", "mixed 混合 content", ""];
        for sample in samples {
            let result = validate(sample, 120);
            assert!(result.cleaned_count <= result.original_count);
        }
    }

    #[test]
    fn test_within_budget_keeps_original() {
        let text = "A".repeat(100);
        let result = validate(&text, 120);
        assert!(result.ok);
        assert_eq!(result.original_count, 100);
        assert_eq!(result.effective(), text);
    }

    #[test]
    fn test_within_budget_reports_possible_savings_but_keeps_original() {
        let text = format!("{}中 a", "x".repeat(100));
        let result = validate(&text, 120);
        assert!(result.ok);
        assert!(result.cleaned_count < result.original_count);
        assert_eq!(result.effective(), text);
        assert!(result.message.contains("could save"));
    }

    #[test]
    fn test_cleanup_rescues_over_budget_text() {
        // 110 CJK chars plus 10 "空 a"-style boundaries: 130 originally,
        // cleanup removes the 10 gap spaces.
        let mut text = "字".repeat(100);
        for _ in 0..10 {
            text.push_str("中 a");
        }
        let result = validate(&text, 120);
        assert_eq!(result.original_count, 130);
        assert_eq!(result.cleaned_count, 120);
        assert!(result.ok);
        assert_eq!(result.effective(), result.cleaned);
    }

    #[test]
    fn test_failure_reports_both_counts() {
        let mut text = "字".repeat(140);
        for _ in 0..10 {
            text.push_str("中 a");
        }
        // 170 originally, 160 after cleanup: still over 120.
        let result = validate(&text, 120);
        assert!(!result.ok);
        assert_eq!(result.original_count, 170);
        assert_eq!(result.cleaned_count, 160);
        assert!(result.message.contains("170"));
        assert!(result.message.contains("160"));
        assert_eq!(result.effective(), text);
    }
}
