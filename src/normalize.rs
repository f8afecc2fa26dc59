use unicode_normalization::UnicodeNormalization;

use crate::config::InputConfig;

/// Combining Diacritical Marks block
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Text transform applied to both the typed answer and the canonical answer
/// before they are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerNormalizer {
    pub case: bool,
    pub diacritics: bool,
}

impl AnswerNormalizer {
    pub fn new(case: bool, diacritics: bool) -> Self {
        Self { case, diacritics }
    }

    pub fn normalize(&self, answer: &str) -> String {
        let mut normalized = answer.trim().to_string();

        if self.case {
            normalized = normalized.to_lowercase();
        }

        // Off by default for Norwegian so that å, æ and ø survive.
        if self.diacritics {
            normalized = normalized
                .nfd()
                .filter(|c| !COMBINING_MARKS.contains(c))
                .collect::<String>()
                .trim()
                .to_string();
        }

        normalized
    }

    pub fn matches(&self, given: &str, expected: &str) -> bool {
        self.normalize(given) == self.normalize(expected)
    }
}

impl From<&InputConfig> for AnswerNormalizer {
    fn from(input: &InputConfig) -> Self {
        Self::new(input.normalize_case, input.normalize_diacritics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace_always() {
        let n = AnswerNormalizer::new(false, false);
        assert_eq!(n.normalize("  skolebuss \t\n"), "skolebuss");
    }

    #[test]
    fn case_folding_follows_flag() {
        let folding = AnswerNormalizer::new(true, false);
        assert!(folding.matches("Skolebuss", "skolebuss"));

        let strict = AnswerNormalizer::new(false, false);
        assert!(!strict.matches("Skolebuss", "skolebuss"));
    }

    #[test]
    fn case_folding_handles_norwegian_letters() {
        let n = AnswerNormalizer::new(true, false);
        assert_eq!(n.normalize("SNØMANN"), "snømann");
        assert_eq!(n.normalize("HÅNDBALL"), "håndball");
        assert_eq!(n.normalize("JORDBÆR"), "jordbær");
    }

    #[test]
    fn diacritics_kept_when_disabled() {
        let n = AnswerNormalizer::new(true, false);
        assert!(!n.matches("handball", "håndball"));
        assert!(!n.matches("cafe", "café"));
    }

    #[test]
    fn diacritics_stripped_when_enabled() {
        let n = AnswerNormalizer::new(true, true);
        assert_eq!(n.normalize("Café"), "cafe");
        assert!(n.matches("naive", "naïve"));
        // å decomposes to a + ring above, so it folds too
        assert!(n.matches("handball", "håndball"));
    }

    #[test]
    fn ae_and_oslash_are_not_decomposable() {
        let n = AnswerNormalizer::new(true, true);
        assert_eq!(n.normalize("jordbær"), "jordbær");
        assert_eq!(n.normalize("snø"), "snø");
    }

    #[test]
    fn precomposed_and_decomposed_input_agree_with_diacritics() {
        let n = AnswerNormalizer::new(false, true);
        assert!(n.matches("e\u{0301}", "\u{00e9}"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "  Skolebuss ",
            "Café au lait",
            "HÅNDBALL",
            "a \u{0301}",
            "İstanbul",
            "",
            "   ",
        ];
        for case in [false, true] {
            for diacritics in [false, true] {
                let n = AnswerNormalizer::new(case, diacritics);
                for input in inputs {
                    let once = n.normalize(input);
                    assert_eq!(n.normalize(&once), once, "input {input:?}");
                }
            }
        }
    }

    #[test]
    fn from_input_config() {
        let cfg = crate::config::AppConfig::default();
        let n = AnswerNormalizer::from(&cfg.input);
        assert!(n.case);
        assert!(!n.diacritics);
    }
}
