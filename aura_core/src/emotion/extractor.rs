//! Rule-based emotion extraction.

use serde::Serialize;

use super::keywords::KeywordTable;
use super::matcher::match_phrases;
use super::vector::{Dimension, EmotionVector};

/// Starting score of every dimension before keyword contributions.
pub const BASE_SCORE: f32 = 0.2;

/// Raw accumulated scores before normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionScores {
    /// Per-dimension totals in axis order, clamped at zero.
    pub raw: [f32; Dimension::COUNT],
    /// Matched keywords in order of appearance.
    pub matched: Vec<&'static str>,
}

impl EmotionScores {
    pub fn get(&self, dimension: Dimension) -> f32 {
        self.raw[dimension.index()]
    }

    /// Min-max normalizes the scores; a zero range yields
    /// [`EmotionVector::NEUTRAL`].
    pub fn normalize(&self) -> EmotionVector {
        let min = self.raw.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;
        if !range.is_finite() || range <= f32::EPSILON {
            return EmotionVector::NEUTRAL;
        }

        let mut values = [0.0f32; Dimension::COUNT];
        for (slot, raw) in values.iter_mut().zip(self.raw) {
            *slot = (raw - min) / range;
        }
        EmotionVector::clamped(values)
    }
}

/// Accumulates keyword contributions for `text` using `table`.
pub fn score_with(table: &KeywordTable, text: &str) -> EmotionScores {
    let mut raw = [BASE_SCORE; Dimension::COUNT];
    let rules = table.rules();
    let mut matched = Vec::new();

    for found in match_phrases(text, table.phrases()) {
        let rule = &rules[found.index];
        for &(dimension, weight) in rule.contributions {
            raw[dimension.index()] += weight;
        }
        matched.push(rule.phrase);
    }

    for value in raw.iter_mut() {
        *value = value.max(0.0);
    }

    EmotionScores { raw, matched }
}

/// Scores `text` against the built-in keyword table.
pub fn score(text: &str) -> EmotionScores {
    score_with(KeywordTable::builtin(), text)
}

/// Maps dream text to a normalized emotion vector.
///
/// Empty or whitespace-only text returns [`EmotionVector::NEUTRAL`].
///
/// # Examples
///
/// ```
/// use aura_core::{extract_emotions, Dimension};
///
/// let emotions = extract_emotions("I was chased through a dark forest");
/// assert_eq!(emotions.dominant(), Dimension::Fear);
/// ```
pub fn extract(text: &str) -> EmotionVector {
    if text.trim().is_empty() {
        return EmotionVector::NEUTRAL;
    }

    let scores = score(text);
    let emotions = scores.normalize();
    tracing::debug!(
        matched = scores.matched.len(),
        dominant = %emotions.dominant(),
        "extracted emotions"
    );
    emotions
}

#[cfg(test)]
mod tests {
    use super::super::keywords::KeywordRule;
    use super::*;

    const SCENARIO: &str =
        "I was afraid of falling into the dark ocean, but a friend pulled me back to light.";

    #[test]
    fn empty_and_blank_text_return_neutral_baseline() {
        assert_eq!(extract(""), EmotionVector::NEUTRAL);
        assert_eq!(extract("   \n\t"), EmotionVector::NEUTRAL);
    }

    #[test]
    fn text_without_keywords_falls_back_to_neutral() {
        assert_eq!(extract("the spreadsheet had twelve columns"), EmotionVector::NEUTRAL);
    }

    #[test]
    fn scenario_registers_expected_dimensions() {
        let scores = score(SCENARIO);
        for dimension in [
            Dimension::Fear,
            Dimension::Calm,
            Dimension::Mystery,
            Dimension::Connection,
            Dimension::Transformation,
        ] {
            assert!(
                scores.get(dimension) > BASE_SCORE,
                "{dimension} should exceed the baseline, got {}",
                scores.get(dimension)
            );
        }
        assert_eq!(scores.get(Dimension::Desire), BASE_SCORE);
        for keyword in ["afraid", "falling", "dark", "ocean", "friend", "light"] {
            assert!(scores.matched.contains(&keyword), "missing {keyword}");
        }
        assert!(!scores.matched.contains(&"fall"));

        let emotions = extract(SCENARIO);
        assert_eq!(emotions.dominant(), Dimension::Fear);
        assert_eq!(emotions.get(Dimension::Fear), 1.0);
        assert_eq!(emotions.get(Dimension::Desire), 0.0);
        assert!(emotions.get(Dimension::Connection) > 0.0);
    }

    #[test]
    fn keywords_inside_longer_words_do_not_count() {
        let scores = score("a huge wave while searching for my keyboard in the lightning");
        assert!(scores.matched.is_empty());
        assert_eq!(extract("a huge crowd"), EmotionVector::NEUTRAL);
    }

    #[test]
    fn phrase_is_not_double_counted() {
        let with_phrase = score("a white dress");
        let plain = score("a dress");
        assert_eq!(with_phrase.matched, vec!["white dress"]);
        assert!((with_phrase.get(Dimension::Desire) - (BASE_SCORE + 0.15)).abs() < 1e-6);
        assert!((plain.get(Dimension::Desire) - (BASE_SCORE + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let once = score("dark");
        let thrice = score("dark dark dark");
        assert_eq!(once.raw, thrice.raw);
    }

    #[test]
    fn negative_weights_are_clamped_at_zero() {
        const RULES: &[KeywordRule] = &[KeywordRule {
            phrase: "storm",
            contributions: &[(Dimension::Calm, -5.0), (Dimension::Fear, 0.4)],
        }];
        let table = KeywordTable::new(RULES).unwrap();
        let scores = score_with(&table, "a storm");
        assert_eq!(scores.get(Dimension::Calm), 0.0);

        let emotions = scores.normalize();
        assert_eq!(emotions.get(Dimension::Calm), 0.0);
        assert_eq!(emotions.get(Dimension::Fear), 1.0);
        assert!((emotions.get(Dimension::Desire) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn output_always_within_unit_range() {
        for text in [
            SCENARIO,
            "fight fight alone trapped",
            "love kiss wedding white dress gold beautiful",
            "ÜBER strange 🌙 portal",
        ] {
            for (_, value) in extract(text).iter() {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
