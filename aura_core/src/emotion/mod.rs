//! Emotion model: the six dimensions, the emotion vector and the rule-based
//! keyword extractor.

pub mod extractor;
pub mod keywords;
pub mod matcher;
pub mod vector;

pub use extractor::{extract, score, score_with, EmotionScores, BASE_SCORE};
pub use keywords::{KeywordRule, KeywordTable, TableError, BUILTIN_RULES};
pub use matcher::{match_phrases, PhraseMatch};
pub use vector::{Dimension, EmotionRangeError, EmotionVector};
