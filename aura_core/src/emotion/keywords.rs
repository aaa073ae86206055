//! Static keyword → emotion weight table.
//!
//! Each rule maps a lower-case keyword or phrase to one or more
//! `(Dimension, weight)` contributions. The table is validated once, on first
//! use, by [`KeywordTable::builtin`].

use std::collections::HashSet;
use std::sync::OnceLock;

use super::vector::Dimension;
use Dimension::{Calm, Connection, Desire, Fear, Mystery, Transformation};

/// One keyword rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordRule {
    pub phrase: &'static str,
    pub contributions: &'static [(Dimension, f32)],
}

const fn rule(phrase: &'static str, contributions: &'static [(Dimension, f32)]) -> KeywordRule {
    KeywordRule {
        phrase,
        contributions,
    }
}

/// Built-in keyword rules.
pub const BUILTIN_RULES: &[KeywordRule] = &[
    // fear
    rule("chase", &[(Fear, 0.2)]),
    rule("chasing", &[(Fear, 0.2)]),
    rule("chased", &[(Fear, 0.2)]),
    rule("afraid", &[(Fear, 0.2)]),
    rule("scared", &[(Fear, 0.2)]),
    rule("terrified", &[(Fear, 0.3)]),
    rule("nightmare", &[(Fear, 0.3), (Mystery, 0.1)]),
    rule("dark", &[(Fear, 0.2), (Mystery, 0.05)]),
    rule("darkness", &[(Fear, 0.2), (Mystery, 0.1)]),
    rule("monster", &[(Fear, 0.2)]),
    rule("monsters", &[(Fear, 0.2)]),
    rule("run away", &[(Fear, 0.2), (Connection, -0.05)]),
    rule("fall", &[(Fear, 0.2)]),
    rule("falling", &[(Fear, 0.2)]),
    rule("drowning", &[(Fear, 0.25), (Calm, -0.1)]),
    rule("trapped", &[(Fear, 0.2), (Transformation, -0.05)]),
    rule("lost", &[(Fear, 0.15), (Mystery, 0.1)]),
    rule("late", &[(Fear, 0.1)]),
    rule("exam", &[(Fear, 0.3), (Desire, 0.1)]),
    rule("test", &[(Fear, 0.3), (Desire, 0.1)]),
    rule("teeth", &[(Fear, 0.15), (Transformation, 0.1)]),
    rule("fight", &[(Fear, 0.1), (Connection, -0.2)]),
    rule("fighting", &[(Fear, 0.1), (Connection, -0.2)]),
    rule("alone", &[(Fear, 0.1), (Connection, -0.15)]),
    // desire
    rule("kiss", &[(Desire, 0.2), (Connection, 0.05)]),
    rule("love", &[(Desire, 0.2), (Connection, 0.1)]),
    rule("want", &[(Desire, 0.2)]),
    rule("wish", &[(Desire, 0.2)]),
    rule("date", &[(Desire, 0.2)]),
    rule("beautiful", &[(Desire, 0.2)]),
    rule("pretty", &[(Desire, 0.2)]),
    rule("wedding", &[(Desire, 0.2), (Connection, 0.1), (Transformation, 0.05)]),
    rule("white dress", &[(Desire, 0.15), (Transformation, 0.15)]),
    rule("dress", &[(Desire, 0.1)]),
    rule("gold", &[(Desire, 0.15)]),
    // calm
    rule("sea", &[(Calm, 0.25), (Mystery, 0.1)]),
    rule("ocean", &[(Calm, 0.25), (Mystery, 0.1)]),
    rule("water", &[(Calm, 0.05), (Mystery, 0.1)]),
    rule("beach", &[(Calm, 0.2)]),
    rule("floating", &[(Calm, 0.2)]),
    rule("fly", &[(Calm, 0.2)]),
    rule("flying", &[(Calm, 0.2), (Transformation, 0.05)]),
    rule("sky", &[(Calm, 0.2)]),
    rule("calm", &[(Calm, 0.2)]),
    rule("peaceful", &[(Calm, 0.2)]),
    rule("garden", &[(Calm, 0.15), (Connection, 0.05)]),
    rule("light", &[(Transformation, 0.15), (Calm, 0.1)]),
    rule("lights", &[(Transformation, 0.15), (Calm, 0.1)]),
    // mystery
    rule("fog", &[(Mystery, 0.2)]),
    rule("unknown", &[(Mystery, 0.2)]),
    rule("strange", &[(Mystery, 0.2)]),
    rule("mystery", &[(Mystery, 0.2)]),
    rule("mysterious", &[(Mystery, 0.2)]),
    rule("shadow", &[(Mystery, 0.2), (Fear, 0.05)]),
    rule("shadows", &[(Mystery, 0.2), (Fear, 0.05)]),
    rule("portal", &[(Mystery, 0.2), (Transformation, 0.1)]),
    rule("mirror", &[(Mystery, 0.15), (Transformation, 0.05)]),
    rule("moon", &[(Mystery, 0.15), (Calm, 0.05)]),
    rule("forest", &[(Mystery, 0.15)]),
    // connection
    rule("family", &[(Connection, 0.2)]),
    rule("friend", &[(Connection, 0.2)]),
    rule("friends", &[(Connection, 0.2)]),
    rule("together", &[(Connection, 0.2)]),
    rule("hug", &[(Connection, 0.2), (Calm, 0.05)]),
    rule("hugged", &[(Connection, 0.2), (Calm, 0.05)]),
    rule("group", &[(Connection, 0.2)]),
    rule("people", &[(Connection, 0.2)]),
    rule("mother", &[(Connection, 0.2)]),
    rule("father", &[(Connection, 0.2)]),
    rule("pulled me", &[(Connection, 0.1)]),
    // transformation
    rule("change", &[(Transformation, 0.2)]),
    rule("transform", &[(Transformation, 0.2)]),
    rule("transformation", &[(Transformation, 0.2)]),
    rule("reborn", &[(Transformation, 0.2)]),
    rule("rebirth", &[(Transformation, 0.2)]),
    rule("bridge", &[(Transformation, 0.2)]),
    rule("door", &[(Transformation, 0.2), (Mystery, 0.05)]),
    rule("threshold", &[(Transformation, 0.2)]),
    rule("train", &[(Transformation, 0.1)]),
    rule("butterfly", &[(Transformation, 0.2), (Calm, 0.05)]),
];

/// Reasons a keyword table fails validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("keyword rule #{index} has an empty phrase")]
    EmptyPhrase { index: usize },
    #[error("keyword '{phrase}' must be lower-case and trimmed")]
    NotNormalized { phrase: String },
    #[error("keyword '{phrase}' appears more than once")]
    Duplicate { phrase: String },
    #[error("keyword '{phrase}' has no contributions")]
    NoContributions { phrase: String },
    #[error("keyword '{phrase}' has an invalid weight {weight} for {dimension}")]
    InvalidWeight {
        phrase: String,
        dimension: Dimension,
        weight: f32,
    },
}

/// A validated keyword table.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
    phrases: Vec<&'static str>,
}

impl KeywordTable {
    /// Validates `rules` and builds a table from them.
    pub fn new(rules: &[KeywordRule]) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for (index, rule) in rules.iter().enumerate() {
            if rule.phrase.is_empty() {
                return Err(TableError::EmptyPhrase { index });
            }
            if rule.phrase != rule.phrase.trim() || rule.phrase != rule.phrase.to_lowercase() {
                return Err(TableError::NotNormalized {
                    phrase: rule.phrase.to_string(),
                });
            }
            if !seen.insert(rule.phrase) {
                return Err(TableError::Duplicate {
                    phrase: rule.phrase.to_string(),
                });
            }
            if rule.contributions.is_empty() {
                return Err(TableError::NoContributions {
                    phrase: rule.phrase.to_string(),
                });
            }
            for &(dimension, weight) in rule.contributions {
                if !weight.is_finite() || weight == 0.0 {
                    return Err(TableError::InvalidWeight {
                        phrase: rule.phrase.to_string(),
                        dimension,
                        weight,
                    });
                }
            }
        }

        Ok(Self {
            rules: rules.to_vec(),
            phrases: rules.iter().map(|rule| rule.phrase).collect(),
        })
    }

    /// The built-in table, validated once per process.
    ///
    /// A table that fails validation is reported and replaced by an empty
    /// one, which makes every extraction fall back to the neutral profile.
    pub fn builtin() -> &'static KeywordTable {
        static TABLE: OnceLock<KeywordTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            KeywordTable::new(BUILTIN_RULES).unwrap_or_else(|err| {
                tracing::error!("built-in keyword table is invalid: {err}");
                KeywordTable {
                    rules: Vec::new(),
                    phrases: Vec::new(),
                }
            })
        })
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn phrases(&self) -> &[&'static str] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
