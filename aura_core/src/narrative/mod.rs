//! Tarot-style reading assembled from the emotion vector.
//!
//! Every sentence comes from a fixed template chosen by threshold rules over
//! the ranked emotions, so the reading is a pure function of its inputs.

pub mod symbols;

use serde::{Deserialize, Serialize};

use crate::emotion::{Dimension, EmotionVector};
pub use symbols::{detect_symbols, Symbol, SYMBOLS};

/// Fear or Mystery above this reads as facing something avoided.
pub const SHADOW_THRESHOLD: f32 = 0.55;
/// A guidance sentence is added for each dimension above this.
pub const GUIDANCE_THRESHOLD: f32 = 0.5;
/// At most this many symbols are named in the shadow text.
pub const MAX_SHADOW_SYMBOLS: usize = 3;

const DEFAULT_GUIDANCE: &str = "Take time to name how you feel in waking life, and move one small \
step toward what you truly want.";

/// The three-part reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeReading {
    pub shadow: String,
    pub energy: String,
    pub guidance: String,
}

fn energy_phrase(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Fear => "a tense, watchful charge",
        Dimension::Desire => "a warm pull toward what you long for",
        Dimension::Calm => "a slow, steady stillness",
        Dimension::Mystery => "a shimmer of the unknown",
        Dimension::Connection => "a current of closeness with others",
        Dimension::Transformation => "a restless force of change",
    }
}

fn guidance_sentence(dimension: Dimension) -> Option<&'static str> {
    match dimension {
        Dimension::Transformation => Some(
            "Something in you is ready to change; let one old habit or story go this week.",
        ),
        Dimension::Calm => {
            Some("Protect the quiet you found here: give yourself unhurried time to rest.")
        }
        Dimension::Connection => {
            Some("Reach out to someone you trust and share a part of this dream with them.")
        }
        _ => None,
    }
}

/// Builds the shadow, energy and guidance texts.
///
/// # Examples
///
/// ```
/// use aura_core::narrative::{detect_symbols, narrate};
/// use aura_core::EmotionVector;
///
/// let emotions = EmotionVector::new([0.9, 0.1, 0.0, 0.7, 0.2, 0.6]).unwrap();
/// let reading = narrate(&emotions, &detect_symbols("a door in the fog"));
/// assert!(reading.shadow.contains("door"));
/// assert!(!reading.guidance.is_empty());
/// ```
pub fn narrate(emotions: &EmotionVector, symbols: &[Symbol]) -> NarrativeReading {
    NarrativeReading {
        shadow: shadow_text(emotions, symbols),
        energy: energy_text(emotions),
        guidance: guidance_text(emotions),
    }
}

fn shadow_text(emotions: &EmotionVector, symbols: &[Symbol]) -> String {
    let mut text = String::new();
    if !symbols.is_empty() {
        let named: Vec<&str> = symbols
            .iter()
            .take(MAX_SHADOW_SYMBOLS)
            .map(|symbol| symbol.name)
            .collect();
        text.push_str(&format!(
            "Your dream speaks through {}. ",
            join_names(&named)
        ));
    }

    if emotions.get(Dimension::Fear) > SHADOW_THRESHOLD
        || emotions.get(Dimension::Mystery) > SHADOW_THRESHOLD
    {
        text.push_str(
            "Your subconscious is asking you to face something you have been avoiding; \
             the unease is a signal, not a verdict.",
        );
    } else {
        text.push_str(
            "Your subconscious is gently sorting through mixed emotions and unresolved \
             questions, without urgency.",
        );
    }
    text
}

fn energy_text(emotions: &EmotionVector) -> String {
    let ranked = emotions.ranked();
    let mut top = ranked.iter().map(|(dimension, _)| *dimension);
    match (top.next(), top.next()) {
        (Some(first), Some(second)) => format!(
            "The aura energy is led by {} ({}), blended with {} ({}).",
            energy_phrase(first),
            first.name(),
            energy_phrase(second),
            second.name(),
        ),
        (Some(first), None) => format!(
            "The aura energy is led by {} ({}).",
            energy_phrase(first),
            first.name()
        ),
        _ => "The aura energy is quiet and undefined.".to_string(),
    }
}

fn guidance_text(emotions: &EmotionVector) -> String {
    let sentences: Vec<&str> = [
        Dimension::Transformation,
        Dimension::Calm,
        Dimension::Connection,
    ]
    .into_iter()
    .filter(|dimension| emotions.get(*dimension) > GUIDANCE_THRESHOLD)
    .filter_map(guidance_sentence)
    .collect();

    if sentences.is_empty() {
        DEFAULT_GUIDANCE.to_string()
    } else {
        sentences.join(" ")
    }
}

/// Short paragraph naming the dominant emotion and the detected symbols.
pub fn summarize(emotions: &EmotionVector, symbols: &[Symbol]) -> String {
    let dominant = emotions.dominant();
    let mut summary = format!(
        "This reading was assembled from the words of your dream. The strongest current is {}, \
         carrying {}.",
        dominant.name(),
        energy_phrase(dominant)
    );

    match symbols {
        [] => summary.push_str(" No familiar dream symbols stood out, so the colours speak alone."),
        [only] => summary.push_str(&format!(" The {} suggests {}.", only.name, only.meaning)),
        [first, rest @ ..] => {
            summary.push_str(&format!(" The {} suggests {}", first.name, first.meaning));
            let others: Vec<&str> = rest.iter().map(|symbol| symbol.name).collect();
            summary.push_str(&format!(", alongside {}.", join_names(&others)));
        }
    }
    summary
}

fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => format!("the {only}"),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|name| format!("the {name}")).collect();
            format!("{} and the {last}", head.join(", "))
        }
    }
}
