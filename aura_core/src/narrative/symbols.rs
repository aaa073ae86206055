//! Dream symbols: recognised phrases with a one-line reading.

use serde::Serialize;

use crate::emotion::match_phrases;

/// A recognised dream symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: &'static str,
    pub meaning: &'static str,
}

const fn symbol(name: &'static str, meaning: &'static str) -> Symbol {
    Symbol { name, meaning }
}

/// Built-in symbol table. Names are lower-case phrases.
pub const SYMBOLS: &[Symbol] = &[
    symbol("ocean", "the vast unconscious and the moods moving beneath the surface"),
    symbol("sea", "the vast unconscious and the moods moving beneath the surface"),
    symbol("water", "emotion in motion, asking to be felt rather than held"),
    symbol("bridge", "a passage between two chapters of your life"),
    symbol("door", "an opportunity waiting to be opened"),
    symbol("threshold", "the moment just before a decision"),
    symbol("portal", "a sudden shift into an unfamiliar state of mind"),
    symbol("fog", "uncertainty that hides the next step"),
    symbol("shadow", "a part of yourself you have not fully met"),
    symbol("mirror", "self-reflection and how you see yourself"),
    symbol("white dress", "a new beginning or a commitment you are weighing"),
    symbol("wedding", "union, commitment and the merging of two paths"),
    symbol("exam", "a fear of being judged or found unprepared"),
    symbol("teeth", "worry about appearance, ageing or losing control"),
    symbol("falling", "a loss of footing or control in waking life"),
    symbol("flying", "freedom and rising above a situation"),
    symbol("chase", "something you are avoiding that keeps following you"),
    symbol("house", "the self and the rooms of your inner life"),
    symbol("key", "an answer you already hold"),
    symbol("snake", "renewal through shedding what no longer fits"),
    symbol("moon", "intuition and the cycles of feeling"),
    symbol("stairs", "gradual progress toward a higher view"),
    symbol("light", "clarity arriving after a long uncertainty"),
    symbol("rebirth", "a self that is being remade"),
    symbol("friend", "support, and the qualities you see in others"),
    symbol("baby", "a fragile new project or feeling that needs care"),
];

/// Symbols found in `text`, in order of first appearance, without duplicates.
pub fn detect_symbols(text: &str) -> Vec<Symbol> {
    let names: Vec<&str> = SYMBOLS.iter().map(|symbol| symbol.name).collect();
    match_phrases(text, &names)
        .into_iter()
        .map(|found| SYMBOLS[found.index])
        .collect()
}
