//! Phrase matching shared by the keyword table and symbol detection.
//!
//! Phrases are tried longest first (by word count, then byte length). Every
//! occurrence of a matched phrase is consumed, so shorter phrases nested
//! inside it ("dress" in "white dress", "fall" in "falling") cannot match the
//! same span again. A match must cover whole words: the characters just
//! before and after it are not alphanumeric.

/// A phrase found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Index into the phrase slice passed to [`match_phrases`].
    pub index: usize,
    /// Byte offset of the first counted occurrence in the lower-cased text.
    pub position: usize,
}

/// Finds every phrase of `phrases` present in `text`.
///
/// Matching is case-insensitive; `phrases` are expected to be lower-case.
/// The result is ordered by first appearance in the text.
pub fn match_phrases(text: &str, phrases: &[&str]) -> Vec<PhraseMatch> {
    let lowered = text.to_lowercase();
    let mut order: Vec<usize> = (0..phrases.len()).collect();
    order.sort_by(|&a, &b| {
        word_count(phrases[b])
            .cmp(&word_count(phrases[a]))
            .then(phrases[b].len().cmp(&phrases[a].len()))
            .then(a.cmp(&b))
    });

    let mut consumed: Vec<(usize, usize)> = Vec::new();
    let mut matches = Vec::new();

    for idx in order {
        let phrase = phrases[idx];
        if phrase.is_empty() {
            continue;
        }

        let spans: Vec<(usize, usize)> = lowered
            .match_indices(phrase)
            .map(|(start, _)| (start, start + phrase.len()))
            .filter(|&(start, end)| {
                starts_word(&lowered, start)
                    && ends_word(&lowered, end)
                    && !overlaps(&consumed, start, end)
            })
            .collect();

        if let Some(&(first, _)) = spans.first() {
            matches.push(PhraseMatch {
                index: idx,
                position: first,
            });
            consumed.extend(spans);
        }
    }

    matches.sort_by_key(|m| (m.position, m.index));
    matches
}

fn word_count(phrase: &str) -> usize {
    phrase.split_whitespace().count()
}

fn starts_word(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

fn ends_word(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric())
}

fn overlaps(consumed: &[(usize, usize)], start: usize, end: usize) -> bool {
    consumed.iter().any(|&(s, e)| start < e && s < end)
}
