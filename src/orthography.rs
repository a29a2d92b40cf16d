//! Tone-placement rules.
//!
//! Given the parsed view of a syllable, decide which nucleus grapheme the
//! tone mark renders on:
//!
//! 1. A vowel already carrying a shape modifier outranks everything; with two
//!    modified vowels (`ươ`) the later one wins, which lands the tone on the
//!    `ơ` of `được` and the `ê` of `việt`.
//! 2. A single-vowel nucleus takes the tone itself.
//! 3. Modern style: the pairs `oa`, `oe`, `oo`, `uy`, `uo`, `ie` put the tone
//!    on their second letter (`hoà`, `toá`); other open two-vowel nuclei on
//!    the first (`mía`, `mùa`); everything else on the second.
//! 4. Traditional style: three vowels, or two with a coda, on the second;
//!    otherwise the first (`hòa`).
use crate::config::ToneStyle;
use crate::syllable::{ParsedSyllable, Syllable};

/// Nucleus pairs whose second vowel is the main vowel in modern placement.
const MAIN_SECOND_PAIRS: [&str; 6] = ["oa", "oe", "oo", "uy", "uo", "ie"];

/// Index of the grapheme the tone mark should render on, or `None` when the
/// syllable has no nucleus.
pub fn tone_index(syllable: &Syllable, parsed: &ParsedSyllable) -> Option<usize> {
    let nucleus = parsed.nucleus_range();
    if nucleus.is_empty() {
        return None;
    }

    if let Some(index) = nucleus
        .clone()
        .rev()
        .find(|&i| syllable.graphemes()[i].modifier.is_some())
    {
        return Some(index);
    }

    let start = nucleus.start;
    let len = parsed.nucleus_len;
    if len == 1 {
        return Some(start);
    }

    match syllable.style() {
        ToneStyle::Modern => {
            let nucleus_text: String = nucleus.map(|i| syllable.graphemes()[i].base).collect();
            if let Some(pos) = MAIN_SECOND_PAIRS
                .iter()
                .filter_map(|pair| nucleus_text.find(pair))
                .min()
            {
                return Some(start + pos + 1);
            }
            if !parsed.has_coda() && len == 2 {
                return Some(start);
            }
            Some(start + 1)
        }
        ToneStyle::Traditional => {
            if len == 3 || (len == 2 && parsed.has_coda()) {
                Some(start + 1)
            } else {
                Some(start)
            }
        }
    }
}
