//! Shape validation for Vietnamese syllables.
//!
//! A syllable is one optional onset cluster, a nucleus of one to three
//! vowels, and an optional coda cluster. The inventories below are closed
//! sets; anything outside them is an `Invalid` shape, which is meaningful to
//! the engine: tones are refused on invalid shapes (unless `free_tone`) and
//! smart mode marks the word as foreign.
use phf::{phf_set, Set};

use crate::parsing::SyllableParts;
use crate::util::clean_char;

static ONSETS: Set<&'static str> = phf_set![
    "b", "c", "ch", "d", "đ", "g", "gh", "gi", "h", "k", "kh", "l", "m", "n", "ng", "ngh", "nh",
    "p", "ph", "q", "qu", "r", "s", "t", "th", "tr", "v", "x",
];

static CODAS: Set<&'static str> = phf_set!["c", "ch", "m", "n", "ng", "nh", "p", "t"];

/// Valid nucleus patterns, written without modifiers (ươ is "uo", iê is "ie").
static NUCLEI: Set<&'static str> = phf_set![
    "a", "ai", "ao", "au", "ay", "e", "eo", "eu", "i", "ia", "ie", "ieu", "io", "iu", "o", "oa",
    "oai", "oao", "oay", "oe", "oeo", "oi", "oo", "u", "ua", "uay", "ue", "ui", "uo", "uoi", "uou",
    "uu", "uy", "uya", "uye", "uyu", "y", "ye", "yeu",
];

/// Classification of a grapheme sequence against the syllable shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Nothing typed yet.
    Empty,
    /// Only onset consonants so far; legal as a prefix of a real syllable.
    ConsonantOnly,
    /// Onset + nucleus (+ coda) all inside the inventories.
    Valid,
    /// Does not match any Vietnamese syllable shape.
    Invalid,
}

/// Classify parsed syllable parts.
pub fn classify(parts: &SyllableParts) -> Shape {
    if parts.onset.is_empty() && parts.nucleus.is_empty() && parts.coda.is_empty() {
        return Shape::Empty;
    }

    if parts.nucleus.is_empty() {
        // The parser only leaves a coda behind a nucleus, so this is a pure
        // consonant run.
        return if ONSETS.contains(parts.onset) {
            Shape::ConsonantOnly
        } else {
            Shape::Invalid
        };
    }

    if !parts.onset.is_empty() && !ONSETS.contains(parts.onset) {
        return Shape::Invalid;
    }
    if !parts.coda.is_empty() && !CODAS.contains(parts.coda) {
        return Shape::Invalid;
    }

    let cleaned: String = parts.nucleus.chars().map(clean_char).collect();
    if !NUCLEI.contains(cleaned.as_str()) {
        return Shape::Invalid;
    }

    Shape::Valid
}

/// Whether a skeleton string is a legal Vietnamese syllable or prefix.
pub fn is_valid_syllable(skeleton: &str) -> bool {
    classify(&crate::parsing::split_syllable(skeleton)) != Shape::Invalid
}
