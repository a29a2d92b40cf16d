//! The syllable buffer: the word currently under composition.
//!
//! The buffer holds the word as a sequence of [`Grapheme`]s (base letter plus
//! optional shape modifier plus case) with the tone stored once per syllable;
//! the rendered tone position is recomputed from the orthography rules every
//! time, so a tone placed on `hoà` migrates to `hoàn` by itself when the coda
//! arrives.
//!
//! Alongside the graphemes, the buffer records the raw keys typed for the
//! word in their original order. Each raw key is attributed to the grapheme
//! it created or modified, which is what makes backspace exact: deleting one
//! visible character also deletes the keystrokes that produced it, and
//! replaying the remaining raw keys on a fresh engine reproduces the buffer.
use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;

use crate::config::ToneStyle;
use crate::orthography;
use crate::parsing::split_syllable;
use crate::transform::{Modifier, Tone};
use crate::util::{apply_tone_char, compose, to_upper};
use crate::validation::{classify, Shape};

/// One user-visible character of the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grapheme {
    /// Plain ASCII letter (or digit), always lowercase.
    pub base: char,
    pub modifier: Option<Modifier>,
    pub caps: bool,
}

impl Grapheme {
    pub fn new(ch: char) -> Self {
        Self {
            base: ch.to_ascii_lowercase(),
            modifier: None,
            caps: ch.is_ascii_uppercase(),
        }
    }

    /// The lowercase character with its modifier applied, before tone.
    pub fn composed(&self) -> char {
        compose(self.base, self.modifier)
    }
}

#[derive(Debug, Clone, Copy)]
struct RawKey {
    ch: char,
    slot: u8,
}

/// Structural view of the buffer: onset / nucleus / coda lengths in
/// graphemes, plus the shape classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSyllable {
    pub onset_len: usize,
    pub nucleus_len: usize,
    pub coda_len: usize,
    pub shape: Shape,
}

impl ParsedSyllable {
    pub fn nucleus_range(&self) -> Range<usize> {
        self.onset_len..self.onset_len + self.nucleus_len
    }

    pub fn has_coda(&self) -> bool {
        self.coda_len > 0
    }
}

/// The word under composition.
#[derive(Debug, Clone, Default)]
pub struct Syllable {
    graphemes: SmallVec<[Grapheme; 8]>,
    tone: Option<Tone>,
    style: ToneStyle,
    raw: SmallVec<[RawKey; 12]>,
}

impl Syllable {
    pub fn with_style(style: ToneStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Number of graphemes; each renders as exactly one visible character.
    pub fn len(&self) -> usize {
        self.graphemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    pub fn graphemes(&self) -> &[Grapheme] {
        &self.graphemes
    }

    pub fn grapheme_mut(&mut self, index: usize) -> &mut Grapheme {
        &mut self.graphemes[index]
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    pub fn set_tone(&mut self, tone: Option<Tone>) {
        self.tone = tone;
    }

    pub fn style(&self) -> ToneStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ToneStyle) {
        self.style = style;
    }

    /// Append a letter grapheme and record its raw key. Returns the index of
    /// the new grapheme.
    pub fn push_letter(&mut self, ch: char) -> usize {
        self.push_grapheme(ch, ch)
    }

    /// Append a grapheme produced by a different raw key (the Telex `w` that
    /// inserts `ư` records `w`, not `u`).
    pub fn push_grapheme(&mut self, ch: char, raw: char) -> usize {
        let index = self.graphemes.len();
        self.graphemes.push(Grapheme::new(ch));
        self.raw.push(RawKey { ch: raw, slot: index as u8 });
        index
    }

    /// Record a consumed trigger key against the grapheme it affected.
    pub fn attach_raw(&mut self, ch: char, slot: usize) {
        self.raw.push(RawKey { ch, slot: slot as u8 });
    }

    /// Move the most recent raw key matching `ch` from one grapheme to
    /// another. Used when a cancelled transformation turns its trigger into a
    /// literal letter: the old trigger key follows the new grapheme so that a
    /// backspace removes both.
    pub fn reattach_last_raw(&mut self, ch: char, from: usize, to: usize) {
        if let Some(raw) = self
            .raw
            .iter_mut()
            .rev()
            .find(|r| r.ch.eq_ignore_ascii_case(&ch) && r.slot == from as u8)
        {
            raw.slot = to as u8;
        }
    }

    /// Delete the last grapheme together with the raw keys attributed to it.
    /// Dropping the tone carrier also drops the tone.
    pub fn pop(&mut self) -> Option<Grapheme> {
        if self.graphemes.is_empty() {
            return None;
        }
        let index = self.graphemes.len() - 1;
        if self.tone.is_some() && self.tone_index() == Some(index) {
            self.tone = None;
        }
        let grapheme = self.graphemes.pop();
        self.raw.retain(|r| r.slot != index as u8);

        if self.graphemes.is_empty() {
            self.tone = None;
            self.raw.clear();
        } else if self.tone.is_some() && self.parse().nucleus_len == 0 {
            self.tone = None;
        }
        grapheme
    }

    pub fn clear(&mut self) {
        self.graphemes.clear();
        self.raw.clear();
        self.tone = None;
    }

    /// Tone-less lowercase skeleton, one character per grapheme.
    pub fn skeleton(&self) -> String {
        self.graphemes.iter().map(|g| g.composed()).collect()
    }

    /// Decompose and classify the current buffer.
    pub fn parse(&self) -> ParsedSyllable {
        let skeleton = self.skeleton();
        let parts = split_syllable(&skeleton);
        ParsedSyllable {
            onset_len: parts.onset.chars().count(),
            nucleus_len: parts.nucleus.chars().count(),
            coda_len: parts.coda.chars().count(),
            shape: classify(&parts),
        }
    }

    /// The grapheme the tone mark renders on, per the orthography rules.
    pub fn tone_index(&self) -> Option<usize> {
        orthography::tone_index(self, &self.parse())
    }

    /// The fully composed, NFC-normalized rendering of the word.
    pub fn render(&self) -> String {
        let mut chars: Vec<char> = self.graphemes.iter().map(Grapheme::composed).collect();
        if let Some(tone) = self.tone {
            if let Some(index) = self.tone_index() {
                chars[index] = apply_tone_char(chars[index], tone);
            }
        }
        for (index, grapheme) in self.graphemes.iter().enumerate() {
            if grapheme.caps {
                chars[index] = to_upper(chars[index]);
            }
        }
        chars.into_iter().collect()
    }

    /// The raw keys typed for this word, in original order and case.
    pub fn raw_ascii(&self) -> String {
        self.raw.iter().map(|r| r.ch).collect()
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(word: &str) -> Syllable {
        let mut s = Syllable::default();
        for ch in word.chars() {
            s.push_letter(ch);
        }
        s
    }

    #[test]
    fn render_composes_modifier_then_tone() {
        let mut s = typed("viet");
        s.grapheme_mut(2).modifier = Some(Modifier::Circumflex);
        s.set_tone(Some(Tone::Underdot));
        assert_eq!(s.render(), "việt");
        assert_eq!(s.skeleton(), "viêt");
    }

    #[test]
    fn case_is_preserved() {
        let mut s = typed("Viet");
        s.grapheme_mut(2).modifier = Some(Modifier::Circumflex);
        s.set_tone(Some(Tone::Underdot));
        assert_eq!(s.render(), "Việt");
        assert_eq!(s.raw_ascii(), "Viet");
    }

    #[test]
    fn pop_removes_attributed_raw_keys() {
        let mut s = typed("vi");
        let e = s.push_letter('e');
        s.attach_raw('e', e);
        s.grapheme_mut(e).modifier = Some(Modifier::Circumflex);
        s.push_letter('t');
        assert_eq!(s.raw_ascii(), "vieet");

        s.pop();
        assert_eq!(s.raw_ascii(), "viee");
        s.pop();
        assert_eq!(s.raw_ascii(), "vi");
        assert_eq!(s.render(), "vi");
    }

    #[test]
    fn popping_tone_carrier_drops_tone() {
        let mut s = typed("vie");
        s.grapheme_mut(2).modifier = Some(Modifier::Circumflex);
        s.set_tone(Some(Tone::Underdot));
        s.attach_raw('j', 2);
        assert_eq!(s.render(), "việ");

        s.pop();
        assert_eq!(s.tone(), None);
        assert_eq!(s.render(), "vi");
        assert_eq!(s.raw_ascii(), "vi");
    }

    #[test]
    fn tone_relocates_with_the_coda() {
        let mut s = typed("toa");
        s.set_tone(Some(Tone::Acute));
        assert_eq!(s.render(), "toá");
        s.push_letter('n');
        assert_eq!(s.render(), "toán");
    }

    #[test]
    fn parse_reports_shape() {
        let s = typed("toan");
        let parsed = s.parse();
        assert_eq!(parsed.onset_len, 1);
        assert_eq!(parsed.nucleus_range(), 1..3);
        assert!(parsed.has_coda());
        assert_eq!(parsed.shape, Shape::Valid);
    }
}
