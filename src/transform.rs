//! Transformations that tone and mark keys perform on the syllable in
//! progress.
//!
//! Every operation reports a [`Transformation`] describing what actually
//! happened, because the engine reacts differently to each outcome: an added
//! mark becomes a replacement edit, a removed mark becomes an undo (plus a
//! literal trigger letter in Telex), and an ignored intent falls back to the
//! raw key.
//!
//! Re-applying a tone or modifier the syllable already carries removes it.
//! That toggle is what makes the double-press undo work: `as` + `s` goes back
//! to `as`, and a VNI `6` on a syllable that already has a circumflex strips
//! the circumflex again even when letters were typed in between.

use crate::syllable::Syllable;
use crate::validation::Shape;

/// One of the five Vietnamese tone marks.
///
/// - **Acute:** dấu sắc
/// - **Grave:** dấu huyền
/// - **HookAbove:** dấu hỏi
/// - **Tilde:** dấu ngã
/// - **Underdot:** dấu nặng
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Acute,
    Grave,
    HookAbove,
    Tilde,
    Underdot,
}

impl Tone {
    /// Index of this tone in the composition table rows.
    pub(crate) fn slot(self) -> usize {
        match self {
            Tone::Acute => 0,
            Tone::Grave => 1,
            Tone::HookAbove => 2,
            Tone::Tilde => 3,
            Tone::Underdot => 4,
        }
    }

    pub(crate) fn from_slot(slot: usize) -> Option<Tone> {
        Some(match slot {
            0 => Tone::Acute,
            1 => Tone::Grave,
            2 => Tone::HookAbove,
            3 => Tone::Tilde,
            4 => Tone::Underdot,
            _ => return None,
        })
    }
}

/// A shape modification of a base letter.
///
/// - **Circumflex:** â, ê, ô
/// - **Breve:** ă
/// - **Horn:** ơ, ư
/// - **Stroke:** đ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Circumflex,
    Breve,
    Horn,
    Stroke,
}

/// What a transformation did to the syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    ToneMarkAdded,
    ToneMarkRemoved,
    ModificationAdded,
    ModificationRemoved,
    Ignored,
}

/// Longest syllable in the language is seven letters (nghiêng); anything
/// longer cannot be Vietnamese and transformations refuse to touch it.
const MAX_SYLLABLE_LEN: usize = 7;

/// Apply `tone` to the syllable, or remove it when it is already present.
///
/// Returns the transformation together with the nucleus position the tone
/// sits on (for an add) or sat on (for a removal).
pub fn add_tone(syllable: &mut Syllable, tone: Tone, free_tone: bool) -> (Transformation, Option<usize>) {
    if syllable.len() > MAX_SYLLABLE_LEN {
        return (Transformation::Ignored, None);
    }

    let parsed = syllable.parse();
    if parsed.nucleus_len == 0 {
        return (Transformation::Ignored, None);
    }
    if !free_tone && parsed.shape == Shape::Invalid {
        return (Transformation::Ignored, None);
    }

    if syllable.tone() == Some(tone) {
        let carrier = syllable.tone_index();
        syllable.set_tone(None);
        return (Transformation::ToneMarkRemoved, carrier);
    }

    syllable.set_tone(Some(tone));
    let carrier = syllable.tone_index();
    (Transformation::ToneMarkAdded, carrier)
}

/// Remove whatever tone the syllable carries (Telex `z`, VNI `0`).
pub fn remove_tone(syllable: &mut Syllable) -> (Transformation, Option<usize>) {
    if syllable.tone().is_none() {
        return (Transformation::Ignored, None);
    }
    let carrier = syllable.tone_index();
    syllable.set_tone(None);
    (Transformation::ToneMarkRemoved, carrier)
}

/// Apply a circumflex.
///
/// With `family` set (Telex doubled-vowel rule) the target must be the last
/// nucleus vowel, still plain and equal to the trigger letter. Without it
/// (VNI `6`) the last `a`/`e`/`o`-family vowel in the nucleus is modified,
/// replacing a different modifier if one is present, and a circumflex that is
/// already there is toggled off.
pub fn apply_circumflex(syllable: &mut Syllable, family: Option<char>) -> (Transformation, Option<usize>) {
    if syllable.len() > MAX_SYLLABLE_LEN {
        return (Transformation::Ignored, None);
    }
    let nucleus = syllable.parse().nucleus_range();

    match family {
        Some(letter) => {
            // The decoder guarantees the last nucleus vowel is a plain match,
            // but the state may have shifted; re-check instead of trusting it.
            let Some(last) = nucleus.clone().last() else {
                return (Transformation::Ignored, None);
            };
            let g = syllable.graphemes()[last];
            if g.base == letter && g.modifier.is_none() {
                syllable.grapheme_mut(last).modifier = Some(Modifier::Circumflex);
                (Transformation::ModificationAdded, Some(last))
            } else {
                (Transformation::Ignored, None)
            }
        }
        None => {
            if let Some(i) = nucleus
                .clone()
                .rev()
                .find(|&i| syllable.graphemes()[i].modifier == Some(Modifier::Circumflex))
            {
                syllable.grapheme_mut(i).modifier = None;
                return (Transformation::ModificationRemoved, Some(i));
            }
            if let Some(i) = nucleus
                .rev()
                .find(|&i| matches!(syllable.graphemes()[i].base, 'a' | 'e' | 'o'))
            {
                syllable.grapheme_mut(i).modifier = Some(Modifier::Circumflex);
                return (Transformation::ModificationAdded, Some(i));
            }
            (Transformation::Ignored, None)
        }
    }
}

/// Apply a breve to the `a` of the nucleus, toggling it off when present.
pub fn apply_breve(syllable: &mut Syllable) -> (Transformation, Option<usize>) {
    if syllable.len() > MAX_SYLLABLE_LEN {
        return (Transformation::Ignored, None);
    }
    let nucleus = syllable.parse().nucleus_range();

    if let Some(i) = nucleus
        .clone()
        .rev()
        .find(|&i| syllable.graphemes()[i].modifier == Some(Modifier::Breve))
    {
        syllable.grapheme_mut(i).modifier = None;
        return (Transformation::ModificationRemoved, Some(i));
    }
    if let Some(i) = nucleus.rev().find(|&i| syllable.graphemes()[i].base == 'a') {
        syllable.grapheme_mut(i).modifier = Some(Modifier::Breve);
        return (Transformation::ModificationAdded, Some(i));
    }
    (Transformation::Ignored, None)
}

/// Apply a horn.
///
/// The `uo` pair takes the horn on both letters (so `dduocw` composes `đươc`
/// and a half-formed `ưo` is completed rather than toggled). A fully horned
/// target is toggled back off. The `oa` nucleus never takes a horn.
pub fn apply_horn(syllable: &mut Syllable) -> (Transformation, Option<usize>) {
    if syllable.len() > MAX_SYLLABLE_LEN {
        return (Transformation::Ignored, None);
    }
    let nucleus = syllable.parse().nucleus_range();
    let bases: Vec<char> = nucleus.clone().map(|i| syllable.graphemes()[i].base).collect();

    if bases == ['o', 'a'] {
        return (Transformation::Ignored, None);
    }

    // uo pair: horn both, or toggle both off once fully formed.
    if let Some(pos) = bases.windows(2).position(|w| w == ['u', 'o']) {
        let u = nucleus.start + pos;
        let o = u + 1;
        let both_horned = syllable.graphemes()[u].modifier == Some(Modifier::Horn)
            && syllable.graphemes()[o].modifier == Some(Modifier::Horn);
        if both_horned {
            syllable.grapheme_mut(u).modifier = None;
            syllable.grapheme_mut(o).modifier = None;
            return (Transformation::ModificationRemoved, Some(u));
        }
        syllable.grapheme_mut(u).modifier = Some(Modifier::Horn);
        syllable.grapheme_mut(o).modifier = Some(Modifier::Horn);
        return (Transformation::ModificationAdded, Some(u));
    }

    for target in ['u', 'o'] {
        if let Some(i) = nucleus.clone().find(|&i| syllable.graphemes()[i].base == target) {
            if syllable.graphemes()[i].modifier == Some(Modifier::Horn) {
                syllable.grapheme_mut(i).modifier = None;
                return (Transformation::ModificationRemoved, Some(i));
            }
            syllable.grapheme_mut(i).modifier = Some(Modifier::Horn);
            return (Transformation::ModificationAdded, Some(i));
        }
    }
    (Transformation::Ignored, None)
}

/// Stroke the leading `d` (the `dd`/`d9` rule), toggling a stroked one back.
pub fn apply_stroke(syllable: &mut Syllable) -> (Transformation, Option<usize>) {
    let Some(first) = syllable.graphemes().first().copied() else {
        return (Transformation::Ignored, None);
    };
    if first.base != 'd' {
        return (Transformation::Ignored, None);
    }
    if first.modifier == Some(Modifier::Stroke) {
        syllable.grapheme_mut(0).modifier = None;
        return (Transformation::ModificationRemoved, Some(0));
    }
    if first.modifier.is_none() {
        syllable.grapheme_mut(0).modifier = Some(Modifier::Stroke);
        return (Transformation::ModificationAdded, Some(0));
    }
    (Transformation::Ignored, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syllable::Syllable;

    fn syllable_from(word: &str) -> Syllable {
        let mut s = Syllable::default();
        for ch in word.chars() {
            s.push_letter(ch);
        }
        s
    }

    #[test]
    fn add_tone_places_and_toggles() {
        let mut s = syllable_from("la");
        let (t, _) = add_tone(&mut s, Tone::Acute, false);
        assert_eq!(t, Transformation::ToneMarkAdded);
        assert_eq!(s.render(), "lá");

        let (t, _) = add_tone(&mut s, Tone::Acute, false);
        assert_eq!(t, Transformation::ToneMarkRemoved);
        assert_eq!(s.render(), "la");
    }

    #[test]
    fn add_tone_replaces_different_tone() {
        let mut s = syllable_from("la");
        add_tone(&mut s, Tone::Acute, false);
        let (t, _) = add_tone(&mut s, Tone::Grave, false);
        assert_eq!(t, Transformation::ToneMarkAdded);
        assert_eq!(s.render(), "là");
    }

    #[test]
    fn add_tone_refuses_consonants() {
        let mut s = syllable_from("th");
        let (t, _) = add_tone(&mut s, Tone::Acute, false);
        assert_eq!(t, Transformation::Ignored);
    }

    #[test]
    fn add_tone_respects_free_tone() {
        let mut s = syllable_from("xek");
        assert_eq!(add_tone(&mut s, Tone::Acute, false).0, Transformation::Ignored);
        assert_eq!(add_tone(&mut s, Tone::Acute, true).0, Transformation::ToneMarkAdded);
    }

    #[test]
    fn circumflex_family_needs_plain_match() {
        let mut s = syllable_from("vie");
        let (t, _) = apply_circumflex(&mut s, Some('e'));
        assert_eq!(t, Transformation::ModificationAdded);
        assert_eq!(s.render(), "viê");

        // Second application: the vowel is no longer plain.
        let (t, _) = apply_circumflex(&mut s, Some('e'));
        assert_eq!(t, Transformation::Ignored);
    }

    #[test]
    fn circumflex_vni_toggles() {
        let mut s = syllable_from("vie");
        apply_circumflex(&mut s, None);
        assert_eq!(s.render(), "viê");
        let (t, _) = apply_circumflex(&mut s, None);
        assert_eq!(t, Transformation::ModificationRemoved);
        assert_eq!(s.render(), "vie");
    }

    #[test]
    fn horn_completes_uo_pair() {
        let mut s = syllable_from("duoc");
        let (t, _) = apply_horn(&mut s);
        assert_eq!(t, Transformation::ModificationAdded);
        assert_eq!(s.render(), "dươc");
    }

    #[test]
    fn horn_half_formed_pair_is_completed_not_toggled() {
        let mut s = syllable_from("du");
        apply_horn(&mut s);
        assert_eq!(s.render(), "dư");
        s.push_letter('o');
        let (t, _) = apply_horn(&mut s);
        assert_eq!(t, Transformation::ModificationAdded);
        assert_eq!(s.render(), "dươ");
    }

    #[test]
    fn horn_refuses_oa() {
        let mut s = syllable_from("hoa");
        assert_eq!(apply_horn(&mut s).0, Transformation::Ignored);
    }

    #[test]
    fn stroke_first_d_only() {
        let mut s = syllable_from("di");
        let (t, _) = apply_stroke(&mut s);
        assert_eq!(t, Transformation::ModificationAdded);
        assert_eq!(s.render(), "đi");

        let mut s = syllable_from("vi");
        assert_eq!(apply_stroke(&mut s).0, Transformation::Ignored);
    }
}
