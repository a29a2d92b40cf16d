//! Helpers for taking Vietnamese characters apart and putting them together.
use crate::maps::{plain, tone_slot_of, toned, BREVE_MAP, CIRCUMFLEX_MAP, HORN_MAP, STROKE_MAP, VOWELS};
use crate::transform::{Modifier, Tone};

/// Whether a lowercase, tone-less character is a vowel letter.
pub fn is_vowel(ch: char) -> bool {
    VOWELS.contains(&ch)
}

/// Remove the tone mark from a character, keeping its shape modifier.
pub fn strip_tone(ch: char) -> char {
    tone_slot_of(ch).map(|(base, _)| base).unwrap_or(ch)
}

/// The tone mark a character carries, if any.
pub fn tone_of(ch: char) -> Option<Tone> {
    tone_slot_of(ch).and_then(|(_, slot)| Tone::from_slot(slot))
}

/// The shape modifier of a tone-less character, if any.
pub fn modifier_of(ch: char) -> Option<Modifier> {
    match ch {
        'â' | 'ê' | 'ô' => Some(Modifier::Circumflex),
        'ă' => Some(Modifier::Breve),
        'ơ' | 'ư' => Some(Modifier::Horn),
        'đ' => Some(Modifier::Stroke),
        _ => None,
    }
}

/// Strip tone mark and shape modifier down to the plain ASCII letter.
pub fn clean_char(ch: char) -> char {
    plain(strip_tone(ch))
}

/// Compose a plain lowercase base letter with an optional shape modifier.
pub fn compose(base: char, modifier: Option<Modifier>) -> char {
    let map = match modifier {
        None => return base,
        Some(Modifier::Circumflex) => &CIRCUMFLEX_MAP,
        Some(Modifier::Breve) => &BREVE_MAP,
        Some(Modifier::Horn) => &HORN_MAP,
        Some(Modifier::Stroke) => &STROKE_MAP,
    };
    *map.get(&base).unwrap_or(&base)
}

/// Put a tone mark onto a composed lowercase character.
pub fn apply_tone_char(ch: char, tone: Tone) -> char {
    toned(ch, tone.slot())
}

/// Uppercase a single character through Unicode case mapping.
pub fn to_upper(ch: char) -> char {
    ch.to_uppercase().next().unwrap_or(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_roundtrip() {
        // ậ = a + circumflex + underdot
        assert_eq!(strip_tone('ậ'), 'â');
        assert_eq!(tone_of('ậ'), Some(Tone::Underdot));
        assert_eq!(modifier_of('â'), Some(Modifier::Circumflex));
        assert_eq!(clean_char('ậ'), 'a');

        let composed = compose('a', Some(Modifier::Circumflex));
        assert_eq!(apply_tone_char(composed, Tone::Underdot), 'ậ');
    }

    #[test]
    fn plain_letters_pass_through() {
        assert_eq!(clean_char('t'), 't');
        assert_eq!(tone_of('t'), None);
        assert_eq!(compose('t', None), 't');
    }

    #[test]
    fn vowel_set_includes_modified_forms() {
        assert!(is_vowel('a'));
        assert!(is_vowel('ư'));
        assert!(!is_vowel('b'));
        assert!(!is_vowel('đ'));
    }
}
