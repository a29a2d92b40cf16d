//! Typing-method definitions and the key decoder.
//!
//! The decoder maps one character of input, under the active method and the
//! current syllable, to an [`Intent`]. Tone triggers decode context-free (the
//! transformer falls back to a literal letter when the tone cannot apply);
//! the Telex vowel triggers are context-sensitive because the same key is
//! both a letter and a modifier:
//!
//! - `a`/`e`/`o` doubles the preceding plain vowel into a circumflex, so the
//!   third `a` of `aaa` is a letter again (`âa`);
//! - `w` is a horn, a breve, or the word-initial `ư` shortcut;
//! - `d` strokes the leading `d` of the word (`dd` → `đ`).
use phf::{phf_map, Map};

use crate::config::Config;
use crate::syllable::Syllable;
use crate::transform::{Modifier, Tone};

/// Supported typing conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    Telex,
    Vni,
}

/// What a key event means to the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// A plain letter to append.
    Letter(char),
    /// Put a tone mark on the syllable; the trigger key is retained for the
    /// literal fallback and the double-press undo.
    ToneMark(Tone, char),
    /// Modify a vowel (circumflex, breve, horn).
    VowelMod(Modifier, char),
    /// The `dd`/`d9` stroke producing `đ`.
    ConsonantMod(char),
    /// Strip the tone mark (Telex `z`, VNI `0`).
    RemoveTone(char),
    /// A character that participates in no rule.
    Passthrough(char),
    /// Word boundary; carries the boundary character when it is printable.
    Commit(Option<char>),
    /// Delete one user-visible grapheme.
    Backspace,
    /// Restore the raw ASCII spelling of the word (when enabled).
    Escape,
}

/// Telex tone triggers.
pub static TELEX_TONES: Map<char, Tone> = phf_map! {
    's' => Tone::Acute,
    'f' => Tone::Grave,
    'r' => Tone::HookAbove,
    'x' => Tone::Tilde,
    'j' => Tone::Underdot,
};

/// VNI tone triggers.
pub static VNI_TONES: Map<char, Tone> = phf_map! {
    '1' => Tone::Acute,
    '2' => Tone::Grave,
    '3' => Tone::HookAbove,
    '4' => Tone::Tilde,
    '5' => Tone::Underdot,
};

/// Decode one character against the current syllable.
///
/// `stroke_undo` is the engine's one-slot memo: it arms the `ddd` undo for
/// the keystroke immediately following a stroke.
pub fn decode(ch: char, syllable: &Syllable, config: &Config, stroke_undo: bool) -> Intent {
    match config.input_method {
        InputMethod::Telex => decode_telex(ch, syllable, stroke_undo),
        InputMethod::Vni => decode_vni(ch, syllable),
    }
}

fn decode_telex(ch: char, syllable: &Syllable, stroke_undo: bool) -> Intent {
    let lower = ch.to_ascii_lowercase();

    if let Some(&tone) = TELEX_TONES.get(&lower) {
        return Intent::ToneMark(tone, ch);
    }

    match lower {
        'z' => Intent::RemoveTone(ch),
        'a' | 'e' | 'o' if doubles_last_vowel(syllable, lower) => {
            Intent::VowelMod(Modifier::Circumflex, ch)
        }
        'w' => Intent::VowelMod(Modifier::Horn, ch),
        'd' if trailing_plain_d(syllable) || (stroke_undo && has_stroke(syllable)) => {
            Intent::ConsonantMod(ch)
        }
        _ if lower.is_ascii_alphabetic() => Intent::Letter(ch),
        _ => Intent::Passthrough(ch),
    }
}

fn decode_vni(ch: char, syllable: &Syllable) -> Intent {
    if let Some(&tone) = VNI_TONES.get(&ch) {
        return Intent::ToneMark(tone, ch);
    }

    match ch {
        '6' => Intent::VowelMod(Modifier::Circumflex, ch),
        '7' => Intent::VowelMod(Modifier::Horn, ch),
        '8' => Intent::VowelMod(Modifier::Breve, ch),
        '9' if stroke_target(syllable) => Intent::ConsonantMod(ch),
        '0' => Intent::RemoveTone(ch),
        _ if ch.is_ascii_alphabetic() => Intent::Letter(ch),
        _ => Intent::Passthrough(ch),
    }
}

/// The doubled-vowel circumflex rule: the last nucleus vowel must be the same
/// letter, still without a modifier. `â` followed by `a` is a plain letter.
fn doubles_last_vowel(syllable: &Syllable, letter: char) -> bool {
    let nucleus = syllable.parse().nucleus_range();
    nucleus
        .last()
        .map(|i| {
            let g = syllable.graphemes()[i];
            g.base == letter && g.modifier.is_none()
        })
        .unwrap_or(false)
}

fn trailing_plain_d(syllable: &Syllable) -> bool {
    syllable
        .graphemes()
        .last()
        .map(|g| g.base == 'd' && g.modifier.is_none())
        .unwrap_or(false)
}

fn has_stroke(syllable: &Syllable) -> bool {
    syllable
        .graphemes()
        .first()
        .map(|g| g.modifier == Some(Modifier::Stroke))
        .unwrap_or(false)
}

/// VNI `9` fires when there is a `d` to stroke or un-stroke; otherwise the
/// digit is a literal.
fn stroke_target(syllable: &Syllable) -> bool {
    syllable
        .graphemes()
        .first()
        .map(|g| g.base == 'd')
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn typed(word: &str) -> Syllable {
        let mut s = Syllable::default();
        for ch in word.chars() {
            s.push_letter(ch);
        }
        s
    }

    fn telex() -> Config {
        Config::default()
    }

    fn vni() -> Config {
        Config {
            input_method: InputMethod::Vni,
            ..Config::default()
        }
    }

    #[test]
    fn telex_tone_triggers() {
        let s = typed("toa");
        assert_eq!(
            decode('s', &s, &telex(), false),
            Intent::ToneMark(Tone::Acute, 's')
        );
        assert_eq!(
            decode('J', &s, &telex(), false),
            Intent::ToneMark(Tone::Underdot, 'J')
        );
    }

    #[test]
    fn doubled_vowel_becomes_circumflex() {
        let s = typed("vie");
        assert_eq!(
            decode('e', &s, &telex(), false),
            Intent::VowelMod(Modifier::Circumflex, 'e')
        );
        // Different vowel: plain letter.
        assert_eq!(decode('a', &s, &telex(), false), Intent::Letter('a'));
    }

    #[test]
    fn modified_vowel_no_longer_doubles() {
        let mut s = typed("a");
        s.grapheme_mut(0).modifier = Some(Modifier::Circumflex);
        // Buffer is now `â`; another `a` is a letter.
        assert_eq!(decode('a', &s, &telex(), false), Intent::Letter('a'));
    }

    #[test]
    fn dd_decodes_as_stroke() {
        let s = typed("d");
        assert_eq!(decode('d', &s, &telex(), false), Intent::ConsonantMod('d'));
        let s = typed("vi");
        assert_eq!(decode('d', &s, &telex(), false), Intent::Letter('d'));
    }

    #[test]
    fn vni_digits() {
        let s = typed("viet");
        assert_eq!(
            decode('1', &s, &vni(), false),
            Intent::ToneMark(Tone::Acute, '1')
        );
        assert_eq!(
            decode('6', &s, &vni(), false),
            Intent::VowelMod(Modifier::Circumflex, '6')
        );
        assert_eq!(decode('0', &s, &vni(), false), Intent::RemoveTone('0'));
        // No d to stroke: 9 is a literal digit.
        assert_eq!(decode('9', &s, &vni(), false), Intent::Passthrough('9'));
    }

    #[test]
    fn digits_pass_through_in_telex() {
        let s = typed("a");
        assert_eq!(decode('1', &s, &telex(), false), Intent::Passthrough('1'));
    }
}
