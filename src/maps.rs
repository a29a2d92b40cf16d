//! Static composition tables for Vietnamese characters.
//!
//! All tables are lowercase; uppercase forms are derived through Unicode case
//! mapping when a grapheme is rendered. A character is composed in two steps:
//! the base letter picks up its optional shape modifier (`a` → `â`), then the
//! result picks up its optional tone mark (`â` → `ậ`).
use phf::{phf_map, phf_set, Map, Set};

/// Every base vowel together with its five toned forms, in tone order
/// acute, grave, hook above, tilde, underdot.
pub static TONE_TABLE: [(char, [char; 5]); 12] = [
    ('a', ['á', 'à', 'ả', 'ã', 'ạ']),
    ('ă', ['ắ', 'ằ', 'ẳ', 'ẵ', 'ặ']),
    ('â', ['ấ', 'ầ', 'ẩ', 'ẫ', 'ậ']),
    ('e', ['é', 'è', 'ẻ', 'ẽ', 'ẹ']),
    ('ê', ['ế', 'ề', 'ể', 'ễ', 'ệ']),
    ('i', ['í', 'ì', 'ỉ', 'ĩ', 'ị']),
    ('o', ['ó', 'ò', 'ỏ', 'õ', 'ọ']),
    ('ô', ['ố', 'ồ', 'ổ', 'ỗ', 'ộ']),
    ('ơ', ['ớ', 'ờ', 'ở', 'ỡ', 'ợ']),
    ('u', ['ú', 'ù', 'ủ', 'ũ', 'ụ']),
    ('ư', ['ứ', 'ừ', 'ử', 'ữ', 'ự']),
    ('y', ['ý', 'ỳ', 'ỷ', 'ỹ', 'ỵ']),
];

/// The twelve tone-less vowel letters of the alphabet.
pub static VOWELS: Set<char> = phf_set!['a', 'ă', 'â', 'e', 'ê', 'i', 'o', 'ô', 'ơ', 'u', 'ư', 'y'];

/// Letters that accept a circumflex.
pub static CIRCUMFLEX_MAP: Map<char, char> = phf_map! {
    'a' => 'â',
    'e' => 'ê',
    'o' => 'ô',
};

/// Letters that accept a breve.
pub static BREVE_MAP: Map<char, char> = phf_map! {
    'a' => 'ă',
};

/// Letters that accept a horn.
pub static HORN_MAP: Map<char, char> = phf_map! {
    'o' => 'ơ',
    'u' => 'ư',
};

/// Letters that accept a stroke.
pub static STROKE_MAP: Map<char, char> = phf_map! {
    'd' => 'đ',
};

/// Look up the toned form of a tone-less lowercase vowel.
///
/// `slot` indexes the tone order of [`TONE_TABLE`]. Characters outside the
/// vowel inventory come back unchanged.
pub fn toned(base: char, slot: usize) -> char {
    debug_assert!(slot < 5);
    TONE_TABLE
        .iter()
        .find(|(b, _)| *b == base)
        .map(|(_, row)| row[slot])
        .unwrap_or(base)
}

/// Reverse lookup: the tone-less base and tone slot of a toned vowel.
pub fn tone_slot_of(ch: char) -> Option<(char, usize)> {
    for (base, row) in &TONE_TABLE {
        if let Some(slot) = row.iter().position(|&t| t == ch) {
            return Some((*base, slot));
        }
    }
    None
}

/// The plain ASCII letter under a modified (but tone-less) character.
pub fn plain(ch: char) -> char {
    match ch {
        'ă' | 'â' => 'a',
        'ê' => 'e',
        'ô' | 'ơ' => 'o',
        'ư' => 'u',
        'đ' => 'd',
        _ => ch,
    }
}
