//! Engine configuration.
use crate::methods::InputMethod;

/// Where the tone mark lands on a diphthong.
///
/// - **Traditional:** tone on the first vowel of an open diphthong (`hòa`).
/// - **Modern:** tone on the main vowel (`hoà`); this is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneStyle {
    Traditional,
    #[default]
    Modern,
}

/// Per-engine configuration. All options can change mid-word; they take
/// effect from the next keystroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_method: InputMethod,
    pub tone_style: ToneStyle,
    /// Suppress the Telex `w` → `ư` shortcut at the start of a word.
    pub skip_w_shortcut: bool,
    /// ESC restores the raw ASCII spelling of the word in progress.
    pub esc_restore: bool,
    /// Accept any tone on any vowel, skipping syllable-shape validation.
    pub free_tone: bool,
    /// Validate the word shape after every change and mark words that cannot
    /// be Vietnamese so later keys pass through untransformed.
    pub smart_mode: bool,
    /// With smart mode, immediately revert a word to its raw spelling the
    /// moment its shape becomes invalid.
    pub instant_restore: bool,
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_method: InputMethod::Telex,
            tone_style: ToneStyle::default(),
            skip_w_shortcut: false,
            esc_restore: true,
            free_tone: false,
            smart_mode: false,
            instant_restore: false,
            enabled: true,
        }
    }
}
