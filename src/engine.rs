//! The session controller: one engine per editing context.
//!
//! `process_key` is the single entry point. Each key event decodes to an
//! intent, the intent mutates the syllable buffer, and the difference between
//! the old and new rendering goes back to the host as an [`EditCommand`].
//! Commands are emitted in strict FIFO order; applying each one to the host
//! text field keeps it byte-for-byte in sync with the engine's buffer.
use std::collections::VecDeque;

use log::{debug, trace};

use crate::config::Config;
use crate::keys::{self, KeyEvent};
use crate::methods::{decode, InputMethod, Intent};
use crate::shortcut::ShortcutTable;
use crate::syllable::Syllable;
use crate::transform::{self, Modifier, Tone, Transformation};
use crate::util;
use crate::validation::Shape;

/// Committed words remembered for the host's backspace-into-previous-word
/// flow; bounded so an engine never grows without limit.
const HISTORY_MAX: usize = 32;

/// Hard cap on the word buffer. Real syllables stop at seven graphemes;
/// beyond this the engine stops consuming keys for the word.
const MAX_GRAPHEMES: usize = 32;

/// What the host should do with a processed key.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Pass the raw key through unchanged.
    None = 0,
    /// Delete `backspace` visible characters, then insert `chars`.
    Send = 1,
    /// Reinstall the raw ASCII spelling carried in `chars`.
    Restore = 2,
}

/// The edit instruction emitted for one key event.
#[derive(Debug, Clone, PartialEq)]
pub struct EditCommand {
    pub action: EditAction,
    pub backspace: usize,
    pub chars: String,
    /// Whether the engine consumed the key. When false the host delivers the
    /// original event to the focused field itself.
    pub consumed: bool,
}

impl EditCommand {
    pub fn none() -> Self {
        Self {
            action: EditAction::None,
            backspace: 0,
            chars: String::new(),
            consumed: false,
        }
    }

    pub fn send(backspace: usize, chars: String) -> Self {
        Self {
            action: EditAction::Send,
            backspace,
            chars,
            consumed: true,
        }
    }

    pub fn restore(backspace: usize, chars: String) -> Self {
        Self {
            action: EditAction::Restore,
            backspace,
            chars,
            consumed: true,
        }
    }

    /// Minimal replacement edit between two renderings: delete back to the
    /// common prefix, insert the new suffix.
    pub fn diff(prev: &str, new: &str) -> Self {
        let prev: Vec<char> = prev.chars().collect();
        let new: Vec<char> = new.chars().collect();
        let common = prev
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let chars: String = new[common..].iter().collect();
        Self::send(prev.len() - common, chars)
    }
}

/// One-slot memo of the last transformation, armed only for the undo paths
/// that need the very next key: the Telex stroke and the `w` → `ư` insert.
/// Any other mutation clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastEdit {
    Stroke,
    HornInsert,
}

/// A Vietnamese IME engine instance. Single-threaded; hosts needing several
/// editing contexts create several engines.
pub struct Engine {
    word: Syllable,
    config: Config,
    shortcuts: ShortcutTable,
    history: VecDeque<String>,
    memo: Option<LastEdit>,
    /// Set once the current word is proven not to be Vietnamese; later keys
    /// bypass transformation until the next boundary.
    english: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            word: Syllable::with_style(config.tone_style),
            config,
            shortcuts: ShortcutTable::new(),
            history: VecDeque::new(),
            memo: None,
            english: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        self.word.set_style(self.config.tone_style);
        if !self.config.enabled {
            self.reset_word();
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.reset_word();
        }
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutTable {
        &mut self.shortcuts
    }

    /// Current rendering of the word in progress.
    pub fn buffer(&self) -> String {
        self.word.render()
    }

    /// Raw keys typed for the word in progress.
    pub fn raw_buffer(&self) -> String {
        self.word.raw_ascii()
    }

    pub fn is_buffer_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Recently committed words, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Drop the word in progress.
    pub fn clear(&mut self) {
        self.reset_word();
    }

    /// Drop the word in progress and the committed-word history. Hosts call
    /// this when the cursor moves, so stale state cannot leak into the new
    /// position.
    pub fn clear_all(&mut self) {
        self.reset_word();
        self.history.clear();
    }

    /// Process one key event to completion.
    pub fn process_key(&mut self, event: KeyEvent) -> EditCommand {
        if !self.config.enabled {
            self.reset_word();
            return EditCommand::none();
        }
        if event.ctrl {
            self.reset_word();
            return EditCommand::none();
        }

        let code = event.keycode;
        if code == keys::ESC {
            return self.apply(Intent::Escape);
        }
        if code == keys::DELETE {
            return self.apply(Intent::Backspace);
        }

        // A shifted digit in VNI is a symbol (@, #, …), not a tone; the
        // symbol ends the word and passes through.
        if self.config.input_method == InputMethod::Vni && event.shift && keys::is_digit(code) {
            return self.apply(Intent::Commit(None));
        }
        if let Some(boundary) = keys::break_char(code) {
            return self.apply(Intent::Commit(Some(boundary)));
        }

        let Some(mut ch) = keys::to_char(code) else {
            // Navigation or function key: the word is no longer ours.
            self.reset_word();
            return EditCommand::none();
        };
        if event.uppercase() && ch.is_ascii_alphabetic() {
            ch = ch.to_ascii_uppercase();
        }

        if self.word.len() >= MAX_GRAPHEMES {
            return EditCommand::none();
        }

        if self.english {
            let prev = self.word.render();
            self.word.push_letter(ch);
            return EditCommand::diff(&prev, &self.word.render());
        }

        let stroke_undo = self.memo == Some(LastEdit::Stroke);
        let intent = decode(ch, &self.word, &self.config, stroke_undo);
        trace!("key '{}' decoded as {:?}", ch, intent);
        self.apply(intent)
    }

    fn apply(&mut self, intent: Intent) -> EditCommand {
        match intent {
            Intent::Letter(ch) | Intent::Passthrough(ch) => {
                let prev = self.word.render();
                self.memo = None;
                self.word.push_letter(ch);
                self.finish(&prev)
            }
            Intent::ToneMark(tone, trigger) => self.apply_tone(tone, trigger),
            Intent::VowelMod(modifier, trigger) => self.apply_vowel_mod(modifier, trigger),
            Intent::ConsonantMod(trigger) => self.apply_stroke(trigger),
            Intent::RemoveTone(trigger) => self.apply_remove_tone(trigger),
            Intent::Commit(boundary) => self.handle_commit(boundary),
            Intent::Backspace => self.handle_backspace(),
            Intent::Escape => self.handle_escape(),
        }
    }

    fn apply_tone(&mut self, tone: Tone, trigger: char) -> EditCommand {
        let prev = self.word.render();
        self.memo = None;
        let (result, index) = transform::add_tone(&mut self.word, tone, self.config.free_tone);
        match result {
            Transformation::ToneMarkAdded => {
                if let Some(i) = index {
                    self.word.attach_raw(trigger, i);
                }
                self.finish(&prev)
            }
            Transformation::ToneMarkRemoved => {
                self.cancelled(trigger, index);
                self.finish(&prev)
            }
            _ => {
                self.word.push_letter(trigger);
                self.finish(&prev)
            }
        }
    }

    fn apply_remove_tone(&mut self, trigger: char) -> EditCommand {
        let prev = self.word.render();
        self.memo = None;
        let (result, index) = transform::remove_tone(&mut self.word);
        match result {
            Transformation::ToneMarkRemoved => {
                if let Some(i) = index {
                    self.word.attach_raw(trigger, i);
                }
                self.finish(&prev)
            }
            _ => {
                self.word.push_letter(trigger);
                self.finish(&prev)
            }
        }
    }

    fn apply_vowel_mod(&mut self, modifier: Modifier, trigger: char) -> EditCommand {
        let prev = self.word.render();
        let telex_w = trigger.to_ascii_lowercase() == 'w';

        if telex_w && self.memo == Some(LastEdit::HornInsert) {
            self.memo = None;
            return self.cancel_horn_insert(trigger, &prev);
        }
        self.memo = None;

        let family = match (self.config.input_method, modifier) {
            (InputMethod::Telex, Modifier::Circumflex) => Some(trigger.to_ascii_lowercase()),
            _ => None,
        };

        let (result, index) = match modifier {
            Modifier::Circumflex => transform::apply_circumflex(&mut self.word, family),
            Modifier::Breve => transform::apply_breve(&mut self.word),
            Modifier::Horn => {
                // Telex w falls from horn to breve before giving up.
                let mut outcome = transform::apply_horn(&mut self.word);
                if telex_w && outcome.0 == Transformation::Ignored {
                    outcome = transform::apply_breve(&mut self.word);
                }
                outcome
            }
            Modifier::Stroke => (Transformation::Ignored, None),
        };

        match result {
            Transformation::ModificationAdded => {
                if let Some(i) = index {
                    self.word.attach_raw(trigger, i);
                }
                self.finish(&prev)
            }
            Transformation::ModificationRemoved => {
                self.cancelled(trigger, index);
                self.finish(&prev)
            }
            _ => {
                if telex_w && !self.config.skip_w_shortcut && self.horn_insert_applies() {
                    let base = if trigger.is_uppercase() { 'U' } else { 'u' };
                    let index = self.word.push_grapheme(base, trigger);
                    self.word.grapheme_mut(index).modifier = Some(Modifier::Horn);
                    self.memo = Some(LastEdit::HornInsert);
                } else {
                    self.word.push_letter(trigger);
                }
                self.finish(&prev)
            }
        }
    }

    fn apply_stroke(&mut self, trigger: char) -> EditCommand {
        let prev = self.word.render();
        if self.config.input_method == InputMethod::Telex && self.memo == Some(LastEdit::Stroke) {
            self.memo = None;
            return self.cancel_stroke(trigger, &prev);
        }
        self.memo = None;

        let (result, index) = transform::apply_stroke(&mut self.word);
        match result {
            Transformation::ModificationAdded => {
                if let Some(i) = index {
                    self.word.attach_raw(trigger, i);
                }
                self.memo = Some(LastEdit::Stroke);
                self.finish(&prev)
            }
            Transformation::ModificationRemoved => {
                // VNI 9 toggling đ back off.
                if let Some(i) = index {
                    self.word.attach_raw(trigger, i);
                }
                self.finish(&prev)
            }
            _ => {
                self.word.push_letter(trigger);
                self.finish(&prev)
            }
        }
    }

    /// A cancelled transformation keeps its trigger. Telex appends it as a
    /// literal letter (`ass` → `as`); VNI only records the keystroke
    /// (`a11` → `a`).
    fn cancelled(&mut self, trigger: char, index: Option<usize>) {
        match self.config.input_method {
            InputMethod::Telex => {
                let literal = self.word.push_letter(trigger);
                if let Some(old) = index {
                    self.word.reattach_last_raw(trigger, old, literal);
                }
            }
            InputMethod::Vni => {
                if let Some(old) = index {
                    self.word.attach_raw(trigger, old);
                }
            }
        }
    }

    /// `ww`: the inserted `ư` came from a single `w`; cancelling restores
    /// that `w` and keeps the second one literal.
    fn cancel_horn_insert(&mut self, trigger: char, prev: &str) -> EditCommand {
        let caps = self
            .word
            .graphemes()
            .last()
            .map(|g| g.caps)
            .unwrap_or(false);
        self.word.pop();
        self.word.push_letter(if caps { 'W' } else { 'w' });
        self.word.push_letter(trigger);
        self.finish(prev)
    }

    /// `ddd`: cancelling the stroke restores the raw spelling and keeps the
    /// third `d` literal.
    fn cancel_stroke(&mut self, trigger: char, prev: &str) -> EditCommand {
        self.degrade_to_raw();
        self.word.push_letter(trigger);
        self.finish(prev)
    }

    fn horn_insert_applies(&self) -> bool {
        self.word.parse().nucleus_len == 0 || self.word.skeleton() == "gi"
    }

    /// Post-mutation bookkeeping: smart-mode validation, then the edit diff.
    fn finish(&mut self, prev: &str) -> EditCommand {
        if self.config.smart_mode && !self.english && self.word.parse().shape == Shape::Invalid {
            self.english = true;
            let raw = self.word.raw_ascii();
            debug!("'{}' cannot be Vietnamese; word passes through now", raw);
            if self.config.instant_restore && self.word.render() != raw {
                let backspace = prev.chars().count();
                self.degrade_to_raw();
                self.memo = None;
                return EditCommand::restore(backspace, raw);
            }
        }
        EditCommand::diff(prev, &self.word.render())
    }

    /// Rebuild the buffer as literal letters of its own raw spelling.
    fn degrade_to_raw(&mut self) {
        let raw: Vec<char> = self.word.raw_ascii().chars().collect();
        self.word.clear();
        for ch in raw {
            self.word.push_letter(ch);
        }
    }

    fn handle_backspace(&mut self) -> EditCommand {
        self.memo = None;
        if self.word.is_empty() {
            return EditCommand::none();
        }
        let prev = self.word.render();
        self.word.pop();
        let new = self.word.render();

        // Plain truncation: the host's own backspace already matches.
        let truncated: String = prev.chars().take(prev.chars().count() - 1).collect();
        if new == truncated {
            EditCommand::none()
        } else {
            EditCommand::diff(&prev, &new)
        }
    }

    fn handle_commit(&mut self, boundary: Option<char>) -> EditCommand {
        if self.word.is_empty() {
            return EditCommand::none();
        }
        let rendered = self.word.render();
        let command = match self.shortcuts.expand(&self.word.raw_ascii(), boundary) {
            Some(replacement) => {
                debug!("expanding shortcut '{}'", self.word.raw_ascii());
                let mut command = EditCommand::send(rendered.chars().count(), replacement);
                // Without a boundary character in the replacement the host
                // must still deliver its own key (a symbol, say).
                command.consumed = boundary.is_some();
                command
            }
            None => EditCommand::none(),
        };
        self.push_history(rendered);
        self.reset_word();
        command
    }

    fn handle_escape(&mut self) -> EditCommand {
        if !self.config.esc_restore || self.word.is_empty() {
            return EditCommand::none();
        }
        let raw = self.word.raw_ascii();
        let backspace = self.word.len();
        debug!("restoring raw spelling '{}'", raw);
        self.reset_word();
        EditCommand::restore(backspace, raw)
    }

    /// Seed the buffer from an already-composed word so backspaces and
    /// further transformations operate on it coherently. The raw keys are
    /// reverse-derived using the canonical Telex spelling.
    pub fn restore_word(&mut self, word: &str) {
        self.reset_word();
        let mut tone = None;
        for ch in word.chars() {
            let caps = ch.is_uppercase();
            let lower = ch.to_lowercase().next().unwrap_or(ch);
            let toneless = util::strip_tone(lower);
            if let Some(t) = util::tone_of(lower) {
                tone = Some(t);
            }
            let modifier = util::modifier_of(toneless);
            let base = util::clean_char(toneless);
            let typed = if caps && base.is_ascii_alphabetic() {
                base.to_ascii_uppercase()
            } else {
                base
            };
            let index = self.word.push_letter(typed);
            if let Some(m) = modifier {
                self.word.grapheme_mut(index).modifier = Some(m);
                let trigger = match m {
                    Modifier::Circumflex => base,
                    Modifier::Breve | Modifier::Horn => 'w',
                    Modifier::Stroke => 'd',
                };
                self.word.attach_raw(trigger, index);
            }
        }
        if let Some(t) = tone {
            self.word.set_tone(Some(t));
            if let Some(carrier) = self.word.tone_index() {
                let trigger = match t {
                    Tone::Acute => 's',
                    Tone::Grave => 'f',
                    Tone::HookAbove => 'r',
                    Tone::Tilde => 'x',
                    Tone::Underdot => 'j',
                };
                self.word.attach_raw(trigger, carrier);
            }
        }
        debug!(
            "seeded word '{}' (raw '{}')",
            self.word.render(),
            self.word.raw_ascii()
        );
    }

    fn push_history(&mut self, word: String) {
        if self.history.len() == HISTORY_MAX {
            self.history.pop_front();
        }
        self.history.push_back(word);
    }

    fn reset_word(&mut self) {
        self.word.clear();
        self.memo = None;
        self.english = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::from_char;

    fn type_str(engine: &mut Engine, input: &str) -> EditCommand {
        let mut last = EditCommand::none();
        for ch in input.chars() {
            let code = from_char(ch).expect("unmapped test character");
            last = engine.process_key(KeyEvent::new(code, ch.is_ascii_uppercase(), false, false));
        }
        last
    }

    #[test]
    fn telex_word() {
        let mut e = Engine::new();
        type_str(&mut e, "vieetj");
        assert_eq!(e.buffer(), "việt");
        assert_eq!(e.raw_buffer(), "vieetj");
    }

    #[test]
    fn vni_word() {
        let mut e = Engine::with_config(Config {
            input_method: InputMethod::Vni,
            ..Config::default()
        });
        type_str(&mut e, "viet65");
        assert_eq!(e.buffer(), "việt");
    }

    #[test]
    fn letters_emit_single_char_sends() {
        let mut e = Engine::new();
        let cmd = type_str(&mut e, "v");
        assert_eq!(cmd, EditCommand::send(0, "v".into()));
    }

    #[test]
    fn tone_emits_replacement_from_change_point() {
        let mut e = Engine::new();
        type_str(&mut e, "toa");
        let cmd = type_str(&mut e, "s");
        assert_eq!(cmd.action, EditAction::Send);
        assert_eq!(cmd.backspace, 1);
        assert_eq!(cmd.chars, "á");
        assert_eq!(e.buffer(), "toá");
    }

    #[test]
    fn double_trigger_cancels_with_literal() {
        let mut e = Engine::new();
        type_str(&mut e, "ass");
        assert_eq!(e.buffer(), "as");
        assert_eq!(e.raw_buffer(), "ass");
    }

    #[test]
    fn vni_double_trigger_cancels_without_literal() {
        let mut e = Engine::with_config(Config {
            input_method: InputMethod::Vni,
            ..Config::default()
        });
        type_str(&mut e, "vie6t6");
        assert_eq!(e.buffer(), "viet");
    }

    #[test]
    fn commit_drains_word() {
        let mut e = Engine::new();
        type_str(&mut e, "toans ");
        assert!(e.is_buffer_empty());
        assert_eq!(e.raw_buffer(), "");
        assert_eq!(e.history().collect::<Vec<_>>(), ["toán"]);
    }

    #[test]
    fn ctrl_passes_through_and_resets() {
        let mut e = Engine::new();
        type_str(&mut e, "vie");
        let cmd = e.process_key(KeyEvent::new(crate::keys::C, false, true, false));
        assert_eq!(cmd, EditCommand::none());
        assert!(e.is_buffer_empty());
    }

    #[test]
    fn restore_word_supports_further_editing() {
        let mut e = Engine::new();
        e.restore_word("việt");
        assert_eq!(e.buffer(), "việt");
        // A new acute replaces the underdot.
        type_str(&mut e, "s");
        assert_eq!(e.buffer(), "viết");
    }
}
