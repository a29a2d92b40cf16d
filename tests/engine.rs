//! Session-level behavior: configuration, boundaries, shortcuts, restore.

use shared::{event, screen_of, telex_engine};
use vikey::{keys, Config, EditAction, EditCommand, Engine, KeyEvent, ToneStyle};

#[test]
fn disabled_engine_passes_everything_through() {
    let mut engine = Engine::with_config(Config {
        enabled: false,
        ..Config::default()
    });
    for ch in "vieetj 123".chars() {
        let cmd = engine.process_key(event(ch));
        assert_eq!(cmd, EditCommand::none());
        assert!(engine.is_buffer_empty());
    }
}

#[test]
fn disabling_mid_word_drops_the_word() {
    let mut engine = telex_engine();
    screen_of(&mut engine, "vie");
    engine.set_enabled(false);
    assert!(engine.is_buffer_empty());
    engine.set_enabled(true);
    assert_eq!(screen_of(&mut engine, "as"), "á");
}

#[test]
fn ctrl_chords_pass_through() {
    let mut engine = telex_engine();
    screen_of(&mut engine, "vie");
    let cmd = engine.process_key(KeyEvent::new(keys::A, false, true, false));
    assert_eq!(cmd, EditCommand::none());
    assert!(engine.is_buffer_empty());
}

#[test]
fn commit_pushes_history_and_clear_all_drops_it() {
    let mut engine = telex_engine();
    screen_of(&mut engine, "vieetj nam ");
    assert_eq!(engine.history().collect::<Vec<_>>(), ["việt", "nam"]);

    engine.clear_all();
    assert_eq!(engine.history().count(), 0);
    assert!(engine.is_buffer_empty());
}

#[test]
fn clear_keeps_history() {
    let mut engine = telex_engine();
    screen_of(&mut engine, "vieetj ");
    screen_of(&mut engine, "na");
    engine.clear();
    assert!(engine.is_buffer_empty());
    assert_eq!(engine.history().collect::<Vec<_>>(), ["việt"]);
}

#[test]
fn shortcut_expands_at_word_boundary() {
    let mut engine = telex_engine();
    engine.shortcuts_mut().add("vn", "Việt Nam");

    let mut screen = String::new();
    for ch in "vn ".chars() {
        let cmd = engine.process_key(event(ch));
        shared::apply(&mut screen, &cmd, ch);
    }
    assert_eq!(screen, "Việt Nam ");
}

#[test]
fn shortcut_does_not_fire_mid_word() {
    let mut engine = telex_engine();
    engine.shortcuts_mut().add("vn", "Việt Nam");
    assert_eq!(screen_of(&mut engine, "vns "), "vns ");
}

#[test]
fn shortcut_matches_raw_spelling() {
    let mut engine = telex_engine();
    engine.shortcuts_mut().add("dcj", "được");
    let mut screen = String::new();
    for ch in "dcj.".chars() {
        let cmd = engine.process_key(event(ch));
        shared::apply(&mut screen, &cmd, ch);
    }
    // The trigger is the raw keys (j failed to tone a vowel-less word).
    assert_eq!(screen, "được.");
}

#[test]
fn esc_restores_raw_spelling() {
    let mut engine = telex_engine();
    let mut screen = String::new();
    for ch in "vieetj".chars() {
        let cmd = engine.process_key(event(ch));
        shared::apply(&mut screen, &cmd, ch);
    }
    assert_eq!(screen, "việt");

    let cmd = engine.process_key(KeyEvent::new(keys::ESC, false, false, false));
    assert_eq!(cmd.action, EditAction::Restore);
    assert_eq!(cmd.backspace, 4);
    assert_eq!(cmd.chars, "vieetj");
    assert!(engine.is_buffer_empty());

    shared::apply(&mut screen, &cmd, '\0');
    assert_eq!(screen, "vieetj");
}

#[test]
fn esc_restore_can_be_disabled() {
    let mut engine = Engine::with_config(Config {
        esc_restore: false,
        ..Config::default()
    });
    screen_of(&mut engine, "vieet");
    let cmd = engine.process_key(KeyEvent::new(keys::ESC, false, false, false));
    assert_eq!(cmd, EditCommand::none());
    assert_eq!(engine.buffer(), "viê");
}

#[test]
fn free_tone_accepts_invalid_shapes() {
    let mut engine = Engine::with_config(Config {
        free_tone: true,
        ..Config::default()
    });
    assert_eq!(screen_of(&mut engine, "xeks"), "xék");
}

#[test]
fn smart_mode_marks_foreign_words() {
    let mut engine = Engine::with_config(Config {
        smart_mode: true,
        ..Config::default()
    });
    // `str` is no Vietnamese onset; from there on keys stay literal.
    assert_eq!(screen_of(&mut engine, "strings"), "strings");
    // The marker resets at the boundary.
    assert_eq!(screen_of(&mut engine, " as"), " á");
}

#[test]
fn instant_restore_reverts_transformed_words() {
    let mut engine = Engine::with_config(Config {
        smart_mode: true,
        instant_restore: true,
        ..Config::default()
    });
    let mut screen = String::new();
    // `tẽ` + `x` is not a Vietnamese shape: the buffer reverts to raw and
    // the rest of the word passes through.
    for ch in "texxt".chars() {
        let cmd = engine.process_key(event(ch));
        shared::apply(&mut screen, &cmd, ch);
    }
    assert_eq!(screen, "texxt");
    assert_eq!(engine.buffer(), "texxt");
}

#[test]
fn restore_word_roundtrip() {
    let mut engine = telex_engine();
    for word in ["việt", "được", "người", "toán", "hoà", "đi"] {
        engine.restore_word(word);
        assert_eq!(engine.buffer(), word, "restore '{word}'");
        engine.clear();
    }
}

#[test]
fn restore_word_supports_backspace() {
    let mut engine = telex_engine();
    engine.restore_word("toán");
    let cmd = engine.process_key(KeyEvent::new(keys::DELETE, false, false, false));
    assert_eq!(cmd, EditCommand::none());
    assert_eq!(engine.buffer(), "toá");
}

#[test]
fn restore_word_keeps_case() {
    let mut engine = telex_engine();
    engine.restore_word("Việt");
    assert_eq!(engine.buffer(), "Việt");
    assert_eq!(engine.raw_buffer(), "Vieetj");
}

#[test]
fn config_change_mid_session() {
    let mut engine = telex_engine();
    assert_eq!(screen_of(&mut engine, "hoas "), "hoà ");

    let mut config = engine.config().clone();
    config.tone_style = ToneStyle::Traditional;
    engine.set_config(config);
    assert_eq!(screen_of(&mut engine, "hoas"), "hóa");
}

#[test]
fn history_is_bounded() {
    let mut engine = telex_engine();
    for _ in 0..40 {
        screen_of(&mut engine, "an ");
    }
    assert_eq!(engine.history().count(), 32);
}
