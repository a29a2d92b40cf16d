//! A Vietnamese IME core engine.
//!
//! `vikey` turns a stream of raw key events typed in Telex or VNI into
//! correctly accented Vietnamese, one keystroke at a time. For every key it
//! returns an edit command — characters to insert and a count of visible
//! characters to delete — that keeps the host text field in lockstep with
//! the engine's internal word buffer. The buffer is fully undoable: double
//! tapping a tone trigger cancels it, backspace removes whole graphemes
//! together with the keystrokes that produced them, and ESC restores the raw
//! ASCII spelling of the word.
//!
//! # Example
//!
//! ```
//! use vikey::{keys, Engine, KeyEvent};
//!
//! let mut engine = Engine::new();
//! for ch in "vieetj".chars() {
//!     let code = keys::from_char(ch).unwrap();
//!     engine.process_key(KeyEvent::new(code, false, false, false));
//! }
//! assert_eq!(engine.buffer(), "việt");
//! ```
//!
//! # Embedding
//!
//! The crate builds as a `cdylib` with a handle-based C API (`vikey_engine_new`,
//! `vikey_engine_process_key`, …) for OS-level IME shells; `include/vikey.h`
//! is generated at build time. One engine instance serves one editing
//! context; instances share nothing and every call runs to completion before
//! the next, so a host serialises access per instance and nothing more.
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod maps;
pub mod methods;
pub mod orthography;
pub mod parsing;
pub mod shortcut;
pub mod syllable;
pub mod transform;
pub mod util;
pub mod validation;

pub use config::{Config, ToneStyle};
pub use engine::{EditAction, EditCommand, Engine};
pub use error::Error;
pub use keys::KeyEvent;
pub use methods::{InputMethod, Intent};
pub use shortcut::ShortcutTable;
pub use syllable::Syllable;
pub use transform::{Modifier, Tone};

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

const HANDLE_MAGIC: u32 = 0x7669_6b65;

/// Opaque engine handle handed across the C boundary.
pub struct EngineHandle {
    magic: u32,
    engine: Engine,
}

/// Configuration as it crosses the C boundary. The individual toggles not
/// covered here have their own entry points and survive a `set_config`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiConfig {
    /// 0 = Telex, 1 = VNI.
    pub input_method: u8,
    /// 0 = Traditional, 1 = Modern.
    pub tone_style: u8,
    pub smart_mode: bool,
}

/// Edit command as it crosses the C boundary. `chars` is a heap-allocated
/// UTF-8 string owned by the caller; release it with [`vikey_free_string`].
/// May be null when the command carries no text.
#[repr(C)]
#[derive(Debug)]
pub struct FfiEditCommand {
    pub chars: *mut c_char,
    pub backspace_count: u8,
    /// 0 = None, 1 = Send, 2 = Restore.
    pub action: u8,
    pub consumed: bool,
}

/// # Safety
/// `handle` must be null, or a pointer obtained from [`vikey_engine_new`]
/// that has not been freed.
unsafe fn engine_from<'a>(handle: *mut EngineHandle) -> Result<&'a mut Engine, Error> {
    if handle.is_null() {
        return Err(Error::NullPointer);
    }
    let handle = &mut *handle;
    if handle.magic != HANDLE_MAGIC {
        return Err(Error::InvalidHandle);
    }
    Ok(&mut handle.engine)
}

/// Run `f` against the engine behind `handle`, translating panics and handle
/// problems into status codes.
fn with_engine<F>(handle: *mut EngineHandle, f: F) -> i32
where
    F: FnOnce(&mut Engine) -> Result<(), Error>,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let engine = unsafe { engine_from(handle) }?;
        f(engine)
    }));
    match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(error)) => {
            // A processing failure leaves the word buffer in an unknown
            // state; recover it like the panic path. Handle and UTF-8
            // errors never reached the engine.
            if error == Error::Processing {
                if let Ok(engine) = unsafe { engine_from(handle) } {
                    engine.clear();
                }
            }
            error.status_code()
        }
        Err(_) => {
            // Recover to a known state: the word in progress is gone, the
            // committed history survives.
            let _ = catch_unwind(AssertUnwindSafe(|| {
                if let Ok(engine) = unsafe { engine_from(handle) } {
                    engine.clear();
                }
            }));
            Error::Internal.status_code()
        }
    }
}

fn config_from_ffi(ffi: &FfiConfig, base: &Config) -> Config {
    Config {
        input_method: if ffi.input_method == 1 {
            InputMethod::Vni
        } else {
            InputMethod::Telex
        },
        tone_style: if ffi.tone_style == 0 {
            ToneStyle::Traditional
        } else {
            ToneStyle::Modern
        },
        smart_mode: ffi.smart_mode,
        ..base.clone()
    }
}

fn config_to_ffi(config: &Config) -> FfiConfig {
    FfiConfig {
        input_method: match config.input_method {
            InputMethod::Telex => 0,
            InputMethod::Vni => 1,
        },
        tone_style: match config.tone_style {
            ToneStyle::Traditional => 0,
            ToneStyle::Modern => 1,
        },
        smart_mode: config.smart_mode,
    }
}

/// # Safety
/// `ptr` must be null or a valid NUL-terminated string.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Result<&'a str, Error> {
    if ptr.is_null() {
        return Err(Error::NullPointer);
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| Error::InvalidUtf8)
}

/// Create an engine. A null `config` selects the defaults. The returned
/// handle must be released with [`vikey_engine_free`].
#[no_mangle]
pub extern "C" fn vikey_engine_new(config: *const FfiConfig) -> *mut EngineHandle {
    let config = if config.is_null() {
        Config::default()
    } else {
        config_from_ffi(unsafe { &*config }, &Config::default())
    };
    Box::into_raw(Box::new(EngineHandle {
        magic: HANDLE_MAGIC,
        engine: Engine::with_config(config),
    }))
}

/// Destroy an engine. Null and already-freed handles are ignored.
///
/// # Safety
/// `handle` must be null or a pointer from [`vikey_engine_new`], and must not
/// be used after this call.
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_free(handle: *mut EngineHandle) {
    if handle.is_null() || (*handle).magic != HANDLE_MAGIC {
        return;
    }
    (*handle).magic = 0;
    drop(Box::from_raw(handle));
}

/// Process one key event. On success `out` carries the edit command; its
/// `chars` string (possibly null) belongs to the caller.
///
/// # Safety
/// `handle` as for [`vikey_engine_free`]; `out` must point at writable
/// memory for one `FfiEditCommand`.
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_process_key(
    handle: *mut EngineHandle,
    keycode: u16,
    caps: bool,
    ctrl: bool,
    shift: bool,
    out: *mut FfiEditCommand,
) -> i32 {
    if out.is_null() {
        return Error::NullPointer.status_code();
    }
    *out = FfiEditCommand {
        chars: std::ptr::null_mut(),
        backspace_count: 0,
        action: EditAction::None as u8,
        consumed: false,
    };

    with_engine(handle, |engine| {
        let command = engine.process_key(KeyEvent::new(keycode, caps, ctrl, shift));
        let chars = if command.chars.is_empty() {
            std::ptr::null_mut()
        } else {
            CString::new(command.chars)
                .map_err(|_| Error::Processing)?
                .into_raw()
        };
        *out = FfiEditCommand {
            chars,
            backspace_count: command.backspace.min(u8::MAX as usize) as u8,
            action: command.action as u8,
            consumed: command.consumed,
        };
        Ok(())
    })
}

/// Replace the method/style/smart-mode part of the configuration.
///
/// # Safety
/// Pointer contracts as for [`vikey_engine_process_key`].
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_set_config(
    handle: *mut EngineHandle,
    config: *const FfiConfig,
) -> i32 {
    if config.is_null() {
        return Error::NullPointer.status_code();
    }
    let ffi = *config;
    with_engine(handle, |engine| {
        let merged = config_from_ffi(&ffi, engine.config());
        engine.set_config(merged);
        Ok(())
    })
}

/// Read the current configuration into `out`.
///
/// # Safety
/// Pointer contracts as for [`vikey_engine_process_key`].
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_get_config(
    handle: *mut EngineHandle,
    out: *mut FfiConfig,
) -> i32 {
    if out.is_null() {
        return Error::NullPointer.status_code();
    }
    with_engine(handle, |engine| {
        *out = config_to_ffi(engine.config());
        Ok(())
    })
}

macro_rules! toggle_entry {
    ($(#[$doc:meta])* $name:ident, $apply:expr) => {
        $(#[$doc])*
        ///
        /// # Safety
        /// `handle` must be null or a live pointer from `vikey_engine_new`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(handle: *mut EngineHandle, value: bool) -> i32 {
            with_engine(handle, |engine| {
                let apply: fn(&mut Engine, bool) = $apply;
                apply(engine, value);
                Ok(())
            })
        }
    };
}

toggle_entry!(
    /// Enable or disable the engine; disabled engines pass every key through.
    vikey_engine_set_enabled,
    |e, v| e.set_enabled(v)
);
toggle_entry!(
    /// Suppress the Telex `w` → `ư` shortcut.
    vikey_engine_set_skip_w_shortcut,
    |e, v| {
        let mut c = e.config().clone();
        c.skip_w_shortcut = v;
        e.set_config(c);
    }
);
toggle_entry!(
    /// Let ESC restore the raw ASCII spelling of the word in progress.
    vikey_engine_set_esc_restore,
    |e, v| {
        let mut c = e.config().clone();
        c.esc_restore = v;
        e.set_config(c);
    }
);
toggle_entry!(
    /// Accept any tone on any vowel, skipping syllable validation.
    vikey_engine_set_free_tone,
    |e, v| {
        let mut c = e.config().clone();
        c.free_tone = v;
        e.set_config(c);
    }
);
toggle_entry!(
    /// With smart mode, revert invalid words to raw ASCII immediately.
    vikey_engine_set_instant_restore,
    |e, v| {
        let mut c = e.config().clone();
        c.instant_restore = v;
        e.set_config(c);
    }
);

/// Drop the word in progress.
///
/// # Safety
/// `handle` must be null or a live pointer from [`vikey_engine_new`].
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_clear(handle: *mut EngineHandle) -> i32 {
    with_engine(handle, |engine| {
        engine.clear();
        Ok(())
    })
}

/// Drop the word in progress and the committed-word history. Call when the
/// cursor moves.
///
/// # Safety
/// `handle` must be null or a live pointer from [`vikey_engine_new`].
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_clear_all(handle: *mut EngineHandle) -> i32 {
    with_engine(handle, |engine| {
        engine.clear_all();
        Ok(())
    })
}

/// Seed the buffer with an already-composed word (UTF-8) so backspaces and
/// further transformations operate on it.
///
/// # Safety
/// `handle` as above; `word` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_restore_word(
    handle: *mut EngineHandle,
    word: *const c_char,
) -> i32 {
    let word = match str_arg(word) {
        Ok(s) => s.to_string(),
        Err(e) => return e.status_code(),
    };
    with_engine(handle, |engine| {
        engine.restore_word(&word);
        Ok(())
    })
}

/// Add (or replace) a shortcut.
///
/// # Safety
/// `handle` as above; both strings must be valid NUL-terminated UTF-8.
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_add_shortcut(
    handle: *mut EngineHandle,
    trigger: *const c_char,
    replacement: *const c_char,
) -> i32 {
    let (trigger, replacement) = match (str_arg(trigger), str_arg(replacement)) {
        (Ok(t), Ok(r)) => (t.to_string(), r.to_string()),
        (Err(e), _) | (_, Err(e)) => return e.status_code(),
    };
    with_engine(handle, |engine| {
        engine.shortcuts_mut().add(&trigger, &replacement);
        Ok(())
    })
}

/// Remove a shortcut. Removing an unknown trigger is not an error.
///
/// # Safety
/// `handle` as above; `trigger` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_remove_shortcut(
    handle: *mut EngineHandle,
    trigger: *const c_char,
) -> i32 {
    let trigger = match str_arg(trigger) {
        Ok(t) => t.to_string(),
        Err(e) => return e.status_code(),
    };
    with_engine(handle, |engine| {
        engine.shortcuts_mut().remove(&trigger);
        Ok(())
    })
}

/// Remove every shortcut.
///
/// # Safety
/// `handle` must be null or a live pointer from [`vikey_engine_new`].
#[no_mangle]
pub unsafe extern "C" fn vikey_engine_clear_shortcuts(handle: *mut EngineHandle) -> i32 {
    with_engine(handle, |engine| {
        engine.shortcuts_mut().clear();
        Ok(())
    })
}

/// Release a string returned inside an [`FfiEditCommand`].
///
/// # Safety
/// `ptr` must be null or a `chars` pointer produced by this library, freed
/// exactly once.
#[no_mangle]
pub unsafe extern "C" fn vikey_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
