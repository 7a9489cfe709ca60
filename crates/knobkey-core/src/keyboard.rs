//! Keystroke output.

use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    keymap::{KeyCode, KeyboardLayout},
};

/// One press-and-release of a key, optionally with Shift held.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyStroke {
    pub key: KeyCode,
    pub shift: bool,
}

impl KeyStroke {
    pub const fn new(key: KeyCode, shift: bool) -> Self {
        Self { key, shift }
    }
}

/// Host-facing keystroke transport.
pub trait KeystrokeSink {
    type Error;

    fn send(&mut self, stroke: KeyStroke) -> Result<(), Self::Error>;
}

impl<T: KeystrokeSink + ?Sized> KeystrokeSink for &mut T {
    type Error = T::Error;

    fn send(&mut self, stroke: KeyStroke) -> Result<(), Self::Error> {
        (**self).send(stroke)
    }
}

/// Keystroke access handed to a mode for the duration of one event.
pub struct Keyboard<'a, K> {
    sink: &'a mut K,
    layout: KeyboardLayout,
    diagnostics: &'a mut dyn Diagnostics,
    mode: &'static str,
}

impl<'a, K> Keyboard<'a, K>
where
    K: KeystrokeSink,
{
    pub fn new(
        sink: &'a mut K,
        layout: KeyboardLayout,
        diagnostics: &'a mut dyn Diagnostics,
        mode: &'static str,
    ) -> Self {
        Self {
            sink,
            layout,
            diagnostics,
            mode,
        }
    }

    pub const fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    /// Types `ch` through the active layout. Returns `false` without sending
    /// anything when the layout has no binding for it.
    pub fn send_character(&mut self, ch: char, force_shift: bool) -> bool {
        let Some(binding) = self.layout.binding(ch) else {
            self.diagnostics.record(Diagnostic::UnmappedCharacter {
                mode: self.mode,
                ch,
            });
            return false;
        };

        let shift = binding.needs_shift || force_shift;
        if !self.emit(KeyStroke::new(binding.key, shift)) {
            return false;
        }

        self.diagnostics.record(Diagnostic::CharacterSent {
            mode: self.mode,
            ch,
            shifted: shift,
        });
        true
    }

    /// Sends a key that has no character, such as Enter or Backspace.
    pub fn send_key(&mut self, key: KeyCode) -> bool {
        self.emit(KeyStroke::new(key, false))
    }

    fn emit(&mut self, stroke: KeyStroke) -> bool {
        if self.sink.send(stroke).is_err() {
            self.diagnostics
                .record(Diagnostic::KeystrokeRejected { mode: self.mode });
            return false;
        }
        true
    }
}
