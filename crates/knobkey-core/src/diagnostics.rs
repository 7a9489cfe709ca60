//! Diagnostics collaborator.
//!
//! Recovered errors and notable state changes are reported through an
//! injected [`Diagnostics`] implementation instead of printed from wherever
//! they happen.

use core::fmt;

use log::{debug, info, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Diagnostic<'a> {
    /// A mode asked for a character the active layout cannot type.
    UnmappedCharacter { mode: &'a str, ch: char },
    /// An activation named a mode that was never registered.
    UnknownMode { name: &'a str },
    /// The keystroke sink refused a report.
    KeystrokeRejected { mode: &'a str },
    /// The position source failed; the sample was skipped.
    EncoderFault,
    /// The button source failed; the sample was skipped.
    ButtonFault,
    ModeEntered { name: &'a str, reset: bool },
    CharacterSent { mode: &'a str, ch: char, shifted: bool },
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedCharacter { mode, ch } => {
                write!(f, "{mode}: no key binding for {ch:?}")
            }
            Self::UnknownMode { name } => write!(f, "mode {name:?} is not registered"),
            Self::KeystrokeRejected { mode } => write!(f, "{mode}: keystroke rejected by sink"),
            Self::EncoderFault => f.write_str("encoder read failed"),
            Self::ButtonFault => f.write_str("button read failed"),
            Self::ModeEntered { name, reset } => write!(f, "entered {name} reset={reset}"),
            Self::CharacterSent { mode, ch, shifted } => {
                write!(f, "{mode}: sent {ch:?} shift={shifted}")
            }
        }
    }
}

impl Diagnostic<'_> {
    /// Whether this reports a recovered error rather than normal activity.
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::UnmappedCharacter { .. }
                | Self::UnknownMode { .. }
                | Self::KeystrokeRejected { .. }
                | Self::EncoderFault
                | Self::ButtonFault
        )
    }
}

pub trait Diagnostics {
    fn record(&mut self, diagnostic: Diagnostic<'_>);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn record(&mut self, diagnostic: Diagnostic<'_>) {
        if diagnostic.is_error() {
            warn!("{}", diagnostic);
            return;
        }
        match diagnostic {
            Diagnostic::CharacterSent { .. } => debug!("keys: {}", diagnostic),
            _ => info!("mode: {}", diagnostic),
        }
    }
}

impl<T: Diagnostics + ?Sized> Diagnostics for &mut T {
    fn record(&mut self, diagnostic: Diagnostic<'_>) {
        (**self).record(diagnostic);
    }
}
