//! Input modes and the controller that switches between them.
//!
//! A mode is a self-contained selection algorithm: it owns its selection
//! state and its display regions, reacts to rotation and gestures, and may
//! ask the [`ModeController`] to switch to another mode.

mod basic;
mod controller;
mod japanese;
mod utility;

pub use basic::{BASIC_CHARACTERS, BasicMode};
pub use controller::{MAX_MODES, ModeController, RegistryError};
pub use japanese::{CONSONANTS, JapaneseMode, Side, VOWELS};
pub use utility::{UtilityAction, UtilityMode, UtilityView};

use crate::{
    keyboard::{Keyboard, KeystrokeSink},
    render::{Anchor, DISPLAY_HEIGHT, DISPLAY_WIDTH, DisplaySink, RegionId, TextColor, TextRegion},
};

pub const BASIC: &str = "Basic";
pub const JAPANESE: &str = "Japanese";
pub const UTILITY: &str = "Utility";

/// What a mode asks the controller to do after handling an event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// Keep the current mode active.
    Stay,
    /// Switch to the named mode.
    Activate(&'static str),
    /// Switch back to whichever mode was active before this one.
    ReturnToPrevious,
}

pub trait Mode {
    fn name(&self) -> &'static str;

    /// Restores the selection state of a freshly constructed mode.
    fn reset_state(&mut self);

    /// Clears state that only lives for one activation. Runs on every entry,
    /// with or without reset.
    fn begin_activation(&mut self) {}

    /// Every region id this mode may create.
    fn regions(&self) -> &'static [RegionId];

    fn render_static<D: DisplaySink>(&self, display: &mut D);

    fn render_dynamic<D: DisplaySink>(&self, display: &mut D);

    fn handle_rotation<K: KeystrokeSink>(
        &mut self,
        delta: i32,
        keys: &mut Keyboard<'_, K>,
    ) -> Transition;

    fn handle_single_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition;

    fn handle_double_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition;

    fn handle_long_press<K: KeystrokeSink>(&mut self, _keys: &mut Keyboard<'_, K>) -> Transition {
        Transition::Stay
    }

    fn enter<D: DisplaySink>(&mut self, reset: bool, display: &mut D) {
        if reset {
            self.reset_state();
        }
        self.begin_activation();
        self.render_static(display);
        self.render_dynamic(display);
    }

    fn exit<D: DisplaySink>(&mut self, display: &mut D) {
        for &id in self.regions() {
            display.remove_region(id);
        }
    }

    fn send_character<K: KeystrokeSink>(
        &self,
        keys: &mut Keyboard<'_, K>,
        ch: char,
        force_shift: bool,
    ) -> bool {
        keys.send_character(ch, force_shift)
    }
}

/// Registry entry: one of the concrete modes.
#[derive(Clone, Debug)]
pub enum ModeSlot {
    Basic(BasicMode),
    Japanese(JapaneseMode),
    Utility(UtilityMode),
}

impl ModeSlot {
    pub fn as_basic(&self) -> Option<&BasicMode> {
        match self {
            Self::Basic(mode) => Some(mode),
            _ => None,
        }
    }

    pub fn as_japanese(&self) -> Option<&JapaneseMode> {
        match self {
            Self::Japanese(mode) => Some(mode),
            _ => None,
        }
    }

    pub fn as_utility(&self) -> Option<&UtilityMode> {
        match self {
            Self::Utility(mode) => Some(mode),
            _ => None,
        }
    }
}

impl From<BasicMode> for ModeSlot {
    fn from(mode: BasicMode) -> Self {
        Self::Basic(mode)
    }
}

impl From<JapaneseMode> for ModeSlot {
    fn from(mode: JapaneseMode) -> Self {
        Self::Japanese(mode)
    }
}

impl From<UtilityMode> for ModeSlot {
    fn from(mode: UtilityMode) -> Self {
        Self::Utility(mode)
    }
}

macro_rules! delegate {
    ($slot:expr, $mode:ident => $body:expr) => {
        match $slot {
            ModeSlot::Basic($mode) => $body,
            ModeSlot::Japanese($mode) => $body,
            ModeSlot::Utility($mode) => $body,
        }
    };
}

impl Mode for ModeSlot {
    fn name(&self) -> &'static str {
        delegate!(self, mode => mode.name())
    }

    fn reset_state(&mut self) {
        delegate!(self, mode => mode.reset_state())
    }

    fn begin_activation(&mut self) {
        delegate!(self, mode => mode.begin_activation())
    }

    fn regions(&self) -> &'static [RegionId] {
        delegate!(self, mode => mode.regions())
    }

    fn render_static<D: DisplaySink>(&self, display: &mut D) {
        delegate!(self, mode => mode.render_static(display))
    }

    fn render_dynamic<D: DisplaySink>(&self, display: &mut D) {
        delegate!(self, mode => mode.render_dynamic(display))
    }

    fn handle_rotation<K: KeystrokeSink>(
        &mut self,
        delta: i32,
        keys: &mut Keyboard<'_, K>,
    ) -> Transition {
        delegate!(self, mode => mode.handle_rotation(delta, keys))
    }

    fn handle_single_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        delegate!(self, mode => mode.handle_single_click(keys))
    }

    fn handle_double_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        delegate!(self, mode => mode.handle_double_click(keys))
    }

    fn handle_long_press<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        delegate!(self, mode => mode.handle_long_press(keys))
    }

    fn enter<D: DisplaySink>(&mut self, reset: bool, display: &mut D) {
        delegate!(self, mode => mode.enter(reset, display))
    }

    fn exit<D: DisplaySink>(&mut self, display: &mut D) {
        delegate!(self, mode => mode.exit(display))
    }
}

/// Moves `index` by `delta` around a ring of `len` entries.
pub(crate) fn ring_step(index: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as i64 + delta as i64).rem_euclid(len as i64) as usize
}

pub(crate) const PREV_REGION: RegionId = "prev";
pub(crate) const CURRENT_REGION: RegionId = "current";
pub(crate) const NEXT_REGION: RegionId = "next";

const DIAL_EDGE_MARGIN: i16 = 10;

/// Previous / current / next layout shared by the character dials.
pub(crate) fn create_dial_regions<D: DisplaySink>(display: &mut D) {
    let mid_y = DISPLAY_HEIGHT / 2;
    display.create_region(
        PREV_REGION,
        TextRegion::new(
            "",
            TextColor::Dim,
            2,
            Anchor::LEFT_MIDDLE,
            DIAL_EDGE_MARGIN,
            mid_y,
        ),
    );
    display.create_region(
        CURRENT_REGION,
        TextRegion::new(
            "",
            TextColor::Bright,
            4,
            Anchor::CENTER,
            DISPLAY_WIDTH / 2,
            mid_y - 4,
        ),
    );
    display.create_region(
        NEXT_REGION,
        TextRegion::new(
            "",
            TextColor::Dim,
            2,
            Anchor::RIGHT_MIDDLE,
            DISPLAY_WIDTH - DIAL_EDGE_MARGIN,
            mid_y,
        ),
    );
}

#[cfg(test)]
mod tests;
