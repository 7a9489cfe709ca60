use log::debug;

use super::{
    BASIC, CURRENT_REGION, Mode, NEXT_REGION, PREV_REGION, Transition, create_dial_regions,
    ring_step,
};
use crate::{
    keyboard::{Keyboard, KeystrokeSink},
    render::{DisplaySink, RegionId, char_label},
};

/// Every symbol reachable on the basic dial, in ring order.
pub const BASIC_CHARACTERS: [char; 69] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ' ', '!',
    '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<', '=', '>',
    '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~',
];

const REGIONS: &[RegionId] = &[PREV_REGION, CURRENT_REGION, NEXT_REGION];

/// Safe-dial style entry: turn to a symbol, then reverse direction (or
/// click) to type it.
#[derive(Clone, Debug)]
pub struct BasicMode {
    index: usize,
    last_direction: Option<i8>,
}

impl BasicMode {
    pub const fn new() -> Self {
        Self {
            index: 0,
            last_direction: None,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn selected(&self) -> char {
        BASIC_CHARACTERS[self.index]
    }

    /// Sign of the last rotation since entry or the last click.
    pub const fn last_direction(&self) -> Option<i8> {
        self.last_direction
    }

    fn at(&self, offset: i32) -> char {
        BASIC_CHARACTERS[ring_step(self.index, offset, BASIC_CHARACTERS.len())]
    }
}

impl Default for BasicMode {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for BasicMode {
    fn name(&self) -> &'static str {
        BASIC
    }

    fn reset_state(&mut self) {
        self.index = 0;
    }

    fn begin_activation(&mut self) {
        self.last_direction = None;
    }

    fn regions(&self) -> &'static [RegionId] {
        REGIONS
    }

    fn render_static<D: DisplaySink>(&self, display: &mut D) {
        create_dial_regions(display);
    }

    fn render_dynamic<D: DisplaySink>(&self, display: &mut D) {
        display.set_text(PREV_REGION, &char_label(self.at(-1)));
        display.set_text(CURRENT_REGION, &char_label(self.selected()));
        display.set_text(NEXT_REGION, &char_label(self.at(1)));
    }

    fn handle_rotation<K: KeystrokeSink>(
        &mut self,
        delta: i32,
        keys: &mut Keyboard<'_, K>,
    ) -> Transition {
        if delta == 0 {
            return Transition::Stay;
        }

        let direction: i8 = if delta > 0 { 1 } else { -1 };
        if self.last_direction.is_some_and(|last| last != direction) {
            let left_behind = self.selected();
            debug!("basic: direction change commits {:?}", left_behind);
            self.send_character(keys, left_behind, false);
        }
        self.last_direction = Some(direction);

        self.index = ring_step(self.index, delta, BASIC_CHARACTERS.len());
        debug!("basic: selected {:?}", self.selected());
        Transition::Stay
    }

    fn handle_single_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        if self.send_character(keys, self.selected(), false) {
            self.last_direction = None;
        }
        Transition::Stay
    }

    fn handle_double_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        if self.send_character(keys, self.selected(), true) {
            self.last_direction = None;
        }
        Transition::Stay
    }

    fn handle_long_press<K: KeystrokeSink>(&mut self, _keys: &mut Keyboard<'_, K>) -> Transition {
        Transition::Activate(super::UTILITY)
    }
}
