use log::debug;

use super::{
    CURRENT_REGION, JAPANESE, Mode, NEXT_REGION, PREV_REGION, Transition, UTILITY,
    create_dial_regions, ring_step,
};
use crate::{
    keyboard::{Keyboard, KeystrokeSink},
    keymap::KeyCode,
    render::{
        Anchor, DISPLAY_HEIGHT, DISPLAY_WIDTH, DisplaySink, LabelText, RegionId, TextColor,
        TextRegion, char_label,
    },
};

/// Browsed by counter-clockwise rotation.
pub const VOWELS: [char; 15] = [
    'a', 'i', 'u', 'e', 'o', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0',
];

/// Browsed by clockwise rotation.
pub const CONSONANTS: [char; 23] = [
    'k', 's', 't', 'n', 'h', 'm', 'y', 'r', 'w', 'g', 'z', 'd', 'b', 'p', '.', ',', '-', '/', '!',
    '?', '@', ' ', '\n',
];

const FOOTER_LEFT_REGION: RegionId = "footer_left";
const FOOTER_RIGHT_REGION: RegionId = "footer_right";
const FOOTER_MARGIN: i16 = 2;

const REGIONS: &[RegionId] = &[
    PREV_REGION,
    CURRENT_REGION,
    NEXT_REGION,
    FOOTER_LEFT_REGION,
    FOOTER_RIGHT_REGION,
];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Side {
    #[default]
    Vowel,
    Consonant,
}

impl Side {
    const fn from_delta(delta: i32) -> Self {
        if delta > 0 {
            Self::Consonant
        } else {
            Self::Vowel
        }
    }
}

/// Romanization entry over two lists: one rotation sense browses vowels,
/// the other consonants, and switching sides types what the old side held.
#[derive(Clone, Debug)]
pub struct JapaneseMode {
    vowel_index: usize,
    consonant_index: usize,
    active_side: Side,
    neutral: bool,
}

impl JapaneseMode {
    pub const fn new() -> Self {
        Self {
            vowel_index: 0,
            consonant_index: 0,
            active_side: Side::Vowel,
            neutral: true,
        }
    }

    pub const fn vowel_index(&self) -> usize {
        self.vowel_index
    }

    pub const fn consonant_index(&self) -> usize {
        self.consonant_index
    }

    pub const fn active_side(&self) -> Side {
        self.active_side
    }

    pub const fn is_neutral(&self) -> bool {
        self.neutral
    }

    /// Symbol the next commit would type.
    pub const fn selected(&self) -> char {
        match self.active_side {
            Side::Vowel => VOWELS[self.vowel_index],
            Side::Consonant => CONSONANTS[self.consonant_index],
        }
    }

    fn vowel_at(&self, offset: i32) -> char {
        VOWELS[ring_step(self.vowel_index, offset, VOWELS.len())]
    }

    fn consonant_at(&self, offset: i32) -> char {
        CONSONANTS[ring_step(self.consonant_index, offset, CONSONANTS.len())]
    }

    fn advance(&mut self, side: Side) {
        match side {
            Side::Vowel => self.vowel_index = ring_step(self.vowel_index, 1, VOWELS.len()),
            Side::Consonant => {
                self.consonant_index = ring_step(self.consonant_index, 1, CONSONANTS.len())
            }
        }
    }

    fn commit<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) {
        let ch = self.selected();
        debug!("japanese: commit {:?} from {:?}", ch, self.active_side);
        self.send_character(keys, ch, false);
    }

    /// Hint texts for the left and right dial slots.
    fn side_hints(&self) -> (char, char) {
        match (self.neutral, self.active_side) {
            (true, Side::Vowel) => (self.vowel_at(1), self.consonant_at(0)),
            (true, Side::Consonant) => (self.vowel_at(0), self.consonant_at(1)),
            (false, Side::Vowel) => (self.vowel_at(1), self.vowel_at(-1)),
            (false, Side::Consonant) => (self.consonant_at(-1), self.consonant_at(1)),
        }
    }

    fn footers(&self) -> (&'static str, &'static str) {
        match (self.neutral, self.active_side) {
            (true, _) => ("< Vowel", "Consonant >"),
            (false, Side::Vowel) => ("< Next", "Input >"),
            (false, Side::Consonant) => ("< Input", "Next >"),
        }
    }
}

impl Default for JapaneseMode {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate_label(ch: char) -> LabelText {
    let mut label = char_label(ch);
    label.make_ascii_uppercase();
    label
}

impl Mode for JapaneseMode {
    fn name(&self) -> &'static str {
        JAPANESE
    }

    fn reset_state(&mut self) {
        *self = Self::new();
    }

    fn begin_activation(&mut self) {
        self.neutral = true;
    }

    fn regions(&self) -> &'static [RegionId] {
        REGIONS
    }

    fn render_static<D: DisplaySink>(&self, display: &mut D) {
        create_dial_regions(display);
        let bottom = DISPLAY_HEIGHT - FOOTER_MARGIN;
        display.create_region(
            FOOTER_LEFT_REGION,
            TextRegion::new(
                "",
                TextColor::Dim,
                1,
                Anchor::BOTTOM_LEFT,
                FOOTER_MARGIN,
                bottom,
            ),
        );
        display.create_region(
            FOOTER_RIGHT_REGION,
            TextRegion::new(
                "",
                TextColor::Dim,
                1,
                Anchor::BOTTOM_RIGHT,
                DISPLAY_WIDTH - FOOTER_MARGIN,
                bottom,
            ),
        );
    }

    fn render_dynamic<D: DisplaySink>(&self, display: &mut D) {
        let (left, right) = self.side_hints();
        display.set_text(PREV_REGION, &candidate_label(left));
        display.set_text(CURRENT_REGION, &candidate_label(self.selected()));
        display.set_text(NEXT_REGION, &candidate_label(right));

        let (footer_left, footer_right) = self.footers();
        display.set_text(FOOTER_LEFT_REGION, footer_left);
        display.set_text(FOOTER_RIGHT_REGION, footer_right);
    }

    fn handle_rotation<K: KeystrokeSink>(
        &mut self,
        delta: i32,
        keys: &mut Keyboard<'_, K>,
    ) -> Transition {
        if delta == 0 {
            return Transition::Stay;
        }

        let target = Side::from_delta(delta);
        let switching = target != self.active_side;

        if switching && !self.neutral {
            self.commit(keys);
        }
        // Vowel browsing restarts after any consonant, typed by switch or click.
        if self.active_side == Side::Consonant && target == Side::Vowel {
            self.vowel_index = 0;
        }
        if !switching {
            self.advance(target);
        }

        self.active_side = target;
        self.neutral = false;
        Transition::Stay
    }

    fn handle_single_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        self.commit(keys);
        if self.active_side == Side::Consonant {
            self.vowel_index = 0;
        }
        self.neutral = true;
        Transition::Stay
    }

    fn handle_double_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        debug!("japanese: confirm entry");
        keys.send_key(KeyCode::ENTER);
        self.reset_state();
        Transition::Stay
    }

    fn handle_long_press<K: KeystrokeSink>(&mut self, _keys: &mut Keyboard<'_, K>) -> Transition {
        Transition::Activate(UTILITY)
    }
}
