use heapless::Vec;
use log::debug;

use super::{MAX_MODES, Mode, Transition, UTILITY, ring_step};
use crate::{
    keyboard::{Keyboard, KeystrokeSink},
    keymap::KeyCode,
    render::{Anchor, DISPLAY_HEIGHT, DISPLAY_WIDTH, DisplaySink, RegionId, TextColor, TextRegion},
};

const BS_REGION: RegionId = "bs";
const SP_REGION: RegionId = "sp";
const MENU_TITLE_REGION: RegionId = "menu_title";
const MENU_ITEM_REGION: RegionId = "menu_item";

const REGIONS: &[RegionId] = &[BS_REGION, SP_REGION, MENU_TITLE_REGION, MENU_ITEM_REGION];

const ARMED_SCALE: u8 = 4;
const IDLE_SCALE: u8 = 2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UtilityAction {
    Backspace,
    Space,
}

impl UtilityAction {
    const fn from_delta(delta: i32) -> Self {
        if delta > 0 { Self::Space } else { Self::Backspace }
    }

    fn region(self) -> (RegionId, TextRegion) {
        let (id, text, anchor, x) = match self {
            Self::Backspace => (BS_REGION, "BS", Anchor::LEFT_MIDDLE, 10),
            Self::Space => (SP_REGION, "SP", Anchor::RIGHT_MIDDLE, DISPLAY_WIDTH - 10),
        };
        let y = DISPLAY_HEIGHT / 2;
        (id, TextRegion::new(text, TextColor::Dim, IDLE_SCALE, anchor, x, y))
    }

    const fn key(self) -> KeyCode {
        match self {
            Self::Backspace => KeyCode::BACKSPACE,
            Self::Space => KeyCode::SPACE,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UtilityView {
    #[default]
    Action,
    Menu,
}

/// Editing actions that have no place on a character dial, plus the menu
/// for jumping straight to another mode.
#[derive(Clone, Debug)]
pub struct UtilityMode {
    destinations: Vec<&'static str, MAX_MODES>,
    menu_index: usize,
    armed: Option<UtilityAction>,
    rotated: bool,
    view: UtilityView,
}

impl UtilityMode {
    /// Builds the mode with the menu entries it can jump to. A controller
    /// replaces them with its registered modes on every registration.
    pub fn new(destinations: &[&'static str]) -> Self {
        let mut mode = Self {
            destinations: Vec::new(),
            menu_index: 0,
            armed: None,
            rotated: false,
            view: UtilityView::Action,
        };
        mode.set_destinations(destinations);
        mode
    }

    /// Replaces the menu entries. Its own name, duplicates and anything past
    /// the registry capacity are skipped.
    pub fn set_destinations(&mut self, names: &[&'static str]) {
        self.destinations.clear();
        for &name in names {
            if name == UTILITY || self.destinations.contains(&name) {
                continue;
            }
            if self.destinations.push(name).is_err() {
                break;
            }
        }
        if self.menu_index >= self.destinations.len() {
            self.menu_index = 0;
        }
    }

    pub fn destinations(&self) -> &[&'static str] {
        &self.destinations
    }

    pub const fn armed(&self) -> Option<UtilityAction> {
        self.armed
    }

    pub const fn view(&self) -> UtilityView {
        self.view
    }

    pub const fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn selected_destination(&self) -> Option<&'static str> {
        self.destinations.get(self.menu_index).copied()
    }

    fn rotate_action<K: KeystrokeSink>(
        &mut self,
        delta: i32,
        keys: &mut Keyboard<'_, K>,
    ) -> Transition {
        let action = UtilityAction::from_delta(delta);
        match self.armed {
            Some(armed) if armed != action => {
                if armed == UtilityAction::Space {
                    keys.send_key(KeyCode::ENTER);
                }
                debug!("utility: reversed after {:?}, leaving", armed);
                self.armed = None;
                Transition::ReturnToPrevious
            }
            _ => {
                self.armed = Some(action);
                keys.send_key(action.key());
                Transition::Stay
            }
        }
    }
}

impl Default for UtilityMode {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Mode for UtilityMode {
    fn name(&self) -> &'static str {
        UTILITY
    }

    fn reset_state(&mut self) {
        self.menu_index = 0;
    }

    fn begin_activation(&mut self) {
        self.armed = None;
        self.rotated = false;
        self.view = UtilityView::Action;
    }

    fn regions(&self) -> &'static [RegionId] {
        REGIONS
    }

    fn render_static<D: DisplaySink>(&self, display: &mut D) {
        for action in [UtilityAction::Backspace, UtilityAction::Space] {
            let (id, region) = action.region();
            display.create_region(id, region);
        }
        display.create_region(
            MENU_TITLE_REGION,
            TextRegion::new(
                "< Menu >",
                TextColor::Bright,
                1,
                Anchor::TOP_CENTER,
                DISPLAY_WIDTH / 2,
                5,
            )
            .with_hidden(true),
        );
        display.create_region(
            MENU_ITEM_REGION,
            TextRegion::new(
                "",
                TextColor::Bright,
                1,
                Anchor::CENTER,
                DISPLAY_WIDTH / 2,
                DISPLAY_HEIGHT / 2 + 5,
            )
            .with_hidden(true),
        );
    }

    fn render_dynamic<D: DisplaySink>(&self, display: &mut D) {
        let in_menu = self.view == UtilityView::Menu;
        display.set_hidden(BS_REGION, in_menu);
        display.set_hidden(SP_REGION, in_menu);
        display.set_hidden(MENU_TITLE_REGION, !in_menu);
        display.set_hidden(MENU_ITEM_REGION, !in_menu);

        if in_menu {
            display.set_text(MENU_ITEM_REGION, self.selected_destination().unwrap_or(""));
            return;
        }

        for action in [UtilityAction::Backspace, UtilityAction::Space] {
            let (id, _) = action.region();
            if self.armed == Some(action) {
                display.set_style(id, TextColor::Bright, ARMED_SCALE);
            } else {
                display.set_style(id, TextColor::Dim, IDLE_SCALE);
            }
        }
    }

    fn handle_rotation<K: KeystrokeSink>(
        &mut self,
        delta: i32,
        keys: &mut Keyboard<'_, K>,
    ) -> Transition {
        if delta == 0 {
            return Transition::Stay;
        }
        self.rotated = true;

        match self.view {
            UtilityView::Action => self.rotate_action(delta, keys),
            UtilityView::Menu => {
                self.menu_index = ring_step(self.menu_index, delta, self.destinations.len());
                Transition::Stay
            }
        }
    }

    fn handle_single_click<K: KeystrokeSink>(&mut self, keys: &mut Keyboard<'_, K>) -> Transition {
        match self.view {
            UtilityView::Menu => match self.selected_destination() {
                Some(name) => Transition::Activate(name),
                None => Transition::Stay,
            },
            UtilityView::Action if !self.rotated => Transition::ReturnToPrevious,
            UtilityView::Action => {
                match self.armed {
                    Some(UtilityAction::Space) => {
                        keys.send_key(KeyCode::ENTER);
                    }
                    Some(UtilityAction::Backspace) => {
                        keys.send_key(KeyCode::BACKSPACE);
                    }
                    None => {}
                }
                Transition::Stay
            }
        }
    }

    fn handle_double_click<K: KeystrokeSink>(&mut self, _keys: &mut Keyboard<'_, K>) -> Transition {
        Transition::ReturnToPrevious
    }

    fn handle_long_press<K: KeystrokeSink>(&mut self, _keys: &mut Keyboard<'_, K>) -> Transition {
        debug!("utility: menu");
        self.view = UtilityView::Menu;
        Transition::Stay
    }
}
