use std::collections::HashMap;

use super::*;
use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    keyboard::KeyStroke,
    keymap::{KeyCode, KeyboardLayout},
    render::{NullDisplay, TextRegion},
};

#[derive(Default)]
struct RecordingKeys {
    strokes: Vec<KeyStroke>,
}

impl KeystrokeSink for RecordingKeys {
    type Error = ();

    fn send(&mut self, stroke: KeyStroke) -> Result<(), Self::Error> {
        self.strokes.push(stroke);
        Ok(())
    }
}

struct RejectingKeys;

impl KeystrokeSink for RejectingKeys {
    type Error = ();

    fn send(&mut self, _stroke: KeyStroke) -> Result<(), Self::Error> {
        Err(())
    }
}

#[derive(Default)]
struct RecordingDisplay {
    regions: HashMap<RegionId, TextRegion>,
}

impl RecordingDisplay {
    fn text(&self, id: RegionId) -> Option<&str> {
        self.regions.get(id).map(|region| region.text.as_str())
    }

    fn region(&self, id: RegionId) -> Option<&TextRegion> {
        self.regions.get(id)
    }
}

impl DisplaySink for RecordingDisplay {
    fn create_region(&mut self, id: RegionId, region: TextRegion) {
        self.regions.insert(id, region);
    }

    fn set_text(&mut self, id: RegionId, text: &str) {
        if let Some(region) = self.regions.get_mut(id) {
            region.text = crate::render::label_text(text);
        }
    }

    fn set_style(&mut self, id: RegionId, color: TextColor, scale: u8) {
        if let Some(region) = self.regions.get_mut(id) {
            region.color = color;
            region.scale = scale;
        }
    }

    fn set_hidden(&mut self, id: RegionId, hidden: bool) {
        if let Some(region) = self.regions.get_mut(id) {
            region.hidden = hidden;
        }
    }

    fn remove_region(&mut self, id: RegionId) {
        self.regions.remove(id);
    }
}

#[derive(Debug, PartialEq)]
enum Recorded {
    Unmapped(char),
    UnknownMode(String),
    Rejected,
    Entered(String, bool),
    Sent(char),
    Other,
}

#[derive(Default)]
struct RecordingDiagnostics {
    entries: Vec<Recorded>,
}

impl RecordingDiagnostics {
    fn errors(&self) -> Vec<&Recorded> {
        self.entries
            .iter()
            .filter(|entry| {
                matches!(
                    entry,
                    Recorded::Unmapped(_) | Recorded::UnknownMode(_) | Recorded::Rejected
                )
            })
            .collect()
    }

    fn last_entered(&self) -> Option<(&str, bool)> {
        self.entries.iter().rev().find_map(|entry| match entry {
            Recorded::Entered(name, reset) => Some((name.as_str(), *reset)),
            _ => None,
        })
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn record(&mut self, diagnostic: Diagnostic<'_>) {
        self.entries.push(match diagnostic {
            Diagnostic::UnmappedCharacter { ch, .. } => Recorded::Unmapped(ch),
            Diagnostic::UnknownMode { name } => Recorded::UnknownMode(name.into()),
            Diagnostic::KeystrokeRejected { .. } => Recorded::Rejected,
            Diagnostic::ModeEntered { name, reset } => Recorded::Entered(name.into(), reset),
            Diagnostic::CharacterSent { ch, .. } => Recorded::Sent(ch),
            _ => Recorded::Other,
        });
    }
}

/// Drives a single mode directly, without a controller.
#[derive(Default)]
struct Harness {
    keys: RecordingKeys,
    diagnostics: RecordingDiagnostics,
    layout: KeyboardLayout,
}

impl Harness {
    fn rotate<M: Mode>(&mut self, mode: &mut M, delta: i32) -> Transition {
        let mut keys = Keyboard::new(&mut self.keys, self.layout, &mut self.diagnostics, mode.name());
        mode.handle_rotation(delta, &mut keys)
    }

    fn click<M: Mode>(&mut self, mode: &mut M) -> Transition {
        let mut keys = Keyboard::new(&mut self.keys, self.layout, &mut self.diagnostics, mode.name());
        mode.handle_single_click(&mut keys)
    }

    fn double_click<M: Mode>(&mut self, mode: &mut M) -> Transition {
        let mut keys = Keyboard::new(&mut self.keys, self.layout, &mut self.diagnostics, mode.name());
        mode.handle_double_click(&mut keys)
    }

    fn long_press<M: Mode>(&mut self, mode: &mut M) -> Transition {
        let mut keys = Keyboard::new(&mut self.keys, self.layout, &mut self.diagnostics, mode.name());
        mode.handle_long_press(&mut keys)
    }

    fn strokes(&self) -> &[KeyStroke] {
        &self.keys.strokes
    }
}

fn typed(ch: char) -> KeyStroke {
    let binding = KeyboardLayout::Us.binding(ch).unwrap();
    KeyStroke::new(binding.key, binding.needs_shift)
}

fn key(code: KeyCode) -> KeyStroke {
    KeyStroke::new(code, false)
}

type TestController = ModeController<RecordingKeys, RecordingDisplay, RecordingDiagnostics>;

fn controller() -> TestController {
    let mut controller = ModeController::new(
        RecordingKeys::default(),
        KeyboardLayout::Us,
        RecordingDisplay::default(),
        RecordingDiagnostics::default(),
    );
    controller.install_default_modes().unwrap();
    assert!(controller.activate(BASIC, true));
    controller
}

fn basic_index(controller: &TestController) -> usize {
    controller.mode(BASIC).and_then(ModeSlot::as_basic).unwrap().index()
}

fn utility(controller: &TestController) -> &UtilityMode {
    controller.mode(UTILITY).and_then(ModeSlot::as_utility).unwrap()
}

#[test]
fn ring_step_wraps_both_ways() {
    assert_eq!(ring_step(0, -1, 5), 4);
    assert_eq!(ring_step(4, 1, 5), 0);
    assert_eq!(ring_step(2, -12, 5), 0);
    assert_eq!(ring_step(3, 7, 0), 0);
}

#[test]
fn basic_ring_visits_every_symbol_once() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();
    let mut visited = Vec::new();

    for _ in 0..BASIC_CHARACTERS.len() {
        visited.push(mode.selected());
        harness.rotate(&mut mode, 1);
    }

    assert_eq!(mode.index(), 0);
    assert_eq!(visited.as_slice(), BASIC_CHARACTERS.as_slice());
    assert!(harness.strokes().is_empty());
}

#[test]
fn basic_rotations_summing_to_ring_length_return_home() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();
    harness.rotate(&mut mode, 7);
    let start = mode.index();

    harness.rotate(&mut mode, 50);
    harness.rotate(&mut mode, 19);
    assert_eq!(mode.index(), start);

    harness.rotate(&mut mode, 138);
    assert_eq!(mode.index(), start);
}

#[test]
fn basic_first_rotation_only_records_direction() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();

    assert_eq!(harness.rotate(&mut mode, 3), Transition::Stay);
    assert_eq!(mode.index(), 3);
    assert_eq!(mode.last_direction(), Some(1));
    assert!(harness.strokes().is_empty());
}

#[test]
fn basic_reversal_commits_symbol_left_behind() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();

    for _ in 0..3 {
        harness.rotate(&mut mode, 1);
    }
    assert_eq!(mode.selected(), 'd');

    harness.rotate(&mut mode, -1);
    harness.rotate(&mut mode, -1);

    assert_eq!(harness.strokes(), &[typed('d')]);
    assert_eq!(mode.selected(), 'b');
    assert_eq!(mode.last_direction(), Some(-1));
}

#[test]
fn basic_click_sends_and_clears_direction() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();

    harness.rotate(&mut mode, 2);
    assert_eq!(harness.click(&mut mode), Transition::Stay);
    assert_eq!(mode.last_direction(), None);

    // Direction was forgotten, so this only records the new sign.
    harness.rotate(&mut mode, -1);
    assert_eq!(harness.strokes(), &[typed('c')]);
}

#[test]
fn basic_double_click_forces_shift() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();

    assert_eq!(harness.double_click(&mut mode), Transition::Stay);
    assert_eq!(harness.strokes(), &[KeyStroke::new(KeyCode::A, true)]);
}

#[test]
fn basic_long_press_asks_for_utility() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();
    assert_eq!(harness.long_press(&mut mode), Transition::Activate(UTILITY));
}

#[test]
fn basic_enter_without_reset_keeps_index() {
    let mut harness = Harness::default();
    let mut mode = BasicMode::new();
    let mut display = RecordingDisplay::default();

    harness.rotate(&mut mode, 5);
    mode.enter(false, &mut display);
    assert_eq!(mode.index(), 5);
    assert_eq!(mode.last_direction(), None);
    assert_eq!(display.text(CURRENT_REGION), Some("f"));
    assert_eq!(display.text(PREV_REGION), Some("e"));
    assert_eq!(display.text(NEXT_REGION), Some("g"));

    mode.enter(true, &mut display);
    assert_eq!(mode.index(), 0);
    assert_eq!(display.text(PREV_REGION), Some("~"));
}

#[test]
fn japanese_side_switch_commits_consonant() {
    let mut harness = Harness::default();
    let mut mode = JapaneseMode::new();
    harness.rotate(&mut mode, -1);
    harness.click(&mut mode);
    harness.keys.strokes.clear();

    harness.rotate(&mut mode, 1);
    assert!(harness.strokes().is_empty());
    assert_eq!(mode.active_side(), Side::Consonant);
    assert!(!mode.is_neutral());

    harness.rotate(&mut mode, -1);
    assert_eq!(harness.strokes(), &[typed('k')]);
    assert_eq!(mode.vowel_index(), 0);
    assert_eq!(mode.active_side(), Side::Vowel);
    assert!(!mode.is_neutral());
}

#[test]
fn japanese_same_side_rotation_browses() {
    let mut harness = Harness::default();
    let mut mode = JapaneseMode::new();

    harness.rotate(&mut mode, -1);
    harness.rotate(&mut mode, -3);
    assert_eq!(mode.selected(), 'u');
    assert!(harness.strokes().is_empty());

    harness.rotate(&mut mode, 1);
    harness.rotate(&mut mode, 1);
    harness.rotate(&mut mode, 1);
    assert_eq!(harness.strokes(), &[typed('u')]);
    assert_eq!(mode.selected(), 't');
    // Leaving the vowel side keeps its position.
    assert_eq!(mode.vowel_index(), 2);
}

#[test]
fn japanese_consonant_click_restarts_vowels() {
    let mut harness = Harness::default();
    let mut mode = JapaneseMode::new();

    harness.rotate(&mut mode, -1);
    harness.rotate(&mut mode, -1);
    harness.rotate(&mut mode, 1);
    harness.rotate(&mut mode, 1);
    assert_eq!(mode.vowel_index(), 2);

    assert_eq!(harness.click(&mut mode), Transition::Stay);
    assert_eq!(harness.strokes(), &[typed('u'), typed('s')]);
    assert_eq!(mode.vowel_index(), 0);
    assert_eq!(mode.active_side(), Side::Consonant);
    assert!(mode.is_neutral());

    // Neutral, so switching sides types nothing.
    harness.rotate(&mut mode, -1);
    assert_eq!(harness.strokes().len(), 2);
    assert_eq!(mode.selected(), 'a');
}

#[test]
fn japanese_double_click_confirms_and_resets() {
    let mut harness = Harness::default();
    let mut mode = JapaneseMode::new();

    harness.rotate(&mut mode, -2);
    harness.rotate(&mut mode, 1);
    harness.rotate(&mut mode, 1);

    assert_eq!(harness.double_click(&mut mode), Transition::Stay);
    assert_eq!(harness.strokes().last(), Some(&key(KeyCode::ENTER)));
    assert_eq!(mode.vowel_index(), 0);
    assert_eq!(mode.consonant_index(), 0);
    assert_eq!(mode.active_side(), Side::Vowel);
    assert!(mode.is_neutral());
}

#[test]
fn japanese_display_follows_armed_side() {
    let mut harness = Harness::default();
    let mut mode = JapaneseMode::new();
    let mut display = RecordingDisplay::default();
    mode.enter(true, &mut display);

    assert_eq!(display.text(PREV_REGION), Some("I"));
    assert_eq!(display.text(CURRENT_REGION), Some("A"));
    assert_eq!(display.text(NEXT_REGION), Some("K"));
    assert_eq!(display.text("footer_left"), Some("< Vowel"));
    assert_eq!(display.text("footer_right"), Some("Consonant >"));

    harness.rotate(&mut mode, -1);
    mode.render_dynamic(&mut display);
    assert_eq!(display.text(PREV_REGION), Some("U"));
    assert_eq!(display.text(CURRENT_REGION), Some("I"));
    assert_eq!(display.text(NEXT_REGION), Some("A"));
    assert_eq!(display.text("footer_left"), Some("< Next"));
    assert_eq!(display.text("footer_right"), Some("Input >"));

    harness.rotate(&mut mode, 1);
    for _ in 0..22 {
        harness.rotate(&mut mode, 1);
    }
    mode.render_dynamic(&mut display);
    assert_eq!(mode.selected(), '\n');
    assert_eq!(display.text(CURRENT_REGION), Some("EN"));
    assert_eq!(display.text(PREV_REGION), Some("SP"));
    assert_eq!(display.text(NEXT_REGION), Some("K"));
    assert_eq!(display.text("footer_left"), Some("< Input"));
}

#[test]
fn japanese_enter_clears_neutral_but_keeps_indices() {
    let mut harness = Harness::default();
    let mut mode = JapaneseMode::new();
    harness.rotate(&mut mode, 1);
    harness.rotate(&mut mode, 1);
    harness.rotate(&mut mode, 1);

    mode.enter(false, &mut NullDisplay);
    assert!(mode.is_neutral());
    assert_eq!(mode.consonant_index(), 2);
    assert_eq!(mode.active_side(), Side::Consonant);

    harness.rotate(&mut mode, -1);
    assert!(harness.strokes().is_empty());
}

#[test]
fn utility_unused_entry_click_returns() {
    let mut harness = Harness::default();
    let mut mode = UtilityMode::default();

    assert_eq!(harness.click(&mut mode), Transition::ReturnToPrevious);
    assert!(harness.strokes().is_empty());
}

#[test]
fn utility_rotation_repeats_action() {
    let mut harness = Harness::default();
    let mut mode = UtilityMode::default();

    assert_eq!(harness.rotate(&mut mode, 1), Transition::Stay);
    assert_eq!(harness.rotate(&mut mode, 2), Transition::Stay);
    assert_eq!(mode.armed(), Some(UtilityAction::Space));
    assert_eq!(
        harness.strokes(),
        &[key(KeyCode::SPACE), key(KeyCode::SPACE)]
    );

    assert_eq!(harness.click(&mut mode), Transition::Stay);
    assert_eq!(harness.strokes().last(), Some(&key(KeyCode::ENTER)));
}

#[test]
fn utility_reversal_after_space_confirms_and_returns() {
    let mut harness = Harness::default();
    let mut mode = UtilityMode::default();

    harness.rotate(&mut mode, 1);
    assert_eq!(harness.rotate(&mut mode, -1), Transition::ReturnToPrevious);
    assert_eq!(
        harness.strokes(),
        &[key(KeyCode::SPACE), key(KeyCode::ENTER)]
    );
    assert_eq!(mode.armed(), None);
}

#[test]
fn utility_reversal_after_backspace_just_returns() {
    let mut harness = Harness::default();
    let mut mode = UtilityMode::default();

    harness.rotate(&mut mode, -1);
    assert_eq!(harness.click(&mut mode), Transition::Stay);
    assert_eq!(harness.rotate(&mut mode, 1), Transition::ReturnToPrevious);
    assert_eq!(
        harness.strokes(),
        &[key(KeyCode::BACKSPACE), key(KeyCode::BACKSPACE)]
    );
}

#[test]
fn utility_double_click_always_returns() {
    let mut harness = Harness::default();
    let mut mode = UtilityMode::default();
    harness.rotate(&mut mode, 1);
    assert_eq!(harness.double_click(&mut mode), Transition::ReturnToPrevious);
}

#[test]
fn utility_menu_cycles_destinations() {
    let mut harness = Harness::default();
    let mut mode = UtilityMode::new(&[BASIC, UTILITY, JAPANESE, BASIC]);
    assert_eq!(mode.destinations(), &[BASIC, JAPANESE]);

    assert_eq!(harness.long_press(&mut mode), Transition::Stay);
    assert_eq!(mode.view(), UtilityView::Menu);
    // An untouched menu still activates its current entry.
    assert_eq!(harness.click(&mut mode), Transition::Activate(BASIC));

    harness.rotate(&mut mode, 1);
    assert_eq!(harness.click(&mut mode), Transition::Activate(JAPANESE));
    harness.rotate(&mut mode, 3);
    assert_eq!(mode.selected_destination(), Some(BASIC));
    assert!(harness.strokes().is_empty());
}

#[test]
fn utility_display_highlights_armed_action() {
    let mut harness = Harness::default();
    let mut mode = UtilityMode::new(&[BASIC, JAPANESE]);
    let mut display = RecordingDisplay::default();
    mode.enter(true, &mut display);

    assert_eq!(display.region("bs").map(|r| r.scale), Some(2));
    assert_eq!(display.region("menu_title").map(|r| r.hidden), Some(true));

    harness.rotate(&mut mode, -1);
    mode.render_dynamic(&mut display);
    let bs = display.region("bs").unwrap();
    assert_eq!((bs.color, bs.scale), (TextColor::Bright, 4));
    let sp = display.region("sp").unwrap();
    assert_eq!((sp.color, sp.scale), (TextColor::Dim, 2));

    harness.long_press(&mut mode);
    mode.render_dynamic(&mut display);
    assert_eq!(display.region("bs").map(|r| r.hidden), Some(true));
    assert_eq!(display.region("menu_item").map(|r| r.hidden), Some(false));
    assert_eq!(display.text("menu_item"), Some(BASIC));
}

#[test]
fn controller_resumes_previous_mode_without_reset() {
    let mut controller = controller();
    controller.dispatch_rotation(5);
    controller.dispatch_rotation(-2);
    let before = basic_index(&controller);

    controller.dispatch_long_press();
    assert_eq!(controller.active_name(), Some(UTILITY));
    assert_eq!(controller.previous_name(), Some(BASIC));

    controller.dispatch_single_click();
    assert_eq!(controller.active_name(), Some(BASIC));
    assert_eq!(controller.diagnostics().last_entered(), Some((BASIC, false)));
    assert_eq!(basic_index(&controller), before);
}

#[test]
fn controller_menu_activation_starts_fresh() {
    let mut controller = controller();
    controller.dispatch_rotation(4);

    controller.dispatch_long_press();
    controller.dispatch_long_press();
    controller.dispatch_rotation(1);
    controller.dispatch_single_click();
    assert_eq!(controller.active_name(), Some(JAPANESE));
    assert_eq!(controller.previous_name(), Some(UTILITY));
    assert_eq!(controller.diagnostics().last_entered(), Some((JAPANESE, true)));

    // Utility is the recorded previous mode, so it resumes with the menu
    // still pointing at Japanese.
    controller.dispatch_long_press();
    assert_eq!(controller.diagnostics().last_entered(), Some((UTILITY, false)));
    assert_eq!(utility(&controller).menu_index(), 1);

    // Japanese came from Utility, so Basic is a fresh entry again.
    controller.dispatch_long_press();
    controller.dispatch_rotation(1);
    controller.dispatch_single_click();
    assert_eq!(controller.active_name(), Some(BASIC));
    assert_eq!(controller.diagnostics().last_entered(), Some((BASIC, true)));
    assert_eq!(basic_index(&controller), 0);
}

#[test]
fn controller_menu_back_to_previous_mode_resumes() {
    let mut controller = controller();
    controller.dispatch_rotation(4);
    controller.dispatch_rotation(-1);
    let before = basic_index(&controller);

    controller.dispatch_long_press();
    controller.dispatch_long_press();
    assert_eq!(utility(&controller).selected_destination(), Some(BASIC));
    controller.dispatch_single_click();

    assert_eq!(controller.active_name(), Some(BASIC));
    assert_eq!(controller.diagnostics().last_entered(), Some((BASIC, false)));
    assert_eq!(basic_index(&controller), before);
}

#[test]
fn controller_menu_lists_only_registered_modes() {
    let mut controller = ModeController::new(
        RecordingKeys::default(),
        KeyboardLayout::Us,
        RecordingDisplay::default(),
        RecordingDiagnostics::default(),
    );
    controller.register(UtilityMode::new(&[BASIC, JAPANESE])).unwrap();
    controller.register(BasicMode::new()).unwrap();
    assert_eq!(utility(&controller).destinations(), &[BASIC]);
    assert!(controller.activate(BASIC, true));

    controller.dispatch_long_press();
    controller.dispatch_long_press();
    controller.dispatch_rotation(1);
    assert_eq!(utility(&controller).selected_destination(), Some(BASIC));
    controller.dispatch_single_click();

    assert_eq!(controller.active_name(), Some(BASIC));
    assert!(controller.diagnostics().errors().is_empty());
}

#[test]
fn default_modes_offer_each_other_in_the_menu() {
    let controller = controller();
    assert_eq!(utility(&controller).destinations(), &[BASIC, JAPANESE]);
}

#[test]
fn controller_exit_releases_regions() {
    let mut controller = controller();
    assert!(controller.display().region(CURRENT_REGION).is_some());

    controller.dispatch_long_press();
    assert!(controller.display().region(CURRENT_REGION).is_none());
    assert!(controller.display().region("bs").is_some());

    controller.dispatch_double_click();
    assert!(controller.display().region("bs").is_none());
    assert_eq!(controller.display().text(CURRENT_REGION), Some("a"));
}

#[test]
fn controller_refreshes_display_after_dispatch() {
    let mut controller = controller();
    controller.dispatch_rotation(1);
    assert_eq!(controller.display().text(CURRENT_REGION), Some("b"));
    controller.dispatch_rotation(-2);
    assert_eq!(controller.display().text(CURRENT_REGION), Some("~"));
    assert_eq!(controller.keys().strokes, vec![typed('b')]);
}

#[test]
fn controller_ignores_unknown_mode() {
    let mut controller = controller();
    controller.dispatch_rotation(3);

    assert!(!controller.activate("Cyrillic", true));
    assert_eq!(controller.active_name(), Some(BASIC));
    assert_eq!(controller.previous_name(), None);
    assert_eq!(basic_index(&controller), 3);
    assert_eq!(
        controller.diagnostics().errors(),
        vec![&Recorded::UnknownMode("Cyrillic".into())]
    );
}

#[test]
fn controller_unregistered_transition_keeps_current_mode() {
    let mut controller = ModeController::new(
        RecordingKeys::default(),
        KeyboardLayout::Us,
        NullDisplay,
        RecordingDiagnostics::default(),
    );
    controller.register(BasicMode::new()).unwrap();
    controller.activate(BASIC, true);

    controller.dispatch_long_press();
    assert_eq!(controller.active_name(), Some(BASIC));
    assert_eq!(
        controller.diagnostics().errors(),
        vec![&Recorded::UnknownMode(UTILITY.into())]
    );
}

#[test]
fn controller_return_without_history_stays() {
    let mut controller = ModeController::new(
        RecordingKeys::default(),
        KeyboardLayout::Us,
        NullDisplay,
        RecordingDiagnostics::default(),
    );
    controller.register(UtilityMode::default()).unwrap();
    controller.activate(UTILITY, true);

    controller.dispatch_double_click();
    assert_eq!(controller.active_name(), Some(UTILITY));
    assert!(controller.diagnostics().errors().is_empty());
}

#[test]
fn controller_rejects_duplicate_names() {
    let mut controller = controller();
    assert_eq!(
        controller.register(BasicMode::new()),
        Err(RegistryError::DuplicateName(BASIC))
    );
    assert_eq!(controller.mode_names().count(), 3);
}

#[test]
fn controller_without_display_types_the_same() {
    fn script<D: DisplaySink>(controller: &mut ModeController<RecordingKeys, D, RecordingDiagnostics>) {
        controller.dispatch_rotation(3);
        controller.dispatch_rotation(-1);
        controller.dispatch_double_click();
        controller.dispatch_long_press();
        controller.dispatch_rotation(1);
        controller.dispatch_rotation(-1);
    }

    let mut with_display = controller();
    script(&mut with_display);

    let mut headless = ModeController::new(
        RecordingKeys::default(),
        KeyboardLayout::Us,
        NullDisplay,
        RecordingDiagnostics::default(),
    );
    headless.install_default_modes().unwrap();
    headless.activate(BASIC, true);
    script(&mut headless);

    assert_eq!(with_display.keys().strokes, headless.keys().strokes);
    assert_eq!(headless.active_name(), Some(BASIC));
}

#[test]
fn basic_rejected_click_keeps_direction() {
    let mut sink = RejectingKeys;
    let mut diagnostics = RecordingDiagnostics::default();
    let mut mode = BasicMode::new();
    {
        let mut keys = Keyboard::new(&mut sink, KeyboardLayout::Us, &mut diagnostics, BASIC);
        mode.handle_rotation(2, &mut keys);
        mode.handle_single_click(&mut keys);
        mode.handle_double_click(&mut keys);
    }

    assert_eq!(mode.last_direction(), Some(1));
    assert_eq!(mode.index(), 2);
    assert_eq!(
        diagnostics.errors(),
        vec![&Recorded::Rejected, &Recorded::Rejected]
    );
}

#[test]
fn rejected_keystrokes_are_reported() {
    let mut controller = ModeController::new(
        RejectingKeys,
        KeyboardLayout::Us,
        NullDisplay,
        RecordingDiagnostics::default(),
    );
    controller.install_default_modes().unwrap();
    controller.activate(BASIC, true);

    controller.dispatch_single_click();
    assert_eq!(controller.diagnostics().errors(), vec![&Recorded::Rejected]);
    assert_eq!(controller.active_name(), Some(BASIC));
}

#[test]
fn unmapped_character_sends_nothing() {
    let mut harness = Harness::default();
    let mut keys = Keyboard::new(
        &mut harness.keys,
        KeyboardLayout::Jis,
        &mut harness.diagnostics,
        BASIC,
    );

    assert!(!keys.send_character('é', false));
    assert!(keys.send_character('_', false));
    assert_eq!(
        harness.diagnostics.entries,
        vec![Recorded::Unmapped('é'), Recorded::Sent('_')]
    );
    assert_eq!(
        harness.keys.strokes,
        vec![KeyStroke::new(KeyCode::INTERNATIONAL1, true)]
    );
}

#[test]
fn every_selectable_symbol_has_a_binding() {
    let tables: [&[char]; 3] = [&BASIC_CHARACTERS, &VOWELS, &CONSONANTS];
    for layout in [KeyboardLayout::Us, KeyboardLayout::Jis] {
        for ch in tables.iter().flat_map(|table| table.iter().copied()) {
            assert!(
                layout.binding(ch).is_some(),
                "{ch:?} unmapped on {layout:?}"
            );
        }
    }
}
