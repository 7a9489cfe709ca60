use core::fmt;

use heapless::{FnvIndexMap, Vec};
use log::debug;

use super::{BasicMode, JapaneseMode, Mode, ModeSlot, Transition, UtilityMode};
use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    keyboard::{Keyboard, KeystrokeSink},
    keymap::KeyboardLayout,
    render::DisplaySink,
};

/// Registry capacity. Must stay a power of two for the index map.
pub const MAX_MODES: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistryError {
    DuplicateName(&'static str),
    RegistryFull,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "mode {name:?} registered twice"),
            Self::RegistryFull => write!(f, "mode registry holds at most {MAX_MODES} modes"),
        }
    }
}

/// Owns every mode, tracks which one is active and which one was active
/// before it, and routes input events to the active mode.
pub struct ModeController<K, D, G> {
    modes: FnvIndexMap<&'static str, ModeSlot, MAX_MODES>,
    active: Option<&'static str>,
    previous: Option<&'static str>,
    keys: K,
    layout: KeyboardLayout,
    display: D,
    diagnostics: G,
}

impl<K, D, G> ModeController<K, D, G>
where
    K: KeystrokeSink,
    D: DisplaySink,
    G: Diagnostics,
{
    pub fn new(keys: K, layout: KeyboardLayout, display: D, diagnostics: G) -> Self {
        Self {
            modes: FnvIndexMap::new(),
            active: None,
            previous: None,
            keys,
            layout,
            display,
            diagnostics,
        }
    }

    pub fn register(&mut self, mode: impl Into<ModeSlot>) -> Result<(), RegistryError> {
        let mode = mode.into();
        let name = mode.name();
        if self.modes.contains_key(name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.modes
            .insert(name, mode)
            .map_err(|_| RegistryError::RegistryFull)?;
        debug!("mode: registered {}", name);
        self.refresh_menus();
        Ok(())
    }

    /// Points every menu-carrying mode at the current registry.
    fn refresh_menus(&mut self) {
        let mut names: Vec<&'static str, MAX_MODES> = Vec::new();
        for &name in self.modes.keys() {
            let _ = names.push(name);
        }
        for slot in self.modes.values_mut() {
            if let ModeSlot::Utility(utility) = slot {
                utility.set_destinations(&names);
            }
        }
    }

    /// Registers Basic, Japanese and Utility; Utility's menu offers the other
    /// two.
    pub fn install_default_modes(&mut self) -> Result<(), RegistryError> {
        self.register(BasicMode::new())?;
        self.register(JapaneseMode::new())?;
        self.register(UtilityMode::default())
    }

    /// Makes `name` the active mode. Unknown names leave everything as it
    /// was and return `false`.
    pub fn activate(&mut self, name: &str, reset: bool) -> bool {
        let Some(target) = self.modes.keys().copied().find(|&key| key == name) else {
            self.diagnostics.record(Diagnostic::UnknownMode { name });
            return false;
        };

        if let Some(current) = self.active.filter(|&current| current != target) {
            self.previous = Some(current);
            if let Some(mode) = self.modes.get_mut(current) {
                mode.exit(&mut self.display);
            }
        }

        self.active = Some(target);
        if let Some(mode) = self.modes.get_mut(target) {
            mode.enter(reset, &mut self.display);
        }
        self.diagnostics
            .record(Diagnostic::ModeEntered { name: target, reset });
        true
    }

    pub fn dispatch_rotation(&mut self, delta: i32) {
        self.dispatch(|mode, keys| mode.handle_rotation(delta, keys));
    }

    pub fn dispatch_single_click(&mut self) {
        self.dispatch(|mode, keys| mode.handle_single_click(keys));
    }

    pub fn dispatch_double_click(&mut self) {
        self.dispatch(|mode, keys| mode.handle_double_click(keys));
    }

    pub fn dispatch_long_press(&mut self) {
        self.dispatch(|mode, keys| mode.handle_long_press(keys));
    }

    fn dispatch(
        &mut self,
        handler: impl FnOnce(&mut ModeSlot, &mut Keyboard<'_, K>) -> Transition,
    ) {
        let Some(name) = self.active else {
            return;
        };
        let Some(mode) = self.modes.get_mut(name) else {
            return;
        };

        let transition = {
            let mut keys = Keyboard::new(&mut self.keys, self.layout, &mut self.diagnostics, name);
            handler(mode, &mut keys)
        };
        self.resolve(transition);

        if let Some(mode) = self.active.and_then(|name| self.modes.get(name)) {
            mode.render_dynamic(&mut self.display);
        }
    }

    fn resolve(&mut self, transition: Transition) {
        let target = match transition {
            Transition::Stay => return,
            Transition::Activate(name) => name,
            Transition::ReturnToPrevious => match self.previous {
                Some(name) => name,
                None => {
                    debug!("mode: no previous mode to return to");
                    return;
                }
            },
        };

        // Coming back to the suspended mode resumes it; anything else starts fresh.
        let reset = self.previous != Some(target);
        debug!("mode: transition to {} reset={}", target, reset);
        self.activate(target, reset);
    }
}

impl<K, D, G> ModeController<K, D, G> {
    pub fn active_name(&self) -> Option<&'static str> {
        self.active
    }

    pub fn previous_name(&self) -> Option<&'static str> {
        self.previous
    }

    pub fn mode(&self, name: &str) -> Option<&ModeSlot> {
        self.modes.get(name)
    }

    pub fn active_mode(&self) -> Option<&ModeSlot> {
        self.active.and_then(|name| self.modes.get(name))
    }

    pub fn mode_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modes.keys().copied()
    }

    pub const fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn diagnostics(&self) -> &G {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut G {
        &mut self.diagnostics
    }
}
