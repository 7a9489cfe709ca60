//! Per-tick input loop tying the knob, the button and the modes together.

use log::debug;

use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    gesture::{GestureConfig, GestureDetector, GestureEvent},
    input::{ButtonSource, PositionSource},
    keyboard::KeystrokeSink,
    keymap::KeyboardLayout,
    mode::{ModeController, RegistryError},
    render::DisplaySink,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KnobConfig {
    gesture: GestureConfig,
    layout: KeyboardLayout,
    invert_rotation: bool,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            layout: KeyboardLayout::Us,
            invert_rotation: false,
        }
    }
}

impl KnobConfig {
    pub const fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    pub const fn with_layout(mut self, layout: KeyboardLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Flips the rotation sign for encoders wired the other way round.
    pub const fn with_invert_rotation(mut self, invert_rotation: bool) -> Self {
        self.invert_rotation = invert_rotation;
        self
    }

    pub const fn gesture(&self) -> GestureConfig {
        self.gesture
    }

    pub const fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub const fn invert_rotation(&self) -> bool {
        self.invert_rotation
    }
}

pub struct KnobApp<P, B, K, D, G> {
    position: P,
    button: B,
    gestures: GestureDetector,
    controller: ModeController<K, D, G>,
    invert_rotation: bool,
    last_position: Option<i32>,
}

impl<P, B, K, D, G> KnobApp<P, B, K, D, G>
where
    P: PositionSource,
    B: ButtonSource,
    K: KeystrokeSink,
    D: DisplaySink,
    G: Diagnostics,
{
    /// Builds the app with the Basic, Japanese and Utility modes installed.
    pub fn new(
        position: P,
        button: B,
        keys: K,
        display: D,
        diagnostics: G,
        config: KnobConfig,
    ) -> Result<Self, RegistryError> {
        let mut controller = ModeController::new(keys, config.layout, display, diagnostics);
        controller.install_default_modes()?;
        Ok(Self::with_controller(position, button, controller, config))
    }

    /// Uses an already populated controller. Its layout wins over the one in
    /// `config`.
    pub fn with_controller(
        position: P,
        button: B,
        controller: ModeController<K, D, G>,
        config: KnobConfig,
    ) -> Self {
        Self {
            position,
            button,
            gestures: GestureDetector::new(config.gesture),
            controller,
            invert_rotation: config.invert_rotation,
            last_position: None,
        }
    }

    /// Activates the first mode with fresh state.
    pub fn start(&mut self, mode: &str) -> bool {
        self.controller.activate(mode, true)
    }

    /// One poll: rotation first, then at most one gesture.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        let mut dispatched = false;

        match self.position.position() {
            Ok(position) => {
                let delta = self.take_delta(position);
                if delta != 0 {
                    debug!("knob: delta {}", delta);
                    self.controller.dispatch_rotation(delta);
                    dispatched = true;
                }
            }
            Err(_) => self
                .controller
                .diagnostics_mut()
                .record(Diagnostic::EncoderFault),
        }

        match self.button.is_pressed() {
            Ok(pressed) => {
                if let Some(event) = self.gestures.poll(pressed, now_ms) {
                    debug!("knob: {:?}", event);
                    match event {
                        GestureEvent::SingleClick => self.controller.dispatch_single_click(),
                        GestureEvent::DoubleClick => self.controller.dispatch_double_click(),
                        GestureEvent::LongPress => self.controller.dispatch_long_press(),
                    }
                    dispatched = true;
                }
            }
            Err(_) => self
                .controller
                .diagnostics_mut()
                .record(Diagnostic::ButtonFault),
        }

        if dispatched {
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }

    fn take_delta(&mut self, position: i32) -> i32 {
        let Some(last) = self.last_position.replace(position) else {
            return 0;
        };
        let delta = position.wrapping_sub(last);
        if self.invert_rotation {
            delta.wrapping_neg()
        } else {
            delta
        }
    }
}

impl<P, B, K, D, G> KnobApp<P, B, K, D, G> {
    pub fn controller(&self) -> &ModeController<K, D, G> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ModeController<K, D, G> {
        &mut self.controller
    }

    pub fn position_source_mut(&mut self) -> &mut P {
        &mut self.position
    }

    pub fn button_source_mut(&mut self) -> &mut B {
        &mut self.button
    }
}
