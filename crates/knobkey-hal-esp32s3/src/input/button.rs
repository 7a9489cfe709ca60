use embedded_hal::digital::InputPin;
use knobkey_core::input::ButtonSource;

#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    active_low: bool,
    debounce_polls: u8,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            debounce_polls: 1,
        }
    }
}

impl ButtonConfig {
    pub const fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    /// Consecutive identical samples needed before a level change is
    /// reported.
    pub const fn with_debounce_polls(mut self, debounce_polls: u8) -> Self {
        self.debounce_polls = debounce_polls;
        self
    }
}

#[derive(Debug)]
pub enum ButtonError<E> {
    Pin(E),
}

/// Debounced push button on one GPIO input.
#[derive(Debug)]
pub struct ButtonInput<SW> {
    pin: SW,
    config: ButtonConfig,
    raw: bool,
    stable: bool,
    stable_count: u8,
}

impl<SW> ButtonInput<SW>
where
    SW: InputPin,
{
    pub fn new(mut pin: SW, config: ButtonConfig) -> Result<Self, ButtonError<SW::Error>> {
        let high = pin.is_high().map_err(ButtonError::Pin)?;
        let pressed = button_pressed_from_level(high, config.active_low);

        Ok(Self {
            pin,
            config,
            raw: pressed,
            stable: pressed,
            stable_count: 0,
        })
    }
}

impl<SW> ButtonSource for ButtonInput<SW>
where
    SW: InputPin,
{
    type Error = ButtonError<SW::Error>;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        let high = self.pin.is_high().map_err(ButtonError::Pin)?;
        let pressed = button_pressed_from_level(high, self.config.active_low);

        if pressed == self.raw {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.raw = pressed;
            self.stable_count = 0;
        }

        let debounce_threshold = self.config.debounce_polls.max(1);
        if self.stable_count >= debounce_threshold {
            self.stable = self.raw;
        }
        Ok(self.stable)
    }
}

#[inline]
fn button_pressed_from_level(high: bool, active_low: bool) -> bool {
    if active_low { !high } else { high }
}

#[cfg(test)]
mod tests {
    use core::{cell::Cell, convert::Infallible};

    use embedded_hal::digital::ErrorType;

    use super::*;

    struct FakePin<'a>(&'a Cell<bool>);

    impl ErrorType for FakePin<'_> {
        type Error = Infallible;
    }

    impl InputPin for FakePin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0.get())
        }
    }

    #[test]
    fn active_low_reads_low_as_pressed() {
        let level = Cell::new(true);
        let mut button = ButtonInput::new(FakePin(&level), ButtonConfig::default()).unwrap();
        assert!(!button.is_pressed().unwrap());

        level.set(false);
        assert!(!button.is_pressed().unwrap());
        assert!(button.is_pressed().unwrap());
    }

    #[test]
    fn glitches_shorter_than_debounce_are_ignored() {
        let level = Cell::new(true);
        let config = ButtonConfig::default().with_debounce_polls(3);
        let mut button = ButtonInput::new(FakePin(&level), config).unwrap();

        level.set(false);
        button.is_pressed().unwrap();
        level.set(true);
        for _ in 0..4 {
            assert!(!button.is_pressed().unwrap());
        }

        level.set(false);
        let samples: Vec<bool> = (0..5).map(|_| button.is_pressed().unwrap()).collect();
        assert_eq!(samples, [false, false, false, true, true]);
    }

    #[test]
    fn active_high_wiring() {
        let level = Cell::new(true);
        let config = ButtonConfig::default().with_active_low(false);
        let mut button = ButtonInput::new(FakePin(&level), config).unwrap();
        assert!(button.is_pressed().unwrap());
    }
}
