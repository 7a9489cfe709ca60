//! Button gesture detection.
//!
//! [`GestureDetector`] turns one logical button sample per poll into at most
//! one [`GestureEvent`]. Priority when several conditions hold on the same
//! poll: long press, then double click, then timed-out single click.

use log::debug;

/// Semantic button gesture.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GestureEvent {
    SingleClick,
    DoubleClick,
    LongPress,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GestureConfig {
    double_click_ms: u64,
    long_press_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 300,
            long_press_ms: 500,
        }
    }
}

impl GestureConfig {
    pub const fn with_double_click_ms(mut self, double_click_ms: u64) -> Self {
        self.double_click_ms = double_click_ms;
        self
    }

    pub const fn with_long_press_ms(mut self, long_press_ms: u64) -> Self {
        self.long_press_ms = long_press_ms;
        self
    }

    pub const fn double_click_ms(&self) -> u64 {
        self.double_click_ms
    }

    pub const fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }
}

#[derive(Clone, Debug)]
pub struct GestureDetector {
    config: GestureConfig,
    pressed: bool,
    press_start_ms: u64,
    long_press_fired: bool,
    last_click_ms: u64,
    awaiting_pair: bool,
}

impl GestureDetector {
    pub const fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pressed: false,
            press_start_ms: 0,
            long_press_fired: false,
            last_click_ms: 0,
            awaiting_pair: false,
        }
    }

    pub const fn config(&self) -> GestureConfig {
        self.config
    }

    /// Whether a lone click is still waiting for a possible second click.
    pub const fn awaiting_pair(&self) -> bool {
        self.awaiting_pair
    }

    /// Feed one button sample (`pressed` is the logical level, already
    /// corrected for active-low wiring).
    pub fn poll(&mut self, pressed: bool, now_ms: u64) -> Option<GestureEvent> {
        let press_edge = pressed && !self.pressed;
        let release_edge = !pressed && self.pressed;
        self.pressed = pressed;

        if press_edge {
            self.press_start_ms = now_ms;
            self.long_press_fired = false;
        }

        if pressed
            && !self.long_press_fired
            && now_ms.saturating_sub(self.press_start_ms) >= self.config.long_press_ms
        {
            self.long_press_fired = true;
            self.awaiting_pair = false;
            debug!(
                "gesture: long press held_ms={}",
                now_ms.saturating_sub(self.press_start_ms)
            );
            return Some(GestureEvent::LongPress);
        }

        if release_edge && !self.long_press_fired {
            if self.awaiting_pair {
                let since_click = now_ms.saturating_sub(self.last_click_ms);
                if since_click < self.config.double_click_ms {
                    self.awaiting_pair = false;
                    debug!("gesture: double click gap_ms={}", since_click);
                    return Some(GestureEvent::DoubleClick);
                }

                // The earlier click expired unnoticed; resolve it now and let
                // this release open a fresh pairing window.
                self.last_click_ms = now_ms;
                return Some(GestureEvent::SingleClick);
            }

            self.awaiting_pair = true;
            self.last_click_ms = now_ms;
            return None;
        }

        if self.awaiting_pair
            && now_ms.saturating_sub(self.last_click_ms) >= self.config.double_click_ms
        {
            self.awaiting_pair = false;
            return Some(GestureEvent::SingleClick);
        }

        None
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the detector with a level timeline sampled every `step_ms`.
    fn run(levels: &[(u64, bool)], until_ms: u64, step_ms: u64) -> Vec<(u64, GestureEvent)> {
        let mut detector = GestureDetector::default();
        let mut events = Vec::new();
        let mut now = 0;
        while now <= until_ms {
            let pressed = levels
                .iter()
                .rev()
                .find(|(at, _)| *at <= now)
                .map(|(_, level)| *level)
                .unwrap_or(false);
            if let Some(event) = detector.poll(pressed, now) {
                events.push((now, event));
            }
            now += step_ms;
        }
        events
    }

    fn count(events: &[(u64, GestureEvent)], kind: GestureEvent) -> usize {
        events.iter().filter(|(_, event)| *event == kind).count()
    }

    #[test]
    fn two_quick_clicks_make_one_double_click() {
        let events = run(
            &[(0, true), (50, false), (200, true), (250, false)],
            1_000,
            10,
        );
        assert_eq!(count(&events, GestureEvent::DoubleClick), 1);
        assert_eq!(count(&events, GestureEvent::SingleClick), 0);
        assert_eq!(count(&events, GestureEvent::LongPress), 0);
    }

    #[test]
    fn lone_click_resolves_after_window() {
        let events = run(&[(0, true), (50, false)], 1_000, 10);
        assert_eq!(events, vec![(350, GestureEvent::SingleClick)]);
    }

    #[test]
    fn lone_click_is_not_reported_before_window() {
        let events = run(&[(0, true), (50, false)], 340, 10);
        assert!(events.is_empty());
    }

    #[test]
    fn hold_fires_single_long_press_and_release_is_silent() {
        let events = run(&[(0, true), (900, false)], 2_000, 10);
        assert_eq!(events, vec![(500, GestureEvent::LongPress)]);
    }

    #[test]
    fn long_press_cancels_pending_pair() {
        // Click, then press again inside the window and keep holding.
        let events = run(
            &[(0, true), (30, false), (100, true), (800, false)],
            1_500,
            10,
        );
        assert_eq!(count(&events, GestureEvent::LongPress), 1);
        assert_eq!(count(&events, GestureEvent::DoubleClick), 0);
        // The first click times out while the second press is still held.
        assert_eq!(count(&events, GestureEvent::SingleClick), 1);
    }

    #[test]
    fn slow_second_click_yields_two_single_clicks() {
        let events = run(
            &[(0, true), (40, false), (500, true), (540, false)],
            1_200,
            10,
        );
        assert_eq!(count(&events, GestureEvent::SingleClick), 2);
        assert_eq!(count(&events, GestureEvent::DoubleClick), 0);
    }

    #[test]
    fn expired_pair_on_release_resolves_old_click_first() {
        let mut detector = GestureDetector::default();
        assert_eq!(detector.poll(true, 0), None);
        assert_eq!(detector.poll(false, 10), None);
        assert_eq!(detector.poll(true, 200), None);
        // Sparse sampling: the window ran out while the second press was held.
        assert_eq!(detector.poll(false, 400), Some(GestureEvent::SingleClick));
        assert!(detector.awaiting_pair());
        assert_eq!(detector.poll(false, 700), Some(GestureEvent::SingleClick));
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let config = GestureConfig::default()
            .with_double_click_ms(100)
            .with_long_press_ms(1_000);
        let mut detector = GestureDetector::new(config);
        assert_eq!(detector.poll(true, 0), None);
        assert_eq!(detector.poll(true, 600), None);
        assert_eq!(detector.poll(false, 610), None);
        assert_eq!(detector.poll(false, 700), None);
        assert_eq!(detector.poll(false, 710), Some(GestureEvent::SingleClick));
    }
}
