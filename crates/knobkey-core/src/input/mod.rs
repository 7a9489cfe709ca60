//! Input abstraction layer.

pub mod mock;

/// Absolute rotary position, polled once per tick.
///
/// The sign convention is a wiring constant; callers that need the opposite
/// sense negate the delta (see `KnobConfig::with_invert_rotation`).
pub trait PositionSource {
    type Error;

    fn position(&mut self) -> Result<i32, Self::Error>;
}

/// Logical push-button state, already corrected for active-low wiring.
pub trait ButtonSource {
    type Error;

    fn is_pressed(&mut self) -> Result<bool, Self::Error>;
}
