use super::{ButtonSource, PositionSource};

/// No-hardware input source used during bring-up: the knob never moves and
/// the button is never pressed.
#[derive(Default, Debug, Clone, Copy)]
pub struct IdleInput;

impl IdleInput {
    pub const fn new() -> Self {
        Self
    }
}

impl PositionSource for IdleInput {
    type Error = core::convert::Infallible;

    fn position(&mut self) -> Result<i32, Self::Error> {
        Ok(0)
    }
}

impl ButtonSource for IdleInput {
    type Error = core::convert::Infallible;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}
