use core::{
    convert::Infallible,
    sync::atomic::{AtomicI32, Ordering},
};

use embedded_hal::digital::InputPin;
use knobkey_core::input::PositionSource;

// Quadrature transition table for previous_state/current_state (AB).
// Index: (prev << 2) | curr, values are +1/-1 for valid transitions.
const QUADRATURE_TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

#[derive(Debug, Clone, Copy)]
pub struct QuadratureConfig {
    transitions_per_step: u8,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            transitions_per_step: 4,
        }
    }
}

impl QuadratureConfig {
    pub const fn with_transitions_per_step(mut self, transitions_per_step: u8) -> Self {
        self.transitions_per_step = transitions_per_step;
        self
    }

    pub const fn transitions_per_step(&self) -> u8 {
        self.transitions_per_step
    }
}

/// Turns successive CLK/DT level pairs into detent steps.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    config: QuadratureConfig,
    prev_ab: u8,
    transition_accum: i8,
}

impl QuadratureDecoder {
    pub fn new(clk_high: bool, dt_high: bool, config: QuadratureConfig) -> Self {
        Self {
            config,
            prev_ab: ab_from_levels(clk_high, dt_high),
            transition_accum: 0,
        }
    }

    /// Returns `1` or `-1` once a full detent has been seen, `0` otherwise.
    pub fn update(&mut self, clk_high: bool, dt_high: bool) -> i32 {
        let curr_ab = ab_from_levels(clk_high, dt_high);
        if curr_ab == self.prev_ab {
            return 0;
        }

        let transition_idx = ((self.prev_ab << 2) | curr_ab) as usize;
        self.prev_ab = curr_ab;
        self.transition_accum = self
            .transition_accum
            .saturating_add(QUADRATURE_TRANSITIONS[transition_idx]);

        let threshold = self.config.transitions_per_step.max(1) as i8;
        if self.transition_accum >= threshold {
            self.transition_accum = 0;
            return 1;
        }
        if self.transition_accum <= -threshold {
            self.transition_accum = 0;
            return -1;
        }
        0
    }
}

#[derive(Debug)]
pub enum EncoderError<ClkErr, DtErr> {
    Clk(ClkErr),
    Dt(DtErr),
}

type EncoderResult<ClkErr, DtErr, T> = Result<T, EncoderError<ClkErr, DtErr>>;

/// Quadrature encoder on two GPIO inputs, counting into an absolute position.
#[derive(Debug)]
pub struct PinEncoder<CLK, DT> {
    clk: CLK,
    dt: DT,
    decoder: QuadratureDecoder,
    count: i32,
}

impl<CLK, DT> PinEncoder<CLK, DT>
where
    CLK: InputPin,
    DT: InputPin,
{
    pub fn new(
        mut clk: CLK,
        mut dt: DT,
        config: QuadratureConfig,
    ) -> EncoderResult<CLK::Error, DT::Error, Self> {
        let clk_high = clk.is_high().map_err(EncoderError::Clk)?;
        let dt_high = dt.is_high().map_err(EncoderError::Dt)?;

        Ok(Self {
            clk,
            dt,
            decoder: QuadratureDecoder::new(clk_high, dt_high, config),
            count: 0,
        })
    }

    /// Samples both pins once and returns the detent step taken, if any.
    pub fn poll(&mut self) -> EncoderResult<CLK::Error, DT::Error, i32> {
        let clk_high = self.clk.is_high().map_err(EncoderError::Clk)?;
        let dt_high = self.dt.is_high().map_err(EncoderError::Dt)?;

        let step = self.decoder.update(clk_high, dt_high);
        self.count = self.count.wrapping_add(step);
        Ok(step)
    }

    pub const fn count(&self) -> i32 {
        self.count
    }

    /// Both pins, for callers that wait on edges before polling.
    pub fn pins_mut(&mut self) -> (&mut CLK, &mut DT) {
        (&mut self.clk, &mut self.dt)
    }
}

impl<CLK, DT> PositionSource for PinEncoder<CLK, DT>
where
    CLK: InputPin,
    DT: InputPin,
{
    type Error = EncoderError<CLK::Error, DT::Error>;

    fn position(&mut self) -> Result<i32, Self::Error> {
        self.poll()?;
        Ok(self.count)
    }
}

/// Position counter written by the encoder task and read by the UI loop.
#[derive(Debug, Default)]
pub struct SharedPosition(AtomicI32);

impl SharedPosition {
    pub const fn new() -> Self {
        Self(AtomicI32::new(0))
    }

    pub fn add(&self, step: i32) {
        self.0.fetch_add(step, Ordering::Relaxed);
    }

    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Relaxed)
    }
}

impl PositionSource for &SharedPosition {
    type Error = Infallible;

    fn position(&mut self) -> Result<i32, Self::Error> {
        Ok(self.get())
    }
}

#[inline]
fn ab_from_levels(clk_high: bool, dt_high: bool) -> u8 {
    ((clk_high as u8) << 1) | (dt_high as u8)
}
