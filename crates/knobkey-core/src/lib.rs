//! Input-method core for a single-knob text entry device.
//!
//! Everything here is hardware agnostic: board crates provide the encoder
//! position, button level, keystroke sink and display sink.

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod diagnostics;
pub mod gesture;
pub mod input;
pub mod keyboard;
pub mod keymap;
pub mod mode;
pub mod render;
