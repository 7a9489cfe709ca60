//! ESP32-S3 board adapters for the knob keyboard.
//!
//! Everything here is written against `embedded-hal`, `embedded-graphics`
//! and `embassy-usb` traits, so the firmware binary only has to hand over
//! concrete pins, the I2C panel and the USB driver.

#![cfg_attr(not(test), no_std)]

pub mod hid;
pub mod input;
pub mod render;
