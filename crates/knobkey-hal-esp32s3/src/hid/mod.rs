//! USB HID keyboard output.
//!
//! The UI loop pushes [`KeyStroke`]s into a [`KeystrokeChannel`] without
//! blocking; [`forward_keystrokes`] drains it into an embassy-usb HID writer
//! as one press report followed by one all-released report per stroke.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_usb::{
    class::hid::{Config, HidBootProtocol, HidSubclass, HidWriter, RequestHandler},
    driver::Driver,
};
use knobkey_core::keyboard::{KeyStroke, KeystrokeSink};
use log::warn;
use usbd_hid::descriptor::{KeyboardReport, SerializedDescriptor};

pub const KEYSTROKE_QUEUE_DEPTH: usize = 32;
pub const REPORT_BYTES: usize = 8;
pub const HID_POLL_MS: u8 = 10;

const LEFT_SHIFT: u8 = 0x02;

pub type KeystrokeChannel = Channel<CriticalSectionRawMutex, KeyStroke, KEYSTROKE_QUEUE_DEPTH>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct QueueFull;

/// Non-blocking producer side of the keystroke channel.
#[derive(Clone, Copy)]
pub struct KeystrokeQueue<'a> {
    channel: &'a KeystrokeChannel,
}

impl<'a> KeystrokeQueue<'a> {
    pub const fn new(channel: &'a KeystrokeChannel) -> Self {
        Self { channel }
    }
}

impl KeystrokeSink for KeystrokeQueue<'_> {
    type Error = QueueFull;

    fn send(&mut self, stroke: KeyStroke) -> Result<(), Self::Error> {
        self.channel.try_send(stroke).map_err(|_| QueueFull)
    }
}

pub fn press_report(stroke: KeyStroke) -> KeyboardReport {
    KeyboardReport {
        modifier: if stroke.shift { LEFT_SHIFT } else { 0 },
        reserved: 0,
        leds: 0,
        keycodes: [stroke.key.usage(), 0, 0, 0, 0, 0],
    }
}

pub fn release_report() -> KeyboardReport {
    KeyboardReport {
        modifier: 0,
        reserved: 0,
        leds: 0,
        keycodes: [0; 6],
    }
}

/// Boot-compatible keyboard interface settings.
pub fn keyboard_config<'d>(request_handler: Option<&'d mut dyn RequestHandler>) -> Config<'d> {
    Config {
        report_descriptor: KeyboardReport::desc(),
        request_handler,
        poll_ms: HID_POLL_MS,
        max_packet_size: REPORT_BYTES as u16,
        hid_subclass: HidSubclass::Boot,
        hid_boot_protocol: HidBootProtocol::Keyboard,
    }
}

/// Sends every queued keystroke to the host, forever.
pub async fn forward_keystrokes<'d, D>(
    channel: &KeystrokeChannel,
    writer: &mut HidWriter<'d, D, REPORT_BYTES>,
) -> !
where
    D: Driver<'d>,
{
    loop {
        let stroke = channel.receive().await;
        for report in [press_report(stroke), release_report()] {
            if let Err(err) = writer.write_serialize(&report).await {
                warn!("hid: report dropped: {:?}", err);
            }
        }
    }
}
