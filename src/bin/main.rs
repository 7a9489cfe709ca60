#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_time::Timer;
use embassy_usb::{
    Builder,
    class::hid::{HidWriter, State as HidState},
};
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    otg_fs::{
        Usb,
        asynch::{Config as UsbDriverConfig, Driver},
    },
    time::{Instant, Rate},
    timer::timg::TimerGroup,
};
use knobkey_core::{
    app::{KnobApp, KnobConfig, TickResult},
    diagnostics::LogDiagnostics,
    gesture::GestureConfig,
    keymap::KeyboardLayout,
    mode::BASIC,
};
use knobkey_hal_esp32s3::{
    hid::{KeystrokeChannel, KeystrokeQueue, REPORT_BYTES, forward_keystrokes, keyboard_config},
    input::{
        button::{ButtonConfig, ButtonInput},
        rotary::{PinEncoder, QuadratureConfig, SharedPosition},
    },
    render::RegionCanvas,
};
use log::{LevelFilter, info, warn};
use ssd1306::{I2CDisplayInterface, Ssd1306, prelude::*};
use static_cell::StaticCell;

const POLL_INTERVAL_MS: u64 = 10;
const BUTTON_DEBOUNCE_POLLS: u8 = 2;
const ENCODER_DIRECTION_INVERTED: bool = false;
const OLED_I2C_KHZ: u32 = 400;

const USB_VID: u16 = 0x16c0;
const USB_PID: u16 = 0x27db;
const USB_EP_OUT_BYTES: usize = 1024;
const USB_DESCRIPTOR_BYTES: usize = 256;
const USB_CONTROL_BYTES: usize = 64;

static KEYSTROKES: KeystrokeChannel = KeystrokeChannel::new();
static ENCODER_POSITION: SharedPosition = SharedPosition::new();

static USB_EP_OUT: StaticCell<[u8; USB_EP_OUT_BYTES]> = StaticCell::new();
static USB_CONFIG_DESCRIPTOR: StaticCell<[u8; USB_DESCRIPTOR_BYTES]> = StaticCell::new();
static USB_BOS_DESCRIPTOR: StaticCell<[u8; USB_DESCRIPTOR_BYTES]> = StaticCell::new();
static USB_MSOS_DESCRIPTOR: StaticCell<[u8; USB_DESCRIPTOR_BYTES]> = StaticCell::new();
static USB_CONTROL: StaticCell<[u8; USB_CONTROL_BYTES]> = StaticCell::new();
static HID_STATE: StaticCell<HidState<'static>> = StaticCell::new();

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: knobkey starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Wiring: encoder CLK=GPIO10, DT=GPIO11, SW=GPIO12; OLED SDA=GPIO8, SCL=GPIO9;
    // USB D-=GPIO19, D+=GPIO20.
    let input_cfg = InputConfig::default().with_pull(Pull::Up);
    let encoder_clk = Input::new(peripherals.GPIO10, input_cfg);
    let encoder_dt = Input::new(peripherals.GPIO11, input_cfg);
    let encoder_sw = Input::new(peripherals.GPIO12, input_cfg);

    let mut encoder =
        PinEncoder::new(encoder_clk, encoder_dt, QuadratureConfig::default()).unwrap();
    let button = ButtonInput::new(
        encoder_sw,
        ButtonConfig::default().with_debounce_polls(BUTTON_DEBOUNCE_POLLS),
    )
    .unwrap();

    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(OLED_I2C_KHZ)),
    )
    .unwrap()
    .with_sda(peripherals.GPIO8)
    .with_scl(peripherals.GPIO9);
    let mut oled = Ssd1306::new(
        I2CDisplayInterface::new(i2c),
        DisplaySize128x64,
        DisplayRotation::Rotate0,
    )
    .into_buffered_graphics_mode();
    // The OLED is optional: without it the knob still types.
    let oled_ready = match oled.init() {
        Ok(()) => {
            esp_println::println!("display: init ok");
            true
        }
        Err(err) => {
            warn!("display: init failed, running headless: {:?}", err);
            false
        }
    };

    let usb = Usb::new(peripherals.USB0, peripherals.GPIO20, peripherals.GPIO19);
    let driver = Driver::new(
        usb,
        USB_EP_OUT.init([0; USB_EP_OUT_BYTES]),
        UsbDriverConfig::default(),
    );
    let mut usb_config = embassy_usb::Config::new(USB_VID, USB_PID);
    usb_config.manufacturer = Some("knobkey");
    usb_config.product = Some("knobkey single-knob keyboard");
    usb_config.serial_number = Some("0001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESCRIPTOR.init([0; USB_DESCRIPTOR_BYTES]),
        USB_BOS_DESCRIPTOR.init([0; USB_DESCRIPTOR_BYTES]),
        USB_MSOS_DESCRIPTOR.init([0; USB_DESCRIPTOR_BYTES]),
        USB_CONTROL.init([0; USB_CONTROL_BYTES]),
    );
    let mut hid_writer = HidWriter::<_, REPORT_BYTES>::new(
        &mut builder,
        HID_STATE.init(HidState::new()),
        keyboard_config(None),
    );
    let mut usb_device = builder.build();

    let layout = KeyboardLayout::from_name(option_env!("KNOBKEY_LAYOUT").unwrap_or("US"));
    let knob_config = KnobConfig::default()
        .with_gesture(GestureConfig::default())
        .with_layout(layout)
        .with_invert_rotation(ENCODER_DIRECTION_INVERTED);
    let mut app = KnobApp::new(
        &ENCODER_POSITION,
        button,
        KeystrokeQueue::new(&KEYSTROKES),
        RegionCanvas::new(),
        LogDiagnostics,
        knob_config,
    )
    .unwrap();
    app.start(BASIC);
    info!("knob: ready layout={}", layout.name());

    let usb_future = usb_device.run();
    let hid_future = forward_keystrokes(&KEYSTROKES, &mut hid_writer);

    let encoder_future = async {
        loop {
            let (clk, dt) = encoder.pins_mut();
            select(clk.wait_for_any_edge(), dt.wait_for_any_edge()).await;
            match encoder.poll() {
                Ok(0) => {}
                Ok(step) => ENCODER_POSITION.add(step),
                Err(err) => warn!("encoder: read failed: {:?}", err),
            }
        }
    };

    let ui_future = async {
        let loop_start = Instant::now();
        loop {
            let now_ms = loop_start.elapsed().as_millis();
            let tick = app.tick(now_ms);

            let canvas = app.controller_mut().display_mut();
            if oled_ready && (tick == TickResult::RenderRequested || canvas.is_dirty()) {
                if let Err(err) = canvas.draw(&mut oled) {
                    warn!("display: draw failed: {:?}", err);
                } else if let Err(err) = oled.flush() {
                    warn!("display: flush failed: {:?}", err);
                }
            }

            Timer::after_millis(POLL_INTERVAL_MS).await;
        }
    };

    let _ = embassy_futures::join::join4(usb_future, hid_future, encoder_future, ui_future).await;
    unreachable!()
}
