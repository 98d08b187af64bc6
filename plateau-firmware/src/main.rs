//! Plateau - barbell plate calculator firmware
//!
//! Firmware binary for the RP2040-based panel: a 2x16 character LCD
//! and a 4x4 membrane keypad in a box that lives next to the rack.
//! Type a target weight, read off which plates go on each side of
//! the bar.
//!
//! Named for the thing it helps you break through.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use plateau_core::menu::MenuTree;
use plateau_core::state;
use plateau_core::traits::{ConfigStore, SCROLL_DOWN_GLYPH, SCROLL_UP_GLYPH};
use plateau_drivers::keypad::Keypad;
use plateau_drivers::lcd::{self, Lcd};

use crate::panel::{inp, out, Panel};
use crate::store::FlashStore;

mod panel;
mod store;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Plateau firmware starting...");

    let p = embassy_rp::init(Default::default());

    let mut store = FlashStore::new(p.FLASH, p.DMA_CH0);

    // LCD wiring: RS=21, EN=20, D4-D7=19/18/17/16, backlight on 22
    let mut lcd = Lcd::new(
        out(p.PIN_21),
        out(p.PIN_20),
        [out(p.PIN_19), out(p.PIN_18), out(p.PIN_17), out(p.PIN_16)],
        out(p.PIN_22),
        Delay,
    );
    lcd.init();
    lcd.define_glyph(SCROLL_UP_GLYPH as u8, &lcd::ARROW_UP);
    lcd.define_glyph(SCROLL_DOWN_GLYPH as u8, &lcd::ARROW_DOWN);

    // Keypad wiring: rows on GPIO 3/2/1/0 top to bottom, columns on
    // GPIO 4/5/6/7 left to right
    let keypad = Keypad::new(
        [out(p.PIN_3), out(p.PIN_2), out(p.PIN_1), out(p.PIN_0)],
        [inp(p.PIN_4), inp(p.PIN_5), inp(p.PIN_6), inp(p.PIN_7)],
        Delay,
    );

    let mut panel = Panel::new(lcd, keypad);
    let mut tree = MenuTree::build(store.weights());

    info!("panel ready, entering UI loop");
    loop {
        match state::run(&mut panel, &mut store, &mut tree) {
            // The sleep path resets the chip, so a clean return only
            // happens if that ever changes.
            Ok(()) => Timer::after_millis(100).await,
            Err(e) => {
                error!("ui loop error: {}", Debug2Format(&e));
                Timer::after_millis(500).await;
            }
        }
    }
}
