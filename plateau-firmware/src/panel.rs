//! Panel wiring: LCD plus keypad as one interaction surface
//!
//! Implements the [`Surface`] trait over the HD44780 driver and the
//! matrix keypad scanner. The UI loop is synchronous; key waits block
//! the executor, which is fine here because this firmware runs
//! nothing else.

use defmt::info;
use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;
use embassy_time::{block_for, Delay, Duration, Instant};

use plateau_core::keys::Key;
use plateau_core::traits::{Surface, SurfaceError, DISPLAY_COLS, DISPLAY_ROWS};
use plateau_drivers::gpio;
use plateau_drivers::keypad::Keypad;
use plateau_drivers::lcd::Lcd;

/// Poll spacing while waiting for a key
const KEY_POLL_MS: u64 = 10;

/// Output pin adapter for the driver traits
pub struct OutPin<'d>(pub Output<'d>);

impl gpio::OutputPin for OutPin<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Input pin adapter for the driver traits
pub struct InPin<'d>(pub Input<'d>);

impl gpio::InputPin for InPin<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Construct a low output on a pin
pub fn out<'d>(pin: Peri<'d, impl Pin>) -> OutPin<'d> {
    OutPin(Output::new(pin, Level::Low))
}

/// Construct a pulled-down input on a pin
pub fn inp<'d>(pin: Peri<'d, impl Pin>) -> InPin<'d> {
    InPin(Input::new(pin, Pull::Down))
}

/// The physical 2x16 LCD and 4x4 keypad
pub struct Panel<'d> {
    lcd: Lcd<OutPin<'d>, Delay>,
    keypad: Keypad<OutPin<'d>, InPin<'d>, Delay>,
    powered: bool,
}

impl<'d> Panel<'d> {
    /// Assemble the panel
    ///
    /// Call after [`Lcd::init`], which leaves the display lit.
    pub fn new(lcd: Lcd<OutPin<'d>, Delay>, keypad: Keypad<OutPin<'d>, InPin<'d>, Delay>) -> Self {
        Self {
            lcd,
            keypad,
            powered: true,
        }
    }
}

impl Surface for Panel<'_> {
    fn write_text(&mut self, text: &str, row: u8, col: u8) -> Result<(), SurfaceError> {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return Err(SurfaceError::OutOfBounds);
        }
        if self.powered {
            self.lcd.set_cursor(row, col);
            self.lcd.write_str(text);
        }
        Ok(())
    }

    fn blink_cursor_at(&mut self, row: u8, col: u8) -> Result<(), SurfaceError> {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return Err(SurfaceError::OutOfBounds);
        }
        if self.powered {
            self.lcd.set_cursor(row, col);
            self.lcd.set_blink(true);
        }
        Ok(())
    }

    fn cursor_off(&mut self) -> Result<(), SurfaceError> {
        if self.powered {
            self.lcd.set_blink(false);
        }
        Ok(())
    }

    fn clear_display(&mut self) -> Result<(), SurfaceError> {
        if self.powered {
            self.lcd.clear();
        }
        Ok(())
    }

    fn read_key(&mut self, timeout_secs: u32) -> Key {
        let deadline = Instant::now() + Duration::from_secs(timeout_secs as u64);
        loop {
            if let Some(key) = self.keypad.poll() {
                return key;
            }
            if Instant::now() >= deadline {
                return Key::Timeout;
            }
            block_for(Duration::from_millis(KEY_POLL_MS));
        }
    }

    fn display_on(&mut self) -> Result<(), SurfaceError> {
        self.powered = true;
        self.lcd.set_display(true);
        self.lcd.set_backlight(true);
        Ok(())
    }

    fn display_off(&mut self) -> Result<(), SurfaceError> {
        self.lcd.set_display(false);
        self.lcd.set_backlight(false);
        self.powered = false;
        Ok(())
    }

    fn toggle_display(&mut self) -> Result<(), SurfaceError> {
        if self.powered {
            self.display_off()
        } else {
            self.display_on()
        }
    }

    fn request_sleep(&mut self) -> Result<(), SurfaceError> {
        // With every row driven high, any key press pulls its column
        // high. Wake is a full reset; settings are already on flash.
        self.keypad.drive_rows_high();
        loop {
            if self.keypad.any_column_high() {
                break;
            }
            block_for(Duration::from_millis(20));
        }
        info!("key press during sleep, resetting");
        cortex_m::peripheral::SCB::sys_reset();
    }

    fn now(&self) -> u64 {
        Instant::now().as_millis()
    }
}
