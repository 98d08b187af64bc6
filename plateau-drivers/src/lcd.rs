//! HD44780 character LCD driver (4-bit bus)
//!
//! Drives a 2x16 character module through the classic 6-wire hookup:
//! register select, enable, the upper four data lines D4-D7, plus a
//! backlight switch.
//!
//! # Bus protocol
//!
//! In 4-bit mode every byte crosses the bus as two nibbles, high
//! nibble first. A nibble is latched on the falling edge of the
//! enable line. The RS line selects between the instruction register
//! (low) and character data (high).
//!
//! Initialization follows the "by instruction" sequence from the
//! HD44780U datasheet: three 0x3 nibbles with generous delays force
//! the controller into a known 8-bit state regardless of the mode it
//! woke up in, then a single 0x2 nibble switches it to the 4-bit bus.
//!
//! # Custom glyphs
//!
//! Character codes 0x01-0x07 are backed by CGRAM. [`Lcd::define_glyph`]
//! uploads a 5x8 bitmap for one of them; the panel uses codes 1 and 2
//! for the scroll arrows.

use embedded_hal::delay::DelayNs;

use crate::gpio::OutputPin;

/// HD44780 instruction set
pub mod cmd {
    /// Clear display and return home
    pub const CLEAR: u8 = 0x01;
    /// Return cursor to address 0
    pub const HOME: u8 = 0x02;
    /// Entry mode set base
    pub const ENTRY_MODE: u8 = 0x04;
    /// Entry mode flag: increment address after each write
    pub const ENTRY_INCREMENT: u8 = 0x02;
    /// Display control base
    pub const DISPLAY_CTRL: u8 = 0x08;
    /// Display control flag: display on
    pub const DISPLAY_ON: u8 = 0x04;
    /// Display control flag: blinking block cursor on
    pub const BLINK_ON: u8 = 0x01;
    /// Function set base
    pub const FUNCTION_SET: u8 = 0x20;
    /// Function set flag: two display lines
    pub const TWO_LINES: u8 = 0x08;
    /// Set CGRAM address (glyph bitmap upload)
    pub const SET_CGRAM: u8 = 0x40;
    /// Set DDRAM address (cursor position)
    pub const SET_DDRAM: u8 = 0x80;
}

/// DDRAM address of the first character of each row
const ROW_ADDR: [u8; 2] = [0x00, 0x40];

/// Execution time of an ordinary instruction
const COMMAND_DELAY_US: u32 = 50;

/// Execution time of clear/home
const CLEAR_DELAY_US: u32 = 2_000;

/// 5x8 bitmap for the "more above" scroll arrow
pub const ARROW_UP: [u8; 8] = [0x04, 0x0E, 0x15, 0x04, 0x04, 0x04, 0x04, 0x00];

/// 5x8 bitmap for the "more below" scroll arrow
pub const ARROW_DOWN: [u8; 8] = [0x04, 0x04, 0x04, 0x04, 0x15, 0x0E, 0x04, 0x00];

/// HD44780 LCD on a 4-bit bus
///
/// Generic over the pin type so the firmware can pass chip HAL pins
/// and tests can pass mocks. `data` holds D4 through D7 in order.
pub struct Lcd<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    backlight: P,
    delay: D,
    /// Display control flags currently latched
    control: u8,
}

impl<P: OutputPin, D: DelayNs> Lcd<P, D> {
    /// Create a driver from its pins
    ///
    /// Call [`Lcd::init`] before anything else.
    pub fn new(rs: P, en: P, data: [P; 4], backlight: P, delay: D) -> Self {
        Self {
            rs,
            en,
            data,
            backlight,
            delay,
            control: 0,
        }
    }

    /// Run the by-instruction initialization sequence
    ///
    /// Leaves the display on, cleared, cursor hidden and the
    /// backlight lit.
    pub fn init(&mut self) {
        self.rs.set_low();
        self.en.set_low();
        // Allow for a cold power-up; the controller ignores the bus
        // for tens of milliseconds after VCC rises.
        self.delay.delay_ms(50);

        self.write_nibble(0x03);
        self.delay.delay_ms(5);
        self.write_nibble(0x03);
        self.delay.delay_us(150);
        self.write_nibble(0x03);
        self.delay.delay_us(150);
        // Switch to the 4-bit bus
        self.write_nibble(0x02);
        self.delay.delay_us(150);

        self.command(cmd::FUNCTION_SET | cmd::TWO_LINES);
        self.control = 0;
        self.command(cmd::DISPLAY_CTRL);
        self.clear();
        self.command(cmd::ENTRY_MODE | cmd::ENTRY_INCREMENT);
        self.set_display(true);
        self.backlight.set_high();
    }

    /// Move the cursor
    ///
    /// Rows past the second are clamped to the second.
    pub fn set_cursor(&mut self, row: u8, col: u8) {
        let base = ROW_ADDR[(row as usize).min(1)];
        self.command(cmd::SET_DDRAM | (base + col));
    }

    /// Write text at the current cursor position
    ///
    /// DDRAM rows are 40 characters wide, so text past the visible
    /// column 15 lands off-panel instead of wrapping.
    pub fn write_str(&mut self, text: &str) {
        for c in text.chars() {
            self.write_char(c);
        }
    }

    /// Write a single character at the cursor position
    ///
    /// ASCII maps straight to the character ROM, which includes the
    /// CGRAM codes 1 and 2 used for the scroll arrows. Anything else
    /// renders as '?'.
    pub fn write_char(&mut self, c: char) {
        let byte = if c.is_ascii() { c as u8 } else { b'?' };
        self.send(byte, true);
    }

    /// Clear the whole display and home the cursor
    pub fn clear(&mut self) {
        self.command(cmd::CLEAR);
        self.delay.delay_us(CLEAR_DELAY_US);
    }

    /// Switch the display output on or off
    ///
    /// DDRAM contents survive; this only blanks the panel.
    pub fn set_display(&mut self, on: bool) {
        if on {
            self.control |= cmd::DISPLAY_ON;
        } else {
            self.control &= !cmd::DISPLAY_ON;
        }
        self.command(cmd::DISPLAY_CTRL | self.control);
    }

    /// Switch the blinking block cursor on or off
    pub fn set_blink(&mut self, on: bool) {
        if on {
            self.control |= cmd::BLINK_ON;
        } else {
            self.control &= !cmd::BLINK_ON;
        }
        self.command(cmd::DISPLAY_CTRL | self.control);
    }

    /// Switch the backlight on or off
    pub fn set_backlight(&mut self, on: bool) {
        self.backlight.set_state(on);
    }

    /// Upload a 5x8 bitmap for one of the CGRAM character codes (0-7)
    ///
    /// Homes the cursor afterwards, since the upload leaves the
    /// controller addressing CGRAM.
    pub fn define_glyph(&mut self, code: u8, bitmap: &[u8; 8]) {
        self.command(cmd::SET_CGRAM | ((code & 0x07) << 3));
        for &row in bitmap {
            self.send(row, true);
        }
        self.command(cmd::SET_DDRAM);
    }

    /// Send an instruction byte
    fn command(&mut self, byte: u8) {
        self.send(byte, false);
    }

    /// Send one byte as two nibbles, high first
    fn send(&mut self, byte: u8, is_data: bool) {
        self.rs.set_state(is_data);
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
        self.delay.delay_us(COMMAND_DELAY_US);
    }

    /// Put a nibble on D4-D7 and strobe enable
    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(nibble & (1 << bit) != 0);
        }
        self.en.set_high();
        self.delay.delay_us(1);
        self.en.set_low();
        self.delay.delay_us(1);
    }
}
