//! Interaction surface contract
//!
//! The one trait separating the UI core from hardware: a bounded 2x16
//! text grid, a blink cursor, a blocking-with-timeout key read, display
//! power control and a sleep request. Implemented by the firmware front
//! panel (LCD + keypad) and by the desktop simulator.

use crate::keys::Key;

/// Character rows on the panel
pub const DISPLAY_ROWS: u8 = 2;
/// Character columns on the panel
pub const DISPLAY_COLS: u8 = 16;

/// Seconds without a keypress before a read reports [`Key::Timeout`]
pub const KEY_TIMEOUT_SECS: u32 = 60;

/// Character code of the scroll-up marker (CGRAM slot 1)
pub const SCROLL_UP_GLYPH: char = '\u{1}';
/// Character code of the scroll-down marker (CGRAM slot 2)
pub const SCROLL_DOWN_GLYPH: char = '\u{2}';

/// Errors from surface operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Text or cursor position falls outside the display grid
    OutOfBounds,
    /// The underlying display or terminal rejected the operation
    Io,
}

/// The front panel as the UI core sees it
///
/// Grid coordinates are `(row, col)` with the origin at the top left.
/// Text never wraps; a write whose start position is off the grid fails
/// with [`SurfaceError::OutOfBounds`], and writes are dropped while the
/// display is powered off (position checks still apply).
pub trait Surface {
    /// Write text starting at `(row, col)`
    fn write_text(&mut self, text: &str, row: u8, col: u8) -> Result<(), SurfaceError>;

    /// Park the blinking cursor at `(row, col)`
    fn blink_cursor_at(&mut self, row: u8, col: u8) -> Result<(), SurfaceError>;

    /// Hide the blinking cursor
    fn cursor_off(&mut self) -> Result<(), SurfaceError>;

    /// Blank the grid; also hides the cursor
    fn clear_display(&mut self) -> Result<(), SurfaceError>;

    /// Block until a key press or until `timeout_secs` elapse
    fn read_key(&mut self, timeout_secs: u32) -> Key;

    /// Power the display (and backlight) on
    fn display_on(&mut self) -> Result<(), SurfaceError>;

    /// Power the display (and backlight) off
    fn display_off(&mut self) -> Result<(), SurfaceError>;

    /// Flip display power
    fn toggle_display(&mut self) -> Result<(), SurfaceError>;

    /// Enter the lowest power state
    ///
    /// Only a hardware wake signal exits this; on hardware the device
    /// resets and restarts the process, so callers must not expect to
    /// resume after it returns.
    fn request_sleep(&mut self) -> Result<(), SurfaceError>;

    /// Monotonic milliseconds since an arbitrary epoch
    fn now(&self) -> u64;
}
