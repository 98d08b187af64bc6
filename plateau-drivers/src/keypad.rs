//! 4x4 matrix keypad scanner
//!
//! The keypad is wired as four row drive lines and four column sense
//! lines with pull-downs. Scanning drives one row high at a time and
//! reads the columns; a high column means the switch at that row and
//! column is closed.
//!
//! # Debounce
//!
//! Membrane switches chatter for a few milliseconds. A key is only
//! reported once the same position reads pressed across
//! [`DEBOUNCE_SAMPLES`] consecutive scans spaced
//! [`DEBOUNCE_INTERVAL_US`] apart, and the scanner then waits for the
//! release so one press yields exactly one key.

use embedded_hal::delay::DelayNs;

use plateau_core::keys::{Key, KEYPAD_LAYOUT};

use crate::gpio::{InputPin, OutputPin};

/// Consecutive matching scans required before a press is reported
pub const DEBOUNCE_SAMPLES: u8 = 10;

/// Spacing between debounce scans
pub const DEBOUNCE_INTERVAL_US: u32 = 2_000;

/// Settle time after driving a row, before the columns are read
const SETTLE_US: u32 = 10;

/// Matrix keypad scanner
///
/// `rows` are the drive outputs top to bottom, `cols` the sense
/// inputs left to right, matching [`KEYPAD_LAYOUT`].
pub struct Keypad<O, I, D> {
    rows: [O; 4],
    cols: [I; 4],
    delay: D,
}

impl<O: OutputPin, I: InputPin, D: DelayNs> Keypad<O, I, D> {
    /// Create a scanner from its pins
    pub fn new(rows: [O; 4], cols: [I; 4], delay: D) -> Self {
        let mut keypad = Self { rows, cols, delay };
        for row in &mut keypad.rows {
            row.set_low();
        }
        keypad
    }

    /// Check for a debounced key press
    ///
    /// Returns quickly with `None` while the keypad is idle. When a
    /// switch is down, blocks through the debounce samples and the
    /// release wait, then reports the key once.
    pub fn poll(&mut self) -> Option<Key> {
        let (row, col) = self.scan()?;

        for _ in 0..DEBOUNCE_SAMPLES {
            self.delay.delay_us(DEBOUNCE_INTERVAL_US);
            if self.scan() != Some((row, col)) {
                return None;
            }
        }

        while self.scan().is_some() {
            self.delay.delay_us(DEBOUNCE_INTERVAL_US);
        }

        Some(KEYPAD_LAYOUT[row as usize][col as usize])
    }

    /// Drive every row high
    ///
    /// With all rows high any key press pulls a column high, which is
    /// what the sleep wake-up circuit watches for.
    pub fn drive_rows_high(&mut self) {
        for row in &mut self.rows {
            row.set_high();
        }
    }

    /// Check whether any column currently reads high
    pub fn any_column_high(&self) -> bool {
        self.cols.iter().any(|c| c.is_high())
    }

    /// One pass over the matrix
    ///
    /// Returns the first closed switch found, top-left first.
    fn scan(&mut self) -> Option<(u8, u8)> {
        let mut hit = None;
        for row in 0..4 {
            self.rows[row].set_high();
            self.delay.delay_us(SETTLE_US);
            for col in 0..4 {
                if self.cols[col].is_high() && hit.is_none() {
                    hit = Some((row as u8, col as u8));
                }
            }
            self.rows[row].set_low();
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::RefCell;

    /// Simulated switch matrix shared by the mock pins
    #[derive(Default)]
    struct Matrix {
        driven: [bool; 4],
        pressed: Option<(usize, usize)>,
        /// Column reads after which the switch opens again
        release_after: Option<u32>,
        reads: u32,
    }

    struct RowPin<'a> {
        row: usize,
        matrix: &'a RefCell<Matrix>,
    }

    impl OutputPin for RowPin<'_> {
        fn set_high(&mut self) {
            self.matrix.borrow_mut().driven[self.row] = true;
        }

        fn set_low(&mut self) {
            self.matrix.borrow_mut().driven[self.row] = false;
        }

        fn is_set_high(&self) -> bool {
            self.matrix.borrow().driven[self.row]
        }
    }

    struct ColPin<'a> {
        col: usize,
        matrix: &'a RefCell<Matrix>,
    }

    impl InputPin for ColPin<'_> {
        fn is_high(&self) -> bool {
            let mut m = self.matrix.borrow_mut();
            m.reads += 1;
            if let Some(limit) = m.release_after {
                if m.reads > limit {
                    m.pressed = None;
                }
            }
            match m.pressed {
                Some((row, col)) => col == self.col && m.driven[row],
                None => false,
            }
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn fixture(matrix: &RefCell<Matrix>) -> Keypad<RowPin<'_>, ColPin<'_>, NoopDelay> {
        Keypad::new(
            [
                RowPin { row: 0, matrix },
                RowPin { row: 1, matrix },
                RowPin { row: 2, matrix },
                RowPin { row: 3, matrix },
            ],
            [
                ColPin { col: 0, matrix },
                ColPin { col: 1, matrix },
                ColPin { col: 2, matrix },
                ColPin { col: 3, matrix },
            ],
            NoopDelay,
        )
    }

    fn press(position: (usize, usize), release_after: u32) -> RefCell<Matrix> {
        RefCell::new(Matrix {
            pressed: Some(position),
            release_after: Some(release_after),
            ..Matrix::default()
        })
    }

    #[test]
    fn test_idle_returns_none() {
        let matrix = RefCell::new(Matrix::default());
        let mut keypad = fixture(&matrix);
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_scan_finds_position() {
        let matrix = press((2, 1), 10_000);
        let mut keypad = fixture(&matrix);
        assert_eq!(keypad.scan(), Some((2, 1)));
    }

    #[test]
    fn test_key_maps_through_layout() {
        let matrix = press((3, 2), 10_000);
        let mut keypad = fixture(&matrix);
        assert_eq!(keypad.poll(), Some(Key::Enter));

        let matrix = press((0, 3), 10_000);
        let mut keypad = fixture(&matrix);
        assert_eq!(keypad.poll(), Some(Key::Power));

        let matrix = press((1, 1), 10_000);
        let mut keypad = fixture(&matrix);
        assert_eq!(keypad.poll(), Some(Key::Five));
    }

    #[test]
    fn test_glitch_rejected() {
        // Switch opens again after ~1 full scan, well inside the
        // debounce window.
        let matrix = press((3, 2), 20);
        let mut keypad = fixture(&matrix);
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_press_reported_once() {
        let matrix = press((0, 0), 2_000);
        let mut keypad = fixture(&matrix);
        assert_eq!(keypad.poll(), Some(Key::One));
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_wake_circuit_helpers() {
        let matrix = press((1, 2), 10_000);
        let mut keypad = fixture(&matrix);

        assert!(!keypad.any_column_high());
        keypad.drive_rows_high();
        assert!(keypad.any_column_high());
    }
}
