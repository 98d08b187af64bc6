//! Weight entry screen
//!
//! The home screen: a three-digit weight field, a percent field behind
//! the `%` key, and the unit-pair toggle. Digits accumulate into the
//! focused field; once the weight field holds three, the next digit
//! submits the entered value instead of accumulating.

use core::fmt::Write;

use heapless::String;

use crate::config::PromptConfig;
use crate::keys::Key;
use crate::traits::{ConfigStore, StoreError, DISPLAY_COLS};
use crate::units::{UnitPair, UNIT_RING};

const ROW_LEN: usize = DISPLAY_COLS as usize;
/// Column where the weight digits start ("Weight: " prefix)
const WEIGHT_COL: u8 = 8;
const MAX_DIGITS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Weight,
    Percent,
}

/// What a processed key asks the state machine to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PromptOutcome {
    /// Remain on the prompt
    Stay,
    /// Compute and show the result for the entered weight
    Submit,
    /// Enter the configuration menu
    OpenMenu,
    /// Power down
    Sleep,
}

/// The weight entry screen's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    value: u16,
    digits: u8,
    percent: u16,
    percent_digits: u8,
    unit_state: u8,
    focus: Focus,
}

impl PromptState {
    /// Fresh prompt: empty weight, full percent, the persisted unit pair
    ///
    /// A stored ring index outside the ring is folded back in, so a bad
    /// settings record cannot push the toggle arithmetic out of range.
    pub fn new(unit_state: u8) -> Self {
        Self {
            value: 0,
            digits: 0,
            percent: 100,
            percent_digits: 3,
            unit_state: unit_state % UNIT_RING.len() as u8,
            focus: Focus::Weight,
        }
    }

    /// Entered weight in display units
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Entered percent of the weight
    pub fn percent(&self) -> u16 {
        self.percent
    }

    /// The selected unit pair
    pub fn pair(&self) -> UnitPair {
        UnitPair::from_ring_index(self.unit_state)
    }

    /// Apply one key press
    pub fn process<C: ConfigStore>(
        &mut self,
        key: Key,
        store: &mut C,
    ) -> Result<PromptOutcome, StoreError> {
        if let Some(digit) = key.digit() {
            return Ok(self.press_digit(digit));
        }
        match key {
            Key::Clear => {
                self.value = 0;
                self.digits = 0;
                Ok(PromptOutcome::Stay)
            }
            Key::Enter => match self.focus {
                Focus::Percent => {
                    self.toggle_focus();
                    Ok(PromptOutcome::Stay)
                }
                Focus::Weight => Ok(PromptOutcome::Submit),
            },
            Key::Percent => {
                self.toggle_focus();
                Ok(PromptOutcome::Stay)
            }
            Key::UnitToggle => {
                self.unit_state = (self.unit_state + 1) % UNIT_RING.len() as u8;
                store.write_prompt(PromptConfig {
                    unit_state: self.unit_state,
                })?;
                Ok(PromptOutcome::Stay)
            }
            Key::Config => Ok(PromptOutcome::OpenMenu),
            Key::Power | Key::Timeout => Ok(PromptOutcome::Sleep),
            _ => Ok(PromptOutcome::Stay),
        }
    }

    fn press_digit(&mut self, digit: u16) -> PromptOutcome {
        match self.focus {
            Focus::Weight => {
                if self.digits == MAX_DIGITS {
                    // Fourth digit submits instead of accumulating
                    return PromptOutcome::Submit;
                }
                self.value = self.value * 10 + digit;
                // Leading zeros leave the field empty
                self.digits = if self.value == 0 { 0 } else { self.digits + 1 };
                PromptOutcome::Stay
            }
            Focus::Percent => {
                if self.percent_digits == MAX_DIGITS {
                    self.toggle_focus();
                    return PromptOutcome::Stay;
                }
                self.percent = self.percent * 10 + digit;
                self.percent_digits = if self.percent == 0 {
                    0
                } else {
                    self.percent_digits + 1
                };
                PromptOutcome::Stay
            }
        }
    }

    /// Flip entry focus between the weight and percent fields
    ///
    /// Entering the percent field empties it; leaving it empty restores
    /// the full-weight default of 100.
    fn toggle_focus(&mut self) {
        match self.focus {
            Focus::Weight => {
                self.focus = Focus::Percent;
                self.percent = 0;
                self.percent_digits = 0;
            }
            Focus::Percent => {
                self.focus = Focus::Weight;
                if self.percent == 0 {
                    self.percent = 100;
                    self.percent_digits = MAX_DIGITS;
                }
            }
        }
    }

    /// The two display rows
    ///
    /// Row 0 holds the weight field and input unit; row 1 centers a `|`
    /// divider between the percent field and the output unit, the left
    /// pad taking the spare column when the padding is odd.
    pub fn render_rows(&self) -> [String<ROW_LEN>; 2] {
        let pair = self.pair();
        let mut rows = [String::new(), String::new()];

        let _ = write!(rows[0], "Weight: {:<4}({})", self.value, pair.input.label());

        let mut percent_cell: String<4> = String::new();
        let _ = write!(percent_cell, "{}%", self.percent);
        let unit_len = pair.output.label().len() + " plates".len();
        let total = ROW_LEN.saturating_sub(percent_cell.len() + 1 + unit_len);
        let right = total / 2;
        let left = total - right;

        let row = &mut rows[1];
        let _ = row.push_str(&percent_cell);
        for _ in 0..left {
            let _ = row.push(' ');
        }
        let _ = row.push('|');
        for _ in 0..right {
            let _ = row.push(' ');
        }
        let _ = write!(row, "{} plates", pair.output.label());
        rows
    }

    /// Blink cursor position, just past the focused field's last digit
    pub fn cursor(&self) -> (u8, u8) {
        match self.focus {
            Focus::Weight => (0, WEIGHT_COL + self.digits),
            Focus::Percent => (1, self.percent_digits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MemoryStore;

    fn press(prompt: &mut PromptState, store: &mut MemoryStore, keys: &[Key]) -> PromptOutcome {
        let mut outcome = PromptOutcome::Stay;
        for &key in keys {
            outcome = prompt.process(key, store).unwrap();
        }
        outcome
    }

    #[test]
    fn test_starts_blank_with_full_percent() {
        let prompt = PromptState::new(0);
        assert_eq!(prompt.value(), 0);
        assert_eq!(prompt.percent(), 100);
        assert_eq!(prompt.cursor(), (0, 8));

        let rows = prompt.render_rows();
        assert_eq!(rows[0].as_str(), "Weight: 0   (LB)");
        assert_eq!(rows[1].as_str(), "100% | LB plates");
    }

    #[test]
    fn test_digits_accumulate() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        let outcome = press(&mut prompt, &mut store, &[Key::Two, Key::Two, Key::Five]);
        assert_eq!(outcome, PromptOutcome::Stay);
        assert_eq!(prompt.value(), 225);
        assert_eq!(prompt.cursor(), (0, 11));
        assert_eq!(prompt.render_rows()[0].as_str(), "Weight: 225 (LB)");
    }

    #[test]
    fn test_fourth_digit_submits() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        press(&mut prompt, &mut store, &[Key::One, Key::Three, Key::Five]);
        let outcome = prompt.process(Key::Five, &mut store).unwrap();
        assert_eq!(outcome, PromptOutcome::Submit);
        assert_eq!(prompt.value(), 135);
    }

    #[test]
    fn test_leading_zeros_do_not_count() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        press(&mut prompt, &mut store, &[Key::Zero, Key::Zero, Key::Zero]);
        assert_eq!(prompt.value(), 0);
        assert_eq!(prompt.cursor(), (0, 8));

        let outcome = press(&mut prompt, &mut store, &[Key::Five]);
        assert_eq!(outcome, PromptOutcome::Stay);
        assert_eq!(prompt.value(), 5);
        assert_eq!(prompt.cursor(), (0, 9));
    }

    #[test]
    fn test_clear_zeroes_weight() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        press(&mut prompt, &mut store, &[Key::Nine, Key::Nine]);
        let outcome = press(&mut prompt, &mut store, &[Key::Clear]);
        assert_eq!(outcome, PromptOutcome::Stay);
        assert_eq!(prompt.value(), 0);
        assert_eq!(prompt.cursor(), (0, 8));
    }

    #[test]
    fn test_enter_submits_from_weight() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        let outcome = press(&mut prompt, &mut store, &[Key::One, Key::Enter]);
        assert_eq!(outcome, PromptOutcome::Submit);
    }

    #[test]
    fn test_percent_entry_flow() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        press(&mut prompt, &mut store, &[Key::Percent]);
        // Entering the percent field empties it
        assert_eq!(prompt.percent(), 0);
        assert_eq!(prompt.cursor(), (1, 0));

        press(&mut prompt, &mut store, &[Key::Five, Key::Zero]);
        assert_eq!(prompt.percent(), 50);
        assert_eq!(prompt.cursor(), (1, 2));
        assert_eq!(prompt.render_rows()[1].as_str(), "50%  | LB plates");

        // Leaving keeps the entered percent, cursor back on weight
        press(&mut prompt, &mut store, &[Key::Percent]);
        assert_eq!(prompt.percent(), 50);
        assert_eq!(prompt.cursor(), (0, 8));
    }

    #[test]
    fn test_leaving_percent_empty_restores_full() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        press(&mut prompt, &mut store, &[Key::Percent, Key::Zero, Key::Percent]);
        assert_eq!(prompt.percent(), 100);
        assert_eq!(prompt.cursor(), (0, 8));
    }

    #[test]
    fn test_enter_refocuses_from_percent() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        let outcome = press(&mut prompt, &mut store, &[Key::Percent, Key::Enter]);
        assert_eq!(outcome, PromptOutcome::Stay);
        assert_eq!(prompt.percent(), 100);
        assert_eq!(prompt.cursor(), (0, 8));
    }

    #[test]
    fn test_fourth_percent_digit_refocuses_weight() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        press(
            &mut prompt,
            &mut store,
            &[Key::Percent, Key::One, Key::Two, Key::Five],
        );
        assert_eq!(prompt.percent(), 125);

        // A fourth percent digit is dropped; focus returns to weight
        let outcome = press(&mut prompt, &mut store, &[Key::Nine]);
        assert_eq!(outcome, PromptOutcome::Stay);
        assert_eq!(prompt.percent(), 125);
        assert_eq!(prompt.cursor(), (0, 8));
    }

    #[test]
    fn test_unit_toggle_cycles_and_persists() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();

        press(&mut prompt, &mut store, &[Key::UnitToggle]);
        assert_eq!(store.prompt().unit_state, 1);
        let rows = prompt.render_rows();
        assert_eq!(rows[0].as_str(), "Weight: 0   (LB)");
        assert_eq!(rows[1].as_str(), "100% | KG plates");

        press(
            &mut prompt,
            &mut store,
            &[Key::UnitToggle, Key::UnitToggle, Key::UnitToggle],
        );
        assert_eq!(store.prompt().unit_state, 0);
    }

    #[test]
    fn test_out_of_range_unit_state_folds_in() {
        let mut store = MemoryStore::new();
        let mut prompt = PromptState::new(255);
        assert_eq!(prompt.pair(), UNIT_RING[3]);

        press(&mut prompt, &mut store, &[Key::UnitToggle]);
        assert_eq!(store.prompt().unit_state, 0);
    }

    #[test]
    fn test_config_opens_menu() {
        let mut prompt = PromptState::new(0);
        let mut store = MemoryStore::new();
        assert_eq!(
            prompt.process(Key::Config, &mut store).unwrap(),
            PromptOutcome::OpenMenu
        );
    }

    #[test]
    fn test_power_and_timeout_sleep() {
        let mut store = MemoryStore::new();
        for key in [Key::Power, Key::Timeout] {
            let mut prompt = PromptState::new(0);
            assert_eq!(
                prompt.process(key, &mut store).unwrap(),
                PromptOutcome::Sleep
            );
        }
    }
}
