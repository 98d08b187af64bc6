//! Computed breakdown screen
//!
//! Turns an engine result into display rows once, at construction, then
//! scrolls a two-row viewport over them. The first row leads with the
//! achievable end weight (and its equivalent in the entry unit when the
//! pair converts); plate tokens pack greedily left to right, leaving the
//! last column free for the scroll glyphs.

use core::fmt::Write;
use core::mem;

use heapless::{String, Vec};

use crate::calc::{compute, CalcError, Calculation};
use crate::config::{UnitWeightConfig, WeightsConfig};
use crate::keys::Key;
use crate::traits::DISPLAY_COLS;
use crate::units::{format_hundredths, kg_to_lb, lb_to_kg, round_half_even, Unit, UnitPair};

/// Upper bound on rows a breakdown can occupy
pub const MAX_RESULT_ROWS: usize = 16;

/// Row storage; the fixed error notice runs one character past the panel
const ROW_CAP: usize = 24;
/// Tokens never pack into the last display column
const PACK_WIDTH: usize = (DISPLAY_COLS - 1) as usize;
const TOKEN_CAP: usize = 16;

/// What a processed key asks the state machine to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultOutcome {
    /// Remain on the result
    Stay,
    /// Back to the weight prompt
    ExitToPrompt,
    /// Power down
    Sleep,
}

/// The breakdown screen: prebuilt rows plus a scroll offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultState {
    rows: Vec<String<ROW_CAP>, MAX_RESULT_ROWS>,
    top: usize,
}

impl ResultState {
    /// Compute and lay out the breakdown for an entered weight
    ///
    /// The effective target is `weight * percent / 100` display units
    /// (halves to even), scaled to hundredths for the engine. An engine
    /// configuration error becomes a fixed two-row notice; there is no
    /// other error channel on the device.
    pub fn new(weight: u16, percent: u16, pair: UnitPair, weights: &WeightsConfig) -> Self {
        let effective = round_half_even(weight as u64 * percent as u64, 100) as u32;
        let config = weights.unit(pair.output);

        let rows = match compute(effective * 100, pair, config) {
            Ok(calc) => build_rows(&calc, pair, config),
            Err(CalcError::NoPlatesEnabled) => {
                let mut rows = Vec::new();
                let _ = rows.push(row_from("config error:"));
                let _ = rows.push(row_from("no plates enabled"));
                rows
            }
        };
        Self { rows, top: 0 }
    }

    /// Apply one key press
    pub fn process(&mut self, key: Key) -> ResultOutcome {
        match key {
            Key::Eight => {
                self.top = self.top.saturating_sub(1);
                ResultOutcome::Stay
            }
            Key::Nine => {
                if self.top < self.rows.len().saturating_sub(2) {
                    self.top += 1;
                }
                ResultOutcome::Stay
            }
            Key::Power | Key::Timeout => ResultOutcome::Sleep,
            _ => ResultOutcome::ExitToPrompt,
        }
    }

    /// The two rows currently in the viewport
    pub fn visible(&self) -> (&str, &str) {
        let row = |i: usize| self.rows.get(i).map(|r| r.as_str()).unwrap_or("");
        (row(self.top), row(self.top + 1))
    }

    /// Whether rows exist above / below the viewport
    pub fn glyphs(&self) -> (bool, bool) {
        (self.top > 0, self.top + 2 < self.rows.len())
    }
}

fn build_rows(
    calc: &Calculation,
    pair: UnitPair,
    config: &UnitWeightConfig,
) -> Vec<String<ROW_CAP>, MAX_RESULT_ROWS> {
    let mut header: String<ROW_CAP> = String::new();
    let _ = write!(
        header,
        "{}{}",
        format_hundredths(calc.end_weight),
        pair.output.label()
    );
    if pair.converts() {
        let converted = match pair.output {
            Unit::Kg => kg_to_lb(calc.end_weight),
            Unit::Lb => lb_to_kg(calc.end_weight),
        };
        let _ = write!(
            header,
            "/{}{}",
            round_half_even(converted as u64, 100),
            pair.input.label()
        );
    }
    let _ = header.push(':');

    let mut packer = RowPacker::start(header);

    let mut bar_token: String<TOKEN_CAP> = String::new();
    let _ = write!(bar_token, "{} bar", format_hundredths(config.bar));
    packer.push_token(&bar_token);

    let loaded = calc.end_weight > config.bar;
    if loaded {
        packer.push_token("+");
    }
    for plate in calc.plate_count_strings() {
        packer.push_token(&plate);
    }
    if config.collar > 0 && loaded {
        let mut collar_token: String<TOKEN_CAP> = String::new();
        let _ = write!(collar_token, "{} collars", format_hundredths(config.collar));
        packer.push_token(&collar_token);
    }
    if calc.plates.is_empty() {
        packer.push_row("(no plates)");
    }
    packer.finish()
}

fn row_from(text: &str) -> String<ROW_CAP> {
    let mut row = String::new();
    let _ = row.push_str(text);
    row
}

/// Greedy left-to-right packing of tokens into display rows
struct RowPacker {
    rows: Vec<String<ROW_CAP>, MAX_RESULT_ROWS>,
    current: String<ROW_CAP>,
}

impl RowPacker {
    /// Packing starts on the header row
    fn start(header: String<ROW_CAP>) -> Self {
        Self {
            rows: Vec::new(),
            current: header,
        }
    }

    fn push_token(&mut self, token: &str) {
        if self.current.is_empty() {
            let _ = self.current.push_str(token);
        } else if self.current.len() + 1 + token.len() <= PACK_WIDTH {
            let _ = self.current.push(' ');
            let _ = self.current.push_str(token);
        } else {
            self.flush();
            let _ = self.current.push_str(token);
        }
    }

    /// A row of its own, never packed alongside tokens
    fn push_row(&mut self, text: &str) {
        self.flush();
        let _ = self.current.push_str(text);
        self.flush();
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let _ = self.rows.push(mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<String<ROW_CAP>, MAX_RESULT_ROWS> {
        self.flush();
        self.rows
    }
}
