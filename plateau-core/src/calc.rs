//! Plate calculation engine
//!
//! Given a target weight, the unit pair and one unit's weight inventory,
//! picks the plates to load per side and reports the weight the bar will
//! actually carry. All arithmetic is integer hundredths.

use heapless::{String, Vec};

use crate::config::{Denomination, UnitWeightConfig, MAX_DENOMINATIONS, MAX_NAME_LEN};
use crate::units::{kg_to_lb, lb_to_kg, Unit, UnitPair};

/// Maximum length of a rendered plate count ("1.25x99")
pub const MAX_PLATE_STR_LEN: usize = MAX_NAME_LEN + 4;

/// How many of one plate denomination to load per side
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlateCount {
    /// Denomination label ("45", "2.5")
    pub label: String<MAX_NAME_LEN>,
    /// Plates of this denomination per side
    pub quantity: u32,
}

/// A computed plate breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calculation {
    /// Per-side plate counts, descending by denomination value
    pub plates: Vec<PlateCount, MAX_DENOMINATIONS>,
    /// Weight the loaded bar actually carries, hundredths of the output unit
    ///
    /// Authoritative; differs from the requested target whenever the target
    /// is not reachable with the enabled denominations.
    pub end_weight: u32,
}

impl Calculation {
    /// Render each count as `<label>x<quantity>`, preserving order
    pub fn plate_count_strings(&self) -> Vec<String<MAX_PLATE_STR_LEN>, MAX_DENOMINATIONS> {
        use core::fmt::Write;

        let mut out = Vec::new();
        for plate in &self.plates {
            let mut s: String<MAX_PLATE_STR_LEN> = String::new();
            let _ = write!(s, "{}x{}", plate.label, plate.quantity);
            let _ = out.push(s);
        }
        out
    }
}

/// Errors the engine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalcError {
    /// Every plate of the output unit is disabled
    NoPlatesEnabled,
}

/// Compute the plate breakdown for a target weight
///
/// `target` is in hundredths of the pair's input unit; the breakdown and
/// end weight come out in the output unit. Steps:
///
/// 1. Convert the target when the pair's units differ.
/// 2. Take the bar weight off, halve what is left (floor; the two sides
///    carry equal integer loads), and if the half does not even cover a
///    collar, report a bare bar. Otherwise take one collar off the side.
/// 3. Round the per-side weight to the nearest multiple of the smallest
///    enabled plate, then assign plates greedily, largest first.
pub fn compute(
    target: u32,
    pair: UnitPair,
    config: &UnitWeightConfig,
) -> Result<Calculation, CalcError> {
    let target = match (pair.input, pair.output) {
        (Unit::Lb, Unit::Kg) => lb_to_kg(target),
        (Unit::Kg, Unit::Lb) => kg_to_lb(target),
        _ => target,
    };

    let per_side = (target as i32 - config.bar as i32).div_euclid(2);
    if per_side < config.collar as i32 {
        return Ok(Calculation {
            plates: Vec::new(),
            end_weight: config.bar,
        });
    }
    let mut remaining = (per_side - config.collar as i32) as u32;

    let mut enabled: Vec<&Denomination, MAX_DENOMINATIONS> =
        config.plates.iter().filter(|d| d.using).collect();
    if enabled.is_empty() {
        return Err(CalcError::NoPlatesEnabled);
    }
    enabled.sort_unstable_by(|a, b| b.value.cmp(&a.value));

    // Nearest multiple of the smallest enabled plate, halves rounding up
    let smallest = enabled[enabled.len() - 1].value;
    remaining = (remaining + smallest / 2) / smallest * smallest;

    let mut plates = Vec::new();
    let mut side_total = 0u32;
    for denom in enabled {
        let quantity = remaining / denom.value;
        if quantity > 0 {
            remaining -= quantity * denom.value;
            side_total += quantity * denom.value;
            let _ = plates.push(PlateCount {
                label: denom.name.clone(),
                quantity,
            });
        }
    }

    Ok(Calculation {
        plates,
        end_weight: 2 * side_total + config.bar + 2 * config.collar,
    })
}
