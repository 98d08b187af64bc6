//! Units and fixed-point weight arithmetic
//!
//! All weights in this crate are integers in hundredths of the display
//! unit (225.5 kg = 22550). Conversions between kilograms and pounds are
//! done in pure integer arithmetic against the exact rational form of the
//! conversion coefficient, so no value ever passes through floating point.

use core::cmp::Ordering;
use heapless::String;

/// kg → lb coefficient as the exact rational 220462 / 100000 (2.20462).
const KG_LB_NUM: u64 = 220_462;
const KG_LB_DEN: u64 = 100_000;

/// Maximum length of a formatted hundredths weight.
pub const MAX_WEIGHT_STR_LEN: usize = 12;

/// Weight unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    /// Kilograms
    Kg,
    /// Pounds
    Lb,
}

impl Unit {
    /// Display label as shown on the panel
    pub fn label(self) -> &'static str {
        match self {
            Unit::Kg => "KG",
            Unit::Lb => "LB",
        }
    }
}

/// An (input, output) unit combination
///
/// The input unit is what the user types the target weight in; the output
/// unit is what the plates are denominated in. Only the four combinations
/// in [`UNIT_RING`] are reachable, cycled by the unit-toggle key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitPair {
    /// Unit the target weight is entered in
    pub input: Unit,
    /// Unit the plates are denominated in
    pub output: Unit,
}

/// The fixed 4-state unit toggle ring
pub const UNIT_RING: [UnitPair; 4] = [
    UnitPair {
        input: Unit::Lb,
        output: Unit::Lb,
    },
    UnitPair {
        input: Unit::Lb,
        output: Unit::Kg,
    },
    UnitPair {
        input: Unit::Kg,
        output: Unit::Kg,
    },
    UnitPair {
        input: Unit::Kg,
        output: Unit::Lb,
    },
];

impl UnitPair {
    /// Look up a pair by its ring index (wraps modulo the ring length)
    pub fn from_ring_index(index: u8) -> Self {
        UNIT_RING[index as usize % UNIT_RING.len()]
    }

    /// Whether the target weight needs converting before plate selection
    pub fn converts(&self) -> bool {
        self.input != self.output
    }
}

/// Divide `n` by `d`, rounding to the nearest integer
///
/// Ties (exact halves) round to the even quotient, matching the rounding
/// of the conversion coefficient's reference behavior. `d` must be > 0.
pub fn round_half_even(n: u64, d: u64) -> u64 {
    debug_assert!(d > 0);
    let q = n / d;
    let r = n % d;
    match (2 * r).cmp(&d) {
        Ordering::Less => q,
        Ordering::Greater => q + 1,
        Ordering::Equal => q + (q & 1),
    }
}

/// Convert hundredths of a kilogram to hundredths of a pound
pub fn kg_to_lb(hundredths_kg: u32) -> u32 {
    round_half_even(hundredths_kg as u64 * KG_LB_NUM, KG_LB_DEN) as u32
}

/// Convert hundredths of a pound to hundredths of a kilogram
pub fn lb_to_kg(hundredths_lb: u32) -> u32 {
    round_half_even(hundredths_lb as u64 * KG_LB_DEN, KG_LB_NUM) as u32
}

/// Format a hundredths weight for display
///
/// Whole weights render with no decimal point, tenths with one decimal
/// digit, anything else with two.
pub fn format_hundredths(weight: u32) -> String<MAX_WEIGHT_STR_LEN> {
    use core::fmt::Write;

    let mut s = String::new();
    let whole = weight / 100;
    let frac = weight % 100;

    if frac == 0 {
        let _ = write!(s, "{}", whole);
    } else if frac % 10 == 0 {
        let _ = write!(s, "{}.{}", whole, frac / 10);
    } else {
        let _ = write!(s, "{}.{:02}", whole, frac);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unit_labels() {
        assert_eq!(Unit::Kg.label(), "KG");
        assert_eq!(Unit::Lb.label(), "LB");
    }

    #[test]
    fn test_ring_order() {
        assert_eq!(
            UnitPair::from_ring_index(0),
            UnitPair {
                input: Unit::Lb,
                output: Unit::Lb
            }
        );
        assert_eq!(
            UnitPair::from_ring_index(1),
            UnitPair {
                input: Unit::Lb,
                output: Unit::Kg
            }
        );
        assert_eq!(
            UnitPair::from_ring_index(2),
            UnitPair {
                input: Unit::Kg,
                output: Unit::Kg
            }
        );
        assert_eq!(
            UnitPair::from_ring_index(3),
            UnitPair {
                input: Unit::Kg,
                output: Unit::Lb
            }
        );
    }

    #[test]
    fn test_ring_index_wraps() {
        assert_eq!(UnitPair::from_ring_index(4), UnitPair::from_ring_index(0));
        assert_eq!(UnitPair::from_ring_index(7), UnitPair::from_ring_index(3));
    }

    #[test]
    fn test_converts() {
        assert!(!UnitPair::from_ring_index(0).converts());
        assert!(UnitPair::from_ring_index(1).converts());
        assert!(!UnitPair::from_ring_index(2).converts());
        assert!(UnitPair::from_ring_index(3).converts());
    }

    #[test]
    fn test_kg_to_lb_known_values() {
        // 100 kg = 220.462 lb, rounds to 220.46
        assert_eq!(kg_to_lb(10_000), 22_046);
        // 20 kg bar = 44.0924 lb
        assert_eq!(kg_to_lb(2_000), 4_409);
        assert_eq!(kg_to_lb(0), 0);
    }

    #[test]
    fn test_lb_to_kg_known_values() {
        // 45 lb bar = 20.41166 kg
        assert_eq!(lb_to_kg(4_500), 2_041);
        // 225 lb = 102.059 kg
        assert_eq!(lb_to_kg(22_500), 10_206);
        assert_eq!(lb_to_kg(0), 0);
    }

    #[test]
    fn test_round_half_even_ties() {
        // 2.5 -> 2 (even), 3.5 -> 4 (even)
        assert_eq!(round_half_even(5, 2), 2);
        assert_eq!(round_half_even(7, 2), 4);
        // Non-ties round to nearest
        assert_eq!(round_half_even(49, 100), 0);
        assert_eq!(round_half_even(51, 100), 1);
    }

    #[test]
    fn test_format_whole() {
        assert_eq!(format_hundredths(12_300).as_str(), "123");
        assert_eq!(format_hundredths(0).as_str(), "0");
        assert_eq!(format_hundredths(4_500).as_str(), "45");
    }

    #[test]
    fn test_format_tenths() {
        assert_eq!(format_hundredths(12_350).as_str(), "123.5");
        assert_eq!(format_hundredths(250).as_str(), "2.5");
    }

    #[test]
    fn test_format_hundredths_digits() {
        assert_eq!(format_hundredths(12_345).as_str(), "123.45");
        assert_eq!(format_hundredths(125).as_str(), "1.25");
        // Fractional part below ten keeps its leading zero
        assert_eq!(format_hundredths(105).as_str(), "1.05");
    }

    proptest! {
        #[test]
        fn prop_conversion_round_trip(w in 0u32..1_000_000) {
            // Double rounding may drift by at most one hundredth
            let there_and_back = kg_to_lb(lb_to_kg(w));
            let diff = there_and_back.abs_diff(w);
            prop_assert!(diff <= 1, "{} -> {} (diff {})", w, there_and_back, diff);
        }

        #[test]
        fn prop_conversion_monotonic(w in 0u32..1_000_000) {
            prop_assert!(kg_to_lb(w + 1) >= kg_to_lb(w));
            prop_assert!(lb_to_kg(w + 1) >= lb_to_kg(w));
        }
    }
}
