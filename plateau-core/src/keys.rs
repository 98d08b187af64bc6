//! Keypad input vocabulary
//!
//! The logical key set and the fixed 4x4 layout mapping physical matrix
//! positions to keys. The electrical scan lives in the driver crate; this
//! module only names what a scan can report.

/// One decoded key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    /// Zero the weight entry field
    Clear,
    /// Submit the entry, labeled `=`
    Enter,
    /// Display power toggle / sleep
    Power,
    /// Enter or leave the configuration menu, labeled `SET`
    Config,
    /// Move entry focus to the percent field
    Percent,
    /// Advance the unit pair ring, labeled `KG/LB`
    UnitToggle,
    /// Sentinel: no key arrived inside the read window
    Timeout,
}

/// Physical 4x4 layout, row-major top-to-bottom
pub const KEYPAD_LAYOUT: [[Key; 4]; 4] = [
    [Key::One, Key::Two, Key::Three, Key::Power],
    [Key::Four, Key::Five, Key::Six, Key::Config],
    [Key::Seven, Key::Eight, Key::Nine, Key::Percent],
    [Key::Clear, Key::Zero, Key::Enter, Key::UnitToggle],
];

impl Key {
    /// Numeric value for digit keys, None otherwise
    pub fn digit(self) -> Option<u16> {
        match self {
            Key::Zero => Some(0),
            Key::One => Some(1),
            Key::Two => Some(2),
            Key::Three => Some(3),
            Key::Four => Some(4),
            Key::Five => Some(5),
            Key::Six => Some(6),
            Key::Seven => Some(7),
            Key::Eight => Some(8),
            Key::Nine => Some(9),
            _ => None,
        }
    }

    /// Keycap label as printed on the panel
    pub fn label(self) -> &'static str {
        match self {
            Key::Zero => "0",
            Key::One => "1",
            Key::Two => "2",
            Key::Three => "3",
            Key::Four => "4",
            Key::Five => "5",
            Key::Six => "6",
            Key::Seven => "7",
            Key::Eight => "8",
            Key::Nine => "9",
            Key::Clear => "CLR",
            Key::Enter => "=",
            Key::Power => "P",
            Key::Config => "SET",
            Key::Percent => "%",
            Key::UnitToggle => "KG/LB",
            Key::Timeout => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_values() {
        assert_eq!(Key::Zero.digit(), Some(0));
        assert_eq!(Key::Nine.digit(), Some(9));
        assert_eq!(Key::Enter.digit(), None);
        assert_eq!(Key::Timeout.digit(), None);
    }

    #[test]
    fn test_layout_corners() {
        assert_eq!(KEYPAD_LAYOUT[0][0], Key::One);
        assert_eq!(KEYPAD_LAYOUT[0][3], Key::Power);
        assert_eq!(KEYPAD_LAYOUT[3][0], Key::Clear);
        assert_eq!(KEYPAD_LAYOUT[3][3], Key::UnitToggle);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Key::Enter.label(), "=");
        assert_eq!(Key::Config.label(), "SET");
        assert_eq!(Key::UnitToggle.label(), "KG/LB");
        assert_eq!(Key::Seven.label(), "7");
    }

    #[test]
    fn test_layout_has_every_digit() {
        for d in 0..=9u16 {
            let found = KEYPAD_LAYOUT
                .iter()
                .flatten()
                .any(|k| k.digit() == Some(d));
            assert!(found, "digit {} missing from layout", d);
        }
    }
}
