//! Factory defaults
//!
//! Seeded into persistent storage on first boot and whenever a key is
//! missing. The inventory mirrors a common home-gym setup; uncommon
//! denominations are present but disabled so they can be enabled from
//! the menu without editing firmware.

use heapless::Vec;

use super::types::{Denomination, PromptConfig, UnitWeightConfig, WeightsConfig, MAX_DENOMINATIONS};

fn denoms<const N: usize>(entries: [(&str, u32, bool); N]) -> Vec<Denomination, MAX_DENOMINATIONS> {
    let mut v = Vec::new();
    for (name, value, using) in entries {
        let _ = v.push(Denomination::new(name, value, using));
    }
    v
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            lb: UnitWeightConfig {
                plates: denoms([
                    ("55", 5500, false),
                    ("45", 4500, true),
                    ("35", 3500, false),
                    ("25", 2500, true),
                    ("10", 1000, true),
                    ("5", 500, true),
                    ("2.5", 250, true),
                    ("1.25", 125, false),
                ]),
                bars: denoms([("45", 4500, true), ("35", 3500, false)]),
                collars: denoms([("0", 0, true)]),
                bar: 4500,
                collar: 0,
            },
            kg: UnitWeightConfig {
                plates: denoms([
                    ("25", 2500, true),
                    ("20", 2000, true),
                    ("15", 1500, true),
                    ("10", 1000, true),
                    ("5", 500, true),
                    ("2.5", 250, true),
                    ("1.25", 125, true),
                ]),
                bars: denoms([("20", 2000, true), ("15", 1500, false)]),
                collars: denoms([("0", 0, true), ("1.25", 125, false), ("2.5", 250, false)]),
                bar: 2000,
                collar: 0,
            },
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { unit_state: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_defaults_denormalized_consistent() {
        let cfg = WeightsConfig::default();
        assert!(cfg.lb.denormalized_consistent());
        assert!(cfg.kg.denormalized_consistent());
    }

    #[test]
    fn test_default_bars() {
        let cfg = WeightsConfig::default();
        assert_eq!(cfg.unit(Unit::Lb).bar, 4500);
        assert_eq!(cfg.unit(Unit::Kg).bar, 2000);
        assert_eq!(cfg.unit(Unit::Lb).collar, 0);
        assert_eq!(cfg.unit(Unit::Kg).collar, 0);
    }

    #[test]
    fn test_default_kg_plates_all_enabled() {
        let cfg = WeightsConfig::default();
        assert!(cfg.kg.plates.iter().all(|p| p.using));
        assert_eq!(cfg.kg.plates.len(), 7);
    }

    #[test]
    fn test_default_lb_plates_partially_enabled() {
        let cfg = WeightsConfig::default();
        let enabled: heapless::Vec<&str, 8> = cfg
            .lb
            .plates
            .iter()
            .filter(|p| p.using)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(&enabled[..], &["45", "25", "10", "5", "2.5"]);
    }

    #[test]
    fn test_default_prompt_starts_on_pounds() {
        assert_eq!(PromptConfig::default().unit_state, 0);
    }
}
