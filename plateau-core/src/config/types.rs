//! Configuration type definitions
//!
//! All weight values are integers in hundredths of the owning unit.
//! `UnitWeightConfig` carries two denormalized fields, `bar` and `collar`,
//! which always mirror the value of the single enabled entry in the
//! matching group; the radio-select edit operations are the only mutation
//! path and keep them in sync.

use heapless::{String, Vec};

use crate::units::Unit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of a denomination name ("2.5", "45", ...)
pub const MAX_NAME_LEN: usize = 8;

/// Maximum denominations per group (plates, bars or collars of one unit)
pub const MAX_DENOMINATIONS: usize = 8;

/// One named weight with an availability flag
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Denomination {
    /// Display name, also the lookup key ("45", "2.5", ...)
    pub name: String<MAX_NAME_LEN>,
    /// Weight in hundredths of the owning unit
    pub value: u32,
    /// Whether this weight is physically available
    pub using: bool,
}

impl Denomination {
    /// Build a denomination; names longer than [`MAX_NAME_LEN`] are truncated
    pub fn new(name: &str, value: u32, using: bool) -> Self {
        let mut n = String::new();
        let _ = n.push_str(&name[..name.len().min(MAX_NAME_LEN)]);
        Self {
            name: n,
            value,
            using,
        }
    }
}

/// Denomination group selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DenominationGroup {
    /// Plates; any number may be enabled at once
    Plates,
    /// Bars; exactly one enabled at all times
    Bars,
    /// Collars; exactly one enabled at all times (value 0 = no collar)
    Collars,
}

/// Weight inventory for a single unit
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitWeightConfig {
    /// Available plate denominations
    pub plates: Vec<Denomination, MAX_DENOMINATIONS>,
    /// Available bar denominations
    pub bars: Vec<Denomination, MAX_DENOMINATIONS>,
    /// Available collar denominations
    pub collars: Vec<Denomination, MAX_DENOMINATIONS>,
    /// Value of the enabled bar, in hundredths
    pub bar: u32,
    /// Value of the enabled collar, in hundredths
    pub collar: u32,
}

impl UnitWeightConfig {
    /// Entries of one group
    pub fn group(&self, group: DenominationGroup) -> &[Denomination] {
        match group {
            DenominationGroup::Plates => &self.plates,
            DenominationGroup::Bars => &self.bars,
            DenominationGroup::Collars => &self.collars,
        }
    }

    fn group_mut(&mut self, group: DenominationGroup) -> &mut Vec<Denomination, MAX_DENOMINATIONS> {
        match group {
            DenominationGroup::Plates => &mut self.plates,
            DenominationGroup::Bars => &mut self.bars,
            DenominationGroup::Collars => &mut self.collars,
        }
    }

    /// Whether the named entry of a group is enabled
    pub fn is_using(&self, group: DenominationGroup, name: &str) -> bool {
        self.group(group)
            .iter()
            .any(|d| d.name.as_str() == name && d.using)
    }

    /// Flip a plate's availability; returns false if the name is unknown
    pub fn toggle_plate(&mut self, name: &str) -> bool {
        match self.plates.iter_mut().find(|d| d.name.as_str() == name) {
            Some(plate) => {
                plate.using = !plate.using;
                true
            }
            None => false,
        }
    }

    /// Make the named bar the single enabled one
    ///
    /// Refused (returns false) when the group has fewer than two entries,
    /// since the edit could otherwise strand the unit without a bar. On
    /// success the denormalized `bar` field follows the new selection.
    pub fn select_bar(&mut self, name: &str) -> bool {
        match radio_select(self.group_mut(DenominationGroup::Bars), name) {
            Some(value) => {
                self.bar = value;
                true
            }
            None => false,
        }
    }

    /// Make the named collar the single enabled one; same rules as bars
    pub fn select_collar(&mut self, name: &str) -> bool {
        match radio_select(self.group_mut(DenominationGroup::Collars), name) {
            Some(value) => {
                self.collar = value;
                true
            }
            None => false,
        }
    }

    /// The currently enabled bar entry
    pub fn enabled_bar(&self) -> Option<&Denomination> {
        self.bars.iter().find(|d| d.using)
    }

    /// The currently enabled collar entry
    pub fn enabled_collar(&self) -> Option<&Denomination> {
        self.collars.iter().find(|d| d.using)
    }

    /// Whether `bar`/`collar` mirror the enabled entries of their groups
    ///
    /// Holds after initialization and across every edit; checked as a test
    /// property rather than trusted silently.
    pub fn denormalized_consistent(&self) -> bool {
        self.enabled_bar().map(|d| d.value) == Some(self.bar)
            && self.enabled_collar().map(|d| d.value) == Some(self.collar)
    }
}

/// Exclusive selection inside one group
///
/// Returns the newly selected value, or None when the edit is refused
/// (fewer than two entries to exchange, or the name is unknown).
fn radio_select(entries: &mut [Denomination], name: &str) -> Option<u32> {
    if entries.len() < 2 {
        return None;
    }
    let value = entries.iter().find(|d| d.name.as_str() == name)?.value;

    for entry in entries.iter_mut() {
        entry.using = entry.name.as_str() == name;
    }
    Some(value)
}

/// The full weight inventory, one entry per unit
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightsConfig {
    /// Pound inventory
    pub lb: UnitWeightConfig,
    /// Kilogram inventory
    pub kg: UnitWeightConfig,
}

impl WeightsConfig {
    /// Units in menu display order (sorted by label)
    pub const MENU_UNITS: [Unit; 2] = [Unit::Kg, Unit::Lb];

    /// Inventory of one unit
    pub fn unit(&self, unit: Unit) -> &UnitWeightConfig {
        match unit {
            Unit::Kg => &self.kg,
            Unit::Lb => &self.lb,
        }
    }

    /// Mutable inventory of one unit
    pub fn unit_mut(&mut self, unit: Unit) -> &mut UnitWeightConfig {
        match unit {
            Unit::Kg => &mut self.kg,
            Unit::Lb => &mut self.lb,
        }
    }
}

/// Prompt screen settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PromptConfig {
    /// Index into the unit toggle ring, persisted across power cycles
    pub unit_state: u8,
}
