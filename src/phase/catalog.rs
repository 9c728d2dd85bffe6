//! Named lunar phases and their light-model values.

use serde::{Deserialize, Serialize};

/// One of the eight named lunar phases, in display order.
///
/// Serializes as its catalog key, so config files and `--phase` share names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseId {
    #[serde(rename = "new-moon")]
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    #[serde(rename = "full-moon")]
    Full,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

/// A fixed named phase. `value` is fed to the light model in place of the
/// free-running clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseDefinition {
    pub id: PhaseId,
    /// Stable kebab-case key: the `initial_phase` config value and the
    /// `--phase` argument.
    pub key: &'static str,
    pub display_name: &'static str,
    pub value: f32,
}

const CATALOG: [PhaseDefinition; 8] = [
    PhaseDefinition { id: PhaseId::New, key: "new-moon", display_name: "New Moon", value: 25.0 },
    PhaseDefinition { id: PhaseId::WaxingCrescent, key: "waxing-crescent", display_name: "Waxing Crescent", value: 31.0 },
    PhaseDefinition { id: PhaseId::FirstQuarter, key: "first-quarter", display_name: "First Quarter", value: 34.0 },
    PhaseDefinition { id: PhaseId::WaxingGibbous, key: "waxing-gibbous", display_name: "Waxing Gibbous", value: 5.0 },
    PhaseDefinition { id: PhaseId::Full, key: "full-moon", display_name: "Full Moon", value: 10.0 },
    PhaseDefinition { id: PhaseId::WaningGibbous, key: "waning-gibbous", display_name: "Waning Gibbous", value: 15.0 },
    PhaseDefinition { id: PhaseId::ThirdQuarter, key: "third-quarter", display_name: "Third Quarter", value: 18.5 },
    PhaseDefinition { id: PhaseId::WaningCrescent, key: "waning-crescent", display_name: "Waning Crescent", value: 21.0 },
];

/// The full phase catalog in display order.
#[inline]
pub fn catalog() -> &'static [PhaseDefinition; 8] {
    &CATALOG
}

impl PhaseId {
    /// All phases in display order.
    pub const ALL: [PhaseId; 8] = [
        PhaseId::New,
        PhaseId::WaxingCrescent,
        PhaseId::FirstQuarter,
        PhaseId::WaxingGibbous,
        PhaseId::Full,
        PhaseId::WaningGibbous,
        PhaseId::ThirdQuarter,
        PhaseId::WaningCrescent,
    ];

    /// Position of this phase in the catalog.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Phase at the given catalog position, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look up a phase by its kebab-case key.
    pub fn from_key(key: &str) -> Option<Self> {
        CATALOG.iter().find(|p| p.key == key).map(|p| p.id)
    }

    /// Catalog entry for this phase.
    #[inline]
    pub fn definition(self) -> &'static PhaseDefinition {
        &CATALOG[self.index()]
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.definition().value
    }

    #[inline]
    pub fn display_name(self) -> &'static str {
        self.definition().display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_ids() {
        for (i, def) in catalog().iter().enumerate() {
            assert_eq!(def.id.index(), i, "{} is out of order", def.key);
            assert_eq!(PhaseId::from_index(i), Some(def.id));
        }
        assert_eq!(PhaseId::from_index(8), None);
    }

    #[test]
    fn test_values_in_designer_range() {
        for def in catalog() {
            assert!(
                (5.0..=35.0).contains(&def.value),
                "{} value {} outside [5, 35]",
                def.key,
                def.value
            );
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(PhaseId::from_key("new-moon"), Some(PhaseId::New));
        assert_eq!(PhaseId::from_key("third-quarter"), Some(PhaseId::ThirdQuarter));
        assert_eq!(PhaseId::from_key("harvest-moon"), None);
    }

    #[test]
    fn test_serialized_ids_are_catalog_keys() {
        for def in catalog() {
            let json = serde_json::to_string(&def.id).unwrap();
            assert_eq!(json, format!("\"{}\"", def.key));
            let name: String = serde_json::from_str(&json).unwrap();
            assert_eq!(PhaseId::from_key(&name), Some(def.id), "{} does not resolve", name);
            let parsed: PhaseId = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, def.id);
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(PhaseId::New.value(), 25.0);
        assert_eq!(PhaseId::WaxingCrescent.value(), 31.0);
        assert_eq!(PhaseId::Full.display_name(), "Full Moon");
    }
}
