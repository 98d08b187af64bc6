//! Configuration schema and defaults
//!
//! The persisted configuration document has two keys: the per-unit weight
//! inventory (`weights`) and the prompt's last-used unit mode (`prompt`).
//! Storage backends serialize these types as-is; the schema must round-trip
//! exactly through whatever encoding a backend picks.

mod defaults;
mod types;

pub use types::{
    Denomination, DenominationGroup, PromptConfig, UnitWeightConfig, WeightsConfig,
    MAX_DENOMINATIONS, MAX_NAME_LEN,
};

#[cfg(all(test, feature = "serde"))]
mod roundtrip {
    use super::*;
    use proptest::prelude::*;

    const LB_PLATES: [&str; 8] = ["55", "45", "35", "25", "10", "5", "2.5", "1.25"];
    const KG_PLATES: [&str; 7] = ["25", "20", "15", "10", "5", "2.5", "1.25"];

    /// An arbitrary reachable configuration: the defaults after a run of
    /// menu edits
    fn document(
        lb_mask: u8,
        kg_mask: u8,
        lb_bar: &str,
        kg_bar: &str,
        kg_collar: &str,
    ) -> WeightsConfig {
        let mut weights = WeightsConfig::default();
        for (i, name) in LB_PLATES.iter().enumerate() {
            if lb_mask & (1 << i) != 0 {
                assert!(weights.lb.toggle_plate(name));
            }
        }
        for (i, name) in KG_PLATES.iter().enumerate() {
            if kg_mask & (1 << i) != 0 {
                assert!(weights.kg.toggle_plate(name));
            }
        }
        assert!(weights.lb.select_bar(lb_bar));
        assert!(weights.kg.select_bar(kg_bar));
        assert!(weights.kg.select_collar(kg_collar));
        weights
    }

    proptest! {
        #[test]
        fn prop_weights_round_trip(
            lb_mask in any::<u8>(),
            kg_mask in 0u8..0x80,
            lb_bar in prop::sample::select(&["45", "35"][..]),
            kg_bar in prop::sample::select(&["20", "15"][..]),
            kg_collar in prop::sample::select(&["0", "1.25", "2.5"][..]),
        ) {
            let weights = document(lb_mask, kg_mask, lb_bar, kg_bar, kg_collar);
            let mut buf = [0u8; 512];
            let bytes = postcard::to_slice(&weights, &mut buf).unwrap();
            let back: WeightsConfig = postcard::from_bytes(bytes).unwrap();
            prop_assert_eq!(back, weights);
        }

        #[test]
        fn prop_prompt_round_trip(unit_state in 0u8..4) {
            let prompt = PromptConfig { unit_state };
            let mut buf = [0u8; 16];
            let bytes = postcard::to_slice(&prompt, &mut buf).unwrap();
            let back: PromptConfig = postcard::from_bytes(bytes).unwrap();
            prop_assert_eq!(back, prompt);
        }
    }
}
