//! Configuration Tests.
//!
//! Covers defaults, JSON parsing, validation, the exponent form, and presets.

use cachesim_core::SimError;
use cachesim_core::config::{Config, Mapping, Preset, ReplacementPolicy, WritePolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn default_matches_first_preset() {
    let config = Config::default();
    assert_eq!(config.memory.size_bytes, 1024);
    assert_eq!(config.cache.size_bytes, 64);
    assert_eq!(config.cache.block_bytes, 8);
    assert_eq!(config.cache.mapping, Mapping::Direct);
    assert_eq!(config.cache.replacement, ReplacementPolicy::Lru);
    assert_eq!(config.cache.write_policy, WritePolicy::Wb);
    assert_eq!(config, Preset::LruDirectWb.config());
    config.validate().unwrap();
}

#[test]
fn empty_json_yields_defaults() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

// ══════════════════════════════════════════════════════════
// 2. JSON Parsing
// ══════════════════════════════════════════════════════════

#[test]
fn json_accepts_lowercase_policy_names() {
    let json = r#"{
        "cache": { "mapping": "FULL", "replacement": "fifo", "write_policy": "wa", "seed": 7 }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.cache.mapping, Mapping::Full);
    assert_eq!(config.cache.replacement, ReplacementPolicy::Fifo);
    assert_eq!(config.cache.write_policy, WritePolicy::Wa);
    assert_eq!(config.cache.seed, 7);
    assert_eq!(config.memory.size_bytes, 1024);
}

#[rstest]
#[case::bad_mapping(r#"{ "cache": { "mapping": "diagonal" } }"#)]
#[case::zero_ways(r#"{ "cache": { "mapping": "set:0" } }"#)]
#[case::bad_policy(r#"{ "cache": { "replacement": "MRU" } }"#)]
#[case::not_json("cache = 64")]
fn malformed_json_is_rejected(#[case] json: &str) {
    assert!(matches!(Config::from_json(json), Err(SimError::Json(_))));
}

#[rstest]
#[case::partial_block(r#"{ "cache": { "size_bytes": 60 } }"#)]
#[case::ways_do_not_divide(r#"{ "cache": { "mapping": "set:3" } }"#)]
#[case::memory_not_blocks(r#"{ "memory": { "size_bytes": 1020 } }"#)]
#[case::empty_memory(r#"{ "memory": { "size_bytes": 0 } }"#)]
fn inconsistent_json_fails_validation(#[case] json: &str) {
    assert!(matches!(
        Config::from_json(json),
        Err(SimError::InvalidConfiguration(_))
    ));
}

// ══════════════════════════════════════════════════════════
// 3. Enum Parsing
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("direct", Mapping::Direct)]
#[case("Full", Mapping::Full)]
#[case("set:4", Mapping::Set(4))]
#[case(" SET:2 ", Mapping::Set(2))]
fn mapping_parses(#[case] text: &str, #[case] expected: Mapping) {
    assert_eq!(text.parse::<Mapping>().unwrap(), expected);
}

#[test]
fn mapping_resolves_associativity() {
    assert_eq!(Mapping::Direct.associativity(8), 1);
    assert_eq!(Mapping::Full.associativity(8), 8);
    assert_eq!(Mapping::Set(2).associativity(8), 2);
    assert_eq!(Mapping::Set(2).to_string(), "set:2");
}

#[test]
fn policy_names_round_trip_through_display() {
    for policy in ReplacementPolicy::ALL {
        assert_eq!(policy.to_string().parse::<ReplacementPolicy>().unwrap(), policy);
    }
    for policy in WritePolicy::ALL {
        assert_eq!(policy.to_string().parse::<WritePolicy>().unwrap(), policy);
    }
    assert_eq!(
        "random".parse::<ReplacementPolicy>().unwrap(),
        ReplacementPolicy::Rand
    );
    assert!("MRU".parse::<ReplacementPolicy>().is_err());
    assert!("WC".parse::<WritePolicy>().is_err());
}

#[test]
fn only_write_back_allocates_on_write() {
    assert!(WritePolicy::Wb.allocates_on_write());
    assert!(!WritePolicy::Wt.allocates_on_write());
    assert!(!WritePolicy::Wa.allocates_on_write());
}

// ══════════════════════════════════════════════════════════
// 4. Exponent Form
// ══════════════════════════════════════════════════════════

#[test]
fn exponents_build_power_of_two_sizes() {
    let config = Config::from_exponents(
        10,
        6,
        3,
        Mapping::Set(2),
        ReplacementPolicy::Lru,
        WritePolicy::Wt,
    )
    .unwrap();
    assert_eq!(config, Preset::Lru2WayWt.config());
}

#[rstest]
#[case::block_larger_than_cache(10, 3, 6)]
#[case::memory_smaller_than_block(2, 6, 3)]
#[case::overflow(200, 6, 3)]
fn bad_exponents_are_rejected(#[case] mem: u32, #[case] cache: u32, #[case] block: u32) {
    let result = Config::from_exponents(
        mem,
        cache,
        block,
        Mapping::Direct,
        ReplacementPolicy::Lru,
        WritePolicy::Wb,
    );
    assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
}

// ══════════════════════════════════════════════════════════
// 5. Presets
// ══════════════════════════════════════════════════════════

#[test]
fn presets_share_reference_geometry() {
    for preset in Preset::ALL {
        let config = preset.config();
        assert_eq!(config.memory.size_bytes, 1024, "{preset}");
        assert_eq!(config.cache.size_bytes, 64, "{preset}");
        assert_eq!(config.cache.block_bytes, 8, "{preset}");
        config.validate().unwrap();
    }
}

#[rstest]
#[case("1", Preset::LruDirectWb)]
#[case("2", Preset::FifoFullWb)]
#[case("lru-2way-wt", Preset::Lru2WayWt)]
#[case("RAND-DIRECT-WB", Preset::RandDirectWb)]
fn preset_parses(#[case] text: &str, #[case] expected: Preset) {
    assert_eq!(text.parse::<Preset>().unwrap(), expected);
}

#[test]
fn unknown_preset_is_rejected() {
    assert!(matches!(
        "5".parse::<Preset>(),
        Err(SimError::InvalidConfiguration(_))
    ));
}
