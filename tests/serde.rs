#![cfg(feature = "serde")]

use pgm_levels::index::Segment;
use pgm_levels::{DynamicConfig, F64, Map, Static};

#[test]
fn serde_roundtrip_static() {
    let data: Vec<u64> = (0..1000).map(|i| i * i).collect();
    let index = Static::new(&data, 8, 4).unwrap();

    let json = serde_json::to_string(&index).unwrap();
    let de: Static<u64> = serde_json::from_str(&json).unwrap();

    assert_eq!(index.len(), de.len());
    assert_eq!(index.height(), de.height());
    assert_eq!(index.segments_count(), de.segments_count());

    for key in [0u64, 10, 500, 998_001, 2_000_000] {
        assert_eq!(
            index.lower_bound(&data, &key),
            de.lower_bound(&data, &key)
        );
    }
}

#[test]
fn serde_roundtrip_map() {
    let map: Map<u64, String> = (0..100).map(|i| (i, format!("v{i}"))).collect();
    let json = serde_json::to_string(&map).unwrap();
    let de: Map<u64, String> = serde_json::from_str(&json).unwrap();

    assert_eq!(map.len(), de.len());
    for k in 0..100 {
        assert_eq!(map.get(&k), de.get(&k));
    }
}

#[test]
fn serde_float_keys_are_transparent() {
    let segment = Segment::new(F64(1.5), 0.25, 3, 7);
    let json = serde_json::to_string(&segment).unwrap();
    assert!(json.contains("\"key\":1.5"));

    let de: Segment<F64> = serde_json::from_str(&json).unwrap();
    assert_eq!(de, segment);
}

#[test]
fn serde_config_fills_defaults() {
    let config: DynamicConfig = serde_json::from_str(r#"{"base_capacity": 32}"#).unwrap();
    assert_eq!(config.base_capacity, 32);
    assert_eq!(config.epsilon, DynamicConfig::default().epsilon);
    assert_eq!(config.growth_factor, 2);

    let json = serde_json::to_string(&config).unwrap();
    let back: DynamicConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
