//! Comprehensive tests for schema loading, validation, and resolution.

use std::sync::Arc;

use channel_schema::{
    ChannelAttributes, ChannelEntry, Expansion, Orientation, Registry, ResolveError, Resolver,
    SchemaError, TypeIdRange,
};

const EXAMPLE_SCHEMA: &str = include_str!("../resources/channels.yaml");

fn entry(name: &str, low: u16, high: u16, expand: Expansion, dims: &[&str]) -> ChannelEntry {
    ChannelEntry {
        name: name.to_string(),
        id_range: TypeIdRange::new(low, high),
        attributes: ChannelAttributes::default(),
        expand,
        dims: dims.iter().map(|d| d.to_string()).collect(),
    }
}

// ============================================================================
// Document parsing
// ============================================================================

#[test]
fn test_example_schema_loads() {
    let registry = Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap();
    assert_eq!(registry.len(), 9);
}

#[test]
fn test_example_schema_metadata() {
    let registry = Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap();

    let time = registry.lookup(0x100).unwrap();
    assert_eq!(time.name, "time");
    assert_eq!(time.attributes.standard_name, "time");
    assert_eq!(time.attributes.units, "seconds since 1970-01-01");
    assert!(time.is_coordinate());

    let pressure = registry.lookup(0x110).unwrap();
    assert_eq!(pressure.attributes.positive, Some(Orientation::Down));
    assert!(!pressure.is_coordinate());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("channels.yaml");
    std::fs::write(&path, EXAMPLE_SCHEMA).unwrap();

    let registry = Registry::from_path(&path).unwrap();
    assert_eq!(registry.len(), 9);
}

#[test]
fn test_load_missing_file() {
    let err = Registry::from_path("/nonexistent/channels.yaml").unwrap_err();
    assert!(matches!(err, SchemaError::FileRead(_)));
}

#[test]
fn test_numeric_and_hex_ids_are_equivalent() {
    let hex = Registry::from_yaml_str("P:\n  type_id: \"0x110\"\n  dims: time\n").unwrap();
    let dec = Registry::from_yaml_str("P:\n  type_id: 272\n  dims: time\n").unwrap();
    assert_eq!(
        hex.lookup(0x110).unwrap().id_range,
        dec.lookup(0x110).unwrap().id_range
    );
}

#[test]
fn test_type_id_field_alias() {
    // The upstream schema spells the key "typeID".
    let registry = Registry::from_yaml_str("P:\n  typeID: \"0x110\"\n  dims: time\n").unwrap();
    assert!(registry.lookup(0x110).is_some());
}

#[test]
fn test_expand_aliases() {
    // Upstream spellings of the alphabets.
    let yaml = "\
A:
  type_id: [\"0x111\", \"0x113\"]
  expand: xyz
  dims: time
sh:
  type_id: [\"0x130\", \"0x131\"]
  expand: \"123\"
  dims: time
";
    let registry = Registry::from_yaml_str(yaml).unwrap();
    assert_eq!(registry.lookup(0x111).unwrap().expand, Expansion::Letters);
    assert_eq!(registry.lookup(0x130).unwrap().expand, Expansion::Digits);
}

#[test]
fn test_dims_accepts_string_or_list() {
    let yaml = "\
sp:
  type_id: \"0x151\"
  dims: [time, freq]
P:
  type_id: \"0x110\"
  dims: time
";
    let registry = Registry::from_yaml_str(yaml).unwrap();
    assert_eq!(registry.lookup(0x151).unwrap().dims, vec!["time", "freq"]);
    assert_eq!(registry.lookup(0x110).unwrap().dims, vec!["time"]);
}

#[test]
fn test_rejects_unparseable_type_id() {
    let err = Registry::from_yaml_str("P:\n  type_id: \"0xZZ\"\n  dims: time\n").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidTypeId { .. }));
}

#[test]
fn test_rejects_type_id_beyond_u16() {
    let err = Registry::from_yaml_str("P:\n  type_id: 65536\n  dims: time\n").unwrap_err();
    assert!(matches!(err, SchemaError::TypeIdOutOfRange { value: 65536, .. }));
}

#[test]
fn test_rejects_non_integer_bound() {
    let result = Registry::from_yaml_str("P:\n  type_id: 1.5\n  dims: time\n");
    assert!(result.is_err());
}

#[test]
fn test_rejects_three_bounds() {
    let err = Registry::from_yaml_str(
        "A:\n  type_id: [\"0x111\", \"0x112\", \"0x113\"]\n  expand: letters\n  dims: time\n",
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::BadBoundCount { count: 3, .. }));
}

#[test]
fn test_rejects_inverted_range() {
    let err = Registry::from_yaml_str(
        "A:\n  type_id: [\"0x113\", \"0x111\"]\n  expand: letters\n  dims: time\n",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::InvertedRange { low: 0x113, high: 0x111, .. }
    ));
}

#[test]
fn test_rejects_duplicate_channel_names() {
    let yaml = "\
P:
  type_id: \"0x110\"
  dims: time
P:
  type_id: \"0x120\"
  dims: time
";
    // Rejected either at parse time or as a duplicate name; never
    // silently last-one-wins.
    assert!(Registry::from_yaml_str(yaml).is_err());
}

// ============================================================================
// Registry validation
// ============================================================================

#[test]
fn test_rejects_duplicate_names_from_entries() {
    let err = Registry::from_entries(vec![
        entry("P", 0x110, 0x110, Expansion::None, &["time"]),
        entry("P", 0x120, 0x120, Expansion::None, &["time"]),
    ])
    .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateName(name) if name == "P"));
}

#[test]
fn test_rejects_partial_overlap() {
    let err = Registry::from_entries(vec![
        entry("A", 0x111, 0x113, Expansion::Letters, &["time"]),
        entry("B", 0x113, 0x115, Expansion::Letters, &["time"]),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::OverlappingRanges { first, second } if first == "A" && second == "B"
    ));
}

#[test]
fn test_rejects_contained_overlap() {
    let err = Registry::from_entries(vec![
        entry("sh", 0x130, 0x13E, Expansion::Digits, &["time"]),
        entry("P", 0x135, 0x135, Expansion::None, &["time"]),
    ])
    .unwrap_err();
    assert!(matches!(err, SchemaError::OverlappingRanges { .. }));
}

#[test]
fn test_rejects_expansion_on_single_id() {
    let err = Registry::from_entries(vec![entry(
        "P",
        0x110,
        0x110,
        Expansion::Letters,
        &["time"],
    )])
    .unwrap_err();
    assert!(matches!(err, SchemaError::UnexpectedExpansion(name) if name == "P"));
}

#[test]
fn test_rejects_multi_id_without_expansion() {
    let err =
        Registry::from_entries(vec![entry("A", 0x111, 0x113, Expansion::None, &["time"])])
            .unwrap_err();
    assert!(matches!(err, SchemaError::MissingExpansion(name) if name == "A"));
}

#[test]
fn test_rejects_letters_range_wider_than_three() {
    let err =
        Registry::from_entries(vec![entry("A", 0x111, 0x114, Expansion::Letters, &["time"])])
            .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::RangeTooWide { width: 4, capacity: 3, .. }
    ));
}

#[test]
fn test_rejects_digits_range_wider_than_fifteen() {
    let err =
        Registry::from_entries(vec![entry("sh", 0x130, 0x13F, Expansion::Digits, &["time"])])
            .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::RangeTooWide { width: 16, capacity: 15, .. }
    ));
}

#[test]
fn test_accepts_full_width_ranges() {
    let registry = Registry::from_entries(vec![
        entry("A", 0x111, 0x113, Expansion::Letters, &["time"]),
        entry("sh", 0x130, 0x13E, Expansion::Digits, &["time"]),
    ])
    .unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_rejects_empty_dims() {
    let err = Registry::from_entries(vec![entry("P", 0x110, 0x110, Expansion::None, &[])])
        .unwrap_err();
    assert!(matches!(err, SchemaError::EmptyDims(name) if name == "P"));
}

// ============================================================================
// Partition property
// ============================================================================

#[test]
fn test_lookup_partitions_the_id_space() {
    let registry = Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap();

    // Every ID maps to the unique declared owner, or to nothing.
    for id in 0..=0xFFFFu16 {
        let expected = registry
            .entries()
            .iter()
            .find(|e| e.id_range.contains(id))
            .map(|e| e.name.as_str());
        let actual = registry.lookup(id).map(|e| e.name.as_str());
        assert_eq!(actual, expected, "disagreement at 0x{id:04X}");
    }
}

#[test]
fn test_declared_ranges_are_disjoint() {
    let registry = Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap();
    let entries = registry.entries();
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            assert!(
                a.id_range.high < b.id_range.low || b.id_range.high < a.id_range.low,
                "'{}' and '{}' overlap",
                a.name,
                b.name
            );
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolver_expands_sibling_metadata() {
    let registry = Arc::new(Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap());
    let mut resolver = Resolver::new(registry);

    let ax = resolver.resolve(0x111).unwrap();
    let az = resolver.resolve(0x113).unwrap();
    assert_eq!(ax.variable_name, "Ax");
    assert_eq!(az.variable_name, "Az");
    assert_eq!(ax.attributes.long_name, "Acceleration x");
    assert_eq!(az.attributes.long_name, "Acceleration z");
    // Siblings share everything but the name hint.
    assert_eq!(ax.attributes.units, az.attributes.units);
    assert_eq!(ax.dims, az.dims);
}

#[test]
fn test_resolver_digit_expansion_extremes() {
    let registry = Arc::new(Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap());
    let mut resolver = Resolver::new(registry);

    assert_eq!(resolver.resolve(0x130).unwrap().variable_name, "sh1");
    assert_eq!(resolver.resolve(0x13E).unwrap().variable_name, "sh15");
}

#[test]
fn test_resolution_is_stable_across_calls() {
    let registry = Arc::new(Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap());
    let mut resolver = Resolver::new(registry);

    let first = resolver.resolve(0x120).unwrap();
    let second = resolver.resolve(0x120).unwrap();
    assert_eq!(*first, *second);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_unknown_id_is_an_error_not_a_panic() {
    let registry = Arc::new(Registry::from_yaml_str(EXAMPLE_SCHEMA).unwrap());
    let mut resolver = Resolver::new(registry);

    assert_eq!(
        resolver.resolve(0xFFFF).unwrap_err(),
        ResolveError::UnknownId(0xFFFF)
    );
}
