use equiv_core::config::*;
use equiv_core::errors::{ConfigError, EquivError};

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = EquivConfig::from_toml("").unwrap();

    // Update defaults
    assert_eq!(config.update.minimum_score, 0.25);
    assert_eq!(config.update.n_times_greater, 1.5);
    assert_eq!(config.update.broadcast_flexibility_mins, 5);
    assert_eq!(config.update.container_child_scale, 20.0);
    assert_eq!(config.update.extraction_scope, ExtractionScope::PerPublisher);

    // Graph defaults
    assert_eq!(config.graph.max_transitive_set_size, 150);
    assert_eq!(config.graph.recompute_after_writes, 20);

    // Task defaults
    assert_eq!(config.worker.recently_processed_ttl_secs, 30);
    assert_eq!(config.scan.save_every, 10);
    assert_eq!(config.backfill.save_every, 100);
    assert!(config.schedule.channels.is_empty());
    assert_eq!((config.schedule.back_days, config.schedule.forward_days), (1, 7));

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json);

    assert!(config.publishers.is_empty());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[update]
minimum_score = 0.5
extraction_scope = "whole_pool"

[graph]
max_transitive_set_size = 40
"#;
    let config = EquivConfig::from_toml(toml).unwrap();
    assert_eq!(config.update.minimum_score, 0.5);
    assert_eq!(config.update.extraction_scope, ExtractionScope::WholePool);
    // Non-overridden fields keep defaults
    assert_eq!(config.update.n_times_greater, 1.5);
    assert_eq!(config.graph.max_transitive_set_size, 40);
    assert_eq!(config.graph.recompute_after_secs, 3_600);
}

#[test]
fn publisher_table_loads_with_profile_defaults() {
    let toml = r#"
[[publishers]]
publisher = "pressassociation.com"
targets = ["bbc.co.uk", "itv.com"]

[[publishers]]
publisher = "amazon.com"
targets = ["pressassociation.com"]
item = "alias"
top_level_container = "disabled"
alias_namespaces = [["gb:amazon:asin", "uk:amazon:asin"]]
hierarchy = "relaxed"
"#;
    let config = EquivConfig::from_toml(toml).unwrap();
    assert_eq!(config.publishers.len(), 2);
    let pa = &config.publishers[0];
    assert_eq!(pa.item, ItemProfile::Standard);
    assert_eq!(pa.top_level_container, ContainerProfile::Standard);
    assert_eq!(pa.non_top_level_container, ContainerProfile::Disabled);
    assert_eq!(pa.hierarchy, HierarchyMode::Strict);
    let amazon = &config.publishers[1];
    assert_eq!(amazon.item, ItemProfile::Alias);
    assert_eq!(amazon.hierarchy, HierarchyMode::Relaxed);
}

#[test]
fn overlapping_alias_namespaces_are_rejected() {
    let toml = r#"
[[publishers]]
publisher = "amazon.com"
targets = ["pressassociation.com"]
alias_namespaces = [["a", "b"], ["b", "c"]]
"#;
    let err = EquivConfig::from_toml(toml).unwrap_err();
    assert!(matches!(
        err,
        EquivError::ConfigError(ConfigError::OverlappingNamespaces { ref namespace }) if namespace == "b"
    ));
}

#[test]
fn invalid_values_are_rejected() {
    assert!(EquivConfig::from_toml("[update]\nn_times_greater = 0.5").is_err());
    assert!(EquivConfig::from_toml("[graph]\nmax_transitive_set_size = 0").is_err());
    assert!(EquivConfig::from_toml("[[publishers]]\npublisher = \"p\"\ntargets = []").is_err());
    assert!(EquivConfig::from_toml("[update]\nbroadcast_title_subset_percent = 120").is_err());
    assert!(EquivConfig::from_toml("[update]\ndescription_title_divisor = 0.0").is_err());
}

#[test]
fn film_broadcast_and_vod_profiles_load_with_a_schedule() {
    let toml = r#"
[schedule]
channels = ["cbbc", "bbcone"]
forward_days = 3

[[publishers]]
publisher = "rovicorp.com"
targets = ["pressassociation.com"]
item = "film"

[[publishers]]
publisher = "bt.com"
targets = ["pressassociation.com"]
item = "broadcast"
top_level_container = "vod"
null_score_channels = ["skysports1"]
"#;
    let config = EquivConfig::from_toml(toml).unwrap();
    assert_eq!(config.schedule.channels, vec!["cbbc", "bbcone"]);
    assert_eq!(config.schedule.back_days, 1);
    assert_eq!(config.schedule.forward_days, 3);
    assert_eq!(config.publishers[0].item, ItemProfile::Film);
    assert!(config.publishers[0].null_score_channels.is_empty());
    let bt = &config.publishers[1];
    assert_eq!(bt.item, ItemProfile::Broadcast);
    assert_eq!(bt.top_level_container, ContainerProfile::Vod);
    assert_eq!(bt.null_score_channels, vec!["skysports1"]);
}

#[test]
fn malformed_toml_surfaces_toml_error() {
    let err = EquivConfig::from_toml("[update\nminimum_score = ").unwrap_err();
    assert!(matches!(err, EquivError::TomlError(_)));
}
