//! Integration test for loading effect configuration from disk.

use glimmer_fx::{EffectsConfig, GlimmerError};

fn temp_config_path(name: &str) -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("glimmer_{name}_{id}.toml"))
}

#[test]
fn test_load_from_file() {
    let path = temp_config_path("ok");
    std::fs::write(&path, "seed = 3\n[rain]\nmax_drops = 40\n").unwrap();

    let config = EffectsConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.rain.max_drops, 40);
    assert_eq!(config.trail.max_markers, 15);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_reports_path() {
    let path = temp_config_path("missing");
    match EffectsConfig::from_toml_file(&path) {
        Err(GlimmerError::ConfigRead { path: reported, .. }) => {
            assert!(reported.ends_with(".toml"));
        }
        other => panic!("expected ConfigRead, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_value_rejected() {
    let path = temp_config_path("bad");
    std::fs::write(&path, "[rain]\nbatch_min = 10\nbatch_max = 2\n").unwrap();

    let err = EffectsConfig::from_toml_file(&path).unwrap_err();
    assert!(matches!(err, GlimmerError::InvalidConfig { field: "rain.batch_max", .. }));

    std::fs::remove_file(&path).ok();
}
