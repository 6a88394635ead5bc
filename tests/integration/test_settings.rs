//! Settings files driving the gate.

use crate::common::{TestVectors, engine_with_policy};
use thinklink::io::ExitCode;
use thinklink::{GateError, Settings, WordVectors};

#[test]
fn init_template_loads_back_as_defaults() {
    let vectors = TestVectors::new();
    let path = Settings::init_config_file(vectors.dir.path(), false).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    let defaults = Settings::default();
    assert_eq!(settings.vectors.path, defaults.vectors.path);
    assert_eq!(settings.server.bind, defaults.server.bind);
    assert_eq!(settings.gate.policy().unwrap(), defaults.gate.policy().unwrap());

    // A second init without force refuses to overwrite
    assert!(Settings::init_config_file(vectors.dir.path(), false).is_err());
    assert!(Settings::init_config_file(vectors.dir.path(), true).is_ok());
}

#[test]
fn settings_select_vectors_and_curve() {
    let vectors = TestVectors::new();
    let glove = vectors.glove();
    let config = vectors.add_file(
        "settings.toml",
        &format!(
            "[vectors]\npath = '{}'\n\n[gate]\nmin_threshold = 0.55\nmax_threshold = 0.7\n",
            glove.display()
        ),
    );

    let settings = Settings::load_from(&config).unwrap();
    let store = WordVectors::open(&settings.vectors.path, settings.vectors.max_words).unwrap();
    assert_eq!(store.words().count(), 7);

    // 0.6 clears 0.55 but not the raised ceiling
    let engine = engine_with_policy(settings.gate.policy().unwrap());
    assert!(engine.decide("ocean", "sea", 0.0).accepted);
    assert!(!engine.decide("ocean", "sea", 1000.0).accepted);
}

#[test]
fn inverted_thresholds_are_a_config_error() {
    let vectors = TestVectors::new();
    let config = vectors.add_file(
        "settings.toml",
        "[gate]\nmin_threshold = 0.6\nmax_threshold = 0.4\n",
    );

    let settings = Settings::load_from(&config).unwrap();
    let err = settings.gate.policy().unwrap_err();
    assert!(matches!(err, GateError::InvalidPolicy { .. }));
    assert_eq!(ExitCode::from_gate_error(&err), ExitCode::ConfigError);
}

#[test]
fn unknown_log_level_falls_back_to_info() {
    let vectors = TestVectors::new();
    let config = vectors.add_file("settings.toml", "[logging]\nlevel = \"chatty\"\n");

    let settings = Settings::load_from(&config).unwrap();
    assert_eq!(settings.logging.max_level(), tracing::Level::INFO);
}
