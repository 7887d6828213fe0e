extern crate gltrack;
extern crate serde_json;

use gltrack::prelude::*;

#[test]
fn load_from_json() {
    let settings: Settings = serde_json::from_str(
        r#"{
            "validation": true,
            "diagnostics": false,
            "check_dependencies": false
        }"#,
    )
    .unwrap();

    assert!(settings.validation);
    assert!(!settings.diagnostics);
    assert!(!settings.check_dependencies);
}

#[test]
fn missing_fields_use_defaults() {
    let settings: Settings = serde_json::from_str(r#"{ "diagnostics": true }"#).unwrap();
    let defaults = Settings::default();

    assert!(settings.diagnostics);
    assert_eq!(settings.validation, defaults.validation);
    assert_eq!(settings.check_dependencies, defaults.check_dependencies);
}

#[test]
fn round_trip() {
    let settings = Settings::unchecked();
    let json = serde_json::to_string(&settings).unwrap();
    assert_eq!(serde_json::from_str::<Settings>(&json).unwrap(), settings);
}

#[test]
fn capabilities_serialize() {
    let caps = Capabilities::full();
    let json = serde_json::to_string(&caps).unwrap();
    let caps: Capabilities = serde_json::from_str(&json).unwrap();

    assert_eq!(caps.version, Version::GL(4, 5));
    for &v in Capability::ALL.iter() {
        assert!(caps.has(v));
    }
}
