use std::fs;
use std::path::Path;

use nimbuscc::{load_config, section};
use serde::Deserialize;
use tempfile::TempDir;

#[test]
fn test_missing_config_returns_empty() {
    let config = load_config(Path::new("/nonexistent/nimbus/config.yml"));
    assert!(config.is_empty());
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(
        &path,
        "locale: en_US\nterminal:\n  program: kitty\n  hold: true\npanels:\n  - power\n  - display\n",
    )
    .unwrap();

    let config = load_config(&path);
    assert_eq!(config.len(), 3);
    assert_eq!(config["locale"].as_str(), Some("en_US"));

    #[derive(Debug, Deserialize, PartialEq)]
    struct Terminal {
        program: String,
        hold: bool,
    }

    let terminal: Option<Terminal> = section(&config, "terminal");
    assert_eq!(
        terminal,
        Some(Terminal {
            program: "kitty".to_string(),
            hold: true,
        })
    );

    let panels: Option<Vec<String>> = section(&config, "panels");
    assert_eq!(panels, Some(vec!["power".to_string(), "display".to_string()]));
}

#[test]
fn test_non_mapping_config_returns_empty() {
    let dir = TempDir::new().unwrap();

    let scalar = dir.path().join("scalar.yml");
    fs::write(&scalar, "just a string\n").unwrap();
    assert!(load_config(&scalar).is_empty());

    let list = dir.path().join("list.yml");
    fs::write(&list, "- a\n- b\n").unwrap();
    assert!(load_config(&list).is_empty());
}

#[test]
fn test_malformed_config_returns_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yml");
    fs::write(&path, "key: [unclosed\n  other: {\n").unwrap();
    assert!(load_config(&path).is_empty());
}
