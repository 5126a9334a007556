use simvfs::config::{CodecConfig, StorageBackend, StorageConfig, VfsConfig};
use simvfs::notify::NullNotifier;
use simvfs::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

fn sled_config(temp_dir: &TempDir) -> VfsConfig {
    VfsConfig {
        storage: StorageConfig {
            backend: StorageBackend::Sled,
            path: Some(temp_dir.path().join("store")),
        },
        codec: CodecConfig {
            seed: Some("cli-contracts".to_string()),
            ..CodecConfig::default()
        },
        ..VfsConfig::default()
    }
}

#[test]
fn status_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliContext::new(&sled_config(&temp_dir), NullNotifier).unwrap();
    let output = cli
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["store"]["backend"], "sled");
    assert!(parsed["store"]["path"].as_str().is_some());
    assert!(parsed["origin"].as_str().is_some());
    assert!(parsed["seed_fingerprint"].as_str().is_some());
    assert!(parsed["stats"]["folders"].as_u64().is_some());
    assert!(parsed["stats"]["files"].as_u64().is_some());
}

#[test]
fn validate_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliContext::new(&sled_config(&temp_dir), NullNotifier).unwrap();
    let output = cli
        .execute(&Commands::Validate {
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(parsed["node_count"].as_u64().unwrap() > 1);
    assert!(parsed["errors"].as_array().unwrap().is_empty());
    assert!(parsed["warnings"].as_array().is_some());
}

#[test]
fn stat_json_contract_for_file() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliContext::new(&sled_config(&temp_dir), NullNotifier).unwrap();
    cli.execute(&Commands::Write {
        path: "/home/user/documents/a.txt".to_string(),
        content: "hello".to_string(),
    })
    .unwrap();

    let output = cli
        .execute(&Commands::Stat {
            path: "/home/user/documents/a.txt".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["type"], "file");
    assert_eq!(parsed["path"], "/home/user/documents/a.txt");
    assert_eq!(parsed["size"], 5);
    assert!(parsed["id"].as_str().is_some());
    assert!(parsed["parent_id"].as_str().is_some());
}

#[test]
fn writes_persist_between_cli_invocations() {
    let temp_dir = TempDir::new().unwrap();
    {
        let cli = CliContext::new(&sled_config(&temp_dir), NullNotifier).unwrap();
        cli.execute(&Commands::Mkdir {
            path: "/tmp/session".to_string(),
        })
        .unwrap();
        cli.execute(&Commands::Write {
            path: "/tmp/session/log.txt".to_string(),
            content: "one".to_string(),
        })
        .unwrap();
    }

    let cli = CliContext::new(&sled_config(&temp_dir), NullNotifier).unwrap();
    let output = cli
        .execute(&Commands::Cat {
            path: "/tmp/session/log.txt".to_string(),
        })
        .unwrap();
    assert_eq!(output, "one");
}
