//! End-to-end profile switching against a temporary store
//!
//! Covers the full cycle: bootstrap from an existing active config, switching
//! between profiles, absorbing hand edits with snapshots, and the guarantees
//! that failed switches leave the store untouched.

use std::fs;

use gateway_profiles::{
    initialize, status, switch_profile, sync, ConfigStore, GatewayProbe, ProfileError,
    SyncOutcome,
};
use profile_merge::{comparison_projection, is_base_only};
use serde_json::{json, Value};
use tempfile::TempDir;

struct StoppedGateway;

impl GatewayProbe for StoppedGateway {
    fn is_running(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "stopped".to_string()
    }
}

fn user_config() -> Value {
    json!({
        "agents": {
            "defaults": {
                "model": {"primary": "anthropic/claude-opus-4-5"},
                "models": {"anthropic/claude-opus-4-5": {"alias": "opus"}},
                "workspace": "/home/agent/work"
            }
        },
        "channels": {"telegram": {"enabled": true}},
        "skills": {"entries": {}},
        "meta": {"lastTouchedAt": "2026-01-01T00:00:00Z"}
    })
}

/// A root holding only a hand-written active config, then `--init`
fn initialized_store() -> (TempDir, ConfigStore) {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::open(temp.path());
    store.commit_active(&user_config()).unwrap();
    initialize(&store).unwrap();
    (temp, store)
}

fn active(store: &ConfigStore) -> Value {
    store.load_active().unwrap().expect("active config present")
}

fn edit_active(store: &ConfigStore, edit: impl FnOnce(&mut Value)) {
    let mut doc = active(store);
    edit(&mut doc);
    fs::write(
        store.layout().active_config(),
        serde_json::to_string_pretty(&doc).unwrap(),
    )
    .unwrap();
}

// =============================================================================
// Scenario 1: init derives the base, first switch applies a profile
// =============================================================================

#[test]
fn test_first_switch_after_init() {
    let (_temp, store) = initialized_store();
    let base = store.load_base().unwrap().unwrap();
    assert!(base["agents"]["defaults"]["model"]["primary"].is_null());
    assert!(base.get("models").is_none());

    let report = switch_profile(&store, "sonnet", &StoppedGateway).unwrap();

    assert_eq!(report.sync, SyncOutcome::Unchanged);
    assert_eq!(report.primary, "anthropic/claude-sonnet-4-5");

    let doc = active(&store);
    assert_eq!(
        doc["agents"]["defaults"]["model"]["primary"],
        "anthropic/claude-sonnet-4-5"
    );
    // per-model settings come only from the profile
    let models = doc["agents"]["defaults"]["models"].as_object().unwrap();
    assert_eq!(models.len(), 1);
    assert!(models.contains_key("anthropic/claude-sonnet-4-5"));
    // shared settings survive
    assert_eq!(doc["agents"]["defaults"]["workspace"], "/home/agent/work");
    assert_eq!(doc["channels"]["telegram"]["enabled"], true);
    assert!(store.list_backups().unwrap().is_empty());
}

// =============================================================================
// Scenario 2: provider block follows the profile
// =============================================================================

#[test]
fn test_provider_block_added_and_removed() {
    let (_temp, store) = initialized_store();

    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    assert!(active(&store).get("models").is_none());

    switch_profile(&store, "ollama", &StoppedGateway).unwrap();
    let doc = active(&store);
    assert_eq!(doc["models"]["mode"], "merge");
    assert!(doc["models"]["providers"]["ollama"]["baseUrl"].is_string());

    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    assert!(active(&store).get("models").is_none());
    assert!(store.load_base().unwrap().unwrap().get("models").is_none());
}

// =============================================================================
// Scenario 3: new skills entry absorbed on the next switch
// =============================================================================

#[test]
fn test_manual_edit_survives_switch() {
    let (_temp, store) = initialized_store();
    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    let base_before = fs::read(store.layout().base_config()).unwrap();

    edit_active(&store, |doc| {
        doc["skills"]["entries"]["weather"] = json!({"enabled": true});
    });

    let report = switch_profile(&store, "ollama", &StoppedGateway).unwrap();

    let backup = match report.sync {
        SyncOutcome::Absorbed { backup: Some(path) } => path,
        other => panic!("expected absorbed edit with backup, got {:?}", other),
    };
    assert_eq!(fs::read(&backup).unwrap(), base_before);
    assert_eq!(store.list_backups().unwrap(), vec![backup]);

    let base = store.load_base().unwrap().unwrap();
    assert!(is_base_only(&base));
    assert_eq!(base["skills"]["entries"]["weather"]["enabled"], true);

    let doc = active(&store);
    assert_eq!(doc["skills"]["entries"]["weather"]["enabled"], true);
    assert_eq!(doc["agents"]["defaults"]["model"]["primary"], "ollama/qwen3:32b");
    assert_eq!(doc["models"]["mode"], "merge");
    assert!(doc["models"]["providers"]["ollama"].is_object());
}

// =============================================================================
// Profile-owned edits are not absorbed
// =============================================================================

#[test]
fn test_profile_owned_edits_are_not_absorbed() {
    let (_temp, store) = initialized_store();
    switch_profile(&store, "ollama", &StoppedGateway).unwrap();
    let base_before = fs::read(store.layout().base_config()).unwrap();

    edit_active(&store, |doc| {
        doc["agents"]["defaults"]["model"]["primary"] = json!("openai/gpt-5");
        doc["agents"]["defaults"]["models"]["openai/gpt-5"] = json!({});
        doc["models"]["providers"]["openai"] = json!({"baseUrl": "https://example.invalid"});
        doc["meta"]["lastTouchedAt"] = json!("2030-01-01T00:00:00Z");
    });

    let outcome = sync(&store).unwrap();

    assert_eq!(outcome, SyncOutcome::Unchanged);
    assert_eq!(fs::read(store.layout().base_config()).unwrap(), base_before);
    assert!(store.list_backups().unwrap().is_empty());
}

// =============================================================================
// Scenario 4: unknown profile
// =============================================================================

#[test]
fn test_unknown_profile_changes_nothing() {
    let (_temp, store) = initialized_store();
    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    edit_active(&store, |doc| {
        doc["skills"]["entries"]["search"] = json!({"enabled": true});
    });
    let active_before = fs::read(store.layout().active_config()).unwrap();
    let base_before = fs::read(store.layout().base_config()).unwrap();

    let err = switch_profile(&store, "gpt", &StoppedGateway).unwrap_err();

    match &err {
        ProfileError::ProfileNotFound { name, available } => {
            assert_eq!(name, "gpt");
            assert_eq!(available, &vec!["ollama", "opus", "sonnet"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("ollama, opus, sonnet"));
    // the pending edit is neither absorbed nor lost
    assert_eq!(fs::read(store.layout().active_config()).unwrap(), active_before);
    assert_eq!(fs::read(store.layout().base_config()).unwrap(), base_before);
    assert_eq!(store.current_profile().unwrap().as_deref(), Some("opus"));
}

#[test]
fn test_path_like_profile_name_is_not_found() {
    let (_temp, store) = initialized_store();
    fs::write(store.layout().config_dir().join("evil.json"), r#"{"primary": "x/y"}"#).unwrap();

    let err = switch_profile(&store, "../evil", &StoppedGateway).unwrap_err();

    assert!(matches!(err, ProfileError::ProfileNotFound { .. }));
    assert!(store.current_profile().unwrap().is_none());
}

// =============================================================================
// Stability
// =============================================================================

#[test]
fn test_repeated_switch_is_stable() {
    let (_temp, store) = initialized_store();
    switch_profile(&store, "ollama", &StoppedGateway).unwrap();
    let first = active(&store);
    let base_before = fs::read(store.layout().base_config()).unwrap();

    let report = switch_profile(&store, "ollama", &StoppedGateway).unwrap();

    assert_eq!(report.sync, SyncOutcome::Unchanged);
    assert_eq!(report.previous.as_deref(), Some("ollama"));
    assert_eq!(fs::read(store.layout().base_config()).unwrap(), base_before);
    assert_eq!(comparison_projection(&active(&store)), comparison_projection(&first));
    assert_eq!(
        active(&store)["agents"]["defaults"]["model"]["primary"],
        first["agents"]["defaults"]["model"]["primary"]
    );
    assert!(store.list_backups().unwrap().is_empty());
}

#[test]
fn test_switch_cycle_leaves_no_residue() {
    let (_temp, store) = initialized_store();

    switch_profile(&store, "ollama", &StoppedGateway).unwrap();
    switch_profile(&store, "sonnet", &StoppedGateway).unwrap();
    switch_profile(&store, "opus", &StoppedGateway).unwrap();

    let doc = active(&store);
    assert!(doc.get("models").is_none());
    let models = doc["agents"]["defaults"]["models"].as_object().unwrap();
    assert_eq!(models.keys().collect::<Vec<_>>(), vec!["anthropic/claude-opus-4-5"]);
    assert!(is_base_only(&store.load_base().unwrap().unwrap()));
}

#[test]
fn test_no_temp_files_left_behind() {
    let (temp, store) = initialized_store();

    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    switch_profile(&store, "sonnet", &StoppedGateway).unwrap();

    for dir in [temp.path().to_path_buf(), store.layout().config_dir()] {
        for entry in fs::read_dir(&dir).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.ends_with(".tmp"), "leftover temp file {}", name);
        }
    }
}

#[test]
#[cfg(unix)]
fn test_switch_and_sync_keep_file_modes() {
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &std::path::Path) -> u32 {
        std::os::unix::fs::PermissionsExt::mode(&fs::metadata(path).unwrap().permissions()) & 0o777
    }

    let (_temp, store) = initialized_store();
    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    for path in [store.layout().active_config(), store.layout().base_config()] {
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
    }

    edit_active(&store, |doc| {
        doc["skills"]["entries"]["weather"] = json!({"enabled": true});
    });
    let report = switch_profile(&store, "sonnet", &StoppedGateway).unwrap();

    let backup = match report.sync {
        SyncOutcome::Absorbed { backup: Some(path) } => path,
        other => panic!("expected absorbed edit with backup, got {:?}", other),
    };
    assert_eq!(mode(&store.layout().active_config()), 0o600);
    assert_eq!(mode(&store.layout().base_config()), 0o600);
    assert_eq!(mode(&backup), 0o600);

    edit_active(&store, |doc| {
        doc["hooks"] = json!({"enabled": true});
    });
    assert!(matches!(sync(&store).unwrap(), SyncOutcome::Absorbed { .. }));

    assert_eq!(mode(&store.layout().base_config()), 0o600);
    for backup in store.list_backups().unwrap() {
        assert_eq!(mode(&backup), 0o600);
    }
}

// =============================================================================
// Failure handling
// =============================================================================

#[test]
fn test_malformed_active_config_blocks_switch() {
    let (_temp, store) = initialized_store();
    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    fs::write(store.layout().active_config(), "{ \"agents\": ").unwrap();

    let err = switch_profile(&store, "sonnet", &StoppedGateway).unwrap_err();

    assert!(matches!(err, ProfileError::Parse { .. }));
    assert_eq!(
        fs::read_to_string(store.layout().active_config()).unwrap(),
        "{ \"agents\": "
    );
    assert_eq!(store.current_profile().unwrap().as_deref(), Some("opus"));
}

#[test]
fn test_switch_without_base_or_active_requires_init() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::open(temp.path());
    initialize(&store).unwrap();

    let err = switch_profile(&store, "opus", &StoppedGateway).unwrap_err();

    assert!(matches!(err, ProfileError::BaseMissing { .. }));
    assert!(err.to_string().contains("--init"));
    assert!(store.load_active().unwrap().is_none());
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn test_status_after_switches() {
    let (_temp, store) = initialized_store();
    switch_profile(&store, "opus", &StoppedGateway).unwrap();
    edit_active(&store, |doc| {
        doc["hooks"] = json!({"enabled": true});
    });
    switch_profile(&store, "sonnet", &StoppedGateway).unwrap();

    let report = status(&store).unwrap();

    assert_eq!(report.current_profile.as_deref(), Some("sonnet"));
    assert_eq!(report.active_primary.as_deref(), Some("anthropic/claude-sonnet-4-5"));
    assert!(report.initialized);
    assert_eq!(report.backups, 1);
    assert!(!report.diverged());
    let current: Vec<_> = report.profiles.iter().filter(|p| p.current).collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, "sonnet");
}
