use pretty_assertions::assert_eq;
use sc_cli::{load_config, read_audit_log, run_scenario, write_audit_log};
use sc_core::{ClubManager, Role};
use std::io::Write;

#[tokio::test]
async fn test_exported_log_verifies() {
    let manager = ClubManager::in_memory();
    assert!(run_scenario(&manager).await.passed());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.json");
    write_audit_log(manager.audit(), &path).unwrap();

    let reloaded = read_audit_log(&path).unwrap();
    assert_eq!(reloaded.len(), manager.audit().len());
    assert!(reloaded.verify_integrity().is_ok());
}

#[tokio::test]
async fn test_edited_log_fails_verification() {
    let manager = ClubManager::in_memory();
    let report = run_scenario(&manager).await;
    assert!(report.passed());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.json");
    write_audit_log(manager.audit(), &path).unwrap();

    // swap alice for bob in every record of the file
    let raw = std::fs::read_to_string(&path).unwrap();
    let alice = report.alice.to_string();
    let bob = report.bob.to_string();
    let edited = raw
        .replace(&alice, "SWAP")
        .replace(&bob, &alice)
        .replace("SWAP", &bob);
    std::fs::write(&path, edited).unwrap();

    let reloaded = read_audit_log(&path).unwrap();
    assert!(reloaded.verify_integrity().is_err());
}

#[test]
fn test_malformed_log_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{ not json").unwrap();
    assert!(read_audit_log(file.path()).is_err());
}

#[test]
fn test_config_file_is_applied() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "outgoing_president_role = \"member\"").unwrap();

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.outgoing_president_role, Role::Member);
    assert_eq!(load_config(None).unwrap(), sc_core::ManagerConfig::default());
}

#[test]
fn test_invalid_config_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "outgoing_president_role = \"president\"").unwrap();

    let err = load_config(Some(file.path())).unwrap_err();
    assert!(format!("{err:#}").contains("cannot be president"));
}
