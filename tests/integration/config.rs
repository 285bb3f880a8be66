//! Settings resolution through `Session::open`

use serial_test::serial;

use vibe_check::config::{ENV_REMOTE, REPO_CONFIG_FILE};
use vibe_check::error::Error;
use vibe_check::session::Session;

use super::helpers::*;

#[test]
#[serial]
fn test_open_reads_repository_settings() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    write_file(
        repo_root,
        REPO_CONFIG_FILE,
        "checkpoint_tag = \"WIP:\"\nremote = \"upstream\"\n",
    );
    let nested = repo_root.join("src");
    std::fs::create_dir_all(&nested).unwrap();

    let session = Session::open(&nested).unwrap();
    assert_eq!(session.settings().checkpoint_tag, "WIP:");
    assert_eq!(session.settings().remote, "upstream");

    write_file(repo_root, "app.txt", "v1\n");
    let checkpoint = session.create_checkpoint(None).unwrap();
    assert!(checkpoint.summary.starts_with("WIP: "));
}

#[test]
#[serial]
fn test_env_overrides_repository_settings() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    write_file(repo_root, REPO_CONFIG_FILE, "remote = \"upstream\"\n");

    std::env::set_var(ENV_REMOTE, "mirror");
    let session = Session::open(repo_root);
    std::env::remove_var(ENV_REMOTE);

    assert_eq!(session.unwrap().settings().remote, "mirror");
}

#[test]
#[serial]
fn test_invalid_repository_settings_are_reported() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    write_file(repo_root, REPO_CONFIG_FILE, "command_timeout_secs = 0\n");

    let err = Session::open(repo_root).err().expect("open should fail");
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_open_outside_repository() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let err = Session::open(temp_dir.path()).err().expect("open should fail");
    assert!(matches!(err, Error::NotARepository));
}
