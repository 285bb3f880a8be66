//! Creating checkpoints and switching between them

use vibe_check::error::Error;

use super::helpers::*;

#[test]
fn test_create_checkpoint_commits_all_changes() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);

    write_file(repo_root, "app.txt", "v1\n");
    write_file(repo_root, "README.md", "# Changed\n");
    let checkpoint = session.create_checkpoint(Some("first pass")).unwrap();

    assert_eq!(checkpoint.id, head(repo_root));
    assert!(checkpoint.summary.starts_with("CHECKPOINT: "));
    assert!(checkpoint.summary.ends_with(" - first pass"));
    assert_eq!(git(&["log", "-1", "--format=%s"], repo_root), checkpoint.summary);
    assert_eq!(git(&["status", "--porcelain"], repo_root), "");
    assert!(!session.has_pending_changes());
}

#[test]
fn test_create_on_clean_tree_is_refused() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);
    let before = head(repo_root);

    let err = session.create_checkpoint(Some("")).unwrap_err();
    assert!(matches!(err, Error::NothingToCheckpoint));
    assert_eq!(head(repo_root), before);
}

#[test]
fn test_untracked_file_counts_as_pending() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);

    assert!(!session.has_pending_changes());
    write_file(repo_root, "new.txt", "untracked\n");
    assert!(session.has_pending_changes());
}

#[test]
fn test_switch_between_checkpoints() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);

    let c1 = checkpoint(&session, "app.txt", "v1\n", "one");
    let c2 = checkpoint(&session, "app.txt", "v2\n", "two");

    session.switch_to_checkpoint(&c1).unwrap();
    assert_eq!(head(repo_root), c1);
    assert_eq!(std::fs::read_to_string(repo_root.join("app.txt")).unwrap(), "v1\n");

    session.switch_to_checkpoint(&c2).unwrap();
    assert_eq!(std::fs::read_to_string(repo_root.join("app.txt")).unwrap(), "v2\n");
}

#[test]
fn test_switch_to_current_is_already_at_target() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);
    let c1 = checkpoint(&session, "app.txt", "v1\n", "one");
    let reflog_before = git(&["reflog", "--format=%h"], repo_root);

    let err = session.switch_to_checkpoint(&c1).unwrap_err();
    assert!(matches!(err, Error::AlreadyAtTarget(_)));
    assert_eq!(git(&["reflog", "--format=%h"], repo_root), reflog_before);
}

#[test]
fn test_switch_with_conflicting_local_changes_fails() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);
    let c1 = checkpoint(&session, "app.txt", "v1\n", "one");
    checkpoint(&session, "app.txt", "v2\n", "two");
    write_file(repo_root, "app.txt", "local edit\n");

    let err = session.switch_to_checkpoint(&c1).unwrap_err();
    match err {
        Error::CheckoutFailed { id, message } => {
            assert_eq!(id, c1);
            assert!(message.contains("overwritten"), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_switch_to_unknown_id_fails() {
    let temp_dir = init_test_repo();
    let session = session(temp_dir.path());
    let err = session.switch_to_checkpoint("deadbeef").unwrap_err();
    assert!(matches!(err, Error::CheckoutFailed { .. }));
}
