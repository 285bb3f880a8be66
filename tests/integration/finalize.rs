//! Finalize end to end: squash, push to a bare remote, purge, roll back

use vibe_check::config::Settings;
use vibe_check::diagnosis::Category;
use vibe_check::error::Error;
use vibe_check::squash::{FinalizePreview, FinalizeState};

use super::helpers::*;

#[test]
fn test_finalize_squashes_and_pushes() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let remote = add_bare_remote(repo_root);
    let session = session(repo_root);
    let base = head(repo_root);

    checkpoint(&session, "app.txt", "v1\n", "one");
    checkpoint(&session, "app.txt", "v2\n", "two");
    checkpoint(&session, "lib.txt", "helper\n", "three");

    let outcome = session.finalize(Some("Add app and helper")).unwrap();
    assert_eq!(outcome.state, FinalizeState::CleanedUp);
    assert_eq!(outcome.squashed, 3);
    assert_eq!(outcome.base, base);

    assert_eq!(git(&["log", "-1", "--format=%s"], repo_root), "Add app and helper");
    assert_eq!(git(&["rev-parse", "--short", "HEAD~1"], repo_root), base);
    assert_eq!(std::fs::read_to_string(repo_root.join("app.txt")).unwrap(), "v2\n");
    assert!(repo_root.join("lib.txt").exists());
    assert!(backup_branches(repo_root).is_empty());

    let remote_subject = git(&["log", "-1", "--format=%s", "main"], remote.path());
    assert_eq!(remote_subject, "Add app and helper");

    let list = session.list_checkpoints().unwrap();
    assert!(!list.has_checkpoints());
    assert!(list.len() <= 1);
}

#[test]
fn test_finalize_default_message() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let _remote = add_bare_remote(repo_root);
    let session = session(repo_root);

    checkpoint(&session, "app.txt", "v1\n", "one");
    let outcome = session.finalize(None).unwrap();

    assert!(outcome.is_success());
    assert!(outcome.message.starts_with("Update: "));
    assert_eq!(git(&["log", "-1", "--format=%s"], repo_root), outcome.message);
}

#[test]
fn test_finalize_from_older_checkpoint_drops_newer_ones() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let _remote = add_bare_remote(repo_root);
    let session = session(repo_root);
    let base = head(repo_root);

    let c1 = checkpoint(&session, "app.txt", "v1\n", "one");
    checkpoint(&session, "app.txt", "v2\n", "two");
    checkpoint(&session, "app.txt", "v3\n", "three");
    git(&["checkout", "-b", "feature", &c1], repo_root);
    git(&["push", "-u", "origin", "feature"], repo_root);

    let preview = session.preview().unwrap();
    let plan = preview.plan().expect("preview should be ready");
    assert_eq!(plan.abandoned(), 2);

    let outcome = session.finalize(None).unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.branch, "feature");
    assert_eq!(outcome.squashed, 1);
    assert_eq!(outcome.abandoned, 2);
    assert_eq!(git(&["rev-parse", "--short", "HEAD~1"], repo_root), base);
    assert_eq!(std::fs::read_to_string(repo_root.join("app.txt")).unwrap(), "v1\n");
}

#[test]
fn test_finalize_from_detached_head_uses_main() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let _remote = add_bare_remote(repo_root);
    let session = session(repo_root);

    let c1 = checkpoint(&session, "app.txt", "v1\n", "one");
    checkpoint(&session, "app.txt", "v2\n", "two");
    session.switch_to_checkpoint(&c1).unwrap();
    assert_eq!(git(&["rev-parse", "--abbrev-ref", "HEAD"], repo_root), "HEAD");

    let outcome = session.finalize(None).unwrap();
    assert_eq!(outcome.branch, "main");
    assert_eq!(outcome.squashed, 2);
    assert_eq!(git(&["rev-parse", "--abbrev-ref", "HEAD"], repo_root), "main");
}

#[test]
fn test_push_failure_keeps_commit() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);
    let base = head(repo_root);

    checkpoint(&session, "app.txt", "v1\n", "one");
    checkpoint(&session, "app.txt", "v2\n", "two");

    // No remote is configured, so the push is refused.
    let outcome = session.finalize(Some("Squashed")).unwrap();
    assert_eq!(outcome.state, FinalizeState::PartialFailure);
    assert_eq!(
        outcome.diagnosis.map(|d| d.category),
        Some(Category::RemoteNotFound)
    );
    assert_eq!(
        outcome.recovery_command.as_deref(),
        Some("git push --force-with-lease origin main")
    );

    assert_eq!(git(&["log", "-1", "--format=%s"], repo_root), "Squashed");
    assert_eq!(git(&["rev-parse", "--short", "HEAD~1"], repo_root), base);
    assert!(backup_branches(repo_root).is_empty());

    // Not purged: the squashed checkpoints are still discoverable.
    assert!(session.list_checkpoints().unwrap().has_checkpoints());

    assert!(matches!(
        outcome.into_result().unwrap_err(),
        Error::PushFailed { .. }
    ));
}

#[cfg(unix)]
#[test]
fn test_commit_failure_rolls_back() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let _remote = add_bare_remote(repo_root);
    let session = session(repo_root);

    checkpoint(&session, "app.txt", "v1\n", "one");
    let c2 = checkpoint(&session, "app.txt", "v2\n", "two");
    install_failing_pre_commit_hook(repo_root);

    let err = session.finalize(None).unwrap_err();
    match err {
        Error::CommitFailed { diagnosis, .. } => {
            assert_eq!(diagnosis.category, Category::HookFailed)
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(head(repo_root), c2);
    assert_eq!(git(&["status", "--porcelain"], repo_root), "");
    assert!(backup_branches(repo_root).is_empty());
    assert!(session.list_checkpoints().unwrap().has_checkpoints());
}

#[cfg(unix)]
#[test]
fn test_commit_failure_keeps_uncommitted_edits() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let _remote = add_bare_remote(repo_root);
    let session = session(repo_root);

    checkpoint(&session, "app.txt", "v1\n", "one");
    let c2 = checkpoint(&session, "app.txt", "v2\n", "two");
    write_file(repo_root, "README.md", "# unsaved edit\n");
    install_failing_pre_commit_hook(repo_root);

    let err = session.finalize(None).unwrap_err();
    assert!(matches!(err, Error::CommitFailed { .. }));

    assert_eq!(head(repo_root), c2);
    assert_eq!(
        std::fs::read_to_string(repo_root.join("README.md")).unwrap(),
        "# unsaved edit\n"
    );
    assert_eq!(std::fs::read_to_string(repo_root.join("app.txt")).unwrap(), "v2\n");
    assert_eq!(git(&["status", "--porcelain"], repo_root), "M README.md");
    assert!(backup_branches(repo_root).is_empty());
}

#[cfg(unix)]
#[test]
fn test_commit_timeout_is_killed_and_rolled_back() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let _remote = add_bare_remote(repo_root);
    let settings = Settings {
        command_timeout_secs: 1,
        ..Settings::default()
    };
    let session = session_with(repo_root, settings);

    checkpoint(&session, "app.txt", "v1\n", "one");
    let c2 = checkpoint(&session, "app.txt", "v2\n", "two");
    install_slow_pre_commit_hook(repo_root, 10);

    let err = session.finalize(None).unwrap_err();

    match err {
        Error::CommitFailed { diagnosis, message } => {
            assert_eq!(diagnosis.category, Category::NetworkOrTimeout);
            assert!(message.contains("(timeout)"), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(head(repo_root), c2);
    assert!(backup_branches(repo_root).is_empty());
}

#[test]
fn test_finalize_on_manual_commit_is_refused() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let session = session(repo_root);
    checkpoint(&session, "app.txt", "v1\n", "one");
    write_file(repo_root, "manual.txt", "by hand\n");
    git(&["add", "."], repo_root);
    git(&["commit", "-m", "Manual work"], repo_root);
    let before = head(repo_root);

    assert!(matches!(
        session.preview().unwrap(),
        FinalizePreview::NotAtCheckpoint { .. }
    ));
    let err = session.finalize(None).unwrap_err();
    assert!(matches!(err, Error::NotAtCheckpoint(_)));
    assert_eq!(head(repo_root), before);
    assert!(backup_branches(repo_root).is_empty());
}

#[test]
fn test_checkpoints_that_cancel_out_have_nothing_to_commit() {
    let temp_dir = init_test_repo();
    let repo_root = temp_dir.path();
    let _remote = add_bare_remote(repo_root);
    let session = session(repo_root);
    let base = head(repo_root);

    checkpoint(&session, "README.md", "# Temporary\n", "edit");
    checkpoint(&session, "README.md", "# Test Repository\n", "revert");

    let outcome = session.finalize(None).unwrap();
    assert_eq!(outcome.state, FinalizeState::NothingToCommit);
    assert_eq!(head(repo_root), base);
    assert!(backup_branches(repo_root).is_empty());
}
