//! Shared helpers: throwaway repositories and a bare remote to push to

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use vibe_check::config::Settings;
use vibe_check::git::GitStore;
use vibe_check::session::Session;

/// Run git in `dir` and return trimmed stdout, panicking on failure
pub fn git(args: &[&str], dir: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run git {args:?}: {e}"));
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Temporary repository on `main` with one commit
pub fn init_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let repo_root = temp_dir.path();

    git(&["init"], repo_root);
    git(&["config", "user.email", "test@test.com"], repo_root);
    git(&["config", "user.name", "Test User"], repo_root);
    git(&["config", "commit.gpgsign", "false"], repo_root);

    fs::write(repo_root.join("README.md"), "# Test Repository\n")
        .expect("Failed to write README.md");
    git(&["add", "."], repo_root);
    git(&["commit", "-m", "Initial commit"], repo_root);
    git(&["branch", "-M", "main"], repo_root);

    temp_dir
}

/// Bare repository registered as `origin` with `main` already pushed
pub fn add_bare_remote(repo_root: &Path) -> TempDir {
    let remote = TempDir::new().expect("Failed to create remote directory");
    git(&["init", "--bare"], remote.path());

    let url = remote.path().to_string_lossy().to_string();
    git(&["remote", "add", "origin", &url], repo_root);
    git(&["push", "-u", "origin", "main"], repo_root);
    remote
}

pub fn write_file(repo_root: &Path, name: &str, content: &str) {
    fs::write(repo_root.join(name), content)
        .unwrap_or_else(|e| panic!("Failed to write {name}: {e}"));
}

/// Session over `repo_root` with default settings, ignoring config files and env
pub fn session(repo_root: &Path) -> Session<GitStore> {
    session_with(repo_root, Settings::default())
}

pub fn session_with(repo_root: &Path, settings: Settings) -> Session<GitStore> {
    Session::new(GitStore::new(repo_root, &settings), settings)
}

/// Write a file and create a checkpoint for it, returning the checkpoint id
pub fn checkpoint(session: &Session<GitStore>, file: &str, content: &str, note: &str) -> String {
    write_file(session.store().repo_root(), file, content);
    session
        .create_checkpoint(Some(note))
        .expect("Failed to create checkpoint")
        .id
}

pub fn head(repo_root: &Path) -> String {
    git(&["rev-parse", "--short", "HEAD"], repo_root)
}

pub fn backup_branches(repo_root: &Path) -> Vec<String> {
    git(&["branch", "--list", "vibe-check-backup*", "--format=%(refname:short)"], repo_root)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Install a pre-commit hook that always refuses
#[cfg(unix)]
pub fn install_failing_pre_commit_hook(repo_root: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let hook = repo_root.join(".git").join("hooks").join("pre-commit");
    fs::create_dir_all(hook.parent().expect("hook has a parent")).expect("Failed to create hooks dir");
    fs::write(&hook, "#!/bin/sh\necho 'pre-commit hook rejected the commit' >&2\nexit 1\n")
        .expect("Failed to write hook");
    fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).expect("Failed to chmod hook");
}

/// Install a pre-commit hook that sleeps for `secs` and then succeeds
#[cfg(unix)]
pub fn install_slow_pre_commit_hook(repo_root: &Path, secs: u64) {
    use std::os::unix::fs::PermissionsExt;

    let hook = repo_root.join(".git").join("hooks").join("pre-commit");
    fs::create_dir_all(hook.parent().expect("hook has a parent")).expect("Failed to create hooks dir");
    fs::write(&hook, format!("#!/bin/sh\nsleep {secs}\n")).expect("Failed to write hook");
    fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).expect("Failed to chmod hook");
}
