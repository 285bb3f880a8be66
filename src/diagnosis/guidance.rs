use super::{Category, FailureKind};

/// Remediation text shown to the user for a classified failure
pub fn remediation(kind: FailureKind, category: Category) -> &'static str {
    match (kind, category) {
        (_, Category::RefName) => {
            "Git refname issue (push from a non-branch ref). Solutions:\n\
             1. Check current branch: git branch\n\
             2. Make sure you're on a proper branch, not detached HEAD\n\
             3. Try: git checkout -b main (if no branch exists)"
        }
        (_, Category::Authentication) => {
            "Authentication failed. Solutions:\n\
             1. Check if you have push access to this repository\n\
             2. Verify your Git credentials: git config --list | grep user\n\
             3. For GitHub, check if you need a personal access token"
        }
        (_, Category::RemoteNotFound) => {
            "Remote repository not found. Solutions:\n\
             1. Check remote URL: git remote -v\n\
             2. Add remote if missing: git remote add origin <your-repo-url>\n\
             3. Update remote URL: git remote set-url origin <correct-url>"
        }
        (_, Category::Rejected) => {
            "Push rejected (remote has newer commits). Solutions:\n\
             1. Someone else pushed to the repository\n\
             2. Pull latest changes: git pull\n\
             3. Then retry finalize"
        }
        (FailureKind::Push, Category::NetworkOrTimeout) => {
            "Network connection failed or timed out. Solutions:\n\
             1. Check your internet connection\n\
             2. Try again in a moment\n\
             3. Check if the git host is accessible"
        }
        (FailureKind::Commit, Category::NetworkOrTimeout) => {
            "Commit timed out. Solutions:\n\
             1. Check for a commit hook that waits on input or the network\n\
             2. Raise command_timeout_secs in .vibe-check.toml\n\
             3. Try the operation again"
        }
        (_, Category::HookFailed) => {
            "Pre-commit hook failed. Solutions:\n\
             1. Fix the issues reported by the pre-commit hook\n\
             2. Or bypass hooks temporarily: git commit --no-verify -m \"your message\"\n\
             3. Check what hooks are configured in .git/hooks/"
        }
        (_, Category::LockOrPermission) => {
            "Git index locked or permission issue. Solutions:\n\
             1. Remove lock file: rm .git/index.lock\n\
             2. Check file permissions in .git directory\n\
             3. Try the operation again"
        }
        (_, Category::PathMismatch) => {
            "File path issue. Solutions:\n\
             1. Check if all files exist\n\
             2. Verify working directory is correct\n\
             3. Run git status to see current state"
        }
        (_, Category::NothingToCommit) => {
            "No changes to commit. This means:\n\
             1. All checkpoints had identical content\n\
             2. The working directory is clean after squashing\n\
             Solution: This is normal - your checkpoints have been consolidated"
        }
        (FailureKind::Push, Category::Unknown) => {
            "Unknown push error. Solutions:\n\
             1. Check repository access and credentials\n\
             2. Verify remote repository exists\n\
             3. Check git status and git remote -v"
        }
        (FailureKind::Commit, Category::Unknown) => {
            "Unknown commit error. Solutions:\n\
             1. Check git status\n\
             2. Verify repository is in good state\n\
             3. Try manual commit: git commit -m \"Manual squash\"\n\
             4. Check .git/hooks for problematic hooks"
        }
    }
}
