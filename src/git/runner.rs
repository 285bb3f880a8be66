//! Git command runner
//!
//! Every git invocation goes through `run_git`, which captures both streams
//! and enforces a bounded wait. A hung git process (credential prompt, stuck
//! network, blocking hook) is killed and reported as a timeout instead of
//! blocking the caller forever.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::error::StoreError;

/// Time allowed for reader threads to hand over output after the process exits
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured result of one git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub timed_out: bool,
}

impl GitOutput {
    /// Trimmed stderr, falling back to stdout when stderr is empty
    pub fn message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Run a git command and return its captured output.
///
/// A non-zero exit is not an error here; inspect `GitOutput::success`.
/// Spawn failures are errors. On timeout the child is killed and the
/// returned output has `timed_out` set and a stderr line mentioning the timeout.
pub fn run_git(args: &[&str], repo_root: &Path, timeout: Duration) -> Result<GitOutput, StoreError> {
    let command = args.join(" ");
    debug!(%command, "running git");

    let mut child = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .env("LC_ALL", "C")
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| StoreError::Spawn {
            command: command.clone(),
            source,
        })?;

    // Drain both pipes while waiting; a full pipe buffer would otherwise
    // stall the child and turn every large reflog into a timeout.
    let stdout_rx = drain(child.stdout.take());
    let stderr_rx = drain(child.stderr.take());

    let status = child
        .wait_timeout(timeout)
        .map_err(|source| StoreError::Spawn {
            command: command.clone(),
            source,
        })?;

    let timed_out = status.is_none();
    if timed_out {
        warn!(%command, secs = timeout.as_secs(), "git command timed out, killing");
        kill_child(&mut child);
    }

    let stdout = collect(stdout_rx);
    let mut stderr = collect(stderr_rx);
    if timed_out {
        stderr.push_str(&format!(
            "\ngit {command} timed out after {}s (timeout)",
            timeout.as_secs()
        ));
    }

    Ok(GitOutput {
        stdout,
        stderr,
        success: status.map(|s| s.success()).unwrap_or(false),
        timed_out,
    })
}

/// Run a git command, check for success, and return stdout trimmed.
pub fn run_git_checked(
    args: &[&str],
    repo_root: &Path,
    timeout: Duration,
) -> Result<String, StoreError> {
    let output = run_git(args, repo_root, timeout)?;
    let command = args.first().copied().unwrap_or_default().to_string();
    if output.timed_out {
        return Err(StoreError::Timeout {
            command,
            secs: timeout.as_secs(),
        });
    }
    if !output.success {
        return Err(StoreError::Failed {
            command,
            stderr: output.message(),
        });
    }
    Ok(output.stdout.trim().to_string())
}

/// Run a git command and return true if it exited with status 0.
///
/// Spawn failures and timeouts count as false.
pub fn run_git_bool(args: &[&str], repo_root: &Path, timeout: Duration) -> bool {
    run_git(args, repo_root, timeout)
        .map(|output| output.success)
        .unwrap_or(false)
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(mut stream) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stream.read_to_end(&mut buf);
                let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn collect(rx: mpsc::Receiver<String>) -> String {
    rx.recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string())
}

fn kill_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
