//! Subprocess execution with timeout and cancellation.
//!
//! stdout and stderr are drained on helper threads so a chatty child cannot
//! block on a full pipe while we wait for it. The wait itself is done in
//! short slices so the cancellation flag and the overall deadline are both
//! observed.

use std::ffi::OsString;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::error::{Result, RunnerError};

const POLL_SLICE: Duration = Duration::from_millis(50);

/// Shared flag used to abort a running invocation from another thread.
///
/// # Examples
///
/// ```
/// use sevenzip_runner::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

type Drain = JoinHandle<(Vec<u8>, std::io::Result<usize>)>;

/// Runs `program` with `args` and captures both output streams.
///
/// Arguments are passed to the OS as a vector; nothing is interpreted by a
/// shell. A non-zero exit status is *not* an error here.
///
/// # Errors
///
/// [`Spawn`](RunnerError::Spawn) when the process cannot be started,
/// [`Timeout`](RunnerError::Timeout) or [`Cancelled`](RunnerError::Cancelled)
/// when it was killed, [`Io`](RunnerError::Io) when waiting fails.
pub fn run(
    program: &Path,
    args: &[OsString],
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<ProcessOutput> {
    if cancel.is_cancelled() {
        return Err(RunnerError::Cancelled);
    }

    debug!(program = %program.display(), args = ?args, timeout = ?timeout, "Running 7-Zip");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RunnerError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    let stdout_thread = child.stdout.take().map(drain);
    let stderr_thread = child.stderr.take().map(drain);

    let start = Instant::now();
    let status = loop {
        if cancel.is_cancelled() {
            warn!(program = %program.display(), "Operation cancelled, killing 7-Zip");
            kill_and_reap(&mut child);
            return Err(RunnerError::Cancelled);
        }

        let slice = match timeout {
            Some(limit) => {
                let elapsed = start.elapsed();
                if elapsed >= limit {
                    warn!(
                        program = %program.display(),
                        timeout_ms = limit.as_millis() as u64,
                        "7-Zip timed out, killing process"
                    );
                    kill_and_reap(&mut child);
                    return Err(RunnerError::Timeout {
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
                POLL_SLICE.min(limit - elapsed)
            }
            None => POLL_SLICE,
        };

        match child.wait_timeout(slice) {
            Ok(Some(status)) => break status,
            Ok(None) => continue,
            Err(e) => {
                debug!(program = %program.display(), error = %e, "Failed to wait on 7-Zip");
                kill_and_reap(&mut child);
                return Err(RunnerError::Io(e));
            }
        }
    };

    let stdout = collect(stdout_thread, program, "stdout");
    let stderr = collect(stderr_thread, program, "stderr");

    debug!(
        program = %program.display(),
        code = ?status.code(),
        stdout_len = stdout.len(),
        stderr_len = stderr.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "7-Zip finished"
    );

    Ok(ProcessOutput {
        code: status.code(),
        success: status.success(),
        stdout,
        stderr,
    })
}

/// Returns `true` when `program` starts with `args` and exits within
/// `timeout`. The exit status is ignored.
pub fn probe(program: &Path, args: &[&str], timeout: Duration) -> bool {
    let spawned = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            debug!(program = %program.display(), error = %e, "Probe spawn failed");
            return false;
        }
    };

    match child.wait_timeout(timeout) {
        Ok(Some(_)) => true,
        Ok(None) => {
            debug!(
                program = %program.display(),
                timeout_ms = timeout.as_millis() as u64,
                "Probe timed out, killing process"
            );
            kill_and_reap(&mut child);
            false
        }
        Err(e) => {
            debug!(program = %program.display(), error = %e, "Failed to wait on probe");
            kill_and_reap(&mut child);
            false
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Drain {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf);
        (buf, result)
    })
}

fn collect(thread: Option<Drain>, program: &Path, stream: &'static str) -> String {
    let buf = thread
        .and_then(|t| t.join().ok())
        .map(|(buf, res)| {
            if let Err(e) = res {
                debug!(program = %program.display(), stream, error = %e, "Failed to read output");
            }
            buf
        })
        .unwrap_or_default();
    String::from_utf8_lossy(&buf).into_owned()
}

// Drain threads are left detached: a grandchild may still hold the pipes.
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
