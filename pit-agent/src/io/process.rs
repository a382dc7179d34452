//! Run short-lived child processes under a hard deadline.

use std::io::{ErrorKind, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

/// How long to wait for output pipes to close once the child is gone.
///
/// Descendants of a killed child can keep the pipes open indefinitely; their
/// readers are detached after this grace period.
const PIPE_GRACE: Duration = Duration::from_millis(250);

type Drained = Result<(Vec<u8>, usize)>;

/// What a finished (or killed) child left behind.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    /// Bytes of stdout dropped beyond the capture limit.
    pub stdout_truncated: usize,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Feed `stdin` to `cmd`, wait at most `timeout`, and capture its output.
///
/// Pipes are drained on background threads so a chatty child cannot stall on
/// a full pipe; at most `output_limit_bytes` per stream are kept. A child that
/// outlives `timeout` is killed and reported with `timed_out = true`.
///
/// The call returns within `timeout` plus a short grace period even when the
/// child leaves descendants holding its output pipes.
#[instrument(
    skip_all,
    fields(program = ?cmd.get_program(), timeout_ms = timeout.as_millis() as u64)
)]
pub fn run_with_timeout(
    mut cmd: Command,
    stdin: &[u8],
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ProcessOutput> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let started = Instant::now();
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let mut child_stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("stdin was not piped"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    // The child may exit without reading its input; stdin is closed on drop.
    let input = stdin.to_vec();
    let stdin_handle = thread::spawn(move || match child_stdin.write_all(&input) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("child closed stdin early");
        }
        Err(e) => warn!(err = %e, "failed to write child stdin"),
        Ok(()) => {}
    });
    let stdout_rx = spawn_reader(stdout, output_limit_bytes);
    let stderr_rx = spawn_reader(stderr, output_limit_bytes);

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => status,
        None => {
            warn!(timeout_ms = timeout.as_millis() as u64, "command timed out, killing");
            timed_out = true;
            child.kill().context("kill command")?;
            child.wait().context("wait command after kill")?
        }
    };

    // A writer still blocked on a full pipe is left to fail once the pipe closes.
    if stdin_handle.is_finished() && stdin_handle.join().is_err() {
        warn!("stdin writer thread panicked");
    }

    let deadline = if timed_out {
        Instant::now() + PIPE_GRACE
    } else {
        (started + timeout).max(Instant::now() + PIPE_GRACE)
    };
    let (stdout, stdout_truncated) = collect_reader(&stdout_rx, deadline, "stdout")?;
    let (stderr, _) = collect_reader(&stderr_rx, deadline, "stderr")?;

    if stdout_truncated > 0 {
        warn!(stdout_truncated, "stdout truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(ProcessOutput {
        status,
        stdout,
        stdout_truncated,
        stderr,
        timed_out,
    })
}

fn spawn_reader<R: Read + Send + 'static>(reader: R, limit: usize) -> Receiver<Drained> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone once the caller stopped waiting.
        let _ = tx.send(drain_limited(reader, limit));
    });
    rx
}

/// Wait for a reader until `deadline`; past it the reader is detached and the
/// stream counts as empty.
fn collect_reader(rx: &Receiver<Drained>, deadline: Instant, stream: &str) -> Drained {
    let wait = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(wait) {
        Ok(drained) => drained.with_context(|| format!("read {stream}")),
        Err(RecvTimeoutError::Timeout) => {
            warn!(stream, "output pipe still open after the child exited, detaching reader");
            Ok((Vec::new(), 0))
        }
        Err(RecvTimeoutError::Disconnected) => Err(anyhow!("{stream} reader thread panicked")),
    }
}

/// Read `reader` to EOF, keeping the first `limit` bytes.
///
/// Returns the kept bytes and how many were discarded.
fn drain_limited<R: Read>(mut reader: R, limit: usize) -> Drained {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 4096];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let room = limit.saturating_sub(kept.len());
        let keep = n.min(room);
        kept.extend_from_slice(&chunk[..keep]);
        dropped += n - keep;
    }

    Ok((kept, dropped))
}
