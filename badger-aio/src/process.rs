// badger-aio/src/process.rs
use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use badger_common::error::{BadgerError, Result};
use tracing::{debug, error};
use wait_timeout::ChildExt;

/// How long to wait for output pipes to drain once the child has exited.
/// Pipes inherited by grandchildren never reach EOF.
const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Runs an external command to completion and captures its output.
pub fn run_command_sync<S: AsRef<OsStr>>(
    command: impl AsRef<OsStr>,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<Output> {
    let command = command.as_ref();
    debug!(
        "Sync Running command: {} {:?} (cwd: {:?})",
        command.to_string_lossy(),
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>(),
        cwd
    );
    let mut cmd = Command::new(command);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(Stdio::null());

    match cmd.output() {
        Ok(output) => {
            log_output(&output);
            Ok(output)
        }
        Err(e) => {
            error!(
                "Sync Failed to execute command {}: {}",
                command.to_string_lossy(),
                e
            );
            Err(BadgerError::CommandExec(format!(
                "{}: {}",
                command.to_string_lossy(),
                e
            )))
        }
    }
}

/// Runs an external command, giving up after `timeout`.
///
/// Returns `Ok(None)` when the command timed out; the child is killed and
/// reaped. Spawn failures are returned as errors.
pub fn run_command_with_timeout<S: AsRef<OsStr>>(
    command: impl AsRef<OsStr>,
    args: &[S],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<Option<Output>> {
    let command = command.as_ref();
    debug!(
        "Running command with {:?} timeout: {} {:?}",
        timeout,
        command.to_string_lossy(),
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
    );
    let mut cmd = Command::new(command);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(Stdio::null());

    let mut child = cmd.spawn().map_err(|e| {
        error!("Failed to spawn {}: {}", command.to_string_lossy(), e);
        BadgerError::CommandExec(format!("{}: {}", command.to_string_lossy(), e))
    })?;

    // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
    let stdout_rx = child.stdout.take().map(spawn_reader);
    let stderr_rx = child.stderr.take().map(spawn_reader);

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let output = Output {
                status,
                stdout: collect(stdout_rx),
                stderr: collect(stderr_rx),
            };
            log_output(&output);
            Ok(Some(output))
        }
        Ok(None) => {
            debug!(
                "Command {} timed out after {:?}, killing it",
                command.to_string_lossy(),
                timeout
            );
            let _ = child.kill();
            let _ = child.wait();
            Ok(None)
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(BadgerError::Io(Arc::new(e)))
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

fn collect(rx: Option<Receiver<Vec<u8>>>) -> Vec<u8> {
    rx.and_then(|rx| rx.recv_timeout(PIPE_DRAIN_GRACE).ok())
        .unwrap_or_default()
}

fn log_output(output: &Output) {
    if output.status.success() {
        debug!("Command finished successfully.");
        return;
    }
    debug!("Command failed with status: {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        debug!("Stdout:\n{}", stdout.trim());
    }
    if !stderr.trim().is_empty() {
        debug!("Stderr:\n{}", stderr.trim());
    }
}
