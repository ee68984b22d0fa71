// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded execution of external tools (HEIC converters, OCR command lines).
//
// Each run drives a `tokio` child on a current-thread runtime. Stdin is
// written while the output pipes drain, and the child is killed on drop once
// the deadline passes.

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use heictext_core::error::{HeicTextError, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of a finished tool run.
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Run `program` with `args`, optionally feeding `stdin`, and wait at most
/// `timeout` for it to exit.
///
/// A program that cannot be spawned because it does not exist yields
/// [`HeicTextError::ToolMissing`]; a run past the deadline is killed and
/// yields [`HeicTextError::Timeout`]. A non-zero exit is *not* an error here;
/// callers inspect [`ToolOutput::status`] themselves.
pub fn run_tool<I, S>(
    program: &str,
    args: I,
    stdin: Option<Vec<u8>>,
    timeout: Duration,
) -> Result<ToolOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_command(program, command, stdin, timeout))
}

async fn run_command(
    program: &str,
    mut command: Command,
    stdin: Option<Vec<u8>>,
    timeout: Duration,
) -> Result<ToolOutput> {
    let mut child = command.spawn().map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            HeicTextError::tool_missing(program, err.to_string())
        } else {
            HeicTextError::Io(err)
        }
    })?;
    debug!(program, pid = child.id(), "Tool started");

    let pipe = child.stdin.take();
    let feed = async move {
        if let (Some(bytes), Some(mut pipe)) = (stdin, pipe) {
            // A child that exits early closes the pipe; its exit status
            // reports that.
            let _ = pipe.write_all(&bytes).await;
        }
    };
    let run = async move {
        let ((), output) = tokio::join!(feed, child.wait_with_output());
        output
    };

    let started = Instant::now();
    let output = tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| {
            warn!(program, timeout_secs = timeout.as_secs(), "Tool timed out; killed");
            HeicTextError::Timeout {
                tool: program.to_string(),
                seconds: timeout.as_secs(),
            }
        })??;

    debug!(
        program,
        code = ?output.status.code(),
        stdout_bytes = output.stdout.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Tool finished"
    );
    Ok(ToolOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_tool_missing() {
        let err = run_tool(
            "heictext-definitely-not-installed",
            ["--version"],
            None,
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, HeicTextError::ToolMissing { .. }));
    }

    #[test]
    fn captures_stdout_and_status() {
        let output = run_tool("sh", ["-c", "echo hello; exit 3"], None, Duration::from_secs(5)).unwrap();
        assert_eq!(output.stdout_lossy().trim(), "hello");
        assert_eq!(output.status.code(), Some(3));
        assert!(!output.success());
    }

    #[test]
    fn stdin_is_forwarded() {
        let output = run_tool("cat", Vec::<&str>::new(), Some(b"piped".to_vec()), Duration::from_secs(5)).unwrap();
        assert_eq!(output.stdout, b"piped");
    }

    #[test]
    fn slow_program_times_out() {
        let started = Instant::now();
        let err = run_tool("sleep", ["5"], None, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, HeicTextError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn large_stdin_does_not_block_on_output() {
        let payload = vec![b'x'; 1 << 20];
        let output = run_tool("cat", Vec::<&str>::new(), Some(payload.clone()), Duration::from_secs(10)).unwrap();
        assert_eq!(output.stdout.len(), payload.len());
    }
}
