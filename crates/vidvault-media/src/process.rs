//! External process execution with a hard timeout.

use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, error};

use vidvault_core::error::{AppError, ErrorKind};
use vidvault_core::result::AppResult;

/// Longest stderr excerpt carried into an error message.
const STDERR_EXCERPT_CHARS: usize = 2000;

/// Runs command-line tools such as `ffmpeg` and `yt-dlp`.
///
/// The child is killed if the timeout elapses or the future is dropped.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    /// Create a runner that aborts any single invocation after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run `program` with `args` and return its captured output.
    ///
    /// A missing binary, a non-zero exit, and a timeout all surface as
    /// `ErrorKind::ExternalService`.
    pub async fn run<I, S>(&self, program: &str, args: I) -> AppResult<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let start = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!(program, error = %e, "Failed to spawn external tool");
                return Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to run {program}: {e}"),
                    e,
                ));
            }
            Err(_) => {
                error!(
                    program,
                    timeout_secs = self.timeout.as_secs(),
                    "External tool timed out"
                );
                return Err(AppError::external(format!(
                    "{program} timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                program,
                exit_code = code,
                duration_ms,
                stderr = %stderr.chars().take(500).collect::<String>(),
                "External tool failed"
            );
            return Err(AppError::external(format!(
                "{program} exited with code {code}: {}",
                stderr.trim().chars().take(STDERR_EXCERPT_CHARS).collect::<String>()
            )));
        }

        debug!(program, duration_ms, "External tool finished");
        Ok(output)
    }
}
