//! External command execution
//!
//! Every invocation names its working directory explicitly; the process-wide
//! current directory is never changed. Calls are bounded by a timeout and can
//! be retried with exponential backoff.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{LicenseCollectError, Result};

/// Interval between child status polls while waiting for exit
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Timeout and retry settings shared by all external calls
#[derive(Debug, Clone, Copy)]
pub struct RunPolicy {
    pub timeout: Duration,
    /// Retries after the first attempt
    pub retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub base_delay: Duration,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            retries: 2,
            base_delay: Duration::from_millis(200),
        }
    }
}

/// A command line bound to a working directory
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    current_dir: PathBuf,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.into(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Command line as shown in logs and errors
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Turn a non-zero exit into a `ToolFailed` error
    pub fn require_success(self, command: &ToolCommand) -> Result<ToolOutput> {
        if self.status.success() {
            return Ok(self);
        }
        Err(LicenseCollectError::ToolFailed {
            command: command.display(),
            reason: format!("{}: {}", self.status, self.stderr.trim()),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Run a command once, killing it if it outlives `timeout`.
///
/// A non-zero exit status is not an error here; callers decide whether the
/// captured output is still usable.
pub fn run(command: &ToolCommand, timeout: Duration) -> Result<ToolOutput> {
    tracing::debug!(
        command = %command.display(),
        cwd = %command.current_dir.display(),
        "running external command"
    );

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.current_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            // A missing working directory reports the same error kind.
            std::io::ErrorKind::NotFound if command.current_dir.is_dir() => {
                LicenseCollectError::ToolNotFound {
                    command: command.display(),
                }
            }
            _ => LicenseCollectError::ToolFailed {
                command: command.display(),
                reason: e.to_string(),
            },
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = wait_with_deadline(&mut child, timeout).map_err(|e| {
        LicenseCollectError::ToolFailed {
            command: command.display(),
            reason: e.to_string(),
        }
    })?;

    let Some(status) = status else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(LicenseCollectError::ToolTimedOut {
            command: command.display(),
            seconds: timeout.as_secs(),
        });
    };

    Ok(ToolOutput {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

/// Call `f` up to `policy.retries + 1` times, sleeping with exponential
/// backoff between failed attempts. The last error is returned.
///
/// Errors that are not [retryable](LicenseCollectError::is_retryable) are
/// returned at once.
pub fn retry<T, F>(policy: &RunPolicy, label: &str, mut f: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    for attempt in 0..policy.retries {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                let delay = policy.base_delay * 2u32.saturating_pow(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = policy.retries,
                    "{label} failed, retrying in {delay:?}: {e}"
                );
                thread::sleep(delay);
            }
        }
    }
    f()
}
