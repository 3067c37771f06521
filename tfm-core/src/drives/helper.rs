//! ``src/drives/helper.rs``
//!
//! Running the external mount helpers with captured output and a hard
//! timeout. [`HelperRunner`] is the seam the mount controller talks through;
//! [`TokioRunner`] spawns real processes.

use std::fmt;
use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument};

/// Secret typed into the credential prompt. Only [`Credential::expose`]
/// reveals it; `Debug` never does.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// One external process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperInvocation {
    pub program: String,
    pub args: Vec<String>,
    /// Written to stdin followed by a newline; stdin is closed otherwise.
    pub stdin: Option<Credential>,
    pub timeout: Duration,
}

impl HelperInvocation {
    /// `program args…` as one line, for logs. Never includes stdin.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelperOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl HelperOutput {
    /// Trimmed stderr, or stdout when stderr is empty.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} did not finish within {after:?}")]
    TimedOut { program: String, after: Duration },

    #[error("I/O error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[async_trait]
pub trait HelperRunner: Send + Sync {
    async fn run(&self, invocation: &HelperInvocation) -> Result<HelperOutput, RunError>;
}

/// Spawns helpers with `tokio::process`; the child is killed if the timeout
/// fires first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl HelperRunner for TokioRunner {
    #[instrument(skip_all, fields(command = %invocation.command_line(), timeout = ?invocation.timeout))]
    async fn run(&self, invocation: &HelperInvocation) -> Result<HelperOutput, RunError> {
        let program = invocation.program.clone();

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let work = async move {
            if let (Some(mut pipe), Some(secret)) = (stdin, invocation.stdin.as_ref()) {
                let mut line = secret.expose().as_bytes().to_vec();
                line.push(b'\n');
                // The wrapper may exit before reading; its own diagnostic is what matters.
                if let Err(e) = pipe.write_all(&line).await {
                    debug!("stdin write to {} failed: {e}", invocation.program);
                }
                drop(pipe);
            }
            child.wait_with_output().await
        };

        let output = timeout(invocation.timeout, work)
            .await
            .map_err(|_| RunError::TimedOut {
                program: program.clone(),
                after: invocation.timeout,
            })?
            .map_err(|source| RunError::Io { program, source })?;

        Ok(HelperOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
