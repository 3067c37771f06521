//! ``src/drives/mount_controller.rs``
//! ============================================================================
//! # `MountController`: drive enumeration and (un)mounting
//!
//! A request walks a fixed sequence:
//!
//! 1. already in the requested state: success, nothing is run
//! 2. unprivileged helper run, bounded by the short timeout
//! 3. on failure without a credential, authorization markers in the
//!    diagnostic yield [`MountError::NeedsPermission`] and the caller decides
//!    whether to ask for a password
//! 4. with a credential, the helper is re-run through the escalation wrapper,
//!    bounded by the long timeout
//!
//! Timeouts are reported, never retried. Every success force-refreshes the
//! drive list.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::config::MountConfig;
use crate::drives::drive::{Drive, parse_lsblk};
use crate::drives::helper::{Credential, HelperInvocation, HelperOutput, HelperRunner, RunError};

const LSBLK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOp {
    Mount,
    Unmount,
}

impl MountOp {
    /// Helper sub-command.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Unmount => "unmount",
        }
    }

    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Mount => "Mounted",
            Self::Unmount => "Unmounted",
        }
    }

    const fn wants_mounted(self) -> bool {
        matches!(self, Self::Mount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountSuccess {
    AlreadyInState,
    Done { escalated: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    #[error("needs elevated permission")]
    NeedsPermission,

    #[error("incorrect password")]
    IncorrectCredential,

    #[error("timed out after {after:?}")]
    TimedOut { after: Duration },

    #[error("failed: {diagnostic}")]
    Failed { escalated: bool, diagnostic: String },
}

/// What a helper's diagnostic text says about the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    IncorrectCredential,
    NeedsAuthorization,
    Other,
}

const INCORRECT_CREDENTIAL_MARKERS: &[&str] = &["incorrect password"];
const AUTHORIZATION_MARKERS: &[&str] = &["polkit", "authentication", "not authorized"];

/// Classify helper/wrapper diagnostics by case-insensitive substring.
///
/// The only place that interprets diagnostic text.
#[must_use]
pub fn classify_diagnostic(text: &str) -> Diagnosis {
    let lower = text.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if has(INCORRECT_CREDENTIAL_MARKERS) {
        Diagnosis::IncorrectCredential
    } else if has(AUTHORIZATION_MARKERS) {
        Diagnosis::NeedsAuthorization
    } else {
        Diagnosis::Other
    }
}

pub struct MountController {
    runner: Arc<dyn HelperRunner>,
    config: MountConfig,
    refresh_interval: Duration,
    drives: Vec<Drive>,
    last_enumeration: Option<Instant>,
}

impl std::fmt::Debug for MountController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountController")
            .field("config", &self.config)
            .field("drives", &self.drives.len())
            .field("last_enumeration", &self.last_enumeration)
            .finish_non_exhaustive()
    }
}

impl MountController {
    pub fn new(runner: Arc<dyn HelperRunner>, config: MountConfig, refresh_interval: Duration) -> Self {
        Self {
            runner,
            config,
            refresh_interval,
            drives: Vec::new(),
            last_enumeration: None,
        }
    }

    /// Last enumerated drive list.
    #[must_use]
    pub fn drives(&self) -> &[Drive] {
        &self.drives
    }

    // ------------------------------------------------------------------------
    // Enumeration
    // ------------------------------------------------------------------------

    /// Re-enumerate unless the previous enumeration is younger than the
    /// refresh interval. Failures leave an empty list.
    pub async fn list_drives(&mut self, force: bool) -> &[Drive] {
        let fresh = self
            .last_enumeration
            .is_some_and(|at| at.elapsed() < self.refresh_interval);
        if !force && fresh {
            return &self.drives;
        }

        self.last_enumeration = Some(Instant::now());
        self.drives = self.enumerate().await;
        &self.drives
    }

    async fn enumerate(&self) -> Vec<Drive> {
        let invocation = HelperInvocation {
            program: self.config.lsblk.clone(),
            args: ["-Jb", "-o", "NAME,TYPE,SIZE,MOUNTPOINT,LABEL,MODEL"]
                .map(String::from)
                .to_vec(),
            stdin: None,
            timeout: LSBLK_TIMEOUT,
        };

        let output = match self.runner.run(&invocation).await {
            Ok(output) if output.success => output,
            Ok(output) => {
                warn!(marker = "DRIVE_ENUM", "lsblk exited with {:?}: {}", output.code, output.diagnostic());
                return Vec::new();
            }
            Err(e) => {
                warn!(marker = "DRIVE_ENUM", "{e}");
                return Vec::new();
            }
        };

        parse_lsblk(&output.stdout).unwrap_or_else(|e| {
            warn!(marker = "DRIVE_ENUM", "malformed lsblk output: {e}");
            Vec::new()
        })
    }

    // ------------------------------------------------------------------------
    // Mount / unmount
    // ------------------------------------------------------------------------

    pub async fn mount(
        &mut self,
        drive: &Drive,
        credential: Option<&Credential>,
    ) -> Result<MountSuccess, MountError> {
        self.perform(MountOp::Mount, drive, credential).await
    }

    pub async fn unmount(
        &mut self,
        drive: &Drive,
        credential: Option<&Credential>,
    ) -> Result<MountSuccess, MountError> {
        self.perform(MountOp::Unmount, drive, credential).await
    }

    #[instrument(skip(self, drive, credential), fields(device = %drive.name, escalate = credential.is_some()))]
    pub async fn perform(
        &mut self,
        op: MountOp,
        drive: &Drive,
        credential: Option<&Credential>,
    ) -> Result<MountSuccess, MountError> {
        if drive.is_mounted() == op.wants_mounted() {
            return Ok(MountSuccess::AlreadyInState);
        }

        let plain = self.helper_invocation(op, drive);
        let output = self.attempt(&plain).await?;
        if output.success {
            return self.succeeded(op, drive, false).await;
        }

        let diagnostic = output.diagnostic().to_string();
        let Some(credential) = credential else {
            return Err(match classify_diagnostic(&diagnostic) {
                Diagnosis::NeedsAuthorization => MountError::NeedsPermission,
                Diagnosis::IncorrectCredential | Diagnosis::Other => MountError::Failed {
                    escalated: false,
                    diagnostic,
                },
            });
        };

        info!(marker = "MOUNT_ESCALATE", "{} {} via escalation", op.verb(), drive.device_path());
        let escalated = self.escalated_invocation(plain, credential);
        let output = self.attempt(&escalated).await?;
        if output.success {
            return self.succeeded(op, drive, true).await;
        }

        let diagnostic = output.diagnostic().to_string();
        Err(match classify_diagnostic(&diagnostic) {
            Diagnosis::IncorrectCredential => MountError::IncorrectCredential,
            Diagnosis::NeedsAuthorization | Diagnosis::Other => MountError::Failed {
                escalated: true,
                diagnostic,
            },
        })
    }

    async fn attempt(&self, invocation: &HelperInvocation) -> Result<HelperOutput, MountError> {
        match self.runner.run(invocation).await {
            Ok(output) => Ok(output),
            Err(RunError::TimedOut { after, .. }) => {
                warn!(marker = "MOUNT_TIMEOUT", "{} timed out", invocation.command_line());
                Err(MountError::TimedOut { after })
            }
            Err(e) => Err(MountError::Failed {
                escalated: invocation.stdin.is_some(),
                diagnostic: e.to_string(),
            }),
        }
    }

    async fn succeeded(
        &mut self,
        op: MountOp,
        drive: &Drive,
        escalated: bool,
    ) -> Result<MountSuccess, MountError> {
        info!(marker = "MOUNT_DONE", "{} {} (escalated: {escalated})", op.past_tense(), drive.device_path());
        self.list_drives(true).await;
        Ok(MountSuccess::Done { escalated })
    }

    fn helper_invocation(&self, op: MountOp, drive: &Drive) -> HelperInvocation {
        HelperInvocation {
            program: self.config.helper.clone(),
            args: vec![
                op.verb().to_string(),
                "--block-device".to_string(),
                drive.device_path(),
            ],
            stdin: None,
            timeout: self.config.unprivileged_timeout,
        }
    }

    /// Wrap `plain` in the escalation command. An empty wrapper config runs
    /// the helper directly, still feeding the credential.
    fn escalated_invocation(&self, plain: HelperInvocation, credential: &Credential) -> HelperInvocation {
        let (program, args) = match self.config.escalation.split_first() {
            Some((wrapper, wrapper_args)) => {
                let mut args = wrapper_args.to_vec();
                args.push(plain.program);
                args.extend(plain.args);
                (wrapper.clone(), args)
            }
            None => (plain.program, plain.args),
        };

        HelperInvocation {
            program,
            args,
            stdin: Some(credential.clone()),
            timeout: self.config.escalated_timeout,
        }
    }
}
