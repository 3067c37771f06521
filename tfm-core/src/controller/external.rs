//! ``src/controller/external.rs``
//!
//! Steps that need the whole terminal: the editor, a user shell command and
//! the update check. The session only describes them; the binary releases
//! the terminal, calls [`ExternalStep::run`], takes the terminal back and
//! hands the outcome to `Session::resume`.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::util::humanize::shell_quote;

const FALLBACK_EDITORS: [&str; 3] = ["nvim", "vim", "nano"];
const FILE_PLACEHOLDER: &str = "{file}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalStep {
    Edit { editor: String, path: PathBuf },
    RunCommand { command: String },
    CheckForUpdates { command: String },
}

impl ExternalStep {
    /// Run to completion with inherited stdio. Returns the status message
    /// to show once the session is back.
    #[instrument(skip(self), fields(step = ?self))]
    pub async fn run(&self) -> Result<String, AppError> {
        match self {
            Self::Edit { editor, path } => {
                let status = Command::new(editor)
                    .arg(path)
                    .status()
                    .await
                    .map_err(|e| AppError::from_io("edit", path.as_path(), e))?;
                check_status(editor, status)?;
                Ok(format!("Edited with {editor}"))
            }

            Self::RunCommand { command } => {
                let status = shell(command).await?;
                info!(marker = "EXTERNAL_COMMAND", "`{command}` exited with {status}");
                wait_for_enter().await?;
                Ok(format!("Command executed: {command}"))
            }

            Self::CheckForUpdates { command } => {
                println!("Checking for updates...\n");
                let status = shell(command).await?;
                wait_for_enter().await?;
                check_status(command, status)?;
                Ok("Update check finished".to_string())
            }
        }
    }
}

/// `configured`, else the first of nvim, vim, nano found on PATH.
#[must_use]
pub fn resolve_editor(configured: Option<&str>) -> Option<String> {
    if let Some(editor) = configured.map(str::trim).filter(|e| !e.is_empty()) {
        return Some(editor.to_string());
    }
    FALLBACK_EDITORS
        .iter()
        .find(|e| which::which(e).is_ok())
        .map(|e| (*e).to_string())
}

/// Substitute `{file}` with the quoted path, or append it when the template
/// has no placeholder.
#[must_use]
pub fn build_command(template: &str, file: &Path) -> String {
    let quoted = shell_quote(&file.to_string_lossy());
    if template.contains(FILE_PLACEHOLDER) {
        template.replace(FILE_PLACEHOLDER, &quoted)
    } else {
        format!("{template} {quoted}")
    }
}

async fn shell(command: &str) -> Result<ExitStatus, AppError> {
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .await
        .map_err(|e| AppError::ExternalCmd {
            cmd: command.to_string(),
            code: None,
            stderr: e.to_string(),
        })
}

fn check_status(cmd: &str, status: ExitStatus) -> Result<(), AppError> {
    if status.success() {
        Ok(())
    } else {
        Err(AppError::ExternalCmd {
            cmd: cmd.to_string(),
            code: status.code(),
            stderr: String::new(),
        })
    }
}

async fn wait_for_enter() -> Result<(), AppError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"\n\nPress Enter to continue...").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(())
}
