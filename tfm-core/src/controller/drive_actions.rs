//! ``src/controller/drive_actions.rs``
//!
//! Drives panel: open or mount on activation, unmount on `u`, and the
//! credential prompt round-trip when the helper needs authorization.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::controller::session::Session;
use crate::drives::drive::Drive;
use crate::drives::helper::Credential;
use crate::drives::mount_controller::{MountError, MountOp, MountSuccess};
use crate::model::ui_state::{Prompt, PromptKind};

impl Session {
    /// Open a mounted drive's mount point, mount it otherwise.
    pub(crate) async fn activate_selected_drive(&mut self) {
        let Some(drive) = self.selected_drive() else {
            return;
        };

        match drive.mountpoint.as_deref().filter(|_| drive.is_mounted()) {
            Some(mount_point) => {
                self.tree.open(PathBuf::from(mount_point));
                self.refresh_disk_usage();
                self.ui.show_info(format!("Opened {}", drive.display_name()));
            }
            None => self.run_mount_op(MountOp::Mount, &drive, None).await,
        }
    }

    pub(crate) async fn unmount_selected(&mut self) {
        if let Some(drive) = self.selected_drive() {
            self.run_mount_op(MountOp::Unmount, &drive, None).await;
        }
    }

    /// Submit of the credential prompt. The drive is looked up again by
    /// device name since the list may have been refreshed meanwhile.
    pub(crate) async fn retry_with_credential(&mut self, device: &str, op: MountOp, secret: String) {
        let Some(drive) = self.mounts.drives().iter().find(|d| d.name == device).cloned() else {
            self.ui.show_error(format!("Drive {device} is gone"));
            return;
        };
        self.run_mount_op(op, &drive, Some(Credential::new(secret))).await;
    }

    pub(crate) async fn run_mount_op(&mut self, op: MountOp, drive: &Drive, credential: Option<Credential>) {
        let name = drive.display_name().to_string();
        let former_mount_point = drive.mountpoint.clone();

        match self.mounts.perform(op, drive, credential.as_ref()).await {
            Ok(MountSuccess::AlreadyInState) => self.ui.show_info(match op {
                MountOp::Mount => "Already mounted.",
                MountOp::Unmount => "Drive is not mounted.",
            }),

            Ok(MountSuccess::Done { escalated }) => {
                let via = if escalated { " with sudo" } else { "" };
                info!(marker = "MOUNT_DONE", "{} {name}{via}", op.past_tense());

                let left = op == MountOp::Unmount
                    && former_mount_point
                        .as_deref()
                        .is_some_and(|m| self.leave_mount_point(Path::new(m)));
                if left {
                    self.ui.show_success("Unmounted. Path reset to home.");
                } else {
                    self.ui.show_success(format!("{} {name}{via}", op.past_tense()));
                }
                self.refresh_disk_usage();
            }

            Err(MountError::NeedsPermission) => {
                let verb = match op {
                    MountOp::Mount => "mounting",
                    MountOp::Unmount => "unmounting",
                };
                self.ui.open_prompt(Prompt::new(
                    PromptKind::Credential {
                        device: drive.name.clone(),
                        op,
                    },
                    format!("Sudo password for {verb} {name}"),
                ));
            }

            Err(MountError::IncorrectCredential) => self.ui.show_error("Incorrect sudo password."),

            Err(MountError::TimedOut { after }) => {
                self.ui
                    .show_error(format!("{} of {name} timed out after {after:?}", op.verb()));
            }

            Err(MountError::Failed { escalated, diagnostic }) => {
                warn!(marker = "MOUNT_FAILED", "{} {name}: {diagnostic}", op.verb());
                let prefix = if escalated { "Sudo " } else { "" };
                let verb = match (escalated, op) {
                    (false, MountOp::Mount) => "Mount",
                    (false, MountOp::Unmount) => "Unmount",
                    (true, MountOp::Mount) => "mount",
                    (true, MountOp::Unmount) => "unmount",
                };
                self.ui.show_error(format!("{prefix}{verb} failed: {diagnostic}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::controller::session::tests::{LSBLK, Script, output, press, session_in};
    use crate::drives::helper::RunError;
    use crate::model::panel_focus::Panel;

    fn message(session: &crate::controller::session::Session) -> Option<String> {
        session.ui().notification.as_ref().map(|n| n.message.to_string())
    }

    fn mounted_lsblk(mount_point: &str) -> String {
        format!(
            r#"{{"blockdevices":[{{"name":"sdb","type":"disk","size":8,
            "children":[{{"name":"sdb1","type":"part","size":8,"mountpoint":"{mount_point}","label":"USB"}}]}}]}}"#
        )
    }

    #[tokio::test]
    async fn mount_without_privilege_asks_for_a_password() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = Script::new(vec![
            Ok(output(true, LSBLK, "")),
            Ok(output(false, "", "Error: Not authorized to perform operation")),
            Ok(output(false, "", "Error: Not authorized to perform operation")),
            Ok(output(true, "Mounted /dev/sdb1", "")),
            Ok(output(true, &mounted_lsblk("/media/usb"), "")),
        ]);
        let mut session = session_in(dir.path(), script.clone()).await;
        session.focus.set_active(Panel::Drives);

        session.handle_key(press(KeyCode::Enter)).await;
        let prompt = session.ui().prompt.as_ref().expect("credential prompt");
        assert!(prompt.is_masked());
        assert_eq!(prompt.title, "Sudo password for mounting USB");

        for c in "hunter2".chars() {
            session.handle_key(press(KeyCode::Char(c))).await;
        }
        session.handle_key(press(KeyCode::Enter)).await;

        assert!(session.ui().prompt.is_none());
        assert_eq!(message(&session).as_deref(), Some("Mounted USB with sudo"));
        assert!(session.drives()[0].is_mounted());

        let calls = script.calls.lock().expect("calls");
        assert_eq!(calls[3].program, "sudo");
        assert!(calls[3].stdin.is_some());
        assert!(calls[1].stdin.is_none() && calls[2].stdin.is_none());
    }

    #[tokio::test]
    async fn cancelling_the_password_prompt_escalates_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = Script::new(vec![
            Ok(output(true, LSBLK, "")),
            Ok(output(false, "", "polkit: authentication required")),
        ]);
        let mut session = session_in(dir.path(), script.clone()).await;
        session.focus.set_active(Panel::Drives);

        session.handle_key(press(KeyCode::Enter)).await;
        session.handle_key(press(KeyCode::Char('x'))).await;
        session.handle_key(press(KeyCode::Esc)).await;

        assert!(session.ui().prompt.is_none());
        assert_eq!(script.call_count(), 2);
    }

    #[tokio::test]
    async fn wrong_password_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = Script::new(vec![
            Ok(output(true, LSBLK, "")),
            Ok(output(false, "", "Not authorized")),
            Ok(output(false, "", "Not authorized")),
            Ok(output(false, "", "Sorry, try again.\nsudo: 1 incorrect password attempt")),
        ]);
        let mut session = session_in(dir.path(), script).await;
        session.focus.set_active(Panel::Drives);

        session.handle_key(press(KeyCode::Enter)).await;
        session.handle_key(press(KeyCode::Char('x'))).await;
        session.handle_key(press(KeyCode::Enter)).await;

        assert_eq!(message(&session).as_deref(), Some("Incorrect sudo password."));
        assert!(!session.drives()[0].is_mounted());
    }

    #[tokio::test]
    async fn unmount_from_inside_resets_to_home() {
        let home = tempfile::tempdir().expect("home");
        let media = tempfile::tempdir().expect("media");
        let mount_point = media.path().to_string_lossy().into_owned();
        let script = Script::new(vec![
            Ok(output(true, &mounted_lsblk(&mount_point), "")),
            Ok(output(true, "Unmounted /dev/sdb1", "")),
            Ok(output(true, LSBLK, "")),
        ]);
        let mut session = session_in(home.path(), script).await;
        session.focus.set_active(Panel::Drives);

        session.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(session.tree().cwd(), media.path());
        assert_eq!(message(&session).as_deref(), Some("Opened USB"));

        session.handle_key(press(KeyCode::Char('u'))).await;
        assert_eq!(session.tree().cwd(), home.path());
        assert_eq!(message(&session).as_deref(), Some("Unmounted. Path reset to home."));
    }

    #[tokio::test]
    async fn unmount_is_ignored_outside_the_drives_panel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = Script::new(vec![Ok(output(true, &mounted_lsblk("/media/usb"), ""))]);
        let mut session = session_in(dir.path(), script.clone()).await;

        session.handle_key(press(KeyCode::Char('u'))).await;
        assert_eq!(script.call_count(), 1);
    }

    #[tokio::test]
    async fn unmounting_an_unmounted_drive_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = Script::new(vec![Ok(output(true, LSBLK, ""))]);
        let mut session = session_in(dir.path(), script.clone()).await;
        session.focus.set_active(Panel::Drives);

        session.handle_key(press(KeyCode::Char('u'))).await;
        assert_eq!(message(&session).as_deref(), Some("Drive is not mounted."));
        assert_eq!(script.call_count(), 1);
    }

    #[tokio::test]
    async fn helper_timeout_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = Script::new(vec![
            Ok(output(true, LSBLK, "")),
            Err(RunError::TimedOut {
                program: "udisksctl".to_string(),
                after: std::time::Duration::from_secs(10),
            }),
        ]);
        let mut session = session_in(dir.path(), script).await;
        session.focus.set_active(Panel::Drives);

        session.handle_key(press(KeyCode::Enter)).await;
        assert!(message(&session).is_some_and(|m| m.contains("timed out")));
        assert!(session.ui().prompt.is_none());
    }
}
