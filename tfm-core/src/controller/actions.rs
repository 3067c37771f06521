// tfm-core/src/controller/actions.rs

/// A high-level command, independent of whether it came from a key or a
/// clicked status-bar hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,

    /// Tab: tree → drives → shortcuts.
    CycleFocus,

    MoveSelectionUp,
    MoveSelectionDown,

    /// Enter / Right: enter directory, open shortcut, open or mount drive.
    Activate,

    /// Left: parent directory (tree panel only).
    GoToParent,

    Delete,
    CreateEntry,
    Edit,
    Copy,
    Cut,
    Paste,
    Rename,
    RunCommand,

    Search,
    ClearSearch,
    ToggleHidden,

    /// Unmount the selected drive (drives panel only).
    Unmount,

    CheckForUpdate,
}

impl Action {
    /// Tree-panel operations that act on the selected entry or working
    /// directory.
    #[must_use]
    pub const fn needs_tree_focus(self) -> bool {
        matches!(
            self,
            Self::Delete
                | Self::CreateEntry
                | Self::Edit
                | Self::Copy
                | Self::Cut
                | Self::Paste
                | Self::Rename
                | Self::RunCommand
        )
    }
}
