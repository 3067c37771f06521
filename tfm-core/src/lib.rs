pub mod error;

pub mod config;

pub mod controller {

    pub mod actions;
    pub use actions::Action;

    pub mod keymap;
    pub use keymap::Keymap;

    pub mod pointer;
    pub use pointer::{PointerAction, PointerDisambiguator};

    pub mod external;
    pub use external::ExternalStep;

    pub mod event_loop;
    pub use event_loop::{EventLoop, Input};

    pub mod session;
    pub use session::{Flow, Session};

    mod drive_actions;
    mod file_actions;
    mod prompt_actions;
}

pub mod drives {
    pub mod drive;
    pub use drive::Drive;

    pub mod helper;
    pub use helper::{Credential, HelperRunner, TokioRunner};

    pub mod mount_controller;
    pub use mount_controller::{MountController, MountError, MountOp, MountSuccess};

    pub mod usage;
}

pub mod model {
    pub mod dir_cache;
    pub use dir_cache::DirectoryCache;

    pub mod panel_focus;
    pub use panel_focus::{Panel, PanelFocus, ScrollState};

    pub mod shortcut;
    pub use shortcut::Shortcut;

    pub mod ui_state;
    pub use ui_state::{Notification, NotificationLevel, Prompt, PromptKind, UIState};
}

pub mod view {
    pub mod icons;

    pub mod layout;
    pub use layout::ScreenLayout;

    pub mod theme;

    pub mod ui;
    pub use ui::UIRenderer;

    pub mod components {
        pub mod file_info;
        pub mod input_prompt_overlay;
        pub mod object_table;
        pub mod preview_pane;
        pub mod side_panels;
        pub mod status_bar;
    }
}

pub mod fs {
    pub mod dir_scanner;
    pub mod file_ops;
    pub mod object_info;
    pub mod preview;
}

pub mod logging;
pub use logging::Logger;

pub mod util {
    pub mod humanize;
}

pub use error::AppError;
