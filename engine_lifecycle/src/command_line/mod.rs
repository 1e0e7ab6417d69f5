//! Boot flags recognized on the command line.
//!
//! This is not a general argument parser: only a fixed set of flags is
//! recognized and everything else is ignored.

use serde::{Deserialize, Serialize};

/// Runs the map maintenance utility instead of the game. Case-sensitive.
pub const MAP_UTILITY_FLAG: &str = "-DOMAPS";
/// Enters the editor with the default sector loaded. Case-sensitive.
pub const EDITOR_AUTO_FLAG: &str = "-EDITORAUTO";
/// Enters the editor without a sector. Case-sensitive.
pub const EDITOR_MANUAL_FLAG: &str = "-EDITOR";
/// Every quick save goes to a new slot. Case-insensitive.
pub const CONSECUTIVE_QUICK_SAVE_FLAG: &str = "-quicksave";

/// Startup path selected by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BootMode {
    #[default]
    Normal,
    MapUtility,
    EditorAuto,
    EditorManual,
}

/// Intent parsed from the process arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandLine {
    /// At most one mode per run.
    pub mode: BootMode,
    /// Independent of `mode`.
    pub consecutive_quick_saves: bool,
}

impl CommandLine {
    /// Parse arguments (without the program name).
    ///
    /// When several mode flags are present the precedence is
    /// map utility, then auto editor, then manual editor.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map_utility = false;
        let mut editor_auto = false;
        let mut editor_manual = false;
        let mut consecutive_quick_saves = false;

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                MAP_UTILITY_FLAG => map_utility = true,
                EDITOR_AUTO_FLAG => editor_auto = true,
                EDITOR_MANUAL_FLAG => editor_manual = true,
                _ if arg.eq_ignore_ascii_case(CONSECUTIVE_QUICK_SAVE_FLAG) => {
                    consecutive_quick_saves = true
                }
                _ => tracing::trace!(arg, "Ignoring unrecognized argument"),
            }
        }

        let mode = if map_utility {
            BootMode::MapUtility
        } else if editor_auto {
            BootMode::EditorAuto
        } else if editor_manual {
            BootMode::EditorManual
        } else {
            BootMode::Normal
        };

        Self {
            mode,
            consecutive_quick_saves,
        }
    }

    /// Parse the arguments of the running process.
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }
}
