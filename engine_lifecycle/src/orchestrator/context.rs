//! Process-wide engine state, passed explicitly into lifecycle operations.

use std::path::{Path, PathBuf};

use asset_paths::PathResolver;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command_line::CommandLine;
use crate::config::EngineOptions;
use crate::error::LifecycleError;
use crate::subsystem::{ShutdownReport, SubsystemRegistry};

use super::LifecycleOutcome;

/// Identifies one engine run in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    NotStarted,
    Initializing,
    Ready,
    Failed,
    ShuttingDown,
    Terminated,
}

/// Strategic map sector coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectorCoords {
    pub x: i16,
    pub y: i16,
}

/// How the editor should be entered after boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorLaunch {
    pub map_file: String,
    /// Sector selected before entering the editor, if any.
    pub sector: Option<SectorCoords>,
    pub auto_load_default_map: bool,
    pub gun_nut: bool,
}

impl EditorLaunch {
    /// Placeholder map name used until the editor loads a real map.
    pub const NO_MAP: &'static str = "none";

    /// Editor entered with the default sector loaded.
    pub fn auto() -> Self {
        Self {
            map_file: Self::NO_MAP.to_string(),
            sector: Some(SectorCoords { x: 0, y: 0 }),
            auto_load_default_map: true,
            gun_nut: true,
        }
    }

    /// Editor entered without a sector.
    pub fn manual() -> Self {
        Self {
            map_file: Self::NO_MAP.to_string(),
            sector: None,
            auto_load_default_map: false,
            gun_nut: true,
        }
    }
}

/// Global engine flags written during bring-up.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineState {
    pub world_loaded: bool,
    pub render_center: (i16, i16),
    /// Every quick save goes to a new slot.
    pub consecutive_quick_saves: bool,
    /// Set when the run boots into the editor.
    pub editor: Option<EditorLaunch>,
}

impl EngineState {
    /// Render center used until a world is loaded.
    pub const DEFAULT_RENDER_CENTER: (i16, i16) = (805, 805);

    /// State every bring-up starts from.
    pub fn booting() -> Self {
        Self {
            world_loaded: false,
            render_center: Self::DEFAULT_RENDER_CENTER,
            ..Self::default()
        }
    }
}

/// Asset locations found during resource discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocations {
    /// The `data` directory of the game installation, as named on disk.
    pub data_dir: PathBuf,
    /// Supplementary data shipped with the executable.
    pub extra_data_dir: Option<PathBuf>,
}

/// Everything the lifecycle operations read and write for one process run.
#[derive(Debug)]
pub struct EngineContext {
    pub(super) run_id: RunId,
    pub(super) phase: LifecyclePhase,
    pub(super) registry: SubsystemRegistry,
    pub(super) resolver: PathResolver,
    pub(super) options: EngineOptions,
    pub(super) command_line: CommandLine,
    pub(super) exe_folder: Option<PathBuf>,
    pub(super) state: EngineState,
    pub(super) resources: Option<ResourceLocations>,
    pub(super) outcome: Option<LifecycleOutcome>,
    pub(super) failure: Option<LifecycleError>,
    pub(super) last_shutdown: Option<ShutdownReport>,
}

impl EngineContext {
    /// Context for the host filesystem with default options and no flags.
    pub fn new(registry: SubsystemRegistry) -> Self {
        Self {
            run_id: RunId::new(),
            phase: LifecyclePhase::NotStarted,
            registry,
            resolver: PathResolver::for_host(),
            options: EngineOptions::default(),
            command_line: CommandLine::default(),
            exe_folder: None,
            state: EngineState::default(),
            resources: None,
            outcome: None,
            failure: None,
            last_shutdown: None,
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_command_line(mut self, command_line: CommandLine) -> Self {
        self.command_line = command_line;
        self
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_exe_folder(mut self, exe_folder: impl Into<PathBuf>) -> Self {
        self.exe_folder = Some(exe_folder.into());
        self
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn registry(&self) -> &SubsystemRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn command_line(&self) -> CommandLine {
        self.command_line
    }

    pub fn exe_folder(&self) -> Option<&Path> {
        self.exe_folder.as_deref()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn resources(&self) -> Option<&ResourceLocations> {
        self.resources.as_ref()
    }

    /// Outcome of the initialization attempt, once there was one.
    pub fn outcome(&self) -> Option<LifecycleOutcome> {
        self.outcome
    }

    /// Why initialization failed, for diagnostics.
    pub fn failure(&self) -> Option<&LifecycleError> {
        self.failure.as_ref()
    }

    /// Report of the most recent shutdown pass.
    pub fn last_shutdown(&self) -> Option<&ShutdownReport> {
        self.last_shutdown.as_ref()
    }
}
