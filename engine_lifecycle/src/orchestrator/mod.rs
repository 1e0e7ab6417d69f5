//! Lifecycle Orchestrator - brings the engine up and tears it down.
//!
//! Bring-up works as follows:
//! 1. **Reset**: Process-wide engine state starts from its boot values
//! 2. **Discovery**: Game data is located through the path resolver
//! 3. **Init**: Subsystems initialize in registry order, stopping at the first failure
//! 4. **Boot mode**: Command-line flags select the outcome handed back to the caller
//!
//! Any failure or panic during bring-up becomes [`LifecycleOutcome::Failed`] at a
//! single boundary. Nothing is unwound there: the caller always follows up with
//! [`shutdown_engine`], which runs every shutdown step whether or not its
//! subsystem came up.

mod context;

pub use context::*;

use std::panic::{self, AssertUnwindSafe};

use asset_paths::extra_data_dir;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::command_line::BootMode;
use crate::error::LifecycleError;
use crate::subsystem::panic_message;

/// Name of the asset directory inside the game installation.
pub const DATA_DIR_NAME: &str = "data";

/// Terminal classification of one initialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleOutcome {
    BootNormal,
    BootEditorManual,
    BootEditorAuto,
    RunMapUtility,
    Failed,
}

/// Screen the caller should show after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenId {
    /// Intro and main menu path.
    Init,
    /// Tactical game screen; the editor is entered from here.
    Game,
    MapUtility,
    /// Unrecoverable start.
    Error,
}

impl LifecycleOutcome {
    pub fn next_screen(&self) -> ScreenId {
        match self {
            LifecycleOutcome::BootNormal => ScreenId::Init,
            LifecycleOutcome::BootEditorManual | LifecycleOutcome::BootEditorAuto => ScreenId::Game,
            LifecycleOutcome::RunMapUtility => ScreenId::MapUtility,
            LifecycleOutcome::Failed => ScreenId::Error,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, LifecycleOutcome::Failed)
    }
}

/// Bring the engine up and decide how it boots.
///
/// Never panics and never returns an error: every failure is reported as
/// [`LifecycleOutcome::Failed`], with the cause kept in
/// [`EngineContext::failure`]. Only the first call on a context does any work.
pub fn initialize_engine(ctx: &mut EngineContext) -> LifecycleOutcome {
    if ctx.phase != LifecyclePhase::NotStarted {
        warn!(run_id = %ctx.run_id, phase = ?ctx.phase, "Engine initialization requested twice");
        return LifecycleOutcome::Failed;
    }

    ctx.phase = LifecyclePhase::Initializing;
    info!(run_id = %ctx.run_id, "Initializing engine");

    let mut in_flight: Option<String> = None;
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| bring_up(ctx, &mut in_flight)));

    let result = match attempt {
        Ok(result) => result,
        Err(payload) => Err(LifecycleError::Fault {
            subsystem: in_flight,
            message: panic_message(payload.as_ref()),
        }),
    };

    let outcome = match result {
        Ok(outcome) => {
            ctx.phase = LifecyclePhase::Ready;
            info!(run_id = %ctx.run_id, outcome = ?outcome, "Engine ready");
            outcome
        }
        Err(err) => {
            error!(run_id = %ctx.run_id, error = %err, "Engine initialization failed");
            ctx.failure = Some(err);
            ctx.phase = LifecyclePhase::Failed;
            LifecycleOutcome::Failed
        }
    };

    ctx.outcome = Some(outcome);
    outcome
}

fn bring_up(
    ctx: &mut EngineContext,
    in_flight: &mut Option<String>,
) -> Result<LifecycleOutcome, LifecycleError> {
    ctx.state = EngineState::booting();

    discover_resources(ctx)?;

    ctx.registry.for_each_in_init_order::<LifecycleError, _>(|descriptor| {
        *in_flight = Some(descriptor.name().to_string());
        debug!(subsystem = descriptor.name(), "Initializing subsystem");

        descriptor
            .initialize()
            .map_err(|source| LifecycleError::SubsystemInit {
                name: descriptor.name().to_string(),
                source,
            })?;

        *in_flight = None;
        Ok(())
    })?;

    Ok(select_boot(ctx))
}

/// Locate game data when a data directory is configured.
fn discover_resources(ctx: &mut EngineContext) -> Result<(), LifecycleError> {
    let game_dir = &ctx.options.game_data_dir;
    if game_dir.as_os_str().is_empty() {
        debug!("No game data directory configured, skipping resource discovery");
        return Ok(());
    }

    let data_dir = ctx
        .resolver
        .find_object_case_insensitive_full_path(game_dir, DATA_DIR_NAME, false, true)
        .ok_or_else(|| LifecycleError::DataDirNotFound(game_dir.clone()))?;
    let extra = ctx.exe_folder.as_deref().map(extra_data_dir);

    info!(data_dir = %data_dir.display(), "Located game data");
    ctx.resources = Some(ResourceLocations {
        data_dir,
        extra_data_dir: extra,
    });
    Ok(())
}

fn select_boot(ctx: &mut EngineContext) -> LifecycleOutcome {
    if ctx.command_line.consecutive_quick_saves {
        info!("Quick saves will use consecutive slots");
        ctx.state.consecutive_quick_saves = true;
    }

    match ctx.command_line.mode {
        BootMode::Normal => LifecycleOutcome::BootNormal,
        BootMode::MapUtility => LifecycleOutcome::RunMapUtility,
        BootMode::EditorAuto => {
            info!("Booting into the editor with the default sector");
            ctx.state.editor = Some(EditorLaunch::auto());
            LifecycleOutcome::BootEditorAuto
        }
        BootMode::EditorManual => {
            info!("Booting into the editor");
            ctx.state.editor = Some(EditorLaunch::manual());
            LifecycleOutcome::BootEditorManual
        }
    }
}

/// Tear the engine down, best effort and total.
///
/// Runs every shutdown step in shutdown order regardless of how (or whether)
/// initialization went; a faulting step is logged and skipped. Calling this
/// on a terminated context does nothing.
pub fn shutdown_engine(ctx: &mut EngineContext) {
    if ctx.phase == LifecyclePhase::Terminated {
        debug!(run_id = %ctx.run_id, "Engine already terminated");
        return;
    }

    info!(run_id = %ctx.run_id, from = ?ctx.phase, "Shutting down engine");
    ctx.phase = LifecyclePhase::ShuttingDown;

    let report = ctx.registry.for_each_in_shutdown_order(|descriptor| {
        debug!(subsystem = descriptor.name(), "Shutting down subsystem");
        descriptor.shutdown();
    });

    if !report.is_clean() {
        warn!(
            run_id = %ctx.run_id,
            faulted = report.faulted.len(),
            steps = report.steps(),
            "Shutdown finished with faults"
        );
    }

    ctx.state = EngineState::default();
    ctx.resources = None;
    ctx.last_shutdown = Some(report);
    ctx.phase = LifecyclePhase::Terminated;

    info!(run_id = %ctx.run_id, "Engine terminated");
}
