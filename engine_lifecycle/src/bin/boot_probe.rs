// engine_lifecycle/src/bin/boot_probe.rs
//
// Runs one full engine lifecycle with logging stand-ins for every subsystem.
// Set BOOT_PROBE_FAIL=<subsystem name> to make that subsystem fail its init.

use std::process::ExitCode;

use engine_lifecycle::{
    engine_registry, find_home_dir, initialize_engine, load_engine_options, shutdown_engine,
    CommandLine, EngineContext, EngineOptions, Subsystem, SubsystemError, SubsystemKind,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FAIL_VAR: &str = "BOOT_PROBE_FAIL";

struct TracingSubsystem {
    kind: SubsystemKind,
    fail_init: bool,
}

impl Subsystem for TracingSubsystem {
    fn initialize(&mut self) -> Result<(), SubsystemError> {
        if self.fail_init {
            return Err(SubsystemError::new(format!("{} set to {}", FAIL_VAR, self.kind)));
        }
        info!(subsystem = %self.kind, "up");
        Ok(())
    }

    fn shutdown(&mut self) {
        info!(subsystem = %self.kind, "down");
    }
}

fn engine_options() -> EngineOptions {
    match find_home_dir().and_then(|home| load_engine_options(&home)) {
        Ok(options) => options,
        Err(err) => {
            warn!(error = %err, "Using default engine options");
            EngineOptions::default()
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let failing = std::env::var(FAIL_VAR).ok();
    let registry = match engine_registry(|kind| -> Box<dyn Subsystem> {
        Box::new(TracingSubsystem {
            kind,
            fail_init: failing.as_deref() == Some(kind.name()),
        })
    }) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("[boot_probe] invalid subsystem layout: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = EngineContext::new(registry)
        .with_options(engine_options())
        .with_command_line(CommandLine::from_env());
    if let Some(folder) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
    {
        ctx = ctx.with_exe_folder(folder);
    }

    let outcome = initialize_engine(&mut ctx);
    println!("outcome: {:?}, next screen: {:?}", outcome, outcome.next_screen());
    if let Some(failure) = ctx.failure() {
        println!("failure: {}", failure);
    }

    shutdown_engine(&mut ctx);

    if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
