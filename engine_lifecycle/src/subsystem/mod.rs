//! Subsystem boundary - the two entry points the engine core calls on every
//! external subsystem, plus the descriptors and registry that order them.
//!
//! - **Subsystem**: `initialize` may fail, `shutdown` never does and must be a
//!   no-op when the subsystem was never brought up
//! - **SubsystemDescriptor**: a named subsystem with its init/shutdown participation
//! - **SubsystemRegistry**: the fixed init order and the fixed shutdown order

mod kind;
mod registry;

pub use kind::*;
pub use registry::*;

use std::any::Any;

use crate::error::SubsystemError;

/// An independently initializable engine component.
pub trait Subsystem {
    /// Bring the subsystem up.
    fn initialize(&mut self) -> Result<(), SubsystemError>;

    /// Tear the subsystem down.
    ///
    /// Called unconditionally, including when `initialize` never ran or failed.
    fn shutdown(&mut self);
}

/// A subsystem built from two closures.
pub struct FnSubsystem<I, S> {
    init: I,
    shutdown: S,
}

impl<I, S> FnSubsystem<I, S>
where
    I: FnMut() -> Result<(), SubsystemError>,
    S: FnMut(),
{
    pub fn new(init: I, shutdown: S) -> Self {
        Self { init, shutdown }
    }
}

impl<I, S> Subsystem for FnSubsystem<I, S>
where
    I: FnMut() -> Result<(), SubsystemError>,
    S: FnMut(),
{
    fn initialize(&mut self) -> Result<(), SubsystemError> {
        (self.init)()
    }

    fn shutdown(&mut self) {
        (self.shutdown)()
    }
}

/// Position in the shutdown sequence; lower slots shut down first.
pub type ShutdownSlot = u16;

/// A named subsystem and the lifecycle steps it takes part in.
pub struct SubsystemDescriptor {
    name: String,
    subsystem: Box<dyn Subsystem>,
    runs_init: bool,
    shutdown_slot: Option<ShutdownSlot>,
}

impl SubsystemDescriptor {
    /// Subsystem that only takes part in initialization.
    pub fn new(name: impl Into<String>, subsystem: Box<dyn Subsystem>) -> Self {
        Self {
            name: name.into(),
            subsystem,
            runs_init: true,
            shutdown_slot: None,
        }
    }

    /// Subsystem that only takes part in shutdown, at the given slot.
    pub fn shutdown_only(
        name: impl Into<String>,
        subsystem: Box<dyn Subsystem>,
        slot: ShutdownSlot,
    ) -> Self {
        Self {
            name: name.into(),
            subsystem,
            runs_init: false,
            shutdown_slot: Some(slot),
        }
    }

    /// Also shut this subsystem down at the given slot.
    pub fn with_shutdown_at(mut self, slot: ShutdownSlot) -> Self {
        self.shutdown_slot = Some(slot);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runs_init(&self) -> bool {
        self.runs_init
    }

    pub fn shutdown_slot(&self) -> Option<ShutdownSlot> {
        self.shutdown_slot
    }

    pub fn initialize(&mut self) -> Result<(), SubsystemError> {
        self.subsystem.initialize()
    }

    pub fn shutdown(&mut self) {
        self.subsystem.shutdown()
    }
}

impl std::fmt::Debug for SubsystemDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsystemDescriptor")
            .field("name", &self.name)
            .field("runs_init", &self.runs_init)
            .field("shutdown_slot", &self.shutdown_slot)
            .finish()
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
