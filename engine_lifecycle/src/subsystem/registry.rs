//! Ordered subsystem registry.

use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use super::{panic_message, ShutdownSlot, SubsystemDescriptor};
use crate::error::RegistryError;

/// Result of one pass over the shutdown sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Steps that ran to completion, in execution order.
    pub completed: Vec<String>,
    /// Steps that faulted, with the fault message, in execution order.
    pub faulted: Vec<(String, String)>,
}

impl ShutdownReport {
    /// Total number of steps visited.
    pub fn steps(&self) -> usize {
        self.completed.len() + self.faulted.len()
    }

    pub fn is_clean(&self) -> bool {
        self.faulted.is_empty()
    }
}

/// Collects descriptors in registration (init) order.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<SubsystemDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor; registration order is init order.
    pub fn register(mut self, descriptor: SubsystemDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Validate the layout and fix both traversal orders.
    pub fn build(self) -> Result<SubsystemRegistry, RegistryError> {
        validate(&self.descriptors)?;

        let mut shutdown_order: Vec<(ShutdownSlot, usize)> = self
            .descriptors
            .iter()
            .enumerate()
            .filter_map(|(index, d)| d.shutdown_slot().map(|slot| (slot, index)))
            .collect();
        shutdown_order.sort_by_key(|(slot, _)| *slot);

        Ok(SubsystemRegistry {
            descriptors: self.descriptors,
            shutdown_order: shutdown_order.into_iter().map(|(_, index)| index).collect(),
        })
    }
}

fn validate(descriptors: &[SubsystemDescriptor]) -> Result<(), RegistryError> {
    let mut names = HashSet::new();
    let mut slots: HashMap<ShutdownSlot, &str> = HashMap::new();

    for descriptor in descriptors {
        if !names.insert(descriptor.name()) {
            return Err(RegistryError::DuplicateName(descriptor.name().to_string()));
        }

        if let Some(slot) = descriptor.shutdown_slot() {
            if let Some(first) = slots.insert(slot, descriptor.name()) {
                return Err(RegistryError::DuplicateShutdownSlot {
                    slot,
                    first: first.to_string(),
                    second: descriptor.name().to_string(),
                });
            }
        }
    }

    Ok(())
}

/// The fixed, ordered set of engine subsystems.
///
/// Built once per process; neither order changes afterwards.
#[derive(Debug)]
pub struct SubsystemRegistry {
    descriptors: Vec<SubsystemDescriptor>,
    /// Indices into `descriptors`, sorted by shutdown slot.
    shutdown_order: Vec<usize>,
}

impl SubsystemRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SubsystemDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    /// Names of the init steps, in the order they run.
    pub fn init_order(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| d.runs_init())
            .map(|d| d.name())
            .collect()
    }

    /// Names of the shutdown steps, in the order they run.
    pub fn shutdown_order(&self) -> Vec<&str> {
        self.shutdown_order
            .iter()
            .map(|&index| self.descriptors[index].name())
            .collect()
    }

    /// Visit every init step in registration order, stopping at the first error.
    pub fn for_each_in_init_order<E, F>(&mut self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&mut SubsystemDescriptor) -> Result<(), E>,
    {
        for descriptor in self.descriptors.iter_mut().filter(|d| d.runs_init()) {
            visit(descriptor)?;
        }
        Ok(())
    }

    /// Visit every shutdown step in shutdown order.
    ///
    /// Never stops early: a step that panics is logged and the next step runs.
    pub fn for_each_in_shutdown_order<F>(&mut self, mut visit: F) -> ShutdownReport
    where
        F: FnMut(&mut SubsystemDescriptor),
    {
        let mut report = ShutdownReport::default();

        for &index in &self.shutdown_order {
            let descriptor = &mut self.descriptors[index];
            let name = descriptor.name().to_string();

            match panic::catch_unwind(AssertUnwindSafe(|| visit(descriptor))) {
                Ok(()) => {
                    debug!(subsystem = %name, "Shutdown step complete");
                    report.completed.push(name);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(subsystem = %name, fault = %message, "Shutdown step faulted, continuing");
                    report.faulted.push((name, message));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubsystemError;
    use crate::subsystem::FnSubsystem;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn recording(name: &str, log: &Log) -> SubsystemDescriptor {
        let (init_log, shutdown_log) = (log.clone(), log.clone());
        let (init_name, shutdown_name) = (name.to_string(), name.to_string());
        SubsystemDescriptor::new(
            name,
            Box::new(FnSubsystem::new(
                move || {
                    init_log.borrow_mut().push(format!("init:{}", init_name));
                    Ok(())
                },
                move || shutdown_log.borrow_mut().push(format!("shutdown:{}", shutdown_name)),
            )),
        )
    }

    #[test]
    fn test_init_order_is_registration_order() {
        let log = Log::default();
        let mut registry = SubsystemRegistry::builder()
            .register(recording("a", &log))
            .register(recording("b", &log))
            .register(recording("c", &log))
            .build()
            .unwrap();

        let result: Result<(), SubsystemError> =
            registry.for_each_in_init_order(|d| d.initialize());

        assert!(result.is_ok());
        assert_eq!(*log.borrow(), vec!["init:a", "init:b", "init:c"]);
        assert_eq!(registry.init_order(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_init_stops_at_first_failure() {
        let log = Log::default();
        let failing = SubsystemDescriptor::new(
            "b",
            Box::new(FnSubsystem::new(
                || Err(SubsystemError::new("missing tables")),
                || {},
            )),
        );
        let mut registry = SubsystemRegistry::builder()
            .register(recording("a", &log))
            .register(failing)
            .register(recording("c", &log))
            .build()
            .unwrap();

        let result = registry.for_each_in_init_order(|d| d.initialize());

        assert_eq!(result, Err(SubsystemError::new("missing tables")));
        assert_eq!(*log.borrow(), vec!["init:a"]);
    }

    #[test]
    fn test_shutdown_order_follows_slots_not_registration() {
        let log = Log::default();
        let mut registry = SubsystemRegistry::builder()
            .register(recording("animation", &log).with_shutdown_at(2))
            .register(recording("lighting", &log).with_shutdown_at(1))
            .register(recording("shade_table", &log))
            .register(SubsystemDescriptor::shutdown_only(
                "screens",
                Box::new(FnSubsystem::new(|| Ok(()), {
                    let log = log.clone();
                    move || log.borrow_mut().push("shutdown:screens".to_string())
                })),
                0,
            ))
            .build()
            .unwrap();

        assert_eq!(registry.shutdown_order(), vec!["screens", "lighting", "animation"]);
        assert_eq!(registry.init_order(), vec!["animation", "lighting", "shade_table"]);

        let report = registry.for_each_in_shutdown_order(|d| d.shutdown());

        assert!(report.is_clean());
        assert_eq!(
            *log.borrow(),
            vec!["shutdown:screens", "shutdown:lighting", "shutdown:animation"]
        );
    }

    #[test]
    fn test_shutdown_continues_after_fault() {
        let log = Log::default();
        let mut builder = SubsystemRegistry::builder();
        for (slot, name) in ["s1", "s2", "s3", "s4", "s5"].iter().enumerate() {
            let descriptor = if *name == "s3" {
                SubsystemDescriptor::new(
                    *name,
                    Box::new(FnSubsystem::new(|| Ok(()), || panic!("tile cache corrupt"))),
                )
            } else {
                recording(name, &log)
            };
            builder = builder.register(descriptor.with_shutdown_at(slot as ShutdownSlot));
        }
        let mut registry = builder.build().unwrap();

        let report = registry.for_each_in_shutdown_order(|d| d.shutdown());

        assert_eq!(
            *log.borrow(),
            vec!["shutdown:s1", "shutdown:s2", "shutdown:s4", "shutdown:s5"]
        );
        assert_eq!(report.steps(), 5);
        assert_eq!(
            report.faulted,
            vec![("s3".to_string(), "tile cache corrupt".to_string())]
        );
    }

    #[test]
    fn test_build_rejects_bad_layouts() {
        let log = Log::default();

        let duplicate_name = SubsystemRegistry::builder()
            .register(recording("world", &log))
            .register(recording("world", &log))
            .build();
        assert_eq!(
            duplicate_name.unwrap_err(),
            RegistryError::DuplicateName("world".to_string())
        );

        let duplicate_slot = SubsystemRegistry::builder()
            .register(recording("fonts", &log).with_shutdown_at(4))
            .register(recording("sound", &log).with_shutdown_at(4))
            .build();
        assert_eq!(
            duplicate_slot.unwrap_err(),
            RegistryError::DuplicateShutdownSlot {
                slot: 4,
                first: "fonts".to_string(),
                second: "sound".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = SubsystemRegistry::builder().build().unwrap();
        assert!(registry.is_empty());

        let report = registry.for_each_in_shutdown_order(|d| d.shutdown());
        assert_eq!(report.steps(), 0);
    }
}
