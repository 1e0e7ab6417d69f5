//! The engine's own subsystem list and its fixed orderings.
//!
//! Init order is the order of [`SubsystemKind::ALL`]. Shutdown order is set per
//! kind by [`SubsystemKind::shutdown_slot`] and is deliberately not the reverse
//! of init order: screens go down before lighting, and the cursor database is
//! cleared before the tactical engine.

use serde::{Deserialize, Serialize};

use super::{ShutdownSlot, Subsystem, SubsystemDescriptor, SubsystemRegistry};
use crate::error::RegistryError;

/// Every subsystem the engine brings up or tears down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubsystemKind {
    /// Localized strings loaded from external files. Init only.
    ExternalText,
    Animation,
    Lighting,
    /// Dialogue queue.
    Dialogue,
    /// Strategic layer: initialized as the strategic engine, shut down as the layer.
    StrategicEngine,
    /// Fills sector info from movement costs. Init only.
    StrategicMovementCosts,
    TacticalEngine,
    /// Init only.
    ShadeTable,
    /// Init only.
    IntensityTable,
    EventManager,
    World,
    TileCache,
    /// Merc popup text boxes; shutdown removes their images.
    MercPopupBox,
    /// Applies the configured music volume. Init only.
    MusicVolume,

    // Shutdown only
    /// Blank the frame buffer, remove the cursor and refresh.
    Video,
    LaptopTempFiles,
    /// Per-screen shutdown handlers.
    Screens,
    CursorDatabase,
    Overhead,
    Clock,
    Fonts,
    Sound,
    Vehicles,
}

impl SubsystemKind {
    /// Registration order; the init-capable kinds run in exactly this order.
    pub const ALL: [SubsystemKind; 23] = [
        SubsystemKind::ExternalText,
        SubsystemKind::Animation,
        SubsystemKind::Lighting,
        SubsystemKind::Dialogue,
        SubsystemKind::StrategicEngine,
        SubsystemKind::StrategicMovementCosts,
        SubsystemKind::TacticalEngine,
        SubsystemKind::ShadeTable,
        SubsystemKind::IntensityTable,
        SubsystemKind::EventManager,
        SubsystemKind::World,
        SubsystemKind::TileCache,
        SubsystemKind::MercPopupBox,
        SubsystemKind::MusicVolume,
        SubsystemKind::Video,
        SubsystemKind::LaptopTempFiles,
        SubsystemKind::Screens,
        SubsystemKind::CursorDatabase,
        SubsystemKind::Overhead,
        SubsystemKind::Clock,
        SubsystemKind::Fonts,
        SubsystemKind::Sound,
        SubsystemKind::Vehicles,
    ];

    /// Diagnostic name.
    pub fn name(&self) -> &'static str {
        match self {
            SubsystemKind::ExternalText => "external_text",
            SubsystemKind::Animation => "animation",
            SubsystemKind::Lighting => "lighting",
            SubsystemKind::Dialogue => "dialogue",
            SubsystemKind::StrategicEngine => "strategic_engine",
            SubsystemKind::StrategicMovementCosts => "strategic_movement_costs",
            SubsystemKind::TacticalEngine => "tactical_engine",
            SubsystemKind::ShadeTable => "shade_table",
            SubsystemKind::IntensityTable => "intensity_table",
            SubsystemKind::EventManager => "event_manager",
            SubsystemKind::World => "world",
            SubsystemKind::TileCache => "tile_cache",
            SubsystemKind::MercPopupBox => "merc_popup_box",
            SubsystemKind::MusicVolume => "music_volume",
            SubsystemKind::Video => "video",
            SubsystemKind::LaptopTempFiles => "laptop_temp_files",
            SubsystemKind::Screens => "screens",
            SubsystemKind::CursorDatabase => "cursor_database",
            SubsystemKind::Overhead => "overhead",
            SubsystemKind::Clock => "clock",
            SubsystemKind::Fonts => "fonts",
            SubsystemKind::Sound => "sound",
            SubsystemKind::Vehicles => "vehicles",
        }
    }

    /// Whether this kind takes part in bring-up.
    pub fn runs_init(&self) -> bool {
        !matches!(
            self,
            SubsystemKind::Video
                | SubsystemKind::LaptopTempFiles
                | SubsystemKind::Screens
                | SubsystemKind::CursorDatabase
                | SubsystemKind::Overhead
                | SubsystemKind::Clock
                | SubsystemKind::Fonts
                | SubsystemKind::Sound
                | SubsystemKind::Vehicles
        )
    }

    /// Position in the shutdown sequence, `None` for init-only kinds.
    pub fn shutdown_slot(&self) -> Option<ShutdownSlot> {
        let slot = match self {
            SubsystemKind::Video => 0,
            SubsystemKind::StrategicEngine => 1,
            SubsystemKind::LaptopTempFiles => 2,
            SubsystemKind::Dialogue => 3,
            SubsystemKind::Screens => 4,
            SubsystemKind::Lighting => 5,
            SubsystemKind::CursorDatabase => 6,
            SubsystemKind::TacticalEngine => 7,
            SubsystemKind::Overhead => 8,
            SubsystemKind::Animation => 9,
            SubsystemKind::World => 10,
            SubsystemKind::TileCache => 11,
            SubsystemKind::Clock => 12,
            SubsystemKind::Fonts => 13,
            SubsystemKind::Sound => 14,
            SubsystemKind::EventManager => 15,
            SubsystemKind::MercPopupBox => 16,
            SubsystemKind::Vehicles => 17,
            SubsystemKind::ExternalText
            | SubsystemKind::StrategicMovementCosts
            | SubsystemKind::ShadeTable
            | SubsystemKind::IntensityTable
            | SubsystemKind::MusicVolume => return None,
        };
        Some(slot)
    }

    /// Descriptor for this kind around the given implementation.
    pub fn descriptor(&self, subsystem: Box<dyn Subsystem>) -> SubsystemDescriptor {
        match (self.runs_init(), self.shutdown_slot()) {
            (true, Some(slot)) => SubsystemDescriptor::new(self.name(), subsystem).with_shutdown_at(slot),
            (false, Some(slot)) => SubsystemDescriptor::shutdown_only(self.name(), subsystem, slot),
            (_, None) => SubsystemDescriptor::new(self.name(), subsystem),
        }
    }
}

impl std::fmt::Display for SubsystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Build the engine registry, asking `provide` for the implementation of each kind.
pub fn engine_registry<F>(mut provide: F) -> Result<SubsystemRegistry, RegistryError>
where
    F: FnMut(SubsystemKind) -> Box<dyn Subsystem>,
{
    SubsystemKind::ALL
        .iter()
        .fold(SubsystemRegistry::builder(), |builder, kind| {
            builder.register(kind.descriptor(provide(*kind)))
        })
        .build()
}
