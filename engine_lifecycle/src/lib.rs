//! # Engine Lifecycle
//!
//! Startup and shutdown orchestration for the game engine. This crate brings
//! every subsystem up in a fixed order, decides from the command line how the
//! run boots, and tears the engine down again even when startup failed halfway.
//!
//! ## Core Components
//!
//! - **subsystem**: Subsystem trait, descriptors and the ordered registry
//! - **command_line**: Boot flags and their precedence
//! - **config**: Per-user engine options stored as JSON
//! - **orchestrator**: `initialize_engine` / `shutdown_engine` over an explicit context
//!
//! ## Design Philosophy
//!
//! - **Fixed Order**: Init and shutdown orders are data, chosen once when the registry is built
//! - **Single Boundary**: Failures and panics during bring-up become one `Failed` outcome
//! - **Best-Effort Teardown**: Shutdown runs every step and never reports failure

pub mod command_line;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod subsystem;

pub use command_line::*;
pub use config::*;
pub use error::*;
pub use orchestrator::*;
pub use subsystem::*;
