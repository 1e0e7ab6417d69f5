//! # Asset Paths
//!
//! Portable path handling for game assets. Asset names are authored on a
//! case-insensitive filesystem, so a name like `Data/TileSets` may exist on disk
//! as `data/tilesets`. This crate resolves such names deterministically by
//! scanning directories instead of relying on filesystem semantics.
//!
//! ## Components
//!
//! - **path_tools**: Pure path string helpers (joining, parent paths, extra data dir)
//! - **case_lookup**: Case-insensitive directory lookup behind a listing primitive

pub mod case_lookup;
pub mod path_tools;

pub use case_lookup::*;
pub use path_tools::*;
