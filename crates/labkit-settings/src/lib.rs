//! LabKit Settings Crate
//!
//! Application configuration plus the file and in-memory implementations
//! of the snapshot persistence port.

pub mod config;
pub mod error;
pub mod store;

pub use config::{
    Config, ControllerSettings, FluidicsSettings, LayoutSettings, MotionSettings,
    StorageSettings,
};
pub use error::{SettingsError, SettingsResult};
pub use store::{JsonFileStore, MemoryStore};
