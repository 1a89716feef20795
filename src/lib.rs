//! # LabKit
//!
//! Labware layout editor and movement-program builder for lab automation
//! rigs driven by a Klipper/Moonraker motion controller.
//!
//! ## Architecture
//!
//! LabKit is organized as a workspace with multiple crates:
//!
//! 1. **labkit-core** - Error taxonomy and the snapshot persistence port
//! 2. **labkit-layout** - Labware objects, bed area, well coordinates, snapshots
//! 3. **labkit-sequence** - Movement-program generation and the saved library
//! 4. **labkit-settings** - Configuration files and snapshot stores
//! 5. **labkit-communication** - Command channel to the controller, fluidics
//! 6. **labkit** - The [`Workbench`] session and the command-line front end

pub mod workbench;

pub use labkit_communication::{
    CommandSink, FluidicsCommand, MoonrakerSink, NoOpSink, RecordingSink,
};
pub use labkit_core::{CommandError, Error, LayoutError, Result, SequenceError, StoreError};
pub use labkit_layout::{LabLayout, LabObject, LayoutSnapshot, Well};
pub use labkit_sequence::{
    MoveProfile, MoveTarget, SaveOutcome, Sequence, SequenceBuffer, SequenceGenerator,
    SequenceLibrary,
};
pub use labkit_settings::Config;
pub use workbench::Workbench;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Logs go to stderr so program text printed on stdout stays clean.
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(default_level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
