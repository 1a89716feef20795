//! # LabKit Communication
//!
//! The boundary to the motion controller. Everything above this crate sends
//! text commands through [`CommandSink`]; the Moonraker implementation wraps
//! each command in a `printer.gcode.script` JSON-RPC request.

pub mod fluidics;
pub mod moonraker;
pub mod sink;

pub use fluidics::{
    run_timed_wash, spawn_timed_wash, validate_wash_duration, FluidicsCommand, MAX_WASH_SECS,
};
pub use moonraker::{gcode_script_request, MoonrakerSink, DEFAULT_CLOSE_DELAY, DEFAULT_PORT};
pub use sink::{CommandSink, NoOpSink, RecordingSink};
