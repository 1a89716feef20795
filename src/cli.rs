//! Command-line definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use labkit_communication::FluidicsCommand;
use labkit_sequence::{MoveTarget, DEFAULT_SEQUENCE_NAME};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "labkit",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Labware layout and movement-program builder"
)]
pub struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the layout and sequence library
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Moonraker host, overrides the configuration
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Edit the labware layout
    #[command(subcommand)]
    Layout(LayoutCommand),

    /// Build and manage movement programs
    #[command(subcommand)]
    Sequence(SequenceCommand),

    /// Send a raw command to the controller
    Send {
        /// Command text; multiple words are joined with spaces
        #[arg(required = true)]
        command: Vec<String>,
        #[arg(long)]
        dry_run: bool,
    },

    /// Send a fluidics macro; lists them when none is given
    Fluidics {
        command: Option<FluidicsCommand>,
        #[arg(long)]
        dry_run: bool,
    },

    /// Run WASH_ON, wait, then WASH_OFF
    Wash {
        /// Duration in seconds (defaults to the configured wash)
        seconds: Option<u64>,
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum LayoutCommand {
    /// List objects
    List,
    /// Add an object with default geometry
    New { name: Option<String> },
    /// Duplicate an object, offset from the original
    Clone { name: String },
    /// Remove an object
    Delete {
        name: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Change object properties
    Set(ObjectEdit),
    /// Print well coordinates of an object
    Wells { name: String },
    /// Resize the printer bed
    Area { width: f64, height: f64 },
    /// Print the coordinate report for all active objects
    Report,
    /// Write the layout snapshot to a JSON file
    Export {
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Replace the layout with a snapshot file
    Import { file: PathBuf },
}

#[derive(Args, Debug, Default)]
pub struct ObjectEdit {
    /// Object to edit
    pub name: String,
    #[arg(long)]
    pub rename: Option<String>,
    #[arg(long)]
    pub catalog: Option<String>,
    /// active|inactive
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub x: Option<f64>,
    #[arg(long)]
    pub y: Option<f64>,
    #[arg(long)]
    pub width: Option<f64>,
    #[arg(long)]
    pub height: Option<f64>,
    #[arg(long)]
    pub z: Option<f64>,
    #[arg(long)]
    pub rows: Option<u32>,
    #[arg(long)]
    pub columns: Option<u32>,
    #[arg(long)]
    pub row_spacing: Option<f64>,
    #[arg(long)]
    pub column_spacing: Option<f64>,
    #[arg(long)]
    pub margin_x: Option<f64>,
    #[arg(long)]
    pub margin_y: Option<f64>,
    #[arg(long)]
    pub shim_x: Option<f64>,
    #[arg(long)]
    pub shim_y: Option<f64>,
    /// ellipse|square
    #[arg(long)]
    pub shape: Option<String>,
    #[arg(long)]
    pub well_width: Option<f64>,
    #[arg(long)]
    pub well_height: Option<f64>,
    #[arg(long)]
    pub z_travel: Option<f64>,
    /// `#rrggbb` or `r,g,b`
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SequenceCommand {
    /// Generate a program from object and well steps
    Build {
        #[arg(long, default_value = DEFAULT_SEQUENCE_NAME)]
        name: String,
        /// OBJECT or OBJECT:ROW,COLUMN (1-based); repeat in order
        #[arg(long = "step", required = true)]
        steps: Vec<MoveTarget>,
        /// Store it in the library
        #[arg(long)]
        save: bool,
        /// Overwrite an existing sequence without asking
        #[arg(short, long)]
        yes: bool,
        /// Also write `<name>_<date>.gcode` into this directory
        #[arg(long)]
        output: Option<PathBuf>,
        /// Copy the program to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// List saved sequences
    List,
    /// Print a saved sequence
    Show { number: usize },
    /// Move a saved sequence up or down
    Move { number: usize, direction: MoveDirection },
    /// Concatenate saved sequences in library order
    Combine {
        #[arg(required = true, num_args = 2..)]
        numbers: Vec<usize>,
        #[arg(long)]
        save: bool,
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete saved sequences
    Delete {
        #[arg(required = true)]
        numbers: Vec<usize>,
        #[arg(short, long)]
        yes: bool,
    },
    /// Write a saved sequence to a .gcode file
    Export {
        number: usize,
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Send a saved sequence to the controller as one script
    Run {
        number: usize,
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        #[arg(long)]
        force: bool,
    },
}
