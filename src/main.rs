mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use cli::{
    Cli, Command, ConfigCommand, LayoutCommand, MoveDirection, ObjectEdit, SequenceCommand,
};
use labkit::{
    init_logging, Config, LabObject, LayoutSnapshot, SaveOutcome, SequenceBuffer, Workbench,
};
use labkit_communication::{run_timed_wash, validate_wash_duration, FluidicsCommand};
use labkit_core::LayoutError;
use labkit_layout::{serialization, ObjectStatus, Rgb, WellShape};
use labkit_sequence::{export_to_dir, Direction};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::INFO })?;
    debug!("labkit {} built {}", labkit::VERSION, labkit::BUILD_DATE);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    if let Some(host) = &cli.host {
        config.controller.host = host.clone();
    }

    match cli.command {
        Command::Config(command) => run_config(command, config, &config_path),
        Command::Layout(command) => run_layout(command, Workbench::open(config)?),
        Command::Sequence(command) => run_sequence(command, Workbench::open(config)?).await,
        Command::Send { command, dry_run } => {
            let bench = Workbench::open(config)?;
            let text = command.join(" ");
            bench.command_sink(dry_run).send(&text).await?;
            println!("Sent: {text}");
            Ok(())
        }
        Command::Fluidics { command, dry_run } => {
            let Some(command) = command else {
                for cmd in FluidicsCommand::ALL {
                    println!("{:<16} {}", cmd.as_str(), cmd.label());
                }
                return Ok(());
            };
            let bench = Workbench::open(config)?;
            let sink = bench.command_sink(dry_run);
            command.send(sink.as_ref()).await?;
            println!("Sent: {command}");
            Ok(())
        }
        Command::Wash { seconds, dry_run } => {
            let seconds = seconds.unwrap_or(config.fluidics.default_wash_secs);
            validate_wash_duration(seconds, config.fluidics.max_wash_secs)?;
            let bench = Workbench::open(config)?;
            let sink = bench.command_sink(dry_run);
            println!("Starting {seconds}s wash cycle...");
            run_timed_wash(sink.as_ref(), seconds).await?;
            println!("Wash cycle completed ({seconds}s)");
            Ok(())
        }
    }
}

fn run_config(command: ConfigCommand, config: Config, path: &Path) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save_to_file(path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn run_layout(command: LayoutCommand, mut bench: Workbench) -> Result<()> {
    match command {
        LayoutCommand::List => {
            let layout = bench.layout();
            let bed = layout.bed();
            println!("Bed: {} x {}mm", bed.width, bed.height);
            if layout.is_empty() {
                println!("No objects yet");
            }
            for (i, obj) in layout.objects().iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:<8} X{} Y{}  {}x{} wells  {}",
                    i + 1,
                    obj.name,
                    obj.status,
                    obj.position.x,
                    obj.position.y,
                    obj.well_grid.rows,
                    obj.well_grid.columns,
                    obj.catalog
                );
            }
        }
        LayoutCommand::New { name } => {
            let created = bench.edit_layout(|layout| {
                let name = name.unwrap_or_else(|| layout.next_default_name());
                Ok(layout.create_object(name).name.clone())
            })?;
            println!("Created {created}");
        }
        LayoutCommand::Clone { name } => {
            let copy = bench.edit_layout(|layout| {
                let index = index_of(layout, &name)?;
                layout.clone_object(index).map(|obj| obj.name.clone())
            })?;
            println!("Cloned {name} as {copy}");
        }
        LayoutCommand::Delete { name, yes } => {
            let removed = bench.edit_layout(|layout| {
                let index = index_of(layout, &name)?;
                layout.delete_object(index, confirm(yes))
            })?;
            match removed {
                Some(obj) => println!("Deleted {}", obj.name),
                None => println!("Kept {name}"),
            }
        }
        LayoutCommand::Set(edit) => {
            let name = bench.edit_layout(|layout| {
                let index = index_of(layout, &edit.name)?;
                let mut obj = layout.objects()[index].clone();
                apply_edit(&mut obj, &edit)?;
                let name = obj.name.clone();
                layout.update_object(index, obj)?;
                Ok(name)
            })?;
            println!("Updated {name}");
        }
        LayoutCommand::Wells { name } => {
            let obj = bench.layout().require(&name)?;
            for well in obj.wells() {
                println!("{:<4} X{:.2} Y{:.2}", well.name, well.x, well.y);
            }
        }
        LayoutCommand::Area { width, height } => {
            bench.edit_layout(|layout| layout.update_area(width, height))?;
            println!("Printer area updated to {width} x {height}mm");
        }
        LayoutCommand::Report => print!("{}", bench.layout().coordinate_report()),
        LayoutCommand::Export { output } => {
            let path = output.join(serialization::export_file_name(Local::now().date_naive()));
            bench.layout().serialize().save_to_file(&path)?;
            println!("Exported layout to {}", path.display());
        }
        LayoutCommand::Import { file } => {
            let snapshot = LayoutSnapshot::load_from_file(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let count = snapshot.objects.len();
            bench.import_layout(snapshot)?;
            println!("Imported {count} objects from {}", file.display());
        }
    }
    Ok(())
}

async fn run_sequence(command: SequenceCommand, mut bench: Workbench) -> Result<()> {
    match command {
        SequenceCommand::Build {
            name,
            steps,
            save,
            yes,
            output,
            copy,
        } => {
            let mut buffer = bench.build_sequence(&name, &steps)?;
            print!("{buffer}");
            if save {
                let outcome = bench.library_mut().save_buffer(&mut buffer, confirm(yes))?;
                report_save(buffer.name(), outcome);
            }
            if let Some(dir) = output {
                let path = export_to_dir(&buffer, dir, Local::now().date_naive())?;
                info!("Written to {}", path.display());
            }
            if copy {
                copy_to_clipboard(buffer.content()).await?;
                eprintln!("G-code sequence copied to clipboard");
            }
        }
        SequenceCommand::List => {
            let library = bench.library();
            if library.is_empty() {
                println!("No saved sequences yet");
            }
            for (i, name) in library.names().enumerate() {
                println!("{:>3}. {}", i + 1, name);
            }
        }
        SequenceCommand::Show { number } => {
            let buffer = load(&bench, number)?;
            print!("{buffer}");
            if !buffer.content().ends_with('\n') {
                println!();
            }
        }
        SequenceCommand::Move { number, direction } => {
            let direction = match direction {
                MoveDirection::Up => Direction::Up,
                MoveDirection::Down => Direction::Down,
            };
            let index = bench.library_mut().reorder(to_index(number)?, direction)?;
            println!("Sequence now at position {}", index + 1);
        }
        SequenceCommand::Combine { numbers, save, yes } => {
            let indices = numbers
                .into_iter()
                .map(to_index)
                .collect::<Result<Vec<_>>>()?;
            let mut buffer = bench.library().combine(&indices)?;
            print!("{buffer}");
            if save {
                let outcome = bench.library_mut().save_buffer(&mut buffer, confirm(yes))?;
                report_save(buffer.name(), outcome);
            }
        }
        SequenceCommand::Delete { numbers, yes } => {
            let indices = numbers
                .into_iter()
                .map(to_index)
                .collect::<Result<Vec<_>>>()?;
            let removed = bench.library_mut().delete(&indices, confirm(yes))?;
            println!("Deleted {} sequence(s)", removed.len());
        }
        SequenceCommand::Export { number, output } => {
            let buffer = load(&bench, number)?;
            let path = export_to_dir(&buffer, output, Local::now().date_naive())?;
            println!("G-code sequence saved as {}", path.display());
        }
        SequenceCommand::Run { number, dry_run } => {
            let buffer = bench.run_sequence(to_index(number)?, dry_run).await?;
            println!("Sent {} ({} lines)", buffer.name(), buffer.line_count());
        }
    }
    Ok(())
}

fn index_of(layout: &labkit::LabLayout, name: &str) -> Result<usize, LayoutError> {
    layout
        .index_of(name)
        .ok_or_else(|| LayoutError::NotFound(name.to_string()))
}

/// Listing numbers start at 1
fn to_index(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Sequence numbers start from 1"),
    }
}

fn load(bench: &Workbench, number: usize) -> Result<SequenceBuffer> {
    let mut buffer = SequenceBuffer::new();
    bench.library().load_into(to_index(number)?, &mut buffer)?;
    Ok(buffer)
}

fn report_save(name: &str, outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Created(_) | SaveOutcome::Overwritten(_) => {
            eprintln!("G-code sequence \"{name}\" saved successfully")
        }
        SaveOutcome::Declined => eprintln!("Not saved"),
    }
}

/// Ask on stderr unless `assume_yes`
fn confirm(assume_yes: bool) -> impl FnOnce(&str) -> bool {
    move |prompt| {
        if assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

async fn copy_to_clipboard(text: String) -> Result<()> {
    tokio::task::spawn_blocking(move || hold_clipboard(&text)).await?
}

/// X11 and Wayland selections vanish with their owner, so block until a
/// clipboard manager or another application takes the contents over
#[cfg(target_os = "linux")]
fn hold_clipboard(text: &str) -> Result<()> {
    use arboard::SetExtLinux;

    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    info!("Holding clipboard until another application takes it over");
    clipboard.set().wait().text(text.to_string())?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn hold_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

fn apply_edit(obj: &mut LabObject, edit: &ObjectEdit) -> Result<(), LayoutError> {
    if let Some(name) = &edit.rename {
        obj.name = name.clone();
    }
    if let Some(catalog) = &edit.catalog {
        obj.catalog = catalog.clone();
    }
    if let Some(status) = &edit.status {
        obj.status = status.parse::<ObjectStatus>()?;
    }
    if let Some(shape) = &edit.shape {
        obj.well_shape = shape.parse::<WellShape>()?;
    }
    if let Some(color) = &edit.color {
        obj.color = Rgb::from_hex(color)
            .or_else(|| Rgb::from_csv(color))
            .ok_or_else(|| LayoutError::validation("color", format!("cannot parse '{color}'")))?;
    }

    let set = |slot: &mut f64, value: Option<f64>| {
        if let Some(value) = value {
            *slot = value;
        }
    };
    set(&mut obj.position.x, edit.x);
    set(&mut obj.position.y, edit.y);
    set(&mut obj.size.width, edit.width);
    set(&mut obj.size.height, edit.height);
    set(&mut obj.size.z, edit.z);
    set(&mut obj.well_spacing.row, edit.row_spacing);
    set(&mut obj.well_spacing.column, edit.column_spacing);
    set(&mut obj.margin.x, edit.margin_x);
    set(&mut obj.margin.y, edit.margin_y);
    set(&mut obj.shim.x, edit.shim_x);
    set(&mut obj.shim.y, edit.shim_y);
    set(&mut obj.well_size.width, edit.well_width);
    set(&mut obj.well_size.height, edit.well_height);
    set(&mut obj.z_travel, edit.z_travel);

    if let Some(rows) = edit.rows {
        obj.well_grid.rows = rows;
    }
    if let Some(columns) = edit.columns {
        obj.well_grid.columns = columns;
    }
    Ok(())
}
