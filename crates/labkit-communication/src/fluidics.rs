//! Fluidics macros and the timed wash cycle.

use crate::sink::CommandSink;
use labkit_core::CommandError;
pub use labkit_core::MAX_WASH_SECS;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Controller macros exposed on the fluidics panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluidicsCommand {
    FeedbackPcv,
    ManualPcv,
    WashOn,
    WashOff,
    WasteOn,
    WasteOff,
    ValveInput,
    ValveOutput,
    ValveBypass,
    WastePosition,
    EjectPipette,
}

impl FluidicsCommand {
    pub const ALL: [FluidicsCommand; 11] = [
        FluidicsCommand::FeedbackPcv,
        FluidicsCommand::ManualPcv,
        FluidicsCommand::WashOn,
        FluidicsCommand::WashOff,
        FluidicsCommand::WasteOn,
        FluidicsCommand::WasteOff,
        FluidicsCommand::ValveInput,
        FluidicsCommand::ValveOutput,
        FluidicsCommand::ValveBypass,
        FluidicsCommand::WastePosition,
        FluidicsCommand::EjectPipette,
    ];

    /// Macro name as sent to the controller
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeedbackPcv => "FEEDBACK_PCV",
            Self::ManualPcv => "MANUAL_PCV",
            Self::WashOn => "WASH_ON",
            Self::WashOff => "WASH_OFF",
            Self::WasteOn => "WASTE_ON",
            Self::WasteOff => "WASTE_OFF",
            Self::ValveInput => "VALVE_INPUT",
            Self::ValveOutput => "VALVE_OUTPUT",
            Self::ValveBypass => "VALVE_BYPASS",
            Self::WastePosition => "WASTE_POSITION",
            Self::EjectPipette => "EJECT_PIPETTE",
        }
    }

    /// Panel label
    pub fn label(&self) -> &'static str {
        match self {
            Self::FeedbackPcv => "Feedback PCV On",
            Self::ManualPcv => "Manual PCV",
            Self::WashOn => "Wash On",
            Self::WashOff => "Wash Off",
            Self::WasteOn => "Dry On",
            Self::WasteOff => "Dry Off",
            Self::ValveInput => "Valve Input",
            Self::ValveOutput => "Valve Output",
            Self::ValveBypass => "Valve Bypass",
            Self::WastePosition => "Waste Position",
            Self::EjectPipette => "Eject Pipette",
        }
    }

    pub async fn send(self, sink: &dyn CommandSink) -> Result<(), CommandError> {
        info!("Sending fluidics command {}", self);
        sink.send(self.as_str()).await
    }
}

impl fmt::Display for FluidicsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FluidicsCommand {
    type Err = CommandError;

    /// Case-insensitive; `-` is accepted in place of `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == normalized)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
    }
}

/// Accepts 1..=`max` seconds
pub fn validate_wash_duration(seconds: u64, max: u64) -> Result<Duration, CommandError> {
    if seconds == 0 || seconds > max {
        return Err(CommandError::Validation(format!(
            "Duration must be between 1-{max} seconds (got {seconds})"
        )));
    }
    Ok(Duration::from_secs(seconds))
}

/// `WASH_ON`, wait, `WASH_OFF`
pub async fn run_timed_wash(sink: &dyn CommandSink, seconds: u64) -> Result<(), CommandError> {
    let duration = validate_wash_duration(seconds, MAX_WASH_SECS)?;
    info!("Starting {}s wash cycle", seconds);
    FluidicsCommand::WashOn.send(sink).await?;
    tokio::time::sleep(duration).await;
    FluidicsCommand::WashOff.send(sink).await?;
    info!("Wash cycle completed ({}s)", seconds);
    Ok(())
}

/// Start a wash cycle in the background.
///
/// The duration is checked before anything is spawned. The cycle cannot be
/// cancelled and is not ordered against other commands sent meanwhile.
pub fn spawn_timed_wash(
    sink: Arc<dyn CommandSink>,
    seconds: u64,
) -> Result<JoinHandle<Result<(), CommandError>>, CommandError> {
    validate_wash_duration(seconds, MAX_WASH_SECS)?;
    Ok(tokio::spawn(async move {
        run_timed_wash(sink.as_ref(), seconds).await
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for cmd in FluidicsCommand::ALL {
            assert_eq!(cmd.as_str().parse::<FluidicsCommand>().unwrap(), cmd);
        }
        assert_eq!(
            "eject-pipette".parse::<FluidicsCommand>().unwrap(),
            FluidicsCommand::EjectPipette
        );
        assert_eq!(FluidicsCommand::WasteOn.to_string(), "WASTE_ON");
        assert_eq!(FluidicsCommand::WasteOn.label(), "Dry On");
        assert!(matches!(
            "G28".parse::<FluidicsCommand>(),
            Err(CommandError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_wash_duration_bounds() {
        assert!(validate_wash_duration(0, MAX_WASH_SECS).is_err());
        assert!(validate_wash_duration(301, MAX_WASH_SECS).is_err());
        assert_eq!(
            validate_wash_duration(300, MAX_WASH_SECS).unwrap(),
            Duration::from_secs(300)
        );
        assert_eq!(
            validate_wash_duration(1, MAX_WASH_SECS).unwrap(),
            Duration::from_secs(1)
        );
    }
}
