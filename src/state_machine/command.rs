use std::time::Instant;

use super::error::CommandError;
use super::kinematics::AxisState;

/// The command vocabulary a host may send to an axis.
///
/// Only the first six kinds are modelled by the simulation. The rest are accepted and dropped so
/// that hosts speaking a larger vocabulary keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveAbsolute,
    MoveRelative,
    LoadPosition,
    SetVelocity,
    Go,
    Stop,
    SetHighLimit,
    SetLowLimit,
    SetVelocityBase,
    SetAcceleration,
    SetEncoderRatio,
    Home,
    Jog,
    /// Any other host command code.
    Other(u16),
}

/// A single supported command together with its argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveAbsolute(f64),
    MoveRelative(f64),
    LoadPosition(f64),
    SetVelocity(f64),
    Go,
    Stop,
}

impl Command {
    /// Pair a host command `kind` with its raw `value`.
    ///
    /// Returns `None` for kinds the simulation does not model. `Go` and `Stop` ignore `value`.
    pub fn from_kind(kind: CommandKind, value: f64) -> Option<Command> {
        match kind {
            CommandKind::MoveAbsolute => Some(Command::MoveAbsolute(value)),
            CommandKind::MoveRelative => Some(Command::MoveRelative(value)),
            CommandKind::LoadPosition => Some(Command::LoadPosition(value)),
            CommandKind::SetVelocity => Some(Command::SetVelocity(value)),
            CommandKind::Go => Some(Command::Go),
            CommandKind::Stop => Some(Command::Stop),
            CommandKind::SetHighLimit
            | CommandKind::SetLowLimit
            | CommandKind::SetVelocityBase
            | CommandKind::SetAcceleration
            | CommandKind::SetEncoderRatio
            | CommandKind::Home
            | CommandKind::Jog
            | CommandKind::Other(_) => None,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::MoveAbsolute(_) => CommandKind::MoveAbsolute,
            Command::MoveRelative(_) => CommandKind::MoveRelative,
            Command::LoadPosition(_) => CommandKind::LoadPosition,
            Command::SetVelocity(_) => CommandKind::SetVelocity,
            Command::Go => CommandKind::Go,
            Command::Stop => CommandKind::Stop,
        }
    }
}

/// A state transition that can be queued in a [`TransactionQueue`](super::transaction::TransactionQueue).
pub trait Transition {
    /// Apply the transition to `state`, with `now` as the time of application.
    fn apply(&self, state: &mut AxisState, now: Instant) -> Result<(), CommandError>;
}

impl Transition for Command {
    fn apply(&self, state: &mut AxisState, now: Instant) -> Result<(), CommandError> {
        match *self {
            Command::MoveAbsolute(target) => state.move_absolute(counts(self.kind(), target)?),
            Command::MoveRelative(delta) => state.move_relative(counts(self.kind(), delta)?),
            Command::LoadPosition(position) => {
                state.load_position(counts(self.kind(), position)?)
            }
            Command::SetVelocity(velocity) => {
                state.set_velocity(finite(self.kind(), velocity)?)
            }
            Command::Go => state.go(now),
            Command::Stop => state.stop(),
        }

        Ok(())
    }
}

fn finite(kind: CommandKind, value: f64) -> Result<f64, CommandError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CommandError::NonFinite { kind, value })
    }
}

/// Round a raw argument to whole counts, saturating at the `i32` range.
fn counts(kind: CommandKind, value: f64) -> Result<i64, CommandError> {
    finite(kind, value)
        .map(|value| value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i64)
}
