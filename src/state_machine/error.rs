use super::command::CommandKind;

/// Indicates that a single command could not be applied to an axis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// The numeric argument was NaN or infinite.
    #[error("{kind:?} received a non-finite argument ({value})")]
    NonFinite { kind: CommandKind, value: f64 },
}

/// Errors reported by the start/build/end transaction protocol.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransactionError {
    /// `build` or `end` was called without a preceding `start`.
    #[error("no transaction is open")]
    NotOpen,

    /// A queued command failed; it and every command queued after it were discarded.
    #[error("transaction aborted after {applied} applied command(s)")]
    Aborted {
        applied: usize,
        #[source]
        source: CommandError,
    },
}
