//! The pure simulation of an axis.
//!
//! Nothing in this module reads the clock, locks or performs IO. The runner in
//! [`axis_context`](crate::axis_context) supplies time and synchronization.

pub mod axis;
pub mod command;
pub mod error;
pub mod kinematics;
pub mod transaction;
pub mod wrappers;

/// The [`StateMachine`] trait gives a deterministic core a uniform calling convention.
///
/// # Functionality
/// A state machine consumes [`Input`](StateMachine::Input) values and yields
/// [`Output`](StateMachine::Output) values when polled. Both are usually enums with one variant
/// per kind of input or output; the trait impl only maps those variants onto the inherent
/// methods that hold the logic.
///
/// # Invariants
/// Implementors *must* be pure so that two runs fed the same inputs end in the same state.
///
/// ## No Interior Mutability
/// State is mutated only through `&mut self`. No [`std::cell`] containers, no [`std::sync`]
/// locks and no reference-counted pointers, since their counts are shared state too.
///
/// ## No IO
/// No [`std::io`], [`std::net`] or anything built on them.
///
/// ### No System Time
/// Reading [`std::time::Instant::now`] inside the machine makes replays diverge. Time is passed
/// in as part of the input instead; arithmetic on those values is fine.
///
/// ## No Concurrency, No Async, No Blocking
/// The machine never spawns, awaits or blocks. Whoever owns it decides when it runs, which is
/// what lets a plain [`Mutex`](std::sync::Mutex) guard it without risk of stalls.
///
/// # Side Effects
/// Logging is allowed as long as the machine's logic never depends on it.
///
/// # Runners
/// The impure half lives in a runner that owns the machine, reads the clock through
/// [`SystemResource`](wrappers::input::system::SystemResource) and feeds the result in as input.
/// See [`AxisContext`](crate::axis_context::AxisContext).
pub trait StateMachine {
    /// The type of input that is [processed](StateMachine::process_input) by the state machine.
    type Input;
    /// The type of output that is [polled](StateMachine::poll_output) by the state machine.
    type Output;

    /// Process the provided `input` into the state machine.
    fn process_input(&mut self, input: Self::Input);

    /// Poll the state machine for output, returning the first available output if present.
    fn poll_output(&mut self) -> Option<Self::Output>;
}
