/// The [`SystemResource`] trait marks a type that can only be produced from the ambient system
/// context, such as the current time.
///
/// Runners call [`generate`](SystemResource::generate) and hand the value to a
/// [`StateMachine`](crate::state_machine::StateMachine) as input, keeping the machine itself pure.
pub trait SystemResource {
    /// Produce an instance of this resource from the implicit system context.
    fn generate() -> Self;
}

/// Follows the tokio clock, which tests can pause and advance.
impl SystemResource for tokio::time::Instant {
    fn generate() -> Self {
        tokio::time::Instant::now()
    }
}
