//! Wrappers that let a runner provide system resources to a [`StateMachine`](super::StateMachine)
//! as ordinary input.

pub mod input;
