//! A simulated motorized axis for exercising motion-control device support.
//!
//! Each axis models position, velocity and soft limits advancing in real time, and accepts
//! commands through a two-phase transaction queue so that a batch of commands lands atomically
//! between two poll ticks.
//!
//! ```ignore
//! let registry = AxisRegistry::new();
//! let axis = registry.register(AxisConfig::builder().id(1).limit_low(-100).limit_high(100).build())?;
//!
//! // Once every axis is registered
//! let scheduler = PollScheduler::spawn_all(registry.axes());
//!
//! axis.view(|ctx| {
//!     ctx.transaction(|tx| {
//!         tx.build(CommandKind::MoveAbsolute, 50.0)?;
//!         tx.build(CommandKind::SetVelocity, 10.0)?;
//!         tx.build(CommandKind::Go, 0.0)
//!     })
//! })??;
//! ```

pub mod axis;
pub mod axis_context;
pub mod axis_map;
pub mod config;
pub mod registry;
pub mod scheduler;
pub mod state_machine;

pub use axis::AxisId;
pub use axis_context::AxisContext;
pub use config::{AxisConfig, DEFAULT_POLL_RATE_HZ};
pub use registry::{AxisRegistry, RegistryError};
pub use scheduler::{PollScheduler, Pollable};
pub use state_machine::axis::Readback;
pub use state_machine::command::CommandKind;
