use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use msim::axis_map::axis_ref::AxisRef;
use msim::{AxisConfig, AxisContext, AxisId, AxisRegistry, CommandKind, PollScheduler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

const MOVE_COMMANDS: [CommandKind; 2] = [CommandKind::MoveAbsolute, CommandKind::MoveRelative];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let axis_count: i32 = env_or("MSIM_AXES", 2)?;
    let poll_rate_hz: f64 = env_or("MSIM_POLL_RATE_HZ", 4.0)?;
    let limit: i32 = env_or("MSIM_LIMIT", 1000)?;
    let seed: u64 = env_or("MSIM_SEED", 0)?;
    let run_secs: u64 = env_or("MSIM_RUN_SECS", 10)?;
    anyhow::ensure!(axis_count > 0, "MSIM_AXES must be at least 1");
    anyhow::ensure!(limit >= 0, "MSIM_LIMIT must not be negative");

    let registry = Arc::new(AxisRegistry::new());
    for id in 1..=axis_count {
        let config = AxisConfig::builder()
            .id(id)
            .limit_low(-limit)
            .limit_high(limit)
            .poll_rate_hz(poll_rate_hz)
            .initial_position(0.0)
            .build();
        registry
            .register(config)
            .with_context(|| format!("failed to register axis {id}"))?;
    }

    // Every axis is registered; polling may start.
    let scheduler = PollScheduler::spawn_all(registry.axes());

    for axis in registry.axes().axes() {
        spawn_readback_consumer(axis)?;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut ticker = tokio::time::interval(Duration::from_secs(2));
    let deadline = tokio::time::sleep(Duration::from_secs(run_secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let axis_id = AxisId::new(rng.random_range(1..=axis_count));
                let kind = MOVE_COMMANDS[rng.random_range(0..MOVE_COMMANDS.len())];
                let distance = f64::from(rng.random_range(-limit..=limit));
                let velocity = rng.random_range(50.0..500.0);

                if let Err(e) = send_move(&registry, axis_id, kind, distance, velocity) {
                    warn!(axis_id = %axis_id, error = %e, "Failed to command axis");
                }
            }

            _ = &mut deadline => break,
        }
    }

    scheduler.shutdown().await;

    for (axis_id, readback) in registry.report() {
        info!(
            axis_id = %axis_id,
            position = readback.position,
            low_limit = readback.limit_low_hit,
            high_limit = readback.limit_high_hit,
            moving = readback.moving,
            "Final state"
        );
    }

    Ok(())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Log every readback an axis produces, consuming its data-ready flag.
fn spawn_readback_consumer(axis: AxisRef<AxisContext>) -> Result<()> {
    let signal = axis
        .view(AxisContext::data_ready_signal)
        .map_err(|e| anyhow::anyhow!("axis context no longer valid: {e}"))?;

    tokio::spawn(async move {
        loop {
            signal.notified().await;
            match axis.view(AxisContext::read_values) {
                Ok(Some(readback)) => info!(
                    axis_id = %axis.id(),
                    position = readback.position,
                    moving = readback.moving,
                    "Readback"
                ),
                Ok(None) => {}
                Err(_) => break,
            }
        }
    });

    Ok(())
}

fn send_move(
    registry: &AxisRegistry,
    axis_id: AxisId,
    kind: CommandKind,
    distance: f64,
    velocity: f64,
) -> Result<()> {
    let axis = registry.lookup(axis_id)?;

    let applied = axis
        .view(|ctx| {
            ctx.transaction(|tx| {
                tx.build(CommandKind::SetVelocity, velocity)?;
                tx.build(kind, distance)?;
                tx.build(CommandKind::Go, 0.0)
            })
        })
        .map_err(|e| anyhow::anyhow!("axis context no longer valid: {e}"))??;

    info!(axis_id = %axis_id, ?kind, distance, velocity, applied, "Sent move");

    Ok(())
}
