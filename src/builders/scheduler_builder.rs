//! Builders to construct schedulers from configuration.

use std::collections::HashMap;

use tracing::info;

use crate::config::SchedulerConfig;
use crate::core::{Scheduler, SchedulerError, Spawn};

/// Build one scheduler per configured lane, all launching work through `spawner`.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidConfig` if the configuration fails validation.
pub fn build_schedulers<T, E, S>(
    cfg: &SchedulerConfig,
    spawner: S,
) -> Result<HashMap<String, Scheduler<T, E, S>>, SchedulerError>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    S: Spawn + Clone + Send + Sync + 'static,
{
    cfg.validate()?;

    let mut schedulers = HashMap::with_capacity(cfg.lanes.len());
    for (name, lane) in &cfg.lanes {
        let scheduler = Scheduler::with_spawner(lane.concurrency_limit, spawner.clone())?;
        info!(lane = %name, concurrency_limit = lane.concurrency_limit, "scheduler lane built");
        schedulers.insert(name.clone(), scheduler);
    }

    Ok(schedulers)
}
