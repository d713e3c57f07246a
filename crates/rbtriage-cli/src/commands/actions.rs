// SPDX-License-Identifier: Apache-2.0

//! Issue state changes: resolve, reopen and mute.

use anyhow::Result;
use rbtriage_core::{ItemActionResult, ItemCounter, RollbarApi, TriageService};
use tracing::info;

/// Marks an issue resolved.
pub async fn resolve<A: RollbarApi>(
    service: &TriageService<A>,
    counter: ItemCounter,
    resolved_in_version: Option<&str>,
) -> Result<ItemActionResult> {
    let result = service
        .resolve(counter, resolved_in_version.unwrap_or_default())
        .await?;
    info!(counter = %counter, "Resolved issue");
    Ok(result)
}

/// Reactivates an issue.
pub async fn reopen<A: RollbarApi>(
    service: &TriageService<A>,
    counter: ItemCounter,
) -> Result<ItemActionResult> {
    let result = service.reopen(counter).await?;
    info!(counter = %counter, "Reopened issue");
    Ok(result)
}

/// Mutes an issue, optionally for a fixed number of seconds.
pub async fn mute<A: RollbarApi>(
    service: &TriageService<A>,
    counter: ItemCounter,
    duration_seconds: Option<u64>,
) -> Result<ItemActionResult> {
    let result = service.mute(counter, duration_seconds).await?;
    info!(counter = %counter, ?duration_seconds, "Muted issue");
    Ok(result)
}
