// SPDX-License-Identifier: Apache-2.0

//! Issue listing and detail commands.

use anyhow::Result;
use rbtriage_core::{IssueDetail, IssueFilters, ItemCounter, RollbarApi, TriageService};
use tracing::debug;

use super::types::IssueListResult;

/// Lists the top active issues.
pub async fn active<A: RollbarApi>(
    service: &TriageService<A>,
    limit: i64,
    filters: &IssueFilters,
) -> Result<IssueListResult> {
    let issues = service.active(limit, filters).await?;
    debug!(count = issues.len(), "Listed active issues");
    Ok(IssueListResult { issues })
}

/// Lists the most recently seen active issues.
pub async fn recent<A: RollbarApi>(
    service: &TriageService<A>,
    limit: i64,
    filters: &IssueFilters,
) -> Result<IssueListResult> {
    let issues = service.recent(limit, filters).await?;
    debug!(count = issues.len(), "Listed recent issues");
    Ok(IssueListResult { issues })
}

/// Shows one issue with its main error.
pub async fn show<A: RollbarApi>(
    service: &TriageService<A>,
    counter: ItemCounter,
) -> Result<IssueDetail> {
    service.show(counter).await
}
