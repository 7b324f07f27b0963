//! Branch automerge engine
//!
//! Decides, for a single update branch, whether it may be merged
//! automatically, and performs the merge when it may. The decision runs as a
//! short-circuit pipeline:
//!
//! 1. Config check - automerge on, and configured to merge the branch
//!    directly (pure, no I/O)
//! 2. Branch status - aggregate CI result fetched from the platform
//! 3. Existing PR check - an open PR on the branch aborts the merge
//! 4. Merge - skipped but reported successful under dry-run
//!
//! Each invocation is independent and branch-scoped: nothing is cached
//! between calls, and the pipeline holds no state of its own. Status and PR
//! lookup failures propagate to the caller; merge failures are caught and
//! reported as the [`AutomergeOutcome::Failed`] outcome (a failed merge is a
//! routine per-branch result, a broken platform is not).

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::BranchStatus;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How an eligible branch gets merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomergeType {
    /// Merge the branch directly, without opening a PR.
    Branch,
    /// Open a PR and merge it once mergeable (handled elsewhere).
    Pr,
    /// Open a PR and merge it on an approval comment (handled elsewhere).
    PrComment,
}

impl std::fmt::Display for AutomergeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Branch => write!(f, "branch"),
            Self::Pr => write!(f, "pr"),
            Self::PrComment => write!(f, "pr-comment"),
        }
    }
}

/// Per-run automerge configuration, read-only for the engine.
///
/// Built once per invocation by the caller; in particular `dry_run` is
/// captured here before the pipeline starts, so a flag change elsewhere can
/// never produce a half-simulated run.
#[derive(Debug, Clone, Copy)]
pub struct BranchAutomergeConfig {
    /// Whether automerge is enabled at all.
    pub automerge: bool,
    /// Which merge mechanism is configured.
    pub automerge_type: AutomergeType,
    /// Simulation mode: report success without mutating the remote.
    pub dry_run: bool,
}

impl BranchAutomergeConfig {
    /// Whether this configuration asks for direct branch automerge.
    ///
    /// Pure predicate: `Pr` and `PrComment` mechanisms are handled by other
    /// workers and fail this check.
    #[must_use]
    pub const fn wants_branch_automerge(&self) -> bool {
        self.automerge && matches!(self.automerge_type, AutomergeType::Branch)
    }
}

/// Terminal result of an automerge attempt.
///
/// A closed set: callers match on it exhaustively, and no new outcome can be
/// introduced without the compiler flagging every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomergeOutcome {
    /// Automerge not applicable: disabled, wrong mechanism, or branch not
    /// yet green. Revisit on a later run.
    NoAutomerge,
    /// Branch checks are in a known-failed state.
    BranchStatusError,
    /// An open PR already exists for the branch; merging underneath it
    /// would bypass a review the user evidently wants.
    AbortedPrExists,
    /// Merge was attempted and failed.
    Failed,
    /// Merge succeeded, or was simulated successfully under dry-run.
    Automerged,
}

impl AutomergeOutcome {
    /// Whether the branch ended up merged (or dry-run-merged).
    #[must_use]
    pub const fn merged(self) -> bool {
        matches!(self, Self::Automerged)
    }
}

impl std::fmt::Display for AutomergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAutomerge => write!(f, "no automerge"),
            Self::BranchStatusError => write!(f, "branch status error"),
            Self::AbortedPrExists => write!(f, "automerge aborted - PR exists"),
            Self::Failed => write!(f, "failed"),
            Self::Automerged => write!(f, "automerged"),
        }
    }
}

/// Try to automerge a single branch.
///
/// Runs the full decision pipeline against the given platform service and
/// returns exactly one [`AutomergeOutcome`]. The branch status and PR
/// presence are fetched fresh for this call; nothing is cached.
///
/// # Errors
///
/// Returns `Err` only when a status or PR *lookup* fails (platform outage is
/// not a merge-eligibility signal and must not masquerade as one). A failing
/// *merge* call is caught here and reported as `Failed`.
pub async fn try_branch_automerge(
    config: &BranchAutomergeConfig,
    branch: &str,
    platform: &dyn PlatformService,
) -> Result<AutomergeOutcome> {
    debug!(branch, "checking if branch can be automerged");

    if !config.wants_branch_automerge() {
        debug!(
            automerge = config.automerge,
            automerge_type = %config.automerge_type,
            "not configured for branch automerge"
        );
        return Ok(AutomergeOutcome::NoAutomerge);
    }

    match platform.get_branch_status(branch).await? {
        BranchStatus::Success => {}
        BranchStatus::Failure => {
            debug!(branch, "branch status is failure");
            return Ok(AutomergeOutcome::BranchStatusError);
        }
        BranchStatus::Pending => {
            debug!(branch, "branch status is pending - skipping automerge");
            return Ok(AutomergeOutcome::NoAutomerge);
        }
    }

    if let Some(pr) = platform.get_branch_pr(branch).await? {
        debug!(branch, pr_number = pr.number, "open PR exists - aborting automerge");
        return Ok(AutomergeOutcome::AbortedPrExists);
    }

    if config.dry_run {
        info!(branch, "DRY-RUN: would automerge branch");
        return Ok(AutomergeOutcome::Automerged);
    }

    debug!(branch, "automerging branch");
    match platform.merge_branch(branch).await {
        Ok(()) => {
            info!(branch, "branch automerged");
            Ok(AutomergeOutcome::Automerged)
        }
        Err(err) => {
            info!(branch, %err, "failed to automerge branch");
            Ok(AutomergeOutcome::Failed)
        }
    }
}
