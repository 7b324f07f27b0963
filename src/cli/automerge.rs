//! Automerge command - decide whether an update branch can merge, then merge it

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use mergebot::automerge::{AutomergeOutcome, BranchAutomergeConfig, try_branch_automerge};
use mergebot::emoji::EmojiConfig;
use mergebot::error::{Error, Result};
use mergebot::types::PullRequest;
use std::path::Path;
use std::time::Duration;
use terminal_link::Link;

/// Options for the automerge command
#[derive(Debug, Clone, Default)]
pub struct AutomergeOptions {
    /// Decide without performing the merge
    pub dry_run: bool,
    /// Preview the decision and prompt before merging
    pub confirm: bool,
    /// Print the outcome as JSON
    pub json: bool,
}

/// Run the automerge command
pub async fn run_automerge(
    config_path: Option<&Path>,
    repo_url: Option<&str>,
    branch: &str,
    options: AutomergeOptions,
) -> Result<()> {
    let ctx = CommandContext::new(config_path, repo_url).await?;
    let emoji = ctx.config.emoji();
    let automerge_config = ctx.config.automerge_config(options.dry_run);

    // Confirmation preview runs the same pipeline in dry-run mode, so
    // the user sees the real decision before anything mutates
    if options.confirm && !options.json && !automerge_config.dry_run {
        let preview = BranchAutomergeConfig {
            dry_run: true,
            ..automerge_config
        };
        let outcome = try_branch_automerge(&preview, branch, ctx.platform.as_ref()).await?;

        if outcome != AutomergeOutcome::Automerged {
            report_outcome(branch, outcome, &ctx, &emoji, true).await?;
            return Ok(());
        }

        println!(
            "{} would be merged into {}",
            branch.accent(),
            ctx.config.base_branch.accent()
        );
        if !Confirm::new()
            .with_prompt("Proceed with automerge?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Checking {branch}..."));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = try_branch_automerge(&automerge_config, branch, ctx.platform.as_ref()).await;

    spinner.finish_and_clear();
    let outcome = result?;

    if options.json {
        let payload = serde_json::json!({
            "branch": branch,
            "outcome": outcome,
            "merged": outcome.merged(),
            "dry_run": automerge_config.dry_run,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload)
                .map_err(|e| Error::Internal(format!("Failed to render JSON: {e}")))?
        );
        return Ok(());
    }

    report_outcome(branch, outcome, &ctx, &emoji, automerge_config.dry_run).await
}

/// Print a human-readable line for the pipeline outcome
async fn report_outcome(
    branch: &str,
    outcome: AutomergeOutcome,
    ctx: &CommandContext,
    emoji: &EmojiConfig,
    dry_run: bool,
) -> Result<()> {
    match outcome {
        AutomergeOutcome::NoAutomerge => {
            println!(
                "{} {}",
                branch.accent(),
                "not eligible for automerge (disabled, non-branch automerge, or checks still running)"
                    .muted()
            );
        }
        AutomergeOutcome::BranchStatusError => {
            println!(
                "{}",
                format!("Checks are failing on {branch}, not merging").warn()
            );
        }
        AutomergeOutcome::AbortedPrExists => {
            println!(
                "{}",
                format!("Automerge of {branch} aborted, an open PR exists").warn()
            );
            // Re-fetch for display; the pipeline only reports the outcome
            if let Some(pr) = ctx.platform.get_branch_pr(branch).await? {
                println!("  {}", pr_link(&pr, emoji));
            }
        }
        AutomergeOutcome::Failed => {
            println!(
                "{}",
                format!("Merge of {branch} failed, will retry on the next run").warn()
            );
        }
        AutomergeOutcome::Automerged => {
            if dry_run {
                println!(
                    "{} {} would merge {} into {}",
                    check(),
                    "DRY-RUN:".emphasis(),
                    branch.accent(),
                    ctx.config.base_branch.accent()
                );
            } else {
                println!(
                    "{} {}",
                    check(),
                    emoji.emojify(&format!(
                        "Merged {} into {} :tada:",
                        branch.accent(),
                        ctx.config.base_branch.accent()
                    ))
                );
            }
        }
    }
    Ok(())
}

/// Render a PR reference, as a hyperlink when the terminal supports it
///
/// Titles come from the platform and may contain emoji glyphs; when unicode
/// output is off they are degraded to shortcode tokens. `unemojify` only
/// converts when enabled, so the degradation uses a converting config.
fn pr_link(pr: &PullRequest, emoji: &EmojiConfig) -> String {
    let title = if emoji.unicode_emoji {
        pr.title.clone()
    } else {
        EmojiConfig::new(true).unemojify(&pr.title)
    };
    let label = format!("#{} {}", pr.number, title);
    if supports_hyperlinks::supports_hyperlinks() {
        Link::new(&label, &pr.html_url).to_string()
    } else {
        format!("{label} {}", pr.html_url.muted())
    }
}
