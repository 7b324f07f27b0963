//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use mergebot::error::{Error, Result};
use mergebot::platform::PlatformService;
use mergebot::types::{BranchStatus, PlatformConfig, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall,
/// because mockall has issues with methods returning references.
///
/// Features:
/// - Configurable responses per branch
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    status_responses: Mutex<HashMap<String, BranchStatus>>,
    pr_responses: Mutex<HashMap<String, Option<PullRequest>>>,
    // Call tracking
    status_calls: Mutex<Vec<String>>,
    pr_calls: Mutex<Vec<String>>,
    merge_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_status: Mutex<Option<String>>,
    error_on_pr: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            status_responses: Mutex::new(HashMap::new()),
            pr_responses: Mutex::new(HashMap::new()),
            status_calls: Mutex::new(Vec::new()),
            pr_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_status: Mutex::new(None),
            error_on_pr: Mutex::new(None),
            error_on_merge: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `get_branch_status` return an error
    pub fn fail_get_branch_status(&self, msg: &str) {
        *self.error_on_status.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_branch_pr` return an error
    pub fn fail_get_branch_pr(&self, msg: &str) {
        *self.error_on_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_branch` return an error
    pub fn fail_merge_branch(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Response configuration ===

    /// Set the response for `get_branch_status` for a specific branch
    pub fn set_branch_status(&self, branch: &str, status: BranchStatus) {
        self.status_responses
            .lock()
            .unwrap()
            .insert(branch.to_string(), status);
    }

    /// Set the response for `get_branch_pr` for a specific branch
    pub fn set_branch_pr(&self, branch: &str, pr: Option<PullRequest>) {
        self.pr_responses
            .lock()
            .unwrap()
            .insert(branch.to_string(), pr);
    }

    /// Helper to set up a branch that is eligible to merge: green CI, no PR
    pub fn setup_green_branch(&self, branch: &str) {
        self.set_branch_status(branch, BranchStatus::Success);
        self.set_branch_pr(branch, None);
    }

    // === Call verification methods ===

    /// Get all branches that `get_branch_status` was called with
    pub fn get_status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    /// Get all branches that `get_branch_pr` was called with
    pub fn get_pr_calls(&self) -> Vec<String> {
        self.pr_calls.lock().unwrap().clone()
    }

    /// Get all branches that `merge_branch` was called with
    pub fn get_merge_calls(&self) -> Vec<String> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Assert that `merge_branch` was called for a specific branch
    pub fn assert_merge_called(&self, branch: &str) {
        let calls = self.get_merge_calls();
        assert!(
            calls.contains(&branch.to_string()),
            "Expected merge_branch({branch}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_branch` was NOT called
    pub fn assert_merge_not_called(&self) {
        let calls = self.get_merge_calls();
        assert!(
            calls.is_empty(),
            "Expected merge_branch NOT to be called but it was: {calls:?}"
        );
    }

    /// Assert that no platform method was called at all
    pub fn assert_no_calls(&self) {
        let status = self.get_status_calls();
        let prs = self.get_pr_calls();
        let merges = self.get_merge_calls();
        assert!(
            status.is_empty() && prs.is_empty() && merges.is_empty(),
            "Expected no platform calls but got: status={status:?} pr={prs:?} merge={merges:?}"
        );
    }

    /// Get count of merge_branch calls
    pub fn merge_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_branch_status(&self, branch: &str) -> Result<BranchStatus> {
        self.status_calls.lock().unwrap().push(branch.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_status.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.status_responses.lock().unwrap();
        responses.get(branch).copied().ok_or_else(|| {
            Error::Platform(format!("get_branch_status: no response configured for {branch}"))
        })
    }

    async fn get_branch_pr(&self, branch: &str) -> Result<Option<PullRequest>> {
        self.pr_calls.lock().unwrap().push(branch.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.pr_responses.lock().unwrap();
        Ok(responses.get(branch).cloned().flatten())
    }

    async fn merge_branch(&self, branch: &str) -> Result<()> {
        self.merge_calls.lock().unwrap().push(branch.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
