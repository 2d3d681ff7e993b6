//! Provider traits for execution
//!
//! These traits allow the declarative crate to be used without
//! depending on specific implementations of prompts, progress bars,
//! or license checks.

use crate::planner::Action;
use crate::types::ApplyResult;
use anyhow::Result;

/// Lookup for licensed capabilities
///
/// Lifecycles consult a gate before mutating anything that needs a
/// capability the remote deployment may not be entitled to.
pub trait CapabilityGate: Send + Sync {
    /// Whether `capability` is enabled
    fn is_enabled(&self, capability: &str) -> bool;
}

impl<F> CapabilityGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_enabled(&self, capability: &str) -> bool {
        self(capability)
    }
}

/// Gate that enables every capability
pub struct AllCapabilities;

impl CapabilityGate for AllCapabilities {
    fn is_enabled(&self, _capability: &str) -> bool {
        true
    }
}

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback: Send {
    /// Called before a batch of changes starts
    fn on_batch_start(&mut self, count: usize);

    /// Called when a single change completes
    fn on_change_complete(&mut self, address: &str, action: Action, result: &ApplyResult);

    /// Called when the batch completes
    fn on_batch_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback: Send {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize) {}
    fn on_change_complete(&mut self, _address: &str, _action: Action, _result: &ApplyResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_gate() {
        let gate = |capability: &str| capability == "template_rbac";
        assert!(gate.is_enabled("template_rbac"));
        assert!(!gate.is_enabled("audit_log"));
    }

    #[test]
    fn test_all_capabilities() {
        assert!(AllCapabilities.is_enabled("anything"));
    }
}
