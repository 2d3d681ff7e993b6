//! # Declarative
//!
//! A framework for reconciling remote objects against declared configuration.
//!
//! This crate provides the core abstractions for declaring desired state,
//! comparing it with observed state, and converging remote systems to match.
//!
//! ## Core Concepts
//!
//! - **Lifecycle**: How one kind of remote object is created, read, updated,
//!   deleted and imported
//! - **Planned**: A configured value that may only be known after apply
//! - **SetDelta**: Elements to add and remove to turn one set into another
//! - **ExecutionPlan**: One planned [`Action`] per resource address
//! - **Executor**: Applies a plan with bounded parallelism
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     execute, AutoConfirm, ExecuteOptions, ExecutionPlan, NoProgress,
//! };
//!
//! let lifecycle = MyLifecycle::new(client);
//!
//! let mut plan = ExecutionPlan::new();
//! for (address, desired) in config {
//!     let actual = state.get(&address).map(|s| lifecycle.read(s)).transpose()?;
//!     plan.add(&lifecycle, address, Some(desired), actual);
//! }
//!
//! let report = execute(
//!     &lifecycle,
//!     &plan,
//!     &ExecuteOptions::default(),
//!     &mut NoProgress,
//!     &mut AutoConfirm,
//! )?;
//! ```
//!
//! ## Provider Traits
//!
//! The crate uses traits for dependency injection:
//!
//! - [`CapabilityGate`]: Answers whether a licensed capability is enabled
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks or license services.

pub mod context;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use context::{
    AllCapabilities, AutoConfirm, AutoDecline, CapabilityGate, ConfirmCallback, NoProgress,
    ProgressCallback,
};
pub use diff::{AttributeChange, ChangeSet, SetDelta, set_delta};
pub use executor::{ChangeOutcome, ExecuteReport, StateUpdate, apply_change, execute};
pub use planner::{Action, ExecutionPlan, PlannedChange, plan_action};
pub use resource::Lifecycle;
pub use types::{ApplyResult, AttrValue, ExecuteOptions, ExecuteSummary, Planned};
