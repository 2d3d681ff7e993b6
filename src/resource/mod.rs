//! Managed group resource
//!
//! - [`group`]: the lifecycle controller and its state snapshots
//! - [`import`]: import identifier resolution
//! - [`members`]: membership deltas
//! - [`error`]: lifecycle failures

pub mod error;
pub mod group;
pub mod import;
pub mod members;

pub use error::ReconcileError;
pub use group::{DesiredGroup, GroupController, GroupState, RESOURCE_TYPE};
