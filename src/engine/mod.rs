//! Execution engine for groupctl
//!
//! The engine orchestrates:
//! 1. Refreshing - Re-read recorded groups, dropping deleted ones
//! 2. Planning - Diff the groups file against refreshed state
//! 3. Executing - Apply changes with progress and confirmation

pub mod differ;
pub mod executor;
pub mod planner;

pub use differ::display_plan;
pub use executor::{BarProgress, PromptConfirm, print_summary};
pub use planner::{GroupPlan, RefreshReport, build_plan, destroy_plan, refresh_state};
