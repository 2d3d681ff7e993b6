//! # groupkit
//!
//! Pure Rust client for the groups API of a Coder deployment.
//!
//! This crate provides:
//! - The [`Backend`] trait covering every group and organization call the
//!   reconciler needs
//! - [`HttpBackend`], a blocking REST implementation on `ureq`
//! - [`MockBackend`], an in-memory deployment that records calls
//! - Wire types and an error taxonomy with user-facing advice
//!
//! ## Example
//!
//! ```no_run
//! use groupkit::{Backend, HttpBackend, PatchGroupRequest};
//!
//! let backend = HttpBackend::new("https://coder.example.com", "session-token");
//!
//! let org = backend.organization_by_name("acme").unwrap();
//! let group = backend.group_by_org_and_name(org.id, "devs").unwrap();
//!
//! backend
//!     .patch_group(
//!         group.id,
//!         &PatchGroupRequest {
//!             quota_allowance: Some(10),
//!             ..Default::default()
//!         },
//!     )
//!     .unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::http::HttpBackend;
pub use backend::{Backend, MockBackend, MockCall};
pub use error::{Error, ErrorCategory, Result};
pub use types::{
    CreateGroupRequest, Entitlements, FEATURE_TEMPLATE_RBAC, Feature, Group, GroupSource, Member,
    Organization, PatchGroupRequest,
};
