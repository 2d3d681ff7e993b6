//! Lifecycle trait for declarative state management
//!
//! A lifecycle describes how one kind of remote object is created, observed,
//! changed and destroyed. The planner and executor drive it; implementations
//! only decide which remote calls to make.

use crate::diff::AttributeChange;

/// Core trait for a managed resource kind
///
/// `Config` is the desired snapshot (may contain values unknown until
/// apply), `State` the last observed snapshot (always fully resolved) and
/// `Id` the canonical remote identity.
///
/// Every operation runs to completion on the calling thread. Operations on
/// different objects may run concurrently, so implementations must not keep
/// per-object mutable state.
///
/// # Example
///
/// ```ignore
/// use declarative::{AttributeChange, ChangeSet, Lifecycle};
///
/// struct Files;
///
/// impl Lifecycle for Files {
///     type Config = FileConfig;
///     type State = FileState;
///     type Id = PathBuf;
///     type Error = std::io::Error;
///
///     fn resource_type(&self) -> &'static str { "file" }
///
///     fn create(&self, desired: &FileConfig) -> Result<FileState, std::io::Error> {
///         std::fs::write(&desired.path, &desired.content)?;
///         Ok(FileState::from(desired))
///     }
///
///     fn changes(&self, desired: &FileConfig, actual: &FileState) -> Vec<AttributeChange> {
///         ChangeSet::new()
///             .compare("content", actual.content_value(), desired.content_value())
///             .compare_replacing("path", actual.path_value(), desired.path_value())
///             .finish()
///     }
///
///     // read, update, delete, import ...
/// }
/// ```
pub trait Lifecycle: Send + Sync {
    /// Desired-state snapshot
    type Config: Clone + Send + Sync;
    /// Actual-state snapshot
    type State: Clone + Send + Sync;
    /// Canonical identity of a remote object
    type Id: Clone + Send + Sync;
    /// Error returned by lifecycle operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resource type name used in addresses ("group" in "group.devs")
    fn resource_type(&self) -> &'static str;

    /// Create the object and return its first observed state
    fn create(&self, desired: &Self::Config) -> Result<Self::State, Self::Error>;

    /// Observe the object recorded in `prior`
    fn read(&self, prior: &Self::State) -> Result<Self::State, Self::Error>;

    /// Converge an existing object toward `desired`
    fn update(
        &self,
        desired: &Self::Config,
        prior: &Self::State,
    ) -> Result<Self::State, Self::Error>;

    /// Destroy the object recorded in `prior`
    fn delete(&self, prior: &Self::State) -> Result<(), Self::Error>;

    /// Resolve an externally supplied identifier to a canonical ID
    fn import(&self, identifier: &str) -> Result<Self::Id, Self::Error>;

    /// Minimal state for a freshly imported ID; a `read` fills in the rest
    fn imported_state(&self, id: Self::Id) -> Self::State;

    /// Canonical ID recorded in a state snapshot
    fn id_of(&self, state: &Self::State) -> Self::Id;

    /// Attribute-level differences between desired and actual state
    ///
    /// An empty list means the object is converged.
    fn changes(&self, desired: &Self::Config, actual: &Self::State) -> Vec<AttributeChange>;

    /// Whether reaching `desired` needs destroy + create
    fn requires_replace(&self, desired: &Self::Config, actual: &Self::State) -> bool {
        self.changes(desired, actual)
            .iter()
            .any(|c| c.forces_replacement)
    }

    /// State left behind by a failed operation, if the object exists anyway
    ///
    /// Create may fail after the remote object was made. Returning the state
    /// here lets the caller keep tracking it instead of creating a duplicate.
    fn salvage(&self, _error: &Self::Error) -> Option<Self::State> {
        None
    }
}
