// skylark_core/src/errors.rs

use thiserror::Error;

/// Everything that can go wrong while turning a spawn marker into live
/// entities.
///
/// Each spawn point is an independent unit of failure: none of these abort
/// world setup as a whole, and none of them trigger a retry at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The marker metadata is unusable. Raised before any load is
    /// requested.
    #[error("malformed spawn marker: {0}")]
    MalformedDescriptor(String),

    /// The type tag was present but no constructor is registered for it.
    /// The sequence aborts; the already-completed model load is wasted.
    #[error("unknown vehicle type tag `{0}`")]
    UnknownEntityType(String),

    /// The external loader reported failure for the given asset path.
    /// Terminal for the owning spawn point only.
    #[error("failed to load model asset `{0}`")]
    AssetLoadFailure(String),

    /// The named path node exists in no path. Non-fatal: the character
    /// stays bound to its seat with no behavior.
    #[error("path node `{0}` not found in any path")]
    BehaviorAnchorNotFound(String),
}
