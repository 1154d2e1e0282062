use crate::entity::EntityId;

/// Alias for `Result<T, HfError>`.
pub type HfResult<T> = Result<T, HfError>;

/// Errors raised for caller mistakes when manipulating a world.
///
/// Rejections that the simulation expects during normal play (a house that
/// is already claimed, a depleted node) are not errors; they are reported by
/// the engine as action outcomes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HfError {
    /// The requested entity ID does not exist in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A position with a NaN or infinite coordinate was supplied.
    #[error("invalid position ({x}, {z}): coordinates must be finite")]
    InvalidPosition {
        /// The x coordinate as given.
        x: f64,
        /// The z coordinate as given.
        z: f64,
    },
}
