use crate::model::RecordId;

/// Failure taxonomy for gateway calls and local mutations.
///
/// Stale page responses are not errors: the engine reports them as
/// [`LoadOutcome::StaleDiscarded`](crate::engine::LoadOutcome) and never
/// surfaces them to callers.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Network or HTTP failure. `status` is present when the server answered.
    #[error("transport failure: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The remote resource does not exist. Produced by bootstrap reads,
    /// where the engine degrades it to the default state.
    #[error("remote state not found")]
    NotFound,

    /// A reorder index outside the materialized window.
    #[error("index {index} out of bounds (window holds {len} records)")]
    InvalidIndex { index: usize, len: usize },

    /// An order sequence that is not a permutation of the held ids.
    #[error("order mismatch: {0}")]
    OrderMismatch(String),
}

impl SyncError {
    pub fn unknown_id(id: RecordId) -> Self {
        Self::OrderMismatch(format!("id {id} not materialized locally"))
    }
}
