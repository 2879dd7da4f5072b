//! Remote service boundary: the [`Gateway`] contract consumed by the engine
//! and its JSON-over-HTTP reference binding.

use crate::error::SyncError;
use crate::model::{BootstrapState, Page, RecordId};

mod types;
pub use self::types::*;
mod http;
pub use self::http::HttpRemote;

/// Operations the engine needs from the remote service.
///
/// Every call suspends the caller until a response or failure arrives.
/// `list_page` is serialized by the engine; mutations are issued one intent
/// at a time with the local state already updated.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Fetches one page of the collection filtered by `search`. `page` is
    /// 1-based; the returned `has_more` says whether `page + 1` is worth
    /// requesting.
    async fn list_page(&self, page: u32, limit: usize, search: &str) -> Result<Page, SyncError>;

    /// Best-effort session seed. Callers treat both failure and
    /// [`SyncError::NotFound`] as [`BootstrapState::default`], never as
    /// fatal.
    async fn bootstrap_state(&self) -> Result<BootstrapState, SyncError>;

    async fn set_selection(&self, id: RecordId, selected: bool) -> Result<(), SyncError>;

    /// All-or-nothing bulk selection update: on failure the service applies
    /// none of the ids.
    async fn set_selection_bulk(
        &self,
        ids: &[RecordId],
        selected: bool,
    ) -> Result<(), SyncError>;

    /// Persists the full window order.
    async fn set_order(&self, ids_in_order: &[RecordId]) -> Result<(), SyncError>;
}
