//! The synchronization engine: drives paged retrieval, applies search-term
//! resets, and reflects optimistic mutations remotely with rollback on
//! failure.

use tokio::sync::Mutex;

use crate::error::SyncError;
use crate::model::{BootstrapState, RecordId, Snapshot};
use crate::remote::Gateway;
use crate::window::WindowStore;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// What a [`SyncEngine::load_more`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and merged; `appended` counts records new to the
    /// window (a deduplicated record does not count).
    Loaded { appended: usize },
    /// A page load was already in flight; this intent was coalesced away.
    AlreadyLoading,
    /// The window already covers the whole filtered collection.
    Exhausted,
    /// The response belonged to a superseded search window and was dropped.
    StaleDiscarded,
}

struct Session {
    window: WindowStore,
    selected_count: u64,
}

/// One engine instance per session; construct-and-pass, no ambient state.
///
/// All methods take `&self` and suspend only at gateway calls. The session
/// lock is never held across an await, so local mutations look atomic to
/// other intents and queued intents resume in issue order.
pub struct SyncEngine<G> {
    gateway: G,
    page_size: usize,
    session: Mutex<Session>,
}

impl<G: Gateway> SyncEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_page_size(gateway, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(gateway: G, page_size: usize) -> Self {
        Self {
            gateway,
            page_size,
            session: Mutex::new(Session {
                window: WindowStore::new(),
                selected_count: 0,
            }),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Seeds session state from the remote service and fetches the first
    /// page. Bootstrap failures and missing remote state degrade to
    /// [`BootstrapState::default`] and never block startup.
    pub async fn bootstrap(&self) -> Result<LoadOutcome, SyncError> {
        let state = match self.gateway.bootstrap_state().await {
            Ok(state) => state,
            Err(err) => {
                tracing::debug!(error = %err, "bootstrap degraded to defaults");
                BootstrapState::default()
            }
        };
        {
            let mut session = self.session.lock().await;
            session.selected_count = state.selected_count;
        }
        self.load_more().await
    }

    /// Fetches the next page for the current search term.
    ///
    /// Page loads are strictly serialized: while one is in flight every
    /// further `load_more` coalesces into [`LoadOutcome::AlreadyLoading`]
    /// without touching the gateway. On transport failure the materialized
    /// window stays intact but `has_more` drops to false, halting pagination
    /// until a fresh [`search`](Self::search) re-arms it.
    pub async fn load_more(&self) -> Result<LoadOutcome, SyncError> {
        let (page, term, generation) = {
            let mut session = self.session.lock().await;
            if session.window.in_flight() {
                tracing::debug!("load_more coalesced; page load already in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            if !session.window.has_more() {
                return Ok(LoadOutcome::Exhausted);
            }
            session.window.set_in_flight(true);
            (
                session.window.cursor(),
                session.window.search_term().to_string(),
                session.window.generation(),
            )
        };

        let result = self.gateway.list_page(page, self.page_size, &term).await;

        let mut session = self.session.lock().await;
        session.window.set_in_flight(false);

        if session.window.generation() != generation {
            // The window was reset while this request was in flight; its
            // response must not leak into the new search window. A stale
            // failure must not halt the new window's pagination either.
            tracing::debug!(term, "discarded stale page response");
            return Ok(LoadOutcome::StaleDiscarded);
        }

        match result {
            Ok(fetched) => {
                let before = session.window.len();
                session.window.merge(fetched.records, false);
                session.window.advance_cursor();
                session.window.set_has_more(fetched.has_more);
                Ok(LoadOutcome::Loaded {
                    appended: session.window.len() - before,
                })
            }
            Err(err) => {
                session.window.set_has_more(false);
                Err(err)
            }
        }
    }

    /// Commits a search term: the window resets synchronously (no
    /// suspension), then the first page is requested. A page still in flight
    /// for the previous term is discarded when it arrives.
    pub async fn search(&self, term: &str) -> Result<LoadOutcome, SyncError> {
        {
            let mut session = self.session.lock().await;
            session.window.reset_for_search(term);
        }
        self.load_more().await
    }

    /// Optimistically flips one record's selection and confirms it remotely.
    /// A gateway failure restores the prior value and surfaces the error.
    /// Ids not materialized locally are a no-op, never sent to the gateway.
    pub async fn toggle_select(&self, id: RecordId, selected: bool) -> Result<(), SyncError> {
        let prior = {
            let mut session = self.session.lock().await;
            let Some(prior) = session.window.apply_selection(id, selected) else {
                return Ok(());
            };
            adjust_selected_count(&mut session.selected_count, prior, selected);
            prior
        };

        match self.gateway.set_selection(id, selected).await {
            Ok(()) => Ok(()),
            Err(err) => {
                let mut session = self.session.lock().await;
                if let Some(current) = session.window.apply_selection(id, prior) {
                    adjust_selected_count(&mut session.selected_count, current, prior);
                }
                tracing::warn!(%id, error = %err, "selection rolled back after gateway failure");
                Err(err)
            }
        }
    }

    /// Bulk selection with per-id rollback: the ids may have had
    /// heterogeneous prior states, so failure restores each record's own
    /// value rather than blanket-flipping. The gateway call is
    /// all-or-nothing.
    pub async fn toggle_select_many(
        &self,
        ids: &[RecordId],
        selected: bool,
    ) -> Result<(), SyncError> {
        let priors = {
            let mut session = self.session.lock().await;
            let priors = session.window.apply_selection_many(ids, selected);
            for (_, prior) in &priors {
                adjust_selected_count(&mut session.selected_count, *prior, selected);
            }
            priors
        };

        match self.gateway.set_selection_bulk(ids, selected).await {
            Ok(()) => Ok(()),
            Err(err) => {
                let mut session = self.session.lock().await;
                for (id, prior) in priors {
                    if let Some(current) = session.window.apply_selection(id, prior) {
                        adjust_selected_count(&mut session.selected_count, current, prior);
                    }
                }
                tracing::warn!(
                    count = ids.len(),
                    error = %err,
                    "bulk selection rolled back after gateway failure"
                );
                Err(err)
            }
        }
    }

    /// Moves the record at `from` to `to` and persists the full window
    /// order. On failure the optimistic order is kept — the order write is
    /// idempotent-retryable, and a list that jumps back mid-drag is the
    /// more damaging failure mode — but the error is surfaced for an
    /// upstream retry or warning.
    pub async fn reorder(&self, from: usize, to: usize) -> Result<(), SyncError> {
        if from == to {
            return Ok(());
        }
        let order = {
            let mut session = self.session.lock().await;
            session.window.move_record(from, to)?;
            session.window.ids()
        };

        match self.gateway.set_order(&order).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(error = %err, "order update failed; optimistic order kept");
                Err(err)
            }
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.session.lock().await.window.snapshot()
    }

    /// Collection-wide selected total: seeded from bootstrap, adjusted by
    /// local toggles.
    pub async fn selected_count(&self) -> u64 {
        self.session.lock().await.selected_count
    }
}

fn adjust_selected_count(count: &mut u64, from: bool, to: bool) {
    match (from, to) {
        (false, true) => *count += 1,
        (true, false) => *count = count.saturating_sub(1),
        _ => {}
    }
}
