//! DTOs and payload types for the JSON-over-HTTP gateway binding. The same
//! shapes are served by `listsync-server`.

use serde::{Deserialize, Serialize};

use crate::model::{BootstrapState, Record, RecordId};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPageResponse {
    pub items: Vec<Record>,
    pub has_more: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// `GET /state` response. Current servers send `selectedCount` and
/// `hasPersistedOrder`; older ones sent raw `order`/`selected` arrays. Both
/// shapes normalize through [`StateResponse::into_bootstrap`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_persisted_order: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<RecordId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Vec<RecordId>>,
}

impl StateResponse {
    pub fn into_bootstrap(self) -> BootstrapState {
        let selected_count = self
            .selected_count
            .or_else(|| self.selected.as_ref().map(|s| s.len() as u64))
            .unwrap_or(0);
        let has_persisted_order = self
            .has_persisted_order
            .unwrap_or_else(|| self.order.as_ref().is_some_and(|o| !o.is_empty()));
        BootstrapState {
            selected_count,
            has_persisted_order,
        }
    }
}

/// `POST /update-selection` body: exactly one of `id` (single) or `ids`
/// (bulk) is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSelectionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<RecordId>>,

    pub selected: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    pub order: Vec<RecordId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}
