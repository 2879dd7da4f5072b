//! `reqwest` implementation of [`Gateway`] against the reference HTTP API.

use crate::error::SyncError;
use crate::model::{BootstrapState, Page, RecordId};

use super::{
    Ack, Gateway, ListPageResponse, StateResponse, UpdateOrderRequest, UpdateSelectionRequest,
};

pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .user_agent("listsync")
            .build()
            .map_err(|err| transport("build http client", err))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_ack<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
        label: &str,
    ) -> Result<(), SyncError> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| transport(label, err))?;
        let resp = ensure_ok(resp, label).await?;
        let ack: Ack = resp.json().await.map_err(|err| transport(label, err))?;
        if !ack.ok {
            return Err(SyncError::Transport {
                status: None,
                message: format!("{label}: server did not acknowledge"),
            });
        }
        Ok(())
    }
}

fn transport(label: &str, err: reqwest::Error) -> SyncError {
    SyncError::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: format!("{label}: {err}"),
    }
}

async fn ensure_ok(resp: reqwest::Response, label: &str) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        format!("{label}: http {status}")
    } else {
        format!("{label}: http {status}: {body}")
    };
    Err(SyncError::Transport {
        status: Some(status.as_u16()),
        message,
    })
}

impl Gateway for HttpRemote {
    async fn list_page(&self, page: u32, limit: usize, search: &str) -> Result<Page, SyncError> {
        let mut req = self
            .client
            .get(self.url("/items"))
            .query(&[("page", page.to_string()), ("limit", limit.to_string())]);
        if !search.is_empty() {
            req = req.query(&[("search", search)]);
        }
        let resp = req.send().await.map_err(|err| transport("list page", err))?;
        let resp = ensure_ok(resp, "list page").await?;
        let page: ListPageResponse = resp
            .json()
            .await
            .map_err(|err| transport("parse page", err))?;
        Ok(Page {
            records: page.items,
            has_more: page.has_more,
        })
    }

    async fn bootstrap_state(&self) -> Result<BootstrapState, SyncError> {
        let resp = self
            .client
            .get(self.url("/state"))
            .send()
            .await
            .map_err(|err| transport("bootstrap state", err))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound);
        }
        let resp = ensure_ok(resp, "bootstrap state").await?;
        let state: StateResponse = resp
            .json()
            .await
            .map_err(|err| transport("parse state", err))?;
        Ok(state.into_bootstrap())
    }

    async fn set_selection(&self, id: RecordId, selected: bool) -> Result<(), SyncError> {
        self.post_ack(
            "/update-selection",
            &UpdateSelectionRequest {
                id: Some(id),
                ids: None,
                selected,
            },
            "set selection",
        )
        .await
    }

    async fn set_selection_bulk(
        &self,
        ids: &[RecordId],
        selected: bool,
    ) -> Result<(), SyncError> {
        self.post_ack(
            "/update-selection",
            &UpdateSelectionRequest {
                id: None,
                ids: Some(ids.to_vec()),
                selected,
            },
            "set selection bulk",
        )
        .await
    }

    async fn set_order(&self, ids_in_order: &[RecordId]) -> Result<(), SyncError> {
        self.post_ack(
            "/update-order",
            &UpdateOrderRequest {
                order: ids_in_order.to_vec(),
            },
            "set order",
        )
        .await
    }
}
