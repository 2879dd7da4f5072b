use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the remote service; never reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The unit of the collection. `text` is immutable from the client's
/// perspective; `selected` changes only through the engine's selection
/// operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub text: String,

    #[serde(default)]
    pub selected: bool,
}

/// One page as returned by the remote listing operation.
#[derive(Clone, Debug)]
pub struct Page {
    pub records: Vec<Record>,
    pub has_more: bool,
}

/// Immutable view of the window handed to presentation code.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub records: Vec<Record>,
    pub has_more: bool,
    pub search_term: String,
}

/// Session seed from the remote service. Defaults apply whenever the
/// bootstrap read fails or the state does not exist yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootstrapState {
    pub selected_count: u64,
    pub has_persisted_order: bool,
}
