//! Windowed synchronization of a remote-owned, ordered record collection.
//!
//! A single authoritative copy of up to a million records lives behind a
//! remote service; the client materializes only a growing, deduplicated
//! window of it. [`engine::SyncEngine`] reconciles that window against the
//! paginated listing protocol, search-term resets, and optimistic selection
//! and reorder mutations, rolling local state back when the remote write
//! fails. [`remote::HttpRemote`] is the JSON-over-HTTP binding of the
//! gateway contract, served for development by the `listsync-server` binary.

pub mod engine;
pub mod error;
pub mod model;
pub mod remote;
pub mod window;
