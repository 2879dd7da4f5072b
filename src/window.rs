use std::collections::{HashMap, HashSet};

use crate::error::SyncError;
use crate::model::{Record, RecordId, Snapshot};

pub const FIRST_PAGE: u32 = 1;

/// The locally materialized window of the remote collection.
///
/// Owns the ordered, deduplicated record sequence, the pagination cursor and
/// the "more data available" flag. Exclusively mutated by
/// [`SyncEngine`](crate::engine::SyncEngine); presentation code only sees
/// clones through [`WindowStore::snapshot`].
#[derive(Debug)]
pub struct WindowStore {
    records: Vec<Record>,
    cursor: u32,
    has_more: bool,
    search_term: String,
    in_flight: bool,
    generation: u64,
}

impl Default for WindowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            cursor: FIRST_PAGE,
            has_more: true,
            search_term: String::new(),
            in_flight: false,
            generation: 0,
        }
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Guard against overlapping page loads.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }

    /// Tag for in-flight page requests; bumped on every reset so a response
    /// belonging to a superseded search window can be recognized and
    /// discarded on arrival.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Appends a page of records (or replaces the window when `reset`),
    /// deduplicating by id in O(n). The first occurrence keeps its position;
    /// the last occurrence's fields win, so a freshly fetched record
    /// overrides a stale duplicate from an earlier page. Duplicates within a
    /// single page resolve the same way.
    pub fn merge(&mut self, new_records: Vec<Record>, reset: bool) {
        if reset {
            self.records.clear();
        }
        let mut index: HashMap<RecordId, usize> = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id, pos))
            .collect();
        for record in new_records {
            match index.get(&record.id) {
                Some(&pos) => self.records[pos] = record,
                None => {
                    index.insert(record.id, self.records.len());
                    self.records.push(record);
                }
            }
        }
    }

    pub fn advance_cursor(&mut self) {
        self.cursor = self.cursor.saturating_add(1);
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    /// Clears the window for a newly committed search term: records emptied,
    /// cursor back to the first page, `has_more` optimistic again.
    pub fn reset_for_search(&mut self, term: &str) {
        self.records.clear();
        self.cursor = FIRST_PAGE;
        self.has_more = true;
        self.search_term = term.to_string();
        self.generation += 1;
    }

    /// Sets `selected` on the matching record and returns the prior value.
    /// Unknown ids are a no-op (`None`).
    pub fn apply_selection(&mut self, id: RecordId, selected: bool) -> Option<bool> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        let prior = record.selected;
        record.selected = selected;
        Some(prior)
    }

    /// Bulk variant of [`apply_selection`](Self::apply_selection). Returns
    /// the prior value of every id that was present, so a failed remote call
    /// can restore each record's own state.
    pub fn apply_selection_many(
        &mut self,
        ids: &[RecordId],
        selected: bool,
    ) -> Vec<(RecordId, bool)> {
        let wanted: HashSet<RecordId> = ids.iter().copied().collect();
        let mut priors = Vec::new();
        for record in &mut self.records {
            if wanted.contains(&record.id) {
                priors.push((record.id, record.selected));
                record.selected = selected;
            }
        }
        priors
    }

    /// Reorders the window to match `new_ordered_ids`, which must be a
    /// permutation of the currently held ids.
    pub fn apply_order(&mut self, new_ordered_ids: &[RecordId]) -> Result<(), SyncError> {
        if new_ordered_ids.len() != self.records.len() {
            return Err(SyncError::OrderMismatch(format!(
                "expected {} ids, got {}",
                self.records.len(),
                new_ordered_ids.len()
            )));
        }
        let held: HashSet<RecordId> = self.records.iter().map(|r| r.id).collect();
        let mut seen = HashSet::new();
        for id in new_ordered_ids {
            if !held.contains(id) {
                return Err(SyncError::unknown_id(*id));
            }
            if !seen.insert(*id) {
                return Err(SyncError::OrderMismatch(format!("duplicate id {id}")));
            }
        }

        // Equal length, all known, no duplicates: an exact permutation.
        let mut by_id: HashMap<RecordId, Record> =
            self.records.drain(..).map(|r| (r.id, r)).collect();
        self.records = new_ordered_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        Ok(())
    }

    /// Splices the record at `from` to position `to`, the shape a
    /// drag-and-drop gesture produces.
    pub fn move_record(&mut self, from: usize, to: usize) -> Result<(), SyncError> {
        let len = self.records.len();
        if from >= len {
            return Err(SyncError::InvalidIndex { index: from, len });
        }
        if to >= len {
            return Err(SyncError::InvalidIndex { index: to, len });
        }
        let record = self.records.remove(from);
        self.records.insert(to, record);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            records: self.records.clone(),
            has_more: self.has_more,
            search_term: self.search_term.clone(),
        }
    }
}
