//! In-memory collection behind the reference server: a dense range of
//! records `1..=count` with text `"Item {id}"`, a selection set, and a
//! client-controlled order.

use std::collections::HashSet;

use listsync::model::{Record, RecordId};

pub struct Collection {
    order: Vec<u64>,
    selected: HashSet<u64>,
    persisted_order: bool,
}

impl Collection {
    pub fn new(count: u64) -> Self {
        Self {
            order: (1..=count).collect(),
            selected: HashSet::new(),
            persisted_order: false,
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        // Ids are dense; `order` is always a permutation of 1..=count.
        id >= 1 && id <= self.order.len() as u64
    }

    pub fn selected_count(&self) -> u64 {
        self.selected.len() as u64
    }

    pub fn has_persisted_order(&self) -> bool {
        self.persisted_order
    }

    pub fn set_selection(&mut self, id: u64, selected: bool) {
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// Applies a client window order by splicing the given ids to the front,
    /// keeping the relative order of everything else. The windowed client
    /// always sends the front of the collection, so this preserves its view.
    pub fn apply_order(&mut self, ids: &[u64]) {
        let given: HashSet<u64> = ids.iter().copied().collect();
        let mut next = Vec::with_capacity(self.order.len());
        next.extend_from_slice(ids);
        next.extend(self.order.iter().copied().filter(|id| !given.contains(id)));
        self.order = next;
        self.persisted_order = true;
    }

    /// One page of the filtered collection (`page` is 1-based). Returns the
    /// page items, whether more matches follow, and the total match count.
    pub fn page(&self, page: u32, limit: usize, search: &str) -> (Vec<Record>, bool, u64) {
        let needle = search.to_lowercase();
        let start = (page.saturating_sub(1) as usize).saturating_mul(limit);
        let mut matched: usize = 0;
        let mut items = Vec::new();

        for &id in &self.order {
            let text = format!("Item {id}");
            if !needle.is_empty() && !text.to_lowercase().contains(&needle) {
                continue;
            }
            if matched >= start && items.len() < limit {
                items.push(Record {
                    id: RecordId(id),
                    text,
                    selected: self.selected.contains(&id),
                });
            }
            matched += 1;
        }

        let has_more = matched > start + items.len();
        (items, has_more, matched as u64)
    }
}
