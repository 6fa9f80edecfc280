//! Bounded recency list
//!
//! Capacity-capped, newest-first list of uploaded media. Inserting past the
//! capacity drops the oldest entries; it never touches the hosting service.

use std::collections::VecDeque;

use crate::models::MediaRecord;

#[derive(Debug, Clone)]
pub struct RecencyList {
    items: VecDeque<MediaRecord>,
    capacity: usize,
}

impl RecencyList {
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the head and return whatever fell off the tail.
    ///
    /// An existing record with the same `external_id` is replaced, so ids
    /// stay unique within the list.
    pub fn insert_front(&mut self, record: MediaRecord) -> Vec<MediaRecord> {
        if let Some(pos) = self
            .items
            .iter()
            .position(|r| r.external_id == record.external_id)
        {
            self.items.remove(pos);
        }

        self.items.push_front(record);

        let mut evicted = Vec::new();
        while self.items.len() > self.capacity {
            if let Some(oldest) = self.items.pop_back() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    pub fn remove(&mut self, external_id: &str) -> bool {
        match self.items.iter().position(|r| r.external_id == external_id) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, external_id: &str) -> Option<&MediaRecord> {
        self.items.iter().find(|r| r.external_id == external_id)
    }

    /// Ordered copy, newest first.
    pub fn snapshot(&self) -> Vec<MediaRecord> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
