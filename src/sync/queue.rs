//! Ordered buffer keyed by an integer priority.
//!
//! Elements are kept in ascending priority order; `dequeue` always yields
//! the lowest priority. Priorities must be unique: the online session keys
//! moves by sequence number and a second element with a queued number is a
//! duplicate delivery.

use std::collections::VecDeque;

use super::error::QueueError;

/// Priority-ordered buffer. Lowest priority first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityQueue<T> {
    items: VecDeque<(u32, T)>,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Insert `item` at its place in ascending priority order.
    ///
    /// Returns an error, leaving the queue untouched, if `priority` is
    /// already present.
    pub fn enqueue(&mut self, item: T, priority: u32) -> Result<(), QueueError> {
        match self.items.binary_search_by_key(&priority, |(p, _)| *p) {
            Ok(_) => Err(QueueError::DuplicatePriority { priority }),
            Err(index) => {
                self.items.insert(index, (priority, item));
                Ok(())
            }
        }
    }

    /// Remove and return the lowest-priority element.
    pub fn dequeue(&mut self) -> Option<(u32, T)> {
        self.items.pop_front()
    }

    /// Lowest-priority element.
    #[must_use]
    pub fn front(&self) -> Option<(u32, &T)> {
        self.items.front().map(|(p, item)| (*p, item))
    }

    /// Highest-priority element.
    #[must_use]
    pub fn back(&self) -> Option<(u32, &T)> {
        self.items.back().map(|(p, item)| (*p, item))
    }

    /// Is an element with `priority` queued?
    #[must_use]
    pub fn contains(&self, priority: u32) -> bool {
        self.items
            .binary_search_by_key(&priority, |(p, _)| *p)
            .is_ok()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Elements in ascending priority order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.items.iter().map(|(p, item)| (*p, item))
    }
}
