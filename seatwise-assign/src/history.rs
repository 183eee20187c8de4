use std::collections::VecDeque;
use tracing::debug;
use crate::models::Operation;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Bounded history of applied operations, newest first
#[derive(Debug, Clone)]
pub struct OperationLog {
    entries: VecDeque<Operation>,
    limit: usize,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Prepend; the oldest entry beyond the limit is dropped silently
    pub fn record(&mut self, operation: Operation) {
        self.entries.push_front(operation);
        while self.entries.len() > self.limit {
            if let Some(evicted) = self.entries.pop_back() {
                debug!("Operation log full, evicted {} {}", evicted.kind, evicted.id);
            }
        }
    }

    pub fn head(&self) -> Option<&Operation> {
        self.entries.front()
    }

    pub fn pop_head(&mut self) -> Option<Operation> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.entries.iter()
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwise_catalog::{Seat, SeatType};
    use uuid::Uuid;

    fn block_op() -> Operation {
        let seat = Seat::new(Uuid::new_v4(), 0, 1, SeatType::Seat);
        Operation::block(Uuid::new_v4(), &seat)
    }

    #[test]
    fn test_newest_first() {
        let mut log = OperationLog::new();
        let first = block_op();
        let second = block_op();
        log.record(first.clone());
        log.record(second.clone());

        assert_eq!(log.head(), Some(&second));
        let ids: Vec<_> = log.iter().map(|op| op.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_capped_at_ten() {
        let mut log = OperationLog::new();
        let ops: Vec<_> = (0..12).map(|_| block_op()).collect();
        for op in &ops {
            log.record(op.clone());
        }

        assert_eq!(log.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(log.head().unwrap().id, ops[11].id);
        assert_eq!(log.iter().last().unwrap().id, ops[2].id);
    }

    #[test]
    fn test_pop_and_limit_floor() {
        let mut log = OperationLog::with_limit(0);
        assert_eq!(log.limit(), 1);
        log.record(block_op());
        log.record(block_op());
        assert_eq!(log.len(), 1);

        assert!(log.pop_head().is_some());
        assert!(log.pop_head().is_none());
        assert!(log.is_empty());
    }
}
