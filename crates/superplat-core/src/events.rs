use std::collections::VecDeque;

/// FIFO of notifications produced during a tick and drained once at its end.
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    queue: VecDeque<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: E) {
        self.queue.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued event in emission order, leaving the queue empty.
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.queue.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut q = EventQueue::new();
        q.push("died");
        q.push("respawned");
        assert_eq!(q.len(), 2);

        let events: Vec<_> = q.drain().collect();
        assert_eq!(events, vec!["died", "respawned"]);
        assert!(q.is_empty());
    }
}
