use crate::messages::Event;
use std::collections::VecDeque;

/// A strictly FIFO event queue. Events are never reordered or re-enqueued.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
    pushed: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.pushed += 1;
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Total number of events ever pushed.
    pub fn pushed(&self) -> u64 {
        self.pushed
    }
}
